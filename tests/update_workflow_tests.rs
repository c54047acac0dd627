//! End-to-end update-submission tests over the public API
//!
//! These drive the workflow the way a host framework would: real session
//! store, real URL building, local mocks only for the seams a host
//! implements itself (authorization, CSRF, validation, navigation).

use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;
use url::Url;

use editflow::config::{NavigationConfig, StoreConfig};
use editflow::signals::{FIELD_CANCEL, FIELD_SAVE_AND_CLOSE, FIELD_SELECTOR};
use editflow::{
    AuthorizationCheck, CsrfValidator, DialogDirective, Navigation, Navigator, PersistenceStore,
    PostedForm, Record, RecordError, SessionStore, UpdateContext, UpdateOutcome, UpdateWorkflow,
    UrlBuilder, ValidationEngine, ValidationMode,
};

struct AllowAll;

impl AuthorizationCheck for AllowAll {
    fn allows_update(&self, _record: &Record) -> bool {
        true
    }
}

struct AcceptToken;

impl CsrfValidator for AcceptToken {
    fn validate(&self, _token: Option<&str>) -> bool {
        true
    }
}

/// Validator rejecting empty `name` fields, the shape a host's field
/// validators produce.
struct RequireName;

#[async_trait]
impl ValidationEngine for RequireName {
    async fn validate(&self, record: &mut Record, _mode: ValidationMode) -> Result<()> {
        let missing = match record.get("name") {
            Some(editflow::FieldValue::Scalar(value)) => {
                value.as_str().map(str::is_empty).unwrap_or(false)
            }
            _ => true,
        };
        if missing {
            record.add_error(RecordError::for_field("name", "name is mandatory"));
        }
        Ok(())
    }
}

#[derive(Default)]
struct RecordingNavigator {
    redirects: Mutex<Vec<Url>>,
    dialogs: Mutex<Vec<DialogDirective>>,
    denied: Mutex<Vec<bool>>,
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, url: &Url) -> Result<()> {
        self.redirects.lock().unwrap().push(url.clone());
        Ok(())
    }

    fn render_dialog(&self, directive: &DialogDirective) -> Result<()> {
        self.dialogs.lock().unwrap().push(directive.clone());
        Ok(())
    }

    fn render_access_denied(&self, dialog: bool) -> Result<()> {
        self.denied.lock().unwrap().push(dialog);
        Ok(())
    }
}

fn workflow_over(store: Arc<SessionStore>) -> (UpdateWorkflow, Arc<RecordingNavigator>) {
    let urls = Arc::new(UrlBuilder::new(&NavigationConfig::default()).unwrap());
    let navigator = Arc::new(RecordingNavigator::default());
    let workflow = UpdateWorkflow::builder(urls)
        .authorizer(Arc::new(AllowAll))
        .csrf(Arc::new(AcceptToken))
        .validator(Arc::new(RequireName))
        .store(store)
        .navigator(navigator.clone())
        .build()
        .unwrap();
    (workflow, navigator)
}

fn save_form(selector: &str) -> PostedForm {
    [
        (FIELD_SAVE_AND_CLOSE.to_string(), json!("1")),
        (FIELD_SELECTOR.to_string(), json!(selector)),
    ]
    .into_iter()
    .collect()
}

#[tokio::test]
async fn successful_update_overwrites_the_session_row() {
    let store = Arc::new(SessionStore::new());
    let selector = editflow::Selector::from("coffee.id='1'");
    store
        .seed(&selector, Record::new().with("name", "espresso"))
        .await;

    let (workflow, navigator) = workflow_over(store.clone());
    let mut record = Record::new().with("name", "ristretto");
    let mut ctx = UpdateContext::new("coffee", save_form("coffee.id='1'"));

    let decision = workflow.run(&mut ctx, &mut record).await.unwrap();

    assert_eq!(decision.outcome, UpdateOutcome::Persisted);
    assert_eq!(store.get(&selector).await, Some(record));
    let redirects = navigator.redirects.lock().unwrap();
    assert_eq!(redirects.len(), 1);
    assert!(redirects[0].query().unwrap().contains("status=success"));
}

#[tokio::test]
async fn rejected_update_leaves_the_stored_row_untouched() {
    let store = Arc::new(SessionStore::new());
    let selector = editflow::Selector::from("coffee.id='2'");
    let original = Record::new().with("name", "espresso");
    store.seed(&selector, original.clone()).await;

    let (workflow, navigator) = workflow_over(store.clone());
    let mut record = Record::new().with("name", "");
    let mut ctx = UpdateContext::new("coffee", save_form("coffee.id='2'"));

    let decision = workflow.run(&mut ctx, &mut record).await.unwrap();

    assert_eq!(decision.outcome, UpdateOutcome::ValidationFailed);
    assert!(record.has_error());
    assert_eq!(store.get(&selector).await, Some(original));
    // The single navigation effect returns to the editor.
    assert_eq!(navigator.redirects.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn cancel_never_touches_the_store() {
    let store = Arc::new(SessionStore::new());
    let selector = editflow::Selector::from("coffee.id='3'");
    let original = Record::new().with("name", "espresso");
    store.seed(&selector, original.clone()).await;

    let (workflow, _navigator) = workflow_over(store.clone());
    let posted: PostedForm = [
        (FIELD_CANCEL.to_string(), json!("1")),
        (FIELD_SELECTOR.to_string(), json!("coffee.id='3'")),
    ]
    .into_iter()
    .collect();

    // Replay the cancel; both invocations must decide identically.
    for _ in 0..2 {
        let mut record = Record::new().with("name", "changed");
        let mut ctx = UpdateContext::new("coffee", posted.clone());
        let decision = workflow.run(&mut ctx, &mut record).await.unwrap();
        assert_eq!(decision.outcome, UpdateOutcome::Cancelled);
    }
    assert_eq!(store.get(&selector).await, Some(original));
}

#[tokio::test]
async fn dialog_save_emits_a_script_directive() {
    let store = Arc::new(SessionStore::new());
    let (workflow, navigator) = workflow_over(store);

    let mut record = Record::new().with("name", "lungo");
    let mut ctx = UpdateContext::dialog("coffee", save_form("coffee.id='4'"));
    let decision = workflow.run(&mut ctx, &mut record).await.unwrap();

    assert_eq!(decision.outcome, UpdateOutcome::Persisted);
    assert_eq!(
        *navigator.dialogs.lock().unwrap(),
        vec![DialogDirective::Reload]
    );
    assert!(navigator.redirects.lock().unwrap().is_empty());
}

#[tokio::test]
async fn store_selection_honours_the_session_backend() {
    let cfg = StoreConfig {
        backend: "session".to_string(),
        database: None,
    };
    let store = editflow::store::from_config(&cfg).await.unwrap();
    assert_eq!(store.backend(), "session");
}

#[tokio::test]
async fn no_button_fallback_redirects_without_mutation() {
    let store = Arc::new(SessionStore::new());
    let (workflow, navigator) = workflow_over(store.clone());

    let posted: PostedForm = [(FIELD_SELECTOR.to_string(), json!("coffee.id='5'"))]
        .into_iter()
        .collect();
    let mut record = Record::new().with("name", "doppio");
    let mut ctx = UpdateContext::new("coffee", posted);
    let decision = workflow.run(&mut ctx, &mut record).await.unwrap();

    assert_eq!(decision.outcome, UpdateOutcome::NoActionTaken);
    assert!(matches!(
        decision.navigation,
        Navigation::EditView {
            replace_stack_slot: true,
            ..
        }
    ));
    assert_eq!(store.len().await, 0);
    assert_eq!(navigator.redirects.lock().unwrap().len(), 1);
}
