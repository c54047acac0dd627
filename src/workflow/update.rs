// The update-submission decision procedure
//
// One invocation per inbound submission: request signals decide the
// branch, the branch performs at most one store mutation, and exactly
// one navigation effect closes the request.

use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, error, info, warn, Instrument};

use crate::cache::RenderCache;
use crate::events::{TracingNotifier, UpdateEvent};
use crate::navigation::{ActionStatus, Navigation, UrlBuilder};
use crate::record::{Record, RecordError};
use crate::store::{PersistenceStore, StoreError};
use crate::telemetry::create_update_span;
use crate::workflow::handlers::ProcessHandlers;
use crate::workflow::traits::{
    AuthorizationCheck, ChangeTracker, CsrfValidator, Navigator, NoChangeTracker, NoTriggers,
    Notifier, UpdateTrigger, ValidationEngine,
};
use crate::workflow::types::{UpdateContext, UpdateDecision, UpdateOutcome, ValidationMode};

/// The update-submission workflow. Holds no per-request state; one value
/// serves every submission against the same entity configuration.
pub struct UpdateWorkflow {
    authorizer: Arc<dyn AuthorizationCheck>,
    csrf: Arc<dyn CsrfValidator>,
    validator: Arc<dyn ValidationEngine>,
    tracker: Arc<dyn ChangeTracker>,
    triggers: Arc<dyn UpdateTrigger>,
    store: Arc<dyn PersistenceStore>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    cache: Option<RenderCache>,
    urls: Arc<UrlBuilder>,
    handlers: ProcessHandlers,
    dialog_handlers: ProcessHandlers,
}

impl UpdateWorkflow {
    pub fn builder(urls: Arc<UrlBuilder>) -> UpdateWorkflowBuilder {
        UpdateWorkflowBuilder::new(urls)
    }

    /// Decide the outcome for one submission and perform its side
    /// effects. At most one store mutation and exactly one navigation
    /// effect occur per call.
    pub async fn run(
        &self,
        ctx: &mut UpdateContext,
        record: &mut Record,
    ) -> Result<UpdateDecision> {
        let span = create_update_span(
            &ctx.entity,
            &ctx.action,
            ctx.selector().as_str(),
            &ctx.correlation_id,
        );
        let handlers = if ctx.dialog_mode {
            self.dialog_handlers.clone()
        } else {
            self.handlers.clone()
        };
        let decision = self.decide(ctx, record, &handlers).instrument(span).await?;
        self.perform(&decision.navigation)?;
        Ok(decision)
    }

    async fn decide(
        &self,
        ctx: &mut UpdateContext,
        record: &mut Record,
        handlers: &ProcessHandlers,
    ) -> Result<UpdateDecision> {
        if !self.authorizer.allows_update(record) {
            warn!(entity = %ctx.entity, "update denied for current actor");
            return Ok(UpdateDecision {
                outcome: UpdateOutcome::AccessDenied,
                navigation: Navigation::AccessDenied {
                    dialog: ctx.dialog_mode,
                },
            });
        }

        if !self.csrf.validate(ctx.signals.csrf_token.as_deref()) {
            warn!(entity = %ctx.entity, "anti-forgery token rejected");
            return Ok(UpdateDecision {
                outcome: UpdateOutcome::CsrfRejected,
                navigation: Navigation::AccessDenied {
                    dialog: ctx.dialog_mode,
                },
            });
        }

        if ctx.signals.save_requested() {
            self.process(ctx, record, handlers).await
        } else if ctx.signals.cancel {
            info!(entity = %ctx.entity, selector = %ctx.selector(), "edit cancelled");
            let url = self.urls.feedback(
                &ctx.entity,
                ActionStatus::Cancelled,
                ctx.selector(),
                None,
            );
            Ok(UpdateDecision {
                outcome: UpdateOutcome::Cancelled,
                navigation: Navigation::Feedback {
                    url,
                    status: ActionStatus::Cancelled,
                },
            })
        } else {
            // No recognized button signal: refresh the edit view for the
            // same record/tab. Intentionally a silent no-op, not an error.
            debug!(entity = %ctx.entity, "no action signal posted, refreshing edit view");
            let url = self.urls.edit_view(
                &ctx.entity,
                ctx.selector(),
                ctx.signals.tab.as_deref(),
            );
            Ok(UpdateDecision {
                outcome: UpdateOutcome::NoActionTaken,
                navigation: Navigation::EditView {
                    url,
                    replace_stack_slot: true,
                },
            })
        }
    }

    /// The process step: snapshot, trigger, validate, persist.
    async fn process(
        &self,
        ctx: &mut UpdateContext,
        record: &mut Record,
        handlers: &ProcessHandlers,
    ) -> Result<UpdateDecision> {
        // The change snapshot must see the loaded record, not raw posted
        // fields: clear them, snapshot, restore, and only then validate.
        let posted = ctx.take_posted();
        let snapshot = self.tracker.snapshot(record);
        ctx.restore_posted(posted);
        snapshot?;

        self.triggers.pre_update(record).await?;
        self.validator.validate(record, ValidationMode::Update).await?;

        if record.has_error() {
            debug!(entity = %ctx.entity, errors = record.errors().len(), "validation attached reject info");
            return Ok(self.validation_failed(ctx, record, handlers));
        }

        match self.store.update(ctx.selector(), record).await {
            Ok(()) => {
                let event = UpdateEvent::updated(&ctx.entity, ctx.selector(), &ctx.correlation_id);
                self.notifier.emit(&event, record).await?;
                if let Some(cache) = &self.cache {
                    cache.invalidate(&ctx.entity, ctx.selector()).await;
                }
                info!(
                    entity = %ctx.entity,
                    selector = %ctx.selector(),
                    backend = self.store.backend(),
                    "record persisted"
                );
                let navigation = (handlers.on_success)(record, ctx);
                Ok(UpdateDecision {
                    outcome: UpdateOutcome::Persisted,
                    navigation,
                })
            }
            Err(StoreError::User(message)) => {
                // The store's objection is the user's to fix; it becomes
                // reject info, not a fatal page.
                warn!(entity = %ctx.entity, error = %message, "store rejected update with user-facing error");
                record.add_error(RecordError::record_level(&message));
                Ok(self.validation_failed(ctx, record, handlers))
            }
            Err(err) => {
                let message = err.to_string();
                error!(entity = %ctx.entity, error = %message, "store failed, transaction rolled back");
                let navigation = (handlers.on_error)(record, Some(&message), ctx);
                Ok(UpdateDecision {
                    outcome: UpdateOutcome::FatalStoreError,
                    navigation,
                })
            }
        }
    }

    fn validation_failed(
        &self,
        ctx: &mut UpdateContext,
        record: &Record,
        handlers: &ProcessHandlers,
    ) -> UpdateDecision {
        if ctx.dialog_mode {
            // The re-rendered dialog is the edit form again.
            ctx.action = self.urls.edit_action().to_string();
        }
        let navigation = (handlers.on_error)(record, None, ctx);
        UpdateDecision {
            outcome: UpdateOutcome::ValidationFailed,
            navigation,
        }
    }

    fn perform(&self, navigation: &Navigation) -> Result<()> {
        match navigation {
            Navigation::Feedback { url, .. } => self.navigator.redirect(url),
            Navigation::EditView { url, .. } => self.navigator.redirect(url),
            Navigation::Dialog(directive) => self.navigator.render_dialog(directive),
            Navigation::AccessDenied { dialog } => self.navigator.render_access_denied(*dialog),
        }
    }
}

/// Builder wiring the collaborator seams. Authorization, CSRF,
/// validation, store and navigator are required; the rest default to
/// no-op or log-backed implementations.
pub struct UpdateWorkflowBuilder {
    urls: Arc<UrlBuilder>,
    authorizer: Option<Arc<dyn AuthorizationCheck>>,
    csrf: Option<Arc<dyn CsrfValidator>>,
    validator: Option<Arc<dyn ValidationEngine>>,
    tracker: Arc<dyn ChangeTracker>,
    triggers: Arc<dyn UpdateTrigger>,
    store: Option<Arc<dyn PersistenceStore>>,
    notifier: Arc<dyn Notifier>,
    navigator: Option<Arc<dyn Navigator>>,
    cache: Option<RenderCache>,
    handlers: Option<ProcessHandlers>,
    dialog_handlers: Option<ProcessHandlers>,
}

impl UpdateWorkflowBuilder {
    fn new(urls: Arc<UrlBuilder>) -> Self {
        Self {
            urls,
            authorizer: None,
            csrf: None,
            validator: None,
            tracker: Arc::new(NoChangeTracker),
            triggers: Arc::new(NoTriggers),
            store: None,
            notifier: Arc::new(TracingNotifier),
            navigator: None,
            cache: None,
            handlers: None,
            dialog_handlers: None,
        }
    }

    pub fn authorizer(mut self, authorizer: Arc<dyn AuthorizationCheck>) -> Self {
        self.authorizer = Some(authorizer);
        self
    }

    pub fn csrf(mut self, csrf: Arc<dyn CsrfValidator>) -> Self {
        self.csrf = Some(csrf);
        self
    }

    pub fn validator(mut self, validator: Arc<dyn ValidationEngine>) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn tracker(mut self, tracker: Arc<dyn ChangeTracker>) -> Self {
        self.tracker = tracker;
        self
    }

    pub fn triggers(mut self, triggers: Arc<dyn UpdateTrigger>) -> Self {
        self.triggers = triggers;
        self
    }

    pub fn store(mut self, store: Arc<dyn PersistenceStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    pub fn cache(mut self, cache: RenderCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn handlers(mut self, handlers: ProcessHandlers) -> Self {
        self.handlers = Some(handlers);
        self
    }

    pub fn dialog_handlers(mut self, handlers: ProcessHandlers) -> Self {
        self.dialog_handlers = Some(handlers);
        self
    }

    pub fn build(self) -> Result<UpdateWorkflow> {
        let urls = self.urls;
        let handlers = self
            .handlers
            .unwrap_or_else(|| ProcessHandlers::page_defaults(urls.clone()));
        let dialog_handlers = self
            .dialog_handlers
            .unwrap_or_else(|| ProcessHandlers::dialog_defaults(urls.clone()));

        Ok(UpdateWorkflow {
            authorizer: self
                .authorizer
                .ok_or_else(|| anyhow::anyhow!("update workflow needs an authorization check"))?,
            csrf: self
                .csrf
                .ok_or_else(|| anyhow::anyhow!("update workflow needs a CSRF validator"))?,
            validator: self
                .validator
                .ok_or_else(|| anyhow::anyhow!("update workflow needs a validation engine"))?,
            tracker: self.tracker,
            triggers: self.triggers,
            store: self
                .store
                .ok_or_else(|| anyhow::anyhow!("update workflow needs a persistence store"))?,
            notifier: self.notifier,
            navigator: self
                .navigator
                .ok_or_else(|| anyhow::anyhow!("update workflow needs a navigator"))?,
            cache: self.cache,
            urls,
            handlers,
            dialog_handlers,
        })
    }
}
