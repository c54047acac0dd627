// Mock collaborators for workflow tests - record every call, no side effects

use anyhow::Result;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use url::Url;

use crate::events::UpdateEvent;
use crate::navigation::DialogDirective;
use crate::record::{Record, RecordError, Selector};
use crate::store::{PersistenceStore, StoreError, StoreResult};
use crate::workflow::traits::*;
use crate::workflow::types::ValidationMode;

/// Shared ordering log the mocks append to, for asserting call order
/// across collaborators.
pub type CallLog = Arc<Mutex<Vec<&'static str>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

#[derive(Debug)]
pub struct MockAuthorizer {
    pub allow: bool,
    pub checks: Mutex<u32>,
}

impl MockAuthorizer {
    pub fn allowing() -> Self {
        Self {
            allow: true,
            checks: Mutex::new(0),
        }
    }

    pub fn denying() -> Self {
        Self {
            allow: false,
            checks: Mutex::new(0),
        }
    }
}

impl AuthorizationCheck for MockAuthorizer {
    fn allows_update(&self, _record: &Record) -> bool {
        *self.checks.lock().unwrap() += 1;
        self.allow
    }
}

#[derive(Debug)]
pub struct MockCsrf {
    pub accept: bool,
    pub seen_tokens: Mutex<Vec<Option<String>>>,
}

impl MockCsrf {
    pub fn accepting() -> Self {
        Self {
            accept: true,
            seen_tokens: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting() -> Self {
        Self {
            accept: false,
            seen_tokens: Mutex::new(Vec::new()),
        }
    }

    pub fn checks(&self) -> usize {
        self.seen_tokens.lock().unwrap().len()
    }
}

impl CsrfValidator for MockCsrf {
    fn validate(&self, token: Option<&str>) -> bool {
        self.seen_tokens
            .lock()
            .unwrap()
            .push(token.map(str::to_string));
        self.accept
    }
}

/// Validator that attaches a fixed set of errors on every run.
pub struct MockValidator {
    pub attach: Vec<RecordError>,
    pub calls: Mutex<Vec<ValidationMode>>,
    pub log: Option<CallLog>,
}

impl MockValidator {
    pub fn clean() -> Self {
        Self {
            attach: Vec::new(),
            calls: Mutex::new(Vec::new()),
            log: None,
        }
    }

    pub fn attaching(errors: Vec<RecordError>) -> Self {
        Self {
            attach: errors,
            calls: Mutex::new(Vec::new()),
            log: None,
        }
    }

    pub fn with_log(mut self, log: CallLog) -> Self {
        self.log = Some(log);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ValidationEngine for MockValidator {
    async fn validate(&self, record: &mut Record, mode: ValidationMode) -> Result<()> {
        if let Some(log) = &self.log {
            log.lock().unwrap().push("validate");
        }
        self.calls.lock().unwrap().push(mode);
        for error in &self.attach {
            record.add_error(error.clone());
        }
        Ok(())
    }
}

pub struct MockTracker {
    pub log: CallLog,
}

impl ChangeTracker for MockTracker {
    fn snapshot(&self, _record: &Record) -> Result<()> {
        self.log.lock().unwrap().push("snapshot");
        Ok(())
    }
}

pub struct MockTriggers {
    pub log: CallLog,
}

#[async_trait]
impl UpdateTrigger for MockTriggers {
    async fn pre_update(&self, _record: &mut Record) -> Result<()> {
        self.log.lock().unwrap().push("pre_update");
        Ok(())
    }
}

/// Store that answers every update with a configured result and records
/// what it was asked to persist.
pub struct MockStore {
    pub fail_with: Option<StoreError>,
    pub updates: Mutex<Vec<(Selector, Record)>>,
    pub log: Option<CallLog>,
}

impl MockStore {
    pub fn succeeding() -> Self {
        Self {
            fail_with: None,
            updates: Mutex::new(Vec::new()),
            log: None,
        }
    }

    pub fn failing(error: StoreError) -> Self {
        Self {
            fail_with: Some(error),
            updates: Mutex::new(Vec::new()),
            log: None,
        }
    }

    pub fn with_log(mut self, log: CallLog) -> Self {
        self.log = Some(log);
        self
    }

    pub fn update_count(&self) -> usize {
        self.updates.lock().unwrap().len()
    }
}

#[async_trait]
impl PersistenceStore for MockStore {
    async fn update(&self, selector: &Selector, record: &Record) -> StoreResult<()> {
        if let Some(log) = &self.log {
            log.lock().unwrap().push("store");
        }
        self.updates
            .lock()
            .unwrap()
            .push((selector.clone(), record.clone()));
        match &self.fail_with {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn backend(&self) -> &'static str {
        "mock"
    }
}

#[derive(Default)]
pub struct MockNotifier {
    pub events: Mutex<Vec<UpdateEvent>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn event_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn emit(&self, event: &UpdateEvent, _record: &Record) -> Result<()> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// Navigator that records every effect instead of performing it.
#[derive(Default)]
pub struct MockNavigator {
    pub redirects: Mutex<Vec<Url>>,
    pub dialogs: Mutex<Vec<DialogDirective>>,
    pub denied: Mutex<Vec<bool>>,
}

impl MockNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn effect_count(&self) -> usize {
        self.redirects.lock().unwrap().len()
            + self.dialogs.lock().unwrap().len()
            + self.denied.lock().unwrap().len()
    }
}

impl Navigator for MockNavigator {
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
