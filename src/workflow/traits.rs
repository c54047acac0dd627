// Traits for dependency injection - the seams the surrounding framework
// plugs into

use anyhow::Result;
use async_trait::async_trait;
use url::Url;

use crate::events::UpdateEvent;
use crate::navigation::DialogDirective;
use crate::record::Record;
use crate::workflow::types::ValidationMode;

/// Answers whether the current actor may update a given record.
pub trait AuthorizationCheck: Send + Sync {
    fn allows_update(&self, record: &Record) -> bool;
}

/// Validates the submitted anti-forgery token.
pub trait CsrfValidator: Send + Sync {
    fn validate(&self, token: Option<&str>) -> bool;
}

/// Attaches per-field and per-record error annotations in place; a clean
/// pass leaves the record's error slots untouched.
#[async_trait]
pub trait ValidationEngine: Send + Sync {
    async fn validate(&self, record: &mut Record, mode: ValidationMode) -> Result<()>;
}

/// Snapshot of "what changed" for audit/dirty tracking. Runs while posted
/// values are cleared so the snapshot sees the loaded record, not raw
/// form fields.
pub trait ChangeTracker: Send + Sync {
    fn snapshot(&self, record: &Record) -> Result<()>;
}

/// Record-level hook fired before validation; may itself attach errors.
#[async_trait]
pub trait UpdateTrigger: Send + Sync {
    async fn pre_update(&self, record: &mut Record) -> Result<()>;
}

/// Fires post-update events for external subscribers.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn emit(&self, event: &UpdateEvent, record: &Record) -> Result<()>;
}

/// Issues redirects and renders dialog/access-denied responses. One
/// method is called at most once per workflow invocation.
pub trait Navigator: Send + Sync {
    fn redirect(&self, url: &Url) -> Result<()>;
    fn render_dialog(&self, directive: &DialogDirective) -> Result<()>;
    fn render_access_denied(&self, dialog: bool) -> Result<()>;
}

/// No-op tracker for hosts without change tracking.
#[derive(Debug, Default)]
pub struct NoChangeTracker;

impl ChangeTracker for NoChangeTracker {
    fn snapshot(&self, _record: &Record) -> Result<()> {
        Ok(())
    }
}

/// No-op trigger set.
#[derive(Debug, Default)]
pub struct NoTriggers;

#[async_trait]
impl UpdateTrigger for NoTriggers {
    async fn pre_update(&self, _record: &mut Record) -> Result<()> {
        Ok(())
    }
}
