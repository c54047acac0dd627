// Core types for the update-submission workflow

use serde::{Deserialize, Serialize};

use crate::navigation::Navigation;
use crate::record::Selector;
use crate::signals::{PostedForm, RequestSignals};
use crate::telemetry::generate_correlation_id;

/// What one invocation decided. Exactly one outcome is produced per
/// submission; it is never partially true.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateOutcome {
    /// The record was committed to the store.
    Persisted,
    /// Validation (or a user-class store error) attached reject info;
    /// the user corrects and resubmits.
    ValidationFailed,
    /// The store failed unrecoverably; reported, never retried.
    FatalStoreError,
    /// The user abandoned the edit.
    Cancelled,
    /// The current actor may not update this record.
    AccessDenied,
    /// The anti-forgery token did not check out.
    CsrfRejected,
    /// No recognized button signal: silent refresh of the edit view.
    NoActionTaken,
}

/// Which half of the save pair a validation run covers. This workflow
/// only submits `Update`; `Add` exists for engines shared with add
/// actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    Add,
    Update,
}

/// Request-scoped context threaded through one invocation. Replaces
/// ambient request globals: everything branch decisions read lives here.
#[derive(Debug, Clone)]
pub struct UpdateContext {
    /// Entity (logical table) the record belongs to.
    pub entity: String,
    /// Ambient action name; starts as the save action, switched to the
    /// edit action when a dialog re-renders its form.
    pub action: String,
    pub signals: RequestSignals,
    pub posted: PostedForm,
    pub dialog_mode: bool,
    /// When set, a successful dialog save refreshes just this attribute
    /// instead of reloading the page.
    pub attribute_refresh_url: Option<String>,
    pub correlation_id: String,
}

impl UpdateContext {
    /// Page-mode context for a posted form.
    pub fn new(entity: impl Into<String>, posted: PostedForm) -> Self {
        let signals = RequestSignals::extract(&posted);
        Self {
            entity: entity.into(),
            action: "update".to_string(),
            signals,
            posted,
            dialog_mode: false,
            attribute_refresh_url: None,
            correlation_id: generate_correlation_id(),
        }
    }

    /// Dialog-mode context for a posted form.
    pub fn dialog(entity: impl Into<String>, posted: PostedForm) -> Self {
        Self {
            dialog_mode: true,
            ..Self::new(entity, posted)
        }
    }

    pub fn with_attribute_refresh_url(mut self, url: impl Into<String>) -> Self {
        self.attribute_refresh_url = Some(url.into());
        self
    }

    /// The record selector this submission targets; empty when the form
    /// posted none.
    pub fn selector(&self) -> &Selector {
        &self.signals.selector
    }

    pub(crate) fn take_posted(&mut self) -> PostedForm {
        std::mem::take(&mut self.posted)
    }

    pub(crate) fn restore_posted(&mut self, posted: PostedForm) {
        self.posted = posted;
    }
}

/// The decision one invocation produced: the outcome plus the single
/// navigation effect that was performed for it.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateDecision {
    pub outcome: UpdateOutcome,
    pub navigation: Navigation,
}
