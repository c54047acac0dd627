// Navigation targets - the one side effect a workflow invocation produces
//
// The workflow decides *what* navigation happens; the external Navigator
// collaborator decides *how* (HTTP redirect, rendered fragment, script).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::NavigationConfig;
use crate::record::Selector;

/// Outcome tag carried by feedback URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionStatus {
    Success,
    Failed,
    Cancelled,
}

impl ActionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionStatus::Success => "success",
            ActionStatus::Failed => "failed",
            ActionStatus::Cancelled => "cancelled",
        }
    }
}

/// Script directive a dialog-mode response sends back to the client.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogDirective {
    /// Force a full page reload after a successful dialog save.
    Reload,
    /// Trigger an attribute-scoped refresh call instead of reloading.
    RefreshAttribute { refresh_url: String },
    /// Re-render the edit dialog; the record carries its reject info, a
    /// fatal store diagnostic rides along as `message`.
    EditDialog {
        save_url: Url,
        message: Option<String>,
    },
}

/// The single navigation effect of one workflow invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum Navigation {
    /// Redirect to a feedback page tagged with the outcome.
    Feedback { url: Url, status: ActionStatus },
    /// Redirect back to the edit view for the same record/tab. When
    /// `replace_stack_slot` is set the Navigator replaces the current
    /// navigation-session slot instead of pushing a new one.
    EditView { url: Url, replace_stack_slot: bool },
    /// Dialog-mode script/fragment response.
    Dialog(DialogDirective),
    /// Generic access-denied response; never reveals record state.
    AccessDenied { dialog: bool },
}

/// The action name dialog saves post back to unless overridden.
const SAVE_ACTION: &str = "update";

/// Builds concrete redirect targets from navigation configuration.
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    base: Url,
    edit_action: String,
    dialog_save_url: Option<Url>,
}

impl UrlBuilder {
    pub fn new(cfg: &NavigationConfig) -> Result<Self> {
        let base = Url::parse(&cfg.base_url)
            .with_context(|| format!("invalid navigation base URL '{}'", cfg.base_url))?;
        let dialog_save_url = cfg
            .dialog_save_url
            .as_deref()
            .map(Url::parse)
            .transpose()
            .context("invalid dialog save URL override")?;
        Ok(Self {
            base,
            edit_action: cfg.edit_action.clone(),
            dialog_save_url,
        })
    }

    /// The configured edit action name (default `"edit"`).
    pub fn edit_action(&self) -> &str {
        &self.edit_action
    }

    /// Feedback URL reporting an action outcome for a record.
    pub fn feedback(
        &self,
        entity: &str,
        status: ActionStatus,
        selector: &Selector,
        message: Option<&str>,
    ) -> Url {
        let mut url = self.base.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("entity", entity)
                .append_pair("action", "feedback")
                .append_pair("status", status.as_str());
            if !selector.is_empty() {
                pairs.append_pair("selector", selector.as_str());
            }
            if let Some(message) = message {
                pairs.append_pair("message", message);
            }
        }
        url
    }

    /// Edit view for the same record, optionally restoring the tab.
    pub fn edit_view(&self, entity: &str, selector: &Selector, tab: Option<&str>) -> Url {
        let mut url = self.base.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("entity", entity)
                .append_pair("action", &self.edit_action);
            if !selector.is_empty() {
                pairs.append_pair("selector", selector.as_str());
            }
            if let Some(tab) = tab {
                pairs.append_pair("tab", tab);
            }
        }
        url
    }

    /// Where a re-rendered edit dialog posts its next save: the configured
    /// override, or the dispatch base with the save action.
    pub fn dialog_save(&self, entity: &str) -> Url {
        if let Some(url) = &self.dialog_save_url {
            return url.clone();
        }
        let mut url = self.base.clone();
        url.query_pairs_mut()
            .append_pair("entity", entity)
            .append_pair("action", SAVE_ACTION);
        url
    }
}
