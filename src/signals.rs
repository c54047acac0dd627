// Request signal extraction - the fixed flag set a submission carries
//
// Field names are the posted-form wire contract shared with the rendering
// layer; the flags decide which workflow branch runs.

use indexmap::IndexMap;
use serde_json::Value;

use crate::record::Selector;

/// Posted form data as handed over by the transport layer.
pub type PostedForm = IndexMap<String, Value>;

/// Save, but stay in the editor afterwards.
pub const FIELD_SAVE_AND_CONTINUE: &str = "atknoclose";
/// Save and leave the editor.
pub const FIELD_SAVE_AND_CLOSE: &str = "atksaveandclose";
/// A wizard step posted this form; its presence alone selects the save branch.
pub const FIELD_WIZARD_ACTION: &str = "atkwizardaction";
/// Abandon the edit.
pub const FIELD_CANCEL: &str = "atkcancel";
/// The record selector the form was opened for.
pub const FIELD_SELECTOR: &str = "atkselector";
/// CSRF token, looked up under the posted field prefix.
pub const FIELD_CSRF_TOKEN: &str = "atkcsrftoken";
/// Optional namespace prefix applied to the token field.
pub const FIELD_PREFIX: &str = "atkfieldprefix";
/// Tab the editor was on, carried through redirects.
pub const FIELD_TAB: &str = "atktab";

/// The signals one submission carries. Extracted once per request;
/// exactly one meaningful branch is taken based on them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestSignals {
    pub save_and_continue: bool,
    pub save_and_close: bool,
    pub wizard_action: bool,
    pub cancel: bool,
    pub csrf_token: Option<String>,
    pub field_prefix: String,
    pub selector: Selector,
    pub tab: Option<String>,
}

impl RequestSignals {
    /// Read the flag set out of a posted form. The CSRF token is looked up
    /// as `<prefix>atkcsrftoken`, with an empty prefix when none was posted.
    pub fn extract(form: &PostedForm) -> Self {
        let field_prefix = text(form, FIELD_PREFIX).unwrap_or_default();
        let csrf_token = text(form, &format!("{field_prefix}{FIELD_CSRF_TOKEN}"));
        let selector = text(form, FIELD_SELECTOR)
            .map(Selector::from)
            .unwrap_or_default();

        Self {
            save_and_continue: flag(form, FIELD_SAVE_AND_CONTINUE),
            save_and_close: flag(form, FIELD_SAVE_AND_CLOSE),
            // Presence check: wizard forms post the action name as the value.
            wizard_action: form.contains_key(FIELD_WIZARD_ACTION),
            cancel: flag(form, FIELD_CANCEL),
            csrf_token,
            field_prefix,
            selector,
            tab: text(form, FIELD_TAB),
        }
    }

    /// Whether any of the save-class signals selected the process branch.
    pub fn save_requested(&self) -> bool {
        self.save_and_continue || self.save_and_close || self.wizard_action
    }
}

/// Truthiness of a posted flag value: absent, null, false, zero, `""` and
/// `"0"` are all unset, matching how submit buttons post.
fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty() && s != "0",
        _ => true,
    }
}

fn flag(form: &PostedForm, name: &str) -> bool {
    form.get(name).map(is_set).unwrap_or(false)
}

fn text(form: &PostedForm, name: &str) -> Option<String> {
    form.get(name)
        .and_then(Value::as_str)
        .map(str::to_string)
}
