use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque key identifying a record, commonly its primary key.
///
/// Selectors travel from the posted form into store lookups and redirect
/// query parameters; the workflow never inspects their internal shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selector(String);

impl Selector {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The default selector when the form posted none.
    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Selector {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl From<String> for Selector {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}
