// Record model - ordered fields with per-record error slots
//
// A Record is what the edit screen loaded plus the posted field values,
// merged by the caller before the workflow runs. Validation and the store
// mutate it in place.

pub mod selector;
pub mod types;

pub use selector::Selector;
pub use types::{FieldValue, Record, RecordError};
