// Editflow - record update-submission workflow
// Exposes the decision procedure and its collaborator seams so host
// frameworks can plug in their own validation, storage and navigation.

pub mod cache;
pub mod config;
pub mod events;
pub mod navigation;
pub mod record;
pub mod signals;
pub mod store;
pub mod telemetry;
pub mod workflow;

// Re-export key types for easy access
pub use cache::RenderCache;
pub use config::{config, init_config, EditflowConfig};
pub use events::{TracingNotifier, UpdateEvent};
pub use navigation::{ActionStatus, DialogDirective, Navigation, UrlBuilder};
pub use record::{FieldValue, Record, RecordError, Selector};
pub use signals::{PostedForm, RequestSignals};
#[cfg(feature = "database")]
pub use store::DatabaseStore;
pub use store::{PersistenceStore, SessionStore, StoreError, StoreResult};
pub use telemetry::{generate_correlation_id, init_telemetry, shutdown_telemetry};
pub use workflow::{
    AuthorizationCheck, ChangeTracker, CsrfValidator, Navigator, NoChangeTracker, NoTriggers,
    Notifier, ProcessHandlers, UpdateContext, UpdateDecision, UpdateOutcome, UpdateTrigger,
    UpdateWorkflow, UpdateWorkflowBuilder, ValidationEngine, ValidationMode,
};
