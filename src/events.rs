// Update events - post-persist notifications for external subscribers

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::record::{Record, Selector};
use crate::workflow::traits::Notifier;

/// Payload describing one persisted update. Fired exactly once per
/// successful store mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateEvent {
    pub id: Uuid,
    /// Event name subscribers filter on; updates emit `"update"`.
    pub name: String,
    pub entity: String,
    pub selector: Selector,
    pub occurred_at: DateTime<Utc>,
    pub correlation_id: String,
}

impl UpdateEvent {
    pub fn updated(entity: &str, selector: &Selector, correlation_id: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: "update".to_string(),
            entity: entity.to_string(),
            selector: selector.clone(),
            occurred_at: Utc::now(),
            correlation_id: correlation_id.to_string(),
        }
    }
}

/// Default notifier: one structured log line per event, no external
/// delivery. Hosts with real subscribers supply their own [`Notifier`].
#[derive(Debug, Default)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn emit(&self, event: &UpdateEvent, record: &Record) -> Result<()> {
        tracing::info!(
            event.id = %event.id,
            event.name = %event.name,
            entity = %event.entity,
            selector = %event.selector,
            fields = record.fields().len(),
            correlation.id = %event.correlation_id,
            "record updated"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn updated_event_carries_the_selector() {
        let event = UpdateEvent::updated("coffee", &Selector::from("coffee.id='7'"), "corr-1");
        assert_eq!(event.name, "update");
        assert_eq!(event.selector.as_str(), "coffee.id='7'");
    }

    #[tokio::test]
    async fn tracing_notifier_accepts_events() {
        let notifier = TracingNotifier;
        let record = Record::new().with("name", "espresso");
        let event = UpdateEvent::updated("coffee", &Selector::empty(), "corr-2");
        assert!(notifier.emit(&event, &record).await.is_ok());
    }
}
