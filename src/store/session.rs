use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use super::{PersistenceStore, StoreResult};
use crate::record::{Record, Selector};

/// Ephemeral, selector-keyed store. Backs edits against data that never
/// reaches a database: wizard steps, session-scoped grids, previews. Rows
/// live as long as the store value itself, which the host keeps in its
/// session.
#[derive(Debug, Default)]
pub struct SessionStore {
    rows: RwLock<HashMap<String, Record>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preload the row an edit screen was opened on.
    pub async fn seed(&self, selector: &Selector, record: Record) {
        self.rows
            .write()
            .await
            .insert(selector.as_str().to_string(), record);
    }

    pub async fn get(&self, selector: &Selector) -> Option<Record> {
        self.rows.read().await.get(selector.as_str()).cloned()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }
}

#[async_trait]
impl PersistenceStore for SessionStore {
    /// Overwrite the row for `selector`. The empty selector is a valid
    /// key: forms that posted none all share the single unkeyed row.
    async fn update(&self, selector: &Selector, record: &Record) -> StoreResult<()> {
        self.rows
            .write()
            .await
            .insert(selector.as_str().to_string(), record.clone());
        debug!(selector = %selector, "session row overwritten");
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "session"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn update_overwrites_the_seeded_row() {
        let store = SessionStore::new();
        let selector = Selector::from("coffee.id='3'");
        store
            .seed(&selector, Record::new().with("name", "espresso"))
            .await;

        let updated = Record::new().with("name", "ristretto");
        store.update(&selector, &updated).await.unwrap();

        assert_eq!(store.get(&selector).await, Some(updated));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn missing_selector_defaults_to_the_unkeyed_row() {
        let store = SessionStore::new();
        let record = Record::new().with("step", "two");
        store.update(&Selector::empty(), &record).await.unwrap();

        assert_eq!(store.get(&Selector::empty()).await, Some(record));
    }

    #[tokio::test]
    async fn update_creates_the_row_when_nothing_was_seeded() {
        let store = SessionStore::new();
        let selector = Selector::from("draft.id='9'");
        store
            .update(&selector, &Record::new().with("title", "untitled"))
            .await
            .unwrap();

        assert!(store.get(&selector).await.is_some());
    }
}
