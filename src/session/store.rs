//! In-process session store with expiry sweeping.
//!
//! Records live in a map keyed by session id. Loads ignore expired records, and
//! [`SweepingStore::spawn_sweeper`] removes them on a fixed period so the map stays
//! bounded by the number of live sessions.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store::{self, ExpiredDeletion, SessionStore};

#[derive(Debug, Clone, Default)]
pub struct SweepingStore {
    records: Arc<Mutex<HashMap<Id, Record>>>,
}

impl SweepingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    /// Delete expired records every `period` until the runtime shuts down.
    pub fn spawn_sweeper(&self, period: Duration) -> tokio::task::JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                if let Err(err) = store.delete_expired().await {
                    tracing::warn!("Session sweep failed: {}", err);
                }
            }
        })
    }
}

fn is_active(record: &Record) -> bool {
    record.expiry_date > OffsetDateTime::now_utc()
}

#[async_trait]
impl SessionStore for SweepingStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        let mut records = self.records.lock().await;
        while records.contains_key(&record.id) {
            record.id = Id::default();
        }
        records.insert(record.id, record.clone());
        Ok(())
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        self.records.lock().await.insert(record.id, record.clone());
        Ok(())
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        Ok(self
            .records
            .lock()
            .await
            .get(session_id)
            .filter(|record| is_active(record))
            .cloned())
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        self.records.lock().await.remove(session_id);
        Ok(())
    }
}

#[async_trait]
impl ExpiredDeletion for SweepingStore {
    async fn delete_expired(&self) -> session_store::Result<()> {
        let mut records = self.records.lock().await;
        let before = records.len();
        records.retain(|_, record| is_active(record));
        let removed = before - records.len();
        if removed > 0 {
            tracing::debug!(removed, "Expired sessions deleted");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(expires_in: time::Duration) -> Record {
        Record {
            id: Id::default(),
            data: HashMap::new(),
            expiry_date: OffsetDateTime::now_utc() + expires_in,
        }
    }

    #[tokio::test]
    async fn test_expired_record_not_loaded() {
        let store = SweepingStore::new();
        let mut stale = record(time::Duration::seconds(-5));
        store.create(&mut stale).await.unwrap();

        assert!(store.load(&stale.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_expired_keeps_live_records() {
        let store = SweepingStore::new();
        let mut stale = record(time::Duration::seconds(-5));
        let mut live = record(time::Duration::hours(1));
        store.create(&mut stale).await.unwrap();
        store.create(&mut live).await.unwrap();
        assert_eq!(store.len().await, 2);

        store.delete_expired().await.unwrap();

        assert_eq!(store.len().await, 1);
        assert!(store.load(&live.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_sweeper_removes_expired_records() {
        let store = SweepingStore::new();
        let mut stale = record(time::Duration::seconds(-5));
        store.create(&mut stale).await.unwrap();

        let sweeper = store.spawn_sweeper(Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(50)).await;
        sweeper.abort();

        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_delete_removes_record() {
        let store = SweepingStore::new();
        let mut live = record(time::Duration::hours(1));
        store.create(&mut live).await.unwrap();

        store.delete(&live.id).await.unwrap();

        assert_eq!(store.len().await, 0);
    }
}
