//! In-memory record store.
//!
//! Used when no database is configured. Records live for the lifetime of the
//! process and are kept newest first by inserting at the front.

#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;

use time::OffsetDateTime;
use tokio::sync::RwLock;

use super::attendance::{Attendance, NewAttendance, RecordStore, StoreError};

#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Vec<Attendance>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl RecordStore for MemoryStore {
    async fn save(&self, record: NewAttendance) -> Result<Attendance, StoreError> {
        let stored = Attendance::from_new(record, OffsetDateTime::now_utc());
        self.records.write().await.insert(0, stored.clone());
        Ok(stored)
    }

    async fn list(&self) -> Result<Vec<Attendance>, StoreError> {
        Ok(self.records.read().await.clone())
    }
}
