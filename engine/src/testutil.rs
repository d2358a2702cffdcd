//! Shared helpers for the inline unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use tally_core::error::StoreError;
use tally_core::log::LogEntry;
use uuid::Uuid;

use crate::store::{LogStore, MemoryStore};

/// [`LogStore`] decorator that counts writes, so tests can assert that
/// idempotent paths really reach the store zero times.
pub(crate) struct RecordingStore {
    inner: MemoryStore,
    creates: AtomicUsize,
    updates: AtomicUsize,
    deletes: AtomicUsize,
}

impl RecordingStore {
    pub(crate) fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            creates: AtomicUsize::new(0),
            updates: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
        }
    }

    pub(crate) fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub(crate) fn updates(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    pub(crate) fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LogStore for RecordingStore {
    async fn find_log(
        &self,
        user_id: Uuid,
        activity_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<LogEntry>, StoreError> {
        self.inner.find_log(user_id, activity_id, date).await
    }

    async fn create_log(&self, entry: LogEntry) -> Result<LogEntry, StoreError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.inner.create_log(entry).await
    }

    async fn update_log(&self, id: Uuid, value: f64) -> Result<LogEntry, StoreError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.inner.update_log(id, value).await
    }

    async fn delete_log(&self, id: Uuid) -> Result<(), StoreError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete_log(id).await
    }

    async fn logs_for_date(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<LogEntry>, StoreError> {
        self.inner.logs_for_date(user_id, date).await
    }

    async fn logs_for_week(
        &self,
        user_id: Uuid,
        week_start: NaiveDate,
    ) -> Result<Vec<LogEntry>, StoreError> {
        self.inner.logs_for_week(user_id, week_start).await
    }

    async fn logs_for_month(
        &self,
        user_id: Uuid,
        year: i32,
        month: u32,
    ) -> Result<Vec<LogEntry>, StoreError> {
        self.inner.logs_for_month(user_id, year, month).await
    }
}
