mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::NaiveDate;
use tally_core::activity::{Activity, ActivityPatch, NewActivity};
use tally_core::error::StoreError;
use tally_core::log::LogEntry;
use uuid::Uuid;

/// Read/write access to a user's activity catalog.
///
/// Implementations own the catalog invariants: names are unique per user
/// ignoring case and never empty, goals are finite and non-negative.
#[async_trait]
pub trait ActivityStore: Send + Sync {
    async fn list_activities(&self, user_id: Uuid) -> Result<Vec<Activity>, StoreError>;

    async fn create_activity(
        &self,
        user_id: Uuid,
        new: NewActivity,
    ) -> Result<Activity, StoreError>;

    async fn update_activity(&self, id: Uuid, patch: ActivityPatch)
    -> Result<Activity, StoreError>;

    /// Deletes the activity and every log entry recorded against it.
    async fn delete_activity(&self, id: Uuid) -> Result<(), StoreError>;

    /// Relabels every activity of `user_id` whose category is `old`.
    async fn rename_category(&self, user_id: Uuid, old: &str, new: &str)
    -> Result<(), StoreError>;

    /// Clears the label on every activity of `user_id` whose category is
    /// `name`. The activities survive, uncategorized.
    async fn remove_category(&self, user_id: Uuid, name: &str) -> Result<(), StoreError>;
}

/// Read/write access to logged values, keyed by (user, activity, date).
///
/// Writes are individually atomic. The store does not coordinate concurrent
/// read-modify-write sequences; the reconciliation engine serializes those
/// per triple.
#[async_trait]
pub trait LogStore: Send + Sync {
    async fn find_log(
        &self,
        user_id: Uuid,
        activity_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<LogEntry>, StoreError>;

    /// Inserts a fully-formed entry. Fails if an entry already exists for the
    /// same (user, activity, date) triple or the value is not storable.
    async fn create_log(&self, entry: LogEntry) -> Result<LogEntry, StoreError>;

    async fn update_log(&self, id: Uuid, value: f64) -> Result<LogEntry, StoreError>;

    async fn delete_log(&self, id: Uuid) -> Result<(), StoreError>;

    async fn logs_for_date(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<LogEntry>, StoreError>;

    /// Entries for the seven days starting at `week_start`.
    async fn logs_for_week(
        &self,
        user_id: Uuid,
        week_start: NaiveDate,
    ) -> Result<Vec<LogEntry>, StoreError>;

    async fn logs_for_month(
        &self,
        user_id: Uuid,
        year: i32,
        month: u32,
    ) -> Result<Vec<LogEntry>, StoreError>;
}
