use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One logged value for a (user, activity, date) triple. At most one entry
/// exists per triple; writing a clearing value removes the entry instead of
/// storing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Unique entry ID (UUIDv7 — time-sortable)
    pub id: Uuid,
    /// Owner of this entry
    pub user_id: Uuid,
    /// Activity the value was logged against
    pub activity_id: Uuid,
    /// Calendar day the value belongs to
    pub date: NaiveDate,
    /// Amount in the activity's unit. Always positive and finite in storage.
    pub value: f64,
}

/// Whether a written value means "remove the entry" rather than "store this".
/// Zero, negatives, NaN and infinities all clear: an emptied or unparseable
/// field is the same gesture as entering 0.
pub fn value_clears(value: f64) -> bool {
    !value.is_finite() || value <= 0.0
}
