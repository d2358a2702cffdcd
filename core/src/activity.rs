use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An activity a user tracks time against. Activities are the registry the
/// conversational assistant resolves names into, and the foreign key every
/// log entry hangs off.
///
/// Names are unique per user (case-insensitive). Deleting an activity deletes
/// all of its log entries with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Unique activity ID (UUIDv7 — time-sortable)
    pub id: Uuid,
    /// Owner of this activity
    pub user_id: Uuid,
    /// Display name, unique per user ignoring case
    pub name: String,
    /// Free-form grouping label. Empty string = uncategorized.
    pub category: String,
    /// Monthly goal in `unit`. Zero means no goal is set.
    pub goal: f64,
    /// Unit the value is measured in (e.g. "Hours", "Pages")
    pub unit: String,
}

/// Request to create a new activity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewActivity {
    pub name: String,
    pub category: String,
    pub goal: f64,
    pub unit: String,
}

/// Partial update to an existing activity. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivityPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}
