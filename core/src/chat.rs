use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who authored a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// One visible turn in a diary conversation. Turns are append-only within a
/// session; the session itself is ephemeral and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: Role,
    /// Position within the session, starting at 0
    pub seq: u32,
    pub text: String,
}

/// A structured logging proposal extracted by the language capability.
/// Raw model output — nothing here has been validated yet.
///
/// Field names follow the action schema declared to the capability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingAction {
    /// Activity name as the model heard it
    #[serde(rename = "activityName")]
    pub activity_name: String,
    /// Amount in the activity's unit
    pub duration: f64,
    /// Calendar day in YYYY-MM-DD form (unparsed)
    pub date: String,
}

/// Result of resolving one `PendingAction`, fed back to the capability so it
/// can confirm with the user or ask for clarification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionOutcome {
    /// Name of the action this responds to
    pub action: String,
    pub success: bool,
    /// Acknowledgment text for the capability to relay or act on
    pub message: String,
}
