use async_trait::async_trait;
use serde_json::Value;
use tally_core::chat::{ActionOutcome, PendingAction};
use tally_core::error::CapabilityError;

/// One item of the conversation as replayed to the capability: the visible
/// turns plus the structured action traffic from earlier resolution rounds.
#[derive(Debug, Clone)]
pub enum TranscriptItem {
    User(String),
    Assistant(String),
    /// Structured proposals the capability made in an earlier response.
    Proposals(Vec<PendingAction>),
    /// Results for those proposals, in the same order.
    ActionResults(Vec<ActionOutcome>),
}

/// What the capability produced for one invocation.
#[derive(Debug, Clone)]
pub enum CapabilityResponse {
    /// Natural-language reply. Ends the resolution loop for this turn.
    Reply(String),
    /// Structured logging proposals to resolve before the conversation
    /// continues.
    Proposals(Vec<PendingAction>),
}

/// Everything the capability gets for one invocation.
#[derive(Debug, Clone)]
pub struct CapabilityRequest {
    /// System preamble: today's date, known activity names, extraction rules.
    pub instructions: String,
    /// Schema of the one action the capability may invoke.
    pub action_schema: Value,
    /// Full conversation so far, oldest first.
    pub transcript: Vec<TranscriptItem>,
}

/// The language model behind the diary, reduced to a single call.
///
/// Implementations own transport, decoding and any retry policy; the session
/// treats one call as one non-cancellable unit of work and never retries on
/// its own.
#[async_trait]
pub trait Capability: Send + Sync {
    async fn respond(
        &self,
        request: CapabilityRequest,
    ) -> Result<CapabilityResponse, CapabilityError>;
}
