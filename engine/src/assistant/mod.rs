mod capability;
mod prompt;

pub use capability::{Capability, CapabilityRequest, CapabilityResponse, TranscriptItem};
pub use prompt::{LOG_ACTIVITY_ACTION, log_activity_schema, system_instruction};

use std::sync::Arc;

use chrono::NaiveDate;
use tally_core::chat::{ActionOutcome, ChatMessage, PendingAction, Role};
use tally_core::error::SessionError;
use tokio::sync::watch;
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::reconcile::Reconciler;
use crate::registry::ActivityRegistry;

/// First assistant turn of every session.
pub const GREETING: &str = "Hi! Tell me what you've been working on, and I'll log it for you.";

/// Assistant turn appended when a capability call fails or the call budget
/// runs out mid-resolution.
pub const CAPABILITY_FAILURE_NOTICE: &str = "Sorry, I ran into an error. Please try that again.";

/// Notice a presenter can show when a session cannot start because the user
/// has no activities yet.
pub const NO_ACTIVITIES_NOTICE: &str = "You don't have any activities yet. Please add some in \
the 'Activities' tab before using the AI diary.";

/// Where a session currently is in its turn cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Idle, waiting for the next user message.
    AwaitingUserInput,
    /// A capability call is in flight.
    ModelThinking,
    /// Proposals from the last response are being resolved against the
    /// registry and the log store.
    ResolvingAction,
}

/// A conversational logging session for one user.
///
/// Each user turn runs the extraction loop: invoke the capability, resolve any
/// structured proposals it makes, feed the outcomes back, and repeat until it
/// answers in plain language. Proposal resolutions write through the same
/// [`Reconciler`] the direct-entry path uses.
///
/// The session is ephemeral: dropping it loses the conversation, and nothing
/// here is persisted.
pub struct DiarySession {
    user_id: Uuid,
    today: NaiveDate,
    registry: ActivityRegistry,
    capability: Arc<dyn Capability>,
    reconciler: Arc<Reconciler>,
    max_capability_calls: u32,
    phase: watch::Sender<SessionPhase>,
    transcript: Vec<TranscriptItem>,
    messages: Vec<ChatMessage>,
    next_seq: u32,
}

impl DiarySession {
    /// Opens a session and greets the user.
    ///
    /// Refuses with [`SessionError::NoActivities`] when the registry snapshot
    /// is empty — with nothing to resolve against, every extraction would
    /// dead-end. `today` is injected rather than read from the clock so the
    /// instruction preamble is deterministic.
    pub fn start(
        user_id: Uuid,
        today: NaiveDate,
        registry: ActivityRegistry,
        capability: Arc<dyn Capability>,
        reconciler: Arc<Reconciler>,
        config: &EngineConfig,
    ) -> Result<Self, SessionError> {
        if registry.is_empty() {
            return Err(SessionError::NoActivities);
        }
        tracing::info!(%user_id, activities = registry.len(), "diary session started");
        let mut session = Self {
            user_id,
            today,
            registry,
            capability,
            reconciler,
            max_capability_calls: config.max_capability_calls,
            phase: watch::channel(SessionPhase::AwaitingUserInput).0,
            transcript: Vec::new(),
            messages: Vec::new(),
            next_seq: 0,
        };
        session.append(Role::Assistant, GREETING.to_string());
        Ok(session)
    }

    /// Runs one full user turn and returns the assistant turn that closed it.
    ///
    /// Unknown activity names, bad proposal dates, capability failures and an
    /// exhausted call budget are all absorbed into the conversation itself.
    /// The only hard failure is a store error while applying a resolved
    /// proposal.
    pub async fn send(&mut self, text: impl Into<String>) -> Result<ChatMessage, SessionError> {
        let text = text.into();
        self.append(Role::User, text.clone());
        self.transcript.push(TranscriptItem::User(text));
        self.set_phase(SessionPhase::ModelThinking);

        let mut calls = 0u32;
        let reply = loop {
            if calls >= self.max_capability_calls {
                tracing::warn!(
                    calls,
                    "capability call budget exhausted mid-resolution, aborting turn"
                );
                break None;
            }
            calls += 1;

            let request = CapabilityRequest {
                instructions: system_instruction(self.today, &self.registry),
                action_schema: log_activity_schema(),
                transcript: self.transcript.clone(),
            };
            match self.capability.respond(request).await {
                Ok(CapabilityResponse::Reply(text)) => break Some(text),
                Ok(CapabilityResponse::Proposals(proposals)) if proposals.is_empty() => {
                    // A response with no actions and no text reads as an
                    // empty reply.
                    break Some(String::new());
                }
                Ok(CapabilityResponse::Proposals(proposals)) => {
                    self.set_phase(SessionPhase::ResolvingAction);
                    let mut outcomes = Vec::with_capacity(proposals.len());
                    for proposal in &proposals {
                        match self.resolve(proposal).await {
                            Ok(outcome) => outcomes.push(outcome),
                            Err(err) => {
                                self.set_phase(SessionPhase::AwaitingUserInput);
                                return Err(err);
                            }
                        }
                    }
                    self.transcript.push(TranscriptItem::Proposals(proposals));
                    self.transcript.push(TranscriptItem::ActionResults(outcomes));
                    self.set_phase(SessionPhase::ModelThinking);
                }
                Err(err) => {
                    tracing::warn!(error = %err, "capability call failed, aborting turn");
                    break None;
                }
            }
        };

        let message = match reply {
            Some(text) => {
                self.transcript.push(TranscriptItem::Assistant(text.clone()));
                self.append(Role::Assistant, text)
            }
            // The failure notice is shown to the user but kept out of the
            // protocol transcript, so the next turn replays a clean history.
            None => self.append(Role::Assistant, CAPABILITY_FAILURE_NOTICE.to_string()),
        };
        self.set_phase(SessionPhase::AwaitingUserInput);
        Ok(message)
    }

    /// Resolves one proposal: name lookup, date parse, then reconciliation.
    /// Misses come back as failure outcomes for the capability to relay;
    /// only store failures are hard errors.
    async fn resolve(&self, proposal: &PendingAction) -> Result<ActionOutcome, SessionError> {
        let Some(activity) = self.registry.resolve(&proposal.activity_name) else {
            return Ok(ActionOutcome {
                action: LOG_ACTIVITY_ACTION.to_string(),
                success: false,
                message: format!(
                    "Could not find an activity named '{}'. Please ask the user to clarify \
which of the available activities they meant.",
                    proposal.activity_name
                ),
            });
        };

        let Ok(date) = proposal.date.parse::<NaiveDate>() else {
            return Ok(ActionOutcome {
                action: LOG_ACTIVITY_ACTION.to_string(),
                success: false,
                message: format!(
                    "'{}' is not a date in YYYY-MM-DD format. Please call the function again \
with the date spelled out that way.",
                    proposal.date
                ),
            });
        };

        self.reconciler
            .reconcile(self.user_id, activity.id, date, proposal.duration)
            .await?;

        Ok(ActionOutcome {
            action: LOG_ACTIVITY_ACTION.to_string(),
            success: true,
            message: format!(
                "Successfully logged {} {} for {} on {}.",
                proposal.duration, activity.unit, activity.name, proposal.date
            ),
        })
    }

    fn append(&mut self, role: Role, text: String) -> ChatMessage {
        let message = ChatMessage {
            id: Uuid::now_v7(),
            role,
            seq: self.next_seq,
            text,
        };
        self.next_seq += 1;
        self.messages.push(message.clone());
        message
    }

    fn set_phase(&self, phase: SessionPhase) {
        self.phase.send_replace(phase);
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn phase(&self) -> SessionPhase {
        *self.phase.borrow()
    }

    /// Live view of the phase. Mid-turn values (`ModelThinking`,
    /// `ResolvingAction`) are only ever current while [`send`](Self::send) is
    /// running; a presenter can drive a busy indicator off this.
    pub fn phase_changes(&self) -> watch::Receiver<SessionPhase> {
        self.phase.subscribe()
    }

    /// Visible turns, oldest first.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Protocol view of the conversation, including action traffic.
    pub fn transcript(&self) -> &[TranscriptItem] {
        &self.transcript
    }
}
