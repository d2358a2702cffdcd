#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use tally_core::activity::{Activity, NewActivity};
use tally_core::chat::PendingAction;
use tally_core::error::CapabilityError;
use tally_engine::assistant::{
    Capability, CapabilityRequest, CapabilityResponse, DiarySession,
};
use tally_engine::config::EngineConfig;
use tally_engine::reconcile::Reconciler;
use tally_engine::registry::ActivityRegistry;
use tally_engine::store::{ActivityStore, LogStore, MemoryStore};
use uuid::Uuid;

pub fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

/// The fixed "today" every session in these tests runs under.
pub fn today() -> NaiveDate {
    date("2024-06-10")
}

pub async fn seed_activity(
    store: &MemoryStore,
    user_id: Uuid,
    name: &str,
    category: &str,
    goal: f64,
    unit: &str,
) -> Activity {
    store
        .create_activity(
            user_id,
            NewActivity {
                name: name.to_string(),
                category: category.to_string(),
                goal,
                unit: unit.to_string(),
            },
        )
        .await
        .unwrap()
}

pub fn proposal(name: &str, duration: f64, date: &str) -> PendingAction {
    PendingAction {
        activity_name: name.to_string(),
        duration,
        date: date.to_string(),
    }
}

/// Opens a session over `store` with the default config and a scripted
/// capability, anchored at [`today`].
pub async fn start_session(
    store: &Arc<MemoryStore>,
    capability: Arc<ScriptedCapability>,
    user_id: Uuid,
) -> DiarySession {
    let activity_store: Arc<dyn ActivityStore> = store.clone();
    let registry = ActivityRegistry::load(&activity_store, user_id)
        .await
        .unwrap();
    DiarySession::start(
        user_id,
        today(),
        registry,
        capability,
        Arc::new(Reconciler::new(store.clone() as Arc<dyn LogStore>)),
        &EngineConfig::defaults(),
    )
    .unwrap()
}

/// Capability stub that replays a fixed script of responses and records every
/// request it receives. An exhausted script fails the call, which makes a test
/// that over-asks fail loudly instead of hanging on a default reply.
pub struct ScriptedCapability {
    script: Mutex<VecDeque<Result<CapabilityResponse, CapabilityError>>>,
    requests: Mutex<Vec<CapabilityRequest>>,
}

impl ScriptedCapability {
    pub fn new(script: Vec<Result<CapabilityResponse, CapabilityError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Every request seen so far, oldest first.
    pub fn requests(&self) -> Vec<CapabilityRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Capability for ScriptedCapability {
    async fn respond(
        &self,
        request: CapabilityRequest,
    ) -> Result<CapabilityResponse, CapabilityError> {
        self.requests.lock().unwrap().push(request);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(CapabilityError::Unavailable("script exhausted".to_string())))
    }
}
