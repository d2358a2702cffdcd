use std::sync::Arc;

use tally_core::activity::Activity;
use tally_core::error::StoreError;
use uuid::Uuid;

use crate::store::ActivityStore;

/// A point-in-time snapshot of one user's activity catalog, used to turn
/// model-proposed names back into activities.
///
/// Matching is exact after case folding. That is deliberate: this method is
/// the single seam where fuzzier matching would slot in.
#[derive(Debug, Clone)]
pub struct ActivityRegistry {
    activities: Vec<Activity>,
}

impl ActivityRegistry {
    pub fn new(activities: Vec<Activity>) -> Self {
        Self { activities }
    }

    /// Snapshots the catalog for `user_id` from the store.
    pub async fn load(store: &Arc<dyn ActivityStore>, user_id: Uuid) -> Result<Self, StoreError> {
        Ok(Self::new(store.list_activities(user_id).await?))
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    /// Activity names in catalog order, for the instruction preamble.
    pub fn names(&self) -> Vec<&str> {
        self.activities
            .iter()
            .map(|activity| activity.name.as_str())
            .collect()
    }

    /// Case-insensitive exact lookup by name.
    pub fn resolve(&self, name: &str) -> Option<&Activity> {
        let folded = name.to_lowercase();
        self.activities
            .iter()
            .find(|activity| activity.name.to_lowercase() == folded)
    }
}
