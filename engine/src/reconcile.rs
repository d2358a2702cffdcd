use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use tally_core::error::StoreError;
use tally_core::log::{LogEntry, value_clears};
use uuid::Uuid;

use crate::store::LogStore;

type Triple = (Uuid, Uuid, NaiveDate);

/// Synchronizes candidate values into the log store.
///
/// Debounced field edits and resolved assistant actions alike go through
/// [`Reconciler::reconcile`], which decides between create, update, delete
/// and no-op. The engine does not validate activity existence; callers
/// resolve activities first.
pub struct Reconciler {
    store: Arc<dyn LogStore>,
    /// One async lock per triple with a reconciliation in flight. Entries are
    /// created on demand and pruned once the last holder lets go, so the map
    /// tracks current work, not every triple ever written.
    locks: Mutex<HashMap<Triple, Arc<tokio::sync::Mutex<()>>>>,
}

impl Reconciler {
    pub fn new(store: Arc<dyn LogStore>) -> Self {
        Self {
            store,
            locks: Mutex::new(HashMap::new()),
        }
    }

    fn triple_lock(&self, triple: Triple) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|poison| poison.into_inner());
        locks.entry(triple).or_default().clone()
    }

    /// Drops the triple's lock entry when nothing else holds it. Waiters keep
    /// their own clones alive, so a contended lock stays in the map until the
    /// last of them is done and prunes it itself.
    fn prune_lock(&self, triple: Triple) {
        let mut locks = self.locks.lock().unwrap_or_else(|poison| poison.into_inner());
        if locks.get(&triple).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            locks.remove(&triple);
        }
    }

    /// Applies `value` to the entry for (user, activity, date) and returns the
    /// entry as persisted afterwards, `None` when nothing is stored.
    ///
    /// - clearing value (zero, negative, non-finite) with an entry present:
    ///   the entry is deleted
    /// - clearing value with no entry: nothing happens
    /// - entry present with a different value: updated in place, same id
    /// - entry present with the same value: no write at all
    /// - no entry and a positive value: created under a fresh id
    ///
    /// The read-modify-write is atomic per triple; distinct triples proceed
    /// concurrently.
    pub async fn reconcile(
        &self,
        user_id: Uuid,
        activity_id: Uuid,
        date: NaiveDate,
        value: f64,
    ) -> Result<Option<LogEntry>, StoreError> {
        let triple = (user_id, activity_id, date);
        let lock = self.triple_lock(triple);
        let result = {
            let _guard = lock.lock().await;
            self.apply(user_id, activity_id, date, value).await
        };
        drop(lock);
        self.prune_lock(triple);
        result
    }

    /// The read-modify-write itself. The caller holds the triple's lock.
    async fn apply(
        &self,
        user_id: Uuid,
        activity_id: Uuid,
        date: NaiveDate,
        value: f64,
    ) -> Result<Option<LogEntry>, StoreError> {
        match self.store.find_log(user_id, activity_id, date).await? {
            Some(existing) if value_clears(value) => {
                self.store.delete_log(existing.id).await?;
                tracing::debug!(%activity_id, %date, "cleared log entry");
                Ok(None)
            }
            Some(existing) if existing.value != value => {
                let updated = self.store.update_log(existing.id, value).await?;
                tracing::debug!(%activity_id, %date, value, "updated log entry");
                Ok(Some(updated))
            }
            // Unchanged value: idempotent, no write reaches the store.
            Some(existing) => Ok(Some(existing)),
            None if value_clears(value) => Ok(None),
            None => {
                let created = self
                    .store
                    .create_log(LogEntry {
                        id: Uuid::now_v7(),
                        user_id,
                        activity_id,
                        date,
                        value,
                    })
                    .await?;
                tracing::debug!(%activity_id, %date, value, "created log entry");
                Ok(Some(created))
            }
        }
    }
}
