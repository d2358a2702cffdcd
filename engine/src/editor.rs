use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tally_core::error::StoreError;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::debounce::Debouncer;
use crate::reconcile::Reconciler;
use crate::store::LogStore;

/// One editing session over a user's log values for a single day.
///
/// Every keystroke lands here as raw text. Snapshots of the whole field map
/// ride through a [`Debouncer`]; once a snapshot quiesces, each field is
/// parsed and reconciled — but only where the parsed value differs from what
/// is persisted, so retyping the same number costs nothing.
pub struct DayEditor {
    fields: HashMap<Uuid, String>,
    debouncer: Debouncer<HashMap<Uuid, String>>,
    flusher: JoinHandle<()>,
}

impl DayEditor {
    /// Opens an editing session for (user, date), prefilled from the store.
    pub async fn open(
        user_id: Uuid,
        date: NaiveDate,
        store: Arc<dyn LogStore>,
        reconciler: Arc<Reconciler>,
        config: &EngineConfig,
    ) -> Result<Self, StoreError> {
        let mut fields = HashMap::new();
        for entry in store.logs_for_date(user_id, date).await? {
            fields.insert(entry.activity_id, entry.value.to_string());
        }

        let (debouncer, delivered) = Debouncer::new(config.debounce_window);
        let flusher = tokio::spawn(flush_loop(user_id, date, store, reconciler, delivered));

        Ok(Self {
            fields,
            debouncer,
            flusher,
        })
    }

    /// Records a keystroke-level edit to one activity's field and re-arms the
    /// quiet window for the whole map.
    pub fn set_field(&mut self, activity_id: Uuid, raw: impl Into<String>) {
        self.fields.insert(activity_id, raw.into());
        self.debouncer.observe(self.fields.clone());
    }

    /// Current raw text for one activity's field.
    pub fn field(&self, activity_id: Uuid) -> Option<&str> {
        self.fields.get(&activity_id).map(String::as_str)
    }

    /// Ends the session. Snapshots already past their quiet window are flushed
    /// before this returns; edits still inside the window are discarded, never
    /// half-flushed.
    pub async fn close(self) {
        drop(self.debouncer);
        let _ = self.flusher.await;
    }
}

async fn flush_loop(
    user_id: Uuid,
    date: NaiveDate,
    store: Arc<dyn LogStore>,
    reconciler: Arc<Reconciler>,
    mut delivered: mpsc::UnboundedReceiver<HashMap<Uuid, String>>,
) {
    while let Some(snapshot) = delivered.recv().await {
        flush(user_id, date, &store, &reconciler, snapshot).await;
    }
}

/// Persists one quiesced snapshot. Fields are independent: a failure on one is
/// logged and the rest proceed.
async fn flush(
    user_id: Uuid,
    date: NaiveDate,
    store: &Arc<dyn LogStore>,
    reconciler: &Reconciler,
    snapshot: HashMap<Uuid, String>,
) {
    for (activity_id, raw) in snapshot {
        let value = parse_field(&raw);
        let persisted = match store.find_log(user_id, activity_id, date).await {
            Ok(found) => found,
            Err(err) => {
                tracing::warn!(error = %err, %activity_id, "field lookup failed, skipping");
                continue;
            }
        };
        if persisted.as_ref().is_some_and(|entry| entry.value == value) {
            continue;
        }
        if let Err(err) = reconciler.reconcile(user_id, activity_id, date, value).await {
            tracing::warn!(error = %err, %activity_id, "failed to persist edited value");
        }
    }
}

/// Parses raw field text. Anything that is not a number, an emptied field
/// included, counts as 0, which downstream means "clear the entry".
fn parse_field(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_nan() => 0.0,
        Ok(value) => value,
        Err(_) => 0.0,
    }
}
