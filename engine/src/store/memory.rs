use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use tally_core::activity::{Activity, ActivityPatch, NewActivity};
use tally_core::error::StoreError;
use tally_core::log::{LogEntry, value_clears};
use uuid::Uuid;

use super::{ActivityStore, LogStore};

/// In-memory reference store backing both the activity catalog and the log.
///
/// Construction is explicit and per-process (typically per test) — state is
/// never ambient. Real persistence lives behind the same traits elsewhere.
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    activities: Vec<Activity>,
    logs: Vec<LogEntry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the trimmed name, rejecting empties and per-user duplicates.
/// `exclude` skips the activity being updated when checking for clashes.
fn valid_name(
    activities: &[Activity],
    user_id: Uuid,
    name: &str,
    exclude: Option<Uuid>,
) -> Result<String, StoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(StoreError::validation("name", "must not be empty"));
    }
    let folded = trimmed.to_lowercase();
    let clash = activities.iter().any(|activity| {
        activity.user_id == user_id
            && exclude != Some(activity.id)
            && activity.name.to_lowercase() == folded
    });
    if clash {
        return Err(StoreError::validation(
            "name",
            format!("an activity named '{trimmed}' already exists"),
        ));
    }
    Ok(trimmed.to_string())
}

fn valid_goal(goal: f64) -> Result<f64, StoreError> {
    if !goal.is_finite() || goal < 0.0 {
        return Err(StoreError::validation(
            "goal",
            "must be a non-negative number",
        ));
    }
    Ok(goal)
}

#[async_trait]
impl ActivityStore for MemoryStore {
    async fn list_activities(&self, user_id: Uuid) -> Result<Vec<Activity>, StoreError> {
        let inner = self.inner.read().unwrap_or_else(|poison| poison.into_inner());
        Ok(inner
            .activities
            .iter()
            .filter(|activity| activity.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_activity(
        &self,
        user_id: Uuid,
        new: NewActivity,
    ) -> Result<Activity, StoreError> {
        let mut inner = self.inner.write().unwrap_or_else(|poison| poison.into_inner());
        let name = valid_name(&inner.activities, user_id, &new.name, None)?;
        let goal = valid_goal(new.goal)?;
        let activity = Activity {
            id: Uuid::now_v7(),
            user_id,
            name,
            category: new.category.trim().to_string(),
            goal,
            unit: new.unit,
        };
        inner.activities.push(activity.clone());
        Ok(activity)
    }

    async fn update_activity(
        &self,
        id: Uuid,
        patch: ActivityPatch,
    ) -> Result<Activity, StoreError> {
        let mut inner = self.inner.write().unwrap_or_else(|poison| poison.into_inner());
        let user_id = inner
            .activities
            .iter()
            .find(|activity| activity.id == id)
            .map(|activity| activity.user_id)
            .ok_or(StoreError::ActivityNotFound(id))?;

        let name = match &patch.name {
            Some(name) => Some(valid_name(&inner.activities, user_id, name, Some(id))?),
            None => None,
        };
        let goal = match patch.goal {
            Some(goal) => Some(valid_goal(goal)?),
            None => None,
        };

        let activity = inner
            .activities
            .iter_mut()
            .find(|activity| activity.id == id)
            .ok_or(StoreError::ActivityNotFound(id))?;
        if let Some(name) = name {
            activity.name = name;
        }
        if let Some(category) = patch.category {
            activity.category = category.trim().to_string();
        }
        if let Some(goal) = goal {
            activity.goal = goal;
        }
        if let Some(unit) = patch.unit {
            activity.unit = unit;
        }
        Ok(activity.clone())
    }

    async fn delete_activity(&self, id: Uuid) -> Result<(), StoreError> {
        let mut inner = self.inner.write().unwrap_or_else(|poison| poison.into_inner());
        let before = inner.activities.len();
        inner.activities.retain(|activity| activity.id != id);
        if inner.activities.len() == before {
            return Err(StoreError::ActivityNotFound(id));
        }
        // Entries must not outlive their activity.
        inner.logs.retain(|log| log.activity_id != id);
        Ok(())
    }

    async fn rename_category(
        &self,
        user_id: Uuid,
        old: &str,
        new: &str,
    ) -> Result<(), StoreError> {
        let new = new.trim();
        if new.is_empty() {
            return Err(StoreError::validation("category", "must not be empty"));
        }
        let mut inner = self.inner.write().unwrap_or_else(|poison| poison.into_inner());
        for activity in &mut inner.activities {
            if activity.user_id == user_id && activity.category == old {
                activity.category = new.to_string();
            }
        }
        Ok(())
    }

    async fn remove_category(&self, user_id: Uuid, name: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write().unwrap_or_else(|poison| poison.into_inner());
        for activity in &mut inner.activities {
            if activity.user_id == user_id && activity.category == name {
                activity.category = String::new();
            }
        }
        Ok(())
    }
}

#[async_trait]
impl LogStore for MemoryStore {
    async fn find_log(
        &self,
        user_id: Uuid,
        activity_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<LogEntry>, StoreError> {
        let inner = self.inner.read().unwrap_or_else(|poison| poison.into_inner());
        Ok(inner
            .logs
            .iter()
            .find(|log| {
                log.user_id == user_id && log.activity_id == activity_id && log.date == date
            })
            .cloned())
    }

    async fn create_log(&self, entry: LogEntry) -> Result<LogEntry, StoreError> {
        if value_clears(entry.value) {
            return Err(StoreError::validation(
                "value",
                "must be a positive number",
            ));
        }
        let mut inner = self.inner.write().unwrap_or_else(|poison| poison.into_inner());
        let occupied = inner.logs.iter().any(|log| {
            log.user_id == entry.user_id
                && log.activity_id == entry.activity_id
                && log.date == entry.date
        });
        if occupied {
            return Err(StoreError::validation(
                "date",
                "an entry for this activity and date already exists",
            ));
        }
        inner.logs.push(entry.clone());
        Ok(entry)
    }

    async fn update_log(&self, id: Uuid, value: f64) -> Result<LogEntry, StoreError> {
        if value_clears(value) {
            return Err(StoreError::validation(
                "value",
                "must be a positive number",
            ));
        }
        let mut inner = self.inner.write().unwrap_or_else(|poison| poison.into_inner());
        let log = inner
            .logs
            .iter_mut()
            .find(|log| log.id == id)
            .ok_or(StoreError::LogNotFound(id))?;
        log.value = value;
        Ok(log.clone())
    }

    async fn delete_log(&self, id: Uuid) -> Result<(), StoreError> {
        let mut inner = self.inner.write().unwrap_or_else(|poison| poison.into_inner());
        let before = inner.logs.len();
        inner.logs.retain(|log| log.id != id);
        if inner.logs.len() == before {
            return Err(StoreError::LogNotFound(id));
        }
        Ok(())
    }

    async fn logs_for_date(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<LogEntry>, StoreError> {
        let inner = self.inner.read().unwrap_or_else(|poison| poison.into_inner());
        Ok(inner
            .logs
            .iter()
            .filter(|log| log.user_id == user_id && log.date == date)
            .cloned()
            .collect())
    }

    async fn logs_for_week(
        &self,
        user_id: Uuid,
        week_start: NaiveDate,
    ) -> Result<Vec<LogEntry>, StoreError> {
        let inner = self.inner.read().unwrap_or_else(|poison| poison.into_inner());
        Ok(inner
            .logs
            .iter()
            .filter(|log| {
                let offset = log.date.signed_duration_since(week_start).num_days();
                log.user_id == user_id && (0..7).contains(&offset)
            })
            .cloned()
            .collect())
    }

    async fn logs_for_month(
        &self,
        user_id: Uuid,
        year: i32,
        month: u32,
    ) -> Result<Vec<LogEntry>, StoreError> {
        let inner = self.inner.read().unwrap_or_else(|poison| poison.into_inner());
        Ok(inner
            .logs
            .iter()
            .filter(|log| {
                log.user_id == user_id && log.date.year() == year && log.date.month() == month
            })
            .cloned()
            .collect())
    }
}
