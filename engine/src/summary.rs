use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;
use tally_core::activity::Activity;
use tally_core::log::LogEntry;
use uuid::Uuid;

/// Progress of one activity against its monthly goal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityProgress {
    pub activity_id: Uuid,
    pub name: String,
    pub unit: String,
    pub goal: f64,
    /// Sum of every value logged in the month.
    pub actual: f64,
    /// Rounded percent of goal; 0 when no goal is set.
    pub percent: u32,
}

/// Activities of one category with their monthly progress.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryProgress {
    /// Raw category label; empty string means uncategorized.
    pub category: String,
    pub activities: Vec<ActivityProgress>,
}

/// One activity's values across a week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekRow {
    pub activity_id: Uuid,
    pub name: String,
    pub category: String,
    pub unit: String,
    /// Index 0 is the week start day.
    pub daily_values: [f64; 7],
    pub total: f64,
}

/// Rolls one month of entries up into per-activity goal progress, grouped by
/// category in first-appearance order.
///
/// `logs` is expected to already be scoped to the month (the store's month
/// query); entries for unknown activities are ignored.
pub fn monthly_progress(activities: &[Activity], logs: &[LogEntry]) -> Vec<CategoryProgress> {
    let mut totals: HashMap<Uuid, f64> = HashMap::new();
    for log in logs {
        *totals.entry(log.activity_id).or_insert(0.0) += log.value;
    }

    let mut groups: Vec<CategoryProgress> = Vec::new();
    for activity in activities {
        let actual = totals.get(&activity.id).copied().unwrap_or(0.0);
        let percent = if activity.goal > 0.0 {
            (actual / activity.goal * 100.0).round() as u32
        } else {
            0
        };
        let progress = ActivityProgress {
            activity_id: activity.id,
            name: activity.name.clone(),
            unit: activity.unit.clone(),
            goal: activity.goal,
            actual,
            percent,
        };

        match groups
            .iter_mut()
            .find(|group| group.category == activity.category)
        {
            Some(group) => group.activities.push(progress),
            None => groups.push(CategoryProgress {
                category: activity.category.clone(),
                activities: vec![progress],
            }),
        }
    }
    groups
}

/// Buckets one week of entries into a per-activity day grid.
///
/// Every activity gets a row, logged or not, in catalog order. Entries outside
/// the seven-day window or for unknown activities are ignored.
pub fn weekly_rows(
    activities: &[Activity],
    logs: &[LogEntry],
    week_start: NaiveDate,
) -> Vec<WeekRow> {
    let mut rows: Vec<WeekRow> = activities
        .iter()
        .map(|activity| WeekRow {
            activity_id: activity.id,
            name: activity.name.clone(),
            category: activity.category.clone(),
            unit: activity.unit.clone(),
            daily_values: [0.0; 7],
            total: 0.0,
        })
        .collect();

    for log in logs {
        let offset = log.date.signed_duration_since(week_start).num_days();
        if !(0..7).contains(&offset) {
            continue;
        }
        if let Some(row) = rows.iter_mut().find(|row| row.activity_id == log.activity_id) {
            row.daily_values[offset as usize] += log.value;
            row.total += log.value;
        }
    }
    rows
}
