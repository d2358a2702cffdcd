mod common;

use std::sync::Arc;

use common::{date, seed_activity};
use tally_engine::reconcile::Reconciler;
use tally_engine::registry::ActivityRegistry;
use tally_engine::store::{ActivityStore, LogStore, MemoryStore};
use tally_engine::summary::{monthly_progress, weekly_rows};
use uuid::Uuid;

#[tokio::test]
async fn monthly_progress_reflects_reconciled_values() {
    let store = Arc::new(MemoryStore::new());
    let user = Uuid::now_v7();
    let reading = seed_activity(&store, user, "Reading", "Learning", 20.0, "Hours").await;
    let guitar = seed_activity(&store, user, "Guitar", "Music", 10.0, "Hours").await;
    let reconciler = Reconciler::new(store.clone() as Arc<dyn LogStore>);

    reconciler
        .reconcile(user, reading.id, date("2024-06-03"), 2.0)
        .await
        .unwrap();
    reconciler
        .reconcile(user, reading.id, date("2024-06-12"), 3.0)
        .await
        .unwrap();
    reconciler
        .reconcile(user, guitar.id, date("2024-06-05"), 1.5)
        .await
        .unwrap();
    // Previous month, must not count towards June.
    reconciler
        .reconcile(user, reading.id, date("2024-05-31"), 4.0)
        .await
        .unwrap();

    let activity_store: Arc<dyn ActivityStore> = store.clone();
    let registry = ActivityRegistry::load(&activity_store, user).await.unwrap();
    let june = store.logs_for_month(user, 2024, 6).await.unwrap();
    let groups = monthly_progress(registry.activities(), &june);

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].category, "Learning");
    assert_eq!(groups[0].activities[0].actual, 5.0);
    assert_eq!(groups[0].activities[0].percent, 25);
    assert_eq!(groups[1].category, "Music");
    assert_eq!(groups[1].activities[0].actual, 1.5);
    assert_eq!(groups[1].activities[0].percent, 15);
}

#[tokio::test]
async fn weekly_rows_line_up_with_the_store_week_query() {
    let store = Arc::new(MemoryStore::new());
    let user = Uuid::now_v7();
    let reading = seed_activity(&store, user, "Reading", "Learning", 20.0, "Hours").await;
    let reconciler = Reconciler::new(store.clone() as Arc<dyn LogStore>);

    let week_start = date("2024-06-09"); // a Sunday
    reconciler
        .reconcile(user, reading.id, date("2024-06-09"), 1.0)
        .await
        .unwrap();
    reconciler
        .reconcile(user, reading.id, date("2024-06-11"), 2.5)
        .await
        .unwrap();
    // The following Sunday belongs to the next week's grid.
    reconciler
        .reconcile(user, reading.id, date("2024-06-16"), 9.0)
        .await
        .unwrap();

    let activity_store: Arc<dyn ActivityStore> = store.clone();
    let registry = ActivityRegistry::load(&activity_store, user).await.unwrap();
    let logs = store.logs_for_week(user, week_start).await.unwrap();
    let rows = weekly_rows(registry.activities(), &logs, week_start);

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].daily_values, [1.0, 0.0, 2.5, 0.0, 0.0, 0.0, 0.0]);
    assert_eq!(rows[0].total, 3.5);
}
