use activity_rings_core::{ActivityEngine, Category, GoalStore, SampleStoreProvider};
use chrono::{Duration, Local};
use std::sync::Arc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let provider = Arc::new(SampleStoreProvider::new());
    let now = Local::now();

    // A morning's worth of synthetic activity.
    provider
        .record(Category::Energy, now - Duration::hours(3), 120.0)
        .await;
    provider
        .record(Category::Steps, now - Duration::hours(2), 3_400.0)
        .await;
    provider
        .record(Category::Distance, now - Duration::hours(2), 1.2)
        .await;

    // And a fuller day before it.
    let yesterday = now - Duration::days(1);
    provider.record(Category::Energy, yesterday, 180.0).await;
    provider.record(Category::Steps, yesterday, 6_800.0).await;
    provider.record(Category::Distance, yesterday, 2.4).await;

    let engine = ActivityEngine::new(provider, GoalStore::ephemeral());
    engine.set_goal(Category::Steps, 6_000).await;

    engine.refresh().await;
    println!("{}", engine.displayed_day().await);
    for row in engine.reveal().await {
        println!("  {}", row.summary(row.category == Category::Steps));
    }

    engine.page_backward().await;
    println!("{}", engine.displayed_day().await);
    for row in engine.reveal().await {
        println!("  {}", row.summary(row.category == Category::Steps));
    }

    Ok(())
}
