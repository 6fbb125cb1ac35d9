use std::sync::Arc;
use std::time::Duration;

use queue_client::display::{snapshot_stats, waiting_rows};
use queue_client::{HttpQueueSource, QueueFeed, DEFAULT_POLL_INTERVAL};

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

// Terminal watcher: subscribes to the live-queue feed and prints every
// snapshot until interrupted.
#[tokio::main]
async fn main() {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();
    init_tracing();

    let base_url = std::env::var("QUEUE_API_URL")
        .unwrap_or_else(|_| "http://127.0.0.1:3004".to_string());

    let source = match HttpQueueSource::new(&base_url, Duration::from_millis(1500)) {
        Ok(source) => source,
        Err(error) => {
            tracing::error!(%error, "failed to build queue source");
            return;
        }
    };

    let feed = QueueFeed::new(Arc::new(source));
    let _subscription = feed
        .subscribe(|snapshot| {
            let stats = snapshot_stats(snapshot);
            println!(
                "-- {} salons active, {} waiting, avg wait {:.1} min",
                stats.active_salon_count, stats.total_waiting, stats.average_wait_time
            );
            for queue in snapshot.queues.values() {
                for row in waiting_rows(queue) {
                    println!(
                        "   {} #{:<3} pos {} ~{} min [{}]",
                        row.salon_id,
                        row.token_number,
                        row.position,
                        row.estimated_time,
                        row.status_label
                    );
                }
            }
        })
        .await;

    tracing::info!(%base_url, "watching live queues");
    feed.start_polling(DEFAULT_POLL_INTERVAL).await;

    if tokio::signal::ctrl_c().await.is_err() {
        tracing::error!("failed to listen for shutdown signal");
    }
    feed.stop_polling().await;
}
