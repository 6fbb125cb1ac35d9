use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::protocol::Queue;
use crate::source::QueueSource;

// Default polling cadence.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);
// How long a snapshot counts as fresh for consumers.
pub const FRESHNESS_WINDOW: Duration = Duration::from_secs(5);

type SubscriberFn = Box<dyn Fn(&QueueSnapshot) + Send + Sync>;

// Point-in-time queue state, keyed by salon. Replaced wholesale on every
// fetch; consumers recompute derived views from it each time.
#[derive(Clone, Debug, Default)]
pub struct QueueSnapshot {
    pub queues: HashMap<String, Queue>,
    pub fetched_at: Option<Instant>,
}

impl QueueSnapshot {
    fn from_queues(queues: Vec<Queue>) -> Self {
        Self {
            queues: queues
                .into_iter()
                .map(|queue| (queue.salon_id.clone(), queue))
                .collect(),
            fetched_at: Some(Instant::now()),
        }
    }

    pub fn is_fresh(&self) -> bool {
        self.fresh_within(FRESHNESS_WINDOW)
    }

    // Consumers with their own staleness budget layer it here instead of
    // running a second timer.
    pub fn fresh_within(&self, max_age: Duration) -> bool {
        matches!(self.fetched_at, Some(at) if at.elapsed() <= max_age)
    }
}

struct FeedInner {
    subscribers: Mutex<HashMap<u64, SubscriberFn>>,
    next_subscriber_id: AtomicU64,
    snapshot: Mutex<QueueSnapshot>,
    poller: Mutex<Option<JoinHandle<()>>>,
}

// Observable queue feed. Constructed once at startup and passed by reference
// to consumers; there is no hidden global instance.
pub struct QueueFeed {
    source: Arc<dyn QueueSource>,
    inner: Arc<FeedInner>,
}

impl QueueFeed {
    pub fn new(source: Arc<dyn QueueSource>) -> Self {
        Self {
            source,
            inner: Arc::new(FeedInner {
                subscribers: Mutex::new(HashMap::new()),
                next_subscriber_id: AtomicU64::new(0),
                snapshot: Mutex::new(QueueSnapshot::default()),
                poller: Mutex::new(None),
            }),
        }
    }

    // Register a listener invoked on every completed fetch. All subscribers
    // are notified from the same fetch; none triggers its own.
    pub async fn subscribe(
        &self,
        callback: impl Fn(&QueueSnapshot) + Send + Sync + 'static,
    ) -> Subscription {
        let id = self.inner.next_subscriber_id.fetch_add(1, Ordering::Relaxed);
        let mut subscribers = self.inner.subscribers.lock().await;
        subscribers.insert(id, Box::new(callback));

        Subscription {
            id,
            inner: Arc::clone(&self.inner),
        }
    }

    // Fetch immediately, then on every interval tick. There is exactly one
    // polling authority per feed: starting again replaces the previous
    // poller rather than stacking a second timer.
    pub async fn start_polling(&self, interval: Duration) {
        let mut poller = self.inner.poller.lock().await;
        if let Some(previous) = poller.take() {
            previous.abort();
        }

        let source = Arc::clone(&self.source);
        let inner = Arc::clone(&self.inner);
        *poller = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                // The first tick completes immediately.
                ticker.tick().await;
                poll_once(&source, &inner).await;
            }
        }));
    }

    // Stop the polling loop. Subscribers stay registered.
    pub async fn stop_polling(&self) {
        let mut poller = self.inner.poller.lock().await;
        if let Some(handle) = poller.take() {
            handle.abort();
        }
    }

    // The latest snapshot, fresh or not.
    pub async fn snapshot(&self) -> QueueSnapshot {
        self.inner.snapshot.lock().await.clone()
    }

    // One fetch-and-fan-out cycle on the caller's task.
    pub async fn refresh(&self) {
        poll_once(&self.source, &self.inner).await;
    }
}

// A fetch failure is swallowed: subscribers still receive a (then empty)
// snapshot so consuming views never hang on a dead fetch.
async fn poll_once(source: &Arc<dyn QueueSource>, inner: &Arc<FeedInner>) {
    let queues = match source.fetch_queues().await {
        Ok(queues) => queues,
        Err(error) => {
            tracing::warn!(%error, "queue fetch failed, delivering empty snapshot");
            Vec::new()
        }
    };

    let snapshot = QueueSnapshot::from_queues(queues);
    *inner.snapshot.lock().await = snapshot.clone();

    // Callbacks run under the registry lock; they must not re-enter the feed.
    let subscribers = inner.subscribers.lock().await;
    for callback in subscribers.values() {
        callback(&snapshot);
    }
}

// Handle returned by subscribe; dropping it without unsubscribing leaves the
// callback registered for the feed's lifetime.
pub struct Subscription {
    id: u64,
    inner: Arc<FeedInner>,
}

impl Subscription {
    pub async fn unsubscribe(self) {
        let mut subscribers = self.inner.subscribers.lock().await;
        subscribers.remove(&self.id);
    }
}
