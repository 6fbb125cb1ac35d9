pub mod display;
pub mod feed;
pub mod protocol;
pub mod source;

pub use feed::{QueueFeed, QueueSnapshot, Subscription, DEFAULT_POLL_INTERVAL, FRESHNESS_WINDOW};
pub use source::{FetchError, HttpQueueSource, QueueSource};
