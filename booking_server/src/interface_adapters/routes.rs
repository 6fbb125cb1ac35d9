use axum::{
    routing::{get, post},
    Router,
};

use crate::interface_adapters::handlers::otp::{send_code, verify_code};
use crate::interface_adapters::handlers::queue::{list_queues, queue_entry, queue_stats};
use crate::interface_adapters::state::AppState;

// Build the HTTP router for the booking API.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/otp/send", post(send_code))
        .route("/api/otp/verify", post(verify_code))
        .route("/api/queue", get(list_queues))
        .route("/api/queue/stats", get(queue_stats))
        .route("/api/queue/entry/{booking_id}", get(queue_entry))
        .with_state(state)
}
