use serde::{Deserialize, Serialize};

use crate::domain::entities::{Queue, QueueEntry, QueueStats};
use crate::domain::status::status_display;

// What an issued code is for. Login verification additionally reports whether
// an account exists for the phone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Purpose {
    Login,
    Register,
}

// Request payload for requesting a one-time code.
#[derive(Debug, Deserialize)]
pub struct SendCodeRequest {
    pub phone: String,
    pub purpose: Purpose,
}

// Response payload after a code was dispatched.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendCodeResponse {
    pub success: bool,
    pub message: String,
    pub expires_in: u64,
}

// Request payload for verifying a one-time code.
#[derive(Debug, Deserialize)]
pub struct VerifyCodeRequest {
    pub phone: String,
    pub otp: String,
    pub purpose: Purpose,
}

// Response payload after successful verification.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyCodeResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_exists: Option<bool>,
}

// Wire form of a salon queue.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueDto {
    pub salon_id: String,
    pub queue_date: String,
    pub current_number: u32,
    pub total_waiting: u32,
    pub average_wait_time: u32,
    pub is_active: bool,
    pub entries: Vec<QueueEntryDto>,
}

// Wire form of a queue entry, carrying the display mapping for its status.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueEntryDto {
    pub booking_id: String,
    pub token_number: u32,
    pub status: String,
    pub status_label: String,
    pub status_color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
    pub estimated_time: u32,
    pub joined_at: u64,
}

impl From<QueueEntry> for QueueEntryDto {
    fn from(entry: QueueEntry) -> Self {
        let display = status_display(&entry.status);
        Self {
            booking_id: entry.booking_id,
            token_number: entry.token_number,
            status: entry.status.as_str().to_string(),
            status_label: display.label,
            status_color: display.color,
            position: entry.position,
            estimated_time: entry.estimated_time,
            joined_at: entry.joined_at,
        }
    }
}

impl From<Queue> for QueueDto {
    fn from(queue: Queue) -> Self {
        Self {
            salon_id: queue.salon_id,
            queue_date: queue.queue_date,
            current_number: queue.current_number,
            total_waiting: queue.total_waiting,
            average_wait_time: queue.average_wait_time,
            is_active: queue.is_active,
            entries: queue.entries.into_iter().map(QueueEntryDto::from).collect(),
        }
    }
}

// Envelope for the queue listing.
#[derive(Debug, Serialize)]
pub struct QueueListResponse {
    pub success: bool,
    pub data: Vec<QueueDto>,
}

// Wire form of the aggregate queue statistics.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueStatsDto {
    pub total_waiting: u32,
    pub active_salon_count: u32,
    pub average_wait_time: f64,
}

impl From<QueueStats> for QueueStatsDto {
    fn from(stats: QueueStats) -> Self {
        Self {
            total_waiting: stats.total_waiting,
            active_salon_count: stats.active_salon_count,
            average_wait_time: stats.average_wait_time,
        }
    }
}

// Envelope for the statistics endpoint.
#[derive(Debug, Serialize)]
pub struct QueueStatsResponse {
    pub success: bool,
    pub data: QueueStatsDto,
}

// Error envelope for JSON responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}
