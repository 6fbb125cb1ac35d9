use serde::Deserialize;

// Wire mirror of the queue objects served by the booking API. Status display
// attributes arrive pre-mapped from the server.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Queue {
    pub salon_id: String,
    pub queue_date: String,
    pub current_number: u32,
    pub total_waiting: u32,
    pub average_wait_time: u32,
    pub is_active: bool,
    pub entries: Vec<QueueEntry>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueEntry {
    pub booking_id: String,
    pub token_number: u32,
    pub status: String,
    pub status_label: String,
    pub status_color: String,
    #[serde(default)]
    pub position: Option<u32>,
    pub estimated_time: u32,
    pub joined_at: u64,
}

// Envelope of GET /api/queue.
#[derive(Debug, Deserialize)]
pub(crate) struct QueueListResponse {
    #[serde(default)]
    pub success: bool,
    pub data: Vec<Queue>,
}
