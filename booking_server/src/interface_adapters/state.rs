use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tokio::sync::Mutex;

use crate::domain::entities::{OtpEntry, Queue, QueueEntry, QueueStatus, UserAccount};
use crate::domain::ports::{Clock, Notifier, OtpStore, QueueStore, SessionGate, UserDirectory};
use crate::use_cases::phone_locks::PhoneLocks;

// Shared application state for the HTTP handlers. Collaborators are held as
// trait objects so tests can inject fakes.
#[derive(Clone)]
pub struct AppState {
    pub codes: Arc<Mutex<HashMap<String, OtpEntry>>>,
    pub phone_locks: Arc<PhoneLocks>,
    pub notifier: Arc<dyn Notifier>,
    pub directory: Arc<dyn UserDirectory>,
    pub gate: Arc<dyn SessionGate>,
    pub queues: Arc<dyn QueueStore>,
}

// In-memory pending-code store. Process-wide and unbounded between sweeps;
// acceptable for a single-instance deployment.
#[derive(Clone)]
pub struct InMemoryOtpStore {
    pub codes: Arc<Mutex<HashMap<String, OtpEntry>>>,
}

#[async_trait]
impl OtpStore for InMemoryOtpStore {
    async fn get(&self, phone: &str) -> Result<Option<OtpEntry>, String> {
        let codes = self.codes.lock().await;
        Ok(codes.get(phone).cloned())
    }

    async fn set(&self, phone: String, entry: OtpEntry) -> Result<(), String> {
        let mut codes = self.codes.lock().await;
        codes.insert(phone, entry);
        Ok(())
    }

    async fn delete(&self, phone: &str) -> Result<bool, String> {
        let mut codes = self.codes.lock().await;
        Ok(codes.remove(phone).is_some())
    }

    async fn sweep(&self, cutoff_epoch_seconds: u64) -> Result<usize, String> {
        let mut codes = self.codes.lock().await;
        let before = codes.len();
        codes.retain(|_, entry| entry.expires_at > cutoff_epoch_seconds);
        Ok(before - codes.len())
    }
}

// System clock adapter used by the OTP use cases.
#[derive(Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_seconds(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

// PostgreSQL-backed queue reads.
#[derive(Clone)]
pub struct PostgresQueueStore {
    pub db: PgPool,
}

#[async_trait]
impl QueueStore for PostgresQueueStore {
    async fn list_active(&self) -> Result<Vec<Queue>, String> {
        let rows = sqlx::query(
            r#"
            SELECT q.salon_id,
                   q.queue_date::text AS queue_date,
                   q.current_number,
                   q.average_wait_time,
                   q.is_active,
                   e.booking_id,
                   e.token_number,
                   e.status,
                   e.estimated_time,
                   e.joined_at
            FROM queues q
            LEFT JOIN queue_entries e ON e.queue_id = q.id
            WHERE q.is_active AND q.queue_date = CURRENT_DATE
            ORDER BY q.salon_id, e.token_number
            "#,
        )
        .fetch_all(&self.db)
        .await
        .map_err(|err| err.to_string())?;

        let mut queues: Vec<Queue> = Vec::new();
        for row in rows {
            let salon_id: String = row.try_get("salon_id").map_err(|err| err.to_string())?;
            if queues.last().map(|queue| queue.salon_id.as_str()) != Some(salon_id.as_str()) {
                queues.push(Queue {
                    salon_id: salon_id.clone(),
                    queue_date: row.try_get("queue_date").map_err(|err| err.to_string())?,
                    current_number: get_u32(&row, "current_number")?,
                    total_waiting: 0,
                    average_wait_time: get_u32(&row, "average_wait_time")?,
                    is_active: row.try_get("is_active").map_err(|err| err.to_string())?,
                    entries: Vec::new(),
                });
            }

            // LEFT JOIN: queues without entries produce one all-null entry row.
            let booking_id: Option<String> =
                row.try_get("booking_id").map_err(|err| err.to_string())?;
            if let Some(booking_id) = booking_id {
                let status: String = row.try_get("status").map_err(|err| err.to_string())?;
                let joined_at: i64 = row.try_get("joined_at").map_err(|err| err.to_string())?;
                let Some(queue) = queues.last_mut() else {
                    continue;
                };
                queue.entries.push(QueueEntry {
                    booking_id,
                    token_number: get_u32(&row, "token_number")?,
                    status: QueueStatus::parse(&status),
                    position: None,
                    estimated_time: get_u32(&row, "estimated_time")?,
                    joined_at: joined_at.max(0) as u64,
                });
            }
        }

        Ok(queues)
    }

    async fn find_entry_by_booking(&self, booking_id: &str) -> Result<Option<QueueEntry>, String> {
        let row = sqlx::query(
            r#"
            SELECT e.booking_id,
                   e.token_number,
                   e.status,
                   e.estimated_time,
                   e.joined_at,
                   (SELECT COUNT(*)
                    FROM queue_entries w
                    WHERE w.queue_id = e.queue_id
                      AND w.status = 'WAITING'
                      AND w.joined_at < e.joined_at) AS ahead
            FROM queue_entries e
            WHERE e.booking_id = $1
            "#,
        )
        .bind(booking_id)
        .fetch_optional(&self.db)
        .await
        .map_err(|err| err.to_string())?;

        let Some(row) = row else {
            return Ok(None);
        };

        let status: String = row.try_get("status").map_err(|err| err.to_string())?;
        let status = QueueStatus::parse(&status);
        let ahead: i64 = row.try_get("ahead").map_err(|err| err.to_string())?;
        let joined_at: i64 = row.try_get("joined_at").map_err(|err| err.to_string())?;

        let position = if status == QueueStatus::Waiting {
            Some(ahead.max(0) as u32 + 1)
        } else {
            None
        };

        Ok(Some(QueueEntry {
            booking_id: row.try_get("booking_id").map_err(|err| err.to_string())?,
            token_number: get_u32(&row, "token_number")?,
            status,
            position,
            estimated_time: get_u32(&row, "estimated_time")?,
            joined_at: joined_at.max(0) as u64,
        }))
    }
}

fn get_u32(row: &sqlx::postgres::PgRow, column: &str) -> Result<u32, String> {
    let value: i32 = row.try_get(column).map_err(|err| err.to_string())?;
    Ok(value.max(0) as u32)
}

// PostgreSQL-backed account lookups for login verification.
#[derive(Clone)]
pub struct PostgresUserDirectory {
    pub db: PgPool,
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    async fn find_by_phone(&self, phone: &str) -> Result<Option<UserAccount>, String> {
        let row = sqlx::query("SELECT id::text AS id, phone, name FROM users WHERE phone = $1")
            .bind(phone)
            .fetch_optional(&self.db)
            .await
            .map_err(|err| err.to_string())?;

        row.map(|row| {
            Ok(UserAccount {
                id: row.try_get("id").map_err(|err: sqlx::Error| err.to_string())?,
                phone: row.try_get("phone").map_err(|err: sqlx::Error| err.to_string())?,
                name: row.try_get("name").map_err(|err: sqlx::Error| err.to_string())?,
            })
        })
        .transpose()
    }
}

// PostgreSQL-backed session check for the authenticated queue-entry route.
#[derive(Clone)]
pub struct PostgresSessionGate {
    pub db: PgPool,
}

#[async_trait]
impl SessionGate for PostgresSessionGate {
    async fn is_valid(&self, token: &str) -> Result<bool, String> {
        let row = sqlx::query(
            "SELECT EXISTS(SELECT 1 FROM sessions WHERE token = $1 AND expires_at > now()) AS live",
        )
        .bind(token)
        .fetch_one(&self.db)
        .await
        .map_err(|err| err.to_string())?;

        row.try_get("live").map_err(|err| err.to_string())
    }
}
