use crate::domain::entities::QueueEntry;
use crate::domain::errors::QueueError;
use crate::domain::ports::QueueStore;

// Lookup of the queue entry attached to a booking, active or historical.
pub struct QueueEntryUseCase<S> {
    pub store: S,
}

impl<S> QueueEntryUseCase<S>
where
    S: QueueStore,
{
    pub async fn execute(&self, booking_id: &str) -> Result<QueueEntry, QueueError> {
        self.store
            .find_entry_by_booking(booking_id)
            .await
            .map_err(|_| QueueError::Unavailable)?
            .ok_or(QueueError::EntryNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Queue, QueueStatus};
    use async_trait::async_trait;

    struct SingleEntryStore {
        entry: Option<QueueEntry>,
        should_fail: bool,
    }

    #[async_trait]
    impl QueueStore for SingleEntryStore {
        async fn list_active(&self) -> Result<Vec<Queue>, String> {
            Ok(Vec::new())
        }

        async fn find_entry_by_booking(
            &self,
            _booking_id: &str,
        ) -> Result<Option<QueueEntry>, String> {
            if self.should_fail {
                return Err("query failed".to_string());
            }
            Ok(self.entry.clone())
        }
    }

    #[tokio::test]
    async fn when_booking_has_an_entry_then_it_is_returned() {
        let entry = QueueEntry {
            booking_id: "booking-1".to_string(),
            token_number: 4,
            status: QueueStatus::Waiting,
            position: Some(2),
            estimated_time: 20,
            joined_at: 1_700_000_000,
        };
        let use_case = QueueEntryUseCase {
            store: SingleEntryStore {
                entry: Some(entry.clone()),
                should_fail: false,
            },
        };

        let found = use_case
            .execute("booking-1")
            .await
            .expect("expected lookup to succeed");

        assert_eq!(found, entry);
    }

    #[tokio::test]
    async fn when_booking_has_no_entry_then_returns_not_found() {
        let use_case = QueueEntryUseCase {
            store: SingleEntryStore {
                entry: None,
                should_fail: false,
            },
        };

        let result = use_case.execute("booking-unknown").await;

        assert_eq!(result, Err(QueueError::EntryNotFound));
    }

    #[tokio::test]
    async fn when_storage_fails_then_returns_unavailable() {
        let use_case = QueueEntryUseCase {
            store: SingleEntryStore {
                entry: None,
                should_fail: true,
            },
        };

        let result = use_case.execute("booking-1").await;

        assert_eq!(result, Err(QueueError::Unavailable));
    }
}
