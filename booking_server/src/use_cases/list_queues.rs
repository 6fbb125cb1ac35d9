use crate::domain::entities::Queue;
use crate::domain::errors::QueueError;
use crate::domain::ports::QueueStore;

// Live-queue listing use case. Storage failures surface as a real error here;
// only the public HTTP handler flattens them to an empty list.
pub struct ListQueuesUseCase<S> {
    pub store: S,
}

impl<S> ListQueuesUseCase<S>
where
    S: QueueStore,
{
    pub async fn execute(&self) -> Result<Vec<Queue>, QueueError> {
        let mut queues = self
            .store
            .list_active()
            .await
            .map_err(|_| QueueError::Unavailable)?;

        queues.sort_by(|a, b| a.salon_id.cmp(&b.salon_id));
        for queue in &mut queues {
            queue.entries.sort_by_key(|entry| entry.token_number);
            queue.recompute_derived();
        }

        Ok(queues)
    }
}
