use crate::feed::QueueSnapshot;
use crate::protocol::Queue;

// Derived views recomputed from each snapshot. Nothing here is cached; the
// snapshot is the single source of truth between fetches.

// Aggregate numbers for an overview header.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SnapshotStats {
    pub total_waiting: u32,
    pub active_salon_count: u32,
    pub average_wait_time: f64,
}

pub fn snapshot_stats(snapshot: &QueueSnapshot) -> SnapshotStats {
    let queues: Vec<&Queue> = snapshot.queues.values().collect();
    if queues.is_empty() {
        return SnapshotStats::default();
    }

    let total: u32 = queues.iter().map(|queue| queue.average_wait_time).sum();
    SnapshotStats {
        total_waiting: queues.iter().map(|queue| queue.total_waiting).sum(),
        active_salon_count: queues.iter().filter(|queue| queue.is_active).count() as u32,
        average_wait_time: f64::from(total) / queues.len() as f64,
    }
}

// One renderable line per waiting customer, ordered by position.
#[derive(Clone, Debug, PartialEq)]
pub struct WaitingRow {
    pub salon_id: String,
    pub token_number: u32,
    pub position: u32,
    pub status_label: String,
    pub status_color: String,
    pub estimated_time: u32,
}

pub fn waiting_rows(queue: &Queue) -> Vec<WaitingRow> {
    let mut rows: Vec<WaitingRow> = queue
        .entries
        .iter()
        .filter_map(|entry| {
            entry.position.map(|position| WaitingRow {
                salon_id: queue.salon_id.clone(),
                token_number: entry.token_number,
                position,
                status_label: entry.status_label.clone(),
                status_color: entry.status_color.clone(),
                estimated_time: entry.estimated_time,
            })
        })
        .collect();
    rows.sort_by_key(|row| row.position);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::QueueEntry;

    fn queue(salon_id: &str, average_wait_time: u32, is_active: bool, waiting: u32) -> Queue {
        Queue {
            salon_id: salon_id.to_string(),
            queue_date: "2026-08-07".to_string(),
            current_number: 1,
            total_waiting: waiting,
            average_wait_time,
            is_active,
            entries: Vec::new(),
        }
    }

    fn snapshot_of(queues: Vec<Queue>) -> QueueSnapshot {
        QueueSnapshot {
            queues: queues
                .into_iter()
                .map(|queue| (queue.salon_id.clone(), queue))
                .collect(),
            fetched_at: None,
        }
    }

    #[test]
    fn when_snapshot_is_empty_then_stats_are_zero() {
        let stats = snapshot_stats(&QueueSnapshot::default());

        assert_eq!(stats, SnapshotStats::default());
    }

    #[test]
    fn when_snapshot_has_queues_then_stats_aggregate_them() {
        let snapshot = snapshot_of(vec![
            queue("salon-1", 10, true, 3),
            queue("salon-2", 20, false, 2),
        ]);

        let stats = snapshot_stats(&snapshot);

        assert_eq!(stats.total_waiting, 5);
        assert_eq!(stats.active_salon_count, 1);
        assert_eq!(stats.average_wait_time, 15.0);
    }

    #[test]
    fn when_building_rows_then_only_positioned_entries_appear_in_order() {
        let mut queue = queue("salon-1", 10, true, 2);
        queue.entries = vec![
            QueueEntry {
                booking_id: "b-1".to_string(),
                token_number: 4,
                status: "COMPLETED".to_string(),
                status_label: "Completed".to_string(),
                status_color: "green".to_string(),
                position: None,
                estimated_time: 0,
                joined_at: 100,
            },
            QueueEntry {
                booking_id: "b-2".to_string(),
                token_number: 6,
                status: "WAITING".to_string(),
                status_label: "Waiting".to_string(),
                status_color: "orange".to_string(),
                position: Some(2),
                estimated_time: 24,
                joined_at: 300,
            },
            QueueEntry {
                booking_id: "b-3".to_string(),
                token_number: 5,
                status: "WAITING".to_string(),
                status_label: "Waiting".to_string(),
                status_color: "orange".to_string(),
                position: Some(1),
                estimated_time: 12,
                joined_at: 200,
            },
        ];

        let rows = waiting_rows(&queue);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].token_number, 5);
        assert_eq!(rows[0].position, 1);
        assert_eq!(rows[1].token_number, 6);
        assert_eq!(rows[1].status_label, "Waiting");
    }
}
