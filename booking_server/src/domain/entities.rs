// Pending one-time code for a phone number. The phone itself is the store
// key, so it does not live on the entry.
#[derive(Clone, Debug, PartialEq)]
pub struct OtpEntry {
    pub code: String,
    pub expires_at: u64,
    // Issuance requests within the current rate window, not verification
    // attempts.
    pub attempts: u32,
}

// One salon's queue for one calendar date.
#[derive(Clone, Debug, PartialEq)]
pub struct Queue {
    pub salon_id: String,
    pub queue_date: String,
    pub current_number: u32,
    pub total_waiting: u32,
    pub average_wait_time: u32,
    pub is_active: bool,
    pub entries: Vec<QueueEntry>,
}

// A single customer's slot within a salon queue.
#[derive(Clone, Debug, PartialEq)]
pub struct QueueEntry {
    pub booking_id: String,
    pub token_number: u32,
    pub status: QueueStatus,
    // Derived: 1-based rank among WAITING entries ordered by join time.
    pub position: Option<u32>,
    pub estimated_time: u32,
    pub joined_at: u64,
}

// Queue entry status as stored. Unknown values from storage are carried
// through rather than rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueueStatus {
    Waiting,
    Called,
    InService,
    Completed,
    NoShow,
    Other(String),
}

impl QueueStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "WAITING" => QueueStatus::Waiting,
            "CALLED" => QueueStatus::Called,
            "IN_SERVICE" => QueueStatus::InService,
            "COMPLETED" => QueueStatus::Completed,
            "NO_SHOW" => QueueStatus::NoShow,
            other => QueueStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            QueueStatus::Waiting => "WAITING",
            QueueStatus::Called => "CALLED",
            QueueStatus::InService => "IN_SERVICE",
            QueueStatus::Completed => "COMPLETED",
            QueueStatus::NoShow => "NO_SHOW",
            QueueStatus::Other(raw) => raw,
        }
    }
}

impl Queue {
    // Re-derive the state the entries imply: waiting count and per-entry
    // positions. Storage counters are not trusted here.
    pub fn recompute_derived(&mut self) {
        for entry in &mut self.entries {
            entry.position = None;
        }

        let mut waiting: Vec<usize> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.status == QueueStatus::Waiting)
            .map(|(index, _)| index)
            .collect();
        waiting.sort_by_key(|&index| self.entries[index].joined_at);

        for (rank, &index) in waiting.iter().enumerate() {
            self.entries[index].position = Some(rank as u32 + 1);
        }
        self.total_waiting = waiting.len() as u32;
    }
}

// Aggregate view over all active queues.
#[derive(Clone, Debug, PartialEq)]
pub struct QueueStats {
    pub total_waiting: u32,
    pub active_salon_count: u32,
    pub average_wait_time: f64,
}

impl QueueStats {
    pub fn from_queues(queues: &[Queue]) -> Self {
        let total_waiting = queues.iter().map(|queue| queue.total_waiting).sum();
        let active_salon_count = queues.iter().filter(|queue| queue.is_active).count() as u32;
        let average_wait_time = if queues.is_empty() {
            0.0
        } else {
            let total: u32 = queues.iter().map(|queue| queue.average_wait_time).sum();
            f64::from(total) / queues.len() as f64
        };

        Self {
            total_waiting,
            active_salon_count,
            average_wait_time,
        }
    }
}

// Account record returned by the user directory.
#[derive(Clone, Debug)]
pub struct UserAccount {
    pub id: String,
    pub phone: String,
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(booking_id: &str, token: u32, status: QueueStatus, joined_at: u64) -> QueueEntry {
        QueueEntry {
            booking_id: booking_id.to_string(),
            token_number: token,
            status,
            position: None,
            estimated_time: 10,
            joined_at,
        }
    }

    fn queue(salon_id: &str, average_wait_time: u32, is_active: bool) -> Queue {
        Queue {
            salon_id: salon_id.to_string(),
            queue_date: "2026-08-07".to_string(),
            current_number: 0,
            total_waiting: 0,
            average_wait_time,
            is_active,
            entries: Vec::new(),
        }
    }

    #[test]
    fn when_entries_mix_statuses_then_positions_rank_waiting_by_join_time() {
        let mut queue = queue("salon-1", 10, true);
        queue.entries = vec![
            entry("b-1", 1, QueueStatus::Completed, 100),
            entry("b-2", 2, QueueStatus::Waiting, 300),
            entry("b-3", 3, QueueStatus::Waiting, 200),
            entry("b-4", 4, QueueStatus::Called, 150),
        ];

        queue.recompute_derived();

        assert_eq!(queue.total_waiting, 2);
        assert_eq!(queue.entries[0].position, None);
        assert_eq!(queue.entries[1].position, Some(2));
        assert_eq!(queue.entries[2].position, Some(1));
        assert_eq!(queue.entries[3].position, None);
    }

    #[test]
    fn when_stored_waiting_count_is_stale_then_recompute_overwrites_it() {
        let mut queue = queue("salon-1", 10, true);
        queue.total_waiting = 99;
        queue.entries = vec![entry("b-1", 1, QueueStatus::Waiting, 100)];

        queue.recompute_derived();

        assert_eq!(queue.total_waiting, 1);
    }

    #[test]
    fn when_queue_list_is_empty_then_stats_are_zero() {
        let stats = QueueStats::from_queues(&[]);

        assert_eq!(stats.total_waiting, 0);
        assert_eq!(stats.active_salon_count, 0);
        assert_eq!(stats.average_wait_time, 0.0);
    }

    #[test]
    fn when_queues_mix_active_flags_then_average_spans_all_and_count_spans_active() {
        let queues = vec![queue("salon-1", 10, true), queue("salon-2", 20, false)];

        let stats = QueueStats::from_queues(&queues);

        assert_eq!(stats.average_wait_time, 15.0);
        assert_eq!(stats.active_salon_count, 1);
    }

    #[test]
    fn when_status_round_trips_through_strings_then_known_values_map_back() {
        for raw in ["WAITING", "CALLED", "IN_SERVICE", "COMPLETED", "NO_SHOW"] {
            assert_eq!(QueueStatus::parse(raw).as_str(), raw);
        }
    }

    #[test]
    fn when_status_is_unknown_then_it_is_carried_through() {
        let status = QueueStatus::parse("ON_HOLD");

        assert_eq!(status, QueueStatus::Other("ON_HOLD".to_string()));
        assert_eq!(status.as_str(), "ON_HOLD");
    }
}
