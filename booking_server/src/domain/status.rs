use crate::domain::entities::QueueStatus;

// Display attributes for a queue status as rendered by clients.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusDisplay {
    pub label: String,
    pub color: String,
}

// Total mapping from status to display attributes. Unknown statuses pass
// through as their own label so the mapping never fails.
pub fn status_display(status: &QueueStatus) -> StatusDisplay {
    let (label, color) = match status {
        QueueStatus::Waiting => ("Waiting", "orange"),
        QueueStatus::Called => ("Called", "blue"),
        QueueStatus::InService => ("In Service", "purple"),
        QueueStatus::Completed => ("Completed", "green"),
        QueueStatus::NoShow => ("No Show", "red"),
        QueueStatus::Other(raw) => (raw.as_str(), "gray"),
    };

    StatusDisplay {
        label: label.to_string(),
        color: color.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_status_is_known_then_label_and_color_are_fixed() {
        let cases = [
            (QueueStatus::Waiting, "Waiting", "orange"),
            (QueueStatus::Called, "Called", "blue"),
            (QueueStatus::InService, "In Service", "purple"),
            (QueueStatus::Completed, "Completed", "green"),
            (QueueStatus::NoShow, "No Show", "red"),
        ];

        for (status, label, color) in cases {
            let display = status_display(&status);
            assert_eq!(display.label, label);
            assert_eq!(display.color, color);
        }
    }

    #[test]
    fn when_status_is_unknown_then_it_maps_to_itself() {
        let display = status_display(&QueueStatus::Other("ON_HOLD".to_string()));

        assert_eq!(display.label, "ON_HOLD");
        assert_eq!(display.color, "gray");
    }
}
