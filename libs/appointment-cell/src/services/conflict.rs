use chrono::{DateTime, Utc};

use crate::models::Appointment;

/// Two appointments overlap iff `start1 < end2 && start2 < end1`; intervals
/// are half-open, so back-to-back bookings are allowed.
pub fn intervals_overlap(
    start1: DateTime<Utc>,
    end1: DateTime<Utc>,
    start2: DateTime<Utc>,
    end2: DateTime<Utc>,
) -> bool {
    start1 < end2 && start2 < end1
}

/// Filter the given appointments down to active ones colliding with the
/// proposed window. Cancelled and no-show bookings free their slot.
pub fn active_conflicts<'a>(
    existing: &'a [Appointment],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<&'a Appointment> {
    existing
        .iter()
        .filter(|apt| {
            apt.is_active() && intervals_overlap(start, end, apt.scheduled_start, apt.scheduled_end)
        })
        .collect()
}
