use chrono::NaiveTime;

use crate::models::{AvailabilitySlot, SlotValidationError};

/// Intervals are half-open `[start, end)`: two intervals overlap iff
/// `start1 < end2 && start2 < end1`. Back-to-back shifts that abut
/// (`end1 == start2`) do not conflict.
pub fn intervals_overlap(
    start1: NaiveTime,
    end1: NaiveTime,
    start2: NaiveTime,
    end2: NaiveTime,
) -> bool {
    start1 < end2 && start2 < end1
}

/// Decide whether a proposed shift is well-formed and free of conflicts
/// against the slots already registered for the same doctor and weekday.
///
/// The existing slots are passed in explicitly; the function holds no state
/// and only compares times of day. Slots toggled unavailable still occupy
/// their interval and are checked like any other.
pub fn validate_slot(
    existing: &[AvailabilitySlot],
    doctor_id: i64,
    day_of_week: i32,
    start_time: NaiveTime,
    end_time: NaiveTime,
) -> Result<(), SlotValidationError> {
    if end_time <= start_time {
        return Err(SlotValidationError::InvalidInterval);
    }

    let conflict = existing
        .iter()
        .filter(|slot| slot.doctor_id == doctor_id && slot.day_of_week == day_of_week)
        .any(|slot| intervals_overlap(start_time, end_time, slot.start_time, slot.end_time));

    if conflict {
        return Err(SlotValidationError::OverlapConflict);
    }

    Ok(())
}
