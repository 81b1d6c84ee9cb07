use chrono::{Duration, NaiveDate};

use crate::models::{AvailabilitySlot, BookableSlot, BookedInterval};

pub const DEFAULT_SLOT_MINUTES: i32 = 30;

fn blocks_booking(interval: &BookedInterval) -> bool {
    interval.status == "scheduled"
}

/// Expand a day's availability windows into fixed-duration bookable slots,
/// skipping any slot that overlaps a scheduled appointment. Overlap uses the
/// same half-open `[start, end)` rule as shift validation.
pub fn expand_windows(
    windows: &[AvailabilitySlot],
    date: NaiveDate,
    duration_minutes: i32,
    booked: &[BookedInterval],
) -> Vec<BookableSlot> {
    let step = Duration::minutes(duration_minutes as i64);
    let mut slots = Vec::new();

    for window in windows.iter().filter(|window| window.is_available) {
        let mut current = date.and_time(window.start_time).and_utc();
        let window_end = date.and_time(window.end_time).and_utc();

        while current + step <= window_end {
            let slot_end = current + step;

            let taken = booked.iter().any(|interval| {
                blocks_booking(interval)
                    && current < interval.scheduled_end
                    && interval.scheduled_start < slot_end
            });

            if !taken {
                slots.push(BookableSlot {
                    start_time: current,
                    end_time: slot_end,
                    duration_minutes,
                });
            }

            current = slot_end;
        }
    }

    slots.sort_by(|a, b| a.start_time.cmp(&b.start_time));
    slots
}
