use chrono::{NaiveTime, Utc};
use uuid::Uuid;

use doctor_cell::models::AvailabilitySlot;
use doctor_cell::services::roster::SlotRoster;

fn slot(doctor_id: i64, day_of_week: i32, start: &str, end: &str) -> AvailabilitySlot {
    AvailabilitySlot {
        id: Uuid::new_v4(),
        doctor_id,
        day_of_week,
        start_time: NaiveTime::parse_from_str(start, "%H:%M").unwrap(),
        end_time: NaiveTime::parse_from_str(end, "%H:%M").unwrap(),
        is_available: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[test]
fn roster_orders_slots_by_day_then_start() {
    let roster = SlotRoster::new(
        1,
        vec![
            slot(1, 3, "09:00", "10:00"),
            slot(1, 1, "14:00", "15:00"),
            slot(1, 1, "08:00", "09:00"),
        ],
    );

    let days: Vec<i32> = roster.slots().iter().map(|s| s.day_of_week).collect();
    assert_eq!(days, vec![1, 1, 3]);
    assert!(roster.slots()[0].start_time < roster.slots()[1].start_time);
}

#[test]
fn insert_keeps_ordering() {
    let mut roster = SlotRoster::new(1, vec![slot(1, 1, "08:00", "09:00")]);
    roster.insert(slot(1, 1, "10:00", "11:00"));
    roster.insert(slot(1, 1, "09:00", "10:00"));

    let starts: Vec<String> = roster
        .slots()
        .iter()
        .map(|s| s.start_time.format("%H:%M").to_string())
        .collect();
    assert_eq!(starts, vec!["08:00", "09:00", "10:00"]);
}

#[test]
fn remove_returns_the_dropped_slot() {
    let first = slot(1, 1, "08:00", "09:00");
    let first_id = first.id;
    let mut roster = SlotRoster::new(1, vec![first, slot(1, 2, "08:00", "09:00")]);

    let removed = roster.remove(first_id).unwrap();
    assert_eq!(removed.id, first_id);
    assert_eq!(roster.slots().len(), 1);
    assert!(roster.remove(first_id).is_none());
}

#[test]
fn restore_reverts_a_failed_mutation() {
    let existing = slot(1, 1, "08:00", "09:00");
    let existing_id = existing.id;
    let mut roster = SlotRoster::new(1, vec![existing]);

    let snapshot = roster.snapshot();
    roster.remove(existing_id);
    assert!(roster.slots().is_empty());

    roster.restore(snapshot);
    assert_eq!(roster.slots().len(), 1);
    assert_eq!(roster.slots()[0].id, existing_id);
}

#[test]
fn set_available_flips_only_the_target() {
    let target = slot(1, 1, "08:00", "09:00");
    let target_id = target.id;
    let mut roster = SlotRoster::new(1, vec![target, slot(1, 2, "08:00", "09:00")]);

    let updated = roster.set_available(target_id, false).unwrap();
    assert!(!updated.is_available);
    assert!(roster
        .slots()
        .iter()
        .filter(|s| s.id != target_id)
        .all(|s| s.is_available));

    assert!(roster.set_available(Uuid::new_v4(), true).is_none());
}
