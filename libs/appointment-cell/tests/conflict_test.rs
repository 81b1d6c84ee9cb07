use chrono::{DateTime, Utc};
use uuid::Uuid;

use appointment_cell::models::{Appointment, AppointmentStatus};
use appointment_cell::services::conflict::{active_conflicts, intervals_overlap};

fn at(value: &str) -> DateTime<Utc> {
    value.parse().unwrap()
}

fn appointment(start: &str, end: &str, status: AppointmentStatus) -> Appointment {
    Appointment {
        id: Uuid::new_v4(),
        patient_id: Uuid::new_v4(),
        doctor_id: 1,
        scheduled_start: at(start),
        scheduled_end: at(end),
        status,
        reason: None,
        fee: None,
        payment_status: None,
        payment_method: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[test]
fn overlap_is_half_open() {
    let nine = at("2026-08-10T09:00:00Z");
    let ten = at("2026-08-10T10:00:00Z");
    let eleven = at("2026-08-10T11:00:00Z");

    assert!(intervals_overlap(nine, ten, at("2026-08-10T09:30:00Z"), eleven));
    // Abutting windows do not overlap
    assert!(!intervals_overlap(nine, ten, ten, eleven));
    assert!(!intervals_overlap(ten, eleven, nine, ten));
}

#[test]
fn scheduled_appointment_blocks_its_window() {
    let existing = vec![appointment(
        "2026-08-10T09:00:00Z",
        "2026-08-10T09:30:00Z",
        AppointmentStatus::Scheduled,
    )];

    let conflicts = active_conflicts(
        &existing,
        at("2026-08-10T09:15:00Z"),
        at("2026-08-10T09:45:00Z"),
    );
    assert_eq!(conflicts.len(), 1);
}

#[test]
fn cancelled_and_no_show_free_their_slot() {
    let existing = vec![
        appointment(
            "2026-08-10T09:00:00Z",
            "2026-08-10T09:30:00Z",
            AppointmentStatus::Cancelled,
        ),
        appointment(
            "2026-08-10T09:00:00Z",
            "2026-08-10T09:30:00Z",
            AppointmentStatus::NoShow,
        ),
    ];

    let conflicts = active_conflicts(
        &existing,
        at("2026-08-10T09:00:00Z"),
        at("2026-08-10T09:30:00Z"),
    );
    assert!(conflicts.is_empty());
}

#[test]
fn back_to_back_bookings_are_allowed() {
    let existing = vec![appointment(
        "2026-08-10T09:00:00Z",
        "2026-08-10T09:30:00Z",
        AppointmentStatus::Scheduled,
    )];

    let conflicts = active_conflicts(
        &existing,
        at("2026-08-10T09:30:00Z"),
        at("2026-08-10T10:00:00Z"),
    );
    assert!(conflicts.is_empty());
}
