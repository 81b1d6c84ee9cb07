use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub specialty: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Doctor {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A recurring weekly shift during which a doctor accepts appointments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    pub id: Uuid,
    pub doctor_id: i64,
    pub day_of_week: i32, // 1 = Monday .. 7 = Sunday
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSlotRequest {
    pub day_of_week: i32,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_available: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetSlotAvailabilityRequest {
    pub is_available: bool,
}

/// Appointment row reduced to the fields slot expansion needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookedInterval {
    pub scheduled_start: DateTime<Utc>,
    pub scheduled_end: DateTime<Utc>,
    pub status: String,
}

/// A concrete bookable interval on a given date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookableSlot {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_minutes: i32,
}

/// The two rejection kinds of the slot validator. The validator never
/// panics and performs no I/O; a rejection blocks submission upstream.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlotValidationError {
    #[error("End time must be after start time")]
    InvalidInterval,

    #[error("This time slot overlaps with an existing shift")]
    OverlapConflict,
}

#[derive(Debug, thiserror::Error)]
pub enum AvailabilityError {
    #[error(transparent)]
    Validation(#[from] SlotValidationError),

    #[error("Day of week must be between 1 (Monday) and 7 (Sunday)")]
    InvalidDayOfWeek,

    #[error("Availability slot not found")]
    SlotNotFound,

    /// The store rejected an optimistic mutation; `restored` is the roster
    /// after the local change was rolled back.
    #[error("Failed to persist change: {reason}")]
    PersistFailed {
        reason: String,
        restored: Vec<AvailabilitySlot>,
    },

    #[error("Database error: {0}")]
    Database(String),
}
