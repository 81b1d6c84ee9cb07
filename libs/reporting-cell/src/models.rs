use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use appointment_cell::models::{AppointmentStatus, PaymentMethod, PaymentStatus};

/// One appointment's billing view, as shown on the payments report page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: i64,
    pub scheduled_start: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub fee: Option<f64>,
    pub payment_status: Option<PaymentStatus>,
    pub payment_method: Option<PaymentMethod>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentsSummary {
    pub total_billed: f64,
    pub total_collected: f64,
    pub paid_count: i64,
    pub pending_count: i64,
    pub waived_count: i64,
    pub cash_total: f64,
    pub card_total: f64,
    pub insurance_total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentsReport {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub rows: Vec<PaymentRecord>,
    pub summary: PaymentsSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub appointments_today: usize,
    pub scheduled_appointments: usize,
    pub total_patients: usize,
    pub active_doctors: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum ReportingError {
    #[error("Invalid date range: from must not be after to")]
    InvalidDateRange,

    #[error("Database error: {0}")]
    DatabaseError(String),
}
