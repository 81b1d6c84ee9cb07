use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub national_id: Option<String>,
    pub fingerprint_template: Option<String>,
    pub document_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn age(&self) -> i32 {
        let today = chrono::Utc::now().date_naive();
        today.years_since(self.date_of_birth).unwrap_or(0) as i32
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePatientRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub national_id: Option<String>,
    pub fingerprint_template: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePatientRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub gender: Option<String>,
    pub national_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientSearchQuery {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub national_id: Option<String>,
    pub limit: Option<i32>,
    pub offset: Option<i32>,
}

/// A decoded message from the desk-side fingerprint/document scanner
/// bridge. The bridge speaks a line protocol of prefixed frames:
/// `ENROLL:<base64 template>`, `IMG:<base64 image>`, anything else is a
/// human-readable status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScannerFrame {
    Enrollment { template: String },
    DocumentImage { bytes: Vec<u8> },
    Status(String),
}

/// Result of attaching a captured frame to a patient record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CaptureOutcome {
    Enrolled,
    DocumentStored { document_image_url: String },
    Status { message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureFrameRequest {
    pub frame: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum PatientError {
    #[error("Patient not found")]
    NotFound,

    #[error("Patient with email {email} already exists")]
    EmailAlreadyExists { email: String },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Document storage error: {0}")]
    StorageError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BiometricError {
    #[error("Empty scanner frame")]
    EmptyFrame,

    #[error("Invalid scanner payload: {0}")]
    InvalidPayload(String),
}
