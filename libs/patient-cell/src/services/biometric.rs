use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{BiometricError, CaptureOutcome, PatientError, ScannerFrame};

const DOCUMENT_BUCKET: &str = "patient-documents";

/// Decode one line from the scanner bridge. Enrollment templates stay in
/// their base64 transport form (that is how they are stored); document
/// images are decoded to bytes. Unprefixed lines are status text.
pub fn parse_frame(raw: &str) -> Result<ScannerFrame, BiometricError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(BiometricError::EmptyFrame);
    }

    if let Some(payload) = raw.strip_prefix("ENROLL:") {
        STANDARD
            .decode(payload)
            .map_err(|e| BiometricError::InvalidPayload(e.to_string()))?;
        return Ok(ScannerFrame::Enrollment {
            template: payload.to_string(),
        });
    }

    if let Some(payload) = raw.strip_prefix("IMG:") {
        let bytes = STANDARD
            .decode(payload)
            .map_err(|e| BiometricError::InvalidPayload(e.to_string()))?;
        if bytes.is_empty() {
            return Err(BiometricError::InvalidPayload("empty image".to_string()));
        }
        return Ok(ScannerFrame::DocumentImage { bytes });
    }

    Ok(ScannerFrame::Status(raw.to_string()))
}

pub struct BiometricService {
    supabase: SupabaseClient,
}

impl BiometricService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Attach a captured scanner frame to a patient record. Status frames
    /// are acknowledged but nothing is stored for them.
    pub async fn attach_frame(
        &self,
        patient_id: Uuid,
        frame: ScannerFrame,
        auth_token: &str,
    ) -> Result<CaptureOutcome, PatientError> {
        match frame {
            ScannerFrame::Enrollment { template } => {
                debug!("Storing fingerprint template for patient {}", patient_id);
                self.patch_patient(patient_id, json!({ "fingerprint_template": template }), auth_token)
                    .await?;
                Ok(CaptureOutcome::Enrolled)
            }
            ScannerFrame::DocumentImage { bytes } => {
                debug!(
                    "Storing {} byte document image for patient {}",
                    bytes.len(),
                    patient_id
                );
                let key = format!("{}.jpg", patient_id);
                let url = self
                    .supabase
                    .upload_object(DOCUMENT_BUCKET, &key, bytes, "image/jpeg", auth_token)
                    .await
                    .map_err(|e| PatientError::StorageError(e.to_string()))?;

                self.patch_patient(patient_id, json!({ "document_image_url": url }), auth_token)
                    .await?;
                Ok(CaptureOutcome::DocumentStored {
                    document_image_url: url,
                })
            }
            ScannerFrame::Status(message) => {
                debug!("Scanner status for patient {}: {}", patient_id, message);
                Ok(CaptureOutcome::Status { message })
            }
        }
    }

    async fn patch_patient(
        &self,
        patient_id: Uuid,
        update: Value,
        auth_token: &str,
    ) -> Result<(), PatientError> {
        let path = format!("/rest/v1/patients?id=eq.{}", patient_id);
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(Method::PATCH, &path, Some(auth_token), Some(update), Some(headers))
            .await
            .map_err(|e| PatientError::DatabaseError(e.to_string()))?;

        if result.is_empty() {
            warn!("Biometric update matched no patient: {}", patient_id);
            return Err(PatientError::NotFound);
        }

        Ok(())
    }
}
