use chrono::NaiveDate;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{
    Appointment, AppointmentError, BookAppointmentRequest, UpdateAppointmentRequest,
};
use crate::services::conflict::active_conflicts;

pub struct BookingService {
    supabase: SupabaseClient,
}

impl BookingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Book an appointment after checking the doctor's calendar for
    /// collisions with other scheduled bookings.
    pub async fn book_appointment(
        &self,
        request: BookAppointmentRequest,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        debug!(
            "Booking appointment for patient {} with doctor {} from {} to {}",
            request.patient_id, request.doctor_id, request.scheduled_start, request.scheduled_end
        );

        if request.scheduled_end <= request.scheduled_start {
            return Err(AppointmentError::InvalidTimeRange);
        }

        let existing = self
            .appointments_in_window(
                request.doctor_id,
                &request.scheduled_start.to_rfc3339(),
                &request.scheduled_end.to_rfc3339(),
                auth_token,
            )
            .await?;

        let conflicts = active_conflicts(&existing, request.scheduled_start, request.scheduled_end);
        if !conflicts.is_empty() {
            warn!(
                "Booking conflict for doctor {}: {} overlapping appointments",
                request.doctor_id,
                conflicts.len()
            );
            return Err(AppointmentError::Conflict);
        }

        let appointment_data = json!({
            "patient_id": request.patient_id,
            "doctor_id": request.doctor_id,
            "scheduled_start": request.scheduled_start.to_rfc3339(),
            "scheduled_end": request.scheduled_end.to_rfc3339(),
            "status": "scheduled",
            "reason": request.reason,
            "fee": request.fee,
            "payment_status": request.fee.map(|_| "pending"),
        });

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/appointments",
                Some(auth_token),
                Some(appointment_data),
                Some(headers),
            )
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        let appointment = Self::parse_single(result)?;
        debug!("Appointment booked with ID: {}", appointment.id);

        Ok(appointment)
    }

    pub async fn get_appointment(
        &self,
        appointment_id: Uuid,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        Self::parse_single(result).map_err(|_| AppointmentError::NotFound)
    }

    /// List a doctor's appointments, optionally narrowed to one day.
    pub async fn list_for_doctor(
        &self,
        doctor_id: i64,
        date: Option<NaiveDate>,
        auth_token: &str,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        debug!("Listing appointments for doctor {} on {:?}", doctor_id, date);

        let mut path = format!(
            "/rest/v1/appointments?doctor_id=eq.{}&order=scheduled_start.asc",
            doctor_id
        );
        if let Some(date) = date {
            let start_of_day = date.and_hms_opt(0, 0, 0).unwrap().and_utc();
            let end_of_day = date.and_hms_opt(23, 59, 59).unwrap().and_utc();
            path.push_str(&format!(
                "&scheduled_start=gte.{}&scheduled_start=lte.{}",
                start_of_day.to_rfc3339(),
                end_of_day.to_rfc3339()
            ));
        }

        self.fetch_appointments(&path, auth_token).await
    }

    pub async fn list_for_patient(
        &self,
        patient_id: Uuid,
        auth_token: &str,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        debug!("Listing appointments for patient {}", patient_id);

        let path = format!(
            "/rest/v1/appointments?patient_id=eq.{}&order=scheduled_start.desc",
            patient_id
        );
        self.fetch_appointments(&path, auth_token).await
    }

    /// Update status and payment capture fields. Status changes are refused
    /// once an appointment has reached a terminal state; payment fields can
    /// still be recorded afterwards (visits are settled at the desk).
    pub async fn update_appointment(
        &self,
        appointment_id: Uuid,
        request: UpdateAppointmentRequest,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        debug!("Updating appointment: {}", appointment_id);

        let current = self.get_appointment(appointment_id, auth_token).await?;

        if request.status.is_some() && current.is_terminal() {
            return Err(AppointmentError::TerminalStatus(current.status));
        }

        let mut update_data = serde_json::Map::new();
        if let Some(status) = request.status {
            update_data.insert("status".to_string(), json!(status));
        }
        if let Some(reason) = request.reason {
            update_data.insert("reason".to_string(), json!(reason));
        }
        if let Some(fee) = request.fee {
            update_data.insert("fee".to_string(), json!(fee));
        }
        if let Some(payment_status) = request.payment_status {
            update_data.insert("payment_status".to_string(), json!(payment_status));
        }
        if let Some(payment_method) = request.payment_method {
            update_data.insert("payment_method".to_string(), json!(payment_method));
        }

        let path = format!("/rest/v1/appointments?id=eq.{}", appointment_id);
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );

        let result: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(auth_token),
                Some(Value::Object(update_data)),
                Some(headers),
            )
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        Self::parse_single(result)
    }

    // Private helper methods

    async fn appointments_in_window(
        &self,
        doctor_id: i64,
        window_start: &str,
        window_end: &str,
        auth_token: &str,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let path = format!(
            "/rest/v1/appointments?doctor_id=eq.{}&scheduled_start=lt.{}&scheduled_end=gt.{}&order=scheduled_start.asc",
            doctor_id, window_end, window_start
        );
        self.fetch_appointments(&path, auth_token).await
    }

    async fn fetch_appointments(
        &self,
        path: &str,
        auth_token: &str,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, path, Some(auth_token), None)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Appointment>, _>>()
            .map_err(|e| AppointmentError::DatabaseError(format!("Failed to parse appointments: {}", e)))
    }

    fn parse_single(result: Vec<Value>) -> Result<Appointment, AppointmentError> {
        result
            .first()
            .cloned()
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| AppointmentError::DatabaseError(format!("Failed to parse appointment: {}", e)))?
            .ok_or(AppointmentError::NotFound)
    }
}
