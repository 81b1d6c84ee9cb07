use chrono::{Datelike, NaiveDate};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{
    AvailabilityError, AvailabilitySlot, BookableSlot, BookedInterval, CreateSlotRequest,
};
use crate::services::roster::SlotRoster;
use crate::services::slots::{expand_windows, DEFAULT_SLOT_MINUTES};
use crate::services::validation::validate_slot;

pub struct AvailabilityService {
    supabase: SupabaseClient,
}

impl AvailabilityService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Fetch a doctor's weekly shifts, ordered by day then start time.
    pub async fn list_slots(
        &self,
        doctor_id: i64,
        auth_token: Option<&str>,
    ) -> Result<Vec<AvailabilitySlot>, AvailabilityError> {
        debug!("Fetching availability for doctor: {}", doctor_id);

        let path = format!(
            "/rest/v1/availability_slots?doctor_id=eq.{}&order=day_of_week.asc,start_time.asc",
            doctor_id
        );
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, auth_token, None)
            .await
            .map_err(|e| AvailabilityError::Database(e.to_string()))?;

        let slots = result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<AvailabilitySlot>, _>>()
            .map_err(|e| AvailabilityError::Database(format!("Failed to parse slots: {}", e)))?;

        Ok(slots)
    }

    /// Register a new shift. The proposed interval is validated against the
    /// freshly loaded roster before anything is sent to the store; on success
    /// the created slot and the updated roster are returned together.
    pub async fn create_slot(
        &self,
        doctor_id: i64,
        request: CreateSlotRequest,
        auth_token: &str,
    ) -> Result<(AvailabilitySlot, Vec<AvailabilitySlot>), AvailabilityError> {
        debug!(
            "Creating availability for doctor {} on day {}",
            doctor_id, request.day_of_week
        );

        if !(1..=7).contains(&request.day_of_week) {
            return Err(AvailabilityError::InvalidDayOfWeek);
        }

        let mut roster = self.load_roster(doctor_id, Some(auth_token)).await?;

        validate_slot(
            roster.slots(),
            doctor_id,
            request.day_of_week,
            request.start_time,
            request.end_time,
        )?;

        let slot_data = json!({
            "doctor_id": doctor_id,
            "day_of_week": request.day_of_week,
            "start_time": request.start_time.format("%H:%M:%S").to_string(),
            "end_time": request.end_time.format("%H:%M:%S").to_string(),
            "is_available": request.is_available.unwrap_or(true),
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
                "/rest/v1/availability_slots",
                Some(auth_token),
                Some(slot_data),
                Some(headers),
            )
            .await
            .map_err(|e| AvailabilityError::Database(e.to_string()))?;

        let created: AvailabilitySlot = result
            .first()
            .cloned()
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| AvailabilityError::Database(format!("Failed to parse slot: {}", e)))?
            .ok_or_else(|| AvailabilityError::Database("Failed to create slot".to_string()))?;

        debug!("Availability slot created with ID: {}", created.id);

        roster.insert(created.clone());
        Ok((created, roster.into_slots()))
    }

    /// Remove a shift. The roster copy drops the slot immediately; if the
    /// store rejects the delete the snapshot is restored before the error
    /// propagates.
    pub async fn delete_slot(
        &self,
        doctor_id: i64,
        slot_id: Uuid,
        auth_token: &str,
    ) -> Result<Vec<AvailabilitySlot>, AvailabilityError> {
        debug!("Deleting availability slot {} for doctor {}", slot_id, doctor_id);

        let mut roster = self.load_roster(doctor_id, Some(auth_token)).await?;
        let snapshot = roster.snapshot();

        if roster.remove(slot_id).is_none() {
            return Err(AvailabilityError::SlotNotFound);
        }

        let path = format!(
            "/rest/v1/availability_slots?id=eq.{}&doctor_id=eq.{}",
            slot_id, doctor_id
        );
        match self
            .supabase
            .request::<Vec<Value>>(Method::DELETE, &path, Some(auth_token), None)
            .await
        {
            Ok(_) => Ok(roster.into_slots()),
            Err(e) => {
                warn!("Delete of slot {} failed, restoring roster: {}", slot_id, e);
                roster.restore(snapshot);
                Err(AvailabilityError::PersistFailed {
                    reason: e.to_string(),
                    restored: roster.into_slots(),
                })
            }
        }
    }

    /// Flip a shift's `is_available` toggle, optimistically with revert.
    pub async fn set_slot_availability(
        &self,
        doctor_id: i64,
        slot_id: Uuid,
        is_available: bool,
        auth_token: &str,
    ) -> Result<(AvailabilitySlot, Vec<AvailabilitySlot>), AvailabilityError> {
        debug!(
            "Setting slot {} for doctor {} to is_available={}",
            slot_id, doctor_id, is_available
        );

        let mut roster = self.load_roster(doctor_id, Some(auth_token)).await?;
        let snapshot = roster.snapshot();

        if roster.set_available(slot_id, is_available).is_none() {
            return Err(AvailabilityError::SlotNotFound);
        }

        let path = format!(
            "/rest/v1/availability_slots?id=eq.{}&doctor_id=eq.{}",
            slot_id, doctor_id
        );
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );

        let update = json!({ "is_available": is_available });

        match self
            .supabase
            .request_with_headers::<Vec<Value>>(
                Method::PATCH,
                &path,
                Some(auth_token),
                Some(update),
                Some(headers),
            )
            .await
        {
            Ok(result) => {
                let updated: AvailabilitySlot = result
                    .first()
                    .cloned()
                    .map(serde_json::from_value)
                    .transpose()
                    .map_err(|e| {
                        AvailabilityError::Database(format!("Failed to parse slot: {}", e))
                    })?
                    .ok_or(AvailabilityError::SlotNotFound)?;

                roster.replace(updated.clone());
                Ok((updated, roster.into_slots()))
            }
            Err(e) => {
                warn!("Toggle of slot {} failed, restoring roster: {}", slot_id, e);
                roster.restore(snapshot);
                Err(AvailabilityError::PersistFailed {
                    reason: e.to_string(),
                    restored: roster.into_slots(),
                })
            }
        }
    }

    /// Compute the concrete bookable slots for a doctor on a date: expand
    /// that weekday's open shifts and drop anything colliding with a
    /// scheduled appointment.
    pub async fn bookable_slots(
        &self,
        doctor_id: i64,
        date: NaiveDate,
        duration_minutes: Option<i32>,
        auth_token: Option<&str>,
    ) -> Result<Vec<BookableSlot>, AvailabilityError> {
        let day_of_week = date.weekday().number_from_monday() as i32;
        debug!(
            "Calculating bookable slots for doctor {} on {} (day {})",
            doctor_id, date, day_of_week
        );

        let path = format!(
            "/rest/v1/availability_slots?doctor_id=eq.{}&day_of_week=eq.{}&is_available=eq.true&order=start_time.asc",
            doctor_id, day_of_week
        );
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, auth_token, None)
            .await
            .map_err(|e| AvailabilityError::Database(e.to_string()))?;

        let windows = result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<AvailabilitySlot>, _>>()
            .map_err(|e| AvailabilityError::Database(format!("Failed to parse slots: {}", e)))?;

        let booked = self.appointments_for_date(doctor_id, date, auth_token).await?;

        let duration = duration_minutes.unwrap_or(DEFAULT_SLOT_MINUTES);
        let slots = expand_windows(&windows, date, duration, &booked);

        debug!("Found {} bookable slots", slots.len());
        Ok(slots)
    }

    // Private helper methods

    async fn load_roster(
        &self,
        doctor_id: i64,
        auth_token: Option<&str>,
    ) -> Result<SlotRoster, AvailabilityError> {
        let slots = self.list_slots(doctor_id, auth_token).await?;
        Ok(SlotRoster::new(doctor_id, slots))
    }

    async fn appointments_for_date(
        &self,
        doctor_id: i64,
        date: NaiveDate,
        auth_token: Option<&str>,
    ) -> Result<Vec<BookedInterval>, AvailabilityError> {
        let start_of_day = date.and_hms_opt(0, 0, 0).unwrap().and_utc();
        let end_of_day = date.and_hms_opt(23, 59, 59).unwrap().and_utc();

        let path = format!(
            "/rest/v1/appointments?doctor_id=eq.{}&scheduled_start=gte.{}&scheduled_start=lte.{}&select=scheduled_start,scheduled_end,status&order=scheduled_start.asc",
            doctor_id,
            start_of_day.to_rfc3339(),
            end_of_day.to_rfc3339()
        );

        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, auth_token, None)
            .await
            .map_err(|e| AvailabilityError::Database(e.to_string()))?;

        let booked = result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<BookedInterval>, _>>()
            .map_err(|e| {
                AvailabilityError::Database(format!("Failed to parse appointments: {}", e))
            })?;

        Ok(booked)
    }
}
