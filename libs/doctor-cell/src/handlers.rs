use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use axum_extra::TypedHeader;
use chrono::NaiveDate;
use headers::{authorization::Bearer, Authorization};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{
    AvailabilityError, CreateSlotRequest, SetSlotAvailabilityRequest, SlotValidationError,
};
use crate::services::{availability::AvailabilityService, doctor::DoctorService};

#[derive(Debug, Deserialize)]
pub struct DoctorListQuery {
    pub include_inactive: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct SlotQuery {
    pub date: NaiveDate,
    pub duration_minutes: Option<i32>,
}

fn map_availability_error(e: AvailabilityError) -> AppError {
    match e {
        AvailabilityError::Validation(SlotValidationError::OverlapConflict) => {
            AppError::Conflict(SlotValidationError::OverlapConflict.to_string())
        }
        AvailabilityError::Validation(inner) => AppError::ValidationError(inner.to_string()),
        AvailabilityError::InvalidDayOfWeek => AppError::ValidationError(e.to_string()),
        AvailabilityError::SlotNotFound => AppError::NotFound(e.to_string()),
        AvailabilityError::PersistFailed { reason, .. } => AppError::Internal(reason),
        AvailabilityError::Database(msg) => AppError::Internal(msg),
    }
}

fn require_staff(user: &User) -> Result<(), AppError> {
    match user.role.as_deref() {
        Some("admin") | Some("receptionist") | Some("doctor") => Ok(()),
        _ => Err(AppError::Auth(
            "Only clinic staff can manage availability".to_string(),
        )),
    }
}

// ==============================================================================
// PUBLIC HANDLERS (NO AUTHENTICATION REQUIRED)
// ==============================================================================

#[axum::debug_handler]
pub async fn list_doctors(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<DoctorListQuery>,
) -> Result<Json<Value>, AppError> {
    let doctor_service = DoctorService::new(&state);

    let doctors = doctor_service
        .list_doctors(query.include_inactive.unwrap_or(false), None)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!({
        "doctors": doctors,
        "total": doctors.len()
    })))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let doctor_service = DoctorService::new(&state);

    let doctor = doctor_service
        .get_doctor(doctor_id, None)
        .await
        .map_err(|_| AppError::NotFound("Doctor not found".to_string()))?;

    Ok(Json(json!(doctor)))
}

#[axum::debug_handler]
pub async fn get_bookable_slots(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<i64>,
    Query(query): Query<SlotQuery>,
) -> Result<Json<Value>, AppError> {
    let availability_service = AvailabilityService::new(&state);

    let slots = availability_service
        .bookable_slots(doctor_id, query.date, query.duration_minutes, None)
        .await
        .map_err(map_availability_error)?;

    Ok(Json(json!({
        "doctor_id": doctor_id,
        "date": query.date,
        "available_slots": slots,
        "total_slots": slots.len()
    })))
}

#[axum::debug_handler]
pub async fn get_doctor_availability(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let availability_service = AvailabilityService::new(&state);

    let slots = availability_service
        .list_slots(doctor_id, None)
        .await
        .map_err(map_availability_error)?;

    Ok(Json(json!({
        "doctor_id": doctor_id,
        "slots": slots
    })))
}

// ==============================================================================
// AVAILABILITY HANDLERS (STAFF ONLY)
// ==============================================================================

#[axum::debug_handler]
pub async fn create_availability(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<i64>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateSlotRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    require_staff(&user)?;

    let availability_service = AvailabilityService::new(&state);

    let (slot, slots) = availability_service
        .create_slot(doctor_id, request, token)
        .await
        .map_err(map_availability_error)?;

    Ok(Json(json!({
        "slot": slot,
        "slots": slots
    })))
}

#[axum::debug_handler]
pub async fn delete_availability(
    State(state): State<Arc<AppConfig>>,
    Path((doctor_id, slot_id)): Path<(i64, Uuid)>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    require_staff(&user)?;

    let availability_service = AvailabilityService::new(&state);

    let slots = availability_service
        .delete_slot(doctor_id, slot_id, token)
        .await
        .map_err(map_availability_error)?;

    Ok(Json(json!({
        "success": true,
        "slots": slots
    })))
}

#[axum::debug_handler]
pub async fn set_availability(
    State(state): State<Arc<AppConfig>>,
    Path((doctor_id, slot_id)): Path<(i64, Uuid)>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<SetSlotAvailabilityRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    require_staff(&user)?;

    let availability_service = AvailabilityService::new(&state);

    let (slot, slots) = availability_service
        .set_slot_availability(doctor_id, slot_id, request.is_available, token)
        .await
        .map_err(map_availability_error)?;

    Ok(Json(json!({
        "slot": slot,
        "slots": slots
    })))
}
