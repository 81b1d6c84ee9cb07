use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{
    CaptureFrameRequest, CreatePatientRequest, PatientError, PatientSearchQuery,
    UpdatePatientRequest,
};
use crate::services::biometric::{parse_frame, BiometricService};
use crate::services::patient::PatientService;

fn map_patient_error(e: PatientError) -> AppError {
    match e {
        PatientError::NotFound => AppError::NotFound(e.to_string()),
        PatientError::EmailAlreadyExists { .. } => AppError::Conflict(e.to_string()),
        PatientError::ValidationError(msg) => AppError::ValidationError(msg),
        PatientError::StorageError(msg) => AppError::ExternalService(msg),
        PatientError::DatabaseError(msg) => AppError::Internal(msg),
    }
}

#[axum::debug_handler]
pub async fn create_patient(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<CreatePatientRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    let patient_service = PatientService::new(&state);

    let patient = patient_service
        .create_patient(request, token)
        .await
        .map_err(map_patient_error)?;

    Ok(Json(json!(patient)))
}

#[axum::debug_handler]
pub async fn get_patient(
    State(state): State<Arc<AppConfig>>,
    Path(patient_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    let patient_service = PatientService::new(&state);

    let patient = patient_service
        .get_patient(patient_id, token)
        .await
        .map_err(map_patient_error)?;

    Ok(Json(json!(patient)))
}

#[axum::debug_handler]
pub async fn update_patient(
    State(state): State<Arc<AppConfig>>,
    Path(patient_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<UpdatePatientRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    let patient_service = PatientService::new(&state);

    let patient = patient_service
        .update_patient(patient_id, request, token)
        .await
        .map_err(map_patient_error)?;

    Ok(Json(json!(patient)))
}

#[axum::debug_handler]
pub async fn search_patients(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<PatientSearchQuery>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    let patient_service = PatientService::new(&state);

    let patients = patient_service
        .search_patients(query, token)
        .await
        .map_err(map_patient_error)?;

    Ok(Json(json!({
        "patients": patients,
        "total": patients.len()
    })))
}

#[axum::debug_handler]
pub async fn capture_biometrics(
    State(state): State<Arc<AppConfig>>,
    Path(patient_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<CaptureFrameRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();

    let frame = parse_frame(&request.frame)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let biometric_service = BiometricService::new(&state);
    let outcome = biometric_service
        .attach_frame(patient_id, frame, token)
        .await
        .map_err(map_patient_error)?;

    Ok(Json(json!(outcome)))
}
