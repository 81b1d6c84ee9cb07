use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use axum_extra::TypedHeader;
use chrono::{NaiveDate, Utc};
use headers::{authorization::Bearer, Authorization};
use serde::Deserialize;
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::ReportingError;
use crate::services::dashboard::DashboardService;
use crate::services::payments::PaymentsReportService;

#[derive(Debug, Deserialize)]
pub struct PaymentsReportQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub date: Option<NaiveDate>,
}

fn map_reporting_error(e: ReportingError) -> AppError {
    match e {
        ReportingError::InvalidDateRange => AppError::ValidationError(e.to_string()),
        ReportingError::DatabaseError(msg) => AppError::Database(msg),
    }
}

#[axum::debug_handler]
pub async fn payments_report(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<PaymentsReportQuery>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    let report_service = PaymentsReportService::new(&state);

    let report = report_service
        .payments_report(query.from, query.to, token)
        .await
        .map_err(map_reporting_error)?;

    Ok(Json(json!(report)))
}

#[axum::debug_handler]
pub async fn dashboard_summary(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<DashboardQuery>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    let dashboard_service = DashboardService::new(&state);

    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let summary = dashboard_service
        .dashboard_summary(date, token)
        .await
        .map_err(map_reporting_error)?;

    Ok(Json(json!(summary)))
}
