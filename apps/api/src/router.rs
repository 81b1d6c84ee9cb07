use std::sync::Arc;

use axum::{routing::get, Router};

use appointment_cell::router::appointment_routes;
use doctor_cell::router::{availability_routes, doctor_routes};
use patient_cell::router::patient_routes;
use reporting_cell::router::report_routes;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic Operations API is running!" }))
        .nest("/doctors", doctor_routes(state.clone()))
        .nest("/doctor-availability", availability_routes(state.clone()))
        .nest("/appointments", appointment_routes(state.clone()))
        .nest("/patients", patient_routes(state.clone()))
        .nest("/reports", report_routes(state.clone()))
}
