use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn doctor_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::list_doctors))
        .route("/{doctor_id}", get(handlers::get_doctor))
        .route("/{doctor_id}/slots", get(handlers::get_bookable_slots))
        .with_state(state)
}

pub fn availability_routes(state: Arc<AppConfig>) -> Router {
    // Reading a doctor's weekly schedule is public; managing it is not
    let public_routes = Router::new().route("/{doctor_id}", get(handlers::get_doctor_availability));

    let protected_routes = Router::new()
        .route("/{doctor_id}", post(handlers::create_availability))
        .route("/{doctor_id}/{slot_id}", delete(handlers::delete_availability))
        .route("/{doctor_id}/{slot_id}", patch(handlers::set_availability))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
