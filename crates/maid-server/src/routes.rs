//! Router

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::handlers::{
    get_maid, health_check, initiate_payment, list_maids, login, submit_contact, unlock_status,
    verify_payment,
};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        // Auth
        .route("/api/auth/login", post(login))
        // Maids
        .route("/api/maids", get(list_maids))
        .route("/api/maids/{id}", get(get_maid))
        // Payments
        .route("/api/payment/initiate", post(initiate_payment))
        .route("/api/payment/verify", post(verify_payment))
        .route("/api/unlock/{maid_id}", get(unlock_status))
        // Contact form
        .route("/api/contact", post(submit_contact))
        // Static files (WASM frontend); client-side routes get the app shell
        .fallback_service(
            ServeDir::new("static").not_found_service(ServeFile::new("static/index.html")),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
