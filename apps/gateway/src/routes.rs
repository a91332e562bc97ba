// [apps/gateway/src/routes.rs]
/*!
 * APARATO: MATRIZ DE RUTEO DEL GATEWAY (ESTRATO L3)
 * RESPONSABILIDAD: ENSAMBLAR LA SUPERFICIE HTTP Y SU ESCUDO DE FIRMA
 *
 * El handshake OAuth (`/oauth/*`) vive fuera del escudo de firma: ocurre
 * antes de que exista ninguna identidad verificada que firmar (§4.5, §4.10).
 * Todo lo demas pasa por `signature_guard`.
 */

use crate::handlers::{oauth, provision, status};
use crate::middleware::signature_guard;
use crate::state::AppState;
use axum::http::{header, HeaderName, Method};
use axum::routing::{get, post};
use axum::{middleware, Router};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("stripe-app-signature"),
        ])
        .max_age(Duration::from_secs(3600));

    let guarded = Router::new()
        .route("/status", get(status::handle_status))
        .route("/provision", post(provision::handle_start).delete(provision::handle_deprovision))
        .layer(middleware::from_fn_with_state(state.clone(), signature_guard));

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/oauth/install", get(oauth::handle_install))
        .route("/oauth/callback", get(oauth::handle_callback))
        .merge(guarded)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
