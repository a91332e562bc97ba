// [apps/gateway/src/handlers/oauth.rs]
//! Extremos publicos sin autenticacion de firma: el handshake OAuth ocurre
//! antes de que exista ninguna identidad verificada que firmar (§4.6, §6).

use crate::errors::ApiError;
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use connectbridge_models::Livemode;
use connectbridge_oauth_flow::{callback, install, OAuthFlowError};
use serde::Deserialize;
use tracing::{info, instrument, warn};

#[derive(Debug, Deserialize)]
pub struct InstallQuery {
    mode: String,
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    code: String,
    state: Option<String>,
    account_hint: Option<String>,
}

fn parse_mode(raw: &str) -> Result<Livemode, ApiError> {
    match raw {
        "test" => Ok(Livemode::Test),
        "live" => Ok(Livemode::Live),
        other => Err(ApiError::MalformedRequest(format!("unknown mode: {other}"))),
    }
}

#[instrument(skip(state))]
pub async fn handle_install(
    State(state): State<AppState>,
    Query(query): Query<InstallQuery>,
) -> Result<Response, ApiError> {
    let mode = parse_mode(&query.mode)?;

    let authorize_url = install(state.db.pool(), &state.settings, mode)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    info!("redirecting to platform authorize endpoint for mode {}", mode);
    Ok((StatusCode::FOUND, [(header::LOCATION, authorize_url)]).into_response())
}

#[instrument(skip(state, query), fields(has_state = query.state.is_some()))]
pub async fn handle_callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Result<Response, ApiError> {
    let outcome = callback(
        state.db.pool(),
        &state.settings.encryption_key,
        &state.platform,
        &state.settings,
        &query.code,
        query.state.as_deref(),
        query.account_hint.as_deref(),
    )
    .await
    .map_err(|e| match e {
        OAuthFlowError::InvalidState => ApiError::InvalidState,
        OAuthFlowError::MalformedRequest(detail) => ApiError::MalformedRequest(detail),
        OAuthFlowError::ExchangeFailed => {
            warn!("token exchange failed during callback");
            ApiError::Internal("token exchange failed".to_string())
        }
        OAuthFlowError::Internal(detail) => ApiError::Internal(detail),
    })?;

    Ok(Html(connectbridge_oauth_flow::render_success(&outcome.tenant_id)).into_response())
}
