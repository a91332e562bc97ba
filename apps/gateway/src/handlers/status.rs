// [apps/gateway/src/handlers/status.rs]
//! `GET /status`: lee la fila de aprovisionamiento del tenant verificado,
//! la avanza a lo sumo un tick, y devuelve una vista normalizada (§4.10).

use crate::errors::ApiError;
use crate::state::AppState;
use axum::extract::State;
use axum::response::{IntoResponse, Json, Response};
use axum::http::StatusCode;
use connectbridge_crypto::decrypt;
use connectbridge_db::repositories::provisioned_databases;
use connectbridge_signature::VerifiedIdentity;
use serde::Serialize;
use tracing::{instrument, warn};

use axum::Extension;

#[derive(Debug, Serialize)]
struct StatusResponse {
    status: &'static str,
    step: Option<&'static str>,
    error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    connection_string: Option<String>,
    project_ref: Option<String>,
    created_at: Option<chrono::DateTime<chrono::Utc>>,
}

fn status_label(status: connectbridge_models::ProvisioningStatus) -> &'static str {
    use connectbridge_models::ProvisioningStatus::*;
    match status {
        Pending => "pending",
        Provisioning => "provisioning",
        Installing => "installing",
        Syncing => "syncing",
        Ready => "ready",
        Error => "error",
    }
}

fn step_label(step: connectbridge_models::InstallStep) -> &'static str {
    use connectbridge_models::InstallStep::*;
    match step {
        CreateProject => "create_project",
        CreateDatabase => "create_database",
        WaitDatabaseReady => "wait_database_ready",
        ApplySchema => "apply_schema",
        VerifyConnection => "verify_connection",
        StartSync => "start_sync",
        VerifySync => "verify_sync",
        Done => "done",
    }
}

#[instrument(skip(state, identity), fields(tenant_id = %identity.tenant_id))]
pub async fn handle_status(
    State(state): State<AppState>,
    Extension(identity): Extension<VerifiedIdentity>,
) -> Result<Response, ApiError> {
    let tenant_id = &identity.tenant_id;

    let existing = provisioned_databases::get(state.db.pool(), tenant_id)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let Some(mut row) = existing else {
        return Err(ApiError::Unauthorized);
    };

    if !row.is_terminal() {
        let ctx = state.provisioning_context();
        match connectbridge_provisioning::tick(state.db.pool(), &ctx, tenant_id).await {
            Ok(result) => {
                if let Some(advanced) = result.row {
                    row = advanced;
                }
            }
            Err(e) => {
                warn!("tick failed during status poll, returning prior state: {}", e);
            }
        }
    }

    let connection_string = if matches!(row.install_status, connectbridge_models::ProvisioningStatus::Ready) {
        match decrypt(&state.settings.encryption_key, &row.db_password_ciphertext) {
            Ok(password_bytes) => {
                let password = String::from_utf8_lossy(&password_bytes);
                Some(format!(
                    "postgresql://postgres.{}:{}@aws-1-{}.pooler.supabase.com:5432/postgres",
                    row.project_ref, password, row.region
                ))
            }
            Err(e) => {
                warn!("failed to decrypt stored database password: {}", e);
                None
            }
        }
    } else {
        None
    };

    let body = StatusResponse {
        status: status_label(row.install_status),
        step: row.install_step.map(step_label),
        error_message: row.error_message,
        connection_string,
        project_ref: if row.project_ref.is_empty() { None } else { Some(row.project_ref) },
        created_at: Some(row.created_at),
    };

    Ok((StatusCode::OK, Json(body)).into_response())
}
