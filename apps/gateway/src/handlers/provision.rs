// [apps/gateway/src/handlers/provision.rs]
//! `POST /provision` y `DELETE /provision`: altas y bajas de la base de
//! datos gestionada de un tenant (§4.10, §8 escenarios 4 y 6).

use crate::errors::ApiError;
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::Extension;
use connectbridge_control_plane::ControlPlaneError;
use connectbridge_db::repositories::provisioned_databases;
use connectbridge_db::with_tenant_lock;
use connectbridge_models::ProvisioningStatus;
use connectbridge_provisioning::start_provisioning;
use connectbridge_signature::VerifiedIdentity;
use serde_json::json;
use tracing::{instrument, warn};

#[instrument(skip(state, identity), fields(tenant_id = %identity.tenant_id))]
pub async fn handle_start(
    State(state): State<AppState>,
    Extension(identity): Extension<VerifiedIdentity>,
) -> Result<Response, ApiError> {
    let tenant_id = &identity.tenant_id;

    let existing = provisioned_databases::get(state.db.pool(), tenant_id)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    if let Some(row) = existing {
        if row.install_status != ProvisioningStatus::Error {
            return Ok((StatusCode::OK, Json(json!({ "status": "existing" }))).into_response());
        }

        provisioned_databases::delete(state.db.pool(), tenant_id)
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?;
    }

    let project_ref = start_provisioning(
        state.db.pool(),
        state.control_plane.as_ref(),
        &state.settings.encryption_key,
        tenant_id,
    )
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({ "status": "pending", "step": "create_project", "project_ref": project_ref })),
    )
        .into_response())
}

#[instrument(skip(state, identity), fields(tenant_id = %identity.tenant_id))]
pub async fn handle_deprovision(
    State(state): State<AppState>,
    Extension(identity): Extension<VerifiedIdentity>,
) -> Result<Response, ApiError> {
    let tenant_id = identity.tenant_id.clone();
    let control_plane = state.control_plane.clone();

    let outcome = with_tenant_lock(state.db.pool(), &tenant_id, move |conn| {
        let control_plane = control_plane.clone();
        let tenant_id = tenant_id.clone();
        Box::pin(async move {
            let Some(row) = provisioned_databases::get_with_conn(conn, &tenant_id).await? else {
                return Ok(DeprovisionOutcome::NotProvisioned);
            };

            if !row.project_ref.is_empty() {
                if let Err(e) = control_plane.delete_project(&row.project_ref).await {
                    warn!("external project delete failed, local row preserved: {}", e);
                    return Ok(DeprovisionOutcome::UpstreamFailed(e));
                }
            }

            provisioned_databases::delete_with_conn(conn, &tenant_id).await?;
            Ok(DeprovisionOutcome::Deleted)
        })
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))?;

    if !outcome.acquired {
        return Err(ApiError::LockBusy);
    }

    let inner = outcome
        .value
        .expect("acquired lock always produces a value")
        .map_err(|e: connectbridge_db::DbError| ApiError::Internal(e.to_string()))?;

    match inner {
        DeprovisionOutcome::NotProvisioned => {
            Ok((StatusCode::OK, Json(json!({ "status": "not_provisioned" }))).into_response())
        }
        DeprovisionOutcome::Deleted => {
            Ok((StatusCode::OK, Json(json!({ "status": "deleted" }))).into_response())
        }
        DeprovisionOutcome::UpstreamFailed(_) => Err(ApiError::Internal(
            "external project deletion failed, local state preserved".to_string(),
        )),
    }
}

enum DeprovisionOutcome {
    NotProvisioned,
    Deleted,
    UpstreamFailed(ControlPlaneError),
}
