// [libs/domain/provisioning/src/engine.rs]
/*!
 * APARATO: MOTOR DE TICKS DE APROVISIONAMIENTO (ESTRATO L3)
 * RESPONSABILIDAD: AVANZAR LA MAQUINA DE ESTADOS UN PASO ACOTADO POR INVOCACION
 *
 * Cada tick realiza a lo sumo un efecto secundario externo, bajo el
 * candado advisory del tenant. Si el candado no se adquiere, el tick es
 * un no-op silencioso: el proximo poll reintentara (§4.8).
 *
 * La fila `provisioned_databases` se indexa solo por `tenant_id` (ver nota
 * en `connectbridge_models::domain`); el refresco de token necesario en
 * `start_sync` usa siempre el modo `live`, asumiendo que el aprovisionamiento
 * de una base de datos gestionada es una operacion de produccion.
 */

use crate::context::ProvisioningContext;
use crate::errors::{ProvisioningError, TickFailure};
use crate::sanitize::sanitize_error_message;
use chrono::{DateTime, Duration, Utc};
use connectbridge_control_plane::ControlPlaneError;
use connectbridge_db::repositories::provisioned_databases;
use connectbridge_db::{with_tenant_lock, DbError};
use connectbridge_models::{InstallStep, Livemode, ProvisionedDatabase, ProvisioningStatus};
use serde_json::Value;
use sqlx::PgConnection;
use tracing::{info, instrument, warn};

const VERIFY_SYNC_MINIMUM_WAIT: i64 = 3;
const SYNC_TENANT_MODE: Livemode = Livemode::Live;

pub struct TickResult {
    pub acquired: bool,
    pub row: Option<ProvisionedDatabase>,
}

#[instrument(skip(pool, ctx))]
pub async fn tick(
    pool: &sqlx::PgPool,
    ctx: &ProvisioningContext<'_>,
    tenant_id: &str,
) -> Result<TickResult, ProvisioningError> {
    let outcome =
        with_tenant_lock(pool, tenant_id, |conn| Box::pin(run_tick_locked(conn, ctx, tenant_id)))
            .await
            .map_err(|e| ProvisioningError::Internal(e.to_string()))?;

    if !outcome.acquired {
        return Ok(TickResult { acquired: false, row: None });
    }

    let row = outcome
        .value
        .expect("acquired lock always produces a value")
        .map_err(|e| ProvisioningError::Internal(e.to_string()))?;

    Ok(TickResult { acquired: true, row })
}

async fn run_tick_locked(
    conn: &mut PgConnection,
    ctx: &ProvisioningContext<'_>,
    tenant_id: &str,
) -> Result<Option<ProvisionedDatabase>, DbError> {
    let Some(row) = provisioned_databases::get_with_conn(conn, tenant_id).await? else {
        return Ok(None);
    };

    if row.is_terminal() {
        return Ok(Some(row));
    }

    let now = Utc::now();

    match advance_step(conn, ctx, tenant_id, &row, now).await {
        Ok((status, step)) => {
            provisioned_databases::advance(conn, tenant_id, status, step, None, None, None, now).await?;
        }
        Err(TickFailure::Stay) => {}
        Err(TickFailure::Terminal(message)) => {
            let sanitized = sanitize_error_message(&message);
            warn!("tenant provisioning entered error state: {}", sanitized);
            provisioned_databases::mark_error(conn, tenant_id, &sanitized, now).await?;
        }
    }

    provisioned_databases::get_with_conn(conn, tenant_id).await
}

async fn advance_step(
    conn: &mut PgConnection,
    ctx: &ProvisioningContext<'_>,
    tenant_id: &str,
    row: &ProvisionedDatabase,
    now: DateTime<Utc>,
) -> Result<(ProvisioningStatus, Option<InstallStep>), TickFailure> {
    let _ = conn; // reservado para pasos futuros que necesiten la conexion prestada

    match row.install_step {
        None | Some(InstallStep::CreateProject) | Some(InstallStep::CreateDatabase) => {
            Ok((ProvisioningStatus::Provisioning, Some(InstallStep::WaitDatabaseReady)))
        }

        Some(InstallStep::WaitDatabaseReady) => {
            match ctx
                .control_plane
                .run_query(
                    &row.project_ref,
                    "select schema_name from information_schema.schemata where schema_name = 'stripe'",
                )
                .await
            {
                Ok(rows) if schema_rows_present(&rows) => {
                    Ok((ProvisioningStatus::Installing, Some(InstallStep::ApplySchema)))
                }
                Ok(_) => {
                    if now - row.updated_at > ctx.wait_database_ready_timeout {
                        Err(TickFailure::Terminal(
                            "wait_database_ready exceeded budget: stripe schema not visible".to_string(),
                        ))
                    } else {
                        Err(TickFailure::Stay)
                    }
                }
                Err(ControlPlaneError::Upstream { status, .. }) if status == 401 || status == 403 => {
                    Err(TickFailure::Terminal(format!(
                        "readiness probe rejected: auth status={status}"
                    )))
                }
                Err(probe_fault) => {
                    if now - row.updated_at > ctx.wait_database_ready_timeout {
                        Err(TickFailure::Terminal(format!(
                            "wait_database_ready exceeded budget: {probe_fault}"
                        )))
                    } else {
                        Err(TickFailure::Stay)
                    }
                }
            }
        }

        Some(InstallStep::ApplySchema) => {
            Ok((ProvisioningStatus::Installing, Some(InstallStep::VerifyConnection)))
        }

        Some(InstallStep::VerifyConnection) => {
            Ok((ProvisioningStatus::Syncing, Some(InstallStep::StartSync)))
        }

        Some(InstallStep::StartSync) => start_sync(ctx, tenant_id).await,

        Some(InstallStep::VerifySync) => {
            if now - row.updated_at >= Duration::seconds(VERIFY_SYNC_MINIMUM_WAIT) {
                Ok((ProvisioningStatus::Ready, Some(InstallStep::Done)))
            } else {
                Err(TickFailure::Stay)
            }
        }

        Some(InstallStep::Done) => Ok((ProvisioningStatus::Ready, Some(InstallStep::Done))),
    }
}

/// El plano de control devuelve las filas de la sonda como un arreglo JSON;
/// `stripe` es visible una vez ese arreglo trae al menos una fila (§4.8).
fn schema_rows_present(rows: &Value) -> bool {
    rows.as_array().is_some_and(|rows| !rows.is_empty())
}

/// `start_sync`: refresca el token del tenant y llama al instalador con
/// `max_attempts=1`. Sin reintento desde ticks posteriores: un fallo aqui
/// escribe `error` y exige retry explicito del usuario (§4.8).
async fn start_sync(
    ctx: &ProvisioningContext<'_>,
    tenant_id: &str,
) -> Result<(ProvisioningStatus, Option<InstallStep>), TickFailure> {
    let access_token = connectbridge_refresh::get_fresh_access(
        ctx.pool,
        ctx.vault_key,
        ctx.platform,
        ctx.settings,
        tenant_id,
        SYNC_TENANT_MODE,
    )
    .await
    .map_err(|e| TickFailure::Terminal(format!("token refresh before sync failed: {e}")))?;

    ctx.sync_installer
        .install(&access_token)
        .await
        .map_err(|e| TickFailure::Terminal(format!("sync installer failed: {e}")))?;

    info!("sync installer succeeded for tenant");

    Ok((ProvisioningStatus::Syncing, Some(InstallStep::VerifySync)))
}
