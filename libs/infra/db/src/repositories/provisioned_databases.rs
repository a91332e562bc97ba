// [libs/infra/db/src/repositories/provisioned_databases.rs]
//! CRUD sobre `provisioned_databases`: la fila que el motor de
//! aprovisionamiento muta en cada tick (§4.8). Las escrituras de este
//! modulo se invocan siempre desde dentro de `with_tenant_lock`.

use crate::errors::DbError;
use chrono::{DateTime, Utc};
use connectbridge_models::{InstallStep, ProvisionedDatabase, ProvisioningStatus};
use sqlx::{PgConnection, PgPool, Row};

fn status_to_text(status: ProvisioningStatus) -> &'static str {
    match status {
        ProvisioningStatus::Pending => "pending",
        ProvisioningStatus::Provisioning => "provisioning",
        ProvisioningStatus::Installing => "installing",
        ProvisioningStatus::Syncing => "syncing",
        ProvisioningStatus::Ready => "ready",
        ProvisioningStatus::Error => "error",
    }
}

fn status_from_text(text: &str) -> Result<ProvisioningStatus, DbError> {
    match text {
        "pending" => Ok(ProvisioningStatus::Pending),
        "provisioning" => Ok(ProvisioningStatus::Provisioning),
        "installing" => Ok(ProvisioningStatus::Installing),
        "syncing" => Ok(ProvisioningStatus::Syncing),
        "ready" => Ok(ProvisioningStatus::Ready),
        "error" => Ok(ProvisioningStatus::Error),
        other => Err(DbError::ConnectionError(format!("UNKNOWN_INSTALL_STATUS -> {other}"))),
    }
}

fn step_to_text(step: InstallStep) -> &'static str {
    match step {
        InstallStep::CreateProject => "create_project",
        InstallStep::CreateDatabase => "create_database",
        InstallStep::WaitDatabaseReady => "wait_database_ready",
        InstallStep::ApplySchema => "apply_schema",
        InstallStep::VerifyConnection => "verify_connection",
        InstallStep::StartSync => "start_sync",
        InstallStep::VerifySync => "verify_sync",
        InstallStep::Done => "done",
    }
}

fn step_from_text(text: &str) -> Result<InstallStep, DbError> {
    match text {
        "create_project" => Ok(InstallStep::CreateProject),
        "create_database" => Ok(InstallStep::CreateDatabase),
        "wait_database_ready" => Ok(InstallStep::WaitDatabaseReady),
        "apply_schema" => Ok(InstallStep::ApplySchema),
        "verify_connection" => Ok(InstallStep::VerifyConnection),
        "start_sync" => Ok(InstallStep::StartSync),
        "verify_sync" => Ok(InstallStep::VerifySync),
        "done" => Ok(InstallStep::Done),
        other => Err(DbError::ConnectionError(format!("UNKNOWN_INSTALL_STEP -> {other}"))),
    }
}

fn from_row(row: sqlx::postgres::PgRow) -> Result<ProvisionedDatabase, DbError> {
    let install_status: String = row.try_get("install_status")?;
    let install_step: Option<String> = row.try_get("install_step")?;

    Ok(ProvisionedDatabase {
        tenant_id: row.try_get("tenant_id")?,
        project_ref: row.try_get("project_ref")?,
        db_password_ciphertext: row.try_get("db_password_ct")?,
        connection_host: row.try_get("connection_host")?,
        region: row.try_get("region")?,
        install_status: status_from_text(&install_status)?,
        install_step: install_step.map(|s| step_from_text(&s)).transpose()?,
        error_message: row.try_get("error_message")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub async fn get(pool: &PgPool, tenant_id: &str) -> Result<Option<ProvisionedDatabase>, DbError> {
    let row = sqlx::query(
        "SELECT tenant_id, project_ref, db_password_ct, connection_host, region,
                install_status, install_step, error_message, created_at, updated_at
         FROM provisioned_databases WHERE tenant_id = $1",
    )
    .bind(tenant_id)
    .fetch_optional(pool)
    .await?;

    row.map(from_row).transpose()
}

/// Variante de `get` sobre una conexion ya prestada, para usarse dentro del
/// cuerpo de `with_tenant_lock`.
pub async fn get_with_conn(
    conn: &mut PgConnection,
    tenant_id: &str,
) -> Result<Option<ProvisionedDatabase>, DbError> {
    let row = sqlx::query(
        "SELECT tenant_id, project_ref, db_password_ct, connection_host, region,
                install_status, install_step, error_message, created_at, updated_at
         FROM provisioned_databases WHERE tenant_id = $1",
    )
    .bind(tenant_id)
    .fetch_optional(&mut *conn)
    .await?;

    row.map(from_row).transpose()
}

pub async fn insert_pending(
    conn: &mut PgConnection,
    tenant_id: &str,
    region: &str,
    now: DateTime<Utc>,
) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO provisioned_databases
            (tenant_id, project_ref, db_password_ct, connection_host, region,
             install_status, install_step, error_message, created_at, updated_at)
         VALUES ($1, '', '', '', $2, $3, NULL, NULL, $4, $4)",
    )
    .bind(tenant_id)
    .bind(region)
    .bind(status_to_text(ProvisioningStatus::Pending))
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Guarda el avance de un tick: nuevo estado/paso, y opcionalmente los
/// campos de proyecto aprovisionado (project_ref, host, password cifrada).
#[allow(clippy::too_many_arguments)]
pub async fn advance(
    conn: &mut PgConnection,
    tenant_id: &str,
    status: ProvisioningStatus,
    step: Option<InstallStep>,
    project_ref: Option<&str>,
    connection_host: Option<&str>,
    db_password_ciphertext: Option<&str>,
    now: DateTime<Utc>,
) -> Result<(), DbError> {
    sqlx::query(
        "UPDATE provisioned_databases SET
            install_status = $2,
            install_step = $3,
            project_ref = COALESCE($4, project_ref),
            connection_host = COALESCE($5, connection_host),
            db_password_ct = COALESCE($6, db_password_ct),
            error_message = NULL,
            updated_at = $7
         WHERE tenant_id = $1",
    )
    .bind(tenant_id)
    .bind(status_to_text(status))
    .bind(step.map(step_to_text))
    .bind(project_ref)
    .bind(connection_host)
    .bind(db_password_ciphertext)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

pub async fn mark_error(
    conn: &mut PgConnection,
    tenant_id: &str,
    sanitized_message: &str,
    now: DateTime<Utc>,
) -> Result<(), DbError> {
    sqlx::query(
        "UPDATE provisioned_databases SET
            install_status = $2,
            error_message = $3,
            updated_at = $4
         WHERE tenant_id = $1",
    )
    .bind(tenant_id)
    .bind(status_to_text(ProvisioningStatus::Error))
    .bind(sanitized_message)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

pub async fn list_non_terminal(pool: &PgPool) -> Result<Vec<ProvisionedDatabase>, DbError> {
    let rows = sqlx::query(
        "SELECT tenant_id, project_ref, db_password_ct, connection_host, region,
                install_status, install_step, error_message, created_at, updated_at
         FROM provisioned_databases WHERE install_status NOT IN ('ready', 'error')",
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(from_row).collect()
}

pub async fn delete(pool: &PgPool, tenant_id: &str) -> Result<(), DbError> {
    sqlx::query("DELETE FROM provisioned_databases WHERE tenant_id = $1")
        .bind(tenant_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Variante de `delete` sobre una conexion ya prestada, para usarse dentro
/// del cuerpo de `with_tenant_lock` (§4.10 escenario de desaprovisionamiento).
pub async fn delete_with_conn(conn: &mut PgConnection, tenant_id: &str) -> Result<(), DbError> {
    sqlx::query("DELETE FROM provisioned_databases WHERE tenant_id = $1")
        .bind(tenant_id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}
