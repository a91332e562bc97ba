// [libs/infra/db/src/repositories/oauth_connections.rs]
//! CRUD sobre `oauth_connections`: el boveda de tokens cifrados por
//! `(tenant_id, livemode)` (§4.3).

use crate::errors::DbError;
use chrono::{DateTime, Utc};
use connectbridge_models::{Livemode, OAuthConnection};
use sqlx::{PgPool, Row};

fn from_row(row: sqlx::postgres::PgRow) -> Result<OAuthConnection, DbError> {
    let livemode: bool = row.try_get("livemode")?;

    Ok(OAuthConnection {
        tenant_id: row.try_get("tenant_id")?,
        livemode: Livemode::from_bool(livemode),
        scope: row.try_get("scope")?,
        publishable_identifier: row.try_get("publishable_identifier")?,
        access_token_ciphertext: row.try_get("access_token_ct")?,
        access_token_expires_at: row.try_get("access_token_expires_at")?,
        refresh_token_ciphertext: row.try_get("refresh_token_ct")?,
        refresh_token_rotated_at: row.try_get("refresh_token_rotated_at")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub async fn get(
    pool: &PgPool,
    tenant_id: &str,
    livemode: Livemode,
) -> Result<Option<OAuthConnection>, DbError> {
    let row = sqlx::query(
        "SELECT tenant_id, livemode, scope, publishable_identifier, access_token_ct,
                access_token_expires_at, refresh_token_ct, refresh_token_rotated_at,
                created_at, updated_at
         FROM oauth_connections WHERE tenant_id = $1 AND livemode = $2",
    )
    .bind(tenant_id)
    .bind(livemode.as_bool())
    .fetch_optional(pool)
    .await?;

    row.map(from_row).transpose()
}

/// Inserta o reemplaza por completo la fila: usado en el alta inicial tras
/// el intercambio de codigo (§4.6) y en la rotacion de refresh token (§4.7),
/// que siempre escribe ambos tokens juntos en una unica sentencia.
pub async fn upsert(pool: &PgPool, connection: &OAuthConnection) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO oauth_connections
            (tenant_id, livemode, scope, publishable_identifier, access_token_ct,
             access_token_expires_at, refresh_token_ct, refresh_token_rotated_at,
             created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
         ON CONFLICT (tenant_id, livemode) DO UPDATE SET
            scope = EXCLUDED.scope,
            publishable_identifier = EXCLUDED.publishable_identifier,
            access_token_ct = EXCLUDED.access_token_ct,
            access_token_expires_at = EXCLUDED.access_token_expires_at,
            refresh_token_ct = EXCLUDED.refresh_token_ct,
            refresh_token_rotated_at = EXCLUDED.refresh_token_rotated_at,
            updated_at = EXCLUDED.updated_at",
    )
    .bind(&connection.tenant_id)
    .bind(connection.livemode.as_bool())
    .bind(&connection.scope)
    .bind(&connection.publishable_identifier)
    .bind(&connection.access_token_ciphertext)
    .bind(connection.access_token_expires_at)
    .bind(&connection.refresh_token_ciphertext)
    .bind(connection.refresh_token_rotated_at)
    .bind(connection.created_at)
    .bind(connection.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Sustituye unicamente el par de tokens y sus marcas de tiempo, en una
/// unica sentencia `UPDATE`: `scope` y `publishable_identifier` quedan
/// intactos, sin la ventana lectura-modificacion-escritura que un
/// `get` + `upsert` introduciria entre una rotacion concurrente y esta.
#[allow(clippy::too_many_arguments)]
pub async fn update_rotated_tokens(
    pool: &PgPool,
    tenant_id: &str,
    livemode: Livemode,
    access_token_ciphertext: &str,
    access_token_expires_at: DateTime<Utc>,
    refresh_token_ciphertext: &str,
    refresh_token_rotated_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE oauth_connections SET
            access_token_ct = $1,
            access_token_expires_at = $2,
            refresh_token_ct = $3,
            refresh_token_rotated_at = $4,
            updated_at = $5
         WHERE tenant_id = $6 AND livemode = $7",
    )
    .bind(access_token_ciphertext)
    .bind(access_token_expires_at)
    .bind(refresh_token_ciphertext)
    .bind(refresh_token_rotated_at)
    .bind(updated_at)
    .bind(tenant_id)
    .bind(livemode.as_bool())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }

    Ok(())
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<OAuthConnection>, DbError> {
    let rows = sqlx::query(
        "SELECT tenant_id, livemode, scope, publishable_identifier, access_token_ct,
                access_token_expires_at, refresh_token_ct, refresh_token_rotated_at,
                created_at, updated_at
         FROM oauth_connections",
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(from_row).collect()
}

/// Conexiones cuyo token de acceso vence antes de `before`: candidatas del
/// barrido masivo (§4.11).
pub async fn list_expiring_before(
    pool: &PgPool,
    before: DateTime<Utc>,
) -> Result<Vec<OAuthConnection>, DbError> {
    let rows = sqlx::query(
        "SELECT tenant_id, livemode, scope, publishable_identifier, access_token_ct,
                access_token_expires_at, refresh_token_ct, refresh_token_rotated_at,
                created_at, updated_at
         FROM oauth_connections WHERE access_token_expires_at < $1",
    )
    .bind(before)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(from_row).collect()
}

pub async fn delete(pool: &PgPool, tenant_id: &str, livemode: Livemode) -> Result<(), DbError> {
    sqlx::query("DELETE FROM oauth_connections WHERE tenant_id = $1 AND livemode = $2")
        .bind(tenant_id)
        .bind(livemode.as_bool())
        .execute(pool)
        .await?;

    Ok(())
}
