// [libs/infra/db/src/repositories/oauth_states.rs]
//! CRUD sobre `oauth_states`: el token CSRF de un solo uso emitido al
//! iniciar el flujo de instalacion (§4.6).

use crate::errors::DbError;
use chrono::{DateTime, Utc};
use connectbridge_models::{Livemode, OAuthState};
use sqlx::{PgPool, Row};

pub async fn insert(pool: &PgPool, state: &OAuthState) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO oauth_states (state_hash, mode, expires_at, created_at) VALUES ($1, $2, $3, $4)",
    )
    .bind(&state.state_hash)
    .bind(state.mode.to_string())
    .bind(state.expires_at)
    .bind(state.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Consume el estado si existe: lo borra y devuelve su valor anterior en
/// una unica sentencia, de modo que dos peticiones concurrentes con el
/// mismo `state_hash` no puedan consumirlo ambas.
pub async fn consume(pool: &PgPool, state_hash: &str) -> Result<Option<OAuthState>, DbError> {
    let row = sqlx::query(
        "DELETE FROM oauth_states WHERE state_hash = $1 RETURNING state_hash, mode, expires_at, created_at",
    )
    .bind(state_hash)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let mode: String = row.try_get("mode")?;
    let expires_at: DateTime<Utc> = row.try_get("expires_at")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;

    Ok(Some(OAuthState {
        state_hash: row.try_get("state_hash")?,
        mode: Livemode::from_bool(mode == "live"),
        expires_at,
        created_at,
    }))
}

pub async fn purge_expired(pool: &PgPool, now: DateTime<Utc>) -> Result<u64, DbError> {
    let result = sqlx::query("DELETE FROM oauth_states WHERE expires_at < $1")
        .bind(now)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_round_trips_through_text_representation() {
        assert_eq!(Livemode::from_bool(true), Livemode::Live);
        assert_eq!(Livemode::from_bool(false), Livemode::Test);
    }
}
