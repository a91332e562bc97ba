// [libs/infra/vault/src/lib.rs]
/*!
 * APARATO: BOVEDA DE TOKENS (ESTRATO L2)
 * RESPONSABILIDAD: CIFRADO/DESCIFRADO TRANSPARENTE DE TOKENS OAUTH
 *
 * Unico punto del sistema donde un token en claro cruza la frontera de
 * persistencia. La invariante central: un refresh token rotado se
 * persiste en esta boveda ANTES de que su access token acompanante se
 * entregue a cualquier consumidor (ver connectbridge-refresh). Esta
 * propiedad la garantiza `update_rotated_tokens`, que escribe ambos
 * tokens en una unica sentencia atomica.
 */

mod errors;
mod plaintext;

pub use errors::VaultError;
pub use plaintext::PlaintextConnection;

use chrono::{DateTime, Utc};
use connectbridge_crypto::{decrypt, encrypt, EncryptionKey};
use connectbridge_db::repositories::oauth_connections;
use connectbridge_models::{Livemode, OAuthConnection};
use sqlx::PgPool;
use tracing::instrument;

fn decrypt_connection(
    key: &EncryptionKey,
    connection: OAuthConnection,
) -> Result<PlaintextConnection, VaultError> {
    let access_token = String::from_utf8_lossy(&decrypt(key, &connection.access_token_ciphertext)?)
        .into_owned();
    let refresh_token =
        String::from_utf8_lossy(&decrypt(key, &connection.refresh_token_ciphertext)?).into_owned();

    Ok(PlaintextConnection {
        tenant_id: connection.tenant_id,
        livemode: connection.livemode,
        scope: connection.scope,
        publishable_identifier: connection.publishable_identifier,
        access_token,
        access_token_expires_at: connection.access_token_expires_at,
        refresh_token,
        refresh_token_rotated_at: connection.refresh_token_rotated_at,
    })
}

#[instrument(skip(pool, key, access_token, refresh_token))]
#[allow(clippy::too_many_arguments)]
pub async fn upsert_connection(
    pool: &PgPool,
    key: &EncryptionKey,
    tenant_id: &str,
    livemode: Livemode,
    scope: &str,
    publishable_identifier: Option<&str>,
    access_token: &str,
    access_token_expires_at: DateTime<Utc>,
    refresh_token: &str,
    now: DateTime<Utc>,
) -> Result<(), VaultError> {
    let connection = OAuthConnection {
        tenant_id: tenant_id.to_string(),
        livemode,
        scope: scope.to_string(),
        publishable_identifier: publishable_identifier.map(str::to_string),
        access_token_ciphertext: encrypt(key, access_token.as_bytes()),
        access_token_expires_at,
        refresh_token_ciphertext: encrypt(key, refresh_token.as_bytes()),
        refresh_token_rotated_at: now,
        created_at: now,
        updated_at: now,
    };

    oauth_connections::upsert(pool, &connection).await?;
    Ok(())
}

/// Sustituye el par de tokens en una unica escritura atomica: el refresh
/// token nuevo queda persistido en la misma sentencia que el access token
/// que lo acompana, nunca en pasos separados.
#[instrument(skip(pool, key, new_access_token, new_refresh_token))]
pub async fn update_rotated_tokens(
    pool: &PgPool,
    key: &EncryptionKey,
    tenant_id: &str,
    livemode: Livemode,
    new_access_token: &str,
    new_access_token_expires_at: DateTime<Utc>,
    new_refresh_token: &str,
    now: DateTime<Utc>,
) -> Result<(), VaultError> {
    let access_token_ciphertext = encrypt(key, new_access_token.as_bytes());
    let refresh_token_ciphertext = encrypt(key, new_refresh_token.as_bytes());

    oauth_connections::update_rotated_tokens(
        pool,
        tenant_id,
        livemode,
        &access_token_ciphertext,
        new_access_token_expires_at,
        &refresh_token_ciphertext,
        now,
        now,
    )
    .await
    .map_err(|e| match e {
        connectbridge_db::DbError::NotFound => VaultError::NotFound,
        other => VaultError::Db(other),
    })?;

    Ok(())
}

#[instrument(skip(pool, key))]
pub async fn get_connection(
    pool: &PgPool,
    key: &EncryptionKey,
    tenant_id: &str,
    livemode: Livemode,
) -> Result<Option<PlaintextConnection>, VaultError> {
    let Some(connection) = oauth_connections::get(pool, tenant_id, livemode).await? else {
        return Ok(None);
    };

    Ok(Some(decrypt_connection(key, connection)?))
}

pub async fn list_connections(
    pool: &PgPool,
    key: &EncryptionKey,
) -> Result<Vec<PlaintextConnection>, VaultError> {
    oauth_connections::list_all(pool)
        .await?
        .into_iter()
        .map(|c| decrypt_connection(key, c))
        .collect()
}

/// Conexiones candidatas al barrido masivo: su access token vence antes de
/// `before` (§4.11).
pub async fn list_expiring_before(
    pool: &PgPool,
    key: &EncryptionKey,
    before: DateTime<Utc>,
) -> Result<Vec<PlaintextConnection>, VaultError> {
    oauth_connections::list_expiring_before(pool, before)
        .await?
        .into_iter()
        .map(|c| decrypt_connection(key, c))
        .collect()
}

pub async fn delete_connection(
    pool: &PgPool,
    tenant_id: &str,
    livemode: Livemode,
) -> Result<(), VaultError> {
    oauth_connections::delete(pool, tenant_id, livemode).await?;
    Ok(())
}
