// [libs/domain/refresh/src/lib.rs]
/*!
 * APARATO: ADAPTADOR DE REFRESCO JUST-IN-TIME (ESTRATO L3)
 * RESPONSABILIDAD: ENTREGAR UN ACCESS TOKEN VIGENTE, ROTANDO SI HACE FALTA
 *
 * El margen de 5 minutos evita entregar un token que venza a mitad de una
 * llamada upstream que lo consume. Un fallo en los pasos 2-3 deja la fila
 * almacenada intacta: el invocador recibe `RefreshFailed` y el token
 * previo sigue siendo valido hasta el proximo intento.
 */

mod errors;

pub use errors::RefreshError;

use chrono::{Duration, Utc};
use connectbridge_crypto::EncryptionKey;
use connectbridge_models::config::Settings;
use connectbridge_models::Livemode;
use connectbridge_platform::PlatformClient;
use sqlx::PgPool;
use tracing::{instrument, warn};

const EXPIRY_SKEW_MINUTES: i64 = 5;

#[instrument(skip(pool, vault_key, platform, settings))]
pub async fn get_fresh_access(
    pool: &PgPool,
    vault_key: &EncryptionKey,
    platform: &PlatformClient,
    settings: &Settings,
    tenant_id: &str,
    livemode: Livemode,
) -> Result<String, RefreshError> {
    let now = Utc::now();

    let connection = connectbridge_vault::get_connection(pool, vault_key, tenant_id, livemode)
        .await
        .map_err(|e| {
            warn!("vault lookup failed during refresh: {}", e);
            RefreshError::NotConnected
        })?
        .ok_or(RefreshError::NotConnected)?;

    if connection.access_token_expires_at > now + Duration::minutes(EXPIRY_SKEW_MINUTES) {
        return Ok(connection.access_token);
    }

    let credentials = settings.credentials_for(livemode);

    let exchange = platform.refresh(credentials, &connection.refresh_token).await.map_err(|e| {
        warn!("refresh call failed, leaving stored connection untouched: {}", e);
        RefreshError::RefreshFailed
    })?;

    let new_access_token_expires_at = now + Duration::seconds(exchange.expires_in_seconds as i64);

    connectbridge_vault::update_rotated_tokens(
        pool,
        vault_key,
        tenant_id,
        livemode,
        &exchange.access_token,
        new_access_token_expires_at,
        &exchange.refresh_token,
        now,
    )
    .await
    .map_err(|e| {
        warn!("failed to persist rotated refresh token: {}", e);
        RefreshError::RefreshFailed
    })?;

    Ok(exchange.access_token)
}
