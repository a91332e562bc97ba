// [libs/domain/oauth-flow/src/flow.rs]
/*!
 * APARATO: FLUJO DE INSTALACION/CALLBACK OAUTH (ESTRATO L3)
 * RESPONSABILIDAD: EMISION/CONSUMO DE ESTADO CSRF Y ALTA DE CONEXION
 */

use crate::errors::OAuthFlowError;
use chrono::{Duration, Utc};
use connectbridge_crypto::{digest, random_token, EncryptionKey};
use connectbridge_db::repositories::oauth_states;
use connectbridge_models::config::Settings;
use connectbridge_models::{Livemode, OAuthState};
use connectbridge_platform::PlatformClient;
use sqlx::PgPool;
use tracing::{info, instrument, warn};

const AUTHORIZE_ENDPOINT: &str = "https://marketplace.stripe.com/oauth/v2/authorize";
const STATE_TTL_MINUTES: i64 = 10;

pub struct CallbackOutcome {
    pub tenant_id: String,
    pub livemode: Livemode,
}

/// Heuristica del branch de instalacion directa: preservada tal cual
/// especificada, aunque puede clasificar mal (ver notas de diseno).
fn mode_from_account_hint(account_hint: Option<&str>) -> Livemode {
    match account_hint {
        Some(hint) if hint.contains("test") => Livemode::Test,
        _ => Livemode::Live,
    }
}

#[instrument(skip(pool, settings))]
pub async fn install(pool: &PgPool, settings: &Settings, mode: Livemode) -> Result<String, OAuthFlowError> {
    let raw_state = random_token(32);
    let state_hash = digest(&raw_state);
    let now = Utc::now();

    let state = OAuthState {
        state_hash,
        mode,
        expires_at: now + Duration::minutes(STATE_TTL_MINUTES),
        created_at: now,
    };

    oauth_states::insert(pool, &state)
        .await
        .map_err(|e| OAuthFlowError::Internal(e.to_string()))?;

    let client_id = &settings.credentials_for(mode).app_client_id;
    let redirect_uri = format!("{}/oauth/callback", settings.base_url);

    info!("issued oauth state for mode {}", mode);

    Ok(format!(
        "{AUTHORIZE_ENDPOINT}?client_id={client_id}&redirect_uri={redirect_uri}&state={raw_state}"
    ))
}

#[instrument(skip(pool, vault_key, platform, settings, code, state, account_hint))]
pub async fn callback(
    pool: &PgPool,
    vault_key: &EncryptionKey,
    platform: &PlatformClient,
    settings: &Settings,
    code: &str,
    state: Option<&str>,
    account_hint: Option<&str>,
) -> Result<CallbackOutcome, OAuthFlowError> {
    let now = Utc::now();

    let mode = match state {
        Some(raw_state) => {
            let state_hash = digest(raw_state);
            let consumed = oauth_states::consume(pool, &state_hash)
                .await
                .map_err(|e| OAuthFlowError::Internal(e.to_string()))?
                .ok_or(OAuthFlowError::InvalidState)?;

            if consumed.is_expired(now) {
                return Err(OAuthFlowError::InvalidState);
            }

            consumed.mode
        }
        None => mode_from_account_hint(account_hint),
    };

    let credentials = settings.credentials_for(mode);

    let exchange = platform.exchange_code(credentials, code).await.map_err(|e| {
        warn!("code exchange failed: {}", e);
        OAuthFlowError::ExchangeFailed
    })?;

    let access_token_expires_at = now + Duration::seconds(exchange.expires_in_seconds as i64);
    let livemode = Livemode::from_bool(exchange.livemode);

    connectbridge_vault::upsert_connection(
        pool,
        vault_key,
        &exchange.tenant_user_id,
        livemode,
        &exchange.scope,
        exchange.publishable_identifier.as_deref(),
        &exchange.access_token,
        access_token_expires_at,
        &exchange.refresh_token,
        now,
    )
    .await
    .map_err(|e| OAuthFlowError::Internal(e.to_string()))?;

    info!("connection established for tenant");

    Ok(CallbackOutcome { tenant_id: exchange.tenant_user_id, livemode })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_hint_substring_test_selects_test_mode() {
        assert_eq!(mode_from_account_hint(Some("acct_test_123")), Livemode::Test);
        assert_eq!(mode_from_account_hint(Some("acct_prod_123")), Livemode::Live);
        assert_eq!(mode_from_account_hint(None), Livemode::Live);
    }
}
