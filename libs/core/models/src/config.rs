// [libs/core/models/src/config.rs]
//! Configuracion de proceso: cargada una unica vez en el arranque, nunca
//! redescubierta perezosamente en tiempo de ejecucion. Una variable
//! obligatoria ausente es un fallo fatal de arranque (§4.1, §9).

use crate::domain::Livemode;
use connectbridge_crypto::EncryptionKey;
use std::env;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("[L1_CONFIG_FAULT]: MISSING_ENV_VAR -> {0}")]
    Missing(&'static str),
    #[error("[L1_CONFIG_FAULT]: INVALID_ENCRYPTION_KEY")]
    InvalidEncryptionKey,
}

/// Credenciales de la plataforma de comercio, separadas por modo.
#[derive(Debug, Clone)]
pub struct ModeCredentials {
    pub secret_key: String,
    pub app_client_id: String,
}

/// Configuracion soberana de proceso, hidratada una sola vez en `ignite`.
#[derive(Clone)]
pub struct Settings {
    pub encryption_key: EncryptionKey,
    pub database_url: String,
    pub test_credentials: ModeCredentials,
    pub live_credentials: ModeCredentials,
    /// Lista rotada de secretos de firma (el mas reciente al final).
    pub app_signing_secrets: Vec<String>,
    pub control_plane_access_token: String,
    pub control_plane_organization_id: String,
    pub control_plane_region: String,
    pub base_url: String,
    pub wait_database_ready_timeout_ms: u64,
}

impl Settings {
    /// Hidrata la configuracion desde el entorno del proceso. Falla
    /// atomicamente ante la primera variable obligatoria ausente o
    /// malformada en lugar de construir un `Settings` parcialmente valido.
    pub fn from_env() -> Result<Self, ConfigError> {
        let encryption_key_raw = required("ENCRYPTION_KEY")?;
        let encryption_key =
            EncryptionKey::from_hex(&encryption_key_raw).map_err(|_| ConfigError::InvalidEncryptionKey)?;

        let app_signing_secrets: Vec<String> = required("STRIPE_APP_SIGNING_SECRET")?
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if app_signing_secrets.is_empty() {
            return Err(ConfigError::Missing("STRIPE_APP_SIGNING_SECRET"));
        }

        Ok(Self {
            encryption_key,
            database_url: required("DATABASE_URL")?,
            test_credentials: ModeCredentials {
                secret_key: required("STRIPE_SECRET_KEY_TEST")?,
                app_client_id: required("STRIPE_APP_CLIENT_ID_TEST")?,
            },
            live_credentials: ModeCredentials {
                secret_key: required("STRIPE_SECRET_KEY_LIVE")?,
                app_client_id: required("STRIPE_APP_CLIENT_ID_LIVE")?,
            },
            app_signing_secrets,
            control_plane_access_token: required("SUPABASE_ACCESS_TOKEN")?,
            control_plane_organization_id: required("SUPABASE_ORGANIZATION_ID")?,
            control_plane_region: env::var("SUPABASE_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            base_url: required("BASE_URL")?,
            wait_database_ready_timeout_ms: env::var("PROVISIONING_WAIT_DATABASE_READY_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(600_000),
        })
    }

    /// Las credenciales de la plataforma para el modo dado.
    pub fn credentials_for(&self, mode: Livemode) -> &ModeCredentials {
        match mode {
            Livemode::Test => &self.test_credentials,
            Livemode::Live => &self.live_credentials,
        }
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(name))
}
