// [libs/infra/platform-client/src/response.rs]
//! Formas del envelope JSON devuelto por el endpoint de tokens (§4.4). Los
//! dos envelopes comparten el mismo cuerpo de respuesta: exito o error, sin
//! discriminador explicito.

use serde::Deserialize;

const DEFAULT_EXPIRES_IN_SECONDS: u64 = 3600;

#[derive(Debug, Deserialize)]
pub struct RawTokenResponse {
    pub error: Option<String>,
    pub error_description: Option<String>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub token_type: Option<String>,
    pub scope: Option<String>,
    pub livemode: Option<bool>,
    pub tenant_user_id: Option<String>,
    pub publishable_identifier: Option<String>,
    pub expires_in: Option<u64>,
}

/// Envelope de exito ya validado: los tres campos obligatorios estan
/// presentes (§4.4).
#[derive(Debug, Clone)]
pub struct TokenExchange {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub livemode: bool,
    pub tenant_user_id: String,
    pub publishable_identifier: Option<String>,
    pub expires_in_seconds: u64,
}

impl RawTokenResponse {
    /// Intenta elevar la respuesta cruda a un envelope de exito validado.
    /// Retorna `None` si falta cualquiera de los tres campos obligatorios
    /// o si el envelope de error esta presente, sin importar el codigo
    /// HTTP que lo acompano.
    pub fn into_success(self) -> Option<TokenExchange> {
        if self.error.is_some() {
            return None;
        }

        Some(TokenExchange {
            access_token: self.access_token?,
            refresh_token: self.refresh_token?,
            scope: self.scope.unwrap_or_default(),
            livemode: self.livemode.unwrap_or(false),
            tenant_user_id: self.tenant_user_id?,
            publishable_identifier: self.publishable_identifier,
            expires_in_seconds: self.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECONDS),
        })
    }
}
