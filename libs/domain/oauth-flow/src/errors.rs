// [libs/domain/oauth-flow/src/errors.rs]
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OAuthFlowError {
    /// El estado fue rechazado, ya consumido, o vencio (403).
    #[error("[L3_OAUTH_FLOW_FAULT]: INVALID_STATE")]
    InvalidState,

    /// Peticion ilegible o faltan campos requeridos (400).
    #[error("[L3_OAUTH_FLOW_FAULT]: MALFORMED_REQUEST -> {0}")]
    MalformedRequest(String),

    /// El intercambio de codigo fallo en la plataforma (se traduce a 500
    /// o a la vista de error segun quien lo capture).
    #[error("[L3_OAUTH_FLOW_FAULT]: EXCHANGE_FAILED")]
    ExchangeFailed,

    /// Fallo interno al persistir estado o conexion (500).
    #[error("[L3_OAUTH_FLOW_FAULT]: INTERNAL -> {0}")]
    Internal(String),
}
