// [libs/infra/platform-client/src/errors.rs]
use thiserror::Error;

/// Clasificacion de fallo al hablar con el endpoint de tokens de la
/// plataforma (§4.4, §7). La distincion entre estos tres tipos es lo unico
/// que el motor de aprovisionamiento necesita para decidir si persiste un
/// estado `error` terminal o deja que el siguiente tick reintente.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Credenciales rechazadas o autorizacion invalida: no tiene sentido
    /// reintentar sin intervencion humana.
    #[error("[L2_PLATFORM_AUTH_FAULT]: UPSTREAM_REJECTED_CREDENTIALS")]
    UpstreamAuthError,

    /// Fallo de red, timeout, o 5xx: probablemente efimero.
    #[error("[L2_PLATFORM_NET_FAULT]: UPSTREAM_TRANSIENT -> {0}")]
    UpstreamTransient(String),

    /// Respuesta 2xx pero con forma inesperada: ni error ni envelope de
    /// exito valido.
    #[error("[L2_PLATFORM_SHAPE_FAULT]: UPSTREAM_MALFORMED -> {0}")]
    UpstreamMalformed(String),
}
