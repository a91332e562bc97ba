// [libs/domain/refresh/src/errors.rs]
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RefreshError {
    /// Ninguna conexion existe para el par tenant/modo solicitado.
    #[error("[L3_REFRESH_FAULT]: NOT_CONNECTED")]
    NotConnected,

    /// El refresco fallo en algun punto entre la decision de rotar y la
    /// escritura de vuelta; la fila almacenada queda intacta.
    #[error("[L3_REFRESH_FAULT]: REFRESH_FAILED")]
    RefreshFailed,
}
