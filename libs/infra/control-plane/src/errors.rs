// [libs/infra/control-plane/src/errors.rs]
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ControlPlaneError {
    /// El plano de control respondio fuera de 2xx. El 404 de un delete
    /// llega aqui tambien: nunca se silencia (§4.9).
    #[error("[L2_CONTROL_PLANE_FAULT]: UPSTREAM_ERROR status={status} -> {body}")]
    Upstream { status: u16, body: String },

    #[error("[L2_CONTROL_PLANE_NET_FAULT]: {0}")]
    Transport(String),
}

#[derive(Error, Debug)]
pub enum SyncInstallError {
    #[error("[L2_SYNC_INSTALL_FAULT]: {0}")]
    Failed(String),
}
