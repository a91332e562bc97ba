// [libs/domain/provisioning/src/errors.rs]
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProvisioningError {
    #[error("[L3_PROVISIONING_FAULT]: INTERNAL -> {0}")]
    Internal(String),
}

/// Resultado interno de un paso de transicion: distinto de `ProvisioningError`
/// porque un fallo de tick casi nunca debe burbujear — se traduce en una
/// fila `error` persistida o en quedarse quieto hasta el proximo poll.
#[derive(Debug)]
pub(crate) enum TickFailure {
    /// Sin cambio de estado este tick (aun esperando una condicion).
    Stay,
    /// Fallo terminal: el tick escribe `install_status=error` con el
    /// mensaje saneado.
    Terminal(String),
}
