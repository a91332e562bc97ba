// [libs/domain/provisioning/src/lib.rs]
/*!
 * APARATO: MAQUINA DE ESTADOS DE APROVISIONAMIENTO (ESTRATO L3)
 * RESPONSABILIDAD: AVANCE RESUMIBLE, BLOQUEADO POR ADVISORY LOCK, UN TICK A LA VEZ
 */

mod context;
mod engine;
mod errors;
mod sanitize;
mod start;

pub use context::ProvisioningContext;
pub use engine::{tick, TickResult};
pub use errors::ProvisioningError;
pub use sanitize::sanitize_error_message;
pub use start::start_provisioning;
