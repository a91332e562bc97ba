// [libs/core/models/src/lib.rs]
/*!
 * =================================================================
 * APARATO: SHARED DOMAIN MODELS (ESTRATO L1-CORE)
 * RESPONSABILIDAD: TIPOS PERSISTIDOS, CONFIGURACION Y TELEMETRIA
 * =================================================================
 */

pub mod config;
pub mod domain;
pub mod telemetry;

pub use domain::{
    ConnectionKey, InstallStep, Livemode, OAuthConnection, OAuthState, ProvisionedDatabase,
    ProvisioningStatus,
};
