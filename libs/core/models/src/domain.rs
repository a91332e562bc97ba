// [libs/core/models/src/domain.rs]
//! Tipos de dominio persistidos: `OAuthState`, `OAuthConnection` y
//! `ProvisionedDatabase`, tal como los describe el modelo de datos (ver
//! DESIGN.md). Ninguno de estos tipos conoce su mecanismo de persistencia:
//! `connectbridge-db` los mapea desde/hacia filas de Postgres.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Separa credenciales/datos de produccion de los de sandbox. Cada tenant
/// puede conectarse de forma independiente en cada modo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Livemode {
    Test,
    Live,
}

impl Livemode {
    pub fn as_bool(self) -> bool {
        matches!(self, Livemode::Live)
    }

    pub fn from_bool(live: bool) -> Self {
        if live {
            Livemode::Live
        } else {
            Livemode::Test
        }
    }
}

impl fmt::Display for Livemode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Livemode::Test => write!(f, "test"),
            Livemode::Live => write!(f, "live"),
        }
    }
}

/// Identidad compuesta `(tenant_id, livemode)` de una conexion.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionKey {
    pub tenant_id: String,
    pub livemode: Livemode,
}

/// Fila efimera de CSRF: un nonce de 256 bits hasheado, consumido
/// exactamente una vez. El valor crudo nunca se almacena ni se registra.
#[derive(Debug, Clone)]
pub struct OAuthState {
    pub state_hash: String,
    pub mode: Livemode,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl OAuthState {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

/// Tokens de acceso/refresco cifrados para un `(tenant_id, livemode)`.
#[derive(Debug, Clone)]
pub struct OAuthConnection {
    pub tenant_id: String,
    pub livemode: Livemode,
    pub scope: String,
    pub publishable_identifier: Option<String>,
    pub access_token_ciphertext: String,
    pub access_token_expires_at: DateTime<Utc>,
    pub refresh_token_ciphertext: String,
    pub refresh_token_rotated_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Pasos de la maquina de estados de aprovisionamiento (§4.8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallStep {
    CreateProject,
    CreateDatabase,
    WaitDatabaseReady,
    ApplySchema,
    VerifyConnection,
    StartSync,
    VerifySync,
    Done,
}

impl InstallStep {
    /// El siguiente paso de la tabla de transicion (§4.8), ignorando
    /// exito/fallo: uso exclusivo para chequeos de monotonicidad en tests.
    pub fn successor(self) -> Option<InstallStep> {
        use InstallStep::*;
        match self {
            CreateProject | CreateDatabase => Some(WaitDatabaseReady),
            WaitDatabaseReady => Some(ApplySchema),
            ApplySchema => Some(VerifyConnection),
            VerifyConnection => Some(StartSync),
            StartSync => Some(VerifySync),
            VerifySync => Some(Done),
            Done => None,
        }
    }
}

/// Estado de instalacion persistido junto al paso (invariante: `Ready` ssi
/// `Done`, `Error` ssi hay `error_message`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProvisioningStatus {
    Pending,
    Provisioning,
    Installing,
    Syncing,
    Ready,
    Error,
}

/// Fila de base de datos gestionada en aprovisionamiento para un tenant.
///
/// Nota de diseno (Open Question §9 de la especificacion): esta fila se
/// indexa solo por `tenant_id`, no por `(tenant_id, livemode)` como las
/// conexiones OAuth. Se opto explicitamente por la opcion (a): un tenant
/// puede aprovisionar una unica base de datos en total, no una por modo.
#[derive(Debug, Clone)]
pub struct ProvisionedDatabase {
    pub tenant_id: String,
    pub project_ref: String,
    pub db_password_ciphertext: String,
    pub connection_host: String,
    pub region: String,
    pub install_status: ProvisioningStatus,
    pub install_step: Option<InstallStep>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProvisionedDatabase {
    pub fn is_terminal(&self) -> bool {
        matches!(self.install_status, ProvisioningStatus::Ready | ProvisioningStatus::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn livemode_round_trips_through_bool() {
        assert_eq!(Livemode::from_bool(true), Livemode::Live);
        assert_eq!(Livemode::from_bool(false), Livemode::Test);
        assert!(Livemode::Live.as_bool());
        assert!(!Livemode::Test.as_bool());
    }

    #[test]
    fn install_step_monotonic_chain_ends_at_done() {
        let mut step = InstallStep::CreateProject;
        let mut seen = vec![step];
        while let Some(next) = step.successor() {
            seen.push(next);
            step = next;
        }
        assert_eq!(*seen.last().unwrap(), InstallStep::Done);
        assert_eq!(seen.len(), 7);
    }
}
