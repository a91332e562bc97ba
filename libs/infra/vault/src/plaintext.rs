// [libs/infra/vault/src/plaintext.rs]
//! La unica forma en que este crate deja escapar un token en claro: una
//! vez construido, el llamador es responsable de no persistirlo ni
//! registrarlo. Ningun `Debug`/`Display` derivado expone los campos de
//! token (ver nota mas abajo).

use chrono::{DateTime, Utc};
use connectbridge_models::Livemode;

/// Conexion OAuth con los tokens ya descifrados, devuelta unicamente a
/// colaboradores internos de confianza (motor de refresco, barrido).
#[derive(Clone)]
pub struct PlaintextConnection {
    pub tenant_id: String,
    pub livemode: Livemode,
    pub scope: String,
    pub publishable_identifier: Option<String>,
    pub access_token: String,
    pub access_token_expires_at: DateTime<Utc>,
    pub refresh_token: String,
    pub refresh_token_rotated_at: DateTime<Utc>,
}

impl std::fmt::Debug for PlaintextConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaintextConnection")
            .field("tenant_id", &self.tenant_id)
            .field("livemode", &self.livemode)
            .field("scope", &self.scope)
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}
