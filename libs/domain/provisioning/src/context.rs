// [libs/domain/provisioning/src/context.rs]
use chrono::Duration;
use connectbridge_control_plane::{ControlPlaneClient, SyncInstaller};
use connectbridge_crypto::EncryptionKey;
use connectbridge_models::config::Settings;
use connectbridge_platform::PlatformClient;
use sqlx::PgPool;

/// Los colaboradores que un tick necesita para avanzar. Agrupados en una
/// sola estructura para que `tick` no reciba media docena de parametros
/// sueltos.
///
/// `pool` se usa para las lecturas/escrituras de `start_sync` sobre la
/// boveda de tokens, que vive fuera de la tabla bajo candado advisory:
/// el refresco de un token no necesita mutex por tenant, solo la propia
/// fila de aprovisionamiento lo necesita.
pub struct ProvisioningContext<'a> {
    pub pool: &'a PgPool,
    pub control_plane: &'a ControlPlaneClient,
    pub sync_installer: &'a dyn SyncInstaller,
    pub vault_key: &'a EncryptionKey,
    pub platform: &'a PlatformClient,
    pub settings: &'a Settings,
    pub wait_database_ready_timeout: Duration,
}
