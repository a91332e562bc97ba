// [apps/gateway/src/state.rs]
//! Estado compartido del gateway: todas las dependencias que un handler
//! puede necesitar, inyectadas una sola vez en `ignite` y clonadas (via
//! `Arc`) hacia cada peticion por `axum::extract::State`.

use chrono::Duration;
use connectbridge_control_plane::{ControlPlaneClient, HttpSyncInstaller, SyncInstaller};
use connectbridge_crypto::EncryptionKey;
use connectbridge_db::DbClient;
use connectbridge_models::config::Settings;
use connectbridge_platform::PlatformClient;
use connectbridge_provisioning::ProvisioningContext;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: DbClient,
    pub settings: Arc<Settings>,
    pub platform: Arc<PlatformClient>,
    pub control_plane: Arc<ControlPlaneClient>,
    pub sync_installer: Arc<dyn SyncInstaller>,
    pub wait_database_ready_timeout: Duration,
}

impl AppState {
    /// Hidrata la configuracion desde el entorno y abre el pool de Postgres.
    /// Fallo fatal de arranque si cualquier pieza obligatoria falta (§4.1, §9).
    pub async fn ignite() -> Self {
        let settings = Settings::from_env().expect("CRITICAL_FAULT: configuracion de proceso invalida.");

        let db = DbClient::connect(&settings.database_url)
            .await
            .expect("CRITICAL_FAULT: enlace a Postgres colapsado. Ignicion abortada.");

        let http = reqwest::Client::builder()
            .build()
            .expect("CRITICAL_FAULT: no se pudo construir el cliente HTTP saliente.");

        let platform = PlatformClient::new(http.clone());

        let control_plane = ControlPlaneClient::new(
            http.clone(),
            settings.control_plane_access_token.clone(),
            settings.control_plane_organization_id.clone(),
            settings.control_plane_region.clone(),
        );

        let sync_installer: Arc<dyn SyncInstaller> = Arc::new(HttpSyncInstaller::new(
            http,
            format!("{}/webhooks/sync-install", settings.base_url),
            "2024-06-20".to_string(),
        ));

        let wait_database_ready_timeout =
            Duration::milliseconds(settings.wait_database_ready_timeout_ms as i64);

        Self {
            db,
            settings: Arc::new(settings),
            platform: Arc::new(platform),
            control_plane: Arc::new(control_plane),
            sync_installer,
            wait_database_ready_timeout,
        }
    }

    /// Arma el contexto que el motor de aprovisionamiento necesita para un
    /// tick, tomado prestado por la duracion de la peticion.
    pub fn provisioning_context(&self) -> ProvisioningContext<'_> {
        ProvisioningContext {
            pool: self.db.pool(),
            control_plane: self.control_plane.as_ref(),
            sync_installer: self.sync_installer.as_ref(),
            vault_key: &self.settings.encryption_key,
            platform: self.platform.as_ref(),
            settings: self.settings.as_ref(),
            wait_database_ready_timeout: self.wait_database_ready_timeout,
        }
    }
}
