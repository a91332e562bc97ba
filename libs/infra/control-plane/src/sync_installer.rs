// [libs/infra/control-plane/src/sync_installer.rs]
/*!
 * APARATO: INSTALADOR DE SINCRONIZACION (ESTRATO L2)
 * RESPONSABILIDAD: COLABORADOR OPACO DE UN UNICO METODO
 *
 * El artefacto de sincronizacion de terceros es tratado como una caja
 * negra con una sola entrada: `install(access_token)`. El motor de
 * aprovisionamiento nunca lo invoca mas de una vez por tick (max_attempts=1,
 * §4.8, §4.9). La version de API requerida por el webhook que este
 * instalador crea se expone aqui como un campo de configuracion de primera
 * clase, no como un parche en tiempo de ejecucion sobre la libreria
 * (§9 notas de diseno).
 */

use crate::errors::SyncInstallError;
use async_trait::async_trait;
use tracing::instrument;

#[async_trait]
pub trait SyncInstaller: Send + Sync {
    async fn install(&self, access_token: &str) -> Result<(), SyncInstallError>;
}

/// Instalador real contra el artefacto de sincronizacion de terceros, vía
/// su API HTTP directa en lugar de la libreria cliente original.
pub struct HttpSyncInstaller {
    http: reqwest::Client,
    webhook_endpoint: String,
    api_version: String,
}

impl HttpSyncInstaller {
    pub fn new(http: reqwest::Client, webhook_endpoint: String, api_version: String) -> Self {
        Self { http, webhook_endpoint, api_version }
    }
}

#[async_trait]
impl SyncInstaller for HttpSyncInstaller {
    #[instrument(skip(self, access_token))]
    async fn install(&self, access_token: &str) -> Result<(), SyncInstallError> {
        let response = self
            .http
            .post(&self.webhook_endpoint)
            .bearer_auth(access_token)
            .header("Stripe-Version", &self.api_version)
            .send()
            .await
            .map_err(|e| SyncInstallError::Failed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SyncInstallError::Failed(format!(
                "webhook_install_status={}",
                response.status()
            )));
        }

        Ok(())
    }
}
