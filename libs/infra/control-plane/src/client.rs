// [libs/infra/control-plane/src/client.rs]
/*!
 * APARATO: ADAPTADOR DEL PLANO DE CONTROL DE POSTGRES GESTIONADO (ESTRATO L2)
 * RESPONSABILIDAD: CREAR/SONDEAR/BORRAR PROYECTOS, SONDA SQL CRUDA
 */

use crate::errors::ControlPlaneError;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::instrument;

const API_BASE: &str = "https://api.supabase.com/v1";

#[derive(Clone)]
pub struct ControlPlaneClient {
    http: reqwest::Client,
    access_token: String,
    organization_id: String,
    region: String,
}

#[derive(Debug, Clone)]
pub struct CreatedProject {
    pub project_ref: String,
}

#[derive(Debug, Deserialize)]
struct CreateProjectResponse {
    id: String,
}

impl ControlPlaneClient {
    pub fn new(
        http: reqwest::Client,
        access_token: String,
        organization_id: String,
        region: String,
    ) -> Self {
        Self { http, access_token, organization_id, region }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    #[instrument(skip(self, db_password))]
    pub async fn create_project(
        &self,
        tenant_id: &str,
        db_password: &str,
    ) -> Result<CreatedProject, ControlPlaneError> {
        let body = json!({
            "organization_id": self.organization_id,
            "name": format!("connectbridge-{tenant_id}"),
            "db_pass": db_password,
            "region": self.region,
        });

        let response = self
            .http
            .post(format!("{API_BASE}/projects"))
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| ControlPlaneError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ControlPlaneError::Upstream { status: status.as_u16(), body });
        }

        let parsed: CreateProjectResponse = response
            .json()
            .await
            .map_err(|e| ControlPlaneError::Transport(e.to_string()))?;

        Ok(CreatedProject { project_ref: parsed.id })
    }

    #[instrument(skip(self, sql))]
    pub async fn run_query(&self, project_ref: &str, sql: &str) -> Result<Value, ControlPlaneError> {
        let response = self
            .http
            .post(format!("{API_BASE}/projects/{project_ref}/database/query"))
            .bearer_auth(&self.access_token)
            .json(&json!({ "query": sql }))
            .send()
            .await
            .map_err(|e| ControlPlaneError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ControlPlaneError::Upstream { status: status.as_u16(), body });
        }

        response.json().await.map_err(|e| ControlPlaneError::Transport(e.to_string()))
    }

    /// Borra el proyecto externo. Un 404 **no** se traga: una fila local
    /// huerfana es peor que un error ruidoso (§4.9, §8 escenario 6).
    #[instrument(skip(self))]
    pub async fn delete_project(&self, project_ref: &str) -> Result<(), ControlPlaneError> {
        let response = self
            .http
            .delete(format!("{API_BASE}/projects/{project_ref}"))
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| ControlPlaneError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ControlPlaneError::Upstream { status: status.as_u16(), body });
        }

        Ok(())
    }
}
