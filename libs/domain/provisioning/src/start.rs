// [libs/domain/provisioning/src/start.rs]
//! `start_provisioning`: el unico momento en que la contrasena de la base
//! de datos viaja en claro (§4.8).

use crate::errors::ProvisioningError;
use chrono::Utc;
use connectbridge_control_plane::ControlPlaneClient;
use connectbridge_crypto::{encrypt, random_alphanumeric, EncryptionKey};
use connectbridge_db::repositories::provisioned_databases;
use connectbridge_models::{InstallStep, ProvisioningStatus};
use sqlx::PgPool;
use tracing::instrument;

const DB_PASSWORD_LENGTH: usize = 24;

#[instrument(skip(pool, control_plane, vault_key))]
pub async fn start_provisioning(
    pool: &PgPool,
    control_plane: &ControlPlaneClient,
    vault_key: &EncryptionKey,
    tenant_id: &str,
) -> Result<String, ProvisioningError> {
    let password = random_alphanumeric(DB_PASSWORD_LENGTH);

    let created = control_plane
        .create_project(tenant_id, &password)
        .await
        .map_err(|e| ProvisioningError::Internal(e.to_string()))?;

    let connection_host = format!("aws-1-{}.pooler.supabase.com", control_plane.region());
    let password_ciphertext = encrypt(vault_key, password.as_bytes());
    let now = Utc::now();

    let mut conn = pool.acquire().await.map_err(|e| ProvisioningError::Internal(e.to_string()))?;

    provisioned_databases::insert_pending(&mut conn, tenant_id, control_plane.region(), now)
        .await
        .map_err(|e| ProvisioningError::Internal(e.to_string()))?;

    provisioned_databases::advance(
        &mut conn,
        tenant_id,
        ProvisioningStatus::Pending,
        Some(InstallStep::CreateProject),
        Some(&created.project_ref),
        Some(&connection_host),
        Some(&password_ciphertext),
        now,
    )
    .await
    .map_err(|e| ProvisioningError::Internal(e.to_string()))?;

    Ok(created.project_ref)
}
