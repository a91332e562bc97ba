// [libs/infra/vault/src/errors.rs]
use connectbridge_crypto::CryptoError;
use connectbridge_db::DbError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VaultError {
    /// No existe conexion para el par `(tenant_id, livemode)` solicitado.
    #[error("[L2_VAULT_FAULT]: CONNECTION_NOT_FOUND")]
    NotFound,

    #[error("[L2_VAULT_CRYPTO_FAULT]: {0}")]
    Crypto(#[from] CryptoError),

    #[error("[L2_VAULT_DB_FAULT]: {0}")]
    Db(#[from] DbError),
}
