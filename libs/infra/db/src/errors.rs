// [libs/infra/db/src/errors.rs]
/*!
 * APARATO: DATABASE ERROR CATALOG (ESTRATO L2)
 * RESPONSABILIDAD: CATALOGACION SEMANTICA DE FALLOS DE PERSISTENCIA
 */

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    /// Fallo de enlace fisico o de red con el cluster de Postgres.
    #[error("[L2_DB_NET_FAULT]: DATABASE_UPLINK_SEVERED -> {0}")]
    ConnectionError(String),

    /// Fallo de configuracion del entorno (DATABASE_URL vacia o malformada).
    #[error("[L2_DB_CONFIG_FAULT]: STRATEGIC_ENV_VOID -> {0}")]
    ConfigurationError(String),

    /// Error de sintaxis o ejecucion devuelto por el motor Postgres.
    #[error("[L2_DB_QUERY_FAULT]: SQL_QUERY_REJECTED -> {0}")]
    QueryError(#[from] sqlx::Error),

    /// El registro solicitado no existe en la tabla activa.
    #[error("[L2_DB_FAULT]: RECORD_NOT_FOUND")]
    NotFound,
}
