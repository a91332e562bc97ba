// [libs/infra/db/src/client.rs]
/*!
 * APARATO: DATABASE CONNECTION CLIENT (ESTRATO L2)
 * RESPONSABILIDAD: GESTION DEL POOL Y APLICACION DE ESQUEMA
 *
 * Pool acotado a 10 conexiones concurrentes, 10s de deadline de conexion
 * y 30s de tiempo de inactividad, con TLS exigido (§4.2, §5). Inicializado
 * una unica vez por proceso y tratado como inmutable tras la ignicion.
 */

use crate::errors::DbError;
use crate::schema::apply_schema;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, instrument};

#[derive(Clone)]
pub struct DbClient {
    pool: PgPool,
}

impl DbClient {
    #[instrument(skip(database_url))]
    pub async fn connect(database_url: &str) -> Result<Self, DbError> {
        if database_url.is_empty() {
            return Err(DbError::ConfigurationError("DATABASE_URL_UNDEFINED".into()));
        }

        let connect_options = PgConnectOptions::from_str(database_url)
            .map_err(|e| DbError::ConfigurationError(e.to_string()))?
            .ssl_mode(sqlx::postgres::PgSslMode::Require);

        info!("Opening tactical link to the Postgres cluster");

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(30))
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionError(e.to_string()))?;

        apply_schema(&pool).await.map_err(|e| DbError::ConnectionError(e.to_string()))?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
