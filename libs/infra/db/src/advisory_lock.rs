// [libs/infra/db/src/advisory_lock.rs]
/*!
 * APARATO: TENANT ADVISORY LOCK PRIMITIVE (ESTRATO L2)
 * RESPONSABILIDAD: MUTEX DE SESION POR TENANT SOBRE POSTGRES
 *
 * El motor de aprovisionamiento depende de que un unico invocador mute la
 * fila de un tenant a la vez. Un candado advisory de sesion cumple esto
 * sin bloqueos a nivel de esquema y se libera automaticamente si la
 * conexion se cierra, pero aqui se libera explicitamente antes de devolver
 * la conexion al pool para que el siguiente prestamo no herede el candado.
 */

use crate::errors::DbError;
use sha2::{Digest, Sha256};
use sqlx::{PgConnection, PgPool};
use std::future::Future;
use std::pin::Pin;
use tracing::{instrument, warn};

/// Cuerpo de `with_tenant_lock`: boxed para evitar el problema de unificacion
/// de HRTB que surge cuando un closure que devuelve un future prestado de su
/// propio parametro se expresa como un generico `Fut` sin cuantificador
/// `for<'c>` explicito ("implementation of `FnOnce` is not general enough").
pub type LockedBody<'c, T> = Pin<Box<dyn Future<Output = T> + Send + 'c>>;

/// Resultado de una adquisicion de candado: si no se adquirio, `body`
/// nunca se invoco y `value` es `None`.
pub struct LockOutcome<T> {
    pub acquired: bool,
    pub value: Option<T>,
}

/// Deriva una clave de candado estable de 64 bits a partir del tenant id.
/// Estable entre reinicios del proceso (a diferencia de un hasher con
/// semilla aleatoria), requisito para que dos invocaciones del mismo
/// tenant siempre compitan por la misma clave.
pub fn tenant_lock_key(tenant_id: &str) -> i64 {
    let digest = Sha256::digest(tenant_id.as_bytes());
    let mut key_bytes = [0u8; 8];
    key_bytes.copy_from_slice(&digest[0..8]);
    i64::from_be_bytes(key_bytes)
}

/// Adquiere el candado advisory de sesion del tenant, ejecuta `body` con la
/// conexion prestada si se adquirio, y libera el candado en toda salida.
/// Si la adquisicion falla, retorna inmediatamente sin invocar `body`.
#[instrument(skip(pool, body))]
pub async fn with_tenant_lock<T, F>(
    pool: &PgPool,
    tenant_id: &str,
    body: F,
) -> Result<LockOutcome<T>, DbError>
where
    F: for<'c> FnOnce(&'c mut PgConnection) -> LockedBody<'c, T>,
{
    let key = tenant_lock_key(tenant_id);
    let mut conn = pool.acquire().await.map_err(|e| DbError::ConnectionError(e.to_string()))?;

    let acquired: bool = sqlx::query_scalar("SELECT pg_try_advisory_lock($1)")
        .bind(key)
        .fetch_one(&mut *conn)
        .await
        .map_err(DbError::QueryError)?;

    if !acquired {
        return Ok(LockOutcome { acquired: false, value: None });
    }

    let value = body(&mut conn).await;

    if let Err(release_fault) = sqlx::query("SELECT pg_advisory_unlock($1)")
        .bind(key)
        .execute(&mut *conn)
        .await
    {
        warn!("advisory unlock failed for tenant lock key {}: {}", key, release_fault);
    }

    Ok(LockOutcome { acquired: true, value: Some(value) })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_key_is_stable_for_same_tenant() {
        assert_eq!(tenant_lock_key("acct_X"), tenant_lock_key("acct_X"));
    }

    #[test]
    fn lock_key_differs_across_tenants() {
        assert_ne!(tenant_lock_key("acct_X"), tenant_lock_key("acct_Y"));
    }
}
