// [libs/infra/db/src/lib.rs]
/*!
 * APARATO: ESTRATO DE PERSISTENCIA (ESTRATO L2)
 * RESPONSABILIDAD: POOL POSTGRES, ESQUEMA, CANDADO POR TENANT Y CRUD TIPADO
 */

pub mod advisory_lock;
pub mod client;
pub mod errors;
pub mod repositories;
pub mod schema;

pub use advisory_lock::{tenant_lock_key, with_tenant_lock, LockOutcome};
pub use client::DbClient;
pub use errors::DbError;
