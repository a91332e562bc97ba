// [libs/infra/db/src/repositories/mod.rs]
pub mod oauth_connections;
pub mod oauth_states;
pub mod provisioned_databases;
