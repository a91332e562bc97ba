// [libs/infra/control-plane/src/lib.rs]
mod client;
mod errors;
mod sync_installer;

pub use client::{ControlPlaneClient, CreatedProject};
pub use errors::{ControlPlaneError, SyncInstallError};
pub use sync_installer::{HttpSyncInstaller, SyncInstaller};
