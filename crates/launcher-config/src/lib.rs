//! Configuration types and loading for the launcher.

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{ContractsConfig, DeploymentConfig, LauncherConfig, RelayConfig};
