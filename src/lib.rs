pub mod adapters;
pub mod api;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{MemoryRegistrantStore, PostgresRegistrantStore, RazorpayClient};
pub use api::{create_router, AppState};
pub use config::TomlConfig;
pub use crate::core::registration::RegistrationService;
pub use utils::error::{AppError, GatewayError, RegistrationError, Result, StoreError};
