pub mod api;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use api::{create_api_server, router, ApiResponse, AppState};
pub use config::{CliConfig, RelayConfig};
pub use crate::core::{dispatch::TelegramNotifier, relay::LeadRelay};
pub use utils::error::{RelayError, Result};
