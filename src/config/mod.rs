//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (BLOCKSCAN_CHAT_API_KEY, BLOCKSCAN_CHAT_API_URL)
//!     → caller overrides (CLI flags)
//!     → validation.rs (semantic checks)
//!     → ChatConfig (validated, immutable)
//! ```
//!
//! All fields have defaults to allow minimal configs.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_config_with_env, load_config_with_overrides, ConfigError};
pub use schema::{ApiConfig, ChatConfig, ObservabilityConfig};
