pub mod env_expand;
pub mod settings;

pub use settings::{CheckConfig, CheckSettings, Config, ConfigError, LogsConfig};
