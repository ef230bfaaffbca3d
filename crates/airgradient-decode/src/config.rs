use airgradient_payload::{PayloadFormat, Scaling};
use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServiceConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Text encoding of the payload argument (hex, base64)
    #[serde(default)]
    pub input_format: PayloadFormat,

    /// Pretty-print the decoded JSON
    #[serde(default = "default_pretty")]
    pub pretty: bool,

    /// Emit raw wire integers instead of scaled values
    #[serde(default)]
    pub raw: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_pretty() -> bool {
    true
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Environment::with_prefix("AIRGRADIENT"))
            .build()?
            .try_deserialize()
    }

    pub fn scaling(&self) -> Scaling {
        if self.raw {
            Scaling::Raw
        } else {
            Scaling::Scaled
        }
    }
}
