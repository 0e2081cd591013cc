use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use validator::Validate;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// How an input-object literal argument reaches the directive statement
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectArgumentMode {
    /// Bind the whole object as one map-valued parameter
    #[default]
    Parameter,
    /// Render the object as a Cypher map literal in the bindings map.
    /// Objects containing variable references still become parameters.
    Inline,
}

#[derive(Debug, Error)]
#[error("unknown object argument mode `{0}` (expected `parameter` or `inline`)")]
pub struct UnknownObjectArgumentMode(String);

impl FromStr for ObjectArgumentMode {
    type Err = UnknownObjectArgumentMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "parameter" => Ok(ObjectArgumentMode::Parameter),
            "inline" => Ok(ObjectArgumentMode::Inline),
            _ => Err(UnknownObjectArgumentMode(s.to_string())),
        }
    }
}

impl fmt::Display for ObjectArgumentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectArgumentMode::Parameter => write!(f, "parameter"),
            ObjectArgumentMode::Inline => write!(f, "inline"),
        }
    }
}

/// Translator configuration with validation
#[derive(Clone, Debug, Validate, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    /// Deepest selection-set nesting the projection composer will follow
    #[validate(range(
        min = 1,
        max = 128,
        message = "Max selection depth must be between 1 and 128"
    ))]
    pub max_selection_depth: u32,

    pub object_argument_mode: ObjectArgumentMode,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            max_selection_depth: 32,
            object_argument_mode: ObjectArgumentMode::Parameter,
        }
    }
}

impl TranslatorConfig {
    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            max_selection_depth: parse_env_var("GQL_CYPHER_MAX_SELECTION_DEPTH", "32")?,
            object_argument_mode: parse_env_var("GQL_CYPHER_OBJECT_ARGUMENT_MODE", "parameter")?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from CLI arguments with validation
    pub fn from_cli(cli: CliConfig) -> Result<Self, ConfigError> {
        let config = Self {
            max_selection_depth: cli.max_selection_depth,
            object_argument_mode: cli.object_argument_mode,
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from YAML file
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            field: "yaml_file".to_string(),
            value: "file read failed".to_string(),
            source: Box::new(e),
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            field: "yaml_content".to_string(),
            value: content,
            source: Box::new(e),
        })?;

        config.validate()?;
        Ok(config)
    }
}

/// CLI configuration (parsed from command line arguments)
#[derive(Clone, Debug)]
pub struct CliConfig {
    pub max_selection_depth: u32,
    pub object_argument_mode: ObjectArgumentMode,
}

/// Parse an environment variable with a default value
fn parse_env_var<T: FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|e| ConfigError::Parse {
        field: key.to_string(),
        value,
        source: Box::new(e),
    })
}
