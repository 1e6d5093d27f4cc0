//! Environment configuration for different deployment stages

use std::env;
use std::str::FromStr;
use std::time::Duration;

use aws_config::{retry::RetryConfig, timeout::TimeoutConfig, BehaviorVersion};
use axum::http::HeaderValue;
use counter_storage::hit_counter::CounterStrategy;
use thiserror::Error;
use tracing::Level;

/// Table name used against `LocalStack` when none is configured
const DEFAULT_DEVELOPMENT_TABLE_NAME: &str = "cloud-resume-counters";

/// Default HTTP port
const DEFAULT_PORT: u16 = 8001;

/// Errors raised while reading configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required environment variable is not set
    #[error("This service is misconfigured. Please provide the `{0}` environment variable.")]
    MissingVariable(&'static str),

    /// An environment variable holds a value that cannot be used
    #[error("Invalid value for `{name}`: {value}")]
    InvalidVariable {
        /// Variable name
        name: &'static str,
        /// Offending value
        value: String,
    },
}

/// Application environment configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Environment {
    /// Production environment
    Production,
    /// Staging environment
    Staging,
    /// Development environment (uses `LocalStack`)
    Development,
}

impl Environment {
    /// Creates an Environment from the `APP_ENV` environment variable
    ///
    /// # Panics
    ///
    /// Panics if `APP_ENV` contains an invalid value
    #[must_use]
    pub fn from_env() -> Self {
        let env = env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .trim()
            .to_lowercase();

        match env.as_str() {
            "production" => Self::Production,
            "staging" => Self::Staging,
            "development" => Self::Development,
            _ => panic!("Invalid environment: {env}"),
        }
    }

    /// Returns the Dynamo DB table holding the counter records
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingVariable` if `DYNAMODB_TABLE_NAME` is not set outside of
    /// development
    pub fn dynamodb_table_name(&self) -> Result<String, ConfigError> {
        let table_name = env::var("DYNAMODB_TABLE_NAME")
            .ok()
            .filter(|name| !name.trim().is_empty());

        match (self, table_name) {
            (_, Some(table_name)) => Ok(table_name),
            (Self::Production | Self::Staging, None) => {
                Err(ConfigError::MissingVariable("DYNAMODB_TABLE_NAME"))
            }
            (Self::Development, None) => Ok(DEFAULT_DEVELOPMENT_TABLE_NAME.to_string()),
        }
    }

    /// Returns the increment strategy used by the counters
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidVariable` if `COUNTER_STRATEGY` is not a known strategy
    pub fn counter_strategy(&self) -> Result<CounterStrategy, ConfigError> {
        env::var("COUNTER_STRATEGY").map_or_else(
            |_| Ok(CounterStrategy::default()),
            |value| {
                CounterStrategy::from_str(value.trim()).map_err(|_| {
                    ConfigError::InvalidVariable {
                        name: "COUNTER_STRATEGY",
                        value,
                    }
                })
            },
        )
    }

    /// Returns the port the HTTP server listens on
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidVariable` if `PORT` is not a valid port number
    pub fn port(&self) -> Result<u16, ConfigError> {
        env::var("PORT").map_or(Ok(DEFAULT_PORT), |value| {
            value
                .parse()
                .map_err(|_| ConfigError::InvalidVariable { name: "PORT", value })
        })
    }

    /// Origin allowed to call the API from a browser, `None` allows any origin
    ///
    /// An unset, blank or `*` value allows any origin.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidVariable` if `CORS_ALLOWED_ORIGIN` is not a valid header value
    pub fn cors_allowed_origin(&self) -> Result<Option<HeaderValue>, ConfigError> {
        let Ok(value) = env::var("CORS_ALLOWED_ORIGIN") else {
            return Ok(None);
        };

        let origin = value.trim();
        if origin.is_empty() || origin == "*" {
            return Ok(None);
        }

        HeaderValue::from_str(origin)
            .map(Some)
            .map_err(|_| ConfigError::InvalidVariable {
                name: "CORS_ALLOWED_ORIGIN",
                value,
            })
    }

    /// Whether to show API docs
    #[must_use]
    pub const fn show_api_docs(&self) -> bool {
        matches!(self, Self::Development | Self::Staging)
    }

    /// Returns the endpoint URL to use for AWS services
    #[must_use]
    pub const fn override_aws_endpoint_url(&self) -> Option<&str> {
        match self {
            // Regular AWS endpoints for production and staging
            Self::Production | Self::Staging => None,
            // LocalStack endpoint for development
            Self::Development => Some("http://localhost:4566"),
        }
    }

    /// AWS configuration with retry and timeout settings
    pub async fn aws_config(&self) -> aws_config::SdkConfig {
        let retry_config = RetryConfig::standard()
            .with_max_attempts(3)
            .with_initial_backoff(Duration::from_millis(50));

        let timeout_config = TimeoutConfig::builder()
            .operation_timeout(Duration::from_secs(30))
            .build();

        let mut config_builder = aws_config::load_defaults(BehaviorVersion::latest())
            .await
            .to_builder()
            .retry_config(retry_config)
            .timeout_config(timeout_config);

        if let Some(endpoint_url) = self.override_aws_endpoint_url() {
            config_builder = config_builder.endpoint_url(endpoint_url);
        }

        config_builder.build()
    }

    /// Default log level of the development subscriber, overridable with `TRACING_LEVEL`
    ///
    /// Only development installs a subscriber from this level. Production and staging log
    /// through `datadog_tracing::init`, which ignores it.
    #[must_use]
    pub fn tracing_level(&self) -> Level {
        env::var("TRACING_LEVEL")
            .ok()
            .and_then(|val| val.parse::<Level>().ok())
            .unwrap_or(match self {
                Self::Production | Self::Staging => Level::INFO,
                Self::Development => Level::DEBUG,
            })
    }
}
