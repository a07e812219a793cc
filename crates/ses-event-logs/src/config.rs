// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::env;

use crate::log_fetcher::{FetchLimits, DEFAULT_MAX_EVENTS, MAX_PAGE_LIMIT};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_LOG_LEVEL: &str = "info";
const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Log level (e.g., trace, debug, info, warn, error)
    pub log_level: String,
    /// AWS region of the CloudWatch Logs endpoint
    pub aws_region: String,
    /// Overrides the CloudWatch Logs endpoint, primarily for integration tests
    pub endpoint_url: Option<String>,
    /// Maximum number of log events gathered for a single report
    pub max_events: usize,
    /// Number of log events requested per read call
    pub page_limit: i32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            aws_region: DEFAULT_REGION.to_string(),
            endpoint_url: None,
            max_events: DEFAULT_MAX_EVENTS,
            page_limit: MAX_PAGE_LIMIT,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Config, ConfigError> {
        let host = env::var("SES_LOGS_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = env::var("SES_LOGS_PORT")
            .ok()
            .and_then(|port| port.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let log_level = env::var("SES_LOGS_LOG_LEVEL")
            .map(|val| val.to_lowercase())
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());
        let aws_region = env::var("SES_LOGS_AWS_REGION")
            .or_else(|_| env::var("AWS_REGION"))
            .unwrap_or_else(|_| DEFAULT_REGION.to_string());
        let max_events = env::var("SES_LOGS_MAX_EVENTS")
            .ok()
            .and_then(|val| val.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_EVENTS);
        let page_limit = env::var("SES_LOGS_PAGE_LIMIT")
            .ok()
            .and_then(|val| val.parse::<i32>().ok())
            .unwrap_or(MAX_PAGE_LIMIT);

        let config = Config {
            host,
            port,
            log_level,
            aws_region,
            endpoint_url: env::var("SES_LOGS_ENDPOINT_URL").ok(),
            max_events,
            page_limit,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::Invalid(
                "SES_LOGS_PORT must be greater than 0".to_string(),
            ));
        }

        if self.aws_region.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "AWS region cannot be empty".to_string(),
            ));
        }

        if !VALID_LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                self.log_level
            )));
        }

        if self.max_events == 0 {
            return Err(ConfigError::Invalid(
                "SES_LOGS_MAX_EVENTS must be greater than 0".to_string(),
            ));
        }

        if !(1..=MAX_PAGE_LIMIT).contains(&self.page_limit) {
            return Err(ConfigError::Invalid(format!(
                "SES_LOGS_PAGE_LIMIT must be between 1 and {MAX_PAGE_LIMIT}"
            )));
        }

        Ok(())
    }

    pub fn fetch_limits(&self) -> FetchLimits {
        FetchLimits {
            max_events: self.max_events,
            page_limit: self.page_limit,
        }
    }
}
