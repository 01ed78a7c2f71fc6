// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Collects every problem in one pass so a bad file can be fixed at once.

use crate::{ConfigError, ConfigResult, NeuromorphConfig};
use neuromorph_structures::is_valid_section_name;

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    MissingRequired { field: String },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequired { field } => {
                write!(f, "Missing required configuration: {}", field)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: [&str; 2] = ["text", "json"];

/// Validate the complete configuration
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every problem found
pub fn validate_config(config: &NeuromorphConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    validate_loader(config, &mut errors);
    validate_logging(config, &mut errors);

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

fn validate_loader(config: &NeuromorphConfig, errors: &mut Vec<ConfigValidationError>) {
    let loader = &config.loader;

    if loader.root_name.is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "loader.root_name".to_string(),
        });
    } else if !is_valid_section_name(&loader.root_name) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "loader.root_name".to_string(),
            reason: format!("'{}' is not a valid section name", loader.root_name),
        });
    }

    if loader.section_prefixes.iter().any(|p| p.is_empty()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "loader.section_prefixes".to_string(),
            reason: "prefixes must not be empty".to_string(),
        });
    }

    if loader.default_nseg == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "loader.default_nseg".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
}

fn validate_logging(config: &NeuromorphConfig, errors: &mut Vec<ConfigValidationError>) {
    let logging = &config.logging;

    if !LOG_LEVELS.contains(&logging.level.to_lowercase().as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.level".to_string(),
            reason: format!("must be one of {}", LOG_LEVELS.join(", ")),
        });
    }

    if !LOG_FORMATS.contains(&logging.format.to_lowercase().as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.format".to_string(),
            reason: "must be 'text' or 'json'".to_string(),
        });
    }

    if logging.file_logging && logging.log_dir.as_os_str().is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "logging.log_dir".to_string(),
        });
    }
}
