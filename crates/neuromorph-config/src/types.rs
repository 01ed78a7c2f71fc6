// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! Each struct maps to a table in `neuromorph.toml`. Every field has a
//! default, so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NeuromorphConfig {
    pub loader: LoaderConfig,
    pub logging: LoggingConfig,
}

/// Morphology loading behaviour
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Reject morphologies whose root is not named `root_name`
    pub strict_naming: bool,
    pub root_name: String,
    pub section_prefixes: Vec<String>,
    /// Segments per section unless the file sets `nseg`
    pub default_nseg: u32,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            strict_naming: false,
            root_name: "soma".to_string(),
            section_prefixes: vec!["dend".to_string(), "apic".to_string(), "axon".to_string()],
            default_nseg: 1,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// trace, debug, info, warn or error
    pub level: String,
    /// text or json
    pub format: String,
    pub log_dir: PathBuf,
    pub file_logging: bool,
    pub retention_days: u32,
    /// Most recent run folders to keep
    pub retention_runs: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
            log_dir: PathBuf::from("./logs"),
            file_logging: false,
            retention_days: 7,
            retention_runs: 10,
        }
    }
}
