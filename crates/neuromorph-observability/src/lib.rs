// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # neuromorph-observability
//!
//! Logging setup shared by every neuromorph binary, with per-crate debug
//! flag support.
//!
//! ## Features
//! - `file-logging`: timestamped run folders with daily-rotated log files

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod config;
pub mod init;

// Re-export commonly used items
pub use cli::*;
pub use config::*;
pub use init::*;

/// Known neuromorph crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "neuromorph",
    "neuromorph-structures",
    "neuromorph-hoc",
    "neuromorph-config",
    "neuromorph-observability",
    "inspect-morphology",
];
