// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # neuromorph - neuron morphology loading
//!
//! Reads neuron morphologies written in NEURON's HOC section syntax and
//! produces an immutable, validated tree of sections with their 3D samples.
//!
//! ## Quick Start
//!
//! ```rust
//! use neuromorph::prelude::*;
//!
//! let morphology = parse_morphology(EXAMPLE_MORPHOLOGY_HOC)?;
//! let soma = SectionId::new("soma", 0);
//!
//! assert_eq!(morphology.root().id(), &soma);
//! assert_eq!(morphology.children(&soma).count(), 1);
//! # Ok::<(), MorphologyError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Foundation: neuromorph-structures                      │
//! │  (SectionId, Sample, Section, Connection, Morphology)   │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Format: neuromorph-hoc                                 │
//! │  (lexer, statement parser, builder, writer)             │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Infrastructure: neuromorph-config,                     │
//! │  neuromorph-observability                               │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## License
//!
//! Apache-2.0

// Re-export foundation
pub use neuromorph_structures as structures;

// Re-export formats
pub use neuromorph_hoc as hoc;

// Re-export infrastructure
pub use neuromorph_config as config;
pub use neuromorph_observability as observability;

use neuromorph_config::{LoaderConfig, LoggingConfig};
use neuromorph_hoc::{LoadOptions, NamingConvention};
use neuromorph_observability::LoggingOptions;

/// Prelude - commonly used types and functions
pub mod prelude {
    pub use crate::structures::{
        Connection, Morphology, MorphologyError, MorphologyResult, Sample, Section, SectionId, Segment,
        SegmentGeometry,
    };

    pub use crate::hoc::{
        load_example_morphology, load_morphology_from_file, load_morphology_from_file_with, parse_morphology,
        parse_morphology_with, validate_naming, write_morphology, LoadOptions, NamingConvention,
        ValidationResult, EXAMPLE_MORPHOLOGY_HOC,
    };
}

/// Loader options from the `[loader]` configuration table
pub fn load_options(config: &LoaderConfig) -> LoadOptions {
    LoadOptions {
        default_nseg: config.default_nseg,
        strict_naming: config.strict_naming,
        naming: NamingConvention {
            root_name: config.root_name.clone(),
            section_prefixes: config.section_prefixes.clone(),
        },
    }
}

/// Logging options from the `[logging]` configuration table
///
/// An unrecognized format falls back to text; `validate_config` reports it.
pub fn logging_options(config: &LoggingConfig) -> LoggingOptions {
    LoggingOptions {
        level: config.level.clone(),
        format: config.format.parse().unwrap_or_default(),
        log_dir: config.log_dir.clone(),
        file_logging: config.file_logging,
        retention_days: config.retention_days,
        retention_runs: config.retention_runs,
    }
}
