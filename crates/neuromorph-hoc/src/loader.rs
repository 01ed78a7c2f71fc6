// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
High-level morphology loading API.

Runs the full pipeline (tokenize, parse statements, build, validate topology)
on a string or a file and returns an immutable [`Morphology`].

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

use std::fs;
use std::path::Path;

use neuromorph_structures::{Morphology, MorphologyError, MorphologyResult};
use tracing::{debug, info, warn};

use crate::builder::MorphologyBuilder;
use crate::parser::parse_statements;
use crate::validator::{validate_naming, NamingConvention};

/// Options controlling how a morphology is loaded
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOptions {
    /// `nseg` given to every created section before any `nseg = N` statement.
    /// Must be at least 1.
    pub default_nseg: u32,
    /// Fail the load when the naming convention reports errors
    pub strict_naming: bool,
    pub naming: NamingConvention,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            default_nseg: 1,
            strict_naming: false,
            naming: NamingConvention::default(),
        }
    }
}

/// Parse a morphology from HOC text with default options
pub fn parse_morphology(source: &str) -> MorphologyResult<Morphology> {
    parse_morphology_with(source, &LoadOptions::default())
}

/// Parse a morphology from HOC text
pub fn parse_morphology_with(source: &str, options: &LoadOptions) -> MorphologyResult<Morphology> {
    if options.default_nseg == 0 {
        return Err(MorphologyError::InvalidOption {
            option: "default_nseg".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    let statements = parse_statements(source)?;
    debug!(statements = statements.len(), "Parsed HOC statements");

    let mut builder = MorphologyBuilder::new(options.default_nseg);
    builder.apply_all(statements)?;
    let morphology = builder.finish()?;

    if options.strict_naming {
        let report = validate_naming(&morphology, &options.naming);
        for warning in &report.warnings {
            warn!("{}", warning);
        }
        if !report.valid {
            return Err(MorphologyError::NamingConvention(report.errors.join("; ")));
        }
    }

    info!(
        sections = morphology.len(),
        connections = morphology.connections().len(),
        root = %morphology.root().id(),
        "Loaded morphology"
    );
    Ok(morphology)
}

/// Load a morphology from a HOC file with default options
pub fn load_morphology_from_file<P: AsRef<Path>>(path: P) -> MorphologyResult<Morphology> {
    load_morphology_from_file_with(path, &LoadOptions::default())
}

/// Load a morphology from a HOC file
pub fn load_morphology_from_file_with<P: AsRef<Path>>(
    path: P,
    options: &LoadOptions,
) -> MorphologyResult<Morphology> {
    let path = path.as_ref();
    debug!(path = %path.display(), "Reading morphology file");
    let source = fs::read_to_string(path)
        .map_err(|e| MorphologyError::Io(format!("{}: {}", path.display(), e)))?;
    parse_morphology_with(&source, options)
}
