// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Naming-convention validation.

Downstream tooling classifies sections by name: the root is expected to be
the soma and every other section should start with a conventional prefix
(`dend`, `apic`, `axon`, ...). The HOC format itself does not require this,
so validation is opt-in and reports errors and warnings separately.

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

use neuromorph_structures::Morphology;

/// Expected section naming
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingConvention {
    /// Required name of the root section array
    pub root_name: String,
    /// Accepted name prefixes for non-root sections
    pub section_prefixes: Vec<String>,
}

impl Default for NamingConvention {
    fn default() -> Self {
        Self {
            root_name: "soma".to_string(),
            section_prefixes: vec!["dend".to_string(), "apic".to_string(), "axon".to_string()],
        }
    }
}

impl NamingConvention {
    /// Whether a non-root section name is acceptable
    pub fn accepts(&self, name: &str) -> bool {
        name == self.root_name || self.section_prefixes.iter().any(|p| name.starts_with(p.as_str()))
    }
}

/// Validation result
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    /// Whether the morphology is valid
    pub valid: bool,
    /// Blocking issues
    pub errors: Vec<String>,
    /// Non-blocking issues
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_error(&mut self, error: String) {
        self.valid = false;
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Check section names against `convention`.
///
/// A root not named after `root_name` is an error; non-root sections that
/// match neither the root name nor a prefix are warnings.
pub fn validate_naming(morphology: &Morphology, convention: &NamingConvention) -> ValidationResult {
    let mut result = ValidationResult::new();

    let root = morphology.root().id();
    if root.name() != convention.root_name {
        result.add_error(format!(
            "root section {} should be named '{}'",
            root, convention.root_name
        ));
    }

    for section in morphology.sections() {
        let id = section.id();
        if id == root {
            continue;
        }
        if !convention.accepts(id.name()) {
            result.add_warning(format!(
                "section {} does not start with any of: {}",
                id,
                convention.section_prefixes.join(", ")
            ));
        }
    }

    result
}
