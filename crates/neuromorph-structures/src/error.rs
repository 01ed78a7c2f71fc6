// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error type shared by the morphology model and its parsers.

use thiserror::Error;

/// Result type for morphology operations
pub type MorphologyResult<T> = Result<T, MorphologyError>;

/// Everything that makes a morphology description malformed.
///
/// Every variant is detected at load time. None are transient, so callers
/// should surface them rather than retry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MorphologyError {
    #[error("Syntax error at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Unknown section '{section}'{}", at_line(.line))]
    UnknownSection { section: String, line: Option<usize> },

    #[error("Invalid position {value} on section '{section}'{}: must lie within [0, 1]", at_line(.line))]
    InvalidPosition {
        section: String,
        value: f64,
        line: Option<usize>,
    },

    #[error("Cyclic topology between sections: {}", .sections.join(" -> "))]
    CyclicTopology { sections: Vec<String> },

    #[error("Morphology has {} root sections ({}), expected exactly one", .roots.len(), .roots.join(", "))]
    MultipleRoots { roots: Vec<String> },

    #[error("Section '{section}' is declared more than once{}", at_line(.line))]
    DuplicateSection { section: String, line: Option<usize> },

    #[error("Section '{section}' is already connected to parent '{existing_parent}'{}", at_line(.line))]
    MultipleParents {
        section: String,
        existing_parent: String,
        line: Option<usize>,
    },

    #[error("Invalid sample on section '{section}'{}: {message}", at_line(.line))]
    InvalidSample {
        section: String,
        message: String,
        line: Option<usize>,
    },

    #[error("Invalid section name '{name}': expected an identifier that is not a reserved word")]
    InvalidSectionName { name: String },

    #[error("Section array '{name}' has no HOC form: {reason}")]
    InvalidSectionArray { name: String, reason: String },

    #[error("Invalid load option '{option}': {reason}")]
    InvalidOption { option: String, reason: String },

    #[error("Morphology contains no sections")]
    EmptyMorphology,

    #[error("Naming convention violated: {0}")]
    NamingConvention(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for MorphologyError {
    fn from(err: std::io::Error) -> Self {
        MorphologyError::Io(err.to_string())
    }
}

fn at_line(line: &Option<usize>) -> String {
    match line {
        Some(line) => format!(" at line {}", line),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_and_without_line() {
        let with_line = MorphologyError::UnknownSection {
            section: "axon[0]".to_string(),
            line: Some(12),
        };
        assert_eq!(with_line.to_string(), "Unknown section 'axon[0]' at line 12");

        let without_line = MorphologyError::UnknownSection {
            section: "axon[0]".to_string(),
            line: None,
        };
        assert_eq!(without_line.to_string(), "Unknown section 'axon[0]'");
    }

    #[test]
    fn test_multiple_roots_lists_all_roots() {
        let err = MorphologyError::MultipleRoots {
            roots: vec!["soma[0]".to_string(), "dend[1]".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Morphology has 2 root sections (soma[0], dend[1]), expected exactly one"
        );
    }

    #[test]
    fn test_section_array_message() {
        let err = MorphologyError::InvalidSectionArray {
            name: "dend".to_string(),
            reason: "expected dend[0], found dend[2]".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Section array 'dend' has no HOC form: expected dend[0], found dend[2]"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.hoc");
        let err: MorphologyError = io.into();
        assert!(matches!(err, MorphologyError::Io(msg) if msg.contains("missing.hoc")));
    }
}
