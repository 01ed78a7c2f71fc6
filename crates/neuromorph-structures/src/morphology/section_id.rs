// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::MorphologyError;

/// Identifier of a section: an array name plus an index, rendered `name[index]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SectionId {
    name: String,
    index: usize,
}

impl SectionId {
    pub fn new(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

/// Statement keywords of the HOC subset; none of them can name a section.
pub const RESERVED_WORDS: [&str; 5] = ["create", "connect", "pt3dadd", "pt3dclear", "nseg"];

/// Returns true for HOC-style identifiers (`[A-Za-z_][A-Za-z0-9_]*`) that
/// are not one of the [`RESERVED_WORDS`].
pub fn is_valid_section_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_') && !RESERVED_WORDS.contains(&name)
}

impl Display for SectionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]", self.name, self.index)
    }
}

impl FromStr for SectionId {
    type Err = MorphologyError;

    /// Parses `name[index]`. Errors are reported as syntax errors on line 1.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let syntax = |column: usize, message: &str| MorphologyError::Syntax {
            line: 1,
            column,
            message: format!("{} in section identifier '{}'", message, s),
        };

        let trimmed = s.trim();
        let open = trimmed
            .find('[')
            .ok_or_else(|| syntax(1, "missing '['"))?;
        let body = trimmed
            .strip_suffix(']')
            .ok_or_else(|| syntax(trimmed.len(), "missing trailing ']'"))?;

        let name = &trimmed[..open];
        if !is_valid_section_name(name) {
            return Err(syntax(1, "invalid name"));
        }

        let index = body[open + 1..]
            .trim()
            .parse::<usize>()
            .map_err(|_| syntax(open + 2, "invalid index"))?;

        Ok(SectionId::new(name, index))
    }
}

impl TryFrom<String> for SectionId {
    type Error = MorphologyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SectionId> for String {
    fn from(id: SectionId) -> Self {
        id.to_string()
    }
}
