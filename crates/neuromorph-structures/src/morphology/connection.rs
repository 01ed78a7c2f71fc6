// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use super::SectionId;

/// Attachment of `child` (at `child_position`) onto `parent` (at
/// `parent_position`). Positions are fractional arc lengths in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub child: SectionId,
    pub child_position: f64,
    pub parent: SectionId,
    pub parent_position: f64,
}

impl Connection {
    pub fn new(
        child: SectionId,
        child_position: f64,
        parent: SectionId,
        parent_position: f64,
    ) -> Self {
        Self {
            child,
            child_position,
            parent,
            parent_position,
        }
    }

    /// Both ends inclusive; NaN is rejected.
    pub fn is_valid_position(position: f64) -> bool {
        (0.0..=1.0).contains(&position)
    }
}
