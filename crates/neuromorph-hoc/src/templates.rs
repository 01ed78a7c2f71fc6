// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Bundled morphology templates.

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

use neuromorph_structures::{Morphology, MorphologyResult};

use crate::loader::parse_morphology;

/// Ball-and-stick neuron: a 35 um soma with one 265 um dendrite attached at its distal end
pub const EXAMPLE_MORPHOLOGY_HOC: &str = include_str!("../morphologies/example_morphology.hoc");

/// Load the bundled ball-and-stick morphology
pub fn load_example_morphology() -> MorphologyResult<Morphology> {
    parse_morphology(EXAMPLE_MORPHOLOGY_HOC)
}
