// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Morphology model: identifiers, samples, sections, connections and the
//! section tree built from them.

mod connection;
pub mod geometry;
mod sample;
mod section;
mod section_id;
mod tree;

pub use connection::Connection;
pub use sample::Sample;
pub use section::Section;
pub use section_id::{is_valid_section_name, SectionId, RESERVED_WORDS};
pub use tree::{DepthFirst, Morphology, MorphologyParts};
