// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # neuromorph-structures
//!
//! The core data model for neuron morphologies. A [`Morphology`] is an
//! immutable tree of [`Section`]s, each carrying an ordered list of 3D
//! [`Sample`]s (`x, y, z, diameter`) and attached to its parent through a
//! [`Connection`] at fractional arc-length positions.
//!
//! Models are produced once (by a parser or by [`Morphology::from_parts`])
//! and never mutated afterwards, so they are freely shareable across threads.
//!
//! ```
//! use neuromorph_structures::{Connection, Morphology, Sample, Section, SectionId};
//!
//! let soma = Section::with_samples(
//!     SectionId::new("soma", 0),
//!     vec![Sample::new(0.0, 0.0, 0.0, 25.0), Sample::new(0.0, 0.0, 35.0, 25.0)],
//! );
//! let dend = Section::with_samples(
//!     SectionId::new("dend", 0),
//!     vec![Sample::new(0.0, 0.0, 35.0, 5.0), Sample::new(0.0, 0.0, 300.0, 5.0)],
//! );
//! let connection = Connection::new(SectionId::new("dend", 0), 0.0, SectionId::new("soma", 0), 1.0);
//!
//! let morphology = Morphology::from_parts(vec![soma, dend], vec![connection]).unwrap();
//! assert_eq!(morphology.root().id().to_string(), "soma[0]");
//! assert_eq!(morphology.total_length(), 300.0);
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod morphology;

pub use error::{MorphologyError, MorphologyResult};
pub use morphology::geometry::{Segment, SegmentGeometry};
pub use morphology::{
    is_valid_section_name, Connection, DepthFirst, Morphology, MorphologyParts, Sample, Section, SectionId,
    RESERVED_WORDS,
};
