// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
# neuromorph-hoc

Loader and writer for neuron morphologies described in NEURON's HOC section
syntax (`create`, `pt3dadd`, `pt3dclear`, `nseg`, `connect`).

```
use neuromorph_hoc::parse_morphology;

let morphology = parse_morphology(
    "create soma[1], dend[1]
     soma[0] { pt3dadd(0, 0, 0, 25) pt3dadd(0, 0, 35, 25) }
     dend[0] { pt3dadd(0, 0, 35, 5) pt3dadd(0, 0, 300, 5) }
     connect dend[0](0), soma[0](1)",
)
.unwrap();

assert_eq!(morphology.root().id().to_string(), "soma[0]");
assert_eq!(morphology.children(morphology.root().id()).count(), 1);
```

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod builder;
pub mod lexer;
pub mod loader;
pub mod parser;
pub mod templates;
pub mod validator;
pub mod writer;

pub use builder::MorphologyBuilder;
pub use loader::{
    load_morphology_from_file, load_morphology_from_file_with, parse_morphology, parse_morphology_with,
    LoadOptions,
};
pub use parser::{DEFAULT_CHILD_POSITION, DEFAULT_PARENT_POSITION};
pub use templates::{load_example_morphology, EXAMPLE_MORPHOLOGY_HOC};
pub use validator::{validate_naming, NamingConvention, ValidationResult};
pub use writer::{save_morphology_to_file, write_morphology};

pub use neuromorph_structures::{Morphology, MorphologyError, MorphologyResult};
