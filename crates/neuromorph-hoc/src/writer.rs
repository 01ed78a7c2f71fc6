// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
HOC writer.

Serializes a [`Morphology`] back into the same HOC subset the parser reads.
Floats use Rust's shortest round-trip formatting, so writing and re-parsing
reproduces every sample and position exactly.

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

use std::fs;
use std::path::Path;

use neuromorph_structures::{Morphology, MorphologyResult};
use tracing::info;

/// Render `morphology` as HOC source.
///
/// Layout: one `create` line per section array (in declaration order), one
/// block per section, then every `connect` statement. A validated
/// [`Morphology`] stores each array as `name[0..count]` in order, so the
/// output re-parses to an equal model.
pub fn write_morphology(morphology: &Morphology) -> String {
    let mut out = String::new();

    // Arrays in order of first appearance
    let mut arrays: Vec<(&str, usize)> = Vec::new();
    for section in morphology.sections() {
        let name = section.id().name();
        if let Some((last, count)) = arrays.last_mut() {
            if *last == name {
                *count += 1;
                continue;
            }
        }
        arrays.push((name, 1));
    }
    for (name, count) in &arrays {
        out.push_str(&format!("create {}[{}]\n", name, count));
    }

    for section in morphology.sections() {
        out.push_str(&format!("\n{} {{\n", section.id()));
        if section.nseg() != 1 {
            out.push_str(&format!("    nseg = {}\n", section.nseg()));
        }
        for sample in section.samples() {
            out.push_str(&format!(
                "    pt3dadd({}, {}, {}, {})\n",
                sample.x, sample.y, sample.z, sample.diam
            ));
        }
        out.push_str("}\n");
    }

    if !morphology.connections().is_empty() {
        out.push('\n');
    }
    for connection in morphology.connections() {
        out.push_str(&format!(
            "connect {}({}), {}({})\n",
            connection.child, connection.child_position, connection.parent, connection.parent_position
        ));
    }

    out
}

/// Write `morphology` as HOC to `path`.
pub fn save_morphology_to_file<P: AsRef<Path>>(morphology: &Morphology, path: P) -> MorphologyResult<()> {
    let path = path.as_ref();
    fs::write(path, write_morphology(morphology))?;
    info!(path = %path.display(), sections = morphology.len(), "Saved morphology");
    Ok(())
}
