// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Applies parsed statements, in source order, to build a [`Morphology`].

Reference checks happen here so errors carry the offending line; the final
tree checks (single root, no cycles) are delegated to
[`Morphology::from_parts`].

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

use ahash::AHashMap;
use tracing::{debug, trace};

use neuromorph_structures::{
    Connection, Morphology, MorphologyError, MorphologyResult, Sample, Section, SectionId,
};

use crate::parser::{BodyStatement, SectionRef, Statement};

/// Incremental morphology builder
#[derive(Debug)]
pub struct MorphologyBuilder {
    default_nseg: u32,
    sections: Vec<Section>,
    /// name -> (first section index, count)
    arrays: AHashMap<String, (usize, usize)>,
    connections: Vec<Connection>,
    /// child section index -> index into `connections`
    parent_links: AHashMap<usize, usize>,
}

impl MorphologyBuilder {
    /// `default_nseg` must be at least 1; sections created with 0 fail in
    /// [`MorphologyBuilder::finish`].
    pub fn new(default_nseg: u32) -> Self {
        Self {
            default_nseg,
            sections: Vec::new(),
            arrays: AHashMap::new(),
            connections: Vec::new(),
            parent_links: AHashMap::new(),
        }
    }

    pub fn apply_all(&mut self, statements: Vec<Statement>) -> MorphologyResult<()> {
        for statement in statements {
            self.apply(statement)?;
        }
        Ok(())
    }

    pub fn apply(&mut self, statement: Statement) -> MorphologyResult<()> {
        match statement {
            Statement::Create { declarations, line } => {
                for (name, count) in declarations {
                    self.create(name, count, line)?;
                }
                Ok(())
            }
            Statement::Block { section, body } => self.block(&section, body),
            Statement::Connect {
                child,
                child_position,
                parent,
                parent_position,
                line,
            } => self.connect(&child, child_position, &parent, parent_position, line),
        }
    }

    /// Validate the accumulated topology and produce the model.
    pub fn finish(self) -> MorphologyResult<Morphology> {
        Morphology::from_parts(self.sections, self.connections)
    }

    fn create(&mut self, name: String, count: usize, line: usize) -> MorphologyResult<()> {
        if self.arrays.contains_key(&name) {
            return Err(MorphologyError::DuplicateSection {
                section: name,
                line: Some(line),
            });
        }
        debug!(name = %name, count, line, "Creating sections");
        let start = self.sections.len();
        let nseg = self.default_nseg;
        self.sections
            .extend((0..count).map(|i| Section::new(SectionId::new(name.clone(), i)).with_nseg(nseg)));
        self.arrays.insert(name, (start, count));
        Ok(())
    }

    fn resolve(&self, section: &SectionRef) -> MorphologyResult<usize> {
        match self.arrays.get(section.id.name()) {
            Some(&(start, count)) if section.id.index() < count => Ok(start + section.id.index()),
            _ => Err(MorphologyError::UnknownSection {
                section: section.id.to_string(),
                line: Some(section.line),
            }),
        }
    }

    fn block(&mut self, section: &SectionRef, body: Vec<BodyStatement>) -> MorphologyResult<()> {
        let target = self.resolve(section)?;
        let target = &mut self.sections[target];
        for statement in body {
            match statement {
                BodyStatement::Pt3dAdd { x, y, z, diam, line } => {
                    let sample = Sample::new(x, y, z, diam);
                    sample.validate().map_err(|message| MorphologyError::InvalidSample {
                        section: section.id.to_string(),
                        message,
                        line: Some(line),
                    })?;
                    trace!(section = %section.id, x, y, z, diam, "pt3dadd");
                    target.push_sample(sample);
                }
                BodyStatement::Pt3dClear { .. } => target.clear_samples(),
                BodyStatement::Nseg { value, .. } => target.set_nseg(value),
            }
        }
        Ok(())
    }

    fn connect(
        &mut self,
        child: &SectionRef,
        child_position: f64,
        parent: &SectionRef,
        parent_position: f64,
        line: usize,
    ) -> MorphologyResult<()> {
        let child_index = self.resolve(child)?;
        self.resolve(parent)?;

        for (section, position) in [(child, child_position), (parent, parent_position)] {
            if !Connection::is_valid_position(position) {
                return Err(MorphologyError::InvalidPosition {
                    section: section.id.to_string(),
                    value: position,
                    line: Some(line),
                });
            }
        }

        if let Some(&existing) = self.parent_links.get(&child_index) {
            return Err(MorphologyError::MultipleParents {
                section: child.id.to_string(),
                existing_parent: self.connections[existing].parent.to_string(),
                line: Some(line),
            });
        }

        debug!(child = %child.id, child_position, parent = %parent.id, parent_position, "Connecting sections");
        self.parent_links.insert(child_index, self.connections.len());
        self.connections.push(Connection::new(
            child.id.clone(),
            child_position,
            parent.id.clone(),
            parent_position,
        ));
        Ok(())
    }
}

impl Default for MorphologyBuilder {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_statements;

    fn build(source: &str) -> MorphologyResult<Morphology> {
        let mut builder = MorphologyBuilder::default();
        builder.apply_all(parse_statements(source)?)?;
        builder.finish()
    }

    #[test]
    fn test_blocks_append_and_clear() {
        let morphology = build(
            "create soma[1]\n\
             soma[0] { pt3dadd(0, 0, 0, 10) }\n\
             soma[0] { pt3dadd(0, 0, 5, 10) }\n",
        )
        .unwrap();
        assert_eq!(morphology.root().n3d(), 2);

        let cleared = build(
            "create soma[1]\n\
             soma[0] { pt3dadd(0, 0, 0, 10) pt3dclear() pt3dadd(1, 1, 1, 2) nseg = 7 }\n",
        )
        .unwrap();
        assert_eq!(cleared.root().samples(), &[Sample::new(1.0, 1.0, 1.0, 2.0)]);
        assert_eq!(cleared.root().nseg(), 7);
    }

    #[test]
    fn test_unknown_sections_carry_line() {
        let undeclared = build("create soma[1]\nconnect dend[0](0), soma[0](1)").unwrap_err();
        assert_eq!(
            undeclared,
            MorphologyError::UnknownSection {
                section: "dend[0]".to_string(),
                line: Some(2)
            }
        );

        let out_of_range = build("create dend[2]\ndend[2] { pt3dadd(0, 0, 0, 1) }").unwrap_err();
        assert!(matches!(out_of_range, MorphologyError::UnknownSection { line: Some(2), .. }));

        let block_before_create = build("soma[0] { pt3dadd(0, 0, 0, 1) }\ncreate soma[1]").unwrap_err();
        assert!(matches!(block_before_create, MorphologyError::UnknownSection { line: Some(1), .. }));
    }

    #[test]
    fn test_duplicate_create() {
        let err = build("create soma[1]\ncreate dend[1], soma[2]").unwrap_err();
        assert_eq!(
            err,
            MorphologyError::DuplicateSection {
                section: "soma".to_string(),
                line: Some(2)
            }
        );
    }

    #[test]
    fn test_invalid_position_and_sample() {
        let position = build("create soma[1], dend[1]\nconnect dend[0](0), soma[0](-0.5)").unwrap_err();
        assert_eq!(
            position,
            MorphologyError::InvalidPosition {
                section: "soma[0]".to_string(),
                value: -0.5,
                line: Some(2)
            }
        );

        let sample = build("create soma[1]\nsoma[0] {\n pt3dadd(0, 0, 0, -3)\n}").unwrap_err();
        assert!(matches!(sample, MorphologyError::InvalidSample { line: Some(3), .. }));
    }

    #[test]
    fn test_multiple_parents() {
        let err = build(
            "create soma[1], dend[2]\n\
             connect dend[0](0), soma[0](1)\n\
             connect dend[1](0), soma[0](1)\n\
             connect dend[1](0), dend[0](1)",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            MorphologyError::MultipleParents { section, existing_parent, line: Some(4) }
                if section == "dend[1]" && existing_parent == "soma[0]"
        ));
    }

    #[test]
    fn test_zero_default_nseg_fails_on_finish() {
        let mut builder = MorphologyBuilder::new(0);
        builder.apply_all(parse_statements("create soma[1]").unwrap()).unwrap();
        assert!(matches!(builder.finish(), Err(MorphologyError::InvalidSample { .. })));
    }

    #[test]
    fn test_default_nseg_applies_to_created_sections() {
        let mut builder = MorphologyBuilder::new(4);
        builder
            .apply_all(parse_statements("create soma[1]\nsoma[0] { pt3dadd(0, 0, 0, 1) }").unwrap())
            .unwrap();
        assert_eq!(builder.finish().unwrap().root().nseg(), 4);
    }
}
