// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! The section tree.
//!
//! [`Morphology::from_parts`] is the single construction path: parsers,
//! deserialization and programmatic users all go through the same topology
//! validation, so a `Morphology` value is always a tree with exactly one root.

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{is_valid_section_name, Connection, Sample, Section, SectionId};
use crate::error::{MorphologyError, MorphologyResult};

/// Raw, unvalidated morphology content (also the serde representation).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MorphologyParts {
    pub sections: Vec<Section>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

/// Immutable, validated section tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "MorphologyParts", into = "MorphologyParts")]
pub struct Morphology {
    sections: Vec<Section>,
    connections: Vec<Connection>,
    index: AHashMap<SectionId, usize>,
    /// Per section, (connection index, parent section index)
    parent_of: Vec<Option<(usize, usize)>>,
    /// Per section, child section indices in declaration order
    children_of: Vec<Vec<usize>>,
    root: usize,
}

impl Morphology {
    /// Build and validate a morphology.
    ///
    /// # Errors
    /// - `EmptyMorphology` when `sections` is empty
    /// - `InvalidSectionName`, `DuplicateSection`, `InvalidSample` for bad sections
    /// - `InvalidSectionArray` when one name's sections are not `name[0..n]`
    ///   in order and next to each other
    /// - `UnknownSection`, `InvalidPosition`, `MultipleParents` for bad connections
    /// - `MultipleRoots` or `CyclicTopology` when the graph is not a single tree
    pub fn from_parts(sections: Vec<Section>, connections: Vec<Connection>) -> MorphologyResult<Self> {
        if sections.is_empty() {
            return Err(MorphologyError::EmptyMorphology);
        }

        let mut index = AHashMap::with_capacity(sections.len());
        for (i, section) in sections.iter().enumerate() {
            validate_section(section)?;
            if index.insert(section.id().clone(), i).is_some() {
                return Err(MorphologyError::DuplicateSection {
                    section: section.id().to_string(),
                    line: None,
                });
            }
        }

        check_array_layout(&sections)?;

        let mut parent_of: Vec<Option<(usize, usize)>> = vec![None; sections.len()];
        let mut children_of: Vec<Vec<usize>> = vec![Vec::new(); sections.len()];

        for (c, connection) in connections.iter().enumerate() {
            let child = lookup(&index, &connection.child)?;
            let parent = lookup(&index, &connection.parent)?;

            check_position(&connection.child, connection.child_position)?;
            check_position(&connection.parent, connection.parent_position)?;

            if child == parent {
                return Err(MorphologyError::CyclicTopology {
                    sections: vec![connection.child.to_string(), connection.child.to_string()],
                });
            }
            if let Some((existing, _)) = parent_of[child] {
                return Err(MorphologyError::MultipleParents {
                    section: connection.child.to_string(),
                    existing_parent: connections[existing].parent.to_string(),
                    line: None,
                });
            }

            parent_of[child] = Some((c, parent));
            children_of[parent].push(child);
        }

        for children in &mut children_of {
            children.sort_unstable();
        }

        let roots: Vec<usize> = (0..sections.len()).filter(|&i| parent_of[i].is_none()).collect();
        if roots.len() > 1 {
            return Err(MorphologyError::MultipleRoots {
                roots: roots.iter().map(|&i| sections[i].id().to_string()).collect(),
            });
        }

        // Every non-root has exactly one parent, so anything unreachable from
        // the root sits on (or hangs off) a cycle.
        let mut reached = vec![false; sections.len()];
        if let Some(&root) = roots.first() {
            let mut stack = vec![root];
            while let Some(node) = stack.pop() {
                reached[node] = true;
                stack.extend(children_of[node].iter().copied());
            }
        }
        if let Some(start) = reached.iter().position(|r| !r) {
            let cycle = find_cycle(start, &parent_of);
            return Err(MorphologyError::CyclicTopology {
                sections: cycle.iter().map(|&i| sections[i].id().to_string()).collect(),
            });
        }

        let root = roots[0];
        debug!(
            sections = sections.len(),
            connections = connections.len(),
            root = %sections[root].id(),
            "Built morphology tree"
        );

        Ok(Self {
            sections,
            connections,
            index,
            parent_of,
            children_of,
            root,
        })
    }

    pub fn into_parts(self) -> MorphologyParts {
        MorphologyParts {
            sections: self.sections,
            connections: self.connections,
        }
    }

    /// All sections in declaration order
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Always false for a validated morphology; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn contains(&self, id: &SectionId) -> bool {
        self.index.contains_key(id)
    }

    pub fn section(&self, id: &SectionId) -> Option<&Section> {
        self.index.get(id).map(|&i| &self.sections[i])
    }

    pub fn samples(&self, id: &SectionId) -> Option<&[Sample]> {
        self.section(id).map(Section::samples)
    }

    /// Position of the section in [`Morphology::sections`]
    pub fn section_index(&self, id: &SectionId) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn root(&self) -> &Section {
        &self.sections[self.root]
    }

    /// The connection attaching `id` to its parent, `None` for the root or an unknown id.
    pub fn parent(&self, id: &SectionId) -> Option<&Connection> {
        let i = *self.index.get(id)?;
        self.parent_of[i].map(|(c, _)| &self.connections[c])
    }

    /// Children of `id` in declaration order; empty for leaves and unknown ids.
    pub fn children<'a>(&'a self, id: &SectionId) -> impl Iterator<Item = &'a Section> + 'a {
        let children: &'a [usize] = match self.index.get(id) {
            Some(&i) => &self.children_of[i],
            None => &[],
        };
        children.iter().map(move |&c| &self.sections[c])
    }

    /// Number of connections between `id` and the root (root is 0).
    pub fn depth(&self, id: &SectionId) -> Option<usize> {
        let mut node = *self.index.get(id)?;
        let mut depth = 0;
        while let Some((_, parent)) = self.parent_of[node] {
            node = parent;
            depth += 1;
        }
        Some(depth)
    }

    /// Pre-order traversal starting at the root.
    pub fn iter_depth_first(&self) -> DepthFirst<'_> {
        DepthFirst {
            morphology: self,
            stack: vec![self.root],
        }
    }

    /// Sum of all section lengths
    pub fn total_length(&self) -> f64 {
        self.sections.iter().map(Section::length).sum()
    }
}

impl PartialEq for Morphology {
    fn eq(&self, other: &Self) -> bool {
        self.sections == other.sections && self.connections == other.connections
    }
}

impl TryFrom<MorphologyParts> for Morphology {
    type Error = MorphologyError;

    fn try_from(parts: MorphologyParts) -> Result<Self, Self::Error> {
        Morphology::from_parts(parts.sections, parts.connections)
    }
}

impl From<Morphology> for MorphologyParts {
    fn from(morphology: Morphology) -> Self {
        morphology.into_parts()
    }
}

/// Pre-order iterator over the section tree.
pub struct DepthFirst<'a> {
    morphology: &'a Morphology,
    stack: Vec<usize>,
}

impl<'a> Iterator for DepthFirst<'a> {
    type Item = &'a Section;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack
            .extend(self.morphology.children_of[node].iter().rev().copied());
        Some(&self.morphology.sections[node])
    }
}

fn validate_section(section: &Section) -> MorphologyResult<()> {
    if !is_valid_section_name(section.id().name()) {
        return Err(MorphologyError::InvalidSectionName {
            name: section.id().name().to_string(),
        });
    }
    if section.nseg() == 0 {
        return Err(MorphologyError::InvalidSample {
            section: section.id().to_string(),
            message: "nseg must be at least 1".to_string(),
            line: None,
        });
    }
    for sample in section.samples() {
        sample.validate().map_err(|message| MorphologyError::InvalidSample {
            section: section.id().to_string(),
            message,
            line: None,
        })?;
    }
    Ok(())
}

/// Sections sharing a name form one HOC array: contiguous, indices 0, 1, 2...
fn check_array_layout(sections: &[Section]) -> MorphologyResult<()> {
    let mut closed: AHashSet<&str> = AHashSet::new();
    let mut current: Option<&str> = None;
    let mut expected = 0;

    for section in sections {
        let id = section.id();
        if current != Some(id.name()) {
            if let Some(previous) = current {
                closed.insert(previous);
            }
            if closed.contains(id.name()) {
                return Err(MorphologyError::InvalidSectionArray {
                    name: id.name().to_string(),
                    reason: format!("{} is separated from the rest of its array", id),
                });
            }
            current = Some(id.name());
            expected = 0;
        }
        if id.index() != expected {
            return Err(MorphologyError::InvalidSectionArray {
                name: id.name().to_string(),
                reason: format!("expected {}[{}], found {}", id.name(), expected, id),
            });
        }
        expected += 1;
    }
    Ok(())
}

fn lookup(index: &AHashMap<SectionId, usize>, id: &SectionId) -> MorphologyResult<usize> {
    index.get(id).copied().ok_or_else(|| MorphologyError::UnknownSection {
        section: id.to_string(),
        line: None,
    })
}

fn check_position(id: &SectionId, position: f64) -> MorphologyResult<()> {
    if Connection::is_valid_position(position) {
        Ok(())
    } else {
        Err(MorphologyError::InvalidPosition {
            section: id.to_string(),
            value: position,
            line: None,
        })
    }
}

/// Follow parent links from `start` until a section repeats; returns the
/// cycle in child-to-parent order, closed with its first member.
fn find_cycle(start: usize, parent_of: &[Option<(usize, usize)>]) -> Vec<usize> {
    let mut position_in_path: AHashMap<usize, usize> = AHashMap::new();
    let mut path = Vec::new();
    let mut node = start;
    loop {
        if let Some(&first) = position_in_path.get(&node) {
            let mut cycle = path[first..].to_vec();
            cycle.push(node);
            return cycle;
        }
        position_in_path.insert(node, path.len());
        path.push(node);
        match parent_of[node] {
            Some((_, parent)) => node = parent,
            // Unreachable nodes always have a parent; guard anyway.
            None => return path,
        }
    }
}
