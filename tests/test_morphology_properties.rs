// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Property tests over randomly generated section trees.

use neuromorph::prelude::*;
use proptest::prelude::*;

/// A generated morphology: `soma[0]` plus `dend[0..n]`, each dendrite
/// attached to an earlier section.
#[derive(Debug, Clone)]
struct TreeSpec {
    /// For dend[k]: (parent index where 0 = soma and j+1 = dend[j], child x, parent x)
    links: Vec<(usize, f64, f64)>,
    /// Samples per section, soma first
    samples: Vec<Vec<(f64, f64, f64, f64)>>,
    nseg: Vec<u32>,
}

impl TreeSpec {
    fn section_name(index: usize) -> String {
        if index == 0 {
            "soma[0]".to_string()
        } else {
            format!("dend[{}]", index - 1)
        }
    }

    fn to_hoc(&self) -> String {
        let mut out = String::from("create soma[1]\n");
        if !self.links.is_empty() {
            out.push_str(&format!("create dend[{}]\n", self.links.len()));
        }
        for (index, samples) in self.samples.iter().enumerate() {
            out.push_str(&format!("{} {{\n", Self::section_name(index)));
            out.push_str(&format!("    nseg = {}\n", self.nseg[index]));
            for (x, y, z, d) in samples {
                out.push_str(&format!("    pt3dadd({}, {}, {}, {})\n", x, y, z, d));
            }
            out.push_str("}\n");
        }
        for (k, (parent, child_x, parent_x)) in self.links.iter().enumerate() {
            out.push_str(&format!(
                "connect {}({}), {}({})\n",
                Self::section_name(k + 1),
                child_x,
                Self::section_name(*parent),
                parent_x
            ));
        }
        out
    }
}

fn position() -> impl Strategy<Value = f64> {
    prop_oneof![Just(0.0), Just(1.0), 0.0f64..=1.0]
}

fn sample() -> impl Strategy<Value = (f64, f64, f64, f64)> {
    (-500.0f64..500.0, -500.0f64..500.0, -500.0f64..500.0, 0.0f64..30.0)
}

fn tree_spec() -> impl Strategy<Value = TreeSpec> {
    (0usize..12).prop_flat_map(|dendrites| {
        let links = (0..dendrites)
            .map(|k| (0..=k, position(), position()))
            .collect::<Vec<_>>();
        let samples = prop::collection::vec(prop::collection::vec(sample(), 0..5), dendrites + 1);
        let nseg = prop::collection::vec(1u32..6, dendrites + 1);
        (links, samples, nseg).prop_map(|(links, samples, nseg)| TreeSpec { links, samples, nseg })
    })
}

proptest! {
    #[test]
    fn loaded_trees_have_exactly_one_root(spec in tree_spec()) {
        let morphology = parse_morphology(&spec.to_hoc()).expect("generated tree must load");

        let roots: Vec<_> = morphology
            .sections()
            .iter()
            .filter(|s| morphology.parent(s.id()).is_none())
            .collect();
        prop_assert_eq!(roots.len(), 1);
        prop_assert_eq!(roots[0].id(), &SectionId::new("soma", 0));
        prop_assert_eq!(morphology.connections().len(), morphology.len() - 1);

        // Every section is reachable from the root exactly once
        let visited: Vec<_> = morphology.iter_depth_first().map(|s| s.id().clone()).collect();
        prop_assert_eq!(visited.len(), morphology.len());
        let mut unique = visited.clone();
        unique.sort();
        unique.dedup();
        prop_assert_eq!(unique.len(), visited.len());
    }

    #[test]
    fn write_then_parse_is_identity(spec in tree_spec()) {
        let morphology = parse_morphology(&spec.to_hoc()).expect("generated tree must load");
        let reparsed = parse_morphology(&write_morphology(&morphology)).expect("written HOC must load");
        prop_assert_eq!(&reparsed, &morphology);
    }

    #[test]
    fn json_export_round_trips(spec in tree_spec()) {
        let morphology = parse_morphology(&spec.to_hoc()).expect("generated tree must load");
        let json = serde_json::to_string(&morphology).expect("serialize");
        let restored: Morphology = serde_json::from_str(&json).expect("deserialize");
        prop_assert_eq!(&restored, &morphology);
    }

    #[test]
    fn out_of_range_positions_are_rejected(bad in prop_oneof![-10.0f64..-1e-9, 1.000_000_1f64..10.0]) {
        let source = format!("create soma[1], dend[1]\nconnect dend[0](0), soma[0]({})", bad);
        let rejected = matches!(
            parse_morphology(&source),
            Err(MorphologyError::InvalidPosition { .. })
        );
        prop_assert!(rejected);
    }
}
