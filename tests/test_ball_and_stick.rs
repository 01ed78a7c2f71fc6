// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
End-to-end test through the umbrella crate:
1. Load the bundled ball-and-stick morphology
2. Inspect topology and geometry
3. Export to JSON and HOC
4. Reload from disk with configuration-derived options

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

use std::f64::consts::PI;

use neuromorph::config::NeuromorphConfig;
use neuromorph::hoc::save_morphology_to_file;
use neuromorph::load_options;
use neuromorph::prelude::*;

#[test]
fn test_complete_morphology_workflow() {
    // 1. Load
    let morphology = load_example_morphology().expect("bundled example must load");
    let soma = SectionId::new("soma", 0);
    let dend = SectionId::new("dend", 0);

    // 2. Topology
    assert_eq!(morphology.len(), 2);
    assert_eq!(morphology.root().id(), &soma);
    assert_eq!(morphology.depth(&dend), Some(1));
    let children: Vec<_> = morphology.children(&soma).map(|s| s.id().clone()).collect();
    assert_eq!(children, vec![dend.clone()]);
    let link = morphology.parent(&dend).unwrap();
    assert_eq!((link.child_position, link.parent_position), (0.0, 1.0));

    // Geometry
    let dendrite = morphology.section(&dend).unwrap();
    assert_eq!(dendrite.length(), 265.0);
    assert_eq!(dendrite.point_at(0.5), Some([0.0, 0.0, 167.5]));
    let geometry = morphology.collect_geometry();
    let expected_area = PI * 25.0 * 35.0 + PI * 5.0 * 265.0;
    assert!((geometry.total_area() - expected_area).abs() < 1e-6);

    // The soma's distal end coincides with the dendrite's proximal end
    let soma_end = morphology.section(&soma).unwrap().point_at(link.parent_position).unwrap();
    let dend_start = dendrite.point_at(link.child_position).unwrap();
    assert_eq!(soma_end, dend_start);

    // 3. Export
    let json = serde_json::to_value(&morphology).unwrap();
    assert_eq!(json["sections"][0]["id"], "soma[0]");
    assert_eq!(json["connections"][0]["parent"], "soma[0]");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ball_and_stick.hoc");
    save_morphology_to_file(&morphology, &path).unwrap();

    // 4. Reload with strict naming from configuration
    let mut config = NeuromorphConfig::default();
    config.loader.strict_naming = true;
    config.loader.default_nseg = 7;
    let reloaded = load_morphology_from_file_with(&path, &load_options(&config.loader)).unwrap();
    assert_eq!(reloaded.sections().len(), 2);
    assert!(reloaded.sections().iter().all(|s| s.nseg() == 7));
    assert_eq!(reloaded.collect_geometry().len(), 14);
}

#[test]
fn test_strict_naming_from_configuration() {
    let mut config = NeuromorphConfig::default();
    config.loader.strict_naming = true;
    config.loader.root_name = "cell_body".to_string();

    let err = parse_morphology_with(EXAMPLE_MORPHOLOGY_HOC, &load_options(&config.loader)).unwrap_err();
    assert!(matches!(err, MorphologyError::NamingConvention(msg) if msg.contains("cell_body")));
}

#[test]
fn test_undeclared_section_is_reported_as_unknown() {
    let err = parse_morphology(
        "create soma[1]\nsoma[0] { pt3dadd(0, 0, 0, 25) pt3dadd(0, 0, 35, 25) }\nconnect dend[0](0), soma[0](1)",
    )
    .unwrap_err();
    assert!(matches!(err, MorphologyError::UnknownSection { ref section, .. } if section == "dend[0]"));
    assert!(err.to_string().contains("dend[0]"));
}
