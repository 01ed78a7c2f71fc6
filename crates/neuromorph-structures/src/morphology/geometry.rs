// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Segment discretization.
//!
//! Each section is split into `nseg` equal arc-length segments. For every
//! segment we report its start and end coordinates (interpolated along the
//! 3D centerline), length, mean diameter and lateral membrane area computed
//! as a sum of truncated cones between consecutive 3D points.

use serde::Serialize;
use std::f64::consts::PI;
use tracing::{debug, warn};

use super::{Morphology, Sample, Section};

/// One discretized piece of a section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    /// Index of the owning section in [`Morphology::sections`]
    pub section: usize,
    /// Fractional position of the segment center along its section
    pub x: f64,
    pub start: [f64; 3],
    pub end: [f64; 3],
    pub length: f64,
    /// Length-weighted mean diameter
    pub diam: f64,
    /// Lateral (frustum) membrane area
    pub area: f64,
}

impl Segment {
    pub fn midpoint(&self) -> [f64; 3] {
        [
            (self.start[0] + self.end[0]) / 2.0,
            (self.start[1] + self.end[1]) / 2.0,
            (self.start[2] + self.end[2]) / 2.0,
        ]
    }
}

/// All segments of a morphology, ordered by section then by position.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SegmentGeometry {
    segments: Vec<Segment>,
}

impl SegmentGeometry {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    /// Segments belonging to the section at `section_index`
    pub fn for_section(&self, section_index: usize) -> impl Iterator<Item = &Segment> + '_ {
        self.segments.iter().filter(move |s| s.section == section_index)
    }

    pub fn total_area(&self) -> f64 {
        self.segments.iter().map(|s| s.area).sum()
    }

    pub fn total_length(&self) -> f64 {
        self.segments.iter().map(|s| s.length).sum()
    }
}

impl Morphology {
    /// Discretize every section into `nseg` segments.
    ///
    /// Sections without 3D samples contribute no segments.
    pub fn collect_geometry(&self) -> SegmentGeometry {
        let mut segments = Vec::new();
        for (index, section) in self.sections().iter().enumerate() {
            if section.samples().is_empty() {
                warn!(section = %section.id(), "Section has no 3D samples, skipping geometry");
                continue;
            }
            segments.extend(section_segments(index, section));
        }
        debug!(segments = segments.len(), "Collected segment geometry");
        SegmentGeometry { segments }
    }
}

fn section_segments(index: usize, section: &Section) -> Vec<Segment> {
    let arcs = section.arc_lengths();
    let length = arcs[arcs.len() - 1];
    let nseg = section.nseg().max(1);
    let seg_length = length / nseg as f64;

    (0..nseg)
        .map(|k| {
            let a0 = length * k as f64 / nseg as f64;
            let a1 = length * (k + 1) as f64 / nseg as f64;
            let start = section.sample_at_arc(&arcs, a0);
            let end = section.sample_at_arc(&arcs, a1);
            let (area, diam) = frustum_area_and_diam(section, &arcs, a0, a1);
            Segment {
                section: index,
                x: (k as f64 + 0.5) / nseg as f64,
                start: start.position(),
                end: end.position(),
                length: seg_length,
                diam,
                area,
            }
        })
        .collect()
}

/// Lateral area and mean diameter over the arc interval [a0, a1].
fn frustum_area_and_diam(section: &Section, arcs: &[f64], a0: f64, a1: f64) -> (f64, f64) {
    let mut breakpoints = vec![a0];
    breakpoints.extend(arcs.iter().copied().filter(|&a| a > a0 && a < a1));
    breakpoints.push(a1);

    let points: Vec<Sample> = breakpoints
        .iter()
        .map(|&a| section.sample_at_arc(arcs, a))
        .collect();

    let mut area = 0.0;
    let mut weighted_diam = 0.0;
    for (pair, bounds) in points.windows(2).zip(breakpoints.windows(2)) {
        let piece = bounds[1] - bounds[0];
        let (r0, r1) = (pair[0].diam / 2.0, pair[1].diam / 2.0);
        area += PI * (r0 + r1) * ((r0 - r1).powi(2) + piece * piece).sqrt();
        weighted_diam += (pair[0].diam + pair[1].diam) / 2.0 * piece;
    }

    let span = a1 - a0;
    let diam = if span > 0.0 {
        weighted_diam / span
    } else {
        section.sample_at_arc(arcs, a0).diam
    };
    (area, diam)
}
