// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use super::{Sample, SectionId};

/// A named compartment with its ordered centerline samples.
///
/// Sample order runs from the proximal (position 0) to the distal
/// (position 1) end. `nseg` is the number of equal-length segments the
/// section is split into by [`crate::Morphology::collect_geometry`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    id: SectionId,
    samples: Vec<Sample>,
    #[serde(default = "default_nseg")]
    nseg: u32,
}

fn default_nseg() -> u32 {
    1
}

impl Section {
    pub fn new(id: SectionId) -> Self {
        Self::with_samples(id, Vec::new())
    }

    pub fn with_samples(id: SectionId, samples: Vec<Sample>) -> Self {
        Self {
            id,
            samples,
            nseg: default_nseg(),
        }
    }

    pub fn with_nseg(mut self, nseg: u32) -> Self {
        self.nseg = nseg;
        self
    }

    pub fn id(&self) -> &SectionId {
        &self.id
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn nseg(&self) -> u32 {
        self.nseg
    }

    /// Number of 3D samples
    pub fn n3d(&self) -> usize {
        self.samples.len()
    }

    pub fn push_sample(&mut self, sample: Sample) {
        self.samples.push(sample);
    }

    pub fn clear_samples(&mut self) {
        self.samples.clear();
    }

    pub fn set_nseg(&mut self, nseg: u32) {
        self.nseg = nseg;
    }

    /// Total centerline length
    pub fn length(&self) -> f64 {
        self.samples
            .windows(2)
            .map(|pair| pair[0].distance_to(&pair[1]))
            .sum()
    }

    /// Cumulative arc length at every sample, starting at 0.
    pub fn arc_lengths(&self) -> Vec<f64> {
        let mut arcs = Vec::with_capacity(self.samples.len());
        let mut total = 0.0;
        for (i, sample) in self.samples.iter().enumerate() {
            if i > 0 {
                total += self.samples[i - 1].distance_to(sample);
            }
            arcs.push(total);
        }
        arcs
    }

    /// Sample interpolated at fractional arc length `x`.
    ///
    /// Returns `None` when `x` is outside [0, 1] or the section has no
    /// samples. A zero-length section yields its first sample everywhere.
    pub fn interpolate(&self, x: f64) -> Option<Sample> {
        if !(0.0..=1.0).contains(&x) || self.samples.is_empty() {
            return None;
        }
        let arcs = self.arc_lengths();
        let length = arcs[arcs.len() - 1];
        Some(self.sample_at_arc(&arcs, x * length))
    }

    /// Centerline point at fractional arc length `x`
    pub fn point_at(&self, x: f64) -> Option<[f64; 3]> {
        self.interpolate(x).map(|s| s.position())
    }

    /// Interpolates at absolute arc length `arc`, clamped to the section.
    /// `arcs` must come from [`Section::arc_lengths`] and be non-empty.
    pub(crate) fn sample_at_arc(&self, arcs: &[f64], arc: f64) -> Sample {
        let hi = arcs.partition_point(|&a| a < arc);
        if hi == 0 {
            return self.samples[0];
        }
        if hi >= arcs.len() {
            return self.samples[self.samples.len() - 1];
        }
        let lo = hi - 1;
        let span = arcs[hi] - arcs[lo];
        let t = (arc - arcs[lo]) / span;
        self.samples[lo].lerp(&self.samples[hi], t)
    }
}
