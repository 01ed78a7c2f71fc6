// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

/// One 3D centerline point with its diameter (µm).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub diam: f64,
}

impl Sample {
    pub fn new(x: f64, y: f64, z: f64, diam: f64) -> Self {
        Self { x, y, z, diam }
    }

    pub fn position(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Euclidean distance between the two centerline points
    pub fn distance_to(&self, other: &Sample) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Linear interpolation of position and diameter, `t` in [0, 1]
    pub fn lerp(&self, other: &Sample, t: f64) -> Sample {
        Sample {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
            diam: self.diam + (other.diam - self.diam) * t,
        }
    }

    /// Checks that every component is finite and the diameter is non-negative.
    pub fn validate(&self) -> Result<(), String> {
        if ![self.x, self.y, self.z, self.diam].iter().all(|v| v.is_finite()) {
            return Err(format!(
                "non-finite value in ({}, {}, {}, {})",
                self.x, self.y, self.z, self.diam
            ));
        }
        if self.diam < 0.0 {
            return Err(format!("negative diameter {}", self.diam));
        }
        Ok(())
    }
}
