//! Arc length parameterization utilities for curves.
//!
//! Provides the lookup table used to convert between the raw spline parameter
//! `u` and the uniform-speed parameter `s`.

use bevy::prelude::*;

/// Target distance between table samples, in world units (one sample per centimetre).
pub const ARC_LENGTH_SAMPLE_SPACING: f32 = 0.01;

/// Divisions used for the initial length estimate, and the table's floor.
pub const MIN_ARC_LENGTH_DIVISIONS: usize = 200;

/// Upper bound on table size for very large curves.
///
/// Curves longer than `MAX_ARC_LENGTH_DIVISIONS * ARC_LENGTH_SAMPLE_SPACING`
/// (about 655 units) are sampled more coarsely than one sample per centimetre,
/// so their interpolation error grows with length.
pub const MAX_ARC_LENGTH_DIVISIONS: usize = 65_536;

/// Arc length lookup table for efficient u-to-length and length-to-u conversion.
///
/// The table is built by sampling the curve at regular u intervals and
/// accumulating the distance between samples. Sample `i` holds the cumulative
/// length at `u = i / divisions`.
#[derive(Debug, Clone, Default)]
pub struct ArcLengthTable {
    /// Cumulative lengths, always starting with 0.0.
    lengths: Vec<f32>,
}

impl ArcLengthTable {
    /// Compute an arc length table for a curve given as a function of `u`.
    ///
    /// The number of divisions scales with an estimate of the curve's length so
    /// that samples are at most [`ARC_LENGTH_SAMPLE_SPACING`] apart.
    pub fn compute(evaluate: impl Fn(f32) -> Vec3) -> Self {
        let estimate = Self::with_divisions(&evaluate, MIN_ARC_LENGTH_DIVISIONS);
        let divisions = (estimate.total_length() / ARC_LENGTH_SAMPLE_SPACING).ceil() as usize;
        let divisions = divisions.clamp(MIN_ARC_LENGTH_DIVISIONS, MAX_ARC_LENGTH_DIVISIONS);

        if divisions == MIN_ARC_LENGTH_DIVISIONS {
            estimate
        } else {
            Self::with_divisions(&evaluate, divisions)
        }
    }

    /// Compute a table with a fixed number of divisions.
    pub fn with_divisions(evaluate: impl Fn(f32) -> Vec3, divisions: usize) -> Self {
        let divisions = divisions.max(1);
        let mut lengths = Vec::with_capacity(divisions + 1);
        let mut cumulative_length = 0.0;
        let mut prev_point = evaluate(0.0);

        lengths.push(0.0);

        for i in 1..=divisions {
            let u = i as f32 / divisions as f32;
            let point = evaluate(u);
            cumulative_length += (point - prev_point).length();
            lengths.push(cumulative_length);
            prev_point = point;
        }

        Self { lengths }
    }

    /// Number of divisions (samples minus one).
    pub fn divisions(&self) -> usize {
        self.lengths.len().saturating_sub(1)
    }

    /// Get the total arc length of the curve.
    pub fn total_length(&self) -> f32 {
        self.lengths.last().copied().unwrap_or(0.0)
    }

    /// Map a uniform-speed parameter `s` in [0, 1] to the raw parameter `u`.
    pub fn arc_to_raw(&self, s: f32) -> f32 {
        let total_length = self.total_length();
        if self.lengths.len() < 2 || total_length <= 0.0 {
            return s.clamp(0.0, 1.0);
        }

        let target = s.clamp(0.0, 1.0) * total_length;

        // First sample whose cumulative length reaches the target
        let upper = self
            .lengths
            .partition_point(|&l| l < target)
            .clamp(1, self.lengths.len() - 1);
        let lower = upper - 1;

        let l0 = self.lengths[lower];
        let l1 = self.lengths[upper];
        let divisions = self.divisions() as f32;

        if (l1 - l0).abs() < 1e-9 {
            return lower as f32 / divisions;
        }

        // Linear interpolation within segment
        let alpha = (target - l0) / (l1 - l0);
        (lower as f32 + alpha) / divisions
    }

    /// Get the arc length from the start of the curve to raw parameter `u`.
    pub fn raw_to_length(&self, u: f32) -> f32 {
        if self.lengths.len() < 2 {
            return 0.0;
        }

        let float_idx = u.clamp(0.0, 1.0) * self.divisions() as f32;
        let idx = (float_idx as usize).min(self.lengths.len() - 2);
        let alpha = float_idx - idx as f32;

        let l0 = self.lengths[idx];
        let l1 = self.lengths[idx + 1];
        l0 + alpha * (l1 - l0)
    }

    /// Map a raw parameter `u` to the uniform-speed parameter `s`.
    pub fn raw_to_arc(&self, u: f32) -> f32 {
        let total_length = self.total_length();
        if total_length <= 0.0 {
            return u.clamp(0.0, 1.0);
        }
        self.raw_to_length(u) / total_length
    }

    /// Cumulative lengths, one per sample.
    pub fn lengths(&self) -> &[f32] {
        &self.lengths
    }
}
