// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Run configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Metres per international foot.
const METRES_PER_FOOT: f64 = 0.3048;

/// How group instances are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Every group instance is one complete part.
    #[default]
    Atomic,
    /// Group instances are replaced by their members.
    Resolve,
    /// Group instances are listed as assemblies and also resolved.
    Hybrid,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Atomic => "atomic",
            Mode::Resolve => "resolve",
            Mode::Hybrid => "hybrid",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn suffix(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "m",
            UnitSystem::Imperial => "ft",
        }
    }

    /// Convert a length in metres into this system's unit.
    #[inline]
    pub fn from_metres(&self, metres: f64) -> f64 {
        match self {
            UnitSystem::Metric => metres,
            UnitSystem::Imperial => metres / METRES_PER_FOOT,
        }
    }
}

/// Safety net against cyclic group references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleDetection {
    /// Only the recursion depth limit stops a cycle.
    #[default]
    DepthBound,
    /// Entering a group that is already on the ancestor chain fails the branch.
    VisitedGroups,
}

/// How ancestor rotations affect inherited dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationPolicy {
    /// Multiply each local axis by the ancestors' per-axis scale.
    #[default]
    Ignore,
    /// Map the local box edges through the composed rotation and scale chain.
    Compose,
}

/// Settings consumed by one BOM run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub mode: Mode,
    /// Digits after the decimal point in reported dimensions.
    pub precision: u8,
    pub max_recursion_depth: usize,
    pub unit_system: UnitSystem,
    /// Length of one scene unit in metres.
    pub unit_scale: f64,
    /// Extra multiplier applied to every reported dimension.
    pub scale_factor: f64,
    pub detect_volume_variants: bool,
    pub cycle_detection: CycleDetection,
    pub rotation_policy: RotationPolicy,
    /// List hidden primitives instead of skipping them.
    pub include_hidden: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Atomic,
            precision: 3,
            max_recursion_depth: 100,
            unit_system: UnitSystem::Metric,
            unit_scale: 1.0,
            scale_factor: 1.0,
            detect_volume_variants: true,
            cycle_detection: CycleDetection::DepthBound,
            rotation_policy: RotationPolicy::Ignore,
            include_hidden: false,
        }
    }
}

impl RunConfig {
    pub const MAX_PRECISION: u8 = 10;

    /// Decimals beyond this are noise in an f64 volume.
    const MAX_VOLUME_DECIMALS: usize = 15;

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.precision > Self::MAX_PRECISION {
            return Err(ConfigError::Precision(self.precision));
        }
        if self.max_recursion_depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        for (name, value) in [
            ("unit_scale", self.unit_scale),
            ("scale_factor", self.scale_factor),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        Ok(())
    }

    /// Format a scene length as it appears in a part key, e.g. `0.050m`.
    pub fn format_length(&self, scene_units: f64) -> String {
        let metres = scene_units.abs() * self.unit_scale * self.scale_factor;
        let value = self.unit_system.from_metres(metres);
        format!(
            "{:.*}{}",
            self.precision as usize,
            value,
            self.unit_system.suffix()
        )
    }

    /// Decimals used to bucket volumes: the cube of the length resolution.
    pub fn volume_decimals(&self) -> usize {
        (3 * self.precision as usize).min(Self::MAX_VOLUME_DECIMALS)
    }

    pub fn format_volume(&self, volume: f64) -> String {
        format!("{:.*}", self.volume_decimals(), volume)
    }
}
