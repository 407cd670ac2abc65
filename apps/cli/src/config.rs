// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI configuration: a TOML file, then command line overrides.
//!
//! ```toml
//! [run]
//! mode = "hybrid"
//! precision = 2
//! rotation_policy = "compose"
//!
//! [report]
//! format = "text"
//! output = "workbench.bom.txt"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;

use bom_lite_engine::{CycleDetection, Mode, RotationPolicy, RunConfig, UnitSystem};

use crate::Args;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Atomic,
    Resolve,
    Hybrid,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Atomic => Mode::Atomic,
            ModeArg::Resolve => Mode::Resolve,
            ModeArg::Hybrid => Mode::Hybrid,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RotationArg {
    Ignore,
    Compose,
}

impl From<RotationArg> for RotationPolicy {
    fn from(rotation: RotationArg) -> Self {
        match rotation {
            RotationArg::Ignore => RotationPolicy::Ignore,
            RotationArg::Compose => RotationPolicy::Compose,
        }
    }
}

/// Report settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub format: Format,
    /// Target file; stdout when unset.
    pub output: Option<PathBuf>,
    /// Append collected diagnostics to the text report.
    pub diagnostics: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: Format::Text,
            output: None,
            diagnostics: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub run: RunConfig,
    pub report: ReportConfig,
}

impl CliConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Override file values with the flags given on the command line.
    pub fn apply(&mut self, args: &Args) {
        let run = &mut self.run;
        if let Some(mode) = args.mode {
            run.mode = mode.into();
        }
        if let Some(precision) = args.precision {
            run.precision = precision;
        }
        if let Some(depth) = args.max_depth {
            run.max_recursion_depth = depth;
        }
        if args.imperial {
            run.unit_system = UnitSystem::Imperial;
        }
        if args.no_variants {
            run.detect_volume_variants = false;
        }
        if args.strict_cycles {
            run.cycle_detection = CycleDetection::VisitedGroups;
        }
        if args.include_hidden {
            run.include_hidden = true;
        }
        if let Some(rotation) = args.rotation {
            run.rotation_policy = rotation.into();
        }

        if let Some(format) = args.format {
            self.report.format = format;
        }
        if args.output.is_some() {
            self.report.output = args.output.clone();
        }
    }
}
