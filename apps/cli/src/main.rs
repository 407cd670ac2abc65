// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! BOM-Lite CLI - bill of materials for a scene file.
//!
//! Loads a JSON scene snapshot, resolves the selected objects and prints the
//! counted parts as a plain-text table or as JSON.
//!
//! ```text
//! bom-lite workbench.json --mode hybrid --precision 2
//! RUST_LOG=debug bom-lite workbench.json --config bom.toml --format json
//! ```

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use bom_lite_scene::{InMemoryGeometry, Scene};

mod config;
mod report;

use config::{CliConfig, Format, ModeArg, RotationArg};

#[derive(Debug, Parser)]
#[command(name = "bom-lite")]
#[command(about = "Create a bill of materials from a scene file", long_about = None)]
pub struct Args {
    /// Scene snapshot (JSON)
    pub scene: PathBuf,

    /// TOML configuration; flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// How group instances are listed
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Decimals of reported dimensions
    #[arg(short, long)]
    pub precision: Option<u8>,

    /// Deepest group nesting followed before a branch is abandoned
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Report feet instead of metres
    #[arg(long)]
    pub imperial: bool,

    /// Skip volume measurement
    #[arg(long)]
    pub no_variants: bool,

    /// Fail a branch that enters a group already being resolved
    #[arg(long)]
    pub strict_cycles: bool,

    /// List hidden parts too
    #[arg(long)]
    pub include_hidden: bool,

    /// How instance rotations affect dimensions
    #[arg(long, value_enum)]
    pub rotation: Option<RotationArg>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<Format>,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };
    config.apply(&args);

    let json = fs::read_to_string(&args.scene)
        .with_context(|| format!("Failed to read scene {}", args.scene.display()))?;
    let scene = Scene::from_json(&json)
        .with_context(|| format!("Failed to load scene {}", args.scene.display()))?;
    tracing::info!(
        scene = %scene.name,
        nodes = scene.node_count(),
        groups = scene.group_count(),
        "Scene loaded"
    );

    let mut geometry =
        InMemoryGeometry::new(&scene).with_max_depth(config.run.max_recursion_depth);
    let output = bom_lite_engine::run(&scene, &mut geometry, &config.run)
        .context("Bill of materials could not be created")?;

    match &config.report.output {
        Some(path) => {
            let mut file = io::BufWriter::new(
                fs::File::create(path)
                    .with_context(|| format!("Failed to create {}", path.display()))?,
            );
            write_report(&mut file, &output, &config)?;
            file.flush()?;
            tracing::info!(path = %path.display(), "Bill of materials written");
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            write_report(&mut lock, &output, &config)?;
        }
    }

    Ok(())
}

fn write_report<W: Write>(
    out: &mut W,
    output: &bom_lite_engine::BomOutput,
    config: &CliConfig,
) -> Result<()> {
    match config.report.format {
        Format::Text => report::write_text(out, output, config.report.diagnostics)?,
        Format::Json => {
            serde_json::to_writer_pretty(&mut *out, output)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
