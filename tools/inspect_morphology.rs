// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Morphology Inspection Tool

Loads a HOC morphology, validates it and prints its section tree.

Usage:
  cargo run --bin inspect_morphology -- <morphology.hoc> [--segments] [--json] [--rewrite out.hoc]

Example:
  cargo run --bin inspect_morphology -- cell.hoc --strict-naming --debug-neuromorph-hoc

Without a file argument the bundled ball-and-stick example is inspected.

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};

use neuromorph::config::{find_config_file, load_config, validate_config, ConfigError, NeuromorphConfig};
use neuromorph::hoc::{
    load_morphology_from_file_with, parse_morphology_with, save_morphology_to_file,
    validate_naming, EXAMPLE_MORPHOLOGY_HOC,
};
use neuromorph::observability::{debug_flags_help, init_console_logging, CrateDebugFlags};
use neuromorph::structures::Morphology;
use neuromorph::{load_options, logging_options};

/// Inspect a neuron morphology written in HOC section syntax
#[derive(Parser, Debug)]
#[command(name = "inspect_morphology", version, author, long_about = None, after_help = debug_flags_help())]
struct Args {
    /// HOC file to load (defaults to the bundled ball-and-stick example)
    file: Option<PathBuf>,

    /// Configuration file (defaults to NEUROMORPH_CONFIG_PATH or ./neuromorph.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the morphology as JSON instead of a tree
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Print per-segment geometry
    #[arg(long, default_value_t = false)]
    segments: bool,

    /// Write the morphology back out as canonical HOC
    #[arg(long, value_name = "OUT")]
    rewrite: Option<PathBuf>,

    /// Fail when the root section is not named after the configured root name
    #[arg(long, default_value_t = false)]
    strict_naming: bool,

    /// Segments per section for sections without `nseg`
    #[arg(long)]
    nseg: Option<u32>,

    /// Console log format (text or json)
    #[arg(long)]
    log_format: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

impl Args {
    fn config_overrides(&self) -> HashMap<String, String> {
        let mut overrides = HashMap::new();
        if self.strict_naming {
            overrides.insert("strict_naming".to_string(), "true".to_string());
        }
        if let Some(nseg) = self.nseg {
            overrides.insert("default_nseg".to_string(), nseg.to_string());
        }
        if let Some(format) = &self.log_format {
            overrides.insert("log_format".to_string(), format.clone());
        }
        if self.verbose {
            overrides.insert("log_level".to_string(), "debug".to_string());
        }
        overrides
    }
}

fn resolve_config(args: &Args) -> Result<NeuromorphConfig> {
    let overrides = args.config_overrides();
    let config = match &args.config {
        Some(path) => load_config(Some(path), Some(&overrides))
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => match find_config_file() {
            Ok(path) => load_config(Some(&path), Some(&overrides))
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            Err(ConfigError::FileNotFound(_)) if env::var("NEUROMORPH_CONFIG_PATH").is_err() => {
                let mut config = NeuromorphConfig::default();
                neuromorph::config::apply_environment_overrides(&mut config);
                neuromorph::config::apply_cli_overrides(&mut config, &overrides);
                config
            }
            Err(e) => return Err(e.into()),
        },
    };
    validate_config(&config)?;
    Ok(config)
}

fn print_tree(morphology: &Morphology) {
    for section in morphology.iter_depth_first() {
        let id = section.id();
        let depth = morphology.depth(id).unwrap_or(0);
        let attachment = morphology
            .parent(id)
            .map(|c| format!(" ({}) -> {}({})", c.child_position, c.parent, c.parent_position))
            .unwrap_or_else(|| " (root)".to_string());
        println!(
            "{}{}{}  n3d={} nseg={} length={:.3}",
            "  ".repeat(depth),
            id,
            attachment,
            section.n3d(),
            section.nseg(),
            section.length()
        );
    }
    println!();
    println!("Sections:     {}", morphology.len());
    println!("Connections:  {}", morphology.connections().len());
    println!("Total length: {:.3}", morphology.total_length());
}

fn print_segments(morphology: &Morphology) {
    let geometry = morphology.collect_geometry();
    println!("{:<16} {:>8} {:>10} {:>10} {:>12}", "section", "x", "length", "diam", "area");
    for segment in geometry.iter() {
        println!(
            "{:<16} {:>8.4} {:>10.3} {:>10.3} {:>12.3}",
            morphology.sections()[segment.section].id().to_string(),
            segment.x,
            segment.length,
            segment.diam,
            segment.area
        );
    }
    println!();
    println!("Segments:      {}", geometry.len());
    println!("Membrane area: {:.3}", geometry.total_area());
}

fn main() -> Result<()> {
    // Per-crate debug flags are not clap options
    let (debug_args, cli_args): (Vec<String>, Vec<String>) =
        env::args().partition(|arg| arg.starts_with("--debug-"));
    let args = Args::parse_from(cli_args);

    let config = resolve_config(&args)?;

    let mut debug_flags = CrateDebugFlags::from_args(debug_args);
    if let Ok(value) = env::var("NEUROMORPH_DEBUG") {
        debug_flags.merge_env_value(&value);
    }
    let log_options = logging_options(&config.logging);

    #[cfg(feature = "file-logging")]
    let _log_guard = if log_options.file_logging {
        Some(neuromorph::observability::init_logging(&debug_flags, &log_options)?)
    } else {
        init_console_logging(&debug_flags, &log_options)?;
        None
    };
    #[cfg(not(feature = "file-logging"))]
    {
        if log_options.file_logging {
            eprintln!("file logging requested but this build lacks the 'file-logging' feature");
        }
        init_console_logging(&debug_flags, &log_options)?;
    }

    debug!(?config, "Resolved configuration");
    let options = load_options(&config.loader);

    let morphology = match &args.file {
        Some(path) => {
            info!(path = %path.display(), "Loading morphology");
            load_morphology_from_file_with(path, &options)
                .with_context(|| format!("Failed to load {}", path.display()))?
        }
        None => {
            info!("No file given, inspecting the bundled example");
            parse_morphology_with(EXAMPLE_MORPHOLOGY_HOC, &options)?
        }
    };

    let naming = validate_naming(&morphology, &options.naming);
    for error in &naming.errors {
        warn!("naming: {}", error);
    }
    for warning in &naming.warnings {
        warn!("naming: {}", warning);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&morphology)?);
    } else {
        print_tree(&morphology);
    }

    if args.segments {
        println!();
        print_segments(&morphology);
    }

    if let Some(out) = &args.rewrite {
        save_morphology_to_file(&morphology, out)
            .with_context(|| format!("Failed to write {}", out.display()))?;
        info!(path = %out.display(), "Wrote canonical HOC");
    }

    Ok(())
}
