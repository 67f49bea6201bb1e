//! Rareforge - Config tool
//!
//! Validates and exports rarity configs and simulates craft rolls against
//! them.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use rareforge::data::{
    default_config_path, export_default_config, load_config, read_config_file, validate, RarityConfig,
};
use rareforge::items::{effective_chances, WeightedTierSelector};
use rareforge::TierTable;

#[derive(Parser)]
#[command(name = "rareforge")]
#[command(about = "Rarity tier config tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a config for errors and warnings
    Validate {
        /// Config file (defaults to the user config directory)
        path: Option<PathBuf>,
    },

    /// Write the built-in config to a file
    ExportDefaults {
        /// Destination (defaults to the user config directory)
        path: Option<PathBuf>,
    },

    /// Roll many crafts and report how often each tier came up
    Simulate {
        /// Config file (uses the built-in tiers if not specified)
        path: Option<PathBuf>,

        /// Number of crafts to roll
        #[arg(short, long, default_value = "100000")]
        crafts: u64,

        /// RNG seed
        #[arg(short, long, default_value = "0")]
        seed: u64,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the upgrade chain
    Chain {
        /// Config file (uses the built-in tiers if not specified)
        path: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct TierRow {
    tier: String,
    configured: f64,
    effective: f64,
    observed: f64,
}

#[derive(Serialize)]
struct SimulationReport {
    crafts: u64,
    seed: u64,
    tiers: Vec<TierRow>,
    plain: f64,
}

fn read_config(path: Option<&Path>) -> Result<RarityConfig> {
    match path {
        Some(path) => load_config(path).with_context(|| format!("loading {}", path.display())),
        None => Ok(RarityConfig::default()),
    }
}

fn build_table(config: &RarityConfig) -> Result<TierTable> {
    TierTable::build(config.tiers.clone()).context("building tier table")
}

fn run_validate(path: PathBuf) -> Result<()> {
    let config = read_config_file(&path)?;
    let report = validate(&config);

    for warning in &report.warnings {
        println!("warning: {}", warning);
    }
    for error in &report.errors {
        println!("error: {}", error);
    }
    if !report.is_valid() {
        bail!("{} has {} error(s)", path.display(), report.errors.len());
    }
    println!(
        "{} is valid ({} tiers, {} warnings)",
        path.display(),
        config.tiers.len(),
        report.warnings.len()
    );
    Ok(())
}

fn run_simulate(path: Option<&Path>, crafts: u64, seed: u64, json: bool) -> Result<()> {
    let config = read_config(path)?;
    let table = build_table(&config)?;
    let selector = WeightedTierSelector::new(&table);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    let mut plain = 0u64;
    for _ in 0..crafts {
        match selector.select(true, &mut rng) {
            Some(tier) => *counts.entry(tier.id.to_string()).or_insert(0) += 1,
            None => plain += 1,
        }
    }

    let percent = |n: u64| if crafts == 0 { 0.0 } else { n as f64 / crafts as f64 * 100.0 };
    let tiers: Vec<TierRow> = effective_chances(&table)
        .into_iter()
        .filter_map(|(id, effective)| {
            let tier = table.by_id(id.as_str())?;
            Some(TierRow {
                tier: id.to_string(),
                configured: tier.craft_chance,
                effective,
                observed: percent(counts.get(id.as_str()).copied().unwrap_or(0)),
            })
        })
        .collect();
    let report = SimulationReport {
        crafts,
        seed,
        tiers,
        plain: percent(plain),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{:<12} {:>11} {:>11} {:>11}", "tier", "configured", "effective", "observed");
    for row in &report.tiers {
        println!(
            "{:<12} {:>10.3}% {:>10.3}% {:>10.3}%",
            row.tier, row.configured, row.effective, row.observed
        );
    }
    println!("{:<12} {:>11} {:>11} {:>10.3}%", "(none)", "", "", report.plain);
    Ok(())
}

fn run_chain(path: Option<&Path>) -> Result<()> {
    let config = read_config(path)?;
    let table = build_table(&config)?;
    for tier in table.chain() {
        let arrow = if tier.is_maximal() { "" } else { " ->" };
        println!("{:<8} {} ({}){}", tier.stars(), tier.display_name, tier.id, arrow);
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { path } => {
            run_validate(path.unwrap_or_else(default_config_path))?;
        }

        Commands::ExportDefaults { path } => {
            let path = path.unwrap_or_else(default_config_path);
            export_default_config(&path)?;
            println!("Wrote {}", path.display());
        }

        Commands::Simulate {
            path,
            crafts,
            seed,
            json,
        } => {
            run_simulate(path.as_deref(), crafts, seed, json)?;
        }

        Commands::Chain { path } => {
            run_chain(path.as_deref())?;
        }
    }

    Ok(())
}
