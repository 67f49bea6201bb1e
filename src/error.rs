//! Error types
//!
//! Configuration problems are the only real errors in the crate. Gameplay
//! outcomes (rejected upgrades, failed rolls, stale tags) are plain values.

use std::path::PathBuf;

use thiserror::Error;

/// A structural problem with a tier configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("no rarity tiers are defined")]
    NoTiers,
    #[error("tier id `{0}` is defined more than once")]
    DuplicateTier(String),
    #[error("tier `{tier}` has an empty {field}")]
    EmptyField { tier: String, field: &'static str },
    #[error("tier `{tier}` upgrades into unknown tier `{target}`")]
    DanglingUpgradeTarget { tier: String, target: String },
    #[error("upgrade chain contains a cycle through `{0}`")]
    ChainCycle(String),
    #[error("tiers {sources:?} all upgrade into `{target}`")]
    BranchingChain { target: String, sources: Vec<String> },
    #[error("more than one maximal tier: {0:?}")]
    MultipleMaximalTiers(Vec<String>),
    #[error("tier `{0}` is not connected to the upgrade chain")]
    Disconnected(String),
    #[error("{context}: {field} = {value} is outside 0..=100")]
    PercentOutOfRange {
        context: String,
        field: &'static str,
        value: f64,
    },
    #[error("{context}: {field} = {value} must not be negative")]
    NegativeValue {
        context: String,
        field: &'static str,
        value: f64,
    },
    #[error("{context}: {field} = {value} is above the limit of {max}")]
    TooLarge {
        context: String,
        field: &'static str,
        value: u64,
        max: u64,
    },
    #[error("{context} references unknown tier `{tier}`")]
    UnknownTierReference { context: String, tier: String },
}

/// Failure to read or parse a configuration file
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] ron::Error),
    #[error("invalid configuration: {0}")]
    Invalid(#[from] ConfigError),
}

/// Outcome of validating a whole configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    /// Problems that make the configuration unusable
    pub errors: Vec<ConfigError>,
    /// Suspicious but usable values
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// First error, if any
    pub fn into_result(self) -> Result<Vec<String>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(self.warnings),
        }
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}
