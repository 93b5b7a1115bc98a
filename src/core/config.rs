//! Simulation configuration with documented constants
//!
//! All magic numbers are collected here with explanations of their purpose
//! and how they interact with each other.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::core::error::{Result, SimError};

/// Configuration for the simulation
///
/// Defaults reproduce the classic pacing: four pets, one tick per second,
/// one decay every ten ticks.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // === ROSTER ===
    /// Maximum number of live pets
    pub capacity: usize,

    /// Value every vital starts at when a pet is created
    ///
    /// At 50 with the default decay amount, an untouched pet survives
    /// exactly five decays.
    pub starting_vitals: u8,

    // === DECAY ===
    /// Scheduler granularity in milliseconds
    ///
    /// The countdown shown to the player moves once per interval.
    pub tick_interval_ms: u64,

    /// Ticks between two decays of the same pet
    pub decay_period_ticks: u32,

    /// Amount subtracted from every vital on decay
    pub decay_amount: u8,

    // === NAMING ===
    /// Name used when the naming collaborator fails
    pub fallback_name: String,

    pub naming: NamingConfig,

    /// Seed for species selection (None = entropy)
    pub seed: Option<u64>,
}

/// Endpoints for the random name service
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Current API, `results[0].name`
    pub primary_url: String,

    /// Older API revision, `results[0].user.name`
    pub legacy_url: String,

    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            primary_url: "https://randomuser.me/api".into(),
            legacy_url: "https://randomuser.me/api/0.8".into(),
            timeout_ms: 5000,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            capacity: 4,
            starting_vitals: 50,

            tick_interval_ms: 1000,
            decay_period_ticks: 10,
            decay_amount: 10,

            fallback_name: "Random".into(),
            naming: NamingConfig::default(),
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and validate a config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse and validate a config from a TOML string
    ///
    /// Missing keys fall back to their defaults.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn naming_timeout(&self) -> Duration {
        Duration::from_millis(self.naming.timeout_ms)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(SimError::Config("capacity must be at least 1".into()));
        }

        if self.tick_interval_ms == 0 {
            return Err(SimError::Config("tick_interval_ms must be positive".into()));
        }

        if self.decay_period_ticks == 0 {
            return Err(SimError::Config(
                "decay_period_ticks must be at least 1".into(),
            ));
        }

        // A pet starting at zero would be evicted before anyone saw it
        if !(1..=100).contains(&self.starting_vitals) {
            return Err(SimError::Config(format!(
                "starting_vitals ({}) must be within 1..=100",
                self.starting_vitals
            )));
        }

        if !(1..=100).contains(&self.decay_amount) {
            return Err(SimError::Config(format!(
                "decay_amount ({}) must be within 1..=100",
                self.decay_amount
            )));
        }

        if self.fallback_name.trim().is_empty() {
            return Err(SimError::Config("fallback_name must not be empty".into()));
        }

        Ok(())
    }
}
