//! Typed console configuration: every delay, threshold and cutoff the
//! simulation reads.
//!
//! All sections default to the tuned values, so an empty JSON object is a
//! complete configuration. The canonical file ships as
//! `data/console_config.json`.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse JSON content.
    #[error("failed to parse config JSON: {source}")]
    Parse {
        #[from]
        source: serde_json::Error,
    },

    /// The configuration parsed but violates a structural rule.
    #[error("invalid configuration: {reason}")]
    Invalid { reason: String },
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub reactor: ReactorConfig,
    pub life_support: LifeSupportConfig,
    pub vitals: VitalsConfig,
    pub session: SessionConfig,
}

/// Reactor switch catalog, phase table and timer constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactorConfig {
    /// Power increment of every switch on the panel. Also the switch ids.
    pub switch_values: Vec<u32>,
    /// Stable temperature for each phase; phase `len()` is "complete".
    pub phase_thresholds: Vec<u32>,
    /// First interval of an accelerating temperature ramp (ms).
    pub temp_step_base_ms: u64,
    /// Shortest interval a ramp may accelerate to (ms).
    pub temp_step_floor_ms: u64,
    /// Factor applied to the ramp interval after every step.
    pub temp_step_decay: f64,
    /// Hold time at an exact threshold before the phase advances (ms).
    pub stability_delay_ms: u64,
    /// Sustained over-power time before the reactor resets (ms).
    pub overload_delay_ms: u64,
    /// Sustained danger time before the core is lost (ms).
    pub explosion_delay_ms: u64,
    /// The only phase at which sustained over-power resets the reactor.
    pub overload_phase: u8,
}

impl Default for ReactorConfig {
    fn default() -> Self {
        Self {
            switch_values: vec![1, 2, 4, 8, 16, 32, 64, 128, 256],
            phase_thresholds: vec![31, 124, 452],
            temp_step_base_ms: 100,
            temp_step_floor_ms: 10,
            temp_step_decay: 0.9,
            stability_delay_ms: 5_000,
            overload_delay_ms: 10_000,
            explosion_delay_ms: 10_000,
            overload_phase: 1,
        }
    }
}

impl ReactorConfig {
    /// Temperature reached when every switch is on (override target).
    pub fn max_temp(&self) -> u32 {
        self.switch_values.iter().sum()
    }

    /// Final phase; it has no threshold.
    pub fn max_phase(&self) -> u8 {
        self.phase_thresholds.len() as u8
    }

    /// Threshold for `phase`, or `None` once the reactor is complete.
    pub fn threshold(&self, phase: u8) -> Option<u32> {
        self.phase_thresholds.get(phase as usize).copied()
    }

    pub fn is_switch(&self, id: u32) -> bool {
        self.switch_values.contains(&id)
    }
}

/// Life support tuning: band cutoffs, knob optimum, oxygen stepping, gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifeSupportConfig {
    /// Temperature that normalizes to 1.0 when classifying the thermal band.
    pub band_max_temp: u32,
    /// Fractional cutoffs: underpowered below [0], nominal up to [1],
    /// high up to [2], overpower above.
    pub band_cutoffs: [f32; 3],
    pub optimal_intake: f32,
    pub optimal_purge: f32,
    pub initial_intake: f32,
    pub initial_purge: f32,
    /// Interval of the oxygen stepper (ms).
    pub oxygen_step_ms: u64,
    /// Oxygen level forced on first activation of the stepper.
    pub phase_entry_oxygen: f32,
    /// Phase the environmental gate advances out of.
    pub gate_phase: u8,
    /// Temperature and power the gate requires.
    pub gate_checkpoint_temp: u32,
    /// Continuous time the gate must hold (ms).
    pub gate_delay_ms: u64,
    /// When set, the reactor stability timer does not advance `gate_phase`;
    /// only the environmental gate does.
    pub strict_env_gate: bool,
    /// Oxygen level below which crew are lost.
    pub crew_attrition_oxygen: f32,
    /// Crew lost per oxygen step below that level.
    pub crew_attrition_rate: f32,
}

impl Default for LifeSupportConfig {
    fn default() -> Self {
        Self {
            band_max_temp: 511,
            band_cutoffs: [0.4, 0.7, 0.85],
            optimal_intake: 67.0,
            optimal_purge: 62.0,
            initial_intake: 10.0,
            initial_purge: 90.0,
            oxygen_step_ms: 1_000,
            phase_entry_oxygen: 68.0,
            gate_phase: 1,
            gate_checkpoint_temp: 124,
            gate_delay_ms: 5_000,
            strict_env_gate: false,
            crew_attrition_oxygen: 15.0,
            crew_attrition_rate: 0.005,
        }
    }
}

/// Hull and shield stepping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VitalsConfig {
    pub hull_step_ms: u64,
    pub shield_step_ms: u64,
    /// Hull lost per step while the reactor is in danger.
    pub hull_danger_rate: f32,
    /// Hull lost per step while the reactor is over-powered.
    pub hull_overpowered_rate: f32,
    /// Half-width of the uniform shield fluctuation before temperature scaling.
    pub shield_jitter: f32,
}

impl Default for VitalsConfig {
    fn default() -> Self {
        Self {
            hull_step_ms: 1_000,
            shield_step_ms: 2_000,
            hull_danger_rate: 0.8,
            hull_overpowered_rate: 0.3,
            shield_jitter: 1.0,
        }
    }
}

/// Per-session settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// RNG seed; `None` draws one from the OS.
    pub seed: Option<u64>,
    /// Number of event log entries retained.
    pub log_capacity: usize,
    pub initial_crew: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: None,
            log_capacity: 80,
            initial_crew: 3.0,
        }
    }
}

impl SimConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Same configuration with a fixed RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.session.seed = Some(seed);
        self
    }

    /// Check structural rules the simulation relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let r = &self.reactor;
        if r.switch_values.is_empty() {
            return invalid("reactor.switch_values must not be empty");
        }
        let mut seen = r.switch_values.clone();
        seen.sort_unstable();
        seen.dedup();
        if seen.len() != r.switch_values.len() {
            return invalid("reactor.switch_values must be distinct");
        }
        if r.switch_values.contains(&0) {
            return invalid("reactor.switch_values must be positive");
        }
        if r.phase_thresholds.is_empty()
            || r.phase_thresholds.windows(2).any(|w| w[0] >= w[1])
        {
            return invalid("reactor.phase_thresholds must be non-empty and strictly increasing");
        }
        if r.temp_step_floor_ms == 0 || r.temp_step_base_ms < r.temp_step_floor_ms {
            return invalid("reactor.temp_step_floor_ms must be >= 1 and <= temp_step_base_ms");
        }
        if !(r.temp_step_decay > 0.0 && r.temp_step_decay <= 1.0) {
            return invalid("reactor.temp_step_decay must be in (0, 1]");
        }
        if r.stability_delay_ms == 0 || r.overload_delay_ms == 0 || r.explosion_delay_ms == 0 {
            return invalid("reactor delays must be non-zero");
        }

        let ls = &self.life_support;
        let [a, b, c] = ls.band_cutoffs;
        if !(0.0 < a && a < b && b < c && c <= 1.0) {
            return invalid("life_support.band_cutoffs must increase within (0, 1]");
        }
        if ls.band_max_temp == 0 {
            return invalid("life_support.band_max_temp must be non-zero");
        }
        if ls.optimal_intake <= 0.0 || ls.optimal_purge <= 0.0 {
            return invalid("life_support optimal knob values must be positive");
        }
        if ls.oxygen_step_ms == 0 || ls.gate_delay_ms == 0 {
            return invalid("life_support intervals must be non-zero");
        }

        let v = &self.vitals;
        if v.hull_step_ms == 0 || v.shield_step_ms == 0 {
            return invalid("vitals intervals must be non-zero");
        }
        if !(v.shield_jitter.is_finite() && v.shield_jitter >= 0.0) {
            return invalid("vitals.shield_jitter must be finite and non-negative");
        }

        if self.session.log_capacity == 0 {
            return invalid("session.log_capacity must be non-zero");
        }
        Ok(())
    }
}

fn invalid(reason: &str) -> Result<(), ConfigError> {
    Err(ConfigError::Invalid {
        reason: reason.to_owned(),
    })
}
