//! Reactor status classification and temperature ramp arithmetic.
//!
//! The reactor's power is the sum of the switches the operator has thrown.
//! Temperature chases power one unit at a time on an accelerating schedule,
//! and the status readout compares temperature against the current phase's
//! threshold:
//!
//! | Status | Condition |
//! |--------|-----------|
//! | `under-powered` | below 80% of threshold |
//! | `weak` | 80% up to threshold |
//! | `stable` | exactly at threshold |
//! | `over-powered` | above threshold, below 120% |
//! | `danger` | 120% of threshold or more |
//!
//! Right after a phase change the readout is blank until the operator
//! touches a switch, so a stale temperature never reads as danger.

use serde::{Deserialize, Serialize};

/// Reactor status readout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReactorStatus {
    /// Nothing to report: idle at phase 0, or inside the phase-change grace.
    Blank,
    UnderPowered,
    Weak,
    Stable,
    OverPowered,
    Danger,
    /// Every phase has been cleared.
    Complete,
}

impl ReactorStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Blank => "",
            Self::UnderPowered => "under powered",
            Self::Weak => "weak",
            Self::Stable => "stable",
            Self::OverPowered => "over powered",
            Self::Danger => "danger",
            Self::Complete => "complete",
        }
    }
}

/// Colour band of the temperature gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TempIndicator {
    Blue,
    Green,
    Orange,
    Red,
}

/// Integer cutoffs derived from a phase threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusBands {
    /// floor(threshold × 0.8)
    pub weak: u32,
    pub threshold: u32,
    /// ceil(threshold × 1.2)
    pub danger: u32,
}

impl StatusBands {
    pub fn for_threshold(threshold: u32) -> Self {
        Self {
            weak: threshold * 4 / 5,
            threshold,
            danger: (threshold * 6).div_ceil(5),
        }
    }
}

/// Classify the reactor readout.
///
/// `threshold` is `None` once the final phase is reached.
/// `phase_change_active` is true while the last phase change is newer than
/// the last switch press.
pub fn classify_status(
    temp: u32,
    phase: u8,
    threshold: Option<u32>,
    phase_change_active: bool,
) -> ReactorStatus {
    let Some(threshold) = threshold else {
        return ReactorStatus::Complete;
    };
    if phase_change_active {
        return ReactorStatus::Blank;
    }

    let bands = StatusBands::for_threshold(threshold);
    if temp >= bands.danger {
        ReactorStatus::Danger
    } else if temp > threshold {
        ReactorStatus::OverPowered
    } else if temp == threshold {
        ReactorStatus::Stable
    } else if temp >= bands.weak {
        ReactorStatus::Weak
    } else if phase == 0 && temp == 0 {
        ReactorStatus::Blank
    } else {
        ReactorStatus::UnderPowered
    }
}

/// Gauge colour for `temp` against the current phase threshold.
pub fn temp_indicator(temp: u32, threshold: Option<u32>) -> TempIndicator {
    let Some(threshold) = threshold else {
        return TempIndicator::Green;
    };
    let bands = StatusBands::for_threshold(threshold);
    if temp >= bands.danger {
        TempIndicator::Red
    } else if temp > threshold {
        TempIndicator::Orange
    } else if temp >= bands.weak {
        TempIndicator::Green
    } else {
        TempIndicator::Blue
    }
}

/// Sum of the switches currently thrown.
pub fn power_of<'a>(switches: impl IntoIterator<Item = &'a u32>) -> u32 {
    switches.into_iter().sum()
}

/// Whether the reactor is sitting exactly on its threshold.
pub fn is_stable_at(temp: u32, power: u32, threshold: Option<u32>) -> bool {
    threshold.is_some_and(|t| temp == power && power == t)
}

/// One unit toward `target`, never past it.
pub fn step_toward(temp: u32, target: u32) -> u32 {
    match temp.cmp(&target) {
        std::cmp::Ordering::Less => temp + 1,
        std::cmp::Ordering::Greater => temp - 1,
        std::cmp::Ordering::Equal => temp,
    }
}

/// Next ramp interval: geometric decay bounded below by `floor_ms`.
pub fn next_step_interval(interval_ms: f64, decay: f64, floor_ms: u64) -> f64 {
    (interval_ms * decay).max(floor_ms as f64)
}

/// Delay actually scheduled for a ramp interval; never zero.
pub fn interval_delay_ms(interval_ms: f64) -> u64 {
    (interval_ms.round() as u64).max(1)
}
