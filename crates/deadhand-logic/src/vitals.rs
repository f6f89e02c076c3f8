//! Ship vitals: hull stress, shield fluctuation and the aggregate health label.

use serde::{Deserialize, Serialize};

use crate::reactor::ReactorStatus;

/// Aggregate ship health readout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShipHealthStatus {
    Nominal,
    ShieldsLow,
    Warning,
    Critical,
}

/// Per-vital severity class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VitalClass {
    Nominal,
    Caution,
    Warning,
    Critical,
}

/// Caution threshold for oxygen and hull.
pub const CAUTION_DEFAULT: f32 = 70.0;
/// Caution threshold for shields.
pub const CAUTION_SHIELDS: f32 = 30.0;

/// Hull lost per step for the given reactor readout.
pub fn hull_decay_rate(status: ReactorStatus, danger_rate: f32, overpowered_rate: f32) -> f32 {
    match status {
        ReactorStatus::Danger => danger_rate,
        ReactorStatus::OverPowered => overpowered_rate,
        _ => 0.0,
    }
}

pub fn apply_hull_decay(hull: f32, rate: f32) -> f32 {
    (hull - rate).max(0.0)
}

/// Scale a raw fluctuation by how hot the reactor is running.
pub fn shield_adjustment(fluctuation: f32, temp: u32, max_temp: u32) -> f32 {
    let temp_factor = temp as f32 / max_temp.max(1) as f32;
    fluctuation * (1.0 + temp_factor)
}

pub fn apply_shield_adjustment(shields: f32, adjustment: f32) -> f32 {
    (shields + adjustment).clamp(0.0, 100.0)
}

pub fn ship_health_status(oxygen: f32, hull: f32, shields: f32) -> ShipHealthStatus {
    if oxygen < 20.0 || hull < 20.0 {
        ShipHealthStatus::Critical
    } else if oxygen < 50.0 || hull < 50.0 {
        ShipHealthStatus::Warning
    } else if shields < 30.0 {
        ShipHealthStatus::ShieldsLow
    } else {
        ShipHealthStatus::Nominal
    }
}

pub fn vital_class(value: f32, caution_below: f32) -> VitalClass {
    if value < 20.0 {
        VitalClass::Critical
    } else if value < 50.0 {
        VitalClass::Warning
    } else if value < caution_below {
        VitalClass::Caution
    } else {
        VitalClass::Nominal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hull_rate_by_status() {
        assert_eq!(hull_decay_rate(ReactorStatus::Danger, 0.8, 0.3), 0.8);
        assert_eq!(hull_decay_rate(ReactorStatus::OverPowered, 0.8, 0.3), 0.3);
        assert_eq!(hull_decay_rate(ReactorStatus::Stable, 0.8, 0.3), 0.0);
        assert_eq!(hull_decay_rate(ReactorStatus::Blank, 0.8, 0.3), 0.0);
    }

    #[test]
    fn test_hull_floored() {
        assert_eq!(apply_hull_decay(0.5, 0.8), 0.0);
        assert!((apply_hull_decay(100.0, 0.3) - 99.7).abs() < 1e-4);
    }

    #[test]
    fn test_shield_scaling_doubles_at_max() {
        assert_eq!(shield_adjustment(0.5, 0, 511), 0.5);
        assert_eq!(shield_adjustment(0.5, 511, 511), 1.0);
    }

    #[test]
    fn test_shield_clamped() {
        assert_eq!(apply_shield_adjustment(99.5, 2.0), 100.0);
        assert_eq!(apply_shield_adjustment(0.5, -2.0), 0.0);
    }

    #[test]
    fn test_health_status_priority() {
        assert_eq!(ship_health_status(100.0, 100.0, 100.0), ShipHealthStatus::Nominal);
        assert_eq!(ship_health_status(100.0, 100.0, 10.0), ShipHealthStatus::ShieldsLow);
        assert_eq!(ship_health_status(40.0, 100.0, 10.0), ShipHealthStatus::Warning);
        assert_eq!(ship_health_status(100.0, 10.0, 100.0), ShipHealthStatus::Critical);
    }

    #[test]
    fn test_vital_class() {
        assert_eq!(vital_class(68.0, CAUTION_DEFAULT), VitalClass::Caution);
        assert_eq!(vital_class(68.0, CAUTION_SHIELDS), VitalClass::Nominal);
        assert_eq!(vital_class(45.0, CAUTION_DEFAULT), VitalClass::Warning);
        assert_eq!(vital_class(5.0, CAUTION_DEFAULT), VitalClass::Critical);
    }
}
