//! Read model handed to presentation layers.

use deadhand_logic::authority::Ending;
use deadhand_logic::life_support::{LifeSupportReadings, OxygenDegradation};
use deadhand_logic::navigation::{DriftStatus, RouteStatus, SensorStatus};
use deadhand_logic::reactor::{ReactorStatus, TempIndicator};
use deadhand_logic::vitals::{ShipHealthStatus, VitalClass};
use serde::Serialize;

use crate::engine::ConsoleEngine;
use crate::state::ShipState;
use crate::terminal::LogEntry;

/// Derived reactor readouts.
#[derive(Debug, Clone, Serialize)]
pub struct ReactorReadings {
    pub status: ReactorStatus,
    pub status_label: &'static str,
    pub temp_indicator: TempIndicator,
    pub threshold: Option<u32>,
    pub max_temp: u32,
    pub ramp_target: Option<u32>,
}

/// Derived vitals readouts.
#[derive(Debug, Clone, Serialize)]
pub struct VitalsReadings {
    pub active: bool,
    pub shields_visible: bool,
    pub health: ShipHealthStatus,
    pub oxygen: VitalClass,
    pub hull: VitalClass,
    pub shields: VitalClass,
    pub oxygen_degradation: OxygenDegradation,
}

/// Derived navigation readouts.
#[derive(Debug, Clone, Serialize)]
pub struct NavigationReadings {
    pub waypoint: Option<&'static str>,
    pub sensors: SensorStatus,
    pub drift: DriftStatus,
    pub route: RouteStatus,
}

/// Every cell and derived value at one instant, plus the event log.
#[derive(Debug, Clone, Serialize)]
pub struct ConsoleSnapshot {
    pub clock_ms: u64,
    pub frozen: bool,
    pub ship: ShipState,
    pub reactor: ReactorReadings,
    pub life_support: LifeSupportReadings,
    pub vitals: VitalsReadings,
    pub navigation: NavigationReadings,
    pub ending: Option<Ending>,
    pub log: Vec<LogEntry>,
}

impl ConsoleSnapshot {
    pub fn capture(engine: &ConsoleEngine) -> Self {
        let status = engine.reactor_status();
        Self {
            clock_ms: engine.clock_ms(),
            frozen: engine.is_frozen(),
            ship: engine.ship().clone(),
            reactor: ReactorReadings {
                status,
                status_label: status.label(),
                temp_indicator: engine.temp_indicator(),
                threshold: engine.reactor_threshold(),
                max_temp: engine.config().reactor.max_temp(),
                ramp_target: engine.ramp_target(),
            },
            life_support: engine.life_support_readings(),
            vitals: VitalsReadings {
                active: engine.vitals_active(),
                shields_visible: engine.shields_visible(),
                health: engine.ship_health_status(),
                oxygen: engine.oxygen_class(),
                hull: engine.hull_class(),
                shields: engine.shield_class(),
                oxygen_degradation: engine.oxygen_degradation(),
            },
            navigation: NavigationReadings {
                waypoint: deadhand_logic::navigation::waypoint_name(
                    engine.ship().navigation.selected_waypoint,
                ),
                sensors: engine.sensor_status(),
                drift: engine.drift_status(),
                route: engine.route_status(),
            },
            ending: engine.ending(),
            log: engine.log().entries().cloned().collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::ConsoleEngine;

    #[test]
    fn test_snapshot_serializes() {
        let engine = ConsoleEngine::with_seed(4).unwrap();
        let json = engine.snapshot().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["clock_ms"], 0);
        assert_eq!(value["ship"]["vitals"]["oxygen_level"], 100.0);
        assert_eq!(value["reactor"]["max_temp"], 511);
        assert_eq!(value["life_support"]["band"], "underpowered");
        assert!(value["ending"].is_null());
    }
}
