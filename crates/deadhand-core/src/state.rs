//! Primitive state cells, grouped by the system that mutates them.
//!
//! Derived values are never stored here; the engine recomputes them from
//! these cells on every read.

use std::collections::BTreeSet;

use deadhand_logic::authority::{DirectiveFlags, PrincipalStatus};
use deadhand_logic::config::SimConfig;
use deadhand_logic::life_support::{Compartment, CompartmentSeals};
use deadhand_logic::navigation::Orientation;
use serde::{Deserialize, Serialize};

/// Reactor cells.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReactorCells {
    pub switches: BTreeSet<u32>,
    pub power: u32,
    pub temp: u32,
    pub phase: u8,
    pub override_active: bool,
    pub exploded: bool,
    pub last_switch_press_ms: u64,
    pub last_phase_change_ms: u64,
    /// Current interval of the running temperature ramp.
    pub(crate) ramp_interval_ms: f64,
}

impl ReactorCells {
    /// Status readout is blanked until the operator touches a switch after
    /// a phase change.
    pub fn phase_change_active(&self) -> bool {
        self.last_phase_change_ms > self.last_switch_press_ms
    }
}

/// Power bus latches.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PowerBuses {
    /// Environmental bus, latched at phase 1.
    pub bus_c_stable: bool,
    /// Navigation bus, latched at phase 2.
    pub bus_b_online: bool,
}

/// Life support cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifeSupportCells {
    pub fracture_site: Compartment,
    pub fracture_patched: bool,
    pub seals: CompartmentSeals,
    pub intake_ratio: f32,
    pub purge_interval: f32,
    pub crew_count: f32,
    /// Set the first time the oxygen stepper starts.
    pub oxygen_stepper_primed: bool,
}

/// Ship vitals cells.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VitalsCells {
    pub oxygen_level: f32,
    pub hull_integrity: f32,
    pub shield_status: f32,
}

impl Default for VitalsCells {
    fn default() -> Self {
        Self {
            oxygen_level: 100.0,
            hull_integrity: 100.0,
            shield_status: 100.0,
        }
    }
}

/// Navigation cells.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct NavigationCells {
    pub nav_core_repaired: bool,
    pub selected_waypoint: usize,
    pub course_locked: bool,
    pub comms_partial_online: bool,
    pub orientation: Orientation,
}

/// Authority cells.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AuthorityCells {
    pub principal_status: PrincipalStatus,
    pub redundancy_degraded: bool,
    pub survival_mode_engaged: bool,
    pub compartment_unlocked: bool,
    pub files_read: bool,
    pub secondary_biometric_enabled: bool,
    pub identity_flip_done: bool,
    pub directive: DirectiveFlags,
}

/// Every primitive cell of one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipState {
    pub reactor: ReactorCells,
    pub buses: PowerBuses,
    pub life_support: LifeSupportCells,
    pub vitals: VitalsCells,
    pub navigation: NavigationCells,
    pub authority: AuthorityCells,
}

impl ShipState {
    /// Session-start values; `fracture_site` is drawn by the caller.
    pub fn new(config: &SimConfig, fracture_site: Compartment) -> Self {
        Self {
            reactor: ReactorCells::default(),
            buses: PowerBuses::default(),
            life_support: LifeSupportCells {
                fracture_site,
                fracture_patched: false,
                seals: CompartmentSeals::default(),
                intake_ratio: config.life_support.initial_intake,
                purge_interval: config.life_support.initial_purge,
                crew_count: config.session.initial_crew,
                oxygen_stepper_primed: false,
            },
            vitals: VitalsCells::default(),
            navigation: NavigationCells::default(),
            authority: AuthorityCells::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_values() {
        let ship = ShipState::new(&SimConfig::default(), Compartment::Cockpit);
        assert_eq!(ship.reactor.phase, 0);
        assert_eq!(ship.reactor.power, 0);
        assert_eq!(ship.reactor.temp, 0);
        assert!(!ship.reactor.exploded);
        assert_eq!(ship.vitals.oxygen_level, 100.0);
        assert_eq!(ship.vitals.hull_integrity, 100.0);
        assert_eq!(ship.vitals.shield_status, 100.0);
        assert_eq!(ship.life_support.crew_count, 3.0);
        assert_eq!(ship.life_support.intake_ratio, 10.0);
        assert_eq!(ship.authority.principal_status, PrincipalStatus::Unresolved);
        assert!(!ship.buses.bus_b_online);
    }

    #[test]
    fn test_phase_change_grace() {
        let mut reactor = ReactorCells::default();
        assert!(!reactor.phase_change_active());
        reactor.last_phase_change_ms = 6_000;
        assert!(reactor.phase_change_active());
        reactor.last_switch_press_ms = 6_500;
        assert!(!reactor.phase_change_active());
    }
}
