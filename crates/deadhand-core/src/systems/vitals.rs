//! Ship vitals system: hull stress stepper and shield random walk.

use deadhand_logic::reactor::ReactorStatus;
use deadhand_logic::vitals::{
    apply_hull_decay, apply_shield_adjustment, hull_decay_rate, shield_adjustment,
    ship_health_status, vital_class, ShipHealthStatus, VitalClass, CAUTION_DEFAULT,
    CAUTION_SHIELDS,
};
use rand::Rng;

use super::observe;
use crate::engine::ConsoleEngine;
use crate::scheduler::TimerKind;

/// Phase from which hull and oxygen are simulated.
const VITALS_PHASE: u8 = 1;
/// Phase from which shields are reported.
const SHIELDS_PHASE: u8 = 2;

impl ConsoleEngine {
    pub fn vitals_active(&self) -> bool {
        self.ship.reactor.phase >= VITALS_PHASE
    }

    pub fn shields_visible(&self) -> bool {
        self.ship.reactor.phase >= SHIELDS_PHASE
    }

    pub fn ship_health_status(&self) -> ShipHealthStatus {
        let v = &self.ship.vitals;
        ship_health_status(v.oxygen_level, v.hull_integrity, v.shield_status)
    }

    pub fn oxygen_class(&self) -> VitalClass {
        vital_class(self.ship.vitals.oxygen_level, CAUTION_DEFAULT)
    }

    pub fn hull_class(&self) -> VitalClass {
        vital_class(self.ship.vitals.hull_integrity, CAUTION_DEFAULT)
    }

    pub fn shield_class(&self) -> VitalClass {
        vital_class(self.ship.vitals.shield_status, CAUTION_SHIELDS)
    }

    fn hull_rate(&self, status: ReactorStatus) -> f32 {
        let cfg = &self.config.vitals;
        hull_decay_rate(status, cfg.hull_danger_rate, cfg.hull_overpowered_rate)
    }

    pub(crate) fn watch_hull(&mut self) -> bool {
        let status = self.reactor_status();
        let key = (self.vitals_active(), status);
        if !observe(&mut self.watch.hull, key) {
            return false;
        }

        if self.vitals_active() && self.hull_rate(status) > 0.0 && !self.is_frozen() {
            // Keep a running stepper's cadence when only the rate changes.
            if !self.timers.is_pending(TimerKind::HullStep) {
                let due = self.clock_ms + self.config.vitals.hull_step_ms;
                self.timers.schedule(TimerKind::HullStep, due);
            }
        } else {
            self.timers.cancel(TimerKind::HullStep);
        }
        true
    }

    pub(crate) fn watch_shields(&mut self) -> bool {
        let visible = self.shields_visible();
        if !observe(&mut self.watch.shields, visible) {
            return false;
        }

        self.timers.cancel(TimerKind::ShieldStep);
        if visible && !self.is_frozen() {
            let due = self.clock_ms + self.config.vitals.shield_step_ms;
            self.timers.schedule(TimerKind::ShieldStep, due);
        }
        true
    }

    pub(crate) fn on_hull_step(&mut self) {
        let rate = self.hull_rate(self.reactor_status());
        if !self.vitals_active() || rate <= 0.0 {
            return;
        }
        let hull = apply_hull_decay(self.ship.vitals.hull_integrity, rate);
        self.ship.vitals.hull_integrity = hull;
        if hull == 0.0 {
            log::warn!("hull integrity exhausted at {} ms", self.clock_ms);
        }

        let due = self.clock_ms + self.config.vitals.hull_step_ms;
        self.timers.schedule(TimerKind::HullStep, due);
    }

    pub(crate) fn on_shield_step(&mut self) {
        if !self.shields_visible() {
            return;
        }
        let jitter = self.config.vitals.shield_jitter;
        let fluctuation = if jitter > 0.0 {
            self.rng.gen_range(-jitter..jitter)
        } else {
            0.0
        };
        let adjustment = shield_adjustment(
            fluctuation,
            self.ship.reactor.temp,
            self.config.reactor.max_temp(),
        );
        self.ship.vitals.shield_status =
            apply_shield_adjustment(self.ship.vitals.shield_status, adjustment);

        let due = self.clock_ms + self.config.vitals.shield_step_ms;
        self.timers.schedule(TimerKind::ShieldStep, due);
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::ConsoleEngine;
    use deadhand_logic::vitals::{ShipHealthStatus, VitalClass};

    #[test]
    fn test_vitals_dormant_at_phase_zero() {
        let mut e = ConsoleEngine::with_seed(5).unwrap();
        e.tick(30_000);
        assert!(!e.vitals_active());
        assert!(!e.shields_visible());
        assert_eq!(e.ship().vitals.hull_integrity, 100.0);
        assert_eq!(e.ship().vitals.shield_status, 100.0);
        assert_eq!(e.ship_health_status(), ShipHealthStatus::Nominal);
        assert_eq!(e.hull_class(), VitalClass::Nominal);
    }
}
