//! Reactor system: switches, override, temperature ramp, phase progression,
//! overload reset and explosion.

use deadhand_logic::reactor::{
    classify_status, interval_delay_ms, is_stable_at, next_step_interval, power_of,
    step_toward, temp_indicator, ReactorStatus, TempIndicator,
};

use super::observe;
use crate::engine::ConsoleEngine;
use crate::intent::Rejection;
use crate::scheduler::TimerKind;
use crate::terminal::Severity;

/// Phase at which the environmental bus latches.
const BUS_C_PHASE: u8 = 1;
/// Phase at which the navigation bus latches.
const BUS_B_PHASE: u8 = 2;

impl ConsoleEngine {
    // ---- intents ----

    pub(crate) fn toggle_switch(&mut self, id: u32) -> Result<(), Rejection> {
        if !self.config.reactor.is_switch(id) {
            return Err(Rejection::UnknownSwitch(id));
        }
        if self.ship.reactor.exploded {
            log::debug!("switch {id} ignored: core lost");
            return Ok(());
        }

        let reactor = &mut self.ship.reactor;
        if !reactor.switches.remove(&id) {
            reactor.switches.insert(id);
        }
        reactor.power = power_of(&reactor.switches);
        reactor.last_switch_press_ms = self.clock_ms;
        log::debug!("switch {id} toggled, power now {}", reactor.power);
        Ok(())
    }

    pub(crate) fn press_override(&mut self) -> Result<(), Rejection> {
        let reactor = &mut self.ship.reactor;
        if reactor.exploded || reactor.override_active {
            return Ok(());
        }
        reactor.override_active = true;
        self.emit(Severity::Warn, "OVERRIDE ENGAGED: core temperature climbing");
        Ok(())
    }

    pub(crate) fn release_override(&mut self) -> Result<(), Rejection> {
        let reactor = &mut self.ship.reactor;
        if reactor.exploded || !reactor.override_active {
            return Ok(());
        }
        reactor.override_active = false;
        self.emit(Severity::Info, "Override released");
        Ok(())
    }

    // ---- derived reads ----

    /// Threshold of the current phase; `None` once every phase is cleared.
    pub fn reactor_threshold(&self) -> Option<u32> {
        self.config.reactor.threshold(self.ship.reactor.phase)
    }

    pub fn reactor_status(&self) -> ReactorStatus {
        let reactor = &self.ship.reactor;
        classify_status(
            reactor.temp,
            reactor.phase,
            self.reactor_threshold(),
            reactor.phase_change_active(),
        )
    }

    pub fn temp_indicator(&self) -> TempIndicator {
        temp_indicator(self.ship.reactor.temp, self.reactor_threshold())
    }

    /// Temperature the ramp is heading for, or `None` when it should hold.
    pub fn ramp_target(&self) -> Option<u32> {
        let reactor = &self.ship.reactor;
        if self.is_frozen() {
            return None;
        }
        if reactor.override_active {
            return Some(self.config.reactor.max_temp());
        }
        if reactor.temp > reactor.power {
            Some(reactor.power)
        } else if reactor.temp < reactor.power && !reactor.phase_change_active() {
            Some(reactor.power)
        } else {
            None
        }
    }

    fn stability_armed(&self) -> bool {
        let reactor = &self.ship.reactor;
        let ls = &self.config.life_support;
        let gated = ls.strict_env_gate && reactor.phase == ls.gate_phase;
        reactor.phase < self.config.reactor.max_phase()
            && !gated
            && is_stable_at(reactor.temp, reactor.power, self.reactor_threshold())
    }

    fn overload_armed(&self) -> bool {
        self.ship.reactor.phase == self.config.reactor.overload_phase
            && self.reactor_status() == ReactorStatus::OverPowered
    }

    // ---- watchers ----

    /// Restart the ramp whenever its target inputs change.
    pub(crate) fn watch_temperature(&mut self) -> bool {
        let reactor = &self.ship.reactor;
        let key = (
            reactor.power,
            reactor.override_active,
            reactor.phase_change_active(),
            reactor.exploded,
        );
        if !observe(&mut self.watch.temperature, key) {
            return false;
        }

        self.timers.cancel(TimerKind::TempStep);
        if self.ramp_target().is_some_and(|t| t != self.ship.reactor.temp) {
            let base = self.config.reactor.temp_step_base_ms;
            self.ship.reactor.ramp_interval_ms = base as f64;
            self.timers.schedule(TimerKind::TempStep, self.clock_ms + base);
        }
        true
    }

    /// Arm the stability advance or the overload reset.
    pub(crate) fn watch_progression(&mut self) -> bool {
        let status = self.reactor_status();
        let reactor = &self.ship.reactor;
        let key = (reactor.temp, reactor.power, reactor.phase, status);
        if !observe(&mut self.watch.progression, key) {
            return false;
        }

        self.timers.cancel(TimerKind::StabilityAdvance);
        self.timers.cancel(TimerKind::OverloadReset);
        if self.is_frozen() {
            return true;
        }
        if self.stability_armed() {
            let due = self.clock_ms + self.config.reactor.stability_delay_ms;
            self.timers.schedule(TimerKind::StabilityAdvance, due);
        } else if self.overload_armed() {
            let due = self.clock_ms + self.config.reactor.overload_delay_ms;
            self.timers.schedule(TimerKind::OverloadReset, due);
        }
        true
    }

    pub(crate) fn watch_explosion(&mut self) -> bool {
        let status = self.reactor_status();
        if !observe(&mut self.watch.explosion, status) {
            return false;
        }

        if status == ReactorStatus::Danger && !self.is_frozen() {
            let delay = self.config.reactor.explosion_delay_ms;
            self.timers.schedule(TimerKind::Explosion, self.clock_ms + delay);
            self.emit(
                Severity::Error,
                format!("REACTOR DANGER: core breach in {}s", delay / 1000),
            );
        } else if self.timers.cancel(TimerKind::Explosion) {
            self.emit(Severity::Ok, "Reactor danger cleared");
        }
        true
    }

    /// Bus latches never clear, not even after an overload reset.
    pub(crate) fn latch_buses(&mut self) -> bool {
        let phase = self.ship.reactor.phase;
        let mut changed = false;
        if phase >= BUS_C_PHASE && !self.ship.buses.bus_c_stable {
            self.ship.buses.bus_c_stable = true;
            self.emit(Severity::Ok, "BUS C stable: environmental systems powered");
            changed = true;
        }
        if phase >= BUS_B_PHASE && !self.ship.buses.bus_b_online {
            self.ship.buses.bus_b_online = true;
            self.emit(Severity::Ok, "BUS B online: navigation bus available");
            changed = true;
        }
        changed
    }

    // ---- timers ----

    pub(crate) fn on_temp_step(&mut self) {
        let Some(target) = self.ramp_target() else {
            return;
        };
        let decay = self.config.reactor.temp_step_decay;
        let floor = self.config.reactor.temp_step_floor_ms;

        let reactor = &mut self.ship.reactor;
        reactor.temp = step_toward(reactor.temp, target);
        if reactor.temp != target {
            reactor.ramp_interval_ms = next_step_interval(reactor.ramp_interval_ms, decay, floor);
            let due = self.clock_ms + interval_delay_ms(reactor.ramp_interval_ms);
            self.timers.schedule(TimerKind::TempStep, due);
        }
    }

    pub(crate) fn on_stability_advance(&mut self) {
        if !self.stability_armed() {
            return;
        }
        let reactor = &mut self.ship.reactor;
        reactor.phase += 1;
        reactor.last_phase_change_ms = self.clock_ms;
        let phase = reactor.phase;
        self.emit(Severity::Ok, format!("Reactor stable: advanced to phase {phase}"));
    }

    pub(crate) fn on_overload_reset(&mut self) {
        if !self.overload_armed() {
            return;
        }
        let reactor = &mut self.ship.reactor;
        reactor.switches.clear();
        reactor.power = 0;
        reactor.phase = 0;
        reactor.last_phase_change_ms = self.clock_ms;
        self.emit(
            Severity::Warn,
            "Sustained overload: reactor reset to phase 0, switches cleared",
        );
    }

    pub(crate) fn on_explosion(&mut self) {
        if self.reactor_status() != ReactorStatus::Danger {
            return;
        }
        self.ship.reactor.exploded = true;
        self.emit(Severity::Error, "REACTOR CORE BREACH: reactor lost");
    }
}
