//! Life support system: compartment seals, fracture patch, scrubber knobs,
//! the oxygen stepper and the environmental phase gate.

use deadhand_logic::life_support::{
    apply_oxygen_step, clamp_knob, crew_after_step, oxygen_degradation, Compartment,
    LifeSupportInputs, LifeSupportReadings, OxygenDegradation, ScrubberKnob,
};

use super::observe;
use crate::engine::ConsoleEngine;
use crate::intent::Rejection;
use crate::scheduler::TimerKind;
use crate::terminal::Severity;

impl ConsoleEngine {
    pub(crate) fn toggle_isolate(&mut self, compartment: Compartment) -> Result<(), Rejection> {
        let sealed = self.ship.life_support.seals.toggle(compartment);
        if sealed {
            self.emit(Severity::Ok, format!("Compartment {} SEALED", compartment.label()));
        } else {
            self.emit(Severity::Warn, format!("Compartment {} doors OPENED", compartment.label()));
        }
        Ok(())
    }

    pub(crate) fn patch_fracture(&mut self) -> Result<(), Rejection> {
        let ls = &self.ship.life_support;
        if ls.fracture_patched {
            return Err(Rejection::AlreadyPatched);
        }
        if !ls.seals.is_sealed(ls.fracture_site) {
            return Err(Rejection::BreachNotIsolated);
        }
        let site = ls.fracture_site;
        self.ship.life_support.fracture_patched = true;
        self.emit(Severity::Ok, format!("Microfracture in {} PATCHED", site.label()));
        Ok(())
    }

    pub(crate) fn set_knob(&mut self, knob: ScrubberKnob, value: f32) -> Result<(), Rejection> {
        let value = clamp_knob(value);
        let ls = &mut self.ship.life_support;
        match knob {
            ScrubberKnob::IntakeRatio => ls.intake_ratio = value,
            ScrubberKnob::PurgeInterval => ls.purge_interval = value,
        }
        log::debug!("knob {knob:?} set to {value}");
        Ok(())
    }

    /// Whole life support pipeline at the current instant.
    pub fn life_support_readings(&self) -> LifeSupportReadings {
        let ls = &self.ship.life_support;
        let inputs = LifeSupportInputs {
            reactor_temp: self.ship.reactor.temp,
            intake_ratio: ls.intake_ratio,
            purge_interval: ls.purge_interval,
            fracture_site: ls.fracture_site,
            fracture_patched: ls.fracture_patched,
            seals: ls.seals,
        };
        LifeSupportReadings::compute(&inputs, &self.config.life_support)
    }

    pub fn oxygen_degradation(&self) -> OxygenDegradation {
        oxygen_degradation(self.ship.vitals.oxygen_level)
    }

    fn oxygen_stepper_active(&self) -> bool {
        self.ship.reactor.phase >= 1
    }

    fn env_gate_armed(&self) -> bool {
        let reactor = &self.ship.reactor;
        let ls = &self.config.life_support;
        reactor.phase == ls.gate_phase
            && reactor.phase < self.config.reactor.max_phase()
            && reactor.temp == ls.gate_checkpoint_temp
            && reactor.power == ls.gate_checkpoint_temp
            && self.life_support_readings().env_gate_met
    }

    pub(crate) fn watch_oxygen(&mut self) -> bool {
        let active = self.oxygen_stepper_active();
        if !observe(&mut self.watch.oxygen, active) {
            return false;
        }

        self.timers.cancel(TimerKind::OxygenStep);
        if !active || self.is_frozen() {
            return true;
        }
        if !self.ship.life_support.oxygen_stepper_primed {
            self.ship.life_support.oxygen_stepper_primed = true;
            self.ship.vitals.oxygen_level = self.config.life_support.phase_entry_oxygen;
            self.emit(Severity::Warn, "O2 reserves below safe level: scrubbers required");
        }
        let due = self.clock_ms + self.config.life_support.oxygen_step_ms;
        self.timers.schedule(TimerKind::OxygenStep, due);
        true
    }

    pub(crate) fn watch_env_gate(&mut self) -> bool {
        let met = self.life_support_readings().env_gate_met;
        let reactor = &self.ship.reactor;
        let key = (reactor.phase, reactor.temp, reactor.power, met);
        if !observe(&mut self.watch.env_gate, key) {
            return false;
        }

        self.timers.cancel(TimerKind::EnvGateAdvance);
        if self.env_gate_armed() && !self.is_frozen() {
            let due = self.clock_ms + self.config.life_support.gate_delay_ms;
            self.timers.schedule(TimerKind::EnvGateAdvance, due);
        }
        true
    }

    pub(crate) fn on_oxygen_step(&mut self) {
        if !self.oxygen_stepper_active() {
            return;
        }
        let loss = self.life_support_readings().oxygen_loss_rate;
        let cfg = &self.config.life_support;

        let oxygen = apply_oxygen_step(self.ship.vitals.oxygen_level, loss);
        self.ship.vitals.oxygen_level = oxygen;
        self.ship.life_support.crew_count = crew_after_step(
            self.ship.life_support.crew_count,
            oxygen,
            cfg.crew_attrition_oxygen,
            cfg.crew_attrition_rate,
        );

        let due = self.clock_ms + cfg.oxygen_step_ms;
        self.timers.schedule(TimerKind::OxygenStep, due);
    }

    pub(crate) fn on_env_gate_advance(&mut self) {
        if !self.env_gate_armed() {
            return;
        }
        let reactor = &mut self.ship.reactor;
        reactor.phase += 1;
        reactor.last_phase_change_ms = self.clock_ms;
        let phase = reactor.phase;
        self.emit(
            Severity::Ok,
            format!("Environmental baseline holding: reactor advanced to phase {phase}"),
        );
    }
}
