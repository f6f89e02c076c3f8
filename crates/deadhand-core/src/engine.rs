//! Console engine - main entry point for running a session

use deadhand_logic::config::{ConfigError, SimConfig};
use deadhand_logic::life_support::Compartment;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::intent::{Intent, Rejection};
use crate::scheduler::{Scheduler, TimerKind};
use crate::snapshot::ConsoleSnapshot;
use crate::state::ShipState;
use crate::systems::WatchKeys;
use crate::terminal::{EventLog, Severity};

/// Upper bound on watcher passes per settle. Every watcher converges in one
/// or two passes; hitting the bound means a feedback loop.
const MAX_SETTLE_PASSES: usize = 16;

/// One console session: every cell, the pending timers and the event log.
///
/// Time is virtual. Nothing happens unless [`tick`](Self::tick) or
/// [`apply`](Self::apply) is called.
pub struct ConsoleEngine {
    pub(crate) config: SimConfig,
    pub(crate) ship: ShipState,
    pub(crate) timers: Scheduler,
    pub(crate) log: EventLog,
    pub(crate) rng: StdRng,
    pub(crate) clock_ms: u64,
    pub(crate) watch: WatchKeys,
    /// Latched once the freeze has been applied.
    frozen: bool,
}

impl ConsoleEngine {
    /// Validate `config` and start a session at clock 0.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let rng = match config.session.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self::start(config, rng))
    }

    /// Default configuration with a fixed seed.
    pub fn with_seed(seed: u64) -> Result<Self, ConfigError> {
        Self::new(SimConfig::default().with_seed(seed))
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Every primitive cell.
    pub fn ship(&self) -> &ShipState {
        &self.ship
    }

    pub fn timers(&self) -> &Scheduler {
        &self.timers
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// Current simulation time in ms.
    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    /// Whether explosion or a resolved ending has frozen the timers.
    pub fn is_frozen(&self) -> bool {
        self.ship.reactor.exploded || self.ending().is_some()
    }

    /// Advance the clock to `now_ms`, firing every timer due on the way in
    /// time order.
    pub fn tick(&mut self, now_ms: u64) {
        if now_ms < self.clock_ms {
            log::warn!("tick to {now_ms} ms ignored: clock already at {} ms", self.clock_ms);
            return;
        }
        while let Some((kind, due)) = self.timers.pop_due(now_ms) {
            self.clock_ms = due;
            log::debug!("timer {kind:?} fired at {due} ms");
            self.fire(kind);
            self.settle();
        }
        self.clock_ms = now_ms;
        self.settle();
    }

    /// Run an operator intent at the current clock.
    ///
    /// A rejection leaves the state untouched and is also written to the
    /// event log.
    pub fn apply(&mut self, intent: Intent) -> Result<(), Rejection> {
        log::debug!("intent {intent:?} at {} ms", self.clock_ms);
        let result = self.dispatch(intent);
        if let Err(rejection) = &result {
            self.emit(rejection.severity(), rejection.to_string());
        }
        self.settle();
        result
    }

    /// [`tick`](Self::tick) to `now_ms`, then [`apply`](Self::apply).
    pub fn apply_at(&mut self, now_ms: u64, intent: Intent) -> Result<(), Rejection> {
        self.tick(now_ms);
        self.apply(intent)
    }

    /// Serialisable view of every cell and derived value.
    pub fn snapshot(&self) -> ConsoleSnapshot {
        ConsoleSnapshot::capture(self)
    }

    fn start(config: SimConfig, mut rng: StdRng) -> Self {
        let fracture_site = Compartment::ALL[rng.gen_range(0..Compartment::ALL.len())];
        log::info!(
            "console session started (seed {:?}, fracture in {})",
            config.session.seed,
            fracture_site.label()
        );

        let mut engine = Self {
            ship: ShipState::new(&config, fracture_site),
            log: EventLog::with_capacity(config.session.log_capacity),
            timers: Scheduler::new(),
            rng,
            clock_ms: 0,
            watch: WatchKeys::default(),
            frozen: false,
            config,
        };
        engine.settle();
        engine
    }

    pub(crate) fn emit(&mut self, severity: Severity, message: impl Into<String>) {
        self.log.push(severity, message, self.clock_ms);
    }

    fn dispatch(&mut self, intent: Intent) -> Result<(), Rejection> {
        match intent {
            Intent::ToggleSwitch { id } => self.toggle_switch(id),
            Intent::PressOverride => self.press_override(),
            Intent::ReleaseOverride => self.release_override(),
            Intent::SelectWaypoint { index } => self.select_waypoint(index),
            Intent::LockCourse => self.lock_course(),
            Intent::ToggleComms => self.toggle_comms(),
            Intent::RepairNavCore => self.repair_nav_core(),
            Intent::ToggleIsolate { compartment } => self.toggle_isolate(compartment),
            Intent::PatchFracture => self.patch_fracture(),
            Intent::SetKnob { knob, value } => self.set_knob(knob, value),
            Intent::SetOrientation { axis, value } => self.set_orientation(axis, value),
            Intent::ScanPrimary => self.scan_primary(),
            Intent::ScanSecondary => self.scan_secondary(),
            Intent::UnlockCompartment => self.unlock_compartment(),
            Intent::ReadFiles => self.read_files(),
            Intent::ChooseEnding { directive } => self.choose_ending(directive),
            Intent::ToggleRedundancy => self.toggle_redundancy(),
        }
    }

    fn fire(&mut self, kind: TimerKind) {
        match kind {
            TimerKind::TempStep => self.on_temp_step(),
            TimerKind::Explosion => self.on_explosion(),
            TimerKind::StabilityAdvance => self.on_stability_advance(),
            TimerKind::OverloadReset => self.on_overload_reset(),
            TimerKind::EnvGateAdvance => self.on_env_gate_advance(),
            TimerKind::OxygenStep => self.on_oxygen_step(),
            TimerKind::HullStep => self.on_hull_step(),
            TimerKind::ShieldStep => self.on_shield_step(),
        }
    }

    /// Re-run every watcher until no trigger key changes.
    fn settle(&mut self) {
        for _ in 0..MAX_SETTLE_PASSES {
            self.apply_freeze();

            let mut changed = false;
            changed |= self.latch_buses();
            changed |= self.latch_authority();
            changed |= self.watch_temperature();
            changed |= self.watch_progression();
            changed |= self.watch_explosion();
            changed |= self.watch_env_gate();
            changed |= self.watch_oxygen();
            changed |= self.watch_hull();
            changed |= self.watch_shields();
            if !changed {
                return;
            }
        }
        log::warn!("watchers still changing after {MAX_SETTLE_PASSES} passes");
    }

    fn apply_freeze(&mut self) {
        if self.frozen || !self.is_frozen() {
            return;
        }
        self.frozen = true;
        let cancelled = self.timers.len();
        self.timers.clear();
        log::info!("simulation frozen at {} ms ({cancelled} timers cancelled)", self.clock_ms);
    }
}

impl Default for ConsoleEngine {
    fn default() -> Self {
        Self::start(SimConfig::default(), StdRng::from_entropy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_engine_is_idle() {
        let engine = ConsoleEngine::with_seed(7).unwrap();
        assert_eq!(engine.clock_ms(), 0);
        assert!(engine.timers().is_empty(), "nothing should be scheduled at rest");
        assert!(!engine.is_frozen());
    }

    #[test]
    fn test_seed_fixes_fracture_site() {
        let a = ConsoleEngine::with_seed(42).unwrap();
        let b = ConsoleEngine::with_seed(42).unwrap();
        assert_eq!(a.ship().life_support.fracture_site, b.ship().life_support.fracture_site);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = SimConfig::default();
        config.reactor.switch_values.clear();
        assert!(matches!(
            ConsoleEngine::new(config),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_backwards_tick_ignored() {
        let mut engine = ConsoleEngine::with_seed(1).unwrap();
        engine.tick(500);
        engine.tick(100);
        assert_eq!(engine.clock_ms(), 500);
    }

    #[test]
    fn test_rejection_logged_and_returned() {
        let mut engine = ConsoleEngine::with_seed(1).unwrap();
        let result = engine.apply(Intent::ToggleSwitch { id: 3 });
        assert_eq!(result, Err(Rejection::UnknownSwitch(3)));
        let entry = engine.log().last().unwrap();
        assert_eq!(entry.severity, Severity::Error);
        assert_eq!(engine.ship().reactor.power, 0);
    }

    #[test]
    fn test_default_engine_uses_default_config() {
        let engine = ConsoleEngine::default();
        assert_eq!(engine.config().reactor.max_temp(), 511);
        assert_eq!(engine.log().capacity(), 80);
    }
}
