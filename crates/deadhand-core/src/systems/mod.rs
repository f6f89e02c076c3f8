//! Systems - intent handlers, watchers and timer handlers per subsystem
//!
//! Each file extends [`ConsoleEngine`](crate::engine::ConsoleEngine) with the
//! behaviour of one subsystem. Watchers compute a key from the cells their
//! trigger depends on and only touch the scheduler when that key changes.

mod authority;
mod life_support;
mod navigation;
mod reactor;
mod vitals;

use deadhand_logic::reactor::ReactorStatus;

/// Last key each watcher acted on.
#[derive(Debug, Clone, Default)]
pub(crate) struct WatchKeys {
    /// (power, override, phase-change grace, exploded)
    pub temperature: Option<(u32, bool, bool, bool)>,
    /// (temp, power, phase, status)
    pub progression: Option<(u32, u32, u8, ReactorStatus)>,
    pub explosion: Option<ReactorStatus>,
    /// (phase, temp, power, gate met)
    pub env_gate: Option<(u8, u32, u32, bool)>,
    /// Oxygen stepper running.
    pub oxygen: Option<bool>,
    /// (hull stepper running, status)
    pub hull: Option<(bool, ReactorStatus)>,
    /// Shield walk running.
    pub shields: Option<bool>,
}

/// Store `key` in `slot`; true when it differs from what was there.
pub(crate) fn observe<K: PartialEq>(slot: &mut Option<K>, key: K) -> bool {
    if slot.as_ref() == Some(&key) {
        return false;
    }
    *slot = Some(key);
    true
}
