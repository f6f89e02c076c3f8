//! Deadhand Headless Session Harness
//!
//! Drives scripted console sessions through the engine on a virtual clock.
//! Runs entirely in-process: no rendering, no wall clock.
//!
//! Usage:
//!   cargo run -p deadhand-simtest
//!   cargo run -p deadhand-simtest -- --verbose

use deadhand_core::prelude::*;
use deadhand_logic::authority::{Directive, Ending, PrincipalStatus};
use deadhand_logic::life_support::{
    raw_scrubber_efficiency, scrubber_efficiency, ReactorBand, ScrubberKnob,
};
use deadhand_logic::reactor::ReactorStatus;

// ── Shipped configuration (same JSON a presentation layer loads) ───────
const CONFIG_JSON: &str = include_str!("../../../data/console_config.json");

const SEED: u64 = 2287;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Deadhand Console Harness ===\n");

    let config = match SimConfig::from_json(CONFIG_JSON) {
        Ok(c) => c.with_seed(SEED),
        Err(e) => {
            println!("  ✗ config_parse: {}", e);
            std::process::exit(1);
        }
    };

    let mut results = Vec::new();

    // 1. Shipped configuration
    results.extend(validate_config(&config));

    // 2. Reactor progression and explosion
    results.extend(validate_reactor(&config));

    // 3. Life support pipeline and oxygen stepper
    results.extend(validate_life_support(&config));

    // 4. Hull and shields
    results.extend(validate_vitals(&config));

    // 5. Full playthrough to an ending
    results.extend(validate_playthrough(&config, verbose));

    // 6. Seeded sessions replay identically
    results.extend(validate_determinism(&config));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn session(config: &SimConfig) -> Option<ConsoleEngine> {
    ConsoleEngine::new(config.clone()).ok()
}

fn toggle_all(engine: &mut ConsoleEngine, ids: &[u32]) {
    for &id in ids {
        let _ = engine.apply(Intent::ToggleSwitch { id });
    }
}

fn engine_failed(name: &str) -> Vec<TestResult> {
    vec![TestResult {
        name: name.into(),
        passed: false,
        detail: "engine rejected the shipped configuration".into(),
    }]
}

// ── 1. Configuration ────────────────────────────────────────────────────

fn validate_config(config: &SimConfig) -> Vec<TestResult> {
    println!("--- Configuration ---");
    let mut results = Vec::new();

    results.push(TestResult {
        name: "config_valid".into(),
        passed: config.validate().is_ok(),
        detail: "shipped JSON passes validation".into(),
    });

    let max_temp = config.reactor.max_temp();
    results.push(TestResult {
        name: "config_max_temp".into(),
        passed: max_temp == 511,
        detail: format!("switch sum = {}", max_temp),
    });

    results.push(TestResult {
        name: "config_phase_table".into(),
        passed: config.reactor.phase_thresholds == [31, 124, 452],
        detail: format!("thresholds {:?}", config.reactor.phase_thresholds),
    });

    results.push(TestResult {
        name: "config_log_capacity".into(),
        passed: config.session.log_capacity == 80,
        detail: format!("{} entries retained", config.session.log_capacity),
    });

    results
}

// ── 2. Reactor ──────────────────────────────────────────────────────────

fn validate_reactor(config: &SimConfig) -> Vec<TestResult> {
    println!("--- Reactor ---");
    let mut results = Vec::new();

    // Phase 0 → 1 on a 5 s hold at 31
    let Some(mut e) = session(config) else {
        return engine_failed("reactor_session");
    };
    toggle_all(&mut e, &[1, 2, 4, 8, 16]);
    e.tick(2_000);
    let temp = e.ship().reactor.temp;
    e.tick(7_000);
    results.push(TestResult {
        name: "reactor_phase_advance".into(),
        passed: temp == 31 && e.ship().reactor.phase == 1,
        detail: format!(
            "temp {} at 2 s, phase {} at 7 s",
            temp,
            e.ship().reactor.phase
        ),
    });

    // Premature break
    let Some(mut e) = session(config) else {
        return engine_failed("reactor_session");
    };
    toggle_all(&mut e, &[1, 2, 4, 8, 16]);
    e.tick(2_000);
    toggle_all(&mut e, &[1]);
    e.tick(7_000);
    results.push(TestResult {
        name: "reactor_premature_break".into(),
        passed: e.ship().reactor.phase == 0,
        detail: format!("phase {} after breaking the hold", e.ship().reactor.phase),
    });

    // Sustained danger
    let Some(mut e) = session(config) else {
        return engine_failed("reactor_session");
    };
    toggle_all(&mut e, &[32, 8]);
    e.tick(2_000);
    let danger = e.reactor_status() == ReactorStatus::Danger;
    e.tick(15_000);
    let exploded = e.ship().reactor.exploded;
    let frozen_temp = e.ship().reactor.temp;
    toggle_all(&mut e, &[1, 2]);
    e.tick(60_000);
    results.push(TestResult {
        name: "reactor_explosion".into(),
        passed: danger && exploded && e.ship().reactor.temp == frozen_temp,
        detail: format!(
            "danger={}, exploded={}, temp frozen at {}",
            danger, exploded, frozen_temp
        ),
    });

    // Recovery before the delay
    let Some(mut e) = session(config) else {
        return engine_failed("reactor_session");
    };
    toggle_all(&mut e, &[32, 8]);
    e.tick(3_000);
    toggle_all(&mut e, &[8]);
    e.tick(20_000);
    results.push(TestResult {
        name: "reactor_recovery".into(),
        passed: !e.ship().reactor.exploded,
        detail: format!("status {:?} after recovering", e.reactor_status()),
    });

    // Override ceiling
    let Some(mut e) = session(config) else {
        return engine_failed("reactor_session");
    };
    let _ = e.apply(Intent::PressOverride);
    e.tick(8_000);
    let peak = e.ship().reactor.temp;
    results.push(TestResult {
        name: "reactor_override_ceiling".into(),
        passed: peak == config.reactor.max_temp(),
        detail: format!("override peak {}", peak),
    });

    results
}

// ── 3. Life Support ─────────────────────────────────────────────────────

fn validate_life_support(config: &SimConfig) -> Vec<TestResult> {
    println!("--- Life Support ---");
    let mut results = Vec::new();
    let ls = &config.life_support;

    // Efficiency never exceeds the band cap across knob travel
    let bands = [
        ReactorBand::Underpowered,
        ReactorBand::Nominal,
        ReactorBand::High,
        ReactorBand::Overpower,
    ];
    let mut worst_excess = f32::MIN;
    for intake in (0..=100).step_by(5) {
        for purge in (0..=100).step_by(5) {
            let raw = raw_scrubber_efficiency(
                intake as f32,
                purge as f32,
                ls.optimal_intake,
                ls.optimal_purge,
            );
            for band in bands {
                let eff = scrubber_efficiency(raw, band);
                worst_excess = worst_excess.max(eff - band.scrubber_cap());
                if !(0.0..=95.0).contains(&eff) {
                    worst_excess = f32::MAX;
                }
            }
        }
    }
    results.push(TestResult {
        name: "scrubber_within_cap".into(),
        passed: worst_excess <= 0.0,
        detail: format!("worst excess over cap {:.2}", worst_excess),
    });

    // Oxygen entry level and drain
    let Some(mut e) = session(config) else {
        return engine_failed("life_support_session");
    };
    toggle_all(&mut e, &[1, 2, 4, 8, 16]);
    e.tick(2_000);
    e.tick(6_500);
    let entry = e.ship().vitals.oxygen_level;
    e.tick(400_000);
    let drained = e.ship().vitals.oxygen_level;
    results.push(TestResult {
        name: "oxygen_entry_and_floor".into(),
        passed: entry == ls.phase_entry_oxygen && drained == 0.0,
        detail: format!("entry {:.1}%, floor {:.1}%", entry, drained),
    });

    // Isolate, patch and tune: oxygen recovers to the ceiling
    let Some(mut e) = session(config) else {
        return engine_failed("life_support_session");
    };
    let site = e.ship().life_support.fracture_site;
    let _ = e.apply(Intent::ToggleIsolate { compartment: site });
    let patched = e.apply(Intent::PatchFracture).is_ok();
    let _ = e.apply(Intent::SetKnob {
        knob: ScrubberKnob::IntakeRatio,
        value: ls.optimal_intake,
    });
    let _ = e.apply(Intent::SetKnob {
        knob: ScrubberKnob::PurgeInterval,
        value: ls.optimal_purge,
    });
    toggle_all(&mut e, &[1, 2, 4, 8, 16]);
    e.tick(2_000);
    e.tick(400_000);
    results.push(TestResult {
        name: "oxygen_recovery_ceiling".into(),
        passed: patched && e.ship().vitals.oxygen_level == 100.0,
        detail: format!(
            "fracture in {} patched={}, O2 {:.1}%",
            site.label(),
            patched,
            e.ship().vitals.oxygen_level
        ),
    });

    results
}

// ── 4. Vitals ───────────────────────────────────────────────────────────

fn validate_vitals(config: &SimConfig) -> Vec<TestResult> {
    println!("--- Vitals ---");
    let mut results = Vec::new();

    // Over-power at phase 1 stresses the hull until the overload reset
    let Some(mut e) = session(config) else {
        return engine_failed("vitals_session");
    };
    toggle_all(&mut e, &[1, 2, 4, 8, 16]);
    e.tick(2_000);
    e.tick(7_000);
    toggle_all(&mut e, &[32, 64]);
    e.tick(15_000);
    let hull = e.ship().vitals.hull_integrity;
    results.push(TestResult {
        name: "hull_stress_overpowered".into(),
        passed: hull < 100.0 && hull > 90.0,
        detail: format!("hull {:.1}% after over-power", hull),
    });

    e.tick(30_000);
    results.push(TestResult {
        name: "overload_reset".into(),
        passed: e.ship().reactor.phase == 0 && e.ship().reactor.power == 0,
        detail: format!("phase {} after sustained over-power", e.ship().reactor.phase),
    });

    // Shields wander inside their bar at phase 2
    let Some(mut e) = session(config) else {
        return engine_failed("vitals_session");
    };
    reach_phase_two(&mut e);
    let mut lo = f32::MAX;
    let mut hi = f32::MIN;
    for t in (20_000..=200_000).step_by(2_000) {
        e.tick(t);
        let s = e.ship().vitals.shield_status;
        lo = lo.min(s);
        hi = hi.max(s);
    }
    results.push(TestResult {
        name: "shield_walk_bounded".into(),
        passed: e.shields_visible() && lo >= 0.0 && hi <= 100.0 && lo < 100.0,
        detail: format!("shields ranged {:.1}..{:.1}", lo, hi),
    });

    results
}

fn reach_phase_two(e: &mut ConsoleEngine) {
    toggle_all(e, &[1, 2, 4, 8, 16]);
    e.tick(2_000);
    e.tick(7_000);
    toggle_all(e, &[1, 2, 32, 64]);
    e.tick(16_000);
}

// ── 5. Playthrough ──────────────────────────────────────────────────────

fn validate_playthrough(config: &SimConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Playthrough ---");
    let mut results = Vec::new();

    let Some(mut e) = session(config) else {
        return engine_failed("playthrough_session");
    };
    reach_phase_two(&mut e);
    results.push(TestResult {
        name: "bus_b_online".into(),
        passed: e.ship().reactor.phase == 2 && e.ship().buses.bus_b_online,
        detail: format!("phase {}, sensors {:?}", e.ship().reactor.phase, e.sensor_status()),
    });

    let nav_ok = e.apply(Intent::RepairNavCore).is_ok()
        && e.apply(Intent::SelectWaypoint { index: 3 }).is_ok()
        && e.apply(Intent::LockCourse).is_ok()
        && e.apply(Intent::ToggleComms).is_ok();
    results.push(TestResult {
        name: "navigation_locked".into(),
        passed: nav_ok && e.ship().navigation.course_locked,
        detail: format!("route {:?}", e.route_status()),
    });

    // Crew loss under a degraded command chain engages survival mode
    let _ = e.apply(Intent::ToggleRedundancy);
    let _ = e.apply(Intent::ScanPrimary);
    let mut now = e.clock_ms();
    while !e.ship().authority.survival_mode_engaged && now < 1_000_000 {
        now += 10_000;
        e.tick(now);
    }
    results.push(TestResult {
        name: "survival_mode_engaged".into(),
        passed: e.ship().authority.survival_mode_engaged,
        detail: format!(
            "crew {:.2} at {} s",
            e.ship().life_support.crew_count,
            now / 1000
        ),
    });

    let chain_ok = e.apply(Intent::UnlockCompartment).is_ok()
        && e.apply(Intent::ReadFiles).is_ok()
        && e.apply(Intent::ScanSecondary).is_ok();
    results.push(TestResult {
        name: "command_access".into(),
        passed: chain_ok
            && e.ship().authority.identity_flip_done
            && e.ship().authority.principal_status == PrincipalStatus::Deceased,
        detail: format!("principal {}", e.ship().authority.principal_status.label()),
    });

    let _ = e.apply(Intent::ChooseEnding {
        directive: Directive::Contain,
    });
    results.push(TestResult {
        name: "ending_contain".into(),
        passed: e.ending() == Some(Ending::Contain) && e.timers().is_empty(),
        detail: format!("ending {:?}, {} timers pending", e.ending(), e.timers().len()),
    });

    if verbose {
        for entry in e.log().entries() {
            println!("    [{:>7} ms] {:?}: {}", entry.at_ms, entry.severity, entry.message);
        }
    }

    results
}

// ── 6. Determinism ──────────────────────────────────────────────────────

fn validate_determinism(config: &SimConfig) -> Vec<TestResult> {
    println!("--- Determinism ---");

    let run = || -> Option<String> {
        let mut e = session(config)?;
        reach_phase_two(&mut e);
        e.tick(120_000);
        e.snapshot().to_json().ok()
    };
    let (a, b) = (run(), run());
    vec![TestResult {
        name: "seeded_replay".into(),
        passed: a.is_some() && a == b,
        detail: format!(
            "{} byte snapshots, identical={}",
            a.as_ref().map_or(0, String::len),
            a == b
        ),
    }]
}
