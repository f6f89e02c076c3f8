//! Life support pipeline: thermal band, fracture leak, scrubbers, O2 balance.
//!
//! Everything here is derived from a handful of primitive inputs (reactor
//! temperature, knob positions, seal and patch flags). [`LifeSupportReadings`]
//! computes the whole pipeline from one [`LifeSupportInputs`] so every value
//! in a reading comes from the same snapshot.

use serde::{Deserialize, Serialize};

use crate::config::LifeSupportConfig;

/// Formula coefficients for the life support pipeline.
pub mod ls_constants {
    /// Constant O2 drain per second regardless of state.
    pub const BASE_DRAIN: f32 = 0.1;
    /// Leak through an open fracture at underpowered/nominal band.
    pub const LEAK_RATE: f32 = 0.6;
    /// Leak through an open fracture at high/overpower band.
    pub const LEAK_RATE_HOT: f32 = 1.2;
    /// Extra drain while the reactor desyncs at overpower.
    pub const OVERPOWER_SPIKE: f32 = 0.8;
    /// O2 recovered per second at 100% scrubber efficiency.
    pub const SCRUBBER_RECOVERY: f32 = 0.5;

    /// Scrubber efficiency with knobs fully misaligned.
    pub const SCRUBBER_FLOOR: f32 = 40.0;
    /// Efficiency added as knobs approach the optimum.
    pub const SCRUBBER_SPAN: f32 = 55.0;

    /// CO2 saturation per point of lost scrubber efficiency.
    pub const CO2_PER_INEFFICIENCY: f32 = 0.6;

    /// Nominal cabin pressure (ATM).
    pub const NOMINAL_PRESSURE: f32 = 1.0;
    /// Pressure lost per unit of leak rate.
    pub const PRESSURE_PER_LEAK: f32 = 0.015;
    /// Pressure lost while at overpower band.
    pub const OVERPOWER_PRESSURE_DROP: f32 = 0.04;

    /// Environmental gate: minimum scrubber efficiency.
    pub const GATE_MIN_EFFICIENCY: f32 = 85.0;
    /// Environmental gate: minimum cabin pressure.
    pub const GATE_MIN_PRESSURE: f32 = 0.98;

    /// Oxygen level the bar may never leave.
    pub const MIN_OXYGEN: f32 = 0.0;
    pub const MAX_OXYGEN: f32 = 100.0;
}

/// Coarse reactor thermal band, used to cap scrubber performance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReactorBand {
    Underpowered,
    Nominal,
    High,
    Overpower,
}

impl ReactorBand {
    /// Highest scrubber efficiency the band can sustain.
    pub fn scrubber_cap(self) -> f32 {
        match self {
            Self::Underpowered => 65.0,
            Self::Nominal => 95.0,
            Self::High => 85.0,
            Self::Overpower => 70.0,
        }
    }

    pub fn is_hot(self) -> bool {
        matches!(self, Self::High | Self::Overpower)
    }
}

/// Classify normalized reactor temperature into a band.
pub fn reactor_band(temp: u32, max_temp: u32, cutoffs: [f32; 3]) -> ReactorBand {
    let pct = temp as f32 / max_temp.max(1) as f32;
    if pct < cutoffs[0] {
        ReactorBand::Underpowered
    } else if pct <= cutoffs[1] {
        ReactorBand::Nominal
    } else if pct <= cutoffs[2] {
        ReactorBand::High
    } else {
        ReactorBand::Overpower
    }
}

/// Sealable compartments; one of them hides the fracture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Compartment {
    Cockpit,
    CrewQuarters,
    ServiceBay,
}

impl Compartment {
    pub const ALL: [Compartment; 3] = [Self::Cockpit, Self::CrewQuarters, Self::ServiceBay];

    pub fn label(self) -> &'static str {
        match self {
            Self::Cockpit => "cockpit",
            Self::CrewQuarters => "crew-quarters",
            Self::ServiceBay => "service-bay",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Sealed flag per compartment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompartmentSeals([bool; 3]);

impl CompartmentSeals {
    pub fn is_sealed(&self, compartment: Compartment) -> bool {
        self.0[compartment.index()]
    }

    /// Flip the seal and return the new state.
    pub fn toggle(&mut self, compartment: Compartment) -> bool {
        let slot = &mut self.0[compartment.index()];
        *slot = !*slot;
        *slot
    }

    pub fn any(&self) -> bool {
        self.0.iter().any(|s| *s)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Compartment, bool)> + '_ {
        Compartment::ALL.iter().map(|c| (*c, self.is_sealed(*c)))
    }
}

/// The two operator-tuned scrubber knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScrubberKnob {
    IntakeRatio,
    PurgeInterval,
}

/// Clamp a knob position into its travel.
pub fn clamp_knob(value: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

/// O2 lost through the fracture per second.
pub fn fracture_leak_rate(patched: bool, site_sealed: bool, band: ReactorBand) -> f32 {
    use ls_constants::*;
    if patched || site_sealed {
        return 0.0;
    }
    if band.is_hot() {
        LEAK_RATE_HOT
    } else {
        LEAK_RATE
    }
}

/// Scrubber efficiency before the band cap.
///
/// 95 with both knobs on their optimum, falling linearly with the mean
/// relative distance from it to 40.
pub fn raw_scrubber_efficiency(intake: f32, purge: f32, optimal_intake: f32, optimal_purge: f32) -> f32 {
    use ls_constants::*;
    let intake_dist = (intake - optimal_intake).abs() / optimal_intake;
    let purge_dist = (purge - optimal_purge).abs() / optimal_purge;
    let misalign = ((intake_dist + purge_dist) / 2.0).min(1.0);
    SCRUBBER_FLOOR + (1.0 - misalign) * SCRUBBER_SPAN
}

/// Scrubber efficiency after the band cap.
pub fn scrubber_efficiency(raw: f32, band: ReactorBand) -> f32 {
    raw.min(band.scrubber_cap())
}

pub fn co2_saturation(efficiency: f32) -> f32 {
    ((100.0 - efficiency) * ls_constants::CO2_PER_INEFFICIENCY).max(0.0)
}

/// Cabin pressure in ATM (nominal 1.0).
pub fn cabin_pressure(leak: f32, band: ReactorBand) -> f32 {
    use ls_constants::*;
    let band_drop = if band == ReactorBand::Overpower {
        OVERPOWER_PRESSURE_DROP
    } else {
        0.0
    };
    (NOMINAL_PRESSURE - leak * PRESSURE_PER_LEAK - band_drop).max(0.0)
}

/// Net O2 loss per second (positive = losing, negative = recovering).
pub fn oxygen_loss_rate(leak: f32, efficiency: f32, band: ReactorBand) -> f32 {
    use ls_constants::*;
    let spike = if band == ReactorBand::Overpower {
        OVERPOWER_SPIKE
    } else {
        0.0
    };
    BASE_DRAIN + leak + spike - (efficiency / 100.0) * SCRUBBER_RECOVERY
}

/// Environmental conditions required to leave the gated phase.
pub fn env_gate_met(loss_rate: f32, efficiency: f32, pressure: f32, band: ReactorBand) -> bool {
    use ls_constants::*;
    loss_rate <= 0.0
        && efficiency >= GATE_MIN_EFFICIENCY
        && pressure >= GATE_MIN_PRESSURE
        && band == ReactorBand::Nominal
}

/// Apply one oxygen step, clamped to the bar.
pub fn apply_oxygen_step(level: f32, loss_rate: f32) -> f32 {
    use ls_constants::*;
    (level - loss_rate).clamp(MIN_OXYGEN, MAX_OXYGEN)
}

/// Crew count after one step at `oxygen`.
pub fn crew_after_step(crew: f32, oxygen: f32, attrition_oxygen: f32, rate: f32) -> f32 {
    if oxygen < attrition_oxygen && crew > 0.0 {
        (crew - rate).max(0.0)
    } else {
        crew
    }
}

/// Airflow balance readout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AirflowBalance {
    Balanced,
    Unbalanced,
    Rerouted,
}

pub fn airflow_balance(any_sealed: bool, patched: bool) -> AirflowBalance {
    match (any_sealed, patched) {
        (true, true) => AirflowBalance::Rerouted,
        (true, false) => AirflowBalance::Unbalanced,
        (false, _) => AirflowBalance::Balanced,
    }
}

/// Cabin degradation as oxygen falls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OxygenDegradation {
    Normal,
    Low,
    Moderate,
    Severe,
    Critical,
}

pub fn oxygen_degradation(oxygen: f32) -> OxygenDegradation {
    if oxygen < 10.0 {
        OxygenDegradation::Critical
    } else if oxygen < 20.0 {
        OxygenDegradation::Severe
    } else if oxygen < 30.0 {
        OxygenDegradation::Moderate
    } else if oxygen < 40.0 {
        OxygenDegradation::Low
    } else {
        OxygenDegradation::Normal
    }
}

/// Primitive inputs the pipeline reads.
#[derive(Debug, Clone, Copy)]
pub struct LifeSupportInputs {
    pub reactor_temp: u32,
    pub intake_ratio: f32,
    pub purge_interval: f32,
    pub fracture_site: Compartment,
    pub fracture_patched: bool,
    pub seals: CompartmentSeals,
}

/// Every derived life support value, computed from one set of inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LifeSupportReadings {
    pub band: ReactorBand,
    pub fracture_leak_rate: f32,
    pub scrubber_efficiency: f32,
    pub co2_saturation: f32,
    pub cabin_pressure: f32,
    pub oxygen_loss_rate: f32,
    pub airflow: AirflowBalance,
    pub env_gate_met: bool,
}

impl LifeSupportReadings {
    pub fn compute(inputs: &LifeSupportInputs, config: &LifeSupportConfig) -> Self {
        let band = reactor_band(inputs.reactor_temp, config.band_max_temp, config.band_cutoffs);
        let leak = fracture_leak_rate(
            inputs.fracture_patched,
            inputs.seals.is_sealed(inputs.fracture_site),
            band,
        );
        let raw = raw_scrubber_efficiency(
            inputs.intake_ratio,
            inputs.purge_interval,
            config.optimal_intake,
            config.optimal_purge,
        );
        let efficiency = scrubber_efficiency(raw, band);
        let pressure = cabin_pressure(leak, band);
        let loss = oxygen_loss_rate(leak, efficiency, band);

        Self {
            band,
            fracture_leak_rate: leak,
            scrubber_efficiency: efficiency,
            co2_saturation: co2_saturation(efficiency),
            cabin_pressure: pressure,
            oxygen_loss_rate: loss,
            airflow: airflow_balance(inputs.seals.any(), inputs.fracture_patched),
            env_gate_met: env_gate_met(loss, efficiency, pressure, band),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUTOFFS: [f32; 3] = [0.4, 0.7, 0.85];

    fn inputs() -> LifeSupportInputs {
        LifeSupportInputs {
            reactor_temp: 300,
            intake_ratio: 67.0,
            purge_interval: 62.0,
            fracture_site: Compartment::CrewQuarters,
            fracture_patched: false,
            seals: CompartmentSeals::default(),
        }
    }

    #[test]
    fn test_band_cutoffs() {
        assert_eq!(reactor_band(0, 511, CUTOFFS), ReactorBand::Underpowered);
        assert_eq!(reactor_band(124, 511, CUTOFFS), ReactorBand::Underpowered);
        assert_eq!(reactor_band(205, 511, CUTOFFS), ReactorBand::Nominal);
        assert_eq!(reactor_band(357, 511, CUTOFFS), ReactorBand::Nominal);
        assert_eq!(reactor_band(400, 511, CUTOFFS), ReactorBand::High);
        assert_eq!(reactor_band(450, 511, CUTOFFS), ReactorBand::Overpower);
        assert_eq!(reactor_band(511, 511, CUTOFFS), ReactorBand::Overpower);
    }

    #[test]
    fn test_leak_zero_when_patched_or_sealed() {
        assert_eq!(fracture_leak_rate(true, false, ReactorBand::High), 0.0);
        assert_eq!(fracture_leak_rate(false, true, ReactorBand::Overpower), 0.0);
        assert_eq!(fracture_leak_rate(false, false, ReactorBand::Nominal), 0.6);
        assert_eq!(fracture_leak_rate(false, false, ReactorBand::High), 1.2);
    }

    #[test]
    fn test_optimal_knobs_hit_raw_maximum() {
        let raw = raw_scrubber_efficiency(67.0, 62.0, 67.0, 62.0);
        assert!((raw - 95.0).abs() < 1e-4);
    }

    #[test]
    fn test_band_caps_optimal_efficiency() {
        let raw = raw_scrubber_efficiency(67.0, 62.0, 67.0, 62.0);
        for band in [
            ReactorBand::Underpowered,
            ReactorBand::Nominal,
            ReactorBand::High,
            ReactorBand::Overpower,
        ] {
            let eff = scrubber_efficiency(raw, band);
            assert!(eff <= band.scrubber_cap(), "{band:?} cap exceeded: {eff}");
            assert!((0.0..=95.0).contains(&eff));
        }
        assert_eq!(scrubber_efficiency(raw, ReactorBand::Underpowered), 65.0);
    }

    #[test]
    fn test_efficiency_stays_in_range_across_knob_travel() {
        for intake in (0..=100).step_by(5) {
            for purge in (0..=100).step_by(5) {
                let raw = raw_scrubber_efficiency(intake as f32, purge as f32, 67.0, 62.0);
                assert!((40.0..=95.0 + 1e-4).contains(&raw), "raw {raw} at {intake}/{purge}");
            }
        }
    }

    #[test]
    fn test_initial_knobs_are_poor() {
        let raw = raw_scrubber_efficiency(10.0, 90.0, 67.0, 62.0);
        assert!(raw < 70.0, "misaligned knobs should scrub poorly, got {raw}");
    }

    #[test]
    fn test_co2_inverse_of_efficiency() {
        assert!((co2_saturation(95.0) - 3.0).abs() < 1e-4);
        assert_eq!(co2_saturation(100.0), 0.0);
        assert!((co2_saturation(40.0) - 36.0).abs() < 1e-4);
    }

    #[test]
    fn test_cabin_pressure() {
        assert_eq!(cabin_pressure(0.0, ReactorBand::Nominal), 1.0);
        assert!((cabin_pressure(1.2, ReactorBand::Overpower) - 0.942).abs() < 1e-4);
        assert_eq!(cabin_pressure(1000.0, ReactorBand::Nominal), 0.0);
    }

    #[test]
    fn test_loss_rate_sign() {
        assert!(oxygen_loss_rate(0.0, 95.0, ReactorBand::Nominal) < 0.0);
        assert!(oxygen_loss_rate(0.6, 40.0, ReactorBand::Nominal) > 0.0);
        let hot = oxygen_loss_rate(1.2, 70.0, ReactorBand::Overpower);
        assert!((hot - (0.1 + 1.2 + 0.8 - 0.35)).abs() < 1e-4);
    }

    #[test]
    fn test_oxygen_clamped_for_any_rate() {
        let mut level = 50.0;
        for _ in 0..500 {
            level = apply_oxygen_step(level, -0.375);
            assert!((0.0..=100.0).contains(&level));
        }
        assert_eq!(level, 100.0);
        for _ in 0..500 {
            level = apply_oxygen_step(level, 2.9);
            assert!((0.0..=100.0).contains(&level));
        }
        assert_eq!(level, 0.0);
    }

    #[test]
    fn test_crew_attrition_only_below_threshold() {
        assert_eq!(crew_after_step(3.0, 50.0, 15.0, 0.005), 3.0);
        assert!((crew_after_step(3.0, 10.0, 15.0, 0.005) - 2.995).abs() < 1e-6);
        assert_eq!(crew_after_step(0.001, 0.0, 15.0, 0.005), 0.0);
    }

    #[test]
    fn test_airflow_labels() {
        assert_eq!(airflow_balance(false, false), AirflowBalance::Balanced);
        assert_eq!(airflow_balance(true, false), AirflowBalance::Unbalanced);
        assert_eq!(airflow_balance(true, true), AirflowBalance::Rerouted);
        assert_eq!(airflow_balance(false, true), AirflowBalance::Balanced);
    }

    #[test]
    fn test_degradation_levels() {
        assert_eq!(oxygen_degradation(100.0), OxygenDegradation::Normal);
        assert_eq!(oxygen_degradation(35.0), OxygenDegradation::Low);
        assert_eq!(oxygen_degradation(25.0), OxygenDegradation::Moderate);
        assert_eq!(oxygen_degradation(15.0), OxygenDegradation::Severe);
        assert_eq!(oxygen_degradation(5.0), OxygenDegradation::Critical);
    }

    #[test]
    fn test_seals_toggle() {
        let mut seals = CompartmentSeals::default();
        assert!(!seals.any());
        assert!(seals.toggle(Compartment::ServiceBay));
        assert!(seals.is_sealed(Compartment::ServiceBay));
        assert!(!seals.is_sealed(Compartment::Cockpit));
        assert!(!seals.toggle(Compartment::ServiceBay));
        assert!(!seals.any());
    }

    #[test]
    fn test_readings_gate_met_when_sealed_and_tuned() {
        let mut i = inputs();
        i.seals.toggle(Compartment::CrewQuarters);
        let r = LifeSupportReadings::compute(&i, &LifeSupportConfig::default());
        assert_eq!(r.band, ReactorBand::Nominal);
        assert_eq!(r.fracture_leak_rate, 0.0);
        assert_eq!(r.airflow, AirflowBalance::Unbalanced);
        assert!(r.env_gate_met);
    }

    #[test]
    fn test_readings_gate_fails_with_open_leak() {
        let r = LifeSupportReadings::compute(&inputs(), &LifeSupportConfig::default());
        assert!(r.fracture_leak_rate > 0.0);
        assert!(!r.env_gate_met, "open fracture should keep the gate closed");
    }

    #[test]
    fn test_sealing_wrong_compartment_keeps_leak() {
        let mut i = inputs();
        i.seals.toggle(Compartment::Cockpit);
        let r = LifeSupportReadings::compute(&i, &LifeSupportConfig::default());
        assert_eq!(r.fracture_leak_rate, 0.6);
    }
}
