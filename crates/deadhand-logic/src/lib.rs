//! Pure console logic for Deadhand.
//!
//! This crate contains every rule of the console that does not depend on a
//! clock or on mutable session state. Functions take plain values and return
//! results, so the engine, the headless harness and any presentation layer
//! agree on the same classification and formulas.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`authority`] | Principal status, survival mode, secondary biometric gate, ending priority |
//! | [`config`] | Typed configuration with defaults, JSON loading and validation |
//! | [`life_support`] | Thermal band, fracture leak, scrubbers, CO2, pressure, O2 balance |
//! | [`navigation`] | Waypoints, attitude normalization, sensor/drift/route readouts |
//! | [`reactor`] | Status classification, gauge colour, ramp arithmetic |
//! | [`vitals`] | Hull decay, shield fluctuation, aggregate health label |

pub mod authority;
pub mod config;
pub mod life_support;
pub mod navigation;
pub mod reactor;
pub mod vitals;
