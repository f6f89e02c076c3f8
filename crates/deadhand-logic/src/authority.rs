//! Command authority: biometric gates, survival mode and ending resolution.
//!
//! The authority chain is a one-way ratchet: crew loss with degraded
//! redundancy engages survival mode, survival mode plus the concealed files
//! enables the secondary biometric source, and a secondary scan transfers
//! command. Only after that transfer can a final directive resolve an ending.

use serde::{Deserialize, Serialize};

/// Crew count below which survival mode may engage.
pub const SURVIVAL_CREW_THRESHOLD: f32 = 2.0;

/// Reactor phase required to open the concealed compartment.
pub const UNLOCK_PHASE: u8 = 2;

/// Documents found in the concealed compartment.
pub const CONCEALED_FILES: [&str; 4] = [
    "FLIGHT_PLAN_AMENDMENT_7.log",
    "COALITION_BRIEF_REDACTED.enc",
    "MANIFEST_DISCREPANCY.txt",
    "COMM_INTERCEPT_2287-04-11.raw",
];

/// What the ship believes about its principal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrincipalStatus {
    #[default]
    Unresolved,
    Deceased,
    ConfirmedAlive,
}

impl PrincipalStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Unresolved => "unresolved",
            Self::Deceased => "deceased",
            Self::ConfirmedAlive => "confirmed_alive",
        }
    }
}

/// Final directive chosen once command access is granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Directive {
    /// Deliver the principal's mission.
    Pilot,
    /// Keep the overlap and take the ship.
    Usurp,
    /// Set a collision course.
    Contain,
}

impl Directive {
    pub fn label(self) -> &'static str {
        match self {
            Self::Pilot => "PILOT",
            Self::Usurp => "USURP",
            Self::Contain => "CONTAIN",
        }
    }
}

/// Terminal narrative outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Ending {
    Pilot,
    Usurp,
    Contain,
}

/// Mutually exclusive outcome flags set by a directive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectiveFlags {
    pub redundancy_restored: bool,
    pub overlap_maintained: bool,
    pub collision_course_set: bool,
}

impl DirectiveFlags {
    pub fn from_directive(directive: Directive) -> Self {
        Self {
            redundancy_restored: directive == Directive::Pilot,
            overlap_maintained: directive == Directive::Usurp,
            collision_course_set: directive == Directive::Contain,
        }
    }
}

/// Resolve the ending; contain beats usurp beats pilot.
pub fn resolve_ending(identity_flip_done: bool, flags: &DirectiveFlags) -> Option<Ending> {
    if !identity_flip_done {
        return None;
    }
    if flags.collision_course_set {
        Some(Ending::Contain)
    } else if flags.overlap_maintained {
        Some(Ending::Usurp)
    } else if flags.redundancy_restored {
        Some(Ending::Pilot)
    } else {
        None
    }
}

pub fn survival_mode_triggered(crew_count: f32, redundancy_degraded: bool) -> bool {
    crew_count < SURVIVAL_CREW_THRESHOLD && redundancy_degraded
}

/// True exactly when the secondary source should switch on now.
pub fn secondary_biometric_unlocks(
    survival_mode: bool,
    compartment_unlocked: bool,
    files_read: bool,
    already_enabled: bool,
) -> bool {
    survival_mode && compartment_unlocked && files_read && !already_enabled
}

/// Why a secondary scan cannot proceed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecondaryScanBlock {
    /// Everything is in place except the files.
    JustificationRequired,
    /// Survival mode has not engaged.
    SecurityLock,
    ConditionsNotMet,
}

pub fn secondary_scan_block(
    enabled: bool,
    survival_mode: bool,
    compartment_unlocked: bool,
    files_read: bool,
) -> Option<SecondaryScanBlock> {
    if enabled {
        None
    } else if survival_mode && compartment_unlocked && !files_read {
        Some(SecondaryScanBlock::JustificationRequired)
    } else if !survival_mode {
        Some(SecondaryScanBlock::SecurityLock)
    } else {
        Some(SecondaryScanBlock::ConditionsNotMet)
    }
}
