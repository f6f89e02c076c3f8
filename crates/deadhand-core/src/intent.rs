//! Operator intents and the reasons the console may refuse them.
//!
//! Intents are plain data so a presentation layer in any runtime can send
//! them as JSON:
//!
//! ```
//! use deadhand_core::intent::Intent;
//!
//! let intent: Intent = serde_json::from_str(r#"{"intent": "toggle-switch", "id": 16}"#).unwrap();
//! assert_eq!(intent, Intent::ToggleSwitch { id: 16 });
//! ```

use deadhand_logic::authority::Directive;
use deadhand_logic::life_support::{Compartment, ScrubberKnob};
use deadhand_logic::navigation::Axis;
use serde::{Deserialize, Serialize};

use crate::terminal::Severity;

/// Everything the operator can do at the console.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "kebab-case")]
pub enum Intent {
    ToggleSwitch { id: u32 },
    PressOverride,
    ReleaseOverride,
    SelectWaypoint { index: usize },
    LockCourse,
    ToggleComms,
    RepairNavCore,
    ToggleIsolate { compartment: Compartment },
    PatchFracture,
    SetKnob { knob: ScrubberKnob, value: f32 },
    SetOrientation { axis: Axis, value: f32 },
    ScanPrimary,
    ScanSecondary,
    UnlockCompartment,
    ReadFiles,
    ChooseEnding { directive: Directive },
    ToggleRedundancy,
}

/// A refused intent. The state is untouched and the reason is logged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("no switch rated {0} on the panel")]
    UnknownSwitch(u32),

    #[error("NAV core offline")]
    NavCoreOffline,

    #[error("BUS B offline")]
    BusBOffline,

    #[error("BUS B offline: NAV core unavailable")]
    NavRepairNeedsBus,

    #[error("NAV core required for comms routing")]
    CommsNeedNavCore,

    #[error("no waypoint at index {0}")]
    UnknownWaypoint(usize),

    #[error("course locked to {0}")]
    CourseLocked(&'static str),

    #[error("course already locked")]
    AlreadyLocked,

    #[error("fracture already patched")]
    AlreadyPatched,

    #[error("breach not isolated: seal the affected compartment before patching")]
    BreachNotIsolated,

    #[error("compartment lock requires Phase {0} reactor")]
    UnlockNeedsPhase(u8),

    #[error("compartment still locked")]
    CompartmentLocked,

    #[error("SECONDARY SOURCE DETECTED: justification token required (read the files)")]
    JustificationRequired,

    #[error("SECONDARY SOURCE DISABLED: power conservation / security lock")]
    SecurityLock,

    #[error("SECONDARY SOURCE LOCKED: conditions not met")]
    SecondaryLocked,

    #[error("command access required")]
    CommandAccessRequired,
}

impl Rejection {
    /// Severity the rejection is logged with.
    pub fn severity(&self) -> Severity {
        match self {
            Rejection::AlreadyLocked
            | Rejection::AlreadyPatched
            | Rejection::JustificationRequired => Severity::Warn,
            _ => Severity::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_intents_round_trip_tags() {
        let intent: Intent = serde_json::from_str(r#"{"intent": "press-override"}"#).unwrap();
        assert_eq!(intent, Intent::PressOverride);
    }

    #[test]
    fn test_payload_intents_parse() {
        let intent: Intent =
            serde_json::from_str(r#"{"intent": "toggle-isolate", "compartment": "service-bay"}"#)
                .unwrap();
        assert_eq!(
            intent,
            Intent::ToggleIsolate {
                compartment: Compartment::ServiceBay
            }
        );

        let intent: Intent =
            serde_json::from_str(r#"{"intent": "set-knob", "knob": "intake-ratio", "value": 67}"#)
                .unwrap();
        assert_eq!(
            intent,
            Intent::SetKnob {
                knob: ScrubberKnob::IntakeRatio,
                value: 67.0
            }
        );

        let intent: Intent =
            serde_json::from_str(r#"{"intent": "choose-ending", "directive": "contain"}"#).unwrap();
        assert_eq!(
            intent,
            Intent::ChooseEnding {
                directive: Directive::Contain
            }
        );
    }

    #[test]
    fn test_unknown_intent_fails_to_parse() {
        let result: Result<Intent, _> = serde_json::from_str(r#"{"intent": "advance-reactor"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejection_severity() {
        assert_eq!(Rejection::AlreadyPatched.severity(), Severity::Warn);
        assert_eq!(Rejection::BusBOffline.severity(), Severity::Error);
        assert_eq!(Rejection::JustificationRequired.severity(), Severity::Warn);
    }
}
