//! Authority system: biometric scans, concealed compartment, directives and
//! the one-shot latches of the authority chain.

use deadhand_logic::authority::{
    resolve_ending, secondary_biometric_unlocks, secondary_scan_block, survival_mode_triggered,
    Directive, DirectiveFlags, Ending, PrincipalStatus, SecondaryScanBlock, CONCEALED_FILES,
    UNLOCK_PHASE,
};

use crate::engine::ConsoleEngine;
use crate::intent::Rejection;
use crate::terminal::Severity;

impl ConsoleEngine {
    pub(crate) fn scan_primary(&mut self) -> Result<(), Rejection> {
        let auth = &mut self.ship.authority;
        if auth.principal_status == PrincipalStatus::ConfirmedAlive {
            return Ok(());
        }
        auth.principal_status = PrincipalStatus::Unresolved;
        self.emit(
            Severity::Error,
            "PRIMARY BIOMETRIC SCAN — Principal status: UNRESOLVED (no response)",
        );
        Ok(())
    }

    pub(crate) fn scan_secondary(&mut self) -> Result<(), Rejection> {
        let auth = &self.ship.authority;
        let block = secondary_scan_block(
            auth.secondary_biometric_enabled,
            auth.survival_mode_engaged,
            auth.compartment_unlocked,
            auth.files_read,
        );
        match block {
            Some(SecondaryScanBlock::JustificationRequired) => {
                return Err(Rejection::JustificationRequired)
            }
            Some(SecondaryScanBlock::SecurityLock) => return Err(Rejection::SecurityLock),
            Some(SecondaryScanBlock::ConditionsNotMet) => return Err(Rejection::SecondaryLocked),
            None => {}
        }
        if auth.identity_flip_done {
            return Ok(());
        }

        let auth = &mut self.ship.authority;
        auth.identity_flip_done = true;
        auth.principal_status = PrincipalStatus::Deceased;
        self.emit(
            Severity::Warn,
            "DEAD-HAND SCAN ACCEPTED — Principal status: DECEASED",
        );
        self.emit(Severity::Ok, "COMMAND-LEVEL ACCESS GRANTED");
        Ok(())
    }

    pub(crate) fn unlock_compartment(&mut self) -> Result<(), Rejection> {
        if self.ship.reactor.phase < UNLOCK_PHASE {
            return Err(Rejection::UnlockNeedsPhase(UNLOCK_PHASE));
        }
        if self.ship.authority.compartment_unlocked {
            return Ok(());
        }
        self.ship.authority.compartment_unlocked = true;
        self.emit(Severity::Warn, "Concealed compartment UNLOCKED — files accessible");
        Ok(())
    }

    pub(crate) fn read_files(&mut self) -> Result<(), Rejection> {
        if !self.ship.authority.compartment_unlocked {
            return Err(Rejection::CompartmentLocked);
        }
        if self.ship.authority.files_read {
            return Ok(());
        }
        self.ship.authority.files_read = true;
        self.emit(
            Severity::Warn,
            format!("{} concealed files read: {}", CONCEALED_FILES.len(), CONCEALED_FILES.join(", ")),
        );
        self.emit(
            Severity::Warn,
            "Mission parameters do not match the principal's flight plan",
        );
        Ok(())
    }

    pub(crate) fn choose_ending(&mut self, directive: Directive) -> Result<(), Rejection> {
        if !self.ship.authority.identity_flip_done {
            return Err(Rejection::CommandAccessRequired);
        }
        self.ship.authority.directive = DirectiveFlags::from_directive(directive);
        self.emit(
            Severity::Warn,
            format!("Final directive set: {}", directive.label()),
        );
        Ok(())
    }

    pub(crate) fn toggle_redundancy(&mut self) -> Result<(), Rejection> {
        let auth = &mut self.ship.authority;
        auth.redundancy_degraded = !auth.redundancy_degraded;
        if auth.redundancy_degraded {
            self.emit(Severity::Warn, "Command redundancy DEGRADED");
        } else {
            self.emit(Severity::Ok, "Command redundancy restored");
        }
        Ok(())
    }

    pub fn ending(&self) -> Option<Ending> {
        let auth = &self.ship.authority;
        resolve_ending(auth.identity_flip_done, &auth.directive)
    }

    /// Survival mode and secondary biometric enablement. Both are one-shot.
    pub(crate) fn latch_authority(&mut self) -> bool {
        let mut changed = false;

        let crew = self.ship.life_support.crew_count;
        let auth = &mut self.ship.authority;
        if !auth.survival_mode_engaged && survival_mode_triggered(crew, auth.redundancy_degraded) {
            auth.survival_mode_engaged = true;
            self.emit(
                Severity::Warn,
                "⚠ SURVIVAL MODE ENGAGED — authority structure compromised",
            );
            changed = true;
        }

        let auth = &mut self.ship.authority;
        if secondary_biometric_unlocks(
            auth.survival_mode_engaged,
            auth.compartment_unlocked,
            auth.files_read,
            auth.secondary_biometric_enabled,
        ) {
            auth.secondary_biometric_enabled = true;
            self.emit(
                Severity::Warn,
                "SECONDARY BIOMETRIC SOURCE ENABLED — scan when ready",
            );
            changed = true;
        }
        changed
    }
}
