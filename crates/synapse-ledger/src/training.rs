//! Neurofeedback training programs
//!
//! Program registry plus a per-(user, program) enrollment state machine:
//!
//! ```text
//! NotEnrolled -> Enrolled -> Completed (terminal)
//! ```
//!
//! Enrollment requires an active program; completion requires an existing
//! enrollment and happens exactly once. Completion carries no elapsed-time
//! requirement against the program duration.

use crate::allocator::IdAllocator;
use crate::context::CallContext;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use synapse_core::{LedgerError, Principal, ProgramId, Result, Timestamp};
use tracing::debug;

/// A neurofeedback training program
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingProgram {
    /// Creator of the program; immutable
    pub creator: Principal,
    /// Display name
    pub name: String,
    /// Description shown to trainees
    pub description: String,
    /// Nominal program duration in logical clock units; always > 0
    pub duration: u64,
    /// Listed price in reward tokens
    pub price: u64,
    /// Whether new enrollments are accepted
    pub active: bool,
}

/// Enrollment record for one (user, program) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProgram {
    /// Logical clock value at enrollment
    pub started_at: Timestamp,
    /// Whether the user has completed the program
    pub completed: bool,
}

/// Derived enrollment state for one (user, program) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnrollmentState {
    /// No enrollment record exists
    NotEnrolled,
    /// Enrolled and not yet completed
    Enrolled,
    /// Completed; terminal
    Completed,
}

/// Programs and enrollments
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingLedger {
    programs: BTreeMap<ProgramId, TrainingProgram>,
    enrollments: BTreeMap<(Principal, ProgramId), UserProgram>,
    allocator: IdAllocator,
}

impl TrainingLedger {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new program owned by the caller
    ///
    /// The program starts active. `duration` must be positive.
    pub fn create_program(
        &mut self,
        ctx: &CallContext,
        name: impl Into<String>,
        description: impl Into<String>,
        duration: u64,
        price: u64,
    ) -> Result<ProgramId> {
        if duration == 0 {
            return Err(LedgerError::invalid_state(
                "program duration must be positive",
            ));
        }
        let id = ProgramId::new(self.allocator.allocate());
        self.programs.insert(
            id,
            TrainingProgram {
                creator: ctx.caller(),
                name: name.into(),
                description: description.into(),
                duration,
                price,
                active: true,
            },
        );
        debug!("created program {} by {}", id, ctx.caller());
        Ok(id)
    }

    /// Activate or deactivate a program; creator only
    pub fn update_program_status(
        &mut self,
        ctx: &CallContext,
        id: ProgramId,
        active: bool,
    ) -> Result<()> {
        let program = self
            .programs
            .get_mut(&id)
            .ok_or_else(|| LedgerError::not_found(format!("program {id}")))?;
        if program.creator != ctx.caller() {
            return Err(LedgerError::unauthorized(format!(
                "only the creator may update {id}"
            )));
        }
        program.active = active;
        debug!("program {} active = {}", id, active);
        Ok(())
    }

    /// Enroll the caller in a program
    ///
    /// The program must exist and be active, and the caller must not
    /// already hold an enrollment for it (completed or not).
    pub fn enroll(&mut self, ctx: &CallContext, id: ProgramId) -> Result<()> {
        let user = ctx.caller();
        let program = self
            .programs
            .get(&id)
            .ok_or_else(|| LedgerError::not_found(format!("program {id}")))?;
        if !program.active {
            return Err(LedgerError::invalid_state(format!(
                "program {id} is not active"
            )));
        }
        if self.enrollments.contains_key(&(user, id)) {
            return Err(LedgerError::invalid_state(format!(
                "already enrolled in program {id}"
            )));
        }

        self.enrollments.insert(
            (user, id),
            UserProgram {
                started_at: ctx.clock(),
                completed: false,
            },
        );
        debug!("{} enrolled in program {}", user, id);
        Ok(())
    }

    /// Mark the caller's enrollment in a program as completed
    ///
    /// Requires an existing enrollment; the completed flag transitions
    /// false -> true exactly once.
    pub fn complete(&mut self, ctx: &CallContext, id: ProgramId) -> Result<()> {
        let user = ctx.caller();
        let enrollment = self
            .enrollments
            .get_mut(&(user, id))
            .ok_or_else(|| LedgerError::not_found(format!("no enrollment in program {id}")))?;
        if enrollment.completed {
            return Err(LedgerError::invalid_state(format!(
                "program {id} already completed"
            )));
        }
        enrollment.completed = true;
        debug!("{} completed program {}", user, id);
        Ok(())
    }

    /// Look up a program; `None` if the id was never allocated
    pub fn program(&self, id: ProgramId) -> Option<&TrainingProgram> {
        self.programs.get(&id)
    }

    /// Look up an enrollment record; `None` if `user` never enrolled
    pub fn user_program(&self, user: Principal, id: ProgramId) -> Option<&UserProgram> {
        self.enrollments.get(&(user, id))
    }

    /// Derived state of the (user, program) enrollment machine
    pub fn enrollment_state(&self, user: Principal, id: ProgramId) -> EnrollmentState {
        match self.enrollments.get(&(user, id)) {
            None => EnrollmentState::NotEnrolled,
            Some(enrollment) if enrollment.completed => EnrollmentState::Completed,
            Some(_) => EnrollmentState::Enrolled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn ledger_with_program() -> (TrainingLedger, Principal, ProgramId) {
        let mut ledger = TrainingLedger::new();
        let creator = Principal::derive("creator");
        let id = ledger
            .create_program(
                &CallContext::new(creator, 1),
                "Alpha Calm",
                "Alpha-wave relaxation training",
                30,
                250,
            )
            .unwrap();
        (ledger, creator, id)
    }

    #[test]
    fn create_program_round_trip() {
        let (ledger, creator, id) = ledger_with_program();
        let program = ledger.program(id).unwrap();
        assert_eq!(program.creator, creator);
        assert_eq!(program.name, "Alpha Calm");
        assert_eq!(program.duration, 30);
        assert_eq!(program.price, 250);
        assert!(program.active);
    }

    #[test]
    fn zero_duration_is_rejected() {
        let mut ledger = TrainingLedger::new();
        let creator = Principal::derive("creator");
        let err = ledger
            .create_program(&CallContext::new(creator, 1), "Bad", "", 0, 10)
            .unwrap_err();
        assert_matches!(err, LedgerError::InvalidState { .. });
        // The failed call burned no id.
        let id = ledger
            .create_program(&CallContext::new(creator, 2), "Good", "", 1, 10)
            .unwrap();
        assert_eq!(id, ProgramId::new(1));
    }

    #[test]
    fn status_update_guards() {
        let (mut ledger, creator, id) = ledger_with_program();
        let other = Principal::derive("other");

        let err = ledger
            .update_program_status(&CallContext::new(other, 2), id, false)
            .unwrap_err();
        assert_matches!(err, LedgerError::Unauthorized { .. });

        let err = ledger
            .update_program_status(&CallContext::new(creator, 3), ProgramId::new(7), false)
            .unwrap_err();
        assert_matches!(err, LedgerError::NotFound { .. });

        ledger
            .update_program_status(&CallContext::new(creator, 4), id, false)
            .unwrap();
        assert!(!ledger.program(id).unwrap().active);
    }

    #[test]
    fn enrollment_state_machine() {
        let (mut ledger, _creator, id) = ledger_with_program();
        let trainee = Principal::derive("trainee");
        assert_eq!(
            ledger.enrollment_state(trainee, id),
            EnrollmentState::NotEnrolled
        );

        ledger.enroll(&CallContext::new(trainee, 10), id).unwrap();
        assert_eq!(
            ledger.enrollment_state(trainee, id),
            EnrollmentState::Enrolled
        );
        assert_eq!(
            ledger.user_program(trainee, id),
            Some(&UserProgram {
                started_at: 10,
                completed: false
            })
        );

        ledger.complete(&CallContext::new(trainee, 11), id).unwrap();
        assert_eq!(
            ledger.enrollment_state(trainee, id),
            EnrollmentState::Completed
        );
        assert!(ledger.user_program(trainee, id).unwrap().completed);
    }

    #[test]
    fn enroll_guards() {
        let (mut ledger, creator, id) = ledger_with_program();
        let trainee = Principal::derive("trainee");

        let err = ledger
            .enroll(&CallContext::new(trainee, 1), ProgramId::new(9))
            .unwrap_err();
        assert_matches!(err, LedgerError::NotFound { .. });

        ledger
            .update_program_status(&CallContext::new(creator, 2), id, false)
            .unwrap();
        let err = ledger.enroll(&CallContext::new(trainee, 3), id).unwrap_err();
        assert_matches!(err, LedgerError::InvalidState { .. });

        ledger
            .update_program_status(&CallContext::new(creator, 4), id, true)
            .unwrap();
        ledger.enroll(&CallContext::new(trainee, 5), id).unwrap();

        // Re-enrollment is rejected while enrolled and after completion.
        let err = ledger.enroll(&CallContext::new(trainee, 6), id).unwrap_err();
        assert_matches!(err, LedgerError::InvalidState { .. });
        ledger.complete(&CallContext::new(trainee, 7), id).unwrap();
        let err = ledger.enroll(&CallContext::new(trainee, 8), id).unwrap_err();
        assert_matches!(err, LedgerError::InvalidState { .. });
        assert_eq!(
            ledger.user_program(trainee, id),
            Some(&UserProgram {
                started_at: 5,
                completed: true
            })
        );
    }

    #[test]
    fn complete_guards() {
        let (mut ledger, _creator, id) = ledger_with_program();
        let trainee = Principal::derive("trainee");

        let err = ledger.complete(&CallContext::new(trainee, 1), id).unwrap_err();
        assert_matches!(err, LedgerError::NotFound { .. });

        ledger.enroll(&CallContext::new(trainee, 2), id).unwrap();
        // Completion is legal immediately; no duration gate.
        ledger.complete(&CallContext::new(trainee, 2), id).unwrap();

        let err = ledger.complete(&CallContext::new(trainee, 3), id).unwrap_err();
        assert_matches!(err, LedgerError::InvalidState { .. });
    }

    #[test]
    fn deactivation_does_not_block_completion() {
        let (mut ledger, creator, id) = ledger_with_program();
        let trainee = Principal::derive("trainee");
        ledger.enroll(&CallContext::new(trainee, 1), id).unwrap();
        ledger
            .update_program_status(&CallContext::new(creator, 2), id, false)
            .unwrap();

        // Existing enrollments run to completion even if the program
        // stops accepting new ones.
        ledger.complete(&CallContext::new(trainee, 3), id).unwrap();
        assert_eq!(
            ledger.enrollment_state(trainee, id),
            EnrollmentState::Completed
        );
    }
}
