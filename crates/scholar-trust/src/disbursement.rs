//! # Disbursement Engine
//!
//! Moves escrowed funds. Reads the pool table and the verification ledger,
//! decides whether a release or a withdrawal is permitted, calls the
//! [`TokenLedger`], and writes the updated state back.
//!
//! ## Semester State Machine
//!
//! ```text
//! unverified ──verify(gpa < required)──▶ verified-below   (terminal for release;
//!     │                                                    funds reclaimable)
//!     └──────verify(gpa ≥ required)──▶ verified ──release()──▶ released
//! ```
//!
//! A pending semester certified below threshold may be re-certified (see
//! [`crate::VerificationLedger`]); until then only the donor's emergency
//! withdrawal can move its funds.
//!
//! ## Atomicity
//!
//! Every precondition is checked while holding only read access. The transfer
//! happens next, and the state write after it cannot fail. A refused
//! transfer therefore leaves the pool and its verifications untouched.

use scholar_core::{Amount, PoolId, Principal, Semester};

use crate::access::{AccessControl, Requirement};
use crate::error::{TrustError, Unmet};
use crate::ledger::TokenLedger;
use crate::pool::PoolRegistry;
use crate::verification::VerificationLedger;

/// Outcome of a successful semester release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    /// The pool.
    pub pool_id: PoolId,
    /// The semester released.
    pub semester: Semester,
    /// Recipient of the funds.
    pub student: Principal,
    /// Amount moved out of custody.
    pub amount: Amount,
    /// Whether this was the final semester (pool now closed).
    pub completed: bool,
}

/// Outcome of a successful emergency withdrawal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Withdrawal {
    /// The pool, now closed.
    pub pool_id: PoolId,
    /// Recipient of the funds.
    pub donor: Principal,
    /// Amount returned: the pool's whole remaining balance.
    pub amount: Amount,
}

/// Release and withdrawal orchestration over borrowed engine state.
pub struct DisbursementEngine<'a, L: TokenLedger> {
    access: &'a AccessControl,
    pools: &'a mut PoolRegistry,
    verifications: &'a mut VerificationLedger,
    ledger: &'a mut L,
    custody: &'a Principal,
}

impl<'a, L: TokenLedger> DisbursementEngine<'a, L> {
    /// Borrow the state a disbursement needs. `custody` holds escrowed funds.
    pub fn new(
        access: &'a AccessControl,
        pools: &'a mut PoolRegistry,
        verifications: &'a mut VerificationLedger,
        ledger: &'a mut L,
        custody: &'a Principal,
    ) -> Self {
        Self {
            access,
            pools,
            verifications,
            ledger,
            custody,
        }
    }

    /// Release one semester's funds to the pool's student. Any caller may
    /// trigger it.
    ///
    /// # Errors
    ///
    /// - [`TrustError::PoolNotFound`] if the pool is unknown or closed.
    /// - [`TrustError::RequirementNotMet`] if the semester is unverified or
    ///   its GPA is below threshold.
    /// - [`TrustError::AlreadyReleased`] if its funds already moved.
    /// - [`TrustError::InsufficientFunds`] if the ledger refuses the transfer.
    pub fn release_semester_funds(
        &mut self,
        pool_id: PoolId,
        semester: Semester,
    ) -> Result<Release, TrustError> {
        let pool = self.pools.active_pool_mut(pool_id)?;
        let verification = self
            .verifications
            .get_mut(pool_id, semester)
            .ok_or(TrustError::RequirementNotMet {
                pool_id,
                semester,
                reason: Unmet::NotVerified,
            })?;
        if !verification.meets(pool.required_gpa) {
            return Err(TrustError::RequirementNotMet {
                pool_id,
                semester,
                reason: Unmet::BelowThreshold {
                    gpa: verification.gpa,
                    required: pool.required_gpa,
                },
            });
        }
        if verification.released {
            return Err(TrustError::AlreadyReleased { pool_id, semester });
        }

        let amount = pool.amount_per_semester;
        let remaining = pool
            .remaining_amount
            .checked_sub(amount)
            .ok_or(TrustError::Overflow {
                operation: "remaining amount",
            })?;

        self.ledger.transfer(self.custody, &pool.student, amount)?;

        verification.released = true;
        pool.record_release(remaining);
        let completed = !pool.active;

        tracing::info!(
            pool_id = %pool_id,
            semester = %semester,
            student = %pool.student,
            amount = %amount,
            remaining = %remaining,
            completed,
            "semester funds released"
        );
        Ok(Release {
            pool_id,
            semester,
            student: pool.student.clone(),
            amount,
            completed,
        })
    }

    /// Return a pool's whole remaining balance to its donor and close it.
    ///
    /// Allowed only while the pending semester has no verification meeting
    /// the threshold.
    ///
    /// # Errors
    ///
    /// - [`TrustError::PoolNotFound`] if the pool is unknown or closed
    ///   (checked before the caller's identity).
    /// - [`TrustError::Unauthorized`] (donor) if `caller` did not fund the pool.
    /// - [`TrustError::RequirementMet`] if the pending semester is releasable.
    /// - [`TrustError::InsufficientFunds`] if the ledger refuses the transfer.
    pub fn emergency_withdrawal(
        &mut self,
        caller: &Principal,
        pool_id: PoolId,
    ) -> Result<Withdrawal, TrustError> {
        let pool = self.pools.active_pool_mut(pool_id)?;
        self.access.authorize(caller, Requirement::Donor(&pool.donor))?;

        let pending = pool.next_semester();
        if let Some(verification) = self.verifications.get(pool_id, pending) {
            if verification.meets(pool.required_gpa) {
                return Err(TrustError::RequirementMet {
                    pool_id,
                    semester: pending,
                    gpa: verification.gpa,
                    required: pool.required_gpa,
                });
            }
        }

        let amount = pool.remaining_amount;
        self.ledger.transfer(self.custody, &pool.donor, amount)?;
        pool.drain();

        tracing::info!(
            pool_id = %pool_id,
            donor = %pool.donor,
            amount = %amount,
            semesters_released = pool.semesters_released,
            "emergency withdrawal"
        );
        Ok(Withdrawal {
            pool_id,
            donor: pool.donor.clone(),
            amount,
        })
    }
}
