//! # Verification Ledger
//!
//! Owns the sparse table of [`MilestoneVerification`] records keyed by
//! `(pool, semester)`.
//!
//! Verifications arrive in strict, gap-free order: an oracle may only certify
//! the pool's next pending semester (`semesters_released + 1`). Re-certifying
//! that same pending semester before release replaces the earlier record. A
//! released record can never be touched again because the pending semester
//! has already moved past it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use scholar_core::{BlockHeight, Gpa, PoolId, Principal, Semester};

use crate::access::{AccessControl, Requirement};
use crate::error::TrustError;
use crate::pool::PoolRegistry;

/// An oracle's certification of one semester's GPA.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneVerification {
    /// The certified score.
    pub gpa: Gpa,
    /// The oracle that submitted it.
    pub verified_by: Principal,
    /// Block at which it was submitted.
    pub verified_at: BlockHeight,
    /// Set once the semester's funds are disbursed.
    pub released: bool,
}

impl MilestoneVerification {
    /// Whether the certified score satisfies `required`.
    pub fn meets(&self, required: Gpa) -> bool {
        self.gpa.meets(required)
    }
}

/// Per-(pool, semester) verification records.
#[derive(Debug, Clone, Default)]
pub struct VerificationLedger {
    records: BTreeMap<(PoolId, Semester), MilestoneVerification>,
}

impl VerificationLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an oracle's GPA certification for the pool's pending semester.
    ///
    /// Returns the record it replaced, if the pending semester had already
    /// been certified.
    ///
    /// # Errors
    ///
    /// - [`TrustError::Unauthorized`] (oracle) if `caller` is not an oracle.
    /// - [`TrustError::PoolNotFound`] if the pool is unknown or closed.
    /// - [`TrustError::SequenceViolation`] if `semester` is not the next pending one.
    #[allow(clippy::too_many_arguments)]
    pub fn verify_milestone(
        &mut self,
        access: &AccessControl,
        pools: &PoolRegistry,
        caller: &Principal,
        pool_id: PoolId,
        semester: Semester,
        gpa: Gpa,
        verified_at: BlockHeight,
    ) -> Result<Option<MilestoneVerification>, TrustError> {
        access.authorize(caller, Requirement::Oracle)?;
        let pool = pools.active_pool(pool_id)?;
        let expected = pool.next_semester();
        if semester != expected {
            return Err(TrustError::SequenceViolation {
                pool_id,
                expected,
                actual: semester,
            });
        }

        let record = MilestoneVerification {
            gpa,
            verified_by: caller.clone(),
            verified_at,
            released: false,
        };
        let replaced = self.records.insert((pool_id, semester), record);
        if let Some(previous) = &replaced {
            tracing::warn!(
                pool_id = %pool_id,
                semester = %semester,
                previous_gpa = %previous.gpa,
                previous_oracle = %previous.verified_by,
                "pending verification overwritten"
            );
        }
        tracing::info!(
            pool_id = %pool_id,
            semester = %semester,
            gpa = %gpa,
            meets_requirement = gpa.meets(pool.required_gpa),
            oracle = %caller,
            "milestone verified"
        );
        Ok(replaced)
    }

    /// The verification for `(pool_id, semester)`, if any.
    pub fn get(&self, pool_id: PoolId, semester: Semester) -> Option<&MilestoneVerification> {
        self.records.get(&(pool_id, semester))
    }

    pub(crate) fn get_mut(
        &mut self,
        pool_id: PoolId,
        semester: Semester,
    ) -> Option<&mut MilestoneVerification> {
        self.records.get_mut(&(pool_id, semester))
    }

    /// Every verification recorded for `pool_id`, in semester order.
    pub fn for_pool(
        &self,
        pool_id: PoolId,
    ) -> impl Iterator<Item = (Semester, &MilestoneVerification)> {
        self.records
            .range((pool_id, Semester::new(0))..=(pool_id, Semester::new(u32::MAX)))
            .map(|((_, semester), record)| (*semester, record))
    }
}
