//! # Pool Registry
//!
//! Owns the counter-indexed table of [`ScholarshipPool`] records.
//!
//! ## Visibility
//!
//! A pool is never deleted. Closing a pool clears its `active` flag, and from
//! then on the registry has two answers for the same id:
//!
//! - [`PoolRegistry::get_pool`] (informational) returns the record whether
//!   active or not.
//! - [`PoolRegistry::active_pool`] (gated) treats an inactive pool exactly as
//!   an id that was never allocated: [`TrustError::PoolNotFound`].
//!
//! ## Creation Atomicity
//!
//! [`PoolRegistry::create_pool`] validates parameters, computes the escrow
//! total, and allocates the next id before moving the donor's funds. Only
//! after the transfer succeeds is the record inserted and the counter bumped,
//! so a refused transfer consumes no id.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use scholar_core::{Amount, BlockHeight, Gpa, PoolId, Principal, Semester, MAX_REQUIRED_GPA};

use crate::error::{ParameterError, TrustError};
use crate::ledger::TokenLedger;

/// Caller-supplied parameters for a new pool. The donor is the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolParams {
    /// Beneficiary of every release.
    pub student: Principal,
    /// Threshold each semester's GPA must meet, in `1..=400`.
    pub required_gpa: Gpa,
    /// Number of milestones.
    pub total_semesters: u32,
    /// Disbursement per released milestone.
    pub amount_per_semester: Amount,
}

impl PoolParams {
    /// Check the creation bounds.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParameterError`] encountered.
    pub fn validate(&self) -> Result<(), ParameterError> {
        if self.required_gpa.get() == 0 {
            return Err(ParameterError::ZeroRequiredGpa);
        }
        if self.required_gpa > MAX_REQUIRED_GPA {
            return Err(ParameterError::RequiredGpaTooHigh {
                got: self.required_gpa,
                max: MAX_REQUIRED_GPA,
            });
        }
        if self.total_semesters == 0 {
            return Err(ParameterError::ZeroSemesters);
        }
        if self.amount_per_semester.is_zero() {
            return Err(ParameterError::ZeroAmount);
        }
        Ok(())
    }
}

/// An escrow tying one donor, one student, a GPA threshold, and a schedule of
/// equal per-semester payouts.
///
/// While released only through [`crate::DisbursementEngine`],
/// `remaining_amount == total_amount - semesters_released * amount_per_semester`.
/// An emergency withdrawal zeroes `remaining_amount` and closes the pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScholarshipPool {
    /// Sequential pool id.
    pub id: PoolId,
    /// Funding party.
    pub donor: Principal,
    /// Beneficiary.
    pub student: Principal,
    /// Per-semester GPA threshold.
    pub required_gpa: Gpa,
    /// Number of milestones.
    pub total_semesters: u32,
    /// Disbursement per milestone.
    pub amount_per_semester: Amount,
    /// `total_semesters * amount_per_semester`.
    pub total_amount: Amount,
    /// Funds still held in custody for this pool.
    pub remaining_amount: Amount,
    /// Milestones paid out so far.
    pub semesters_released: u32,
    /// Block at which the pool was created.
    pub created_at: BlockHeight,
    /// Cleared when fully released or drained by the donor.
    pub active: bool,
}

impl ScholarshipPool {
    /// The semester awaiting verification and release.
    pub fn next_semester(&self) -> Semester {
        Semester::new(self.semesters_released.saturating_add(1))
    }

    /// Whether every semester has been released.
    pub fn is_fully_released(&self) -> bool {
        self.semesters_released >= self.total_semesters
    }

    /// Apply one successful release. Deactivates after the final semester.
    pub(crate) fn record_release(&mut self, remaining: Amount) {
        self.semesters_released += 1;
        self.remaining_amount = remaining;
        if self.is_fully_released() {
            self.active = false;
        }
    }

    /// Apply an emergency withdrawal.
    pub(crate) fn drain(&mut self) {
        self.remaining_amount = Amount::ZERO;
        self.active = false;
    }
}

/// The append-only pool table plus its monotonic id counter.
#[derive(Debug, Clone, Default)]
pub struct PoolRegistry {
    pools: BTreeMap<PoolId, ScholarshipPool>,
    counter: u64,
}

impl PoolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of pools ever created.
    pub fn counter(&self) -> u64 {
        self.counter
    }

    /// Informational lookup: any pool ever created, active or not.
    pub fn get_pool(&self, pool_id: PoolId) -> Option<&ScholarshipPool> {
        self.pools.get(&pool_id)
    }

    /// Gated lookup: only active pools.
    ///
    /// # Errors
    ///
    /// Returns [`TrustError::PoolNotFound`] for unknown and inactive ids alike.
    pub fn active_pool(&self, pool_id: PoolId) -> Result<&ScholarshipPool, TrustError> {
        self.pools
            .get(&pool_id)
            .filter(|p| p.active)
            .ok_or(TrustError::PoolNotFound { pool_id })
    }

    pub(crate) fn active_pool_mut(
        &mut self,
        pool_id: PoolId,
    ) -> Result<&mut ScholarshipPool, TrustError> {
        self.pools
            .get_mut(&pool_id)
            .filter(|p| p.active)
            .ok_or(TrustError::PoolNotFound { pool_id })
    }

    /// All pools in id order.
    pub fn iter(&self) -> impl Iterator<Item = &ScholarshipPool> {
        self.pools.values()
    }

    /// Create a pool funded by `donor`, escrowing the full total into `custody`.
    ///
    /// # Errors
    ///
    /// - [`TrustError::InvalidParameters`] if `params` violate bounds, or the
    ///   student or donor is the custody account.
    /// - [`TrustError::Overflow`] if the total or the next id does not fit.
    /// - [`TrustError::InsufficientFunds`] if the ledger refuses the transfer.
    ///
    /// On any error the registry is unchanged.
    pub fn create_pool<L: TokenLedger>(
        &mut self,
        ledger: &mut L,
        custody: &Principal,
        donor: Principal,
        params: PoolParams,
        created_at: BlockHeight,
    ) -> Result<PoolId, TrustError> {
        params.validate()?;
        if params.student == *custody {
            return Err(ParameterError::StudentIsCustody {
                custody: custody.clone(),
            }
            .into());
        }
        if donor == *custody {
            return Err(ParameterError::DonorIsCustody {
                custody: custody.clone(),
            }
            .into());
        }
        let total_amount = params
            .amount_per_semester
            .checked_mul(params.total_semesters)
            .ok_or(TrustError::Overflow {
                operation: "pool total amount",
            })?;
        let pool_id = PoolId::new(self.counter)
            .next()
            .ok_or(TrustError::Overflow {
                operation: "pool id",
            })?;

        ledger.transfer(&donor, custody, total_amount)?;

        let pool = ScholarshipPool {
            id: pool_id,
            donor,
            student: params.student,
            required_gpa: params.required_gpa,
            total_semesters: params.total_semesters,
            amount_per_semester: params.amount_per_semester,
            total_amount,
            remaining_amount: total_amount,
            semesters_released: 0,
            created_at,
            active: true,
        };
        tracing::info!(
            pool_id = %pool_id,
            donor = %pool.donor,
            student = %pool.student,
            required_gpa = %pool.required_gpa,
            total_semesters = pool.total_semesters,
            total_amount = %total_amount,
            "scholarship pool created"
        );
        self.pools.insert(pool_id, pool);
        self.counter = pool_id.get();
        Ok(pool_id)
    }
}
