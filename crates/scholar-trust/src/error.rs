//! # Trust Error Types
//!
//! Structured error hierarchy for the scholarship engine. Every variant
//! carries the context an operator needs: the pool, the semester, the caller,
//! and the expected versus actual values.
//!
//! ## Stable Codes
//!
//! Callers that speak the numeric protocol read [`TrustError::code`]. The
//! codes are fixed and shared by several variants where the wire protocol
//! does not distinguish them (sequence violations and blocked withdrawals
//! both surface as `103`).
//!
//! No operation mutates state before it can fail, so an `Err` always means
//! "nothing happened".

use serde::{Deserialize, Serialize};
use thiserror::Error;

use scholar_core::{Gpa, PoolId, Principal, Semester};

use crate::ledger::TransferError;

/// Caller lacks the owner, donor, or oracle role.
pub const ERR_UNAUTHORIZED: u32 = 100;
/// Pool was never created or is no longer active.
pub const ERR_POOL_NOT_FOUND: u32 = 101;
/// The external transfer was refused.
pub const ERR_INSUFFICIENT_FUNDS: u32 = 102;
/// Release, verification-order, or withdrawal precondition failed.
pub const ERR_REQUIREMENT_NOT_MET: u32 = 103;
/// The semester's funds were already disbursed.
pub const ERR_ALREADY_RELEASED: u32 = 104;
/// Pool-creation arguments are out of bounds.
pub const ERR_INVALID_PARAMETERS: u32 = 105;
/// Caller is not an authorized oracle.
pub const ERR_NOT_ORACLE: u32 = 107;

/// The role an operation demanded of its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// The contract owner fixed at deployment.
    Owner,
    /// A member of the oracle allow-list (or the owner).
    Oracle,
    /// The donor who funded the pool.
    Donor,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Owner => "owner",
            Self::Oracle => "oracle",
            Self::Donor => "donor",
        };
        f.write_str(s)
    }
}

/// Why a semester's release condition does not hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unmet {
    /// No oracle has verified the semester.
    NotVerified,
    /// The certified GPA is below the pool's threshold.
    BelowThreshold {
        /// The certified score.
        gpa: Gpa,
        /// The pool's threshold.
        required: Gpa,
    },
}

impl std::fmt::Display for Unmet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotVerified => f.write_str("no verification recorded"),
            Self::BelowThreshold { gpa, required } => {
                write!(f, "GPA {gpa} is below required {required}")
            }
        }
    }
}

/// Which pool-creation bound was violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParameterError {
    /// Required GPA was zero.
    #[error("required GPA must be positive")]
    ZeroRequiredGpa,

    /// Required GPA exceeded the scale maximum.
    #[error("required GPA {got} exceeds maximum {max}")]
    RequiredGpaTooHigh {
        /// The requested threshold.
        got: Gpa,
        /// The inclusive maximum.
        max: Gpa,
    },

    /// Schedule had no semesters.
    #[error("total semesters must be positive")]
    ZeroSemesters,

    /// Per-semester disbursement was zero.
    #[error("amount per semester must be positive")]
    ZeroAmount,

    /// The student is the custody account.
    #[error("student {custody} is the custody account")]
    StudentIsCustody {
        /// The custody account.
        custody: Principal,
    },

    /// The donor is the custody account.
    #[error("donor {custody} is the custody account")]
    DonorIsCustody {
        /// The custody account.
        custody: Principal,
    },
}

/// Errors arising from scholarship trust operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrustError {
    /// Caller does not hold the role the operation requires.
    #[error("{caller} is not authorized as {role}")]
    Unauthorized {
        /// The rejected caller.
        caller: Principal,
        /// The role that was required.
        role: Role,
    },

    /// Pool id was never allocated, or the pool has been closed.
    #[error("{pool_id} not found")]
    PoolNotFound {
        /// The requested pool.
        pool_id: PoolId,
    },

    /// The external transfer capability refused to move funds.
    #[error("transfer failed: {0}")]
    InsufficientFunds(#[from] TransferError),

    /// Release precondition on the semester's verification failed.
    #[error("release requirement not met for {pool_id} semester {semester}: {reason}")]
    RequirementNotMet {
        /// The pool.
        pool_id: PoolId,
        /// The semester whose release was attempted.
        semester: Semester,
        /// Which part of the condition failed.
        reason: Unmet,
    },

    /// Verification submitted for a semester other than the next pending one.
    #[error("{pool_id} expects verification of semester {expected}, got {actual}")]
    SequenceViolation {
        /// The pool.
        pool_id: PoolId,
        /// The next pending semester.
        expected: Semester,
        /// The semester submitted.
        actual: Semester,
    },

    /// Withdrawal blocked: the pending semester is verified at or above threshold.
    #[error(
        "{pool_id} semester {semester} is releasable (GPA {gpa} meets {required}); withdrawal blocked"
    )]
    RequirementMet {
        /// The pool.
        pool_id: PoolId,
        /// The pending semester.
        semester: Semester,
        /// The certified score.
        gpa: Gpa,
        /// The pool's threshold.
        required: Gpa,
    },

    /// Funds for the semester were already disbursed.
    #[error("{pool_id} semester {semester} already released")]
    AlreadyReleased {
        /// The pool.
        pool_id: PoolId,
        /// The semester.
        semester: Semester,
    },

    /// Pool-creation arguments violate bounds.
    #[error("invalid pool parameters: {0}")]
    InvalidParameters(#[from] ParameterError),

    /// An amount or identifier computation would overflow.
    #[error("arithmetic overflow computing {operation}")]
    Overflow {
        /// What was being computed.
        operation: &'static str,
    },
}

impl TrustError {
    /// The stable numeric code for this error.
    pub fn code(&self) -> u32 {
        match self {
            Self::Unauthorized {
                role: Role::Oracle, ..
            } => ERR_NOT_ORACLE,
            Self::Unauthorized { .. } => ERR_UNAUTHORIZED,
            Self::PoolNotFound { .. } => ERR_POOL_NOT_FOUND,
            Self::InsufficientFunds(_) => ERR_INSUFFICIENT_FUNDS,
            Self::RequirementNotMet { .. }
            | Self::SequenceViolation { .. }
            | Self::RequirementMet { .. } => ERR_REQUIREMENT_NOT_MET,
            Self::AlreadyReleased { .. } => ERR_ALREADY_RELEASED,
            Self::InvalidParameters(_) | Self::Overflow { .. } => ERR_INVALID_PARAMETERS,
        }
    }
}
