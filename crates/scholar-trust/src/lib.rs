#![deny(missing_docs)]

//! # scholar-trust: Milestone-Based Scholarship Escrow
//!
//! Donors escrow funds for a student; trusted oracles certify each
//! semester's GPA; certified semesters release one payout each, in order.
//! A donor may reclaim the undisbursed balance while the pending semester is
//! not releasable.
//!
//! - **Access** ([`access`]): Owner identity and the oracle allow-list,
//!   with a single authorization check per entry point.
//!
//! - **Pools** ([`pool`]): The append-only pool table, creation bounds,
//!   and two-tier (gated vs. informational) visibility.
//!
//! - **Verification** ([`verification`]): Per-(pool, semester) GPA
//!   certifications in strict sequence.
//!
//! - **Disbursement** ([`disbursement`]): Semester release and donor
//!   emergency withdrawal.
//!
//! - **Ledger** ([`ledger`]): The [`TokenLedger`] transfer seam and an
//!   in-memory implementation.
//!
//! - **Contract** ([`contract`]): The [`ScholarTrust`] facade exposing the
//!   entry points and queries, backed by the [`events`] audit log and
//!   [`config`].

pub mod access;
pub mod config;
pub mod contract;
pub mod disbursement;
pub mod error;
pub mod events;
pub mod ledger;
pub mod pool;
pub mod verification;

// Re-export primary types.
pub use access::{AccessControl, Requirement};
pub use config::{ConfigError, ContractInfo, TrustConfig};
pub use contract::ScholarTrust;
pub use disbursement::{DisbursementEngine, Release, Withdrawal};
pub use error::{ParameterError, Role, TrustError, Unmet};
pub use events::{EventId, EventKind, EventLog, TrustEvent};
pub use ledger::{InMemoryLedger, TokenLedger, TransferError};
pub use pool::{PoolParams, PoolRegistry, ScholarshipPool};
pub use verification::{MilestoneVerification, VerificationLedger};
