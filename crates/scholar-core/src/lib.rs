#![deny(missing_docs)]

//! # scholar-core: Foundational Types for Scholar Trust
//!
//! This crate defines the domain primitives every other crate in the
//! workspace builds on. It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `Principal`, `PoolId`,
//!    `Semester`, `Gpa`, `Amount`, `BlockHeight` are distinct types. A pool
//!    id cannot be passed where a semester number is expected.
//!
//! 2. **Validated identities.** [`Principal`] rejects empty, oversized, or
//!    whitespace-bearing strings at construction.
//!
//! 3. **Checked arithmetic only.** [`Amount`] exposes `checked_*` operations
//!    and no operator overloads, so an overflowing escrow total is an error
//!    value, never a wrapped balance.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `scholar-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod temporal;
pub mod units;

pub use error::ValidationError;
pub use identity::{PoolId, Principal, Semester};
pub use temporal::{BlockHeight, Timestamp};
pub use units::{Amount, Gpa, MAX_REQUIRED_GPA};
