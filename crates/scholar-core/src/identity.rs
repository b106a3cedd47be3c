//! # Identity Newtypes
//!
//! Domain-primitive newtypes for the identities and identifiers that flow
//! through Scholar Trust. Each is a distinct type: you cannot pass a
//! [`Semester`] where a [`PoolId`] is expected.
//!
//! ## Validation
//!
//! [`Principal`] validates its format at construction (and on
//! deserialization). Numeric identifiers are always valid by construction;
//! range rules such as "semester lies within the pool's schedule" belong to
//! the engine, not to the type.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Maximum length of a principal string, in bytes.
pub const MAX_PRINCIPAL_LEN: usize = 128;

// ---------------------------------------------------------------------------
// Principal
// ---------------------------------------------------------------------------

/// An account identity: a donor, student, oracle, owner, or custody account.
///
/// # Validation
///
/// - Must be non-empty.
/// - Must be at most [`MAX_PRINCIPAL_LEN`] bytes.
/// - Must not contain whitespace or control characters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Principal(String);

impl Principal {
    /// Create a principal from a string, validating format.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] describing the first rule the input
    /// violates.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        Self::validate(&s)?;
        Ok(Self(s))
    }

    fn validate(s: &str) -> Result<(), ValidationError> {
        if s.is_empty() {
            return Err(ValidationError::EmptyPrincipal);
        }
        if s.len() > MAX_PRINCIPAL_LEN {
            return Err(ValidationError::PrincipalTooLong {
                value: s.to_string(),
                len: s.len(),
                max: MAX_PRINCIPAL_LEN,
            });
        }
        if s.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(ValidationError::InvalidPrincipal(s.to_string()));
        }
        Ok(())
    }

    /// Access the principal string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Principal {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Principal> for String {
    fn from(p: Principal) -> Self {
        p.0
    }
}

impl std::str::FromStr for Principal {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Sequential identifiers
// ---------------------------------------------------------------------------

/// Identifier of a scholarship pool.
///
/// Pool ids are allocated sequentially starting at [`PoolId::FIRST`] and are
/// never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoolId(u64);

impl PoolId {
    /// The id assigned to the first pool ever created.
    pub const FIRST: PoolId = PoolId(1);

    /// Wrap a raw pool number.
    pub const fn new(n: u64) -> Self {
        Self(n)
    }

    /// The raw pool number.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The id that follows this one, or `None` at `u64::MAX`.
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl std::fmt::Display for PoolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "pool:{}", self.0)
    }
}

/// A 1-based semester (milestone) number within a pool's schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Semester(u32);

impl Semester {
    /// The first semester of every schedule.
    pub const FIRST: Semester = Semester(1);

    /// Wrap a raw semester number.
    pub const fn new(n: u32) -> Self {
        Self(n)
    }

    /// The raw semester number.
    pub const fn get(self) -> u32 {
        self.0
    }

    /// The semester that follows this one, or `None` at `u32::MAX`.
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl std::fmt::Display for Semester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
