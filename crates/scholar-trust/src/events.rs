//! # Audit Event Log
//!
//! Append-only record of every successful state change. Failed calls leave
//! no entry.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use scholar_core::{Amount, BlockHeight, Gpa, PoolId, Principal, Semester, Timestamp};

/// Unique identifier for an audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    /// Create a new random event identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "event:{}", self.0)
    }
}

/// What happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// An identity joined the oracle allow-list.
    OracleAdded {
        /// The added oracle.
        oracle: Principal,
    },
    /// An identity left the oracle allow-list.
    OracleRemoved {
        /// The removed oracle.
        oracle: Principal,
    },
    /// A donor escrowed a new pool.
    PoolCreated {
        /// The new pool.
        pool_id: PoolId,
        /// Funding party.
        donor: Principal,
        /// Beneficiary.
        student: Principal,
        /// Amount moved into custody.
        total_amount: Amount,
    },
    /// An oracle certified a semester's GPA.
    MilestoneVerified {
        /// The pool.
        pool_id: PoolId,
        /// The certified semester.
        semester: Semester,
        /// The certified score.
        gpa: Gpa,
        /// The certifying oracle.
        oracle: Principal,
    },
    /// A semester's funds moved to the student.
    FundsReleased {
        /// The pool.
        pool_id: PoolId,
        /// The released semester.
        semester: Semester,
        /// Recipient.
        student: Principal,
        /// Amount released.
        amount: Amount,
    },
    /// The donor reclaimed the pool's remaining balance.
    EmergencyWithdrawal {
        /// The closed pool.
        pool_id: PoolId,
        /// Recipient.
        donor: Principal,
        /// Amount returned.
        amount: Amount,
    },
}

impl EventKind {
    /// The pool the event concerns, if any.
    pub fn pool_id(&self) -> Option<PoolId> {
        match self {
            Self::OracleAdded { .. } | Self::OracleRemoved { .. } => None,
            Self::PoolCreated { pool_id, .. }
            | Self::MilestoneVerified { pool_id, .. }
            | Self::FundsReleased { pool_id, .. }
            | Self::EmergencyWithdrawal { pool_id, .. } => Some(*pool_id),
        }
    }
}

/// One entry in the audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustEvent {
    /// Unique entry id.
    pub id: EventId,
    /// Chain height at which the change applied.
    pub block_height: BlockHeight,
    /// Wall-clock time the entry was written.
    pub recorded_at: Timestamp,
    /// What changed.
    pub kind: EventKind,
}

/// The append-only audit log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<TrustEvent>,
}

impl EventLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event stamped with `block_height` and the current time.
    pub fn record(&mut self, block_height: BlockHeight, kind: EventKind) -> EventId {
        let id = EventId::new();
        self.events.push(TrustEvent {
            id,
            block_height,
            recorded_at: Timestamp::now(),
            kind,
        });
        id
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// All events in append order.
    pub fn iter(&self) -> impl Iterator<Item = &TrustEvent> {
        self.events.iter()
    }

    /// Events touching `pool_id`, in append order.
    pub fn for_pool(&self, pool_id: PoolId) -> impl Iterator<Item = &TrustEvent> {
        self.events
            .iter()
            .filter(move |e| e.kind.pool_id() == Some(pool_id))
    }

    /// The most recent event.
    pub fn last(&self) -> Option<&TrustEvent> {
        self.events.last()
    }
}
