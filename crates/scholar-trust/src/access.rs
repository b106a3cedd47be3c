//! # Access Control
//!
//! Owns the contract-owner identity and the oracle allow-list, and answers
//! every authorization question the engine asks.
//!
//! Authorization is centralized in [`AccessControl::authorize`]: each
//! state-changing entry point states its [`Requirement`] up front and gets a
//! typed [`TrustError::Unauthorized`] back before anything is mutated.
//!
//! ## Owner and Oracles
//!
//! The owner is fixed at deployment and is seeded into the allow-list. The
//! owner can later remove itself from the list, but [`AccessControl::is_oracle`]
//! still answers `true` for the owner: the owner role is not revocable.

use std::collections::BTreeSet;

use scholar_core::Principal;

use crate::error::{Role, TrustError};

/// The role an operation demands of its caller.
#[derive(Debug, Clone, Copy)]
pub enum Requirement<'a> {
    /// Caller must be the contract owner.
    Owner,
    /// Caller must be an oracle (or the owner).
    Oracle,
    /// Caller must be this specific donor.
    Donor(&'a Principal),
}

impl Requirement<'_> {
    fn role(&self) -> Role {
        match self {
            Self::Owner => Role::Owner,
            Self::Oracle => Role::Oracle,
            Self::Donor(_) => Role::Donor,
        }
    }
}

/// Owner identity plus the mutable oracle allow-list.
#[derive(Debug, Clone)]
pub struct AccessControl {
    owner: Principal,
    oracles: BTreeSet<Principal>,
}

impl AccessControl {
    /// Create the access policy for a freshly deployed contract.
    pub fn new(owner: Principal) -> Self {
        let mut oracles = BTreeSet::new();
        oracles.insert(owner.clone());
        Self { owner, oracles }
    }

    /// The contract owner.
    pub fn owner(&self) -> &Principal {
        &self.owner
    }

    /// Whether `identity` may submit milestone verifications.
    pub fn is_oracle(&self, identity: &Principal) -> bool {
        *identity == self.owner || self.oracles.contains(identity)
    }

    /// Members of the allow-list, in order.
    pub fn oracles(&self) -> impl Iterator<Item = &Principal> {
        self.oracles.iter()
    }

    /// Check that `caller` satisfies `requirement`.
    ///
    /// # Errors
    ///
    /// Returns [`TrustError::Unauthorized`] naming the caller and the
    /// missing role.
    pub fn authorize(
        &self,
        caller: &Principal,
        requirement: Requirement<'_>,
    ) -> Result<(), TrustError> {
        let allowed = match requirement {
            Requirement::Owner => *caller == self.owner,
            Requirement::Oracle => self.is_oracle(caller),
            Requirement::Donor(donor) => caller == donor,
        };
        if allowed {
            Ok(())
        } else {
            Err(TrustError::Unauthorized {
                caller: caller.clone(),
                role: requirement.role(),
            })
        }
    }

    /// Add `identity` to the allow-list. Idempotent.
    ///
    /// Returns whether the list changed.
    ///
    /// # Errors
    ///
    /// Returns [`TrustError::Unauthorized`] unless `caller` is the owner.
    pub fn add_oracle(
        &mut self,
        caller: &Principal,
        identity: Principal,
    ) -> Result<bool, TrustError> {
        self.authorize(caller, Requirement::Owner)?;
        Ok(self.oracles.insert(identity))
    }

    /// Remove `identity` from the allow-list. A no-op if absent.
    ///
    /// Returns whether the list changed.
    ///
    /// # Errors
    ///
    /// Returns [`TrustError::Unauthorized`] unless `caller` is the owner.
    pub fn remove_oracle(
        &mut self,
        caller: &Principal,
        identity: &Principal,
    ) -> Result<bool, TrustError> {
        self.authorize(caller, Requirement::Owner)?;
        Ok(self.oracles.remove(identity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(s: &str) -> Principal {
        Principal::new(s).unwrap()
    }

    fn deployed() -> AccessControl {
        AccessControl::new(principal("deployer"))
    }

    #[test]
    fn owner_is_oracle_at_deploy() {
        let acl = deployed();
        assert!(acl.is_oracle(&principal("deployer")));
        assert_eq!(acl.oracles().count(), 1);
    }

    #[test]
    fn stranger_is_not_oracle() {
        assert!(!deployed().is_oracle(&principal("wallet_4")));
    }

    #[test]
    fn owner_adds_and_removes_oracle() {
        let mut acl = deployed();
        let owner = principal("deployer");
        let oracle = principal("wallet_3");

        assert!(acl.add_oracle(&owner, oracle.clone()).unwrap());
        assert!(acl.is_oracle(&oracle));

        assert!(acl.remove_oracle(&owner, &oracle).unwrap());
        assert!(!acl.is_oracle(&oracle));
    }

    #[test]
    fn add_and_remove_are_idempotent() {
        let mut acl = deployed();
        let owner = principal("deployer");
        let oracle = principal("wallet_3");

        assert!(acl.add_oracle(&owner, oracle.clone()).unwrap());
        assert!(!acl.add_oracle(&owner, oracle.clone()).unwrap());
        assert!(acl.is_oracle(&oracle));

        assert!(acl.remove_oracle(&owner, &oracle).unwrap());
        assert!(!acl.remove_oracle(&owner, &oracle).unwrap());
    }

    #[test]
    fn non_owner_cannot_manage_oracles() {
        let mut acl = deployed();
        let intruder = principal("wallet_4");
        let oracle = principal("wallet_3");

        let err = acl.add_oracle(&intruder, oracle.clone()).unwrap_err();
        assert_eq!(
            err,
            TrustError::Unauthorized {
                caller: intruder.clone(),
                role: Role::Owner
            }
        );
        assert_eq!(err.code(), 100);
        assert!(!acl.is_oracle(&oracle));

        assert_eq!(
            acl.remove_oracle(&intruder, &oracle).unwrap_err().code(),
            100
        );
    }

    #[test]
    fn oracle_cannot_manage_oracles() {
        let mut acl = deployed();
        let owner = principal("deployer");
        let oracle = principal("wallet_3");
        acl.add_oracle(&owner, oracle.clone()).unwrap();

        assert!(acl.add_oracle(&oracle, principal("wallet_5")).is_err());
        assert!(acl.remove_oracle(&oracle, &owner).is_err());
    }

    #[test]
    fn owner_remains_oracle_after_self_removal() {
        let mut acl = deployed();
        let owner = principal("deployer");
        assert!(acl.remove_oracle(&owner, &owner).unwrap());
        assert_eq!(acl.oracles().count(), 0);
        assert!(acl.is_oracle(&owner));
        assert!(acl.authorize(&owner, Requirement::Owner).is_ok());
    }

    #[test]
    fn authorize_oracle_reports_oracle_role() {
        let acl = deployed();
        let err = acl
            .authorize(&principal("wallet_4"), Requirement::Oracle)
            .unwrap_err();
        assert_eq!(err.code(), 107);
    }

    #[test]
    fn authorize_donor_matches_identity() {
        let acl = deployed();
        let donor = principal("wallet_1");
        assert!(acl.authorize(&donor, Requirement::Donor(&donor)).is_ok());
        let err = acl
            .authorize(&principal("deployer"), Requirement::Donor(&donor))
            .unwrap_err();
        assert!(matches!(
            err,
            TrustError::Unauthorized {
                role: Role::Donor,
                ..
            }
        ));
    }
}
