//! # Contract Facade
//!
//! [`ScholarTrust`] wires [`AccessControl`], [`PoolRegistry`],
//! [`VerificationLedger`] and the [`DisbursementEngine`] to a [`TokenLedger`]
//! and exposes the public entry points and read-only queries.
//!
//! Each entry point takes its caller explicitly. A call either applies in
//! full, appending one [`TrustEvent`](crate::TrustEvent) to the audit log, or
//! fails with a [`TrustError`] and leaves every table as it was.

use scholar_core::{Amount, BlockHeight, Gpa, PoolId, Principal, Semester};

use crate::access::AccessControl;
use crate::config::{ConfigError, ContractInfo, TrustConfig};
use crate::disbursement::DisbursementEngine;
use crate::error::TrustError;
use crate::events::{EventKind, EventLog};
use crate::ledger::{InMemoryLedger, TokenLedger};
use crate::pool::{PoolParams, PoolRegistry, ScholarshipPool};
use crate::verification::{MilestoneVerification, VerificationLedger};

/// A deployed scholarship trust.
#[derive(Debug)]
pub struct ScholarTrust<L: TokenLedger = InMemoryLedger> {
    info: ContractInfo,
    custody: Principal,
    height: BlockHeight,
    access: AccessControl,
    pools: PoolRegistry,
    verifications: VerificationLedger,
    ledger: L,
    events: EventLog,
}

fn rejected(operation: &'static str) -> impl Fn(TrustError) -> TrustError {
    move |err: TrustError| {
        tracing::debug!(operation, code = err.code(), error = %err, "call rejected");
        err
    }
}

impl<L: TokenLedger> ScholarTrust<L> {
    /// Deploy a trust owned by `owner`, moving value through `ledger`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configured custody account is invalid
    /// or names the owner.
    pub fn deploy(owner: Principal, config: TrustConfig, ledger: L) -> Result<Self, ConfigError> {
        let custody = config.custody_for(&owner)?;
        tracing::info!(
            owner = %owner,
            custody = %custody,
            height = %config.genesis_height,
            "scholar trust deployed"
        );
        Ok(Self {
            info: config.metadata,
            custody,
            height: config.genesis_height,
            access: AccessControl::new(owner),
            pools: PoolRegistry::new(),
            verifications: VerificationLedger::new(),
            ledger,
            events: EventLog::new(),
        })
    }

    // ── Entry points ──────────────────────────────────────────────────

    /// Add `oracle` to the allow-list. Owner only.
    pub fn add_oracle(&mut self, caller: &Principal, oracle: Principal) -> Result<bool, TrustError> {
        let changed = self
            .access
            .add_oracle(caller, oracle.clone())
            .map_err(rejected("add_oracle"))?;
        tracing::info!(oracle = %oracle, changed, "oracle added");
        self.events.record(self.height, EventKind::OracleAdded { oracle });
        Ok(true)
    }

    /// Remove `oracle` from the allow-list. Owner only.
    pub fn remove_oracle(
        &mut self,
        caller: &Principal,
        oracle: &Principal,
    ) -> Result<bool, TrustError> {
        let changed = self
            .access
            .remove_oracle(caller, oracle)
            .map_err(rejected("remove_oracle"))?;
        tracing::info!(oracle = %oracle, changed, "oracle removed");
        self.events.record(
            self.height,
            EventKind::OracleRemoved {
                oracle: oracle.clone(),
            },
        );
        Ok(true)
    }

    /// Create a pool funded by `caller`, escrowing
    /// `total_semesters * amount_per_semester` into custody.
    pub fn create_pool(
        &mut self,
        caller: &Principal,
        student: Principal,
        required_gpa: Gpa,
        total_semesters: u32,
        amount_per_semester: Amount,
    ) -> Result<PoolId, TrustError> {
        let params = PoolParams {
            student,
            required_gpa,
            total_semesters,
            amount_per_semester,
        };
        let pool_id = self
            .pools
            .create_pool(
                &mut self.ledger,
                &self.custody,
                caller.clone(),
                params,
                self.height,
            )
            .map_err(rejected("create_pool"))?;

        if let Some(pool) = self.pools.get_pool(pool_id) {
            self.events.record(
                self.height,
                EventKind::PoolCreated {
                    pool_id,
                    donor: pool.donor.clone(),
                    student: pool.student.clone(),
                    total_amount: pool.total_amount,
                },
            );
        }
        Ok(pool_id)
    }

    /// Certify `gpa` for the pool's pending semester. Oracles only.
    pub fn verify_milestone(
        &mut self,
        caller: &Principal,
        pool_id: PoolId,
        semester: Semester,
        gpa: Gpa,
    ) -> Result<bool, TrustError> {
        self.verifications
            .verify_milestone(
                &self.access,
                &self.pools,
                caller,
                pool_id,
                semester,
                gpa,
                self.height,
            )
            .map_err(rejected("verify_milestone"))?;
        self.events.record(
            self.height,
            EventKind::MilestoneVerified {
                pool_id,
                semester,
                gpa,
                oracle: caller.clone(),
            },
        );
        Ok(true)
    }

    /// Release one verified semester to the student. Any caller.
    pub fn release_semester_funds(
        &mut self,
        caller: &Principal,
        pool_id: PoolId,
        semester: Semester,
    ) -> Result<Amount, TrustError> {
        let release = self
            .engine()
            .release_semester_funds(pool_id, semester)
            .map_err(rejected("release_semester_funds"))?;
        tracing::debug!(caller = %caller, pool_id = %pool_id, "release triggered");
        self.events.record(
            self.height,
            EventKind::FundsReleased {
                pool_id,
                semester,
                student: release.student,
                amount: release.amount,
            },
        );
        Ok(release.amount)
    }

    /// Return the pool's remaining balance to its donor and close it.
    pub fn emergency_withdrawal(
        &mut self,
        caller: &Principal,
        pool_id: PoolId,
    ) -> Result<Amount, TrustError> {
        let withdrawal = self
            .engine()
            .emergency_withdrawal(caller, pool_id)
            .map_err(rejected("emergency_withdrawal"))?;
        self.events.record(
            self.height,
            EventKind::EmergencyWithdrawal {
                pool_id,
                donor: withdrawal.donor,
                amount: withdrawal.amount,
            },
        );
        Ok(withdrawal.amount)
    }

    fn engine(&mut self) -> DisbursementEngine<'_, L> {
        DisbursementEngine::new(
            &self.access,
            &mut self.pools,
            &mut self.verifications,
            &mut self.ledger,
            &self.custody,
        )
    }

    // ── Queries ───────────────────────────────────────────────────────

    /// Whether `identity` may verify milestones. Always true for the owner.
    pub fn is_oracle(&self, identity: &Principal) -> bool {
        self.access.is_oracle(identity)
    }

    /// Number of pools ever created.
    pub fn get_pool_counter(&self) -> u64 {
        self.pools.counter()
    }

    /// Any pool ever created, active or closed.
    pub fn get_pool_info(&self, pool_id: PoolId) -> Option<&ScholarshipPool> {
        self.pools.get_pool(pool_id)
    }

    /// The verification recorded for `(pool_id, semester)`, if any.
    pub fn get_milestone_verification(
        &self,
        pool_id: PoolId,
        semester: Semester,
    ) -> Option<&MilestoneVerification> {
        self.verifications.get(pool_id, semester)
    }

    /// Static contract metadata.
    pub fn get_contract_info(&self) -> &ContractInfo {
        &self.info
    }

    // ── Host environment ──────────────────────────────────────────────

    /// The contract owner fixed at deployment.
    pub fn owner(&self) -> &Principal {
        self.access.owner()
    }

    /// The account holding escrowed funds.
    pub fn custody(&self) -> &Principal {
        &self.custody
    }

    /// Current chain height.
    pub fn block_height(&self) -> BlockHeight {
        self.height
    }

    /// Move the chain clock forward.
    pub fn advance_blocks(&mut self, blocks: u64) -> BlockHeight {
        self.height = self.height.advance(blocks);
        self.height
    }

    /// The transfer seam.
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Mutable access to the transfer seam, e.g. for funding accounts.
    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    /// The audit log.
    pub fn events(&self) -> &EventLog {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(s: &str) -> Principal {
        Principal::new(s).unwrap()
    }

    fn deployed() -> ScholarTrust {
        let mut ledger = InMemoryLedger::new();
        ledger
            .mint(&principal("donor"), Amount::new(1_000_000))
            .unwrap();
        ScholarTrust::deploy(principal("deployer"), TrustConfig::default(), ledger).unwrap()
    }

    fn create(trust: &mut ScholarTrust) -> Result<PoolId, TrustError> {
        trust.create_pool(
            &principal("donor"),
            principal("student"),
            Gpa::new(350),
            4,
            Amount::new(1_000),
        )
    }

    #[test]
    fn deploy_exposes_metadata_and_owner() {
        let trust = deployed();
        assert_eq!(trust.owner(), &principal("deployer"));
        assert!(trust.is_oracle(&principal("deployer")));
        assert_eq!(trust.get_pool_counter(), 0);
        assert_eq!(trust.get_contract_info().name, "Scholar Trust");
        assert_eq!(trust.custody().as_str(), "scholar-trust.custody");
        assert!(trust.events().is_empty());
    }

    #[test]
    fn deploy_rejects_owner_as_custody() {
        let config = TrustConfig {
            custody: "deployer".to_string(),
            ..TrustConfig::default()
        };
        let result = ScholarTrust::deploy(principal("deployer"), config, InMemoryLedger::new());
        assert!(matches!(result, Err(ConfigError::CustodyIsOwner { .. })));
    }

    #[test]
    fn genesis_height_stamps_pools() {
        let config = TrustConfig {
            genesis_height: BlockHeight::new(100),
            ..TrustConfig::default()
        };
        let mut ledger = InMemoryLedger::new();
        ledger.mint(&principal("donor"), Amount::new(10_000)).unwrap();
        let mut trust = ScholarTrust::deploy(principal("deployer"), config, ledger).unwrap();
        trust.advance_blocks(5);
        let id = create(&mut trust).unwrap();
        assert_eq!(
            trust.get_pool_info(id).unwrap().created_at,
            BlockHeight::new(105)
        );
    }

    #[test]
    fn oracle_management_returns_true_and_logs() {
        let mut trust = deployed();
        let owner = principal("deployer");
        assert_eq!(trust.add_oracle(&owner, principal("wallet_3")), Ok(true));
        assert_eq!(trust.add_oracle(&owner, principal("wallet_3")), Ok(true));
        assert_eq!(trust.remove_oracle(&owner, &principal("wallet_3")), Ok(true));
        assert!(!trust.is_oracle(&principal("wallet_3")));
        assert_eq!(trust.events().len(), 3);
    }

    #[test]
    fn failed_calls_append_no_events() {
        let mut trust = deployed();
        assert!(trust
            .add_oracle(&principal("wallet_4"), principal("wallet_3"))
            .is_err());
        assert!(trust
            .create_pool(
                &principal("donor"),
                principal("student"),
                Gpa::new(0),
                4,
                Amount::new(1_000)
            )
            .is_err());
        assert!(trust
            .verify_milestone(&principal("deployer"), PoolId::FIRST, Semester::FIRST, Gpa::new(370))
            .is_err());
        assert!(trust.events().is_empty());
        assert_eq!(trust.get_pool_counter(), 0);
    }

    #[test]
    fn full_flow_records_events_per_pool() {
        let mut trust = deployed();
        let id = create(&mut trust).unwrap();
        assert_eq!(trust.ledger().balance_of(trust.custody()), Amount::new(4_000));

        trust.advance_blocks(1);
        assert_eq!(
            trust.verify_milestone(&principal("deployer"), id, Semester::FIRST, Gpa::new(370)),
            Ok(true)
        );
        let verification = trust.get_milestone_verification(id, Semester::FIRST).unwrap();
        assert_eq!(verification.verified_at, BlockHeight::new(1));

        let released = trust
            .release_semester_funds(&principal("anyone"), id, Semester::FIRST)
            .unwrap();
        assert_eq!(released, Amount::new(1_000));
        assert_eq!(
            trust.ledger().balance_of(&principal("student")),
            Amount::new(1_000)
        );

        let kinds: Vec<_> = trust
            .events()
            .for_pool(id)
            .map(|e| match e.kind {
                EventKind::PoolCreated { .. } => "created",
                EventKind::MilestoneVerified { .. } => "verified",
                EventKind::FundsReleased { .. } => "released",
                _ => "other",
            })
            .collect();
        assert_eq!(kinds, vec!["created", "verified", "released"]);
    }

    #[test]
    fn withdrawal_returns_amount_and_closes() {
        let mut trust = deployed();
        let id = create(&mut trust).unwrap();
        let amount = trust.emergency_withdrawal(&principal("donor"), id).unwrap();
        assert_eq!(amount, Amount::new(4_000));
        assert!(!trust.get_pool_info(id).unwrap().active);
        assert_eq!(
            trust.ledger().balance_of(&principal("donor")),
            Amount::new(1_000_000)
        );
        assert!(matches!(
            trust.events().last().unwrap().kind,
            EventKind::EmergencyWithdrawal { .. }
        ));
    }

    #[test]
    fn ledger_mut_funds_new_donors() {
        let mut trust = deployed();
        let late = principal("late_donor");
        trust.ledger_mut().mint(&late, Amount::new(500)).unwrap();
        let err = trust
            .create_pool(&late, principal("student"), Gpa::new(300), 1, Amount::new(501))
            .unwrap_err();
        assert_eq!(err.code(), 102);
        assert!(trust
            .create_pool(&late, principal("student"), Gpa::new(300), 1, Amount::new(500))
            .is_ok());
    }
}
