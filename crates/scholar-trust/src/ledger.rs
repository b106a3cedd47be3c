//! # Token Ledger Seam
//!
//! The engine never moves value itself. It calls a [`TokenLedger`], an
//! atomic `transfer(from, to, amount)` capability supplied by the host, and
//! treats a refusal as a failure of the whole operation.
//!
//! [`InMemoryLedger`] is the reference implementation: a balance map that
//! validates every transfer before touching either balance, so a refused
//! transfer leaves both accounts exactly as they were.

use std::collections::BTreeMap;

use thiserror::Error;

use scholar_core::{Amount, Principal};

/// Reasons the ledger refuses a transfer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    /// Sender balance is below the requested amount.
    #[error("{account} holds {available}, cannot transfer {requested}")]
    InsufficientBalance {
        /// The sending account.
        account: Principal,
        /// The amount requested.
        requested: Amount,
        /// The sender's balance.
        available: Amount,
    },

    /// Zero-value transfers are rejected.
    #[error("transfer amount must be positive")]
    NonPositiveAmount,

    /// Sender and recipient are the same account.
    #[error("{account} cannot transfer to itself")]
    SelfTransfer {
        /// The account.
        account: Principal,
    },

    /// Crediting the recipient would overflow its balance.
    #[error("balance of {account} would overflow")]
    BalanceOverflow {
        /// The recipient account.
        account: Principal,
    },
}

/// An atomic value-transfer capability.
pub trait TokenLedger {
    /// Move `amount` from `from` to `to`, all or nothing.
    ///
    /// # Errors
    ///
    /// Returns a [`TransferError`] if the transfer cannot be applied; in that
    /// case no balance changes.
    fn transfer(
        &mut self,
        from: &Principal,
        to: &Principal,
        amount: Amount,
    ) -> Result<(), TransferError>;

    /// Current balance of `account` (zero if unknown).
    fn balance_of(&self, account: &Principal) -> Amount;
}

impl<L: TokenLedger + ?Sized> TokenLedger for &mut L {
    fn transfer(
        &mut self,
        from: &Principal,
        to: &Principal,
        amount: Amount,
    ) -> Result<(), TransferError> {
        (**self).transfer(from, to, amount)
    }

    fn balance_of(&self, account: &Principal) -> Amount {
        (**self).balance_of(account)
    }
}

/// A balance map implementing [`TokenLedger`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    balances: BTreeMap<Principal, Amount>,
}

impl InMemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` to `account` out of thin air.
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::BalanceOverflow`] if the balance would overflow.
    pub fn mint(&mut self, account: &Principal, amount: Amount) -> Result<(), TransferError> {
        let current = self.balance_of(account);
        let updated = current
            .checked_add(amount)
            .ok_or_else(|| TransferError::BalanceOverflow {
                account: account.clone(),
            })?;
        self.balances.insert(account.clone(), updated);
        Ok(())
    }

    /// Sum of all balances.
    pub fn total_supply(&self) -> Option<Amount> {
        self.balances
            .values()
            .try_fold(Amount::ZERO, |acc, b| acc.checked_add(*b))
    }
}

impl TokenLedger for InMemoryLedger {
    fn transfer(
        &mut self,
        from: &Principal,
        to: &Principal,
        amount: Amount,
    ) -> Result<(), TransferError> {
        if amount.is_zero() {
            return Err(TransferError::NonPositiveAmount);
        }
        if from == to {
            return Err(TransferError::SelfTransfer {
                account: from.clone(),
            });
        }
        let available = self.balance_of(from);
        let debited = available
            .checked_sub(amount)
            .ok_or_else(|| TransferError::InsufficientBalance {
                account: from.clone(),
                requested: amount,
                available,
            })?;
        let credited = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or_else(|| TransferError::BalanceOverflow {
                account: to.clone(),
            })?;

        self.balances.insert(from.clone(), debited);
        self.balances.insert(to.clone(), credited);
        Ok(())
    }

    fn balance_of(&self, account: &Principal) -> Amount {
        self.balances.get(account).copied().unwrap_or(Amount::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(s: &str) -> Principal {
        Principal::new(s).unwrap()
    }

    fn funded(account: &Principal, amount: u64) -> InMemoryLedger {
        let mut ledger = InMemoryLedger::new();
        ledger.mint(account, Amount::from(amount)).unwrap();
        ledger
    }

    #[test]
    fn unknown_account_has_zero_balance() {
        let ledger = InMemoryLedger::new();
        assert_eq!(ledger.balance_of(&principal("nobody")), Amount::ZERO);
    }

    #[test]
    fn transfer_moves_balance() {
        let alice = principal("alice");
        let bob = principal("bob");
        let mut ledger = funded(&alice, 100);
        ledger.transfer(&alice, &bob, Amount::new(40)).unwrap();
        assert_eq!(ledger.balance_of(&alice), Amount::new(60));
        assert_eq!(ledger.balance_of(&bob), Amount::new(40));
        assert_eq!(ledger.total_supply(), Some(Amount::new(100)));
    }

    #[test]
    fn insufficient_balance_leaves_ledger_unchanged() {
        let alice = principal("alice");
        let bob = principal("bob");
        let mut ledger = funded(&alice, 10);
        let err = ledger.transfer(&alice, &bob, Amount::new(11)).unwrap_err();
        assert_eq!(
            err,
            TransferError::InsufficientBalance {
                account: alice.clone(),
                requested: Amount::new(11),
                available: Amount::new(10),
            }
        );
        assert_eq!(ledger.balance_of(&alice), Amount::new(10));
        assert_eq!(ledger.balance_of(&bob), Amount::ZERO);
    }

    #[test]
    fn zero_transfer_rejected() {
        let alice = principal("alice");
        let mut ledger = funded(&alice, 10);
        assert_eq!(
            ledger.transfer(&alice, &principal("bob"), Amount::ZERO),
            Err(TransferError::NonPositiveAmount)
        );
    }

    #[test]
    fn self_transfer_rejected() {
        let alice = principal("alice");
        let mut ledger = funded(&alice, 10);
        assert!(matches!(
            ledger.transfer(&alice, &alice, Amount::new(1)),
            Err(TransferError::SelfTransfer { .. })
        ));
    }

    #[test]
    fn recipient_overflow_rejected_without_debit() {
        let alice = principal("alice");
        let bob = principal("bob");
        let mut ledger = funded(&alice, 10);
        ledger.mint(&bob, Amount::new(u128::MAX)).unwrap();
        assert!(matches!(
            ledger.transfer(&alice, &bob, Amount::new(1)),
            Err(TransferError::BalanceOverflow { .. })
        ));
        assert_eq!(ledger.balance_of(&alice), Amount::new(10));
    }

    #[test]
    fn mint_overflow_rejected() {
        let alice = principal("alice");
        let mut ledger = InMemoryLedger::new();
        ledger.mint(&alice, Amount::new(u128::MAX)).unwrap();
        assert!(ledger.mint(&alice, Amount::new(1)).is_err());
    }

    #[test]
    fn mutable_reference_is_a_ledger() {
        let alice = principal("alice");
        let bob = principal("bob");
        let mut ledger = funded(&alice, 5);

        fn pay<L: TokenLedger>(mut ledger: L, from: &Principal, to: &Principal) -> Amount {
            ledger.transfer(from, to, Amount::new(5)).unwrap();
            ledger.balance_of(to)
        }

        assert_eq!(pay(&mut ledger, &alice, &bob), Amount::new(5));
        assert_eq!(ledger.balance_of(&alice), Amount::ZERO);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn transfers_conserve_supply(
                moves in prop::collection::vec((0usize..3, 0usize..3, 0u128..500), 0..40)
            ) {
                let accounts = [principal("a"), principal("b"), principal("c")];
                let mut ledger = InMemoryLedger::new();
                for account in &accounts {
                    ledger.mint(account, Amount::new(1_000)).unwrap();
                }
                for (from, to, amount) in moves {
                    let before = (
                        ledger.balance_of(&accounts[from]),
                        ledger.balance_of(&accounts[to]),
                    );
                    if ledger
                        .transfer(&accounts[from], &accounts[to], Amount::new(amount))
                        .is_err()
                    {
                        prop_assert_eq!(ledger.balance_of(&accounts[from]), before.0);
                        prop_assert_eq!(ledger.balance_of(&accounts[to]), before.1);
                    }
                    prop_assert_eq!(ledger.total_supply(), Some(Amount::new(3_000)));
                }
            }
        }
    }
}
