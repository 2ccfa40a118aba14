use std::collections::BTreeMap;

use crate::decimal::Money;
use crate::errors::{LendingError, Result};
use crate::types::{AccountId, CollateralAsset, Currency};

/// external custody primitives the engine depends on.
///
/// both transfers are all-or-nothing: a failure must leave every balance and
/// ownership record exactly as it was, and the engine aborts the whole
/// operation on the first error.
pub trait CustodyGateway {
    /// move every listed asset from `from` to `to`, or none of them
    fn transfer_collateral(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        assets: &[CollateralAsset],
    ) -> Result<()>;

    /// move `amount` of `currency` from `from` to `to`
    fn transfer_funds(
        &mut self,
        currency: Currency,
        from: &AccountId,
        to: &AccountId,
        amount: Money,
    ) -> Result<()>;
}

/// in-process ledger honoring the gateway contract; doubles as the test double
#[derive(Debug, Default)]
pub struct InMemoryCustody {
    balances: BTreeMap<(AccountId, Currency), Money>,
    owners: BTreeMap<CollateralAsset, AccountId>,
}

impl InMemoryCustody {
    pub fn new() -> Self {
        Self::default()
    }

    /// credit an account out of thin air; genesis and test setup only
    pub fn deposit(&mut self, currency: Currency, account: AccountId, amount: Money) {
        let balance = self.balances.entry((account, currency)).or_insert(Money::ZERO);
        *balance += amount;
    }

    /// record an asset as owned by `owner`
    pub fn register_asset(&mut self, asset: CollateralAsset, owner: AccountId) {
        self.owners.insert(asset, owner);
    }

    pub fn balance_of(&self, currency: Currency, account: &AccountId) -> Money {
        self.balances
            .get(&(*account, currency))
            .copied()
            .unwrap_or(Money::ZERO)
    }

    pub fn owner_of(&self, asset: &CollateralAsset) -> Option<AccountId> {
        self.owners.get(asset).copied()
    }
}

impl CustodyGateway for InMemoryCustody {
    fn transfer_collateral(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        assets: &[CollateralAsset],
    ) -> Result<()> {
        // verify the whole batch before moving anything
        for asset in assets {
            match self.owners.get(asset) {
                Some(owner) if owner == from => {}
                _ => {
                    return Err(LendingError::CollateralNotHeld {
                        asset: *asset,
                        holder: *from,
                    })
                }
            }
        }
        for asset in assets {
            self.owners.insert(*asset, *to);
        }
        Ok(())
    }

    fn transfer_funds(
        &mut self,
        currency: Currency,
        from: &AccountId,
        to: &AccountId,
        amount: Money,
    ) -> Result<()> {
        let available = self.balance_of(currency, from);
        if available < amount {
            return Err(LendingError::InsufficientBalance {
                available,
                requested: amount,
            });
        }
        *self
            .balances
            .entry((*from, currency))
            .or_insert(Money::ZERO) -= amount;
        *self.balances.entry((*to, currency)).or_insert(Money::ZERO) += amount;
        Ok(())
    }
}
