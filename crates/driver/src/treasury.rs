//! The treasury module holds bonds in custody and pays them out on settlement.

use ethers::types::{Address, U256};
use op_proposal_game::proposal::{BondVault, TransferError};
use std::collections::{BTreeSet, HashMap};

/// The [Treasury] is the custody account for every game's bond, plus the ledger of paid out
/// credit.
#[derive(Debug, Default, Clone)]
pub struct Treasury {
    custody: U256,
    balances: HashMap<Address, U256>,
    rejecting: BTreeSet<Address>,
}

impl Treasury {
    /// Takes `amount` into custody.
    pub fn deposit(&mut self, amount: U256) {
        self.custody += amount;
    }

    /// Returns the total amount held in custody.
    pub fn custody(&self) -> U256 {
        self.custody
    }

    /// Returns the amount paid out to `account` so far.
    pub fn balance_of(&self, account: Address) -> U256 {
        self.balances.get(&account).copied().unwrap_or_default()
    }

    /// Makes transfers to `account` fail, as a contract recipient without a payable fallback
    /// would.
    pub fn reject_transfers_to(&mut self, account: Address, reject: bool) {
        if reject {
            self.rejecting.insert(account);
        } else {
            self.rejecting.remove(&account);
        }
    }
}

impl BondVault for Treasury {
    fn transfer(&mut self, recipient: Address, amount: U256) -> Result<(), TransferError> {
        if self.rejecting.contains(&recipient) {
            return Err(TransferError::Rejected(recipient));
        }
        if self.custody < amount {
            return Err(TransferError::InsufficientFunds);
        }

        self.custody -= amount;
        *self.balances.entry(recipient).or_default() += amount;
        Ok(())
    }
}
