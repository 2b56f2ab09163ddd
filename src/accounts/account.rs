use std::hash::{Hash, Hasher};

use log::warn;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::bank::BankId;
use crate::error::{LedgerError, LedgerResult};

/// A single owner's balance. Two accounts compare equal when owner and balance match,
/// whichever bank (if any) they are registered with.
#[derive(Debug, Clone)]
pub struct Account {
    owner: String,
    balance: Decimal,
    bank: Option<BankId>,
}

impl Account {
    /// Negative starting balances are accepted as given.
    pub fn new(owner: impl Into<String>, balance: Decimal) -> Self {
        Self {
            owner: owner.into(),
            balance,
            bank: None,
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Overwrites the balance without any funds check. Meant for setting up fixtures,
    /// not as a business operation.
    pub fn set_balance(&mut self, balance: Decimal) {
        self.balance = balance;
    }

    /// Balance in plain notation at its own scale, e.g. `900.1234` or `3000`.
    pub fn plain_balance(&self) -> String {
        self.balance.to_string()
    }

    /// Balance truncated toward zero, or `None` if it does not fit in an `i64`.
    pub fn whole_balance(&self) -> Option<i64> {
        self.balance.trunc().to_i64()
    }

    /// Handle of the bank this account was registered with.
    pub fn bank(&self) -> Option<BankId> {
        self.bank
    }

    pub(crate) fn attach_to(&mut self, bank: BankId) {
        self.bank = Some(bank);
    }

    /// Withdraw `amount`. The balance is left untouched unless the whole debit succeeds.
    pub fn debit(&mut self, amount: Decimal) -> LedgerResult<()> {
        self.balance = self.debited(amount)?;
        Ok(())
    }

    /// Deposit `amount`. Fails with `Overflow` past the decimal range instead of wrapping.
    pub fn credit(&mut self, amount: Decimal) -> LedgerResult<()> {
        self.balance = self.credited(amount)?;
        Ok(())
    }

    /// Balance after debiting `amount`, without applying it.
    pub(crate) fn debited(&self, amount: Decimal) -> LedgerResult<Decimal> {
        ensure_positive(amount)?;
        if self.balance < amount {
            warn!(
                "debit of {} rejected for {}: balance is {}",
                amount, self.owner, self.balance
            );
            return Err(LedgerError::InsufficientFunds);
        }
        self.balance.checked_sub(amount).ok_or(LedgerError::Overflow)
    }

    /// Balance after crediting `amount`, without applying it.
    pub(crate) fn credited(&self, amount: Decimal) -> LedgerResult<Decimal> {
        ensure_positive(amount)?;
        self.balance.checked_add(amount).ok_or_else(|| {
            warn!("credit of {} rejected for {}: balance would overflow", amount, self.owner);
            LedgerError::Overflow
        })
    }
}

pub(crate) fn ensure_positive(amount: Decimal) -> LedgerResult<()> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidAmount(amount));
    }
    Ok(())
}

impl PartialEq for Account {
    fn eq(&self, other: &Self) -> bool {
        self.owner == other.owner && self.balance == other.balance
    }
}

impl Eq for Account {}

impl Hash for Account {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.owner.hash(state);
        // Decimal's Hash normalizes scale, matching its Eq (1.50 == 1.5).
        self.balance.hash(state);
    }
}
