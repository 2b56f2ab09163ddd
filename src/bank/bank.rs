use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;
use rust_decimal::Decimal;

use crate::accounts::Account;
use crate::accounts::account::ensure_positive;
use crate::error::{LedgerError, LedgerResult};

static NEXT_BANK_ID: AtomicU64 = AtomicU64::new(1);

/// Non-owning handle an account keeps to the bank it was registered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BankId(u64);

/// Slot of an account inside the bank that registered it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId {
    bank: BankId,
    index: usize,
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bank.0, self.index)
    }
}

#[derive(Debug)]
pub struct Bank {
    id: BankId,
    name: String,
    accounts: Vec<Account>,
}

impl Default for Bank {
    fn default() -> Self {
        Self::new()
    }
}

impl Bank {
    pub fn new() -> Self {
        Self {
            id: BankId(NEXT_BANK_ID.fetch_add(1, Ordering::Relaxed)),
            name: String::new(),
            accounts: Vec::new(),
        }
    }

    pub fn id(&self) -> BankId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Take ownership of `account`, point it back at this bank and append it
    /// after every account registered so far.
    pub fn add_account(&mut self, mut account: Account) -> AccountId {
        account.attach_to(self.id);
        let id = AccountId {
            bank: self.id,
            index: self.accounts.len(),
        };
        debug!("registered {} in bank {:?} as {}", account.owner(), self.name, id);
        self.accounts.push(account);
        id
    }

    /// Registered accounts in registration order.
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn account(&self, id: AccountId) -> Option<&Account> {
        if id.bank != self.id {
            return None;
        }
        self.accounts.get(id.index)
    }

    pub fn account_mut(&mut self, id: AccountId) -> Option<&mut Account> {
        if id.bank != self.id {
            return None;
        }
        self.accounts.get_mut(id.index)
    }

    /// First registered account held by `owner`.
    pub fn find_by_owner(&self, owner: &str) -> Option<AccountId> {
        self.accounts
            .iter()
            .position(|acc| acc.owner() == owner)
            .map(|index| AccountId { bank: self.id, index })
    }

    /// Resolves an account's back-reference to this bank's current name.
    pub fn name_of(&self, account: &Account) -> Option<&str> {
        (account.bank() == Some(self.id)).then_some(self.name.as_str())
    }

    /// Move `amount` between two accounts, registered here or not.
    /// Both sides are checked before either balance changes.
    pub fn transfer(&self, from: &mut Account, to: &mut Account, amount: Decimal) -> LedgerResult<()> {
        debug!("transfer {} from {} to {} via {:?}", amount, from.owner(), to.owner(), self.name);
        let from_balance = from.debited(amount)?;
        let to_balance = to.credited(amount)?;
        from.set_balance(from_balance);
        to.set_balance(to_balance);
        Ok(())
    }

    /// Same as [`Bank::transfer`] for accounts this bank holds. Both handles are
    /// resolved before either balance changes.
    pub fn transfer_between(&mut self, from: AccountId, to: AccountId, amount: Decimal) -> LedgerResult<()> {
        ensure_positive(amount)?;
        for id in [from, to] {
            if self.account(id).is_none() {
                return Err(LedgerError::AccountNotFound(id));
            }
        }
        debug!("transfer {} from {} to {} in {:?}", amount, from, to, self.name);

        let from_balance = self.accounts[from.index].debited(amount)?;
        if from == to {
            // Debit and credit of the same slot cancel out.
            return Ok(());
        }
        let to_balance = self.accounts[to.index].credited(amount)?;
        self.accounts[from.index].set_balance(from_balance);
        self.accounts[to.index].set_balance(to_balance);
        Ok(())
    }
}


/// ------------------------
/// Inline Unit Tests
/// ------------------------
#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn rperez() -> Account {
        Account::new("rperez", dec!(2500))
    }

    fn john_doe() -> Account {
        Account::new("John Doe", dec!(1500.9997))
    }

    #[test]
    fn test_new_bank_is_empty() {
        let bank = Bank::new();
        assert!(bank.is_empty());
        assert_eq!(bank.name(), "");
        assert_ne!(bank.id(), Bank::new().id());
    }

    #[test]
    fn test_transfer_unregistered_accounts() {
        let mut cuenta1 = rperez();
        let mut cuenta2 = john_doe();
        let mut bank = Bank::new();
        bank.set_name("Banco de España");

        bank.transfer(&mut cuenta2, &mut cuenta1, dec!(500)).unwrap();
        assert_eq!(cuenta2.plain_balance(), "1000.9997");
        assert_eq!(cuenta1.plain_balance(), "3000");
        assert!(cuenta1.bank().is_none());
    }

    #[test]
    fn test_failed_transfer_has_no_effect() {
        let mut from = john_doe();
        let mut to = rperez();
        let bank = Bank::new();

        let err = bank.transfer(&mut from, &mut to, dec!(1501)).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientFunds));
        assert_eq!(from.balance(), dec!(1500.9997));
        assert_eq!(to.balance(), dec!(2500));

        assert!(bank.transfer(&mut from, &mut to, dec!(-1)).is_err());
        assert_eq!(from.balance(), dec!(1500.9997));
        assert_eq!(to.balance(), dec!(2500));
    }

    #[test]
    fn test_bank_account_relations() {
        let mut bank = Bank::new();
        let id1 = bank.add_account(rperez());
        let id2 = bank.add_account(john_doe());
        // Renaming after registration is seen through the back-reference
        bank.set_name("Banco de España");
        bank.transfer_between(id2, id1, dec!(500)).unwrap();

        assert_eq!(bank.account(id2).unwrap().plain_balance(), "1000.9997");
        assert_eq!(bank.account(id1).unwrap().plain_balance(), "3000");
        assert_eq!(bank.accounts().len(), 2);
        assert_eq!(bank.name_of(bank.account(id1).unwrap()), Some("Banco de España"));
        assert_eq!(bank.name_of(bank.account(id2).unwrap()), Some("Banco de España"));

        let owners: Vec<_> = bank.accounts().iter().map(Account::owner).collect();
        assert_eq!(owners, ["rperez", "John Doe"]);
        assert_eq!(bank.find_by_owner("rperez"), Some(id1));
        assert!(bank.accounts().iter().any(|acc| acc.owner() == "John Doe"));
        assert!(bank.find_by_owner("nobody").is_none());
    }

    #[test]
    fn test_registered_transfer_insufficient_funds() {
        let mut bank = Bank::new();
        let from = bank.add_account(john_doe());
        let to = bank.add_account(rperez());

        let err = bank.transfer_between(from, to, dec!(2000)).unwrap_err();
        assert_eq!(err.to_string(), "Insufficient funds");
        assert_eq!(bank.account(from).unwrap().balance(), dec!(1500.9997));
        assert_eq!(bank.account(to).unwrap().balance(), dec!(2500));
    }

    #[test]
    fn test_transfer_overflow_has_no_effect() {
        let mut from = Account::new("from", dec!(10));
        let mut to = Account::new("to", Decimal::MAX);
        let bank = Bank::new();

        let err = bank.transfer(&mut from, &mut to, dec!(5)).unwrap_err();
        assert!(matches!(err, LedgerError::Overflow));
        assert_eq!(from.balance(), dec!(10));
        assert_eq!(to.balance(), Decimal::MAX);
    }

    #[test]
    fn test_registered_transfer_overflow_has_no_effect() {
        let mut bank = Bank::new();
        let from = bank.add_account(Account::new("from", dec!(10)));
        let to = bank.add_account(Account::new("to", Decimal::MAX));

        let err = bank.transfer_between(from, to, dec!(5)).unwrap_err();
        assert!(matches!(err, LedgerError::Overflow));
        assert_eq!(bank.account(from).unwrap().balance(), dec!(10));
        assert_eq!(bank.account(to).unwrap().balance(), Decimal::MAX);
    }

    #[test]
    fn test_transfer_to_self_at_max_balance() {
        let mut bank = Bank::new();
        let id = bank.add_account(Account::new("full", Decimal::MAX));
        bank.transfer_between(id, id, dec!(1)).unwrap();
        assert_eq!(bank.account(id).unwrap().balance(), Decimal::MAX);
    }

    #[test]
    fn test_foreign_handle_is_not_found() {
        let mut bank = Bank::new();
        let mut other = Bank::new();
        let local = bank.add_account(rperez());
        let foreign = other.add_account(john_doe());

        assert!(bank.account(foreign).is_none());
        let err = bank.transfer_between(local, foreign, dec!(1)).unwrap_err();
        assert!(matches!(err, LedgerError::AccountNotFound(id) if id == foreign));
        assert_eq!(bank.account(local).unwrap().balance(), dec!(2500));

        // Back-reference only resolves against the registering bank
        assert!(bank.name_of(other.account(foreign).unwrap()).is_none());
    }

    #[test]
    fn test_transfer_to_self_is_neutral() {
        let mut bank = Bank::new();
        let id = bank.add_account(rperez());
        bank.transfer_between(id, id, dec!(100)).unwrap();
        assert_eq!(bank.account(id).unwrap().balance(), dec!(2500));
    }

    #[test]
    fn test_account_mut_set_balance() {
        let mut bank = Bank::new();
        let id = bank.add_account(rperez());
        bank.account_mut(id).unwrap().set_balance(dec!(10));
        assert!(bank.transfer_between(id, id, dec!(11)).is_err());
        assert_eq!(bank.account(id).unwrap().plain_balance(), "10");
    }
}
