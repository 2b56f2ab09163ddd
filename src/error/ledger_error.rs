use rust_decimal::Decimal;
use thiserror::Error;

use crate::bank::AccountId;

pub type LedgerResult<T> = Result<T, LedgerError>;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Insufficient funds")]
    InsufficientFunds,

    #[error("Amount must be positive (got {0})")]
    InvalidAmount(Decimal),

    #[error("Balance would overflow the decimal range")]
    Overflow,

    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    #[error("No account opened for owner: {0}")]
    UnknownOwner(String),

    #[error("Account already opened for owner: {0}")]
    DuplicateOwner(String),

    #[error("Record is missing an amount")]
    MissingAmount,

    #[error("Transfer record is missing a counterparty")]
    MissingCounterparty,

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl LedgerError {
    /// Domain rejections leave the ledger untouched; a replay may skip the record and go on.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::InsufficientFunds
                | Self::InvalidAmount(_)
                | Self::Overflow
                | Self::AccountNotFound(_)
                | Self::UnknownOwner(_)
                | Self::DuplicateOwner(_)
                | Self::MissingAmount
                | Self::MissingCounterparty
        )
    }
}
