pub mod accounts;
pub mod bank;
pub mod error;
pub mod operations;
pub mod orchestrator;

pub use accounts::Account;
pub use bank::{AccountId, Bank, BankId};
pub use error::{LedgerError, LedgerResult};
pub use operations::{OperationRecord, OperationType};
pub use orchestrator::run;
