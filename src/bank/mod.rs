pub mod bank;

pub use bank::{AccountId, Bank, BankId};
