use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    Open,
    Credit,
    Debit,
    Transfer,
}

/// One row of a ledger replay file: `type,owner,counterparty,amount`.
#[derive(Debug, Clone, Deserialize)]
pub struct OperationRecord {
    #[serde(rename = "type")]
    pub op_type: OperationType,
    pub owner: String,
    /// Receiving owner; only read for transfers.
    pub counterparty: Option<String>,
    /// Parsed from the field text so scale and precision survive.
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub amount: Option<Decimal>,
}
