use std::fs::File;
use std::io::{self, Read, Write};

use csv::{ReaderBuilder, Writer};
use log::{info, warn};
use rust_decimal::Decimal;

use crate::accounts::Account;
use crate::bank::{AccountId, Bank};
use crate::error::{LedgerError, LedgerResult};
use crate::operations::{OperationRecord, OperationType};

/// Replay the operations in `filename` against a fresh bank and print the
/// resulting balances to stdout.
pub fn run(filename: &str, bank_name: &str) -> LedgerResult<()> {
    let file = File::open(filename)?;
    let mut bank = Bank::new();
    bank.set_name(bank_name);

    replay(&mut bank, file, io::stdout())
}

/// Apply every record from `input` to `bank`, then write `owner,balance` rows for
/// all accounts in registration order. Rejected records are logged and skipped.
pub fn replay<R: Read, W: Write>(bank: &mut Bank, input: R, output: W) -> LedgerResult<()> {
    let mut rdr = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input);

    let mut applied = 0usize;
    let mut rejected = 0usize;
    for result in rdr.deserialize() {
        let record: OperationRecord = result?;
        match apply(bank, &record) {
            Ok(()) => applied += 1,
            Err(e) if e.is_rejection() => {
                warn!("skipping {:?} for {}: {}", record.op_type, record.owner, e);
                rejected += 1;
            }
            Err(e) => return Err(e),
        }
    }
    info!("replayed {} operations into {:?} ({} rejected)", applied, bank.name(), rejected);

    let mut wtr = Writer::from_writer(output);
    wtr.write_record(["owner", "balance"])?;
    for account in bank.accounts() {
        wtr.write_record([account.owner(), account.plain_balance().as_str()])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Apply a single record to `bank`.
pub fn apply(bank: &mut Bank, record: &OperationRecord) -> LedgerResult<()> {
    match record.op_type {
        OperationType::Open => {
            if bank.find_by_owner(&record.owner).is_some() {
                return Err(LedgerError::DuplicateOwner(record.owner.clone()));
            }
            let balance = record.amount.unwrap_or(Decimal::ZERO);
            bank.add_account(Account::new(record.owner.as_str(), balance));
            Ok(())
        }
        OperationType::Credit => {
            let amount = record.amount.ok_or(LedgerError::MissingAmount)?;
            let id = lookup(bank, &record.owner)?;
            account_mut(bank, id)?.credit(amount)
        }
        OperationType::Debit => {
            let amount = record.amount.ok_or(LedgerError::MissingAmount)?;
            let id = lookup(bank, &record.owner)?;
            account_mut(bank, id)?.debit(amount)
        }
        OperationType::Transfer => {
            let amount = record.amount.ok_or(LedgerError::MissingAmount)?;
            let from = lookup(bank, &record.owner)?;
            let counterparty = record
                .counterparty
                .as_deref()
                .ok_or(LedgerError::MissingCounterparty)?;
            let to = lookup(bank, counterparty)?;
            bank.transfer_between(from, to, amount)
        }
    }
}

fn lookup(bank: &Bank, owner: &str) -> LedgerResult<AccountId> {
    bank.find_by_owner(owner)
        .ok_or_else(|| LedgerError::UnknownOwner(owner.to_string()))
}

fn account_mut(bank: &mut Bank, id: AccountId) -> LedgerResult<&mut Account> {
    bank.account_mut(id).ok_or(LedgerError::AccountNotFound(id))
}
