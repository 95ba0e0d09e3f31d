use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::account::Account;

pub const SCHEMA_VERSION: u32 = 1;

/// Envelope written to the store: a schema version and the whole account
/// collection, rewritten on every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredState {
    pub version: u32,
    pub accounts: Vec<AccountRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub pin: String,
    pub name: String,
    pub balance: String,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("stored balance {0:?} is not a number")]
    InvalidBalance(String),
    #[error("stored balance {0:?} is negative")]
    NegativeBalance(String),
}

impl StoredState {
    pub fn capture(accounts: &[Account]) -> Self {
        StoredState {
            version: SCHEMA_VERSION,
            accounts: accounts.iter().map(AccountRecord::from).collect(),
        }
    }
}

impl From<&Account> for AccountRecord {
    fn from(account: &Account) -> Self {
        AccountRecord {
            pin: account.pin().to_string(),
            name: account.name().to_string(),
            balance: account.balance_display(),
        }
    }
}

impl TryFrom<AccountRecord> for Account {
    type Error = RecordError;

    fn try_from(record: AccountRecord) -> Result<Self, Self::Error> {
        let balance = Decimal::from_str_exact(&record.balance)
            .map_err(|_| RecordError::InvalidBalance(record.balance.clone()))?;
        if balance < Decimal::ZERO {
            return Err(RecordError::NegativeBalance(record.balance));
        }
        Ok(Account::new(record.pin, record.name, Some(balance)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    #[test]
    fn round_trip_preserves_the_account() {
        let mut account = Account::new("1234", "Alice", Some(dec!(3.5)));
        account.deposit(dec!(0.25)).unwrap();
        let record = AccountRecord::from(&account);
        assert_eq!(record.balance, "3.75");
        let restored = Account::try_from(record).unwrap();
        assert_eq!(restored, account);
    }

    #[test]
    fn stored_state_serializes_versioned_json() {
        let accounts = vec![Account::new("1", "A", None)];
        let state = StoredState::capture(&accounts);
        let raw = serde_json::to_string(&state).unwrap();
        assert_eq!(
            raw,
            r#"{"version":1,"accounts":[{"pin":"1","name":"A","balance":"0.00"}]}"#
        );
        let reparsed: StoredState = serde_json::from_str(&raw).unwrap();
        assert_eq!(reparsed, state);
    }

    #[test]
    fn malformed_balances_are_refused() {
        let record = AccountRecord {
            pin: "1".into(),
            name: "A".into(),
            balance: "lots".into(),
        };
        assert_eq!(
            Account::try_from(record),
            Err(RecordError::InvalidBalance("lots".into()))
        );

        let record = AccountRecord {
            pin: "1".into(),
            name: "A".into(),
            balance: "-1.00".into(),
        };
        assert_eq!(
            Account::try_from(record),
            Err(RecordError::NegativeBalance("-1.00".into()))
        );
    }
}
