use rust_decimal::Decimal;
use thiserror::Error;

use crate::record::RecordError;

/// User-facing catalog. `Display` renders the exact message shown to the
/// user, numbered code included.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AtmError {
    #[error("Account was not found.")]
    AccountNotFound,
    #[error("01. {0} must be a valid number.")]
    InvalidNumber(&'static str),
    #[error("02. {0} must not be less than 0.")]
    NegativeNumber(&'static str),
    #[error("03. {0} must not be less or equal than 0.")]
    NonPositiveNumber(&'static str),
    #[error("04. Couldn't execute {0}.")]
    InvalidOperation(&'static str),
    #[error("05. The current PIN is incorrect.")]
    IncorrectPin,
    #[error("06. The new PIN doesn't match.")]
    NewPinMismatch,
    #[error("07. The{} PIN is invalid, choose a different one.", pin_label(.0))]
    InvalidPin(Option<&'static str>),
    #[error("08. The amount to withdraw cannot exceed the balance. ({0:.2})")]
    InvalidWithdrawal(Decimal),
}

fn pin_label(label: &Option<&'static str>) -> String {
    match label {
        Some(label) => format!(" {label}"),
        None => String::new(),
    }
}

/// Load-time failures. A corrupt value is reported, never silently replaced
/// with an empty collection.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Stored account data is corrupt: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Stored account data is corrupt: {0}")]
    InvalidRecord(#[from] RecordError),
    #[error("Unsupported storage schema version {0}")]
    UnsupportedVersion(u32),
}
