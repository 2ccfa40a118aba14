use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::decimal::{Money, Rate};
use crate::types::{AccountId, CollateralAsset, LoanId, LoanStatus};

#[derive(Error, Debug)]
pub enum LendingError {
    #[error("invalid terms: {message}")]
    InvalidTerms { message: String },

    #[error("loan-to-value {ltv} exceeds ceiling {ceiling}")]
    LtvCeilingExceeded { ltv: Rate, ceiling: Rate },

    #[error("loan already funded")]
    AlreadyFunded,

    #[error("loan not yet funded")]
    NotYetFunded,

    #[error("unauthorized caller: {account}")]
    Unauthorized { account: AccountId },

    #[error("operation {operation} not allowed in status {current:?}")]
    WrongPhase {
        current: LoanStatus,
        operation: &'static str,
    },

    #[error("insufficient funds: required {required}, provided {provided}")]
    InsufficientFunds { required: Money, provided: Money },

    #[error("payment exceeds what is owed: limit {limit}, provided {provided}")]
    OverFunds { limit: Money, provided: Money },

    #[error("{provided} is not a whole multiple of installment {installment}")]
    ImpreciseFunds { installment: Money, provided: Money },

    #[error("loan expired: deadline {deadline}, current time {now}")]
    Expired {
        deadline: DateTime<Utc>,
        now: DateTime<Utc>,
    },

    #[error("collateral already released")]
    AlreadyReleased,

    #[error("loan not found: {id}")]
    LoanNotFound { id: LoanId },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("collateral {asset:?} not held by {holder}")]
    CollateralNotHeld {
        asset: CollateralAsset,
        holder: AccountId,
    },

    #[error("insufficient balance: available {available}, requested {requested}")]
    InsufficientBalance { available: Money, requested: Money },
}

pub type Result<T> = std::result::Result<T, LendingError>;
