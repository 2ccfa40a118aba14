use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::types::{AccountId, CollateralAsset, LoanId, LoanStatus};

/// all notifications emitted by the engine; advisory for downstream observers,
/// not part of the consistency contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // lifecycle events
    LoanCreated {
        loan_id: LoanId,
        borrower: AccountId,
        loan_amount: Money,
        assets_value: Money,
        nr_of_installments: u32,
        status: LoanStatus,
        timestamp: DateTime<Utc>,
    },
    LoanApproved {
        loan_id: LoanId,
        lender: AccountId,
        borrower_share: Money,
        operator_share: Money,
        loan_end: DateTime<Utc>,
        status: LoanStatus,
        timestamp: DateTime<Utc>,
    },
    LoanCancelled {
        loan_id: LoanId,
        borrower: AccountId,
        status: LoanStatus,
        timestamp: DateTime<Utc>,
    },
    InstallmentsPaid {
        loan_id: LoanId,
        borrower: AccountId,
        funds_sent: Money,
        installments_covered: u32,
        lender_share: Money,
        operator_share: Money,
        nr_of_payments: u32,
        status: LoanStatus,
        timestamp: DateTime<Utc>,
    },
    LoanExtended {
        loan_id: LoanId,
        lender: AccountId,
        nr_of_weeks: u32,
        loan_end: DateTime<Utc>,
        nr_of_installments: u32,
        nr_of_payments: u32,
        status: LoanStatus,
        timestamp: DateTime<Utc>,
    },
    ItemsWithdrawn {
        loan_id: LoanId,
        caller: AccountId,
        recipient: AccountId,
        assets: Vec<CollateralAsset>,
        status: LoanStatus,
        timestamp: DateTime<Utc>,
    },

    // configuration events
    LtvChanged {
        old_value: Rate,
        new_value: Rate,
        timestamp: DateTime<Utc>,
    },
    InterestRateToCompanyChanged {
        old_value: u32,
        new_value: u32,
        timestamp: DateTime<Utc>,
    },
    InterestRateToLenderChanged {
        old_value: u32,
        new_value: u32,
        timestamp: DateTime<Utc>,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
