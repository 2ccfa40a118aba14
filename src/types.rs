use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::{Money, Rate};

/// unique identifier for a loan; assigned sequentially at creation, never reused
pub type LoanId = u64;

/// ledger identity of an account or an asset contract
pub type AccountId = Uuid;

/// loan status; the authoritative phase indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanStatus {
    /// listed by the borrower, awaiting a lender
    Open,
    /// funded by exactly one lender, repayment in progress
    Funded,
    /// every installment paid
    PaidOff,
    /// collateral handed over; terminal
    Released,
    /// withdrawn by the borrower before funding
    Cancelled,
}

impl LoanStatus {
    /// wire code kept from the original protocol tables
    pub fn code(self) -> u16 {
        match self {
            LoanStatus::Open => 10,
            LoanStatus::Funded => 11,
            LoanStatus::PaidOff => 199,
            LoanStatus::Released => 200,
            LoanStatus::Cancelled => 404,
        }
    }

    /// transition table; anything outside it is a phase error
    pub fn can_transition_to(self, next: LoanStatus) -> bool {
        use LoanStatus::*;
        matches!(
            (self, next),
            (Open, Funded)
                | (Open, Cancelled)
                | (Funded, PaidOff)
                | (Funded, Released)
                | (PaidOff, Released)
                | (Cancelled, Released)
        )
    }

    /// true while the loan sits before the paid-off phase
    pub fn is_repayable(self) -> bool {
        self.code() < LoanStatus::PaidOff.code()
    }
}

/// fungible token used for principal and payments
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Currency {
    /// the chain-native asset
    Native,
    /// a fungible token contract
    Token(AccountId),
}

/// a single pledged non-fungible item
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CollateralAsset {
    pub contract: AccountId,
    pub token_id: u64,
}

/// borrower-declared terms submitted at creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanTerms {
    /// principal, denominated in `currency`
    pub loan_amount: Money,
    /// declared aggregate value of the pledged collateral
    pub assets_value: Money,
    /// total interest owed over the loan's life
    pub interest_rate: Rate,
    /// days between scheduled payments
    pub installment_frequency: u32,
    pub nr_of_installments: u32,
    pub currency: Currency,
}
