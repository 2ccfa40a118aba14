use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::accounting;
use crate::decimal::{Money, Rate};
use crate::errors::{LendingError, Result};
use crate::types::{AccountId, CollateralAsset, Currency, LoanId, LoanStatus, LoanTerms};

/// a single loan record; appended to the registry at creation and
/// retained in its terminal state for audit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub borrower: AccountId,
    /// set by exactly one successful approval, never changed afterwards
    pub lender: Option<AccountId>,
    /// the pledged items, fixed at creation
    pub collateral_assets: Vec<CollateralAsset>,
    pub loan_amount: Money,
    /// borrower-declared aggregate collateral value at creation
    pub assets_value: Money,
    pub interest_rate: Rate,
    /// days between scheduled payments
    pub installment_frequency: u32,
    pub nr_of_installments: u32,
    pub nr_of_payments: u32,
    /// absolute deadline; unset until funded
    pub loan_end: Option<DateTime<Utc>>,
    pub status: LoanStatus,
    pub currency: Currency,
    pub created_at: DateTime<Utc>,
}

impl Loan {
    pub(crate) fn new(
        id: LoanId,
        borrower: AccountId,
        terms: LoanTerms,
        collateral: Vec<CollateralAsset>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            borrower,
            lender: None,
            collateral_assets: collateral,
            loan_amount: terms.loan_amount,
            assets_value: terms.assets_value,
            interest_rate: terms.interest_rate,
            installment_frequency: terms.installment_frequency,
            nr_of_installments: terms.nr_of_installments,
            nr_of_payments: 0,
            loan_end: None,
            status: LoanStatus::Open,
            currency: terms.currency,
            created_at,
        }
    }

    /// amount owed per installment
    pub fn installment_amount(&self) -> Result<Money> {
        accounting::installment_amount(
            self.loan_amount,
            self.interest_rate,
            self.nr_of_installments,
        )
    }

    pub fn remaining_installments(&self) -> u32 {
        self.nr_of_installments - self.nr_of_payments
    }

    pub fn is_fully_paid(&self) -> bool {
        self.nr_of_payments == self.nr_of_installments
    }

    /// deadline strictly passed; unfunded loans have no deadline
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.loan_end.is_some_and(|end| now > end)
    }

    /// deadline reached; the phase in which unpaid collateral forfeits
    pub fn has_matured(&self, now: DateTime<Utc>) -> bool {
        self.loan_end.is_some_and(|end| now >= end)
    }

    /// guarded status move; rejects anything outside the transition table
    pub(crate) fn transition(&mut self, next: LoanStatus, operation: &'static str) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(LendingError::WrongPhase {
                current: self.status,
                operation,
            });
        }
        self.status = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use uuid::Uuid;

    fn test_loan() -> Loan {
        let terms = LoanTerms {
            loan_amount: Money::from_units(450),
            assets_value: Money::from_units(1000),
            interest_rate: Rate::from_scaled(50),
            installment_frequency: 7,
            nr_of_installments: 5,
            currency: Currency::Native,
        };
        let collateral = vec![CollateralAsset {
            contract: Uuid::new_v4(),
            token_id: 1,
        }];
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Loan::new(1, Uuid::new_v4(), terms, collateral, created)
    }

    #[test]
    fn test_new_loan_starts_open_and_unfunded() {
        let loan = test_loan();
        assert_eq!(loan.status, LoanStatus::Open);
        assert!(loan.lender.is_none());
        assert_eq!(loan.nr_of_payments, 0);
        assert!(loan.loan_end.is_none());
        assert_eq!(loan.remaining_installments(), 5);
    }

    #[test]
    fn test_installment_amount() {
        let loan = test_loan();
        assert_eq!(loan.installment_amount().unwrap(), Money::from_units(100));
    }

    #[test]
    fn test_expiry_needs_a_deadline() {
        let mut loan = test_loan();
        let now = loan.created_at;
        assert!(!loan.is_expired(now));
        assert!(!loan.has_matured(now));

        loan.loan_end = Some(now + Duration::days(35));
        assert!(!loan.is_expired(now + Duration::days(35)));
        assert!(loan.has_matured(now + Duration::days(35)));
        assert!(loan.is_expired(now + Duration::days(36)));
    }

    #[test]
    fn test_transition_is_guarded() {
        let mut loan = test_loan();
        assert!(loan.transition(LoanStatus::Funded, "approve").is_ok());
        assert_eq!(loan.status, LoanStatus::Funded);

        let err = loan.transition(LoanStatus::Cancelled, "cancel");
        assert!(matches!(
            err,
            Err(LendingError::WrongPhase {
                current: LoanStatus::Funded,
                ..
            })
        ));
        assert_eq!(loan.status, LoanStatus::Funded);
    }
}
