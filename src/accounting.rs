//! pure numeric helpers shared by the lifecycle engine; every division
//! truncates and every remainder is accounted for explicitly

use rust_decimal::Decimal;

use crate::decimal::{Money, Rate};
use crate::errors::{LendingError, Result};

/// ratio of `numerator` to `denominator` scaled by `10^precision`,
/// round-half-up on the last digit
pub fn percentage(numerator: Money, denominator: Money, precision: u32) -> Result<Rate> {
    if denominator.is_zero() {
        return Err(LendingError::InvalidTerms {
            message: "zero denominator in percentage".to_string(),
        });
    }
    let scale = Decimal::from(10u64.pow(precision + 1));
    let quotient = (numerator.as_decimal() * scale / denominator.as_decimal()).floor();
    let rounded = ((quotient + Decimal::from(5)) / Decimal::from(10)).floor();
    Ok(Rate::from_decimal(rounded))
}

/// even split of principal plus total interest across all installments,
/// truncating; the remainder accrues to no one
pub fn installment_amount(
    loan_amount: Money,
    interest_rate: Rate,
    nr_of_installments: u32,
) -> Result<Money> {
    if nr_of_installments == 0 {
        return Err(LendingError::InvalidTerms {
            message: "number of installments must be positive".to_string(),
        });
    }
    let owed = Money::from_decimal(loan_amount.as_decimal() + interest_rate.as_decimal());
    Ok(owed.floor_div(nr_of_installments))
}

/// split of the funding transfer between borrower and operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FundingSplit {
    pub borrower_share: Money,
    pub operator_share: Money,
}

/// the operator fee is carved out of the principal transfer itself,
/// so the two shares always sum to exactly the loan amount
pub fn funding_split(loan_amount: Money, loan_fee: u32) -> FundingSplit {
    let borrower_share = loan_amount.floor_div(100).mul_int(u64::from(100 - loan_fee));
    FundingSplit {
        borrower_share,
        operator_share: loan_amount - borrower_share,
    }
}

/// split of a gross installment payment between lender and operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallmentSplit {
    pub lender_share: Money,
    pub operator_share: Money,
}

pub fn installment_split(gross: Money, interest_rate_to_company: u32) -> InstallmentSplit {
    let lender_share = gross
        .floor_div(100)
        .mul_int(u64::from(100 - interest_rate_to_company));
    InstallmentSplit {
        lender_share,
        operator_share: gross - lender_share,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_scales_the_ratio() {
        // 1000 / 2000 = 0.500 at three implied decimals
        let ltv = percentage(Money::from_units(1000), Money::from_units(2000), 3).unwrap();
        assert_eq!(ltv, Rate::from_scaled(500));

        let ltv = percentage(Money::from_units(450), Money::from_units(1000), 3).unwrap();
        assert_eq!(ltv, Rate::from_scaled(450));
    }

    #[test]
    fn test_percentage_rounds_half_up() {
        // 1/16 = 0.0625 -> 0.063 at three decimals
        let up = percentage(Money::from_units(1), Money::from_units(16), 3).unwrap();
        assert_eq!(up, Rate::from_scaled(63));

        // 1/3 = 0.3333... -> 0.333, the dropped digit stays dropped
        let down = percentage(Money::from_units(1), Money::from_units(3), 3).unwrap();
        assert_eq!(down, Rate::from_scaled(333));
    }

    #[test]
    fn test_percentage_rejects_zero_denominator() {
        let err = percentage(Money::from_units(1), Money::ZERO, 3);
        assert!(matches!(err, Err(LendingError::InvalidTerms { .. })));
    }

    #[test]
    fn test_installment_amount_truncates() {
        // (1000 + 0) / 3 = 333, never 334
        let amount = installment_amount(Money::from_units(1000), Rate::ZERO, 3).unwrap();
        assert_eq!(amount, Money::from_units(333));

        // (450 + 50) / 5 = 100
        let amount =
            installment_amount(Money::from_units(450), Rate::from_scaled(50), 5).unwrap();
        assert_eq!(amount, Money::from_units(100));
    }

    #[test]
    fn test_installment_amount_rejects_zero_installments() {
        let err = installment_amount(Money::from_units(1000), Rate::ZERO, 0);
        assert!(matches!(err, Err(LendingError::InvalidTerms { .. })));
    }

    #[test]
    fn test_funding_split_sums_to_principal() {
        let split = funding_split(Money::from_units(1000), 1);
        assert_eq!(split.borrower_share, Money::from_units(990));
        assert_eq!(split.operator_share, Money::from_units(10));

        // truncation on an uneven principal pushes the remainder to the operator
        let split = funding_split(Money::from_units(1050), 1);
        assert_eq!(split.borrower_share, Money::from_units(990));
        assert_eq!(split.operator_share, Money::from_units(60));
        assert_eq!(
            split.borrower_share + split.operator_share,
            Money::from_units(1050)
        );
    }

    #[test]
    fn test_installment_split_sums_to_gross() {
        let split = installment_split(Money::from_units(200), 40);
        assert_eq!(split.lender_share, Money::from_units(120));
        assert_eq!(split.operator_share, Money::from_units(80));

        let split = installment_split(Money::from_units(100), 40);
        assert_eq!(split.lender_share, Money::from_units(60));
        assert_eq!(split.operator_share, Money::from_units(40));
        assert_eq!(
            split.lender_share + split.operator_share,
            Money::from_units(100)
        );
    }
}
