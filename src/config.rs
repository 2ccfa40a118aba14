use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::Rate;
use crate::errors::{LendingError, Result};

/// process-wide protocol parameters, read by every transition and
/// mutated only through the engine's administrative operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtocolConfig {
    /// loan-to-value ceiling every new loan is checked against
    pub ltv: Rate,
    /// percent of the principal carved out for the operator on funding
    pub loan_fee: u32,
    /// percent of each installment routed to the operator
    pub interest_rate_to_company: u32,
    /// percent of each installment nominally owed to the lender
    pub interest_rate_to_lender: u32,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            ltv: Rate::from_scaled(600),
            loan_fee: 1,
            interest_rate_to_company: 40,
            interest_rate_to_lender: 60,
        }
    }
}

impl ProtocolConfig {
    pub fn validate(&self) -> Result<()> {
        if self.ltv.as_decimal() <= Decimal::ZERO {
            return Err(LendingError::InvalidConfiguration {
                message: "ltv ceiling must be positive".to_string(),
            });
        }
        if self.loan_fee > 100 {
            return Err(LendingError::InvalidConfiguration {
                message: format!("loan fee {} exceeds 100 percent", self.loan_fee),
            });
        }
        if self.interest_rate_to_company > 100 {
            return Err(LendingError::InvalidConfiguration {
                message: format!(
                    "interest rate to company {} exceeds 100 percent",
                    self.interest_rate_to_company
                ),
            });
        }
        if self.interest_rate_to_lender > 100 {
            return Err(LendingError::InvalidConfiguration {
                message: format!(
                    "interest rate to lender {} exceeds 100 percent",
                    self.interest_rate_to_lender
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ProtocolConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.ltv, Rate::from_scaled(600));
        assert_eq!(config.loan_fee, 1);
    }

    #[test]
    fn test_rates_above_whole_are_rejected() {
        let config = ProtocolConfig {
            interest_rate_to_company: 101,
            ..ProtocolConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(LendingError::InvalidConfiguration { .. })
        ));

        let config = ProtocolConfig {
            ltv: Rate::ZERO,
            ..ProtocolConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
