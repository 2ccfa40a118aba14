use chrono::Duration;
use hourglass_rs::SafeTimeProvider;
use rust_decimal::Decimal;

use crate::accounting;
use crate::config::ProtocolConfig;
use crate::custody::CustodyGateway;
use crate::decimal::{Money, Rate};
use crate::errors::{LendingError, Result};
use crate::events::{Event, EventStore};
use crate::loan::Loan;
use crate::registry::LoanRegistry;
use crate::types::{AccountId, CollateralAsset, LoanId, LoanStatus, LoanTerms};

/// lifecycle engine: every mutation of the registry enters through here.
///
/// all mutating operations take `&mut self`, so the borrow checker makes the
/// whole registry a single-writer domain; getters borrow shared and only ever
/// observe committed state. operations validate against in-memory state
/// first, then call the custody gateway, and commit registry mutations and
/// events only once every transfer has succeeded.
pub struct LendingEngine<G: CustodyGateway> {
    gateway: G,
    registry: LoanRegistry,
    config: ProtocolConfig,
    events: EventStore,
    /// sole account allowed to change the global configuration
    admin: AccountId,
    /// receives the protocol's cut of funding fees and installments
    operator: AccountId,
    /// ledger account holding custodied collateral and in-flight funds
    custodian: AccountId,
}

impl<G: CustodyGateway> LendingEngine<G> {
    pub fn new(gateway: G, admin: AccountId, operator: AccountId, custodian: AccountId) -> Self {
        Self {
            gateway,
            registry: LoanRegistry::new(),
            config: ProtocolConfig::default(),
            events: EventStore::new(),
            admin,
            operator,
            custodian,
        }
    }

    pub fn with_config(
        gateway: G,
        admin: AccountId,
        operator: AccountId,
        custodian: AccountId,
        config: ProtocolConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            gateway,
            registry: LoanRegistry::new(),
            config,
            events: EventStore::new(),
            admin,
            operator,
            custodian,
        })
    }

    /// list a new loan: custody-transfers the collateral to the registry and
    /// appends an open record
    pub fn create_loan(
        &mut self,
        borrower: &AccountId,
        terms: LoanTerms,
        collateral: Vec<CollateralAsset>,
        time_provider: &SafeTimeProvider,
    ) -> Result<LoanId> {
        if terms.nr_of_installments == 0 {
            return Err(LendingError::InvalidTerms {
                message: "number of installments must be positive".to_string(),
            });
        }
        if terms.loan_amount <= Money::ZERO {
            return Err(LendingError::InvalidTerms {
                message: "loan amount must be positive".to_string(),
            });
        }
        if terms.assets_value <= Money::ZERO {
            return Err(LendingError::InvalidTerms {
                message: "assets value must be positive".to_string(),
            });
        }
        let ltv = accounting::percentage(terms.loan_amount, terms.assets_value, Rate::SCALE)?;
        if ltv > self.config.ltv {
            return Err(LendingError::LtvCeilingExceeded {
                ltv,
                ceiling: self.config.ltv,
            });
        }

        // custody first: if any single asset fails, no record is persisted
        self.gateway
            .transfer_collateral(borrower, &self.custodian, &collateral)?;

        let now = time_provider.now();
        let id = self.registry.allocate_id();
        let loan = Loan::new(id, *borrower, terms, collateral, now);
        self.events.emit(Event::LoanCreated {
            loan_id: id,
            borrower: *borrower,
            loan_amount: loan.loan_amount,
            assets_value: loan.assets_value,
            nr_of_installments: loan.nr_of_installments,
            status: loan.status,
            timestamp: now,
        });
        self.registry.append(loan);
        Ok(id)
    }

    /// fund an open loan with exactly its principal; the single transfer is
    /// split between borrower and operator and the repayment clock starts
    pub fn approve_loan(
        &mut self,
        lender: &AccountId,
        loan_id: LoanId,
        funds_sent: Money,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        let (borrower, currency, amount) = {
            let loan = self.registry.get(loan_id)?;
            if loan.lender.is_some() || loan.nr_of_payments != 0 {
                return Err(LendingError::AlreadyFunded);
            }
            if loan.status != LoanStatus::Open {
                return Err(LendingError::WrongPhase {
                    current: loan.status,
                    operation: "approve",
                });
            }
            if funds_sent < loan.loan_amount {
                return Err(LendingError::InsufficientFunds {
                    required: loan.loan_amount,
                    provided: funds_sent,
                });
            }
            if funds_sent > loan.loan_amount {
                return Err(LendingError::OverFunds {
                    limit: loan.loan_amount,
                    provided: funds_sent,
                });
            }
            (loan.borrower, loan.currency, loan.loan_amount)
        };

        let split = accounting::funding_split(amount, self.config.loan_fee);

        // pull the full principal into custody, then fan out the split
        self.gateway
            .transfer_funds(currency, lender, &self.custodian, amount)?;
        if !split.borrower_share.is_zero() {
            self.gateway
                .transfer_funds(currency, &self.custodian, &borrower, split.borrower_share)?;
        }
        if !split.operator_share.is_zero() {
            self.gateway.transfer_funds(
                currency,
                &self.custodian,
                &self.operator,
                split.operator_share,
            )?;
        }

        let now = time_provider.now();
        let loan = self.registry.get_mut(loan_id)?;
        loan.transition(LoanStatus::Funded, "approve")?;
        loan.lender = Some(*lender);
        let loan_end = now
            + Duration::days(
                i64::from(loan.nr_of_installments) * i64::from(loan.installment_frequency),
            );
        loan.loan_end = Some(loan_end);
        self.events.emit(Event::LoanApproved {
            loan_id,
            lender: *lender,
            borrower_share: split.borrower_share,
            operator_share: split.operator_share,
            loan_end,
            status: loan.status,
            timestamp: now,
        });
        Ok(())
    }

    /// borrower backs out of an unfunded listing; collateral stays custodied
    /// until withdrawn
    pub fn cancel_loan(
        &mut self,
        caller: &AccountId,
        loan_id: LoanId,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        let now = time_provider.now();
        let loan = self.registry.get_mut(loan_id)?;
        if *caller != loan.borrower {
            return Err(LendingError::Unauthorized { account: *caller });
        }
        if loan.lender.is_some() {
            return Err(LendingError::AlreadyFunded);
        }
        loan.transition(LoanStatus::Cancelled, "cancel")?;
        loan.loan_end = Some(now);
        self.events.emit(Event::LoanCancelled {
            loan_id,
            borrower: loan.borrower,
            status: loan.status,
            timestamp: now,
        });
        Ok(())
    }

    /// pay one or more installments in a single exact-multiple lump sum
    pub fn pay_loan(
        &mut self,
        caller: &AccountId,
        loan_id: LoanId,
        funds_sent: Money,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        let now = time_provider.now();
        let (borrower, lender, currency, total_payments) = {
            let loan = self.registry.get(loan_id)?;
            if *caller != loan.borrower {
                return Err(LendingError::Unauthorized { account: *caller });
            }
            if !loan.status.is_repayable() {
                return Err(LendingError::WrongPhase {
                    current: loan.status,
                    operation: "pay",
                });
            }
            let lender = loan.lender.ok_or(LendingError::NotYetFunded)?;
            if let Some(end) = loan.loan_end {
                if now > end {
                    return Err(LendingError::Expired { deadline: end, now });
                }
            }
            if loan.nr_of_payments >= loan.nr_of_installments {
                return Err(LendingError::WrongPhase {
                    current: loan.status,
                    operation: "pay",
                });
            }
            let installment = loan.installment_amount()?;
            if installment.is_zero() {
                return Err(LendingError::InvalidTerms {
                    message: "installment amount is zero".to_string(),
                });
            }
            if funds_sent < installment {
                return Err(LendingError::InsufficientFunds {
                    required: installment,
                    provided: funds_sent,
                });
            }
            let total_payments = funds_sent.whole_units_of(installment);
            let remaining = loan.remaining_installments();
            if total_payments > u64::from(remaining) {
                return Err(LendingError::OverFunds {
                    limit: installment.mul_int(u64::from(remaining)),
                    provided: funds_sent,
                });
            }
            if installment.mul_int(total_payments) != funds_sent {
                return Err(LendingError::ImpreciseFunds {
                    installment,
                    provided: funds_sent,
                });
            }
            (loan.borrower, lender, loan.currency, total_payments as u32)
        };

        let split = accounting::installment_split(funds_sent, self.config.interest_rate_to_company);

        // pull the exact payment into custody, then fan out the split
        self.gateway
            .transfer_funds(currency, &borrower, &self.custodian, funds_sent)?;
        if !split.lender_share.is_zero() {
            self.gateway
                .transfer_funds(currency, &self.custodian, &lender, split.lender_share)?;
        }
        if !split.operator_share.is_zero() {
            self.gateway.transfer_funds(
                currency,
                &self.custodian,
                &self.operator,
                split.operator_share,
            )?;
        }

        let loan = self.registry.get_mut(loan_id)?;
        loan.nr_of_payments += total_payments;
        if loan.is_fully_paid() {
            loan.transition(LoanStatus::PaidOff, "pay")?;
        }
        self.events.emit(Event::InstallmentsPaid {
            loan_id,
            borrower,
            funds_sent,
            installments_covered: total_payments,
            lender_share: split.lender_share,
            operator_share: split.operator_share,
            nr_of_payments: loan.nr_of_payments,
            status: loan.status,
            timestamp: now,
        });
        Ok(())
    }

    /// lender grants more time: the deadline moves by `nr_of_weeks` days and
    /// the same count of installments is forgiven outright
    pub fn extend_loan(
        &mut self,
        caller: &AccountId,
        loan_id: LoanId,
        nr_of_weeks: u32,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        let now = time_provider.now();
        let loan = self.registry.get_mut(loan_id)?;
        let lender = loan.lender.ok_or(LendingError::NotYetFunded)?;
        if *caller != lender {
            return Err(LendingError::Unauthorized { account: *caller });
        }
        if !loan.status.is_repayable() {
            return Err(LendingError::WrongPhase {
                current: loan.status,
                operation: "extend",
            });
        }
        if loan.nr_of_payments >= loan.nr_of_installments {
            return Err(LendingError::WrongPhase {
                current: loan.status,
                operation: "extend",
            });
        }
        let end = loan.loan_end.ok_or(LendingError::NotYetFunded)?;
        if now > end {
            return Err(LendingError::Expired { deadline: end, now });
        }

        // pure schedule amendment, no funds move
        let loan_end = end + Duration::days(i64::from(nr_of_weeks));
        loan.loan_end = Some(loan_end);
        loan.nr_of_payments += nr_of_weeks;
        loan.nr_of_installments += nr_of_weeks;
        self.events.emit(Event::LoanExtended {
            loan_id,
            lender,
            nr_of_weeks,
            loan_end,
            nr_of_installments: loan.nr_of_installments,
            nr_of_payments: loan.nr_of_payments,
            status: loan.status,
            timestamp: now,
        });
        Ok(())
    }

    /// sole custody release point: collateral goes back to the borrower when
    /// the loan was fully paid or cancelled, and forfeits to the lender when
    /// the deadline passed unpaid
    pub fn withdraw_items(
        &mut self,
        caller: &AccountId,
        loan_id: LoanId,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        let now = time_provider.now();
        let (assets, recipient) = {
            let loan = self.registry.get(loan_id)?;
            if loan.status == LoanStatus::Released {
                return Err(LendingError::AlreadyReleased);
            }
            let is_party = *caller == loan.borrower || loan.lender == Some(*caller);
            if !is_party {
                return Err(LendingError::Unauthorized { account: *caller });
            }
            if loan.status == LoanStatus::Open {
                return Err(LendingError::WrongPhase {
                    current: loan.status,
                    operation: "withdraw",
                });
            }
            if !(loan.has_matured(now) || loan.is_fully_paid()) {
                return Err(LendingError::WrongPhase {
                    current: loan.status,
                    operation: "withdraw",
                });
            }
            let recipient = match loan.status {
                LoanStatus::PaidOff | LoanStatus::Cancelled => loan.borrower,
                _ => loan.lender.ok_or(LendingError::NotYetFunded)?,
            };
            (loan.collateral_assets.clone(), recipient)
        };

        self.gateway
            .transfer_collateral(&self.custodian, &recipient, &assets)?;

        let loan = self.registry.get_mut(loan_id)?;
        loan.transition(LoanStatus::Released, "withdraw")?;
        self.events.emit(Event::ItemsWithdrawn {
            loan_id,
            caller: *caller,
            recipient,
            assets,
            status: loan.status,
            timestamp: now,
        });
        Ok(())
    }

    // read-only surface

    pub fn nr_of_payments(&self, loan_id: LoanId) -> Result<u32> {
        Ok(self.registry.get(loan_id)?.nr_of_payments)
    }

    pub fn status(&self, loan_id: LoanId) -> Result<LoanStatus> {
        Ok(self.registry.get(loan_id)?.status)
    }

    pub fn loan(&self, loan_id: LoanId) -> Result<&Loan> {
        self.registry.get(loan_id)
    }

    pub fn loans(&self) -> impl Iterator<Item = &Loan> {
        self.registry.iter()
    }

    pub fn registry(&self) -> &LoanRegistry {
        &self.registry
    }

    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }

    // administrative surface

    pub fn set_ltv(
        &mut self,
        caller: &AccountId,
        value: Rate,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        self.require_admin(caller)?;
        if value.as_decimal() <= Decimal::ZERO {
            return Err(LendingError::InvalidConfiguration {
                message: "ltv ceiling must be positive".to_string(),
            });
        }
        let old_value = self.config.ltv;
        self.config.ltv = value;
        self.events.emit(Event::LtvChanged {
            old_value,
            new_value: value,
            timestamp: time_provider.now(),
        });
        Ok(())
    }

    pub fn set_interest_rate_to_company(
        &mut self,
        caller: &AccountId,
        value: u32,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        self.require_admin(caller)?;
        if value > 100 {
            return Err(LendingError::InvalidConfiguration {
                message: format!("interest rate to company {value} exceeds 100 percent"),
            });
        }
        let old_value = self.config.interest_rate_to_company;
        self.config.interest_rate_to_company = value;
        self.events.emit(Event::InterestRateToCompanyChanged {
            old_value,
            new_value: value,
            timestamp: time_provider.now(),
        });
        Ok(())
    }

    pub fn set_interest_rate_to_lender(
        &mut self,
        caller: &AccountId,
        value: u32,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        self.require_admin(caller)?;
        if value > 100 {
            return Err(LendingError::InvalidConfiguration {
                message: format!("interest rate to lender {value} exceeds 100 percent"),
            });
        }
        let old_value = self.config.interest_rate_to_lender;
        self.config.interest_rate_to_lender = value;
        self.events.emit(Event::InterestRateToLenderChanged {
            old_value,
            new_value: value,
            timestamp: time_provider.now(),
        });
        Ok(())
    }

    fn require_admin(&self, caller: &AccountId) -> Result<()> {
        if *caller != self.admin {
            return Err(LendingError::Unauthorized { account: *caller });
        }
        Ok(())
    }
}
