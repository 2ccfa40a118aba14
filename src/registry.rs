use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{LendingError, Result};
use crate::loan::Loan;
use crate::types::LoanId;

/// append-only collection of loans; the source of truth for all state.
/// ids increase monotonically and are never reused, records are never deleted.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoanRegistry {
    loans: BTreeMap<LoanId, Loan>,
    next_id: LoanId,
}

impl Default for LoanRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LoanRegistry {
    pub fn new() -> Self {
        Self {
            loans: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// hand out the id the next appended loan will carry
    pub(crate) fn allocate_id(&mut self) -> LoanId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(crate) fn append(&mut self, loan: Loan) {
        self.loans.insert(loan.id, loan);
    }

    pub fn get(&self, id: LoanId) -> Result<&Loan> {
        self.loans.get(&id).ok_or(LendingError::LoanNotFound { id })
    }

    pub(crate) fn get_mut(&mut self, id: LoanId) -> Result<&mut Loan> {
        self.loans
            .get_mut(&id)
            .ok_or(LendingError::LoanNotFound { id })
    }

    pub fn len(&self) -> usize {
        self.loans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loans.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Loan> {
        self.loans.values()
    }

    /// json export of the full registry for audit
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
