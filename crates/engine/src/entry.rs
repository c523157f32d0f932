//! The module contains the `BudgetEntry` type, one planned-vs-realized line
//! of the budget.
//!
//! `actual_amount` and `execution_rate` are derived on every write: callers
//! hand in a [`NewBudgetEntry`] or a [`BudgetEntryPatch`], never a finished
//! entry, and the settlement rules decide what gets stored.
use crate::{
    labels::{AccountCategory, Department},
    settlement::{execution_rate, settlement_constrained_actual},
};

/// A budget line as stored.
#[derive(Clone, Debug, PartialEq)]
pub struct BudgetEntry {
    pub id: String,
    pub department: Department,
    pub account_category: AccountCategory,
    /// 1-12
    pub month: u8,
    pub year: i32,
    pub budget_amount: f64,
    pub actual_amount: f64,
    /// Percentage, unrounded.
    pub execution_rate: f64,
}

/// Caller-supplied fields of a new entry.
#[derive(Clone, Debug, PartialEq)]
pub struct NewBudgetEntry {
    pub department: Department,
    pub account_category: AccountCategory,
    pub month: u8,
    pub year: i32,
    pub budget_amount: f64,
    pub actual_amount: f64,
}

/// Partial update. `None` keeps the stored value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BudgetEntryPatch {
    pub department: Option<Department>,
    pub account_category: Option<AccountCategory>,
    pub month: Option<u8>,
    pub year: Option<i32>,
    pub budget_amount: Option<f64>,
    pub actual_amount: Option<f64>,
}

impl BudgetEntryPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl BudgetEntry {
    /// Build a stored entry, applying the settlement constraint and deriving
    /// the execution rate.
    pub fn new(id: String, fields: NewBudgetEntry, settlement_month: u8) -> Self {
        let actual_amount =
            settlement_constrained_actual(fields.month, fields.actual_amount, settlement_month);
        Self {
            id,
            department: fields.department,
            account_category: fields.account_category,
            month: fields.month,
            year: fields.year,
            budget_amount: fields.budget_amount,
            actual_amount,
            execution_rate: execution_rate(fields.budget_amount, actual_amount),
        }
    }

    /// Merge `patch` onto this entry and re-derive the dependent fields from
    /// the merged values. The id never changes.
    ///
    /// The raw actual amount falls back to the stored one, which is already
    /// constrained: moving a settled entry past the settlement month zeroes
    /// it, moving it back does not resurrect the old value.
    pub fn patched(&self, patch: BudgetEntryPatch, settlement_month: u8) -> Self {
        let merged = NewBudgetEntry {
            department: patch.department.unwrap_or(self.department),
            account_category: patch.account_category.unwrap_or(self.account_category),
            month: patch.month.unwrap_or(self.month),
            year: patch.year.unwrap_or(self.year),
            budget_amount: patch.budget_amount.unwrap_or(self.budget_amount),
            actual_amount: patch.actual_amount.unwrap_or(self.actual_amount),
        };
        Self::new(self.id.clone(), merged, settlement_month)
    }

    /// Whether the entry's month is at or before the settlement month.
    pub fn is_settled(&self, settlement_month: u8) -> bool {
        self.month <= settlement_month
    }
}
