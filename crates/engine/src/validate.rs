//! Boundary validation of entry fields.
//!
//! Raw client input arrives as [`EntryInput`] (every field optional, labels
//! as plain strings). Converting it into a [`NewBudgetEntry`] or a
//! [`BudgetEntryPatch`] checks each field on its own and reports all the
//! offending ones together.

use crate::{
    EngineError, ResultEngine,
    entry::{BudgetEntryPatch, NewBudgetEntry},
    error::FieldIssue,
    labels::{AccountCategory, Department},
    settlement::MONTHS,
};

/// Unvalidated entry fields as received from a client.
#[derive(Clone, Debug, Default)]
pub struct EntryInput {
    pub department: Option<String>,
    pub account_category: Option<String>,
    pub month: Option<i64>,
    pub year: Option<i64>,
    pub budget_amount: Option<f64>,
    pub actual_amount: Option<f64>,
    /// Fields the caller could not decode at all (wrong JSON type and the
    /// like). They are reported together with the value checks below.
    pub rejected: Vec<FieldIssue>,
}

#[derive(Default)]
struct Checked {
    department: Option<Department>,
    account_category: Option<AccountCategory>,
    month: Option<u8>,
    year: Option<i32>,
    budget_amount: Option<f64>,
    actual_amount: Option<f64>,
    issues: Vec<FieldIssue>,
}

pub(crate) fn parse_department(field: &str, raw: &str) -> Result<Department, FieldIssue> {
    Department::from_label(raw)
        .ok_or_else(|| FieldIssue::new(field, format!("unknown department \"{raw}\"")))
}

pub(crate) fn parse_account_category(
    field: &str,
    raw: &str,
) -> Result<AccountCategory, FieldIssue> {
    AccountCategory::from_label(raw)
        .ok_or_else(|| FieldIssue::new(field, format!("unknown account category \"{raw}\"")))
}

pub(crate) fn parse_month(field: &str, raw: i64) -> Result<u8, FieldIssue> {
    u8::try_from(raw)
        .ok()
        .filter(|m| (1..=MONTHS).contains(m))
        .ok_or_else(|| FieldIssue::new(field, format!("must be between 1 and {MONTHS}")))
}

pub(crate) fn parse_year(field: &str, raw: i64) -> Result<i32, FieldIssue> {
    i32::try_from(raw).map_err(|_| FieldIssue::new(field, "out of range"))
}

fn parse_amount(field: &str, raw: f64) -> Result<f64, FieldIssue> {
    if raw.is_finite() && raw >= 0.0 {
        Ok(raw)
    } else {
        Err(FieldIssue::new(field, "must be a non-negative number"))
    }
}

fn check<T, R>(
    issues: &mut Vec<FieldIssue>,
    raw: Option<R>,
    parse: impl FnOnce(R) -> Result<T, FieldIssue>,
) -> Option<T> {
    match raw.map(parse) {
        Some(Ok(value)) => Some(value),
        Some(Err(issue)) => {
            issues.push(issue);
            None
        }
        None => None,
    }
}

impl EntryInput {
    fn check(self) -> Checked {
        let mut issues = self.rejected;
        let department = check(&mut issues, self.department, |raw| {
            parse_department("department", &raw)
        });
        let account_category = check(&mut issues, self.account_category, |raw| {
            parse_account_category("accountCategory", &raw)
        });
        let month = check(&mut issues, self.month, |raw| parse_month("month", raw));
        let year = check(&mut issues, self.year, |raw| parse_year("year", raw));
        let budget_amount = check(&mut issues, self.budget_amount, |raw| {
            parse_amount("budgetAmount", raw)
        });
        let actual_amount = check(&mut issues, self.actual_amount, |raw| {
            parse_amount("actualAmount", raw)
        });

        Checked {
            department,
            account_category,
            month,
            year,
            budget_amount,
            actual_amount,
            issues,
        }
    }

    /// Whether each field was supplied. A rejected field counts as
    /// supplied: it already has its own issue.
    fn present(&self) -> [(&'static str, bool); 6] {
        let rejected = |field: &str| self.rejected.iter().any(|i| i.field == field);
        [
            ("department", self.department.is_some()),
            ("accountCategory", self.account_category.is_some()),
            ("month", self.month.is_some()),
            ("year", self.year.is_some()),
            ("budgetAmount", self.budget_amount.is_some()),
            ("actualAmount", self.actual_amount.is_some()),
        ]
        .map(|(field, present)| (field, present || rejected(field)))
    }
}

impl TryFrom<EntryInput> for NewBudgetEntry {
    type Error = EngineError;

    fn try_from(input: EntryInput) -> ResultEngine<Self> {
        let missing: Vec<FieldIssue> = input
            .present()
            .into_iter()
            .filter(|(_, present)| !present)
            .map(|(field, _)| FieldIssue::new(field, "required"))
            .collect();

        let mut checked = input.check();
        checked.issues.extend(missing);

        match checked {
            Checked {
                department: Some(department),
                account_category: Some(account_category),
                month: Some(month),
                year: Some(year),
                budget_amount: Some(budget_amount),
                actual_amount: Some(actual_amount),
                issues,
            } if issues.is_empty() => Ok(NewBudgetEntry {
                department,
                account_category,
                month,
                year,
                budget_amount,
                actual_amount,
            }),
            checked => Err(EngineError::Validation(checked.issues)),
        }
    }
}

impl TryFrom<EntryInput> for BudgetEntryPatch {
    type Error = EngineError;

    fn try_from(input: EntryInput) -> ResultEngine<Self> {
        let checked = input.check();
        if !checked.issues.is_empty() {
            return Err(EngineError::Validation(checked.issues));
        }

        Ok(BudgetEntryPatch {
            department: checked.department,
            account_category: checked.account_category,
            month: checked.month,
            year: checked.year,
            budget_amount: checked.budget_amount,
            actual_amount: checked.actual_amount,
        })
    }
}
