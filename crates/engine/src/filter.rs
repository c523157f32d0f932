//! Filter layer: turns loosely shaped query parameters into a [`FilterSpec`]
//! and applies it to entries.

use crate::{
    EngineError, ResultEngine,
    entry::BudgetEntry,
    error::FieldIssue,
    labels::{AccountCategory, Department},
    validate::{parse_account_category, parse_department, parse_month, parse_year},
};

/// Query parameters as received. Empty strings count as absent.
#[derive(Clone, Debug, Default)]
pub struct FilterInput {
    pub start_month: Option<String>,
    pub end_month: Option<String>,
    pub year: Option<String>,
    pub departments: Vec<String>,
    pub account_categories: Vec<String>,
    /// Parameters the caller could not decode, such as a single-valued key
    /// given twice.
    pub rejected: Vec<FieldIssue>,
}

/// Canonical filter. `None` / empty sets impose no restriction; the
/// dimensions combine with AND.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterSpec {
    pub start_month: Option<u8>,
    pub end_month: Option<u8>,
    pub year: Option<i32>,
    pub departments: Vec<Department>,
    pub account_categories: Vec<AccountCategory>,
}

impl FilterSpec {
    /// A filter that lets every entry through.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn matches(&self, entry: &BudgetEntry) -> bool {
        self.start_month.is_none_or(|start| entry.month >= start)
            && self.end_month.is_none_or(|end| entry.month <= end)
            && self.year.is_none_or(|year| entry.year == year)
            && (self.departments.is_empty() || self.departments.contains(&entry.department))
            && (self.account_categories.is_empty()
                || self.account_categories.contains(&entry.account_category))
    }

    pub fn apply<'a, I>(&'a self, entries: I) -> impl Iterator<Item = &'a BudgetEntry>
    where
        I: IntoIterator<Item = &'a BudgetEntry>,
        I::IntoIter: 'a,
    {
        entries.into_iter().filter(move |entry| self.matches(entry))
    }
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn number(field: &str, raw: &str) -> Result<i64, FieldIssue> {
    raw.parse::<i64>()
        .map_err(|_| FieldIssue::new(field, format!("\"{raw}\" is not a number")))
}

fn keep<T>(issues: &mut Vec<FieldIssue>, result: Result<T, FieldIssue>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(issue) => {
            issues.push(issue);
            None
        }
    }
}

impl TryFrom<FilterInput> for FilterSpec {
    type Error = EngineError;

    fn try_from(input: FilterInput) -> ResultEngine<Self> {
        let mut issues = input.rejected;

        let start_month = non_empty(input.start_month).and_then(|raw| {
            let month = number("startMonth", &raw).and_then(|n| parse_month("startMonth", n));
            keep(&mut issues, month)
        });
        let end_month = non_empty(input.end_month).and_then(|raw| {
            let month = number("endMonth", &raw).and_then(|n| parse_month("endMonth", n));
            keep(&mut issues, month)
        });
        let year = non_empty(input.year).and_then(|raw| {
            let year = number("year", &raw).and_then(|n| parse_year("year", n));
            keep(&mut issues, year)
        });

        let mut departments = Vec::new();
        for raw in input.departments.iter().filter(|s| !s.is_empty()) {
            if let Some(department) = keep(&mut issues, parse_department("departments", raw))
                && !departments.contains(&department)
            {
                departments.push(department);
            }
        }

        let mut account_categories = Vec::new();
        for raw in input.account_categories.iter().filter(|s| !s.is_empty()) {
            let parsed = parse_account_category("accountCategories", raw);
            if let Some(category) = keep(&mut issues, parsed)
                && !account_categories.contains(&category)
            {
                account_categories.push(category);
            }
        }

        if !issues.is_empty() {
            return Err(EngineError::Validation(issues));
        }

        Ok(FilterSpec {
            start_month,
            end_month,
            year,
            departments,
            account_categories,
        })
    }
}
