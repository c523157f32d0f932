//! Aggregations over already fetched entries.
//!
//! Everything here is a pure function of its inputs. Group rates are always
//! computed from the summed totals of the group, never as an average of the
//! per-entry rates, so small budget lines do not skew a group.

use std::collections::HashMap;
use std::hash::Hash;

use crate::{
    entry::BudgetEntry,
    labels::{AccountCategory, Department},
    settlement::{MONTHS, execution_rate, projected_annual, target_rate},
};

/// Budget and actual totals of one group of entries.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Totals {
    pub budget: f64,
    pub actual: f64,
}

impl Totals {
    fn add(&mut self, entry: &BudgetEntry) {
        self.budget += entry.budget_amount;
        self.actual += entry.actual_amount;
    }

    pub fn execution_rate(&self) -> f64 {
        execution_rate(self.budget, self.actual)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DepartmentTotals {
    pub department: Department,
    pub totals: Totals,
    pub execution_rate: f64,
    pub projected_annual: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CategoryTotals {
    pub account_category: AccountCategory,
    pub totals: Totals,
    pub execution_rate: f64,
}

/// One point of the cumulative monthly execution series.
#[derive(Clone, Debug, PartialEq)]
pub struct MonthlyPoint {
    pub month: u8,
    /// `None` for months past the settlement month: not settled yet, which
    /// is not the same as nothing executed.
    pub execution_rate: Option<f64>,
    pub target_rate: f64,
    pub is_projected: bool,
}

/// How an execution rate compares with the dashboard thresholds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutionTrend {
    High,
    Normal,
    Low,
}

impl ExecutionTrend {
    pub fn classify(rate: f64) -> Self {
        if rate > 75.0 {
            Self::High
        } else if rate > 60.0 {
            Self::Normal
        } else {
            Self::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Normal => "normal",
            Self::Low => "low",
        }
    }
}

/// Where the annualized spend lands relative to the total budget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BudgetStatus {
    WithinBudget,
    OverrunExpected,
}

impl BudgetStatus {
    pub fn classify(projected_annual: f64, total_budget: f64) -> Self {
        if projected_annual < total_budget {
            Self::WithinBudget
        } else {
            Self::OverrunExpected
        }
    }
}

/// Headline figures over a set of entries.
#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    pub total_budget: f64,
    pub settled_budget: f64,
    pub total_actual: f64,
    pub execution_rate: f64,
    pub projected_annual: f64,
    pub remaining_budget: f64,
    pub settlement_month: u8,
    pub trend: ExecutionTrend,
    pub budget_status: BudgetStatus,
}

/// Sum entries per key, keeping the groups in the order given by `order`.
/// Keys without entries are left out.
fn group_by<'a, K, I>(
    entries: I,
    order: &[K],
    key: impl Fn(&BudgetEntry) -> K,
) -> Vec<(K, Totals)>
where
    K: Copy + Eq + Hash,
    I: IntoIterator<Item = &'a BudgetEntry>,
{
    let mut groups: HashMap<K, Totals> = HashMap::new();
    for entry in entries {
        groups.entry(key(entry)).or_default().add(entry);
    }

    order
        .iter()
        .filter_map(|k| groups.remove(k).map(|totals| (*k, totals)))
        .collect()
}

pub fn aggregate_by_department<'a, I>(entries: I, settlement_month: u8) -> Vec<DepartmentTotals>
where
    I: IntoIterator<Item = &'a BudgetEntry>,
{
    group_by(entries, &Department::ALL, |e| e.department)
        .into_iter()
        .map(|(department, totals)| DepartmentTotals {
            department,
            totals,
            execution_rate: totals.execution_rate(),
            projected_annual: projected_annual(totals.actual, settlement_month),
        })
        .collect()
}

pub fn aggregate_by_category<'a, I>(entries: I) -> Vec<CategoryTotals>
where
    I: IntoIterator<Item = &'a BudgetEntry>,
{
    group_by(entries, &AccountCategory::ALL, |e| e.account_category)
        .into_iter()
        .map(|(account_category, totals)| CategoryTotals {
            account_category,
            totals,
            execution_rate: totals.execution_rate(),
        })
        .collect()
}

/// Cumulative execution rate for each month of the year.
///
/// For month `m`, budget is summed over entries up to `min(m, settlement)`
/// and actual over entries up to `m` that are also settled. Months after the
/// settlement month get no rate, but every month gets its pacing target.
pub fn monthly_series<'a, I>(entries: I, settlement_month: u8) -> Vec<MonthlyPoint>
where
    I: IntoIterator<Item = &'a BudgetEntry>,
{
    let entries: Vec<&BudgetEntry> = entries.into_iter().collect();
    (1..=MONTHS)
        .map(|month| {
            let budget_cutoff = month.min(settlement_month);
            let budget: f64 = entries
                .iter()
                .filter(|e| e.month <= budget_cutoff)
                .map(|e| e.budget_amount)
                .sum();
            let actual: f64 = entries
                .iter()
                .filter(|e| e.month <= month && e.month <= settlement_month)
                .map(|e| e.actual_amount)
                .sum();
            let settled = month <= settlement_month;

            MonthlyPoint {
                month,
                execution_rate: settled.then(|| execution_rate(budget, actual)),
                target_rate: target_rate(month),
                is_projected: !settled,
            }
        })
        .collect()
}

pub fn summary<'a, I>(entries: I, settlement_month: u8) -> Summary
where
    I: IntoIterator<Item = &'a BudgetEntry>,
{
    let mut all = Totals::default();
    let mut settled_budget = 0.0;
    for entry in entries {
        all.add(entry);
        if entry.is_settled(settlement_month) {
            settled_budget += entry.budget_amount;
        }
    }

    let rate = execution_rate(settled_budget, all.actual);
    let projected = projected_annual(all.actual, settlement_month);
    Summary {
        total_budget: all.budget,
        settled_budget,
        total_actual: all.actual,
        execution_rate: rate,
        projected_annual: projected,
        remaining_budget: all.budget - all.actual,
        settlement_month,
        trend: ExecutionTrend::classify(rate),
        budget_status: BudgetStatus::classify(projected, all.budget),
    }
}
