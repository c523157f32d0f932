//! Wire types of the budget dashboard HTTP API.
//!
//! JSON bodies are camelCase. Department and account-category labels travel
//! as their display strings.
use serde::{Deserialize, Serialize};

pub mod budget {
    use super::*;

    /// A stored budget entry.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BudgetEntry {
        pub id: String,
        pub department: String,
        pub account_category: String,
        pub month: u8,
        pub year: i32,
        pub budget_amount: f64,
        pub actual_amount: f64,
        pub execution_rate: f64,
    }

    /// Request body for creating an entry.
    ///
    /// Every field is optional on the wire so that a missing field is
    /// reported next to the invalid ones instead of failing the whole body.
    /// `id` and `executionRate` are not accepted: the server derives them.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BudgetEntryNew {
        pub department: Option<String>,
        pub account_category: Option<String>,
        pub month: Option<i64>,
        pub year: Option<i64>,
        pub budget_amount: Option<f64>,
        pub actual_amount: Option<f64>,
    }

    /// Request body for a partial update. Absent fields keep their value.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BudgetEntryUpdate {
        pub department: Option<String>,
        pub account_category: Option<String>,
        pub month: Option<i64>,
        pub year: Option<i64>,
        pub budget_amount: Option<f64>,
        pub actual_amount: Option<f64>,
    }

    /// The two fixed label sets.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Labels {
        pub departments: Vec<String>,
        pub account_categories: Vec<String>,
    }
}

pub mod stats {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Trend {
        High,
        Normal,
        Low,
    }

    /// Whether the projected annual spend stays under the total budget.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum BudgetStatus {
        WithinBudget,
        OverrunExpected,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Summary {
        pub total_budget: f64,
        pub settled_budget: f64,
        pub total_actual: f64,
        pub execution_rate: f64,
        pub projected_annual: f64,
        pub remaining_budget: f64,
        pub settlement_month: u8,
        pub trend: Trend,
        pub budget_status: BudgetStatus,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DepartmentSummary {
        pub department: String,
        pub total_budget: f64,
        pub total_actual: f64,
        pub execution_rate: f64,
        pub projected_annual: f64,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AccountCategorySummary {
        pub account_category: String,
        pub total_budget: f64,
        pub total_actual: f64,
        pub execution_rate: f64,
    }

    /// One month of the execution chart. `executionRate` is `null` for
    /// months that are not settled yet.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MonthlyPoint {
        pub month: u8,
        pub execution_rate: Option<f64>,
        pub target_rate: f64,
        pub is_projected: bool,
    }
}

pub mod export {
    use chrono::{DateTime, Utc};

    use super::*;
    use crate::budget::BudgetEntry;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct JsonExport {
        pub export_date: DateTime<Utc>,
        pub settlement_month: u8,
        pub departments: Vec<String>,
        pub account_categories: Vec<String>,
        pub data: Vec<BudgetEntry>,
    }
}

pub mod github {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct User {
        pub login: String,
        pub name: Option<String>,
        pub avatar_url: String,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Repository {
        pub name: String,
        pub full_name: String,
        pub html_url: String,
        pub private: bool,
    }

    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RepositoryNew {
        pub name: Option<String>,
        pub description: Option<String>,
        pub is_private: Option<bool>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RepositoryCreated {
        pub name: String,
        pub full_name: String,
        pub html_url: String,
        pub clone_url: String,
    }
}

pub mod error {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct FieldDetail {
        pub field: String,
        pub message: String,
    }

    /// Body of every non-2xx response.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ErrorBody {
        pub error: String,
        /// Per-field detail of a validation failure.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub details: Option<Vec<FieldDetail>>,
        /// Message relayed from an upstream service.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub message: Option<String>,
    }
}
