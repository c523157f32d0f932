//! CSV payloads: full export, filtered table export and the import template.
//!
//! All three start with a UTF-8 byte-order mark so spreadsheet tools pick the
//! right encoding for the Korean labels. Text fields are quoted, numbers are
//! not, lines end with `\n`.

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::{
    EngineError, ResultEngine,
    entry::BudgetEntry,
    labels::{AccountCategory, Department},
};

pub const BOM: char = '\u{FEFF}';

const EXPORT_HEADER: [&str; 8] = [
    "ID", "부서", "계정과목", "월", "연도", "예산", "실제", "집행률",
];
const TABLE_HEADER: [&str; 7] = ["부서", "계정과목", "월", "연도", "예산", "실제", "집행률"];
const TEMPLATE_HEADER: [&str; 6] = ["부서", "계정과목", "월", "연도", "예산", "실제"];

fn amount(value: f64) -> String {
    value.to_string()
}

fn rate(value: f64) -> String {
    format!("{value:.2}")
}

fn write_csv<const N: usize>(header: [&str; N], rows: Vec<[String; N]>) -> ResultEngine<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::NonNumeric)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(vec![]);

    writer
        .write_record(header)
        .map_err(|err| EngineError::Export(err.to_string()))?;
    for row in rows {
        writer
            .write_record(&row)
            .map_err(|err| EngineError::Export(err.to_string()))?;
    }

    let data = writer
        .into_inner()
        .map_err(|err| EngineError::Export(err.to_string()))?;
    let body = String::from_utf8(data).map_err(|err| EngineError::Export(err.to_string()))?;

    let mut out = String::with_capacity(body.len() + BOM.len_utf8());
    out.push(BOM);
    out.push_str(&body);
    Ok(out)
}

/// Every entry with its id and derived rate.
pub fn entries_csv(entries: &[BudgetEntry]) -> ResultEngine<String> {
    let rows = entries
        .iter()
        .map(|e| {
            [
                e.id.clone(),
                e.department.to_string(),
                e.account_category.to_string(),
                e.month.to_string(),
                e.year.to_string(),
                amount(e.budget_amount),
                amount(e.actual_amount),
                rate(e.execution_rate),
            ]
        })
        .collect();
    write_csv(EXPORT_HEADER, rows)
}

/// The dashboard table download: like [`entries_csv`] without the id.
pub fn table_csv(entries: &[BudgetEntry]) -> ResultEngine<String> {
    let rows = entries
        .iter()
        .map(|e| {
            [
                e.department.to_string(),
                e.account_category.to_string(),
                e.month.to_string(),
                e.year.to_string(),
                amount(e.budget_amount),
                amount(e.actual_amount),
                rate(e.execution_rate),
            ]
        })
        .collect();
    write_csv(TABLE_HEADER, rows)
}

/// Header plus two example rows documenting the bulk-import shape. No id and
/// no rate: both are derived by the store.
pub fn template_csv() -> ResultEngine<String> {
    let example = |department: Department,
                   category: AccountCategory,
                   month: u8,
                   budget: f64,
                   actual: f64| {
        [
            department.to_string(),
            category.to_string(),
            month.to_string(),
            "2025".to_string(),
            amount(budget),
            amount(actual),
        ]
    };
    let rows = vec![
        example(
            Department::ALL[0],
            AccountCategory::ALL[0],
            1,
            10_000_000.0,
            8_000_000.0,
        ),
        example(
            Department::ALL[1],
            AccountCategory::ALL[1],
            2,
            15_000_000.0,
            12_000_000.0,
        ),
    ];
    write_csv(TEMPLATE_HEADER, rows)
}
