//! Settlement rules.
//!
//! The settlement month is the last month whose realized spend is closed.
//! Entries after it cannot carry an actual amount yet; pacing against the
//! plan keeps running for the whole year.

/// Settlement month used when none is configured.
pub const DEFAULT_SETTLEMENT_MONTH: u8 = 9;

/// Months in a budget year.
pub const MONTHS: u8 = 12;

/// `actual / budget * 100`, or `0` when there is no budget. Not rounded.
pub fn execution_rate(budget: f64, actual: f64) -> f64 {
    if budget > 0.0 {
        actual / budget * 100.0
    } else {
        0.0
    }
}

/// The actual amount an entry of `month` may carry.
pub fn settlement_constrained_actual(month: u8, actual: f64, settlement_month: u8) -> f64 {
    if month > settlement_month { 0.0 } else { actual }
}

/// Straight-line pacing benchmark: the share of the year elapsed by the end
/// of `month`.
pub fn target_rate(month: u8) -> f64 {
    f64::from(month) / f64::from(MONTHS) * 100.0
}

/// Straight-line annualization of the spend realized up to the settlement
/// month.
pub fn projected_annual(total_actual: f64, settlement_month: u8) -> f64 {
    if settlement_month == 0 {
        return 0.0;
    }
    total_actual / f64::from(settlement_month) * f64::from(MONTHS)
}
