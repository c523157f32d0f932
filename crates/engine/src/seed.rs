//! Synthetic data for a freshly started store.
//!
//! One entry per department, category and month of `year`. Budgets fall in
//! `[10_000_000, 40_000_000)`; settled months realize 50-90% of their
//! budget, later months nothing.

use uuid::Uuid;

use crate::{
    entry::NewBudgetEntry,
    labels::{AccountCategory, Department},
    settlement::MONTHS,
    store::BudgetStore,
};

/// Small splitmix64 generator. Deterministic for a given seed, which keeps
/// seeded stores reproducible in tests.
#[derive(Clone, Debug)]
pub struct SeedRng(u64);

impl SeedRng {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Seeded from a random v4 uuid.
    pub fn from_entropy() -> Self {
        let bits = Uuid::new_v4().as_u128();
        Self((bits >> 64) as u64 ^ bits as u64)
    }

    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// The synthetic entries for `year`, before they reach a store.
pub fn synthetic_entries(
    year: i32,
    settlement_month: u8,
    rng: &mut SeedRng,
) -> Vec<NewBudgetEntry> {
    let capacity = Department::ALL.len() * AccountCategory::ALL.len() * usize::from(MONTHS);
    let mut entries = Vec::with_capacity(capacity);

    for department in Department::ALL {
        for account_category in AccountCategory::ALL {
            for month in 1..=MONTHS {
                let budget_amount = (rng.next_f64() * 30_000_000.0).floor() + 10_000_000.0;
                let actual_amount = if month <= settlement_month {
                    (budget_amount * (0.5 + rng.next_f64() * 0.4)).floor()
                } else {
                    0.0
                };
                entries.push(NewBudgetEntry {
                    department,
                    account_category,
                    month,
                    year,
                    budget_amount,
                    actual_amount,
                });
            }
        }
    }

    entries
}

/// Fill `store` with the synthetic entries for `year`. Returns how many were
/// created.
pub fn seed_store(
    store: &dyn BudgetStore,
    year: i32,
    settlement_month: u8,
    rng: &mut SeedRng,
) -> usize {
    let entries = synthetic_entries(year, settlement_month, rng);
    let count = entries.len();
    for fields in entries {
        store.create(fields);
    }
    tracing::info!("seeded {count} budget entries for {year}");
    count
}
