//! Budget-vs-actual engine.
//!
//! [`Engine`] ties the pieces together: validation of client input, the
//! record store, the settlement rules and the aggregations the dashboard
//! charts are drawn from.
use std::sync::Arc;

pub use entry::{BudgetEntry, BudgetEntryPatch, NewBudgetEntry};
pub use error::{EngineError, FieldIssue};
pub use filter::{FilterInput, FilterSpec};
pub use labels::{AccountCategory, Department};
pub use metrics::{
    BudgetStatus, CategoryTotals, DepartmentTotals, ExecutionTrend, MonthlyPoint, Summary, Totals,
};
pub use seed::SeedRng;
pub use settlement::DEFAULT_SETTLEMENT_MONTH;
pub use store::{BudgetStore, MemoryStore};
pub use validate::EntryInput;

pub mod export;
pub mod metrics;
pub mod settlement;

mod entry;
mod error;
mod filter;
mod labels;
mod seed;
mod store;
mod validate;

type ResultEngine<T> = Result<T, EngineError>;

pub struct Engine {
    store: Arc<dyn BudgetStore>,
    settlement_month: u8,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("settlement_month", &self.settlement_month)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn settlement_month(&self) -> u8 {
        self.settlement_month
    }

    /// Every entry, unfiltered.
    pub fn all_entries(&self) -> Vec<BudgetEntry> {
        self.store.get_all()
    }

    /// Entries matching the raw filter parameters.
    pub fn entries(&self, filter: FilterInput) -> ResultEngine<Vec<BudgetEntry>> {
        let spec = FilterSpec::try_from(filter)?;
        Ok(self.query(&spec))
    }

    pub fn query(&self, spec: &FilterSpec) -> Vec<BudgetEntry> {
        let entries = self.store.query(spec);
        tracing::debug!("query matched {} entries", entries.len());
        entries
    }

    pub fn entry(&self, id: &str) -> ResultEngine<BudgetEntry> {
        self.store
            .get(id)
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))
    }

    pub fn create_entry(&self, input: EntryInput) -> ResultEngine<BudgetEntry> {
        let fields = NewBudgetEntry::try_from(input)?;
        Ok(self.store.create(fields))
    }

    /// Validate `input` as a partial update and apply it. An update that
    /// changes nothing returns the stored entry without writing.
    pub fn update_entry(&self, id: &str, input: EntryInput) -> ResultEngine<BudgetEntry> {
        let patch = BudgetEntryPatch::try_from(input)?;
        if patch.is_empty() {
            return self.entry(id);
        }
        self.store.update(id, patch)
    }

    pub fn delete_entry(&self, id: &str) -> ResultEngine<()> {
        if self.store.delete(id) {
            Ok(())
        } else {
            Err(EngineError::KeyNotFound(id.to_string()))
        }
    }

    /// Headline figures over the whole store.
    pub fn summary(&self) -> Summary {
        metrics::summary(&self.store.get_all(), self.settlement_month)
    }

    /// Headline figures over the entries matching the filter.
    pub fn summary_filtered(&self, filter: FilterInput) -> ResultEngine<Summary> {
        let entries = self.entries(filter)?;
        Ok(metrics::summary(&entries, self.settlement_month))
    }

    pub fn department_totals(&self, filter: FilterInput) -> ResultEngine<Vec<DepartmentTotals>> {
        let entries = self.entries(filter)?;
        Ok(metrics::aggregate_by_department(&entries, self.settlement_month))
    }

    pub fn category_totals(&self, filter: FilterInput) -> ResultEngine<Vec<CategoryTotals>> {
        let entries = self.entries(filter)?;
        Ok(metrics::aggregate_by_category(&entries))
    }

    pub fn monthly_series(&self, filter: FilterInput) -> ResultEngine<Vec<MonthlyPoint>> {
        let entries = self.entries(filter)?;
        Ok(metrics::monthly_series(&entries, self.settlement_month))
    }

    /// CSV of the whole store.
    pub fn export_csv(&self) -> ResultEngine<String> {
        export::entries_csv(&self.store.get_all())
    }

    /// CSV of the filtered entries, without ids.
    pub fn export_filtered_csv(&self, filter: FilterInput) -> ResultEngine<String> {
        let entries = self.entries(filter)?;
        export::table_csv(&entries)
    }

    pub fn template_csv(&self) -> ResultEngine<String> {
        export::template_csv()
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    settlement_month: Option<u8>,
    store: Option<Arc<dyn BudgetStore>>,
    seed_year: Option<i32>,
    rng: Option<SeedRng>,
}

impl EngineBuilder {
    /// Last month with settled actuals. Defaults to
    /// [`DEFAULT_SETTLEMENT_MONTH`].
    pub fn settlement_month(mut self, month: u8) -> EngineBuilder {
        self.settlement_month = Some(month);
        self
    }

    /// Use `store` instead of a fresh [`MemoryStore`]. Building fails when
    /// the store applies a different settlement month than the engine.
    pub fn store(mut self, store: Arc<dyn BudgetStore>) -> EngineBuilder {
        self.store = Some(store);
        self
    }

    /// Seed synthetic entries for `year` when building.
    pub fn seed(mut self, year: i32) -> EngineBuilder {
        self.seed_year = Some(year);
        self
    }

    /// Random source for seeding. Defaults to an entropy-seeded one.
    pub fn seed_rng(mut self, rng: SeedRng) -> EngineBuilder {
        self.rng = Some(rng);
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> ResultEngine<Engine> {
        let settlement_month = self.settlement_month.unwrap_or(DEFAULT_SETTLEMENT_MONTH);
        if settlement_month > settlement::MONTHS {
            return Err(EngineError::InvalidSettings(format!(
                "settlement month must be between 0 and {}, got {settlement_month}",
                settlement::MONTHS
            )));
        }

        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryStore::new(settlement_month)));
        if store.settlement_month() != settlement_month {
            return Err(EngineError::InvalidSettings(format!(
                "store settles at month {}, engine at month {settlement_month}",
                store.settlement_month()
            )));
        }

        if let Some(year) = self.seed_year {
            let mut rng = self.rng.unwrap_or_else(SeedRng::from_entropy);
            seed::seed_store(store.as_ref(), year, settlement_month, &mut rng);
        }

        Ok(Engine {
            store,
            settlement_month,
        })
    }
}
