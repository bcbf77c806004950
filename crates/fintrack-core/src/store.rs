//! Stateful facade owning the in-memory snapshot and its persistence.

use std::{io::Write, sync::Arc};

use chrono::NaiveDate;
use fintrack_domain::{
    Budget, BudgetPatch, Category, DateWindow, FinanceSnapshot, Goal, GoalPatch, NewBudget,
    NewGoal, NewTransaction, Period, Transaction, TransactionKind, TransactionPatch, UserPatch,
    UserProfile,
};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
    budget_service::BudgetService,
    category_service::CategoryService,
    export::CsvExporter,
    format::Language,
    goal_service::GoalService,
    ids::{IdGenerator, RandomIds},
    storage::{snapshot_warnings, SnapshotStorage},
    summary_service::{
        BudgetComparison, CategorySpending, FinancialSummary, GoalProgress, PeriodTotals,
        SummaryService, TrendStats,
    },
    time::{Clock, SystemClock},
    transaction_service::TransactionService,
    user_service::UserService,
    CoreError,
};

const MAX_ID_ATTEMPTS: usize = 64;

/// Behaviour switches for [`FinanceStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// When set, adding an expense adds its magnitude to `spent` on every budget
    /// with the same category.
    pub cascade_expenses_into_budgets: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            cascade_expenses_into_budgets: true,
        }
    }
}

/// Where the in-memory state came from on the last load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadSource {
    /// Nothing was persisted; the sample dataset was used.
    #[default]
    Seeded,
    /// Every key decoded cleanly.
    Persisted,
    /// Some keys were missing or malformed and fell back to defaults.
    Partial,
    /// The backend could not be read at all; the sample dataset was used.
    Fallback,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub source: LoadSource,
    /// Keys that fell back to defaults, or the read error.
    pub warnings: Vec<String>,
    /// Dangling references and duplicate ids found in the loaded data.
    pub integrity: Vec<String>,
}

/// Owns the finance snapshot, applies mutations through the services and
/// persists the whole snapshot after every successful change.
///
/// Persistence failures are logged and never roll back the in-memory change.
pub struct FinanceStore {
    snapshot: FinanceSnapshot,
    storage: Box<dyn SnapshotStorage>,
    clock: Arc<dyn Clock>,
    ids: Box<dyn IdGenerator>,
    options: StoreOptions,
    load_report: LoadReport,
}

impl FinanceStore {
    /// Opens a store over `storage` with the system clock and random ids.
    pub fn open(storage: Box<dyn SnapshotStorage>) -> Self {
        Self::with_parts(
            storage,
            Arc::new(SystemClock),
            Box::new(RandomIds),
            StoreOptions::default(),
        )
    }

    pub fn with_parts(
        storage: Box<dyn SnapshotStorage>,
        clock: Arc<dyn Clock>,
        ids: Box<dyn IdGenerator>,
        options: StoreOptions,
    ) -> Self {
        let (snapshot, load_report) = load_snapshot(storage.as_ref());
        Self {
            snapshot,
            storage,
            clock,
            ids,
            options,
            load_report,
        }
    }

    /// Replaces in-memory state with whatever the backend holds now.
    pub fn reload(&mut self) -> &LoadReport {
        let (snapshot, report) = load_snapshot(self.storage.as_ref());
        self.snapshot = snapshot;
        self.load_report = report;
        &self.load_report
    }

    pub fn load_report(&self) -> &LoadReport {
        &self.load_report
    }

    pub fn options(&self) -> StoreOptions {
        self.options
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Writes the current snapshot, surfacing the storage error to the caller.
    pub fn save(&self) -> Result<(), CoreError> {
        self.storage.save(&self.snapshot)
    }

    // ---------------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------------

    pub fn user(&self) -> UserProfile {
        self.snapshot.user.clone()
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.snapshot.transactions.clone()
    }

    pub fn budgets(&self) -> Vec<Budget> {
        self.snapshot.budgets.clone()
    }

    pub fn goals(&self) -> Vec<Goal> {
        self.snapshot.goals.clone()
    }

    pub fn categories(&self) -> Vec<Category> {
        self.snapshot.categories.clone()
    }

    pub fn snapshot(&self) -> FinanceSnapshot {
        self.snapshot.clone()
    }

    pub fn transaction(&self, id: Uuid) -> Option<Transaction> {
        TransactionService::find(&self.snapshot, id).cloned()
    }

    pub fn budget(&self, id: Uuid) -> Option<Budget> {
        BudgetService::find(&self.snapshot, id).cloned()
    }

    pub fn goal(&self, id: Uuid) -> Option<Goal> {
        GoalService::find(&self.snapshot, id).cloned()
    }

    pub fn category(&self, name: &str) -> Option<Category> {
        CategoryService::find(&self.snapshot, name).cloned()
    }

    /// Categories that can be picked for a transaction of `kind`.
    pub fn categories_for(&self, kind: TransactionKind) -> Vec<Category> {
        CategoryService::for_kind(&self.snapshot, kind)
            .into_iter()
            .cloned()
            .collect()
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    pub fn add_transaction(&mut self, new: NewTransaction) -> Transaction {
        let id = self.fresh_id();
        let txn = TransactionService::add(
            &mut self.snapshot,
            new.into_transaction(id, self.clock.today()),
        );
        if self.options.cascade_expenses_into_budgets && txn.is_expense() {
            let touched =
                BudgetService::apply_expense(&mut self.snapshot, &txn.category, txn.magnitude());
            debug!(category = %txn.category, touched, "expense applied to budgets");
        }
        debug!(id = %txn.id, kind = %txn.kind, amount = txn.amount, "transaction added");
        self.persist();
        txn
    }

    pub fn update_transaction(&mut self, id: Uuid, patch: TransactionPatch) -> Option<Transaction> {
        let updated = TransactionService::update(&mut self.snapshot, id, patch);
        self.after_change("transaction", "updated", id, updated.is_some());
        updated
    }

    pub fn delete_transaction(&mut self, id: Uuid) -> Option<Transaction> {
        let removed = TransactionService::remove(&mut self.snapshot, id);
        self.after_change("transaction", "deleted", id, removed.is_some());
        removed
    }

    pub fn add_budget(&mut self, new: NewBudget) -> Budget {
        let id = self.fresh_id();
        let budget = BudgetService::add(&mut self.snapshot, new.into_budget(id));
        debug!(id = %budget.id, category = %budget.category, "budget added");
        self.persist();
        budget
    }

    pub fn update_budget(&mut self, id: Uuid, patch: BudgetPatch) -> Option<Budget> {
        let updated = BudgetService::update(&mut self.snapshot, id, patch);
        self.after_change("budget", "updated", id, updated.is_some());
        updated
    }

    pub fn delete_budget(&mut self, id: Uuid) -> Option<Budget> {
        let removed = BudgetService::remove(&mut self.snapshot, id);
        self.after_change("budget", "deleted", id, removed.is_some());
        removed
    }

    pub fn add_goal(&mut self, new: NewGoal) -> Goal {
        let id = self.fresh_id();
        let goal = GoalService::add(&mut self.snapshot, new.into_goal(id));
        debug!(id = %goal.id, title = %goal.title, "goal added");
        self.persist();
        goal
    }

    pub fn update_goal(&mut self, id: Uuid, patch: GoalPatch) -> Option<Goal> {
        let updated = GoalService::update(&mut self.snapshot, id, patch);
        self.after_change("goal", "updated", id, updated.is_some());
        updated
    }

    /// Sets the saved amount of a goal, clamped to its target.
    pub fn update_goal_progress(&mut self, id: Uuid, amount: f64) -> Option<Goal> {
        let updated = GoalService::update_progress(&mut self.snapshot, id, amount);
        self.after_change("goal", "progress updated", id, updated.is_some());
        updated
    }

    pub fn delete_goal(&mut self, id: Uuid) -> Option<Goal> {
        let removed = GoalService::remove(&mut self.snapshot, id);
        self.after_change("goal", "deleted", id, removed.is_some());
        removed
    }

    /// Appends a category. Names are not required to be unique.
    pub fn add_category(&mut self, category: Category) -> Category {
        let added = CategoryService::add(&mut self.snapshot, category);
        debug!(name = %added.name, kind = %added.kind, "category added");
        self.persist();
        added
    }

    pub fn update_user(&mut self, patch: UserPatch) -> UserProfile {
        let user = UserService::update(&mut self.snapshot, patch);
        debug!("user profile updated");
        self.persist();
        user
    }

    /// Restores the sample dataset and removes everything persisted.
    pub fn reset_to_defaults(&mut self) {
        self.snapshot = FinanceSnapshot::seeded();
        self.load_report = LoadReport::default();
        if let Err(err) = self.storage.clear() {
            error!(error = %err, "failed to clear persisted finance data");
        }
        info!("finance data reset to defaults");
    }

    // ---------------------------------------------------------------------
    // Derived queries
    // ---------------------------------------------------------------------

    pub fn total_income(&self, period: Option<Period>) -> f64 {
        SummaryService::total_income(&self.snapshot, self.window(period))
    }

    pub fn total_expenses(&self, period: Option<Period>) -> f64 {
        SummaryService::total_expenses(&self.snapshot, self.window(period))
    }

    pub fn balance(&self, period: Option<Period>) -> f64 {
        SummaryService::balance(&self.snapshot, self.window(period))
    }

    pub fn total_savings(&self) -> f64 {
        SummaryService::total_savings(&self.snapshot)
    }

    pub fn savings_rate(&self, period: Option<Period>) -> f64 {
        SummaryService::savings_rate(&self.snapshot, self.window(period))
    }

    pub fn total_budget_limit(&self) -> f64 {
        SummaryService::total_budget_limit(&self.snapshot)
    }

    pub fn total_budget_spent(&self) -> f64 {
        SummaryService::total_budget_spent(&self.snapshot)
    }

    pub fn budget_utilization(&self) -> f64 {
        SummaryService::budget_utilization(&self.snapshot)
    }

    pub fn recent_transactions(&self, limit: usize) -> Vec<Transaction> {
        TransactionService::recent(&self.snapshot, limit)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn transactions_by_category(&self, category: &str) -> Vec<Transaction> {
        TransactionService::by_category(&self.snapshot, category)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn financial_summary(&self, period: Option<Period>) -> FinancialSummary {
        SummaryService::summarize(&self.snapshot, self.window(period))
    }

    pub fn spending_by_category(&self, period: Option<Period>) -> Vec<CategorySpending> {
        SummaryService::spending_by_category(&self.snapshot, self.window(period))
    }

    /// Income and expenses per calendar bucket over every transaction.
    pub fn series(&self, period: Period) -> Vec<PeriodTotals> {
        SummaryService::series(&self.snapshot, period)
    }

    pub fn trend(&self, period: Period) -> TrendStats {
        SummaryService::trend(&self.snapshot, period)
    }

    pub fn budget_vs_actual(&self) -> Vec<BudgetComparison> {
        SummaryService::budget_vs_actual(&self.snapshot)
    }

    pub fn over_budget(&self) -> Vec<Budget> {
        BudgetService::over_budget(&self.snapshot)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Goals with progress, days left and status as of today.
    pub fn goal_progress(&self) -> Vec<GoalProgress> {
        SummaryService::goal_progress(&self.snapshot, self.clock.today())
    }

    // ---------------------------------------------------------------------
    // Export
    // ---------------------------------------------------------------------

    /// Exporter using the profile's language and currency.
    pub fn exporter(&self) -> CsvExporter {
        CsvExporter::new(
            Language::from_code(&self.snapshot.user.language),
            self.snapshot.user.currency.clone(),
        )
    }

    pub fn export_transactions_csv<W: Write>(&self, writer: W) -> Result<(), CoreError> {
        self.exporter()
            .transactions(writer, &self.snapshot.transactions)
    }

    pub fn export_budgets_csv<W: Write>(&self, writer: W) -> Result<(), CoreError> {
        self.exporter().budgets(writer, &self.snapshot.budgets)
    }

    pub fn export_goals_csv<W: Write>(&self, writer: W) -> Result<(), CoreError> {
        self.exporter().goals(writer, &self.snapshot.goals)
    }

    pub fn export_report_csv<W: Write>(&self, writer: W) -> Result<(), CoreError> {
        self.exporter().report(
            writer,
            &self.snapshot.transactions,
            &self.snapshot.budgets,
            &self.snapshot.goals,
            self.clock.today(),
        )
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    fn window(&self, period: Option<Period>) -> Option<DateWindow> {
        period.map(|period| period.window_containing(self.clock.today()))
    }

    fn after_change(&self, entity: &str, action: &str, id: Uuid, changed: bool) {
        if changed {
            debug!(%id, "{entity} {action}");
            self.persist();
        } else {
            debug!(%id, "{entity} not found; nothing {action}");
        }
    }

    fn persist(&self) {
        if let Err(err) = self.storage.save(&self.snapshot) {
            error!(error = %err, "failed to persist finance data; keeping in-memory state");
        }
    }

    fn fresh_id(&mut self) -> Uuid {
        let mut id = self.ids.next_id();
        for _ in 1..MAX_ID_ATTEMPTS {
            if !self.id_in_use(id) {
                return id;
            }
            warn!(%id, "generated id already in use; drawing another");
            id = self.ids.next_id();
        }
        id
    }

    fn id_in_use(&self, id: Uuid) -> bool {
        self.snapshot.transactions.iter().any(|txn| txn.id == id)
            || self.snapshot.budgets.iter().any(|budget| budget.id == id)
            || self.snapshot.goals.iter().any(|goal| goal.id == id)
    }
}

fn load_snapshot(storage: &dyn SnapshotStorage) -> (FinanceSnapshot, LoadReport) {
    let value = match storage.load() {
        Ok(Some(value)) => value,
        Ok(None) => {
            info!("no persisted finance data; starting from sample data");
            return (FinanceSnapshot::seeded(), LoadReport::default());
        }
        Err(err) => {
            error!(error = %err, "failed to read persisted finance data; starting from sample data");
            let report = LoadReport {
                source: LoadSource::Fallback,
                warnings: vec![err.to_string()],
                integrity: Vec::new(),
            };
            return (FinanceSnapshot::seeded(), report);
        }
    };

    let (snapshot, warnings) = FinanceSnapshot::from_value_lenient(value);
    for warning in &warnings {
        warn!(%warning, "persisted finance data fell back to defaults");
    }
    let integrity = snapshot_warnings(&snapshot);
    for issue in &integrity {
        debug!(%issue, "finance data integrity");
    }
    let source = if warnings.is_empty() {
        LoadSource::Persisted
    } else {
        LoadSource::Partial
    };
    info!(
        transactions = snapshot.transactions.len(),
        budgets = snapshot.budgets.len(),
        goals = snapshot.goals.len(),
        "finance data loaded"
    );
    (
        snapshot,
        LoadReport {
            source,
            warnings,
            integrity,
        },
    )
}
