//! Derived figures computed from the snapshot on demand.

use chrono::{Datelike, NaiveDate};
use fintrack_domain::{DateWindow, FinanceSnapshot, Goal, GoalStatus, Period};
use serde::Serialize;

use crate::{budget_service::BudgetService, goal_service::GoalService, TransactionService};

/// Aggregate view over one window of transactions plus the current budgets and goals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub balance: f64,
    pub total_savings: f64,
    pub savings_rate: f64,
    pub total_budget_limit: f64,
    pub total_budget_spent: f64,
    pub budget_utilization: f64,
}

/// Expense total for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySpending {
    pub category: String,
    pub total: f64,
    pub transactions: usize,
}

/// A goal together with its figures evaluated against a reference date.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub goal: Goal,
    pub progress_percent: f64,
    pub days_remaining: i64,
    pub status: GoalStatus,
    pub overdue: bool,
}

/// Income and expense totals for one calendar bucket of a series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodTotals {
    /// Sortable bucket key: `2024-W03`, `2024-01`, `2024-Q1` or `2024`.
    pub period: String,
    pub income: f64,
    pub expenses: f64,
    pub balance: f64,
}

/// Percentage change between the last two buckets of a series.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendStats {
    pub income_trend: f64,
    pub expense_trend: f64,
    pub balance_trend: f64,
}

/// A budget limit next to the expenses actually recorded for its category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetComparison {
    pub category: String,
    pub limit: f64,
    pub spent: f64,
    pub remaining: f64,
}

pub struct SummaryService;

impl SummaryService {
    /// Sum of income magnitudes inside `window` (all time when `None`).
    pub fn total_income(snapshot: &FinanceSnapshot, window: Option<DateWindow>) -> f64 {
        TransactionService::in_window(snapshot, window)
            .filter(|txn| txn.is_income())
            .map(|txn| txn.magnitude())
            .sum()
    }

    /// Sum of expense magnitudes inside `window`. Always non-negative.
    pub fn total_expenses(snapshot: &FinanceSnapshot, window: Option<DateWindow>) -> f64 {
        TransactionService::in_window(snapshot, window)
            .filter(|txn| txn.is_expense())
            .map(|txn| txn.magnitude())
            .sum()
    }

    pub fn balance(snapshot: &FinanceSnapshot, window: Option<DateWindow>) -> f64 {
        Self::total_income(snapshot, window) - Self::total_expenses(snapshot, window)
    }

    /// Sum of `saved` across all goals.
    pub fn total_savings(snapshot: &FinanceSnapshot) -> f64 {
        GoalService::total_saved(snapshot)
    }

    /// Goal savings as a percentage of income, or `0.0` when there is no income.
    pub fn savings_rate(snapshot: &FinanceSnapshot, window: Option<DateWindow>) -> f64 {
        let income = Self::total_income(snapshot, window);
        if income <= 0.0 {
            return 0.0;
        }
        Self::total_savings(snapshot) / income * 100.0
    }

    pub fn total_budget_limit(snapshot: &FinanceSnapshot) -> f64 {
        BudgetService::total_limit(snapshot)
    }

    pub fn total_budget_spent(snapshot: &FinanceSnapshot) -> f64 {
        BudgetService::total_spent(snapshot)
    }

    /// Spent over limit across all budgets as a percentage, or `0.0` without limits.
    pub fn budget_utilization(snapshot: &FinanceSnapshot) -> f64 {
        let limit = Self::total_budget_limit(snapshot);
        if limit.abs() < f64::EPSILON {
            return 0.0;
        }
        Self::total_budget_spent(snapshot) / limit * 100.0
    }

    pub fn summarize(snapshot: &FinanceSnapshot, window: Option<DateWindow>) -> FinancialSummary {
        let total_income = Self::total_income(snapshot, window);
        let total_expenses = Self::total_expenses(snapshot, window);
        FinancialSummary {
            total_income,
            total_expenses,
            balance: total_income - total_expenses,
            total_savings: Self::total_savings(snapshot),
            savings_rate: Self::savings_rate(snapshot, window),
            total_budget_limit: Self::total_budget_limit(snapshot),
            total_budget_spent: Self::total_budget_spent(snapshot),
            budget_utilization: Self::budget_utilization(snapshot),
        }
    }

    /// Expense totals grouped by category, largest first. Ties keep first-seen order.
    pub fn spending_by_category(
        snapshot: &FinanceSnapshot,
        window: Option<DateWindow>,
    ) -> Vec<CategorySpending> {
        let mut groups: Vec<CategorySpending> = Vec::new();
        for txn in TransactionService::in_window(snapshot, window).filter(|txn| txn.is_expense()) {
            match groups.iter_mut().find(|group| group.category == txn.category) {
                Some(group) => {
                    group.total += txn.magnitude();
                    group.transactions += 1;
                }
                None => groups.push(CategorySpending {
                    category: txn.category.clone(),
                    total: txn.magnitude(),
                    transactions: 1,
                }),
            }
        }
        groups.sort_by(|a, b| b.total.total_cmp(&a.total));
        groups
    }

    pub fn goal_progress(snapshot: &FinanceSnapshot, today: NaiveDate) -> Vec<GoalProgress> {
        snapshot
            .goals
            .iter()
            .map(|goal| GoalProgress {
                goal: goal.clone(),
                progress_percent: goal.progress_percent(),
                days_remaining: goal.days_remaining(today),
                status: goal.status(today),
                overdue: goal.is_overdue(today),
            })
            .collect()
    }

    /// Income and expenses bucketed by calendar `period`, oldest bucket first.
    /// Only buckets holding at least one transaction appear.
    pub fn series(snapshot: &FinanceSnapshot, period: Period) -> Vec<PeriodTotals> {
        let mut buckets: Vec<PeriodTotals> = Vec::new();
        for txn in &snapshot.transactions {
            let key = bucket_key(period, txn.date);
            let index = match buckets.iter().position(|bucket| bucket.period == key) {
                Some(index) => index,
                None => {
                    buckets.push(PeriodTotals {
                        period: key,
                        income: 0.0,
                        expenses: 0.0,
                        balance: 0.0,
                    });
                    buckets.len() - 1
                }
            };
            let bucket = &mut buckets[index];
            if txn.is_income() {
                bucket.income += txn.magnitude();
            } else {
                bucket.expenses += txn.magnitude();
            }
            bucket.balance = bucket.income - bucket.expenses;
        }
        buckets.sort_by(|a, b| a.period.cmp(&b.period));
        buckets
    }

    /// Change of the latest bucket against the one before it, in percent.
    ///
    /// Income and expense trends are `0.0` when the previous value is not
    /// positive. The balance trend divides by the previous balance floored at 1.
    pub fn trend(snapshot: &FinanceSnapshot, period: Period) -> TrendStats {
        let series = Self::series(snapshot, period);
        let [.., previous, current] = series.as_slice() else {
            return TrendStats::default();
        };
        let change = |now: f64, before: f64| {
            if before > 0.0 {
                (now - before) / before * 100.0
            } else {
                0.0
            }
        };
        TrendStats {
            income_trend: change(current.income, previous.income),
            expense_trend: change(current.expenses, previous.expenses),
            balance_trend: (current.balance - previous.balance) / previous.balance.max(1.0)
                * 100.0,
        }
    }

    /// One row per budget category with the expenses recorded against it.
    ///
    /// Rows keep the order categories first appear in the budget list. When
    /// several budgets share a category the last one's limit is used.
    pub fn budget_vs_actual(snapshot: &FinanceSnapshot) -> Vec<BudgetComparison> {
        let mut rows: Vec<BudgetComparison> = Vec::new();
        for budget in &snapshot.budgets {
            match rows.iter_mut().find(|row| row.category == budget.category) {
                Some(row) => row.limit = budget.limit,
                None => rows.push(BudgetComparison {
                    category: budget.category.clone(),
                    limit: budget.limit,
                    spent: 0.0,
                    remaining: 0.0,
                }),
            }
        }
        for txn in snapshot.transactions.iter().filter(|txn| txn.is_expense()) {
            if let Some(row) = rows.iter_mut().find(|row| row.category == txn.category) {
                row.spent += txn.magnitude();
            }
        }
        for row in &mut rows {
            row.remaining = row.limit - row.spent;
        }
        rows
    }
}

fn bucket_key(period: Period, date: NaiveDate) -> String {
    match period {
        Period::Week => {
            let week = date.iso_week();
            format!("{}-W{:02}", week.year(), week.week())
        }
        Period::Month => format!("{}-{:02}", date.year(), date.month()),
        Period::Quarter => format!("{}-Q{}", date.year(), date.month0() / 3 + 1),
        Period::Year => date.year().to_string(),
    }
}
