//! Collection helpers for budgets.

use fintrack_domain::{Budget, BudgetPatch, FinanceSnapshot};
use uuid::Uuid;

use crate::position_of;

pub struct BudgetService;

impl BudgetService {
    pub fn add(snapshot: &mut FinanceSnapshot, budget: Budget) -> Budget {
        snapshot.budgets.push(budget.clone());
        budget
    }

    pub fn update(snapshot: &mut FinanceSnapshot, id: Uuid, patch: BudgetPatch) -> Option<Budget> {
        let budget = snapshot.budgets.iter_mut().find(|budget| budget.id == id)?;
        patch.apply(budget);
        Some(budget.clone())
    }

    pub fn remove(snapshot: &mut FinanceSnapshot, id: Uuid) -> Option<Budget> {
        let index = position_of(&snapshot.budgets, id)?;
        Some(snapshot.budgets.remove(index))
    }

    pub fn find(snapshot: &FinanceSnapshot, id: Uuid) -> Option<&Budget> {
        snapshot.budgets.iter().find(|budget| budget.id == id)
    }

    /// Adds `amount` to `spent` on every budget whose category equals `category`
    /// exactly. Returns the number of budgets touched.
    pub fn apply_expense(snapshot: &mut FinanceSnapshot, category: &str, amount: f64) -> usize {
        let mut touched = 0;
        for budget in snapshot
            .budgets
            .iter_mut()
            .filter(|budget| budget.category == category)
        {
            budget.record_expense(amount);
            touched += 1;
        }
        touched
    }

    pub fn total_limit(snapshot: &FinanceSnapshot) -> f64 {
        snapshot.budgets.iter().map(|budget| budget.limit).sum()
    }

    pub fn total_spent(snapshot: &FinanceSnapshot) -> f64 {
        snapshot.budgets.iter().map(|budget| budget.spent).sum()
    }

    pub fn over_budget(snapshot: &FinanceSnapshot) -> Vec<&Budget> {
        snapshot
            .budgets
            .iter()
            .filter(|budget| budget.is_over_budget())
            .collect()
    }
}
