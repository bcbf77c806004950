//! Collection helpers for savings goals.

use fintrack_domain::{FinanceSnapshot, Goal, GoalPatch};
use uuid::Uuid;

use crate::position_of;

pub struct GoalService;

impl GoalService {
    pub fn add(snapshot: &mut FinanceSnapshot, goal: Goal) -> Goal {
        snapshot.goals.push(goal.clone());
        goal
    }

    pub fn update(snapshot: &mut FinanceSnapshot, id: Uuid, patch: GoalPatch) -> Option<Goal> {
        let goal = snapshot.goals.iter_mut().find(|goal| goal.id == id)?;
        patch.apply(goal);
        Some(goal.clone())
    }

    /// Sets the saved amount, clamped so it never exceeds the goal's target.
    pub fn update_progress(snapshot: &mut FinanceSnapshot, id: Uuid, amount: f64) -> Option<Goal> {
        let goal = snapshot.goals.iter_mut().find(|goal| goal.id == id)?;
        goal.set_progress(amount);
        Some(goal.clone())
    }

    pub fn remove(snapshot: &mut FinanceSnapshot, id: Uuid) -> Option<Goal> {
        let index = position_of(&snapshot.goals, id)?;
        Some(snapshot.goals.remove(index))
    }

    pub fn find(snapshot: &FinanceSnapshot, id: Uuid) -> Option<&Goal> {
        snapshot.goals.iter().find(|goal| goal.id == id)
    }

    pub fn total_saved(snapshot: &FinanceSnapshot) -> f64 {
        snapshot.goals.iter().map(|goal| goal.saved).sum()
    }
}
