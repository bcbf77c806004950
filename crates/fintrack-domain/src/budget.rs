//! Per-category spending ceilings.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

const BUDGET_FIELDS: &[&str] = &["id", "category", "limit", "spent", "period", "icon", "color"];

/// Spending ceiling for one category over a period.
///
/// `spent` may exceed `limit`; over-budget is a reportable state, not an error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: Uuid,
    pub category: String,
    pub limit: f64,
    #[serde(default)]
    pub spent: f64,
    #[serde(default)]
    pub period: Period,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Budget {
    pub fn remaining(&self) -> f64 {
        self.limit - self.spent
    }

    /// Spent as a percentage of the limit; `0.0` when no limit is set.
    pub fn utilization_percent(&self) -> f64 {
        if self.limit.abs() < f64::EPSILON {
            0.0
        } else {
            (self.spent / self.limit) * 100.0
        }
    }

    pub fn is_over_budget(&self) -> bool {
        self.spent > self.limit
    }

    pub fn record_expense(&mut self, amount: f64) {
        self.spent += amount.abs();
    }
}

impl Identifiable for Budget {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Input record for creating a budget.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewBudget {
    pub category: String,
    pub limit: f64,
    #[serde(default)]
    pub spent: Option<f64>,
    #[serde(default)]
    pub period: Option<Period>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl NewBudget {
    pub fn new(category: impl Into<String>, limit: f64) -> Self {
        Self {
            category: category.into(),
            limit,
            spent: None,
            period: None,
            icon: None,
            color: None,
            extra: Extra::new(),
        }
    }

    pub fn with_spent(mut self, spent: f64) -> Self {
        self.spent = Some(spent);
        self
    }

    pub fn with_period(mut self, period: Period) -> Self {
        self.period = Some(period);
        self
    }

    pub fn into_budget(self, id: Uuid) -> Budget {
        let mut extra = Extra::new();
        merge_extra(&mut extra, self.extra, BUDGET_FIELDS);
        Budget {
            id,
            category: self.category,
            limit: self.limit,
            spent: self.spent.unwrap_or(0.0),
            period: self.period.unwrap_or_default(),
            icon: self.icon,
            color: self.color,
            extra,
        }
    }
}

/// Partial update for a [`Budget`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl BudgetPatch {
    pub fn apply(self, budget: &mut Budget) {
        if let Some(category) = self.category {
            budget.category = category;
        }
        if let Some(limit) = self.limit {
            budget.limit = limit;
        }
        if let Some(spent) = self.spent {
            budget.spent = spent;
        }
        if let Some(period) = self.period {
            budget.period = period;
        }
        if let Some(icon) = self.icon {
            budget.icon = Some(icon);
        }
        if let Some(color) = self.color {
            budget.color = Some(color);
        }
        merge_extra(&mut budget.extra, self.extra, BUDGET_FIELDS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_budget_defaults_spent_and_period() {
        let budget = NewBudget::new("Salud", 150_000.0).into_budget(Uuid::nil());
        assert_eq!(budget.spent, 0.0);
        assert_eq!(budget.period, Period::Month);
    }

    #[test]
    fn over_budget_is_a_valid_state() {
        let budget = NewBudget::new("Entretenimiento", 150_000.0)
            .with_spent(180_000.0)
            .into_budget(Uuid::nil());
        assert!(budget.is_over_budget());
        assert_eq!(budget.remaining(), -30_000.0);
        assert!((budget.utilization_percent() - 120.0).abs() < 1e-9);
    }

    #[test]
    fn zero_limit_reports_zero_utilization() {
        let budget = NewBudget::new("Otros", 0.0).with_spent(10.0).into_budget(Uuid::nil());
        assert_eq!(budget.utilization_percent(), 0.0);
    }

    #[test]
    fn missing_period_deserializes_as_month() {
        let budget: Budget = serde_json::from_value(serde_json::json!({
            "id": Uuid::nil(),
            "category": "Vivienda",
            "limit": 800000.0,
            "spent": 800000.0
        }))
        .unwrap();
        assert_eq!(budget.period, Period::Month);
        assert!(!budget.is_over_budget());
    }
}
