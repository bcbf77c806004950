//! Savings goals with deadlines and derived progress.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

const GOAL_FIELDS: &[&str] = &[
    "id",
    "title",
    "description",
    "target",
    "saved",
    "deadline",
    "category",
    "priority",
    "icon",
    "color",
];

const URGENT_DAYS: i64 = 30;
const UPCOMING_DAYS: i64 = 90;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Bucketed goal state, evaluated in declaration order.
pub enum GoalStatus {
    /// Progress reached 100%.
    Completed,
    /// Fewer than 30 days left (including past deadlines).
    Urgent,
    /// Fewer than 90 days left.
    Upcoming,
    InProgress,
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GoalStatus::Completed => "Completed",
            GoalStatus::Urgent => "Urgent",
            GoalStatus::Upcoming => "Upcoming",
            GoalStatus::InProgress => "In progress",
        };
        f.write_str(label)
    }
}

/// Savings target with a deadline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub target: f64,
    #[serde(default)]
    pub saved: f64,
    pub deadline: NaiveDate,
    #[serde(default = "Goal::default_category")]
    pub category: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Goal {
    pub fn default_category() -> String {
        "Ahorro".into()
    }

    /// Saved as a percentage of target, clamped to `[0, 100]`.
    pub fn progress_percent(&self) -> f64 {
        if self.target <= 0.0 {
            return 0.0;
        }
        ((self.saved / self.target) * 100.0).clamp(0.0, 100.0)
    }

    /// Whole days from `today` to the deadline; negative once it has passed.
    pub fn days_remaining(&self, today: NaiveDate) -> i64 {
        (self.deadline - today).num_days()
    }

    pub fn status(&self, today: NaiveDate) -> GoalStatus {
        if self.progress_percent() >= 100.0 {
            return GoalStatus::Completed;
        }
        let days = self.days_remaining(today);
        if days < URGENT_DAYS {
            GoalStatus::Urgent
        } else if days < UPCOMING_DAYS {
            GoalStatus::Upcoming
        } else {
            GoalStatus::InProgress
        }
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.progress_percent() < 100.0 && self.days_remaining(today) < 0
    }

    pub fn remaining_amount(&self) -> f64 {
        (self.target - self.saved).max(0.0)
    }

    /// Sets `saved` to `amount`, never above the target nor below zero.
    pub fn set_progress(&mut self, amount: f64) {
        self.saved = amount.min(self.target).max(0.0);
    }
}

impl Identifiable for Goal {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Input record for creating a goal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub target: f64,
    #[serde(default)]
    pub saved: Option<f64>,
    pub deadline: NaiveDate,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl NewGoal {
    pub fn new(title: impl Into<String>, target: f64, deadline: NaiveDate) -> Self {
        Self {
            title: title.into(),
            description: None,
            target,
            saved: None,
            deadline,
            category: None,
            priority: None,
            icon: None,
            color: None,
            extra: Extra::new(),
        }
    }

    pub fn with_saved(mut self, saved: f64) -> Self {
        self.saved = Some(saved);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn into_goal(self, id: Uuid) -> Goal {
        let mut extra = Extra::new();
        merge_extra(&mut extra, self.extra, GOAL_FIELDS);
        Goal {
            id,
            title: self.title,
            description: self.description,
            target: self.target,
            saved: self.saved.unwrap_or(0.0),
            deadline: self.deadline,
            category: self.category.unwrap_or_else(Goal::default_category),
            priority: self.priority.unwrap_or_default(),
            icon: self.icon,
            color: self.color,
            extra,
        }
    }
}

/// Partial update for a [`Goal`]. Note that `saved` is stored verbatim here;
/// use the store's progress update to clamp against the target.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl GoalPatch {
    pub fn apply(self, goal: &mut Goal) {
        if let Some(title) = self.title {
            goal.title = title;
        }
        if let Some(description) = self.description {
            goal.description = Some(description);
        }
        if let Some(target) = self.target {
            goal.target = target;
        }
        if let Some(saved) = self.saved {
            goal.saved = saved;
        }
        if let Some(deadline) = self.deadline {
            goal.deadline = deadline;
        }
        if let Some(category) = self.category {
            goal.category = category;
        }
        if let Some(priority) = self.priority {
            goal.priority = priority;
        }
        if let Some(icon) = self.icon {
            goal.icon = Some(icon);
        }
        if let Some(color) = self.color {
            goal.color = Some(color);
        }
        merge_extra(&mut goal.extra, self.extra, GOAL_FIELDS);
    }
}
