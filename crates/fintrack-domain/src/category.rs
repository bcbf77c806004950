//! Classification entries used for icons, colors, and budget linkage.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{common::*, transaction::TransactionKind};

/// Supported category types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Income,
    Expense,
    Both,
}

impl CategoryKind {
    pub fn accepts(self, kind: TransactionKind) -> bool {
        matches!(
            (self, kind),
            (CategoryKind::Both, _)
                | (CategoryKind::Income, TransactionKind::Income)
                | (CategoryKind::Expense, TransactionKind::Expense)
        )
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CategoryKind::Income => "Income",
            CategoryKind::Expense => "Expense",
            CategoryKind::Both => "Both",
        };
        f.write_str(label)
    }
}

/// Taxonomy entry. Categories are keyed by exact name and only ever appended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub name: String,
    pub icon: String,
    pub color: String,
    #[serde(rename = "type")]
    pub kind: CategoryKind,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Category {
    pub fn new(
        name: impl Into<String>,
        icon: impl Into<String>,
        color: impl Into<String>,
        kind: CategoryKind,
    ) -> Self {
        Self {
            name: name.into(),
            icon: icon.into(),
            color: color.into(),
            kind,
            extra: Extra::new(),
        }
    }
}

impl NamedEntity for Category {
    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_accepts_every_transaction_kind() {
        assert!(CategoryKind::Both.accepts(TransactionKind::Income));
        assert!(CategoryKind::Both.accepts(TransactionKind::Expense));
        assert!(!CategoryKind::Income.accepts(TransactionKind::Expense));
        assert!(CategoryKind::Expense.accepts(TransactionKind::Expense));
    }

    #[test]
    fn kind_is_persisted_as_type() {
        let category = Category::new("Otros", "📦", "#6B7280", CategoryKind::Both);
        let value = serde_json::to_value(&category).unwrap();
        assert_eq!(value["type"], serde_json::json!("both"));
    }
}
