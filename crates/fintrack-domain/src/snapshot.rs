//! Umbrella record holding every collection the store owns.

use std::fmt;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{budget::Budget, category::Category, goal::Goal, seed, transaction::Transaction, user::UserProfile};

/// Top-level keys of the persisted snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotKey {
    User,
    Transactions,
    Budgets,
    Goals,
    Categories,
}

impl SnapshotKey {
    pub const ALL: [SnapshotKey; 5] = [
        SnapshotKey::User,
        SnapshotKey::Transactions,
        SnapshotKey::Budgets,
        SnapshotKey::Goals,
        SnapshotKey::Categories,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SnapshotKey::User => "user",
            SnapshotKey::Transactions => "transactions",
            SnapshotKey::Budgets => "budgets",
            SnapshotKey::Goals => "goals",
            SnapshotKey::Categories => "categories",
        }
    }
}

impl fmt::Display for SnapshotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinanceSnapshot {
    pub user: UserProfile,
    pub transactions: Vec<Transaction>,
    pub budgets: Vec<Budget>,
    pub goals: Vec<Goal>,
    pub categories: Vec<Category>,
}

impl FinanceSnapshot {
    /// The built-in sample dataset.
    pub fn seeded() -> Self {
        Self {
            user: seed::default_user(),
            transactions: seed::default_transactions(),
            budgets: seed::default_budgets(),
            goals: seed::default_goals(),
            categories: seed::default_categories(),
        }
    }

    /// Default user with no records and the default categories.
    pub fn empty() -> Self {
        Self {
            user: seed::default_user(),
            transactions: Vec::new(),
            budgets: Vec::new(),
            goals: Vec::new(),
            categories: seed::default_categories(),
        }
    }

    /// Decodes each top-level key independently. A key that is missing or fails
    /// to decode is replaced by its seeded default and reported as a warning.
    pub fn from_value_lenient(value: Value) -> (Self, Vec<String>) {
        let mut warnings = Vec::new();
        let mut map = match value {
            Value::Object(map) => map,
            other => {
                warnings.push(format!(
                    "persisted snapshot is not a JSON object (found {}); using defaults",
                    json_kind(&other)
                ));
                return (Self::seeded(), warnings);
            }
        };
        let snapshot = Self {
            user: take_key(&mut map, SnapshotKey::User, seed::default_user, &mut warnings),
            transactions: take_key(
                &mut map,
                SnapshotKey::Transactions,
                seed::default_transactions,
                &mut warnings,
            ),
            budgets: take_key(&mut map, SnapshotKey::Budgets, seed::default_budgets, &mut warnings),
            goals: take_key(&mut map, SnapshotKey::Goals, seed::default_goals, &mut warnings),
            categories: take_key(
                &mut map,
                SnapshotKey::Categories,
                seed::default_categories,
                &mut warnings,
            ),
        };
        (snapshot, warnings)
    }
}

fn take_key<T, F>(
    map: &mut Map<String, Value>,
    key: SnapshotKey,
    fallback: F,
    warnings: &mut Vec<String>,
) -> T
where
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    match map.remove(key.as_str()) {
        None => {
            warnings.push(format!("`{key}` missing from persisted snapshot; using defaults"));
            fallback()
        }
        Some(raw) => match serde_json::from_value(raw) {
            Ok(decoded) => decoded,
            Err(err) => {
                warnings.push(format!("`{key}` could not be decoded ({err}); using defaults"));
                fallback()
            }
        },
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn roundtrip_through_value_is_lossless() {
        let snapshot = FinanceSnapshot::seeded();
        let value = serde_json::to_value(&snapshot).unwrap();
        for key in SnapshotKey::ALL {
            assert!(value.get(key.as_str()).is_some(), "missing key {key}");
        }
        let (decoded, warnings) = FinanceSnapshot::from_value_lenient(value);
        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn broken_key_falls_back_without_touching_others() {
        let mut value = serde_json::to_value(FinanceSnapshot::empty()).unwrap();
        value["goals"] = json!("not a list");
        value["budgets"] = json!([]);

        let (decoded, warnings) = FinanceSnapshot::from_value_lenient(value);

        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("goals"));
        assert_eq!(decoded.goals, seed::default_goals());
        assert!(decoded.budgets.is_empty());
        assert!(decoded.transactions.is_empty());
    }

    #[test]
    fn non_object_value_yields_seeded_snapshot() {
        let (decoded, warnings) = FinanceSnapshot::from_value_lenient(json!([1, 2, 3]));
        assert_eq!(decoded, FinanceSnapshot::seeded());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("array"));
    }
}
