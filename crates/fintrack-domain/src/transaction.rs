//! Domain models for income and expense transactions.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

/// Serialized field names owned by [`Transaction`]; never merged from `extra`.
const TRANSACTION_FIELDS: &[&str] = &[
    "id",
    "type",
    "category",
    "description",
    "amount",
    "date",
    "note",
    "tags",
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
/// Direction of a transaction's effect on totals.
pub enum TransactionKind {
    Income,
    Expense,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
        };
        f.write_str(label)
    }
}

/// One recorded financial event.
///
/// `amount` is kept exactly as supplied. Aggregates use its absolute value and
/// let `kind` decide the sign, so negative expense amounts aggregate the same
/// way as positive ones.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category: String,
    pub description: String,
    pub amount: f64,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// Absolute amount, independent of the storage sign convention.
    pub fn magnitude(&self) -> f64 {
        self.amount.abs()
    }

    /// Amount signed by kind: income positive, expense negative.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionKind::Income => self.magnitude(),
            TransactionKind::Expense => -self.magnitude(),
        }
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Input record for creating a transaction; the store assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category: String,
    pub description: String,
    pub amount: f64,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl NewTransaction {
    pub fn new(
        kind: TransactionKind,
        description: impl Into<String>,
        amount: f64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            category: category.into(),
            description: description.into(),
            amount,
            date: None,
            note: None,
            tags: Vec::new(),
            extra: Extra::new(),
        }
    }

    pub fn income(description: impl Into<String>, amount: f64, category: impl Into<String>) -> Self {
        Self::new(TransactionKind::Income, description, amount, category)
    }

    pub fn expense(description: impl Into<String>, amount: f64, category: impl Into<String>) -> Self {
        Self::new(TransactionKind::Expense, description, amount, category)
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Builds the stored record, defaulting the date to `today`.
    pub fn into_transaction(self, id: Uuid, today: NaiveDate) -> Transaction {
        let mut extra = Extra::new();
        merge_extra(&mut extra, self.extra, TRANSACTION_FIELDS);
        Transaction {
            id,
            kind: self.kind,
            category: self.category,
            description: self.description,
            amount: self.amount,
            date: self.date.unwrap_or(today),
            note: self.note,
            tags: self.tags,
            extra,
        }
    }
}

/// Partial update for a [`Transaction`]. Only supplied fields are replaced.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPatch {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl TransactionPatch {
    pub fn apply(self, txn: &mut Transaction) {
        if let Some(kind) = self.kind {
            txn.kind = kind;
        }
        if let Some(category) = self.category {
            txn.category = category;
        }
        if let Some(description) = self.description {
            txn.description = description;
        }
        if let Some(amount) = self.amount {
            txn.amount = amount;
        }
        if let Some(date) = self.date {
            txn.date = date;
        }
        if let Some(note) = self.note {
            txn.note = Some(note);
        }
        if let Some(tags) = self.tags {
            txn.tags = tags;
        }
        merge_extra(&mut txn.extra, self.extra, TRANSACTION_FIELDS);
    }
}
