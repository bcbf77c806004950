//! Built-in sample dataset used when no persisted snapshot is available.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    budget::Budget,
    category::{Category, CategoryKind},
    common::{Extra, Period},
    goal::{Goal, Priority},
    transaction::{Transaction, TransactionKind},
    user::{NotificationPreferences, PrivacyPreferences, UserProfile},
};

/// High bits shared by every seeded identifier, keeping them apart from generated ids.
pub const SEED_ID_BASE: u128 = 0x5eed_0000_0000_0000_0000_0000_0000_0000;

pub fn seed_id(n: u128) -> Uuid {
    Uuid::from_u128(SEED_ID_BASE | n)
}

fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

pub fn default_user() -> UserProfile {
    UserProfile {
        name: "Juan Pérez".into(),
        email: "juan@example.com".into(),
        avatar: Some("https://via.placeholder.com/32x32/3B82F6/FFFFFF?text=JP".into()),
        currency: "COP".into(),
        language: "es".into(),
        timezone: "America/Bogota".into(),
        notifications: NotificationPreferences::default(),
        privacy: PrivacyPreferences::default(),
        extra: Extra::new(),
    }
}

pub fn default_transactions() -> Vec<Transaction> {
    let rows = [
        (1, TransactionKind::Expense, "Alimentación", "Supermercado", 150_000.0, day(2024, 1, 15), ["comida", "necesario"]),
        (2, TransactionKind::Income, "Salario", "Salario mensual", 2_500_000.0, day(2024, 1, 1), ["ingreso", "fijo"]),
        (3, TransactionKind::Expense, "Transporte", "Gasolina", 80_000.0, day(2024, 1, 14), ["transporte", "necesario"]),
        (4, TransactionKind::Expense, "Entretenimiento", "Cine", 25_000.0, day(2024, 1, 13), ["entretenimiento", "ocio"]),
        (5, TransactionKind::Income, "Freelance", "Proyecto web", 500_000.0, day(2024, 1, 10), ["ingreso", "variable"]),
    ];
    rows.into_iter()
        .map(|(n, kind, category, description, amount, date, tags)| Transaction {
            id: seed_id(n),
            kind,
            category: category.into(),
            description: description.into(),
            amount,
            date,
            note: None,
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
            extra: Extra::new(),
        })
        .collect()
}

pub fn default_budgets() -> Vec<Budget> {
    let rows = [
        (101, "Alimentación", 300_000.0, 150_000.0, "🍽️", "#10B981"),
        (102, "Transporte", 200_000.0, 80_000.0, "🚗", "#3B82F6"),
        (103, "Entretenimiento", 100_000.0, 25_000.0, "🎬", "#8B5CF6"),
        (104, "Vivienda", 800_000.0, 800_000.0, "🏠", "#F59E0B"),
        (105, "Salud", 150_000.0, 75_000.0, "🏥", "#EF4444"),
        (106, "Educación", 200_000.0, 120_000.0, "📚", "#06B6D4"),
    ];
    rows.into_iter()
        .map(|(n, category, limit, spent, icon, color)| Budget {
            id: seed_id(n),
            category: category.into(),
            limit,
            spent,
            period: Period::Month,
            icon: Some(icon.into()),
            color: Some(color.into()),
            extra: Extra::new(),
        })
        .collect()
}

pub fn default_goals() -> Vec<Goal> {
    let rows = [
        (201, "Vacaciones en Europa", 5_000_000.0, 2_500_000.0, day(2024, 12, 31), Priority::High, "✈️", "#10B981", "Ahorrar para viajar a Europa por 2 semanas"),
        (202, "Fondo de Emergencia", 3_000_000.0, 1_800_000.0, day(2024, 6, 30), Priority::High, "🛡️", "#3B82F6", "Crear un fondo de emergencia de 6 meses de gastos"),
        (203, "Nuevo Laptop", 2_500_000.0, 800_000.0, day(2024, 9, 30), Priority::Medium, "💻", "#8B5CF6", "Comprar un laptop para trabajo y estudio"),
        (204, "Inversión en Criptomonedas", 1_000_000.0, 300_000.0, day(2024, 12, 31), Priority::Low, "₿", "#F59E0B", "Diversificar inversiones con criptomonedas"),
    ];
    rows.into_iter()
        .map(|(n, title, target, saved, deadline, priority, icon, color, description)| Goal {
            id: seed_id(n),
            title: title.into(),
            description: Some(description.into()),
            target,
            saved,
            deadline,
            category: Goal::default_category(),
            priority,
            icon: Some(icon.into()),
            color: Some(color.into()),
            extra: Extra::new(),
        })
        .collect()
}

pub fn default_categories() -> Vec<Category> {
    [
        ("Alimentación", "🍽️", "#10B981", CategoryKind::Expense),
        ("Transporte", "🚗", "#3B82F6", CategoryKind::Expense),
        ("Entretenimiento", "🎬", "#8B5CF6", CategoryKind::Expense),
        ("Vivienda", "🏠", "#F59E0B", CategoryKind::Expense),
        ("Salud", "🏥", "#EF4444", CategoryKind::Expense),
        ("Educación", "📚", "#06B6D4", CategoryKind::Expense),
        ("Salario", "💰", "#10B981", CategoryKind::Income),
        ("Freelance", "💼", "#3B82F6", CategoryKind::Income),
        ("Inversiones", "📈", "#8B5CF6", CategoryKind::Income),
        ("Otros", "📦", "#6B7280", CategoryKind::Both),
    ]
    .into_iter()
    .map(|(name, icon, color, kind)| Category::new(name, icon, color, kind))
    .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn seeded_ids_are_unique_across_collections() {
        let mut ids = HashSet::new();
        ids.extend(default_transactions().iter().map(|t| t.id));
        ids.extend(default_budgets().iter().map(|b| b.id));
        ids.extend(default_goals().iter().map(|g| g.id));
        assert_eq!(ids.len(), 5 + 6 + 4);
    }

    #[test]
    fn every_budget_category_is_known() {
        let names: HashSet<_> = default_categories().into_iter().map(|c| c.name).collect();
        assert!(default_budgets().iter().all(|b| names.contains(&b.category)));
        assert!(default_transactions().iter().all(|t| names.contains(&t.category)));
    }
}
