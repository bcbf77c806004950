//! CSV export of transactions, budgets, goals and a short report.
//!
//! Every field is quoted and embedded quotes are doubled. Records end with `\n`.

use std::io::Write;

use chrono::NaiveDate;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use fintrack_domain::{Budget, Goal, Priority, Transaction, TransactionKind};

use crate::{
    format::{CurrencyFormatter, DateFormatter, Language, LocaleFormatter},
    CoreError,
};

/// Writes CSV documents with labels and amounts in one language and currency.
#[derive(Debug, Clone)]
pub struct CsvExporter {
    formatter: LocaleFormatter,
    currency: String,
}

impl CsvExporter {
    pub fn new(language: Language, currency: impl Into<String>) -> Self {
        Self {
            formatter: LocaleFormatter::new(language),
            currency: currency.into(),
        }
    }

    pub fn language(&self) -> Language {
        self.formatter.language()
    }

    pub fn transactions<W: Write>(
        &self,
        writer: W,
        transactions: &[Transaction],
    ) -> Result<(), CoreError> {
        let header = match self.language() {
            Language::Spanish => ["Fecha", "Descripción", "Categoría", "Tipo", "Monto", "ID"],
            Language::English => ["Date", "Description", "Category", "Type", "Amount", "ID"],
        };
        let mut csv = csv_writer(writer);
        csv.write_record(header)?;
        for txn in transactions {
            csv.write_record([
                self.formatter.format_date(txn.date),
                txn.description.clone(),
                txn.category.clone(),
                self.kind_label(txn.kind).to_string(),
                self.amount(txn.amount),
                txn.id.to_string(),
            ])?;
        }
        csv.flush()?;
        Ok(())
    }

    pub fn budgets<W: Write>(&self, writer: W, budgets: &[Budget]) -> Result<(), CoreError> {
        let header = match self.language() {
            Language::Spanish => ["Categoría", "Límite", "Gastado", "Restante", "Porcentaje"],
            Language::English => ["Category", "Limit", "Spent", "Remaining", "Percent"],
        };
        let mut csv = csv_writer(writer);
        csv.write_record(header)?;
        for budget in budgets {
            csv.write_record([
                budget.category.clone(),
                self.amount(budget.limit),
                self.amount(budget.spent),
                self.amount(budget.remaining()),
                percent(budget.utilization_percent()),
            ])?;
        }
        csv.flush()?;
        Ok(())
    }

    pub fn goals<W: Write>(&self, writer: W, goals: &[Goal]) -> Result<(), CoreError> {
        let header = match self.language() {
            Language::Spanish => [
                "Título",
                "Descripción",
                "Meta",
                "Ahorrado",
                "Progreso",
                "Fecha límite",
                "Prioridad",
                "Estado",
            ],
            Language::English => [
                "Title",
                "Description",
                "Target",
                "Saved",
                "Progress",
                "Deadline",
                "Priority",
                "Status",
            ],
        };
        let mut csv = csv_writer(writer);
        csv.write_record(header)?;
        for goal in goals {
            csv.write_record([
                goal.title.clone(),
                goal.description.clone().unwrap_or_default(),
                self.amount(goal.target),
                self.amount(goal.saved),
                percent(goal.progress_percent()),
                self.formatter.format_date(goal.deadline),
                self.priority_label(goal.priority).to_string(),
                self.completion_label(goal.saved >= goal.target).to_string(),
            ])?;
        }
        csv.flush()?;
        Ok(())
    }

    /// Two-column metric/value report with record counts and all-time totals.
    pub fn report<W: Write>(
        &self,
        writer: W,
        transactions: &[Transaction],
        budgets: &[Budget],
        goals: &[Goal],
        exported_on: NaiveDate,
    ) -> Result<(), CoreError> {
        let income: f64 = transactions
            .iter()
            .filter(|txn| txn.is_income())
            .map(|txn| txn.magnitude())
            .sum();
        let expenses: f64 = transactions
            .iter()
            .filter(|txn| txn.is_expense())
            .map(|txn| txn.magnitude())
            .sum();

        let spanish = self.language() == Language::Spanish;
        let label = |es: &'static str, en: &'static str| if spanish { es } else { en };
        let rows = [
            (
                label("Total transacciones", "Total transactions"),
                transactions.len().to_string(),
            ),
            (label("Total ingresos", "Total income"), self.amount(income)),
            (label("Total gastos", "Total expenses"), self.amount(expenses)),
            (
                label("Total presupuestos", "Total budgets"),
                budgets.len().to_string(),
            ),
            (label("Total metas", "Total goals"), goals.len().to_string()),
            (
                label("Fecha de exportación", "Export date"),
                self.formatter.format_date(exported_on),
            ),
        ];

        let mut csv = csv_writer(writer);
        csv.write_record([label("Métrica", "Metric"), label("Valor", "Value")])?;
        for (metric, value) in rows {
            csv.write_record([metric, value.as_str()])?;
        }
        csv.flush()?;
        Ok(())
    }

    fn amount(&self, amount: f64) -> String {
        self.formatter.format_amount(amount, &self.currency)
    }

    fn kind_label(&self, kind: TransactionKind) -> &'static str {
        match (self.language(), kind) {
            (Language::Spanish, TransactionKind::Income) => "Ingreso",
            (Language::Spanish, TransactionKind::Expense) => "Gasto",
            (Language::English, TransactionKind::Income) => "Income",
            (Language::English, TransactionKind::Expense) => "Expense",
        }
    }

    fn priority_label(&self, priority: Priority) -> &'static str {
        match (self.language(), priority) {
            (Language::Spanish, Priority::Low) => "Baja",
            (Language::Spanish, Priority::Medium) => "Media",
            (Language::Spanish, Priority::High) => "Alta",
            (Language::English, Priority::Low) => "Low",
            (Language::English, Priority::Medium) => "Medium",
            (Language::English, Priority::High) => "High",
        }
    }

    fn completion_label(&self, completed: bool) -> &'static str {
        match (self.language(), completed) {
            (Language::Spanish, true) => "Completada",
            (Language::Spanish, false) => "En progreso",
            (Language::English, true) => "Completed",
            (Language::English, false) => "In progress",
        }
    }
}

fn csv_writer<W: Write>(writer: W) -> csv::Writer<W> {
    WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer)
}

fn percent(value: f64) -> String {
    format!("{}%", value.round())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fintrack_domain::{seed, NewTransaction};
    use uuid::Uuid;

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> Result<(), CoreError>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn spanish_transactions_use_localized_header_and_labels() {
        let txn = NewTransaction::expense("Supermercado", 150_000.0, "Alimentación")
            .on(day(2024, 1, 15))
            .into_transaction(Uuid::from_u128(7), day(2024, 1, 15));
        let exporter = CsvExporter::new(Language::Spanish, "COP");

        let out = render(|buf| exporter.transactions(buf, &[txn]));

        let mut lines = out.lines();
        assert_eq!(
            lines.next().unwrap(),
            r#""Fecha","Descripción","Categoría","Tipo","Monto","ID""#
        );
        assert_eq!(
            lines.next().unwrap(),
            r#""15 de enero de 2024","Supermercado","Alimentación","Gasto","150.000 COP","00000000-0000-0000-0000-000000000007""#
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn embedded_quotes_and_commas_are_escaped() {
        let txn = NewTransaction::income(r#"Bono "anual", extra"#, 10.0, "Salario")
            .on(day(2024, 2, 1))
            .into_transaction(Uuid::from_u128(1), day(2024, 2, 1));
        let exporter = CsvExporter::new(Language::English, "USD");

        let out = render(|buf| exporter.transactions(buf, &[txn]));

        assert!(out.starts_with(r#""Date","Description","Category","Type","Amount","ID""#));
        assert!(out.contains(r#""Bono ""anual"", extra""#), "{out}");
        assert!(out.contains(r#""Income","10.00 USD""#), "{out}");
    }

    #[test]
    fn empty_export_writes_only_the_header() {
        let exporter = CsvExporter::new(Language::English, "USD");
        let out = render(|buf| exporter.transactions(buf, &[]));
        assert_eq!(out.lines().count(), 1);
    }

    #[test]
    fn budgets_include_remaining_and_rounded_percent() {
        let exporter = CsvExporter::new(Language::Spanish, "COP");
        let budgets = seed::default_budgets();

        let out = render(|buf| exporter.budgets(buf, &budgets[..1]));

        let row = out.lines().nth(1).unwrap();
        assert_eq!(
            row,
            r#""Alimentación","300.000 COP","150.000 COP","150.000 COP","50%""#
        );
    }

    #[test]
    fn goals_report_status_and_localized_priority() {
        let exporter = CsvExporter::new(Language::English, "COP");
        let mut goals = seed::default_goals();
        goals.truncate(1);
        goals[0].saved = goals[0].target;

        let out = render(|buf| exporter.goals(buf, &goals));

        let row = out.lines().nth(1).unwrap();
        assert!(row.contains(r#""100%""#), "{row}");
        assert!(row.ends_with(r#""Completed""#), "{row}");
    }

    #[test]
    fn report_counts_records() {
        let exporter = CsvExporter::new(Language::Spanish, "COP");
        let out = render(|buf| {
            exporter.report(
                buf,
                &seed::default_transactions(),
                &seed::default_budgets(),
                &seed::default_goals(),
                day(2024, 3, 1),
            )
        });

        assert!(out.contains(r#""Total transacciones","5""#), "{out}");
        assert!(out.contains(r#""Total ingresos","3.000.000 COP""#), "{out}");
        assert!(out.contains(r#""Total gastos","255.000 COP""#), "{out}");
        assert!(out.contains(r#""Fecha de exportación","1 de marzo de 2024""#), "{out}");
    }
}
