use chrono::{Datelike, NaiveDate};

/// Formats currency amounts for presentation.
pub trait CurrencyFormatter: Send + Sync {
    fn format_amount(&self, amount: f64, currency: &str) -> String;
}

/// Formats dates for presentation.
pub trait DateFormatter: Send + Sync {
    fn format_date(&self, date: NaiveDate) -> String;
}

/// Languages with dedicated labels and number conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    Spanish,
    English,
}

impl Language {
    /// Maps a language code such as `"es"` or `"en-US"`. Anything that is not
    /// Spanish falls back to English.
    pub fn from_code(code: &str) -> Self {
        let primary = code.split(['-', '_']).next().unwrap_or_default();
        if primary.eq_ignore_ascii_case("es") {
            Language::Spanish
        } else {
            Language::English
        }
    }
}

/// Locale-aware formatter for amounts and dates used in exports.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocaleFormatter {
    language: Language,
}

impl LocaleFormatter {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn for_code(code: &str) -> Self {
        Self::new(Language::from_code(code))
    }

    pub fn language(&self) -> Language {
        self.language
    }
}

impl CurrencyFormatter for LocaleFormatter {
    fn format_amount(&self, amount: f64, currency: &str) -> String {
        let (group_sep, decimal_sep) = match self.language {
            Language::Spanish => ('.', ','),
            Language::English => (',', '.'),
        };
        let rendered = format!("{:.*}", currency_decimals(currency), amount.abs());
        let (whole, fraction) = match rendered.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (rendered.as_str(), None),
        };

        let mut out = String::new();
        if amount < 0.0 && rendered.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
            out.push('-');
        }
        out.push_str(&group_digits(whole, group_sep));
        if let Some(fraction) = fraction {
            out.push(decimal_sep);
            out.push_str(fraction);
        }
        if !currency.is_empty() {
            out.push(' ');
            out.push_str(currency);
        }
        out
    }
}

impl DateFormatter for LocaleFormatter {
    fn format_date(&self, date: NaiveDate) -> String {
        let month = date.month0() as usize;
        match self.language {
            Language::Spanish => format!(
                "{} de {} de {}",
                date.day(),
                SPANISH_MONTHS[month],
                date.year()
            ),
            Language::English => format!(
                "{} {}, {}",
                ENGLISH_MONTHS[month],
                date.day(),
                date.year()
            ),
        }
    }
}

const SPANISH_MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

const ENGLISH_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Minor units shown for a currency code.
fn currency_decimals(currency: &str) -> usize {
    match currency.to_ascii_uppercase().as_str() {
        "COP" | "CLP" | "JPY" | "KRW" | "PYG" | "VND" => 0,
        _ => 2,
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_codes_map_to_supported_languages() {
        assert_eq!(Language::from_code("es"), Language::Spanish);
        assert_eq!(Language::from_code("es-CO"), Language::Spanish);
        assert_eq!(Language::from_code("en"), Language::English);
        assert_eq!(Language::from_code("fr"), Language::English);
        assert_eq!(Language::from_code(""), Language::English);
    }

    #[test]
    fn spanish_amounts_use_dot_grouping() {
        let fmt = LocaleFormatter::new(Language::Spanish);
        assert_eq!(fmt.format_amount(4_500_000.0, "COP"), "4.500.000 COP");
        assert_eq!(fmt.format_amount(-85_000.0, "COP"), "-85.000 COP");
        assert_eq!(fmt.format_amount(1234.5, "USD"), "1.234,50 USD");
    }

    #[test]
    fn english_amounts_use_comma_grouping() {
        let fmt = LocaleFormatter::new(Language::English);
        assert_eq!(fmt.format_amount(1234.5, "USD"), "1,234.50 USD");
        assert_eq!(fmt.format_amount(999.0, "COP"), "999 COP");
        assert_eq!(fmt.format_amount(0.0, "EUR"), "0.00 EUR");
    }

    #[test]
    fn dates_render_long_form() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(
            LocaleFormatter::new(Language::Spanish).format_date(date),
            "15 de enero de 2024"
        );
        assert_eq!(
            LocaleFormatter::new(Language::English).format_date(date),
            "January 15, 2024"
        );
    }
}
