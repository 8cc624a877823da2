//! Money formatting for templates and exports.
//!
//! Format: sign + currency symbol + number with thousands separator.
//! Signed amounts are colored: positive green, negative red, zero neutral.

/// Currency and locale bound together for views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Money {
    pub currency: String,
    pub locale: String,
}

impl Money {
    pub fn new(currency: &str, locale: &str) -> Self {
        Self {
            currency: currency.to_string(),
            locale: locale.to_string(),
        }
    }

    /// Unsigned amount, e.g. "$1,234.50". Used for expense and income figures.
    pub fn neutral(&self, cents: i64) -> String {
        format_money_neutral(cents, &self.currency, &self.locale)
    }

    /// Signed amount wrapped in a colored span. Used for net balances.
    pub fn colored(&self, cents: i64) -> String {
        format_money(cents, &self.currency, &self.locale)
    }

    pub fn share(&self, percentage: f64) -> String {
        format_share(percentage, &self.locale)
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::new("USD", "en-US")
    }
}

/// Format cents as a colored money display. Returns HTML.
pub fn format_money(cents: i64, currency: &str, locale: &str) -> String {
    let (formatted, color_class) = format_money_impl(cents, currency, locale);
    format!(r#"<span class="{}">{}</span>"#, color_class, formatted)
}

/// Format cents without a sign prefix or color.
pub fn format_money_neutral(cents: i64, currency: &str, locale: &str) -> String {
    let (thousands_sep, decimal_sep) = locale_separators(locale);
    let abs_cents = cents.unsigned_abs();
    format!(
        "{}{}{}{:02}",
        currency_symbol(currency),
        format_with_thousands(abs_cents / 100, thousands_sep),
        decimal_sep,
        abs_cents % 100
    )
}

/// Machine-readable decimal with two places and no grouping, e.g. "-1234.50".
pub fn format_decimal(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs_cents / 100, abs_cents % 100)
}

/// Format a signed percentage with two decimals, e.g. "+12.35%".
pub fn format_percent(value: f64, locale: &str) -> String {
    let sign = if value > 0.0 {
        "+"
    } else if value < 0.0 {
        "-"
    } else {
        ""
    };
    format!("{}{}%", sign, fixed(value.abs(), 2, locale))
}

/// Format a share of a whole with one decimal and no sign, e.g. "42.5%".
pub fn format_share(value: f64, locale: &str) -> String {
    format!("{}%", fixed(value.abs(), 1, locale))
}

fn fixed(value: f64, decimals: u32, locale: &str) -> String {
    let (_, decimal_sep) = locale_separators(locale);
    let scale = 10_i64.pow(decimals);
    let scaled = (value * scale as f64).round() as i64;
    format!(
        "{}{}{:0width$}",
        scaled / scale,
        decimal_sep,
        scaled % scale,
        width = decimals as usize
    )
}

fn format_money_impl(cents: i64, currency: &str, locale: &str) -> (String, &'static str) {
    let color_class = if cents > 0 {
        "amount positive"
    } else if cents < 0 {
        "amount negative"
    } else {
        "amount zero"
    };

    let neutral = format_money_neutral(cents, currency, locale);
    let formatted = if cents < 0 {
        format!("-{}", neutral)
    } else if cents > 0 {
        format!("+{}", neutral)
    } else {
        neutral
    };

    (formatted, color_class)
}

fn locale_separators(locale: &str) -> (char, char) {
    // Locales that use period as thousands separator and comma as decimal
    match locale {
        "de-DE" | "de-AT" | "de-CH" | "fr-FR" | "fr-BE" | "fr-CA" | "es-ES" | "es-AR" | "it-IT"
        | "pt-BR" | "pt-PT" | "nl-NL" | "nl-BE" | "pl-PL" | "ru-RU" | "tr-TR" | "vi-VN"
        | "id-ID" | "da-DK" | "nb-NO" | "sv-SE" | "fi-FI" | "cs-CZ" | "sk-SK" | "hu-HU"
        | "ro-RO" | "bg-BG" | "uk-UA" | "el-GR" => ('.', ','),
        _ => (',', '.'),
    }
}

fn format_with_thousands(n: u64, sep: char) -> String {
    let digits = n.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(sep);
        }
        result.push(c);
    }
    result
}

fn currency_symbol(currency: &str) -> &'static str {
    match currency.to_uppercase().as_str() {
        "USD" => "$",
        "EUR" => "\u{20ac}",
        "GBP" => "\u{00a3}",
        "JPY" => "\u{00a5}",
        "CNY" => "\u{00a5}",
        "CAD" => "C$",
        "AUD" => "A$",
        "CHF" => "CHF\u{00a0}",
        "INR" => "\u{20b9}",
        "PKR" => "Rs\u{00a0}",
        "BRL" => "R$",
        "MXN" => "MX$",
        "KRW" => "\u{20a9}",
        "SEK" => "kr\u{00a0}",
        "NOK" => "kr\u{00a0}",
        "DKK" => "kr\u{00a0}",
        "PLN" => "z\u{0142}\u{00a0}",
        "TRY" => "\u{20ba}",
        "ZAR" => "R\u{00a0}",
        "SGD" => "S$",
        "HKD" => "HK$",
        "NZD" => "NZ$",
        _ => "$",
    }
}
