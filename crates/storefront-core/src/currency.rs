//! # Currency
//!
//! Converts base-currency amounts into the shopper's selected currency and
//! renders them for display.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  App start: GET currencies ──► [CurrencyRate] ──► CurrencySetting       │
//! │                                                      │                  │
//! │  User picks "EUR" ─────────────────────────► select()│                  │
//! │                                                      ▼                  │
//! │  Every price view ◄─────────────── CurrencyConverter (read-only copy)   │
//! │     convert(Money) ─► Money                                             │
//! │     format(Money)  ─► "€1,234.56"                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Conversion never fails: an unknown, missing or zero rate is identity.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::DEFAULT_CURRENCY_CODE;

const MILLIONTHS: i64 = 1_000_000;

/// Highest accepted rate: one base unit buys at most a billion units.
const MAX_RATE_MILLIONTHS: i64 = 1_000_000_000 * MILLIONTHS;

// =============================================================================
// Exchange Rate
// =============================================================================

/// Multiplier from base to active currency, in millionths.
///
/// Same idea as basis points for tax rates: integer storage so the
/// multiplication stays exact until the final rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct ExchangeRate(i64);

impl ExchangeRate {
    pub const IDENTITY: ExchangeRate = ExchangeRate(MILLIONTHS);

    /// Creates a rate from millionths. Zero or negative becomes identity;
    /// anything above a billion to one is capped there.
    pub const fn from_millionths(millionths: i64) -> Self {
        if millionths <= 0 {
            Self::IDENTITY
        } else if millionths > MAX_RATE_MILLIONTHS {
            ExchangeRate(MAX_RATE_MILLIONTHS)
        } else {
            ExchangeRate(millionths)
        }
    }

    /// Creates a rate from the decimal the currency endpoint returns.
    ///
    /// `NaN`, infinities, zero and negatives become identity. Rates above
    /// a billion to one are capped.
    pub fn from_decimal(rate: f64) -> Self {
        if !rate.is_finite() || rate <= 0.0 {
            return Self::IDENTITY;
        }
        let millionths = (rate * MILLIONTHS as f64).round();
        if millionths >= MAX_RATE_MILLIONTHS as f64 {
            return ExchangeRate(MAX_RATE_MILLIONTHS);
        }
        Self::from_millionths(millionths as i64)
    }

    pub const fn millionths(&self) -> i64 {
        self.0
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for ExchangeRate {
    fn default() -> Self {
        Self::IDENTITY
    }
}

// =============================================================================
// Currency Rate (remote list entry)
// =============================================================================

/// One entry of the currency list fetched at app start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CurrencyRate {
    /// ISO 4217 code, e.g. "EUR".
    pub code: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Units of this currency per one unit of base currency.
    #[serde(default)]
    pub rate: Option<f64>,
}

// =============================================================================
// Currency Setting
// =============================================================================

/// The active currency selection, owned by the settings store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CurrencySetting {
    pub active_code: String,
    pub base_code: String,
    pub rate: ExchangeRate,
}

impl Default for CurrencySetting {
    fn default() -> Self {
        CurrencySetting::base(DEFAULT_CURRENCY_CODE)
    }
}

impl CurrencySetting {
    /// Displays amounts in the base currency itself.
    pub fn base(base_code: &str) -> Self {
        let code = normalize_code(base_code);
        CurrencySetting {
            active_code: code.clone(),
            base_code: code,
            rate: ExchangeRate::IDENTITY,
        }
    }

    /// Builds the setting from the fetched currency list.
    ///
    /// If `active_code` is not in the list the setting falls back to the base
    /// currency at identity.
    pub fn from_rates(rates: &[CurrencyRate], active_code: &str, base_code: &str) -> Self {
        let mut setting = CurrencySetting::base(base_code);
        setting.select(rates, active_code);
        setting
    }

    /// Switches to another currency from the list.
    ///
    /// ## Returns
    /// `true` if the code was found. Otherwise the setting is unchanged.
    pub fn select(&mut self, rates: &[CurrencyRate], code: &str) -> bool {
        let code = normalize_code(code);
        if code == self.base_code {
            self.active_code = code;
            self.rate = ExchangeRate::IDENTITY;
            return true;
        }

        match rates.iter().find(|r| normalize_code(&r.code) == code) {
            Some(entry) => {
                self.active_code = code;
                self.rate = entry
                    .rate
                    .map(ExchangeRate::from_decimal)
                    .unwrap_or_default();
                true
            }
            None => false,
        }
    }

    /// Read-only converter handed to price views.
    pub fn converter(&self) -> CurrencyConverter {
        CurrencyConverter {
            active_code: self.active_code.clone(),
            rate: self.rate,
        }
    }
}

fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

// =============================================================================
// Currency Converter
// =============================================================================

/// Stateless conversion and formatting for one active currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyConverter {
    active_code: String,
    rate: ExchangeRate,
}

impl Default for CurrencyConverter {
    fn default() -> Self {
        CurrencySetting::default().converter()
    }
}

impl CurrencyConverter {
    pub fn new(active_code: &str, rate: ExchangeRate) -> Self {
        CurrencyConverter {
            active_code: normalize_code(active_code),
            rate,
        }
    }

    pub fn active_code(&self) -> &str {
        &self.active_code
    }

    /// Base-currency amount → active-currency amount.
    ///
    /// ```rust
    /// use storefront_core::currency::{CurrencyConverter, ExchangeRate};
    /// use storefront_core::Money;
    ///
    /// let eur = CurrencyConverter::new("EUR", ExchangeRate::from_decimal(1.1));
    /// assert_eq!(eur.convert(Money::from_cents(10_000)).cents(), 11_000);
    ///
    /// let unset = CurrencyConverter::new("EUR", ExchangeRate::from_decimal(0.0));
    /// assert_eq!(unset.convert(Money::from_cents(10_000)).cents(), 10_000);
    /// ```
    pub fn convert(&self, amount: Money) -> Money {
        if self.rate.is_identity() {
            return amount;
        }
        amount.scale_millionths(self.rate.millionths())
    }

    /// Renders an active-currency amount, e.g. `"$1,234.56"` or `"¥1,235"`.
    pub fn format(&self, amount: Money) -> String {
        let style = CurrencyStyle::for_code(&self.active_code);
        let cents = amount.cents();
        let sign = if cents < 0 { "-" } else { "" };
        let abs = cents.unsigned_abs();

        let number = if style.decimals == 0 {
            // half away from zero, on the absolute value
            group_thousands((abs + 50) / 100)
        } else {
            format!("{}.{:02}", group_thousands(abs / 100), abs % 100)
        };

        match style.symbol {
            Some(symbol) => format!("{}{}{}", sign, symbol, number),
            None => format!("{}{} {}", sign, self.active_code, number),
        }
    }

    /// `format(convert(amount))`, the call every price label makes.
    pub fn display(&self, amount: Money) -> String {
        self.format(self.convert(amount))
    }
}

// =============================================================================
// Display Styles
// =============================================================================

struct CurrencyStyle {
    symbol: Option<&'static str>,
    decimals: u8,
}

impl CurrencyStyle {
    fn for_code(code: &str) -> Self {
        let (symbol, decimals) = match code {
            "USD" => (Some("$"), 2),
            "EUR" => (Some("€"), 2),
            "GBP" => (Some("£"), 2),
            "INR" => (Some("₹"), 2),
            "CAD" => (Some("CA$"), 2),
            "AUD" => (Some("A$"), 2),
            "CNY" => (Some("CN¥"), 2),
            "JPY" => (Some("¥"), 0),
            "KRW" => (Some("₩"), 0),
            _ => (None, 2),
        };
        CurrencyStyle { symbol, decimals }
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rates() -> Vec<CurrencyRate> {
        vec![
            CurrencyRate {
                code: "EUR".to_string(),
                name: Some("Euro".to_string()),
                rate: Some(0.92),
            },
            CurrencyRate {
                code: "bdt".to_string(),
                name: None,
                rate: Some(110.0),
            },
            CurrencyRate {
                code: "XYZ".to_string(),
                name: None,
                rate: None,
            },
        ]
    }

    #[test]
    fn test_convert_with_rate() {
        let converter = CurrencyConverter::new("EUR", ExchangeRate::from_decimal(1.1));
        assert_eq!(converter.convert(Money::from_cents(10_000)).cents(), 11_000);
    }

    #[test]
    fn test_convert_identity_fallback() {
        for rate in [0.0, -2.0, f64::NAN, f64::INFINITY] {
            let converter = CurrencyConverter::new("EUR", ExchangeRate::from_decimal(rate));
            assert_eq!(converter.convert(Money::from_cents(10_000)).cents(), 10_000);
        }
        assert_eq!(ExchangeRate::from_millionths(0), ExchangeRate::IDENTITY);
    }

    #[test]
    fn test_huge_rate_is_capped_not_wrapped() {
        let ves = CurrencyConverter::new("VES", ExchangeRate::from_decimal(1e13));
        assert_eq!(
            ExchangeRate::from_decimal(1e13),
            ExchangeRate::from_millionths(i64::MAX)
        );
        assert_eq!(
            ves.convert(Money::from_cents(10_000_000)).cents(),
            10_000_000 * 1_000_000_000
        );
        assert_eq!(ves.convert(Money::from_cents(i64::MAX)).cents(), i64::MAX);
        assert_eq!(ves.convert(Money::from_cents(-i64::MAX)).cents(), i64::MIN);
        assert!(ves.format(Money::from_cents(i64::MIN)).starts_with("-VES "));
    }

    #[test]
    fn test_format() {
        let usd = CurrencyConverter::new("usd", ExchangeRate::IDENTITY);
        assert_eq!(usd.format(Money::from_cents(123_456)), "$1,234.56");
        assert_eq!(usd.format(Money::from_cents(5)), "$0.05");
        assert_eq!(usd.format(Money::from_cents(-100_000_000)), "-$1,000,000.00");

        let jpy = CurrencyConverter::new("JPY", ExchangeRate::IDENTITY);
        assert_eq!(jpy.format(Money::from_cents(123_450)), "¥1,235");

        let bdt = CurrencyConverter::new("BDT", ExchangeRate::IDENTITY);
        assert_eq!(bdt.format(Money::from_cents(99_900)), "BDT 999.00");
    }

    #[test]
    fn test_display_converts_then_formats() {
        let eur = CurrencyConverter::new("EUR", ExchangeRate::from_decimal(0.5));
        assert_eq!(eur.display(Money::from_cents(200_000)), "€1,000.00");
    }

    #[test]
    fn test_setting_from_rates() {
        let setting = CurrencySetting::from_rates(&rates(), "eur", "USD");
        assert_eq!(setting.active_code, "EUR");
        assert_eq!(setting.rate.millionths(), 920_000);

        let unknown = CurrencySetting::from_rates(&rates(), "CHF", "USD");
        assert_eq!(unknown, CurrencySetting::base("USD"));
    }

    #[test]
    fn test_select() {
        let mut setting = CurrencySetting::base("USD");

        assert!(setting.select(&rates(), "BDT"));
        assert_eq!(setting.converter().convert(Money::from_cents(100)).cents(), 11_000);

        // missing rate in the list still selects, at identity
        assert!(setting.select(&rates(), "XYZ"));
        assert!(setting.rate.is_identity());

        assert!(!setting.select(&rates(), "CHF"));
        assert_eq!(setting.active_code, "XYZ");

        assert!(setting.select(&rates(), "USD"));
        assert!(setting.rate.is_identity());
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }
}
