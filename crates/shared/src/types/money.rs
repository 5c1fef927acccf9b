//! Currency codes and money rounding rules.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are `rust_decimal::Decimal` everywhere; rounding only happens at
//! the boundary where a result record is finalized.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Amounts at or below this value (in base currency units) are noise from
/// repeated division and never produce a settlement.
pub const NEGLIGIBLE_AMOUNT: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Decimal places used when reporting money.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Decimal places used when reporting percentages.
pub const PERCENTAGE_DECIMAL_PLACES: u32 = 1;

/// Rounds a money value to 2 decimal places for reporting.
///
/// Midpoints round away from zero, so 0.005 reports as 0.01.
#[must_use]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a percentage to 1 decimal place for reporting.
#[must_use]
pub fn round_percentage(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(
        PERCENTAGE_DECIMAL_PLACES,
        RoundingStrategy::MidpointAwayFromZero,
    )
}

/// Error returned when a currency code is not three ASCII letters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown currency code: {0}")]
pub struct InvalidCurrencyCode(pub String);

/// A 3-letter currency code such as `USD` or `ARS`.
///
/// Always stored upper-case. Any three ASCII letters are accepted because the
/// live rate provider knows more currencies than we could enumerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode([u8; 3]);

impl CurrencyCode {
    /// US Dollar.
    pub const USD: Self = Self(*b"USD");
    /// Euro.
    pub const EUR: Self = Self(*b"EUR");
    /// Argentine Peso.
    pub const ARS: Self = Self(*b"ARS");

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // Construction only admits ASCII letters.
        std::str::from_utf8(&self.0).unwrap_or("???")
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = InvalidCurrencyCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.trim().as_bytes();
        match bytes {
            [a, b, c] if bytes.iter().all(u8::is_ascii_alphabetic) => Ok(Self([
                a.to_ascii_uppercase(),
                b.to_ascii_uppercase(),
                c.to_ascii_uppercase(),
            ])),
            _ => Err(InvalidCurrencyCode(s.to_string())),
        }
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = InvalidCurrencyCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.as_str().to_string()
    }
}
