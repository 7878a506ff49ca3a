use crate::utils::error::{Result, TwinfieldError};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Twinfield 的辦公室 (公司) 代碼
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Office {
    code: String,
}

impl Office {
    pub fn from_code(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }

    pub fn code(&self) -> &str {
        &self.code
    }
}

/// ISO 4217 幣別代碼，一律以大寫儲存
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    pub fn new(code: &str) -> Result<Self> {
        let code = code.trim();
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(TwinfieldError::invalid_value(
                "currency",
                format!("'{}' is not a currency code", code),
            ));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }

    pub fn eur() -> Self {
        Self("EUR".to_string())
    }

    pub fn code(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Currency {
    type Error = TwinfieldError;

    fn try_from(value: String) -> Result<Self> {
        Currency::new(&value)
    }
}

impl From<Currency> for String {
    fn from(value: Currency) -> Self {
        value.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    pub amount: Decimal,
    pub currency: Currency,
}

impl Money {
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// 以最小單位 (分) 建立金額，例如 87 => 0.87
    pub fn from_minor_units(minor: i64, currency: Currency) -> Self {
        Self::new(Decimal::new(minor, 2), currency)
    }

    pub fn zero(currency: Currency) -> Self {
        Self::new(Decimal::ZERO, currency)
    }

    /// Parses a wire amount such as `0.87` in the given currency.
    pub fn parse(element: &str, value: &str, currency: Currency) -> Result<Self> {
        let amount = Decimal::from_str(value.trim()).map_err(|e| {
            TwinfieldError::invalid_value(element, format!("'{}' is not an amount: {}", value, e))
        })?;
        Ok(Self::new(amount, currency))
    }

    /// Wire format: always two decimals, half-cents round away from zero.
    pub fn to_wire(&self) -> String {
        let rounded = self
            .amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        format!("{:.2}", rounded)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.to_wire(), self.currency)
    }
}

macro_rules! wire_enum {
    ($name:ident, $element:literal, { $($variant:ident => $wire:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl FromStr for $name {
            type Err = TwinfieldError;

            fn from_str(s: &str) -> Result<Self> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($wire => Ok($name::$variant),)+
                    other => Err(TwinfieldError::invalid_value(
                        $element,
                        format!("unknown value '{}'", other),
                    )),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

wire_enum!(Destiny, "destiny", {
    Temporary => "temporary",
    Final => "final",
});

wire_enum!(LineType, "type", {
    Total => "total",
    Detail => "detail",
    Vat => "vat",
});

wire_enum!(DebitCredit, "debitcredit", {
    Debit => "debit",
    Credit => "credit",
});
