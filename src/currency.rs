//! The fixed [currency](Currency) set.

use std::{
	fmt::{self, Display, Formatter},
	str::FromStr,
};

use serde::{Deserialize, Serialize};

/// A currency from the widget's fixed six-currency set.
///
/// [`Krw`](Currency::Krw) is the pivot: every [`RateTable`](crate::RateTable)
/// entry is quoted as KRW per 1 unit, and KRW itself is 1 by definition.
#[derive(Debug, Hash, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
	/// South Korean won, the pivot currency.
	Krw,
	/// United States dollar.
	Usd,
	/// Japanese yen.
	Jpy,
	/// Euro.
	Eur,
	/// Pound sterling.
	Gbp,
	/// Chinese yuan.
	Cny,
}

impl Currency {
	/// The number of currencies in the set.
	pub const COUNT: usize = 6;

	/// All currencies, pivot first.
	pub const ALL: [Currency; Currency::COUNT] =
		[Self::Krw, Self::Usd, Self::Jpy, Self::Eur, Self::Gbp, Self::Cny];

	/// The [ISO 4217](https://en.wikipedia.org/wiki/ISO_4217) code.
	pub const fn code(self) -> &'static str {
		match self {
			Self::Krw => "KRW",
			Self::Usd => "USD",
			Self::Jpy => "JPY",
			Self::Eur => "EUR",
			Self::Gbp => "GBP",
			Self::Cny => "CNY",
		}
	}

	/// The display symbol.
	pub const fn symbol(self) -> &'static str {
		match self {
			Self::Krw => "₩",
			Self::Usd => "$",
			Self::Jpy => "¥",
			Self::Eur => "€",
			Self::Gbp => "£",
			Self::Cny => "¥",
		}
	}

	/// The national-bank series code, or [`None`] for the pivot itself.
	///
	/// The bank quotes yen per 100 units under the series code `JPY(100)`.
	pub const fn bank_code(self) -> Option<&'static str> {
		match self {
			Self::Krw => None,
			Self::Usd => Some("USD"),
			Self::Jpy => Some("JPY(100)"),
			Self::Eur => Some("EUR"),
			Self::Gbp => Some("GBP"),
			Self::Cny => Some("CNY"),
		}
	}

	/// How many units of the currency one bank row quotes.
	pub const fn bank_unit(self) -> f64 {
		match self {
			Self::Jpy => 100.0,
			_ => 1.0,
		}
	}

	/// Whether this is the pivot currency.
	pub const fn is_pivot(self) -> bool {
		matches!(self, Self::Krw)
	}

	pub(crate) const fn index(self) -> usize {
		self as usize
	}
}

impl Display for Currency {
	fn fmt(&self, f: &mut Formatter) -> fmt::Result {
		self.code().fmt(f)
	}
}

/// Unknown currency code error.
///
/// The widget only knows the six codes in [`Currency::ALL`].
#[derive(Debug, thiserror::Error)]
#[error("unknown currency code")]
pub struct UnknownCurrencyError;

impl FromStr for Currency {
	type Err = UnknownCurrencyError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"KRW" => Ok(Self::Krw),
			"USD" => Ok(Self::Usd),
			"JPY" => Ok(Self::Jpy),
			"EUR" => Ok(Self::Eur),
			"GBP" => Ok(Self::Gbp),
			"CNY" => Ok(Self::Cny),
			_ => Err(UnknownCurrencyError),
		}
	}
}

impl<'a> TryFrom<&'a str> for Currency {
	type Error = UnknownCurrencyError;

	fn try_from(value: &'a str) -> Result<Self, Self::Error> {
		value.parse()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse() {
		assert_eq!("KRW".parse::<Currency>().unwrap(), Currency::Krw);
		assert_eq!("CNY".parse::<Currency>().unwrap(), Currency::Cny);
		assert!("krw".parse::<Currency>().is_err());
		assert!("ILS".parse::<Currency>().is_err());
	}

	#[test]
	fn test_display() {
		assert_eq!(Currency::Usd.to_string(), "USD");
		assert_eq!(Currency::Krw.to_string(), "KRW");
	}

	#[test]
	fn test_serde() {
		let json = serde_json::to_string(&Currency::Eur).unwrap();
		assert_eq!(json, "\"EUR\"");
		assert_eq!(serde_json::from_str::<Currency>("\"JPY\"").unwrap(), Currency::Jpy);
	}

	#[test]
	fn test_bank_metadata() {
		assert_eq!(Currency::Krw.bank_code(), None);
		assert_eq!(Currency::Jpy.bank_code(), Some("JPY(100)"));
		assert_eq!(Currency::Jpy.bank_unit(), 100.0);
		assert_eq!(Currency::Usd.bank_unit(), 1.0);
	}

	#[test]
	fn test_index_matches_all() {
		for (i, currency) in Currency::ALL.into_iter().enumerate() {
			assert_eq!(currency.index(), i);
		}
	}
}
