//! The conversion engine: pure amount and display-rate math.

use std::fmt::{self, Display, Formatter};

use crate::{currency::Currency, rates::RateTable};

/// A converted amount plus the rate it should be shown with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conversion {
	/// The converted amount in the `to` currency, rounded to 2 decimals.
	pub amount: f64,
	/// The rate to display; [`None`] for same-currency conversions.
	pub rate: Option<DisplayRate>,
}

/// A cross rate oriented for display, read as "1 `base` = `rate` `quote`".
///
/// The base is picked so the printed number is ≥ 1, except that a pair
/// involving the pivot always prices the foreign side (1 foreign = N KRW,
/// never the reciprocal).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayRate {
	/// The "1 unit" side.
	pub base: Currency,
	/// The priced side.
	pub quote: Currency,
	/// Units of `quote` per 1 `base`.
	pub rate: f64,
}

impl Display for DisplayRate {
	fn fmt(&self, f: &mut Formatter) -> fmt::Result {
		write!(f, "1 {} = {:.2} {}", self.base, self.rate, self.quote)
	}
}

/// Converts `amount` between two currencies over the live table.
///
/// Pure and total: table validity is the [`RateTable`] constructors'
/// invariant, and a same-currency pair returns the amount untouched.
pub fn convert(amount: f64, from: Currency, to: Currency, table: &RateTable) -> Conversion {
	if from == to {
		return Conversion { amount, rate: None };
	}
	Conversion {
		amount: round2(amount * table.get(from) / table.get(to)),
		rate: Some(display_rate(from, to, table)),
	}
}

/// Orients a pair's rate for display.
fn display_rate(from: Currency, to: Currency, table: &RateTable) -> DisplayRate {
	if from.is_pivot() || to.is_pivot() {
		let foreign = if from.is_pivot() { to } else { from };
		return DisplayRate {
			base: foreign,
			quote: Currency::Krw,
			rate: table.cross(foreign, Currency::Krw),
		};
	}
	let spot = table.cross(from, to);
	if spot >= 1.0 {
		DisplayRate { base: from, quote: to, rate: spot }
	} else {
		DisplayRate { base: to, quote: from, rate: 1.0 / spot }
	}
}

/// Rounds half-up to 2 decimal places.
fn round2(value: f64) -> f64 {
	(value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
	use super::*;

	fn table() -> RateTable {
		RateTable::from_quotes([
			(Currency::Usd, 1440.0),
			(Currency::Jpy, 9.74),
			(Currency::Eur, 1604.50),
			(Currency::Gbp, 1847.30),
			(Currency::Cny, 200.45),
		])
		.unwrap()
	}

	#[test]
	fn test_same_currency_identity() {
		for amount in [0.0, 1.0, 1234.567, 100000.0] {
			let conversion = convert(amount, Currency::Jpy, Currency::Jpy, &table());
			assert_eq!(conversion.amount, amount);
			assert!(conversion.rate.is_none());
		}
	}

	#[test]
	fn test_krw_to_usd_scenario() {
		let conversion = convert(100000.0, Currency::Krw, Currency::Usd, &table());
		assert_eq!(conversion.amount, 69.44);
		let rate = conversion.rate.unwrap();
		assert_eq!(rate.to_string(), "1 USD = 1440.00 KRW");
	}

	#[test]
	fn test_pivot_is_always_the_priced_side() {
		let buy = convert(100.0, Currency::Usd, Currency::Krw, &table()).rate.unwrap();
		let sell = convert(100.0, Currency::Krw, Currency::Usd, &table()).rate.unwrap();
		for rate in [buy, sell] {
			assert_eq!(rate.base, Currency::Usd);
			assert_eq!(rate.quote, Currency::Krw);
			assert_eq!(rate.rate, 1440.0);
		}
	}

	#[test]
	fn test_display_prefers_rates_above_one() {
		let usd_jpy = convert(1.0, Currency::Usd, Currency::Jpy, &table()).rate.unwrap();
		assert_eq!(usd_jpy.base, Currency::Usd);
		assert!(usd_jpy.rate >= 1.0);

		// The weak-side sell flips the display to keep the number ≥ 1.
		let jpy_usd = convert(1.0, Currency::Jpy, Currency::Usd, &table()).rate.unwrap();
		assert_eq!(jpy_usd.base, Currency::Usd);
		assert_eq!(jpy_usd.quote, Currency::Jpy);
		assert!(jpy_usd.rate >= 1.0);
	}

	#[test]
	fn test_round_trip() {
		let table = table();
		let amount = 100000.0;
		let there = convert(amount, Currency::Krw, Currency::Usd, &table);
		let back = convert(there.amount, Currency::Usd, Currency::Krw, &table);
		// Each leg rounds to 2 decimals; the first leg's half-cent is worth
		// up to half a cent times the return rate.
		let tolerance = 0.005 * table.cross(Currency::Usd, Currency::Krw) + 0.005;
		assert!((back.amount - amount).abs() <= tolerance);
	}

	#[test]
	fn test_rounding_is_half_up() {
		assert_eq!(round2(69.444), 69.44);
		assert_eq!(round2(69.445), 69.45);
		assert_eq!(round2(0.005), 0.01);
	}
}
