//! The [rate table](RateTable): KRW-per-unit quotes for the whole set.

use crate::currency::Currency;

/// KRW-per-unit rates for every currency in the set.
///
/// The pivot entry is 1 by definition and every entry is positive and
/// finite; both invariants are enforced at construction. A table is
/// replaced wholesale on refresh, never mutated entry by entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateTable([f64; Currency::COUNT]);

impl RateTable {
	/// The static fallback table used when every live source fails.
	pub const FALLBACK: RateTable =
		RateTable([1.0, 1458.40, 9.74, 1604.50, 1847.30, 200.45]);

	/// Builds a table from KRW-per-unit quotes for the five foreign
	/// currencies; the pivot entry is implied.
	///
	/// Returns [`None`] unless every foreign currency received a positive,
	/// finite quote. Pivot entries in the input are ignored.
	pub fn from_quotes(quotes: impl IntoIterator<Item = (Currency, f64)>) -> Option<Self> {
		let mut rates = [0.0; Currency::COUNT];
		rates[Currency::Krw.index()] = 1.0;
		for (currency, rate) in quotes {
			if currency.is_pivot() {
				continue;
			}
			if !rate.is_finite() || rate <= 0.0 {
				return None;
			}
			rates[currency.index()] = rate;
		}
		rates.iter().all(|&rate| rate > 0.0).then_some(Self(rates))
	}

	/// Gets the KRW-per-unit rate for a currency.
	#[inline]
	pub fn get(self, currency: Currency) -> f64 {
		self.0[currency.index()]
	}

	/// The cross rate for a pair: units of `to` per 1 unit of `from`.
	pub fn cross(self, from: Currency, to: Currency) -> f64 {
		self.get(from) / self.get(to)
	}

	/// Iterates over the table, pivot first.
	pub fn iter(self) -> impl Iterator<Item = (Currency, f64)> {
		Currency::ALL.into_iter().map(move |currency| (currency, self.get(currency)))
	}
}
