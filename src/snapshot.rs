//! The [`RateSnapshot`]: aggregate rate state for one currency pair.

use crate::{
	currency::Currency,
	history::{HistoricalRates, HistoryBlock, Horizon},
	rates::RateTable,
};

/// Current and historical cross rates for one pair.
///
/// Snapshots are assembled whole once a fetch batch completes and replaced
/// whole on the next one; nothing updates them horizon by horizon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateSnapshot {
	/// The currency being sold.
	pub from: Currency,
	/// The currency being bought.
	pub to: Currency,
	/// The live cross rate: units of `to` per 1 unit of `from`.
	pub spot: f64,
	/// The historical side, possibly still pending.
	pub history: HistoryBlock,
}

impl RateSnapshot {
	/// Composes a snapshot from the live table and a resolved history
	/// block.
	///
	/// A same-currency pair short-circuits to 1 everywhere; no conversion
	/// or analysis is meaningful for it.
	pub fn assemble(
		from: Currency,
		to: Currency,
		table: &RateTable,
		history: HistoryBlock,
	) -> Self {
		if from == to {
			Self {
				from,
				to,
				spot: 1.0,
				history: HistoryBlock::Ready(HistoricalRates::uniform(1.0)),
			}
		} else {
			Self { from, to, spot: table.cross(from, to), history }
		}
	}

	/// The historical cross rate for a horizon, if it resolved.
	pub fn historical(&self, horizon: Horizon) -> Option<f64> {
		match self.history {
			HistoryBlock::Pending => None,
			HistoryBlock::Ready(rates) => rates.get(horizon),
		}
	}

	/// Percentage deviation of the spot rate from a horizon.
	///
	/// Exactly `0.0` whenever the horizon is absent, zero or non-finite,
	/// for any spot value; NaN and infinities never escape.
	pub fn deviation_pct(&self, horizon: Horizon) -> f64 {
		let historical = match self.historical(horizon) {
			Some(rate) if rate.is_finite() && rate != 0.0 => rate,
			_ => return 0.0,
		};
		let diff = (self.spot - historical) / historical * 100.0;
		if diff.is_finite() {
			diff
		} else {
			0.0
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn ready(month: Option<f64>, week: Option<f64>) -> HistoryBlock {
		let mut rates = HistoricalRates::default();
		rates.set(Horizon::Month, month);
		rates.set(Horizon::Week, week);
		HistoryBlock::Ready(rates)
	}

	#[test]
	fn test_assemble_same_currency() {
		let snapshot = RateSnapshot::assemble(
			Currency::Usd,
			Currency::Usd,
			&RateTable::FALLBACK,
			HistoryBlock::Pending,
		);
		assert_eq!(snapshot.spot, 1.0);
		for horizon in Horizon::ALL {
			assert_eq!(snapshot.historical(horizon), Some(1.0));
		}
	}

	#[test]
	fn test_assemble_cross_rate() {
		let snapshot = RateSnapshot::assemble(
			Currency::Usd,
			Currency::Krw,
			&RateTable::FALLBACK,
			HistoryBlock::Pending,
		);
		assert_eq!(snapshot.spot, RateTable::FALLBACK.get(Currency::Usd));
		assert_eq!(snapshot.historical(Horizon::Month), None);
	}

	#[test]
	fn test_deviation_pct() {
		let snapshot = RateSnapshot {
			from: Currency::Usd,
			to: Currency::Krw,
			spot: 102.0,
			history: ready(Some(100.0), Some(104.0)),
		};
		assert_eq!(snapshot.deviation_pct(Horizon::Month), 2.0);
		assert!((snapshot.deviation_pct(Horizon::Week) - (-100.0 * 2.0 / 104.0)).abs() < 1e-12);
	}

	#[test]
	fn test_deviation_pct_absent_is_zero() {
		let snapshot = RateSnapshot {
			from: Currency::Usd,
			to: Currency::Krw,
			spot: 1440.0,
			history: ready(None, None),
		};
		assert_eq!(snapshot.deviation_pct(Horizon::Month), 0.0);

		let pending = RateSnapshot { history: HistoryBlock::Pending, ..snapshot };
		assert_eq!(pending.deviation_pct(Horizon::Week), 0.0);
	}

	#[test]
	fn test_deviation_pct_never_divides_by_zero() {
		let snapshot = RateSnapshot {
			from: Currency::Usd,
			to: Currency::Krw,
			spot: 0.0,
			history: ready(Some(0.0), Some(f64::NAN)),
		};
		assert_eq!(snapshot.deviation_pct(Horizon::Month), 0.0);
		assert_eq!(snapshot.deviation_pct(Horizon::Week), 0.0);
		assert_eq!(snapshot.deviation_pct(Horizon::Year), 0.0);
	}
}
