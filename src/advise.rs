//! The decision engine: timing category, short-term note and profit/loss.

use std::fmt::{self, Display, Formatter};

use crate::{history::Horizon, snapshot::RateSnapshot};

/// Month-horizon deviations inside this band count as "about average", in
/// percent.
pub const NEUTRAL_BAND_PCT: f64 = 1.0;

/// Week-horizon deviations beyond this add a short-term note, in percent.
pub const SHORT_TERM_PCT: f64 = 2.0;

/// Profit/loss magnitudes at or below this report as flat, so
/// floating-point noise never flips the arrows.
pub const FLAT_DELTA: f64 = 0.01;

/// The "should I exchange now" recommendation for a pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Advice {
	/// Both sides are the same currency; no decision is possible.
	SameCurrency,
	/// Historical data has not resolved yet; the signal is withheld.
	HistoryPending,
	/// A full timing signal.
	Signal(Signal),
}

/// Whether now is a good moment to exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timing {
	/// The rate favors converting now.
	Favorable,
	/// Waiting is likely to pay off.
	Unfavorable,
	/// About the one-month average.
	Neutral,
}

/// Short-term movement worth flagging alongside the main signal.
///
/// Never changes the category; it only amplifies or tempers it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShortTermNote {
	/// The rate rose over the last week by this much percent.
	Rising(f64),
	/// The rate fell over the last week by this much percent (negative).
	Falling(f64),
}

/// What converting now yields vs. a historical rate, in the `to` currency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProfitLoss {
	/// Converting now yields this much more.
	Gain(f64),
	/// Converting now yields this much less.
	Loss(f64),
	/// Within noise; no directional signal.
	Flat,
}

/// A resolved recommendation with its supporting numbers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Signal {
	/// The timing category on the month horizon.
	pub timing: Timing,
	/// Deviation from the month horizon, percent.
	pub month_pct: f64,
	/// Deviation from the week horizon, percent.
	pub week_pct: f64,
	/// Present when the week moved more than [`SHORT_TERM_PCT`].
	pub short_term: Option<ShortTermNote>,
	/// Per-horizon profit/loss for the input amount.
	pub deltas: [(Horizon, ProfitLoss); Horizon::ALL.len()],
}

/// Derives the recommendation for converting `amount` over the snapshot's
/// pair.
///
/// The month horizon gates the whole signal: without it (absent, zero or
/// non-finite all read as unavailable) the advice is
/// [`Advice::HistoryPending`] and profit/loss is withheld.
///
/// The sign-to-category mapping depends on which side is the pivot: a
/// spot above the month average means the foreign side buys more KRW, so
/// it favors selling KRW and disfavors selling the foreign currency.
pub fn advise(snapshot: &RateSnapshot, amount: f64) -> Advice {
	if snapshot.from == snapshot.to {
		return Advice::SameCurrency;
	}
	let month = snapshot
		.historical(Horizon::Month)
		.filter(|rate| rate.is_finite() && *rate > 0.0);
	if month.is_none() {
		return Advice::HistoryPending;
	}

	let month_pct = snapshot.deviation_pct(Horizon::Month);
	let week_pct = snapshot.deviation_pct(Horizon::Week);

	let timing = if month_pct.abs() < NEUTRAL_BAND_PCT {
		Timing::Neutral
	} else if (month_pct > 0.0) == snapshot.from.is_pivot() {
		Timing::Favorable
	} else {
		Timing::Unfavorable
	};

	let short_term = if week_pct > SHORT_TERM_PCT {
		Some(ShortTermNote::Rising(week_pct))
	} else if week_pct < -SHORT_TERM_PCT {
		Some(ShortTermNote::Falling(week_pct))
	} else {
		None
	};

	let deltas = Horizon::ALL.map(|horizon| (horizon, profit_loss(snapshot, amount, horizon)));

	Advice::Signal(Signal { timing, month_pct, week_pct, short_term, deltas })
}

/// Profit/loss of converting `amount` now vs. at a horizon's rate, in the
/// `to` currency.
///
/// An absent horizon contributes no signal (the spot stands in, making
/// the delta zero); magnitudes at or below [`FLAT_DELTA`] are flat.
pub fn profit_loss(snapshot: &RateSnapshot, amount: f64, horizon: Horizon) -> ProfitLoss {
	let historical = snapshot.historical(horizon).unwrap_or(snapshot.spot);
	let delta = amount * (snapshot.spot - historical);
	if !delta.is_finite() || delta.abs() <= FLAT_DELTA {
		ProfitLoss::Flat
	} else if delta > 0.0 {
		ProfitLoss::Gain(delta)
	} else {
		ProfitLoss::Loss(-delta)
	}
}

impl Display for Advice {
	fn fmt(&self, f: &mut Formatter) -> fmt::Result {
		match self {
			Self::SameCurrency => {
				"both sides are the same currency; pick another one to compare".fmt(f)
			}
			Self::HistoryPending => {
				"historical rate data is still loading; the recommendation will appear once it lands"
					.fmt(f)
			}
			Self::Signal(signal) => signal.fmt(f),
		}
	}
}

impl Display for Signal {
	fn fmt(&self, f: &mut Formatter) -> fmt::Result {
		match self.timing {
			Timing::Neutral => {
				write!(f, "the rate is about its one-month average; reasonable timing")?;
			}
			Timing::Favorable => write!(
				f,
				"the rate is {:+.1}% vs its one-month average: favorable, a good time to exchange",
				self.month_pct,
			)?,
			Timing::Unfavorable => write!(
				f,
				"the rate is {:+.1}% vs its one-month average: unfavorable, waiting may pay off",
				self.month_pct,
			)?,
		}
		if let Some(note) = self.short_term {
			write!(f, " ({note})")?;
		}
		Ok(())
	}
}

impl Display for ShortTermNote {
	fn fmt(&self, f: &mut Formatter) -> fmt::Result {
		match self {
			Self::Rising(pct) => write!(
				f,
				"up {pct:.1}% over the last 7 days, so short-term it is on the expensive side",
			),
			Self::Falling(pct) => write!(
				f,
				"down {:.1}% over the last 7 days, so short-term this is a good window",
				pct.abs(),
			),
		}
	}
}

impl Display for ProfitLoss {
	fn fmt(&self, f: &mut Formatter) -> fmt::Result {
		match self {
			Self::Gain(delta) => write!(f, "▲ {delta:.2} more received now"),
			Self::Loss(delta) => write!(f, "▼ {delta:.2} less received now"),
			Self::Flat => "± about the same".fmt(f),
		}
	}
}
