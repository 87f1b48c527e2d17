//! Historical rate resolution: horizons, the bank lag policy and the
//! per-pair history block.

use chrono::{Duration, NaiveDate};

use crate::{
	api::frankfurter,
	api::proxy::{BankRow, Proxy},
	currency::Currency,
	error::Error,
	rates::RateTable,
};

/// A historical lookback window.
#[derive(Debug, Hash, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Horizon {
	/// One calendar day ago.
	Yesterday,
	/// Seven calendar days ago.
	Week,
	/// Thirty calendar days ago.
	Month,
	/// A year ago.
	Year,
}

impl Horizon {
	/// All horizons, nearest first.
	pub const ALL: [Horizon; 4] = [Self::Yesterday, Self::Week, Self::Month, Self::Year];

	/// Calendar days between today and the horizon.
	pub const fn days_ago(self) -> i64 {
		match self {
			Self::Yesterday => 1,
			Self::Week => 7,
			Self::Month => 30,
			Self::Year => 365,
		}
	}

	/// Short label for rendering.
	pub const fn label(self) -> &'static str {
		match self {
			Self::Yesterday => "yesterday",
			Self::Week => "7 days ago",
			Self::Month => "1 month ago",
			Self::Year => "1 year ago",
		}
	}

	const fn index(self) -> usize {
		self as usize
	}
}

/// Per-horizon historical cross rates for one pair.
///
/// An absent horizon is [`None`]; a zero is never used to mean "missing".
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HistoricalRates([Option<f64>; Horizon::ALL.len()]);

impl HistoricalRates {
	/// A block with every horizon at the same rate.
	pub fn uniform(rate: f64) -> Self {
		Self([Some(rate); Horizon::ALL.len()])
	}

	/// Gets the rate for a horizon, if it resolved.
	pub fn get(self, horizon: Horizon) -> Option<f64> {
		self.0[horizon.index()]
	}

	/// Sets the rate for a horizon.
	pub fn set(&mut self, horizon: Horizon, rate: Option<f64>) {
		self.0[horizon.index()] = rate;
	}

	/// Whether no horizon resolved at all.
	pub fn is_empty(self) -> bool {
		self.0.iter().all(Option::is_none)
	}
}

/// The historical side of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HistoryBlock {
	/// No horizon resolved; the recommendation is withheld until a later
	/// batch succeeds.
	Pending,
	/// At least one horizon resolved; absent horizons stay [`None`].
	Ready(HistoricalRates),
}

/// Settlement-lag padding applied to every national-bank window, in days.
///
/// The bank publishes several business days behind the calendar, so the
/// window for a horizon ends `days_ago + BANK_LAG_DAYS` before today
/// rather than at the nominal date.
pub const BANK_LAG_DAYS: i64 = 5;

/// Width of the national-bank query window, in days.
///
/// Wide enough to bridge weekend and holiday runs just before the window
/// end, mirroring the widening the proxy itself applies upstream.
const BANK_WINDOW_DAYS: i64 = 30;

/// Resolves the full historical block for a pair.
///
/// All four horizons are fetched concurrently and joined. Partial
/// availability is kept per-horizon; a fully empty set collapses to
/// [`HistoryBlock::Pending`].
pub async fn resolve(
	client: &reqwest::Client,
	proxy: &Proxy,
	table: &RateTable,
	from: Currency,
	to: Currency,
	today: NaiveDate,
) -> HistoryBlock {
	if from == to {
		return HistoryBlock::Ready(HistoricalRates::uniform(1.0));
	}

	let mut rates = HistoricalRates::default();

	if from.is_pivot() || to.is_pivot() {
		let target = if from.is_pivot() { to } else { from };
		let (yesterday, week, month, year) = tokio::join!(
			bank_rate(client, proxy, target, Horizon::Yesterday, today),
			bank_rate(client, proxy, target, Horizon::Week, today),
			bank_rate(client, proxy, target, Horizon::Month, today),
			bank_rate(client, proxy, target, Horizon::Year, today),
		);
		for (horizon, rate) in Horizon::ALL.into_iter().zip([yesterday, week, month, year]) {
			rates.set(horizon, rate.map(|rate| orient(rate, from)));
		}
	} else {
		let spot = table.cross(from, to);
		let (yesterday, week, month, year) = tokio::join!(
			market_rate(client, from, to, Horizon::Yesterday, today, spot),
			market_rate(client, from, to, Horizon::Week, today, spot),
			market_rate(client, from, to, Horizon::Month, today, spot),
			market_rate(client, from, to, Horizon::Year, today, spot),
		);
		for (horizon, rate) in Horizon::ALL.into_iter().zip([yesterday, week, month, year]) {
			rates.set(horizon, Some(rate));
		}
	}

	if rates.is_empty() {
		log::warn!("no historical data resolved for {from}/{to}");
	}
	block_from(rates)
}

/// Accepts a horizon set: partial availability stays per-horizon, while a
/// fully empty set collapses to [`HistoryBlock::Pending`].
fn block_from(rates: HistoricalRates) -> HistoryBlock {
	if rates.is_empty() {
		HistoryBlock::Pending
	} else {
		HistoryBlock::Ready(rates)
	}
}

/// Resolves one national-bank horizon; faults and empty windows become
/// [`None`], never errors.
async fn bank_rate(
	client: &reqwest::Client,
	proxy: &Proxy,
	currency: Currency,
	horizon: Horizon,
	today: NaiveDate,
) -> Option<f64> {
	let (start, end) = bank_window(today, horizon);
	match proxy.historical_rows(client, currency, start, end).await {
		Ok(rows) => {
			let rate = newest_in_window(&rows, start, end, currency);
			if rate.is_none() {
				log::warn!("no bank rows for {currency} {}", horizon.label());
			}
			rate
		}
		Err(Error::NoData) => {
			log::warn!("no bank data for {currency} {} (weekend/holiday)", horizon.label());
			None
		}
		Err(error) => {
			log::warn!("bank lookup failed for {currency} {}: {error}", horizon.label());
			None
		}
	}
}

/// Resolves one horizon of a non-pivot pair.
///
/// Missing data falls back to the live spot rate for the horizon, unlike
/// the bank path where a miss stays missing.
async fn market_rate(
	client: &reqwest::Client,
	from: Currency,
	to: Currency,
	horizon: Horizon,
	today: NaiveDate,
	spot: f64,
) -> f64 {
	let date = today - Duration::days(horizon.days_ago());
	match frankfurter::rate_on(client, date, from, to).await {
		Ok(rate) => rate,
		Err(error) => {
			log::warn!(
				"pair history miss for {from}/{to} {}: {error}; using spot",
				horizon.label(),
			);
			spot
		}
	}
}

/// The `[start, end]` bank query window for a horizon.
///
/// The end is pushed [`BANK_LAG_DAYS`] past the nominal offset; rows near
/// the unpadded date are deliberately out of range.
fn bank_window(today: NaiveDate, horizon: Horizon) -> (NaiveDate, NaiveDate) {
	let end = today - Duration::days(horizon.days_ago() + BANK_LAG_DAYS);
	(end - Duration::days(BANK_WINDOW_DAYS), end)
}

/// Picks the newest row inside the window and scales it to KRW per 1 unit.
fn newest_in_window(
	rows: &[BankRow],
	start: NaiveDate,
	end: NaiveDate,
	currency: Currency,
) -> Option<f64> {
	rows.iter()
		.filter(|row| (start..=end).contains(&row.date))
		.max_by_key(|row| row.date)
		.map(|row| row.value / currency.bank_unit())
		.filter(|rate| rate.is_finite() && *rate > 0.0)
}

/// Turns a bank quote (KRW per 1 unit of foreign) into the pair's cross
/// rate: KRW→foreign pairs need the reciprocal, foreign→KRW pairs use it
/// as is.
fn orient(krw_per_unit: f64, from: Currency) -> f64 {
	if from.is_pivot() {
		1.0 / krw_per_unit
	} else {
		krw_per_unit
	}
}
