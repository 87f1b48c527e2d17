//! The application controller: owned state, fetch batches and the
//! refresh loop.

use std::time::Duration;

use chrono::Local;

use crate::{
	advise::{advise, Advice},
	api::{latest, proxy::Proxy},
	convert::{convert, Conversion},
	currency::Currency,
	error::Error,
	history,
	rates::RateTable,
	snapshot::RateSnapshot,
};

/// How often the full refresh re-runs.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(3600);

/// The upstream endpoints a refresh needs, plus the shared HTTP client.
#[derive(Debug, Clone)]
pub struct Sources {
	/// Shared HTTP client.
	pub client: reqwest::Client,
	/// The FX proxy deployment.
	pub proxy: Proxy,
}

impl Sources {
	/// Creates the source bundle for a proxy deployment.
	pub fn new(proxy: Proxy) -> Result<Self, Error> {
		let client = reqwest::Client::builder()
			.user_agent(concat!("fxnow/", env!("CARGO_PKG_VERSION")))
			.build()
			.map_err(Error::http)?;
		Ok(Self { client, proxy })
	}

	/// Creates the bundle with the proxy taken from the environment.
	pub fn from_env() -> Result<Self, Error> {
		Self::new(Proxy::from_env()?)
	}
}

/// Fetches the live table, degrading through the bank's official table to
/// the static fallback. Never fails the caller; every outcome carries all
/// six rates.
pub async fn fetch_current_rates(sources: &Sources) -> RateTable {
	match latest::fetch(&sources.client).await {
		Ok(table) => {
			log::info!("live rates loaded; 1 USD = {:.2} KRW", table.get(Currency::Usd));
			return table;
		}
		Err(error) => log::warn!("mid-market snapshot failed: {error}"),
	}
	match sources.proxy.current_rates(&sources.client).await {
		Ok(table) => {
			log::info!("official bank rates loaded; 1 USD = {:.2} KRW", table.get(Currency::Usd));
			table
		}
		Err(error) => {
			log::warn!("official rate fetch failed: {error}; using the static fallback");
			RateTable::FALLBACK
		}
	}
}

/// The widget's entire mutable state, owned in one place.
///
/// The engines stay pure; the controller feeds them the current table and
/// snapshot and replaces both atomically when a fetch batch lands.
#[derive(Debug, Clone)]
pub struct AppState {
	from: Currency,
	to: Currency,
	rates: RateTable,
	snapshot: Option<RateSnapshot>,
	batch: u64,
}

impl AppState {
	/// Creates the state for an initial pair.
	///
	/// The table starts at the static fallback so conversion works before
	/// the first refresh; the snapshot stays empty until a batch lands.
	pub fn new(from: Currency, to: Currency) -> Self {
		Self { from, to, rates: RateTable::FALLBACK, snapshot: None, batch: 0 }
	}

	/// The current pair as `(from, to)`.
	pub fn pair(&self) -> (Currency, Currency) {
		(self.from, self.to)
	}

	/// The current rate table.
	pub fn rates(&self) -> RateTable {
		self.rates
	}

	/// The current snapshot, if a batch has landed for this pair.
	pub fn snapshot(&self) -> Option<&RateSnapshot> {
		self.snapshot.as_ref()
	}

	/// Converts `amount` over the current table.
	pub fn convert(&self, amount: f64) -> Conversion {
		convert(amount, self.from, self.to, &self.rates)
	}

	/// The recommendation for `amount`; pending until a snapshot lands.
	pub fn advise(&self, amount: f64) -> Advice {
		match &self.snapshot {
			Some(snapshot) => advise(snapshot, amount),
			None if self.from == self.to => Advice::SameCurrency,
			None => Advice::HistoryPending,
		}
	}

	/// Runs a full refresh: live table plus historical block, one batch.
	pub async fn refresh(&mut self, sources: &Sources) {
		let batch = self.begin_batch();
		let (from, to) = (self.from, self.to);
		let rates = fetch_current_rates(sources).await;
		let today = Local::now().date_naive();
		let block =
			history::resolve(&sources.client, &sources.proxy, &rates, from, to, today).await;
		let snapshot = RateSnapshot::assemble(from, to, &rates, block);
		self.install(batch, rates, snapshot);
	}

	/// Switches the pair, re-resolving history over the existing table.
	pub async fn set_pair(&mut self, from: Currency, to: Currency, sources: &Sources) {
		self.from = from;
		self.to = to;
		self.snapshot = None;
		let batch = self.begin_batch();
		let rates = self.rates;
		let today = Local::now().date_naive();
		let block =
			history::resolve(&sources.client, &sources.proxy, &rates, from, to, today).await;
		let snapshot = RateSnapshot::assemble(from, to, &rates, block);
		self.install(batch, rates, snapshot);
	}

	/// Refreshes on [`REFRESH_INTERVAL`], forever. The first tick fires
	/// immediately.
	///
	/// A refresh is awaited inline and ticks landing while one is in
	/// flight are skipped, so refreshes never overlap or interleave their
	/// writes.
	pub async fn run(&mut self, sources: &Sources) {
		let mut ticker = tokio::time::interval(REFRESH_INTERVAL);
		ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
		loop {
			ticker.tick().await;
			self.refresh(sources).await;
			if let Some(snapshot) = self.snapshot() {
				log::info!(
					"refreshed {}/{}: spot {:.4}",
					snapshot.from,
					snapshot.to,
					snapshot.spot,
				);
			}
		}
	}

	/// Starts a fetch batch, invalidating every batch started earlier.
	fn begin_batch(&mut self) -> u64 {
		self.batch += 1;
		self.batch
	}

	/// Installs a batch's results atomically, unless a newer batch has
	/// started since.
	///
	/// Returns whether the results were installed. Stale batches are
	/// discarded wholesale, so a slow fetch can never overwrite a newer
	/// one's table or snapshot.
	fn install(&mut self, batch: u64, rates: RateTable, snapshot: RateSnapshot) -> bool {
		if batch != self.batch {
			log::debug!("discarding stale batch {batch} (current {})", self.batch);
			return false;
		}
		self.rates = rates;
		self.snapshot = Some(snapshot);
		true
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::history::HistoryBlock;

	fn batch_results(state: &AppState) -> (RateTable, RateSnapshot) {
		let (from, to) = state.pair();
		let rates = RateTable::FALLBACK;
		(rates, RateSnapshot::assemble(from, to, &rates, HistoryBlock::Pending))
	}

	#[test]
	fn test_starts_on_fallback_and_pending() {
		let state = AppState::new(Currency::Krw, Currency::Usd);
		assert_eq!(state.rates(), RateTable::FALLBACK);
		assert!(state.snapshot().is_none());
		assert_eq!(state.advise(100.0), Advice::HistoryPending);
		// Conversion is never blocked on history.
		let conversion = state.convert(100000.0);
		assert!(conversion.amount > 0.0);
	}

	#[test]
	fn test_same_currency_advice_before_any_batch() {
		let state = AppState::new(Currency::Usd, Currency::Usd);
		assert_eq!(state.advise(1.0), Advice::SameCurrency);
	}

	#[test]
	fn test_stale_batch_is_discarded() {
		let mut state = AppState::new(Currency::Krw, Currency::Usd);
		let stale = state.begin_batch();
		let newest = state.begin_batch();
		let (rates, snapshot) = batch_results(&state);

		assert!(!state.install(stale, rates, snapshot));
		assert!(state.snapshot().is_none());

		assert!(state.install(newest, rates, snapshot));
		assert_eq!(state.snapshot(), Some(&snapshot));
	}

	#[test]
	fn test_install_replaces_wholesale() {
		let mut state = AppState::new(Currency::Krw, Currency::Usd);
		let batch = state.begin_batch();
		let (rates, snapshot) = batch_results(&state);
		assert!(state.install(batch, rates, snapshot));

		let next = state.begin_batch();
		let updated = RateTable::from_quotes([
			(Currency::Usd, 1500.0),
			(Currency::Jpy, 10.0),
			(Currency::Eur, 1650.0),
			(Currency::Gbp, 1900.0),
			(Currency::Cny, 205.0),
		])
		.unwrap();
		let (from, to) = state.pair();
		let refreshed = RateSnapshot::assemble(from, to, &updated, HistoryBlock::Pending);
		assert!(state.install(next, updated, refreshed));
		assert_eq!(state.rates(), updated);
		assert_eq!(state.snapshot().unwrap().spot, 1.0 / 1500.0);
	}
}
