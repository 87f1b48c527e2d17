//! Engine for the fxnow currency-conversion widget.
//!
//! Fetches live and historical KRW-pivot exchange rates, converts amounts
//! between a fixed six-currency set, and derives a "should I exchange
//! now" recommendation from how the spot rate compares to recent history.
//! Rendering is the host's business; everything here is data in, data
//! out.

#![deny(missing_docs)]

pub mod advise;
pub mod api;
pub mod app;
pub mod convert;
pub mod currency;
pub mod error;
pub mod history;
pub mod rates;
pub mod snapshot;

pub use advise::{advise, Advice, ProfitLoss, ShortTermNote, Signal, Timing};
pub use app::{fetch_current_rates, AppState, Sources};
pub use convert::{convert, Conversion, DisplayRate};
pub use currency::Currency;
pub use error::Error;
pub use history::{HistoricalRates, HistoryBlock, Horizon};
pub use rates::RateTable;
pub use snapshot::RateSnapshot;
