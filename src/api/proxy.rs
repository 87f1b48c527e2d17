//! Client for the serverless FX proxy in front of the national-bank APIs.
//!
//! The proxy holds the upstream credential server-side and flattens
//! upstream failures into `{ error, message }` bodies. Any `error` field
//! maps onto [`Error`](crate::Error) here; the history resolver then
//! degrades instead of raising.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json as json;

use super::REQUEST_TIMEOUT;
use crate::{currency::Currency, error::Error, rates::RateTable};

/// Environment variable naming the proxy deployment.
pub const PROXY_URL_VAR: &str = "FXNOW_PROXY_URL";

/// The FX proxy endpoints under one base URL.
#[derive(Debug, Clone)]
pub struct Proxy {
	base: String,
}

/// One daily row of a national-bank series.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BankRow {
	/// Trading date, `YYYYMMDD` on the wire.
	#[serde(with = "compact_date")]
	pub date: NaiveDate,
	/// KRW per one quotation unit (per 100 for `JPY(100)`).
	pub value: f64,
}

impl Proxy {
	/// Creates a client for the proxy deployed at `base`.
	pub fn new(base: impl Into<String>) -> Self {
		let mut base = base.into();
		while base.ends_with('/') {
			base.pop();
		}
		Self { base }
	}

	/// Creates a client from the [`FXNOW_PROXY_URL`](PROXY_URL_VAR)
	/// environment variable.
	pub fn from_env() -> Result<Self, Error> {
		std::env::var(PROXY_URL_VAR)
			.ok()
			.filter(|base| !base.is_empty())
			.map(Self::new)
			.ok_or(Error::ConfigError)
	}

	/// Fetches the national-bank rows for `currency` over `[start, end]`.
	///
	/// Picking a row out of the window is the
	/// [resolver](crate::history)'s business.
	pub async fn historical_rows(
		&self,
		client: &reqwest::Client,
		currency: Currency,
		start: NaiveDate,
		end: NaiveDate,
	) -> Result<Vec<BankRow>, Error> {
		let series = currency.bank_code().ok_or(Error::NoData)?;
		let url = format!(
			"{}/historical-rate?currency={}&startDate={}&endDate={}",
			self.base,
			series,
			start.format("%Y%m%d"),
			end.format("%Y%m%d"),
		);
		let payload = self.get(client, &url).await?;
		rows_from_payload(&payload)
	}

	/// Fetches the bank's official current table, already KRW per 1 unit.
	pub async fn current_rates(&self, client: &reqwest::Client) -> Result<RateTable, Error> {
		let url = format!("{}/current-rate?type=current", self.base);
		let payload = self.get(client, &url).await?;
		let rates = payload
			.get("rates")
			.and_then(|rates| rates.as_object())
			.ok_or(Error::ResponseParseError)?;
		let quote = |currency: Currency| {
			rates
				.get(currency.code())
				.and_then(|rate| rate.as_f64())
				.map(|rate| (currency, rate))
				.ok_or(Error::ResponseParseError)
		};
		RateTable::from_quotes([
			quote(Currency::Usd)?,
			quote(Currency::Jpy)?,
			quote(Currency::Eur)?,
			quote(Currency::Gbp)?,
			quote(Currency::Cny)?,
		])
		.ok_or(Error::ResponseParseError)
	}

	/// Fetches the bank's official rate for one currency on one date,
	/// already KRW per 1 unit.
	pub async fn official_rate(
		&self,
		client: &reqwest::Client,
		currency: Currency,
		date: NaiveDate,
	) -> Result<f64, Error> {
		let series = currency.bank_code().ok_or(Error::NoData)?;
		let url = format!(
			"{}/current-rate?type=historical&currency={}&date={}",
			self.base,
			series,
			date.format("%Y%m%d"),
		);
		let payload = self.get(client, &url).await?;
		payload
			.get("rate")
			.and_then(|rate| rate.as_f64())
			.filter(|rate| rate.is_finite() && *rate > 0.0)
			.ok_or(Error::ResponseParseError)
	}

	/// Issues a GET and surfaces the proxy's `{ error, message }` envelope.
	///
	/// The envelope wins over the HTTP status: the proxy reports upstream
	/// timeouts as 504s with a `TIMEOUT` body, and expected no-data periods
	/// as 200s with a `NO_DATA` body.
	async fn get(&self, client: &reqwest::Client, url: &str) -> Result<json::Value, Error> {
		log::debug!("proxy request: {url}");
		let response = client
			.get(url)
			.timeout(REQUEST_TIMEOUT)
			.send()
			.await
			.map_err(Error::http)?;
		let status = response.status();
		let payload = response.json::<json::Value>().await.map_err(Error::http)?;
		if let Some(error) = reply_error(&payload) {
			return Err(error);
		}
		if !status.is_success() {
			return Err(Error::UpstreamError(status.to_string()));
		}
		Ok(payload)
	}
}

/// Maps a proxy `{ error, message }` body onto the error taxonomy.
fn reply_error(payload: &json::Value) -> Option<Error> {
	let error = payload.get("error")?;
	let code = error.as_str().unwrap_or_default();
	let message = payload
		.get("message")
		.and_then(|message| message.as_str())
		.unwrap_or(code);
	Some(match code {
		"NO_DATA" => Error::NoData,
		"TIMEOUT" => Error::TimeoutError,
		_ => Error::UpstreamError(message.to_owned()),
	})
}

/// Pulls the row set out of a `historical-rate` payload.
fn rows_from_payload(payload: &json::Value) -> Result<Vec<BankRow>, Error> {
	let rows = payload.get("rows").ok_or(Error::ResponseParseError)?;
	Vec::<BankRow>::deserialize(rows).map_err(|_| Error::ResponseParseError)
}

mod compact_date {
	use chrono::NaiveDate;
	use serde::{Deserialize, Deserializer};

	const FORMAT: &str = "%Y%m%d";

	pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
	where
		D: Deserializer<'de>,
	{
		let s = String::deserialize(deserializer)?;
		NaiveDate::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn test_rows_from_payload() {
		let payload = json!({
			"rows": [
				{ "date": "20260727", "value": 1431.2 },
				{ "date": "20260730", "value": 1436.8 },
				{ "date": "20260731", "value": 1440.5 },
			]
		});
		let rows = rows_from_payload(&payload).unwrap();
		assert_eq!(rows.len(), 3);
		assert_eq!(rows[2].date, NaiveDate::from_ymd_opt(2026, 7, 31).unwrap());
		assert_eq!(rows[2].value, 1440.5);
	}

	#[test]
	fn test_bad_row_date_is_a_parse_error() {
		let payload = json!({ "rows": [{ "date": "2026-07-31", "value": 1440.5 }] });
		assert!(matches!(rows_from_payload(&payload), Err(Error::ResponseParseError)));
	}

	#[test]
	fn test_missing_rows_is_a_parse_error() {
		assert!(rows_from_payload(&json!({ "success": true })).is_err());
	}

	#[test]
	fn test_reply_error_no_data() {
		let payload = json!({ "error": "NO_DATA", "message": "weekend or holiday" });
		assert!(matches!(reply_error(&payload), Some(Error::NoData)));
	}

	#[test]
	fn test_reply_error_timeout() {
		let payload = json!({ "error": "TIMEOUT", "message": "upstream timed out" });
		assert!(matches!(reply_error(&payload), Some(Error::TimeoutError)));
	}

	#[test]
	fn test_reply_error_other() {
		let payload = json!({ "error": "API_ERROR", "message": "lookup failed" });
		match reply_error(&payload) {
			Some(Error::UpstreamError(message)) => assert_eq!(message, "lookup failed"),
			other => panic!("unexpected mapping: {other:?}"),
		}
	}

	#[test]
	fn test_success_body_has_no_error() {
		assert!(reply_error(&json!({ "rows": [] })).is_none());
		assert!(reply_error(&json!({ "success": true, "rate": 1440.5 })).is_none());
	}

	#[test]
	fn test_base_url_normalized() {
		let proxy = Proxy::new("https://fxnow.example/.netlify/functions/");
		assert_eq!(proxy.base, "https://fxnow.example/.netlify/functions");
	}
}
