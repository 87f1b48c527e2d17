//! The general historical-rate endpoint, used for pairs without the pivot.

use chrono::NaiveDate;
use serde_json as json;

use super::REQUEST_TIMEOUT;
use crate::{currency::Currency, error::Error};

const BASE: &str = "https://api.frankfurter.app";

/// Fetches the closing cross rate for `(from, to)` on `date`.
pub async fn rate_on(
	client: &reqwest::Client,
	date: NaiveDate,
	from: Currency,
	to: Currency,
) -> Result<f64, Error> {
	let url = format!("{BASE}/{}?from={from}&to={to}", date.format("%Y-%m-%d"));
	log::debug!("pair history request: {url}");
	let payload = client
		.get(&url)
		.timeout(REQUEST_TIMEOUT)
		.send()
		.await
		.map_err(Error::http)?
		.error_for_status()
		.map_err(Error::http)?
		.json::<json::Value>()
		.await
		.map_err(Error::http)?;
	rate_from_payload(&payload, to)
}

/// Pulls the `to` rate out of a dated payload.
fn rate_from_payload(payload: &json::Value, to: Currency) -> Result<f64, Error> {
	payload
		.get("rates")
		.and_then(|rates| rates.get(to.code()))
		.and_then(|rate| rate.as_f64())
		.filter(|rate| rate.is_finite() && *rate > 0.0)
		.ok_or(Error::NoData)
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn test_rate_from_payload() {
		let payload = json!({
			"base": "USD",
			"date": "2026-07-07",
			"rates": { "JPY": 147.25 }
		});
		assert_eq!(rate_from_payload(&payload, Currency::Jpy).unwrap(), 147.25);
	}

	#[test]
	fn test_missing_rate_is_no_data() {
		let payload = json!({ "rates": {} });
		assert!(matches!(rate_from_payload(&payload, Currency::Jpy), Err(Error::NoData)));
	}

	#[test]
	fn test_zero_rate_is_no_data() {
		let payload = json!({ "rates": { "JPY": 0.0 } });
		assert!(matches!(rate_from_payload(&payload, Currency::Jpy), Err(Error::NoData)));
	}
}
