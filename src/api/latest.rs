//! The mid-market snapshot endpoint.

use serde_json as json;

use super::REQUEST_TIMEOUT;
use crate::{currency::Currency, error::Error, rates::RateTable};

const URL: &str = "https://api.exchangerate-api.com/v4/latest/USD";

/// Fetches the current mid-market snapshot, normalized to the KRW pivot.
pub async fn fetch(client: &reqwest::Client) -> Result<RateTable, Error> {
	log::debug!("mid-market request: {URL}");
	let payload = client
		.get(URL)
		.timeout(REQUEST_TIMEOUT)
		.send()
		.await
		.map_err(Error::http)?
		.error_for_status()
		.map_err(Error::http)?
		.json::<json::Value>()
		.await
		.map_err(Error::http)?;
	table_from_payload(&payload)
}

/// Normalizes a `latest/USD` payload into a KRW-pivot table.
///
/// The endpoint quotes everything per 1 USD, so KRW per 1 X is
/// `usd_to_krw / rates[X]`.
fn table_from_payload(payload: &json::Value) -> Result<RateTable, Error> {
	let rates = payload
		.get("rates")
		.and_then(|rates| rates.as_object())
		.ok_or(Error::ResponseParseError)?;
	let per_usd = |currency: Currency| {
		rates
			.get(currency.code())
			.and_then(|rate| rate.as_f64())
			.filter(|rate| rate.is_finite() && *rate > 0.0)
			.ok_or(Error::ResponseParseError)
	};
	let usd_to_krw = per_usd(Currency::Krw)?;
	RateTable::from_quotes([
		(Currency::Usd, usd_to_krw),
		(Currency::Jpy, usd_to_krw / per_usd(Currency::Jpy)?),
		(Currency::Eur, usd_to_krw / per_usd(Currency::Eur)?),
		(Currency::Gbp, usd_to_krw / per_usd(Currency::Gbp)?),
		(Currency::Cny, usd_to_krw / per_usd(Currency::Cny)?),
	])
	.ok_or(Error::ResponseParseError)
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn test_table_from_payload() {
		let payload = json!({
			"base": "USD",
			"rates": {
				"USD": 1.0,
				"KRW": 1440.0,
				"JPY": 147.0,
				"EUR": 0.9,
				"GBP": 0.78,
				"CNY": 7.2,
			}
		});
		let table = table_from_payload(&payload).unwrap();
		assert_eq!(table.get(Currency::Krw), 1.0);
		assert_eq!(table.get(Currency::Usd), 1440.0);
		assert_eq!(table.get(Currency::Jpy), 1440.0 / 147.0);
		assert_eq!(table.get(Currency::Cny), 1440.0 / 7.2);
	}

	#[test]
	fn test_missing_currency_is_a_parse_error() {
		let payload = json!({ "rates": { "KRW": 1440.0, "JPY": 147.0 } });
		assert!(matches!(table_from_payload(&payload), Err(Error::ResponseParseError)));
	}

	#[test]
	fn test_zero_rate_is_a_parse_error() {
		let payload = json!({
			"rates": { "KRW": 1440.0, "JPY": 0.0, "EUR": 0.9, "GBP": 0.78, "CNY": 7.2 }
		});
		assert!(matches!(table_from_payload(&payload), Err(Error::ResponseParseError)));
	}

	#[test]
	fn test_missing_rates_object() {
		assert!(table_from_payload(&json!({ "result": "error" })).is_err());
	}
}
