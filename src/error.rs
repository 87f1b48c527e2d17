//! [`Error`] type.

/// An error from an upstream source or from the HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// The upstream request timed out.
	#[error("the upstream request timed out")]
	TimeoutError,
	/// HTTP error.
	#[error("http error: {0}")]
	HttpError(#[from] reqwest::Error),
	/// The upstream had no rows for the requested period.
	///
	/// Expected on weekends and holidays; callers degrade, never abort.
	#[error("the upstream has no data for the requested period")]
	NoData,
	/// The upstream reported a failure.
	#[error("upstream error: {0}")]
	UpstreamError(String),
	/// The proxy base URL is not configured.
	#[error("the proxy base URL is not configured (set FXNOW_PROXY_URL)")]
	ConfigError,
	/// Failed to parse the response.
	#[error("failed to parse the response")]
	ResponseParseError,
	/// No historical horizon could be resolved for the pair.
	#[error("historical data for the pair is still pending")]
	HistoryUnavailable,
}

impl Error {
	/// Wraps a [`reqwest`] error, folding timeouts into [`Error::TimeoutError`].
	pub(crate) fn http(error: reqwest::Error) -> Self {
		if error.is_timeout() {
			Self::TimeoutError
		} else {
			Self::HttpError(error)
		}
	}
}
