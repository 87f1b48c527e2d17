//! Clients for the upstream rate sources.
//!
//! Every fetch function borrows a shared [`reqwest::Client`] and translates
//! upstream failure shapes into [`Error`](crate::Error); the policy of
//! falling back or degrading lives with the callers.

pub mod frankfurter;
pub mod latest;
pub mod proxy;

use std::time::Duration;

/// Per-request timeout applied to every upstream call.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
