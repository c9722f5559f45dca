//! Optional observability helpers for the exchange.
//!
//! # Feature Flags
//!
//! - Enable `tracing` (default) to run every exchange inside a span named
//!   `oauth2_redelegate.exchange` carrying the `stage`, `principal_field`, and `scope_aware`
//!   fields, plus debug events for scope tokenization.
//! - Enable `metrics` to increment the `oauth2_redelegate_exchange_total` counter for every
//!   attempt/success/declined/failure, labeled by `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded for each exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExchangeOutcome {
	/// Entry to the exchange.
	Attempt,
	/// A derivative token was issued.
	Success,
	/// The issuer declined to issue a token.
	Declined,
	/// Any other failure propagated back to the caller.
	Failure,
}
impl ExchangeOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ExchangeOutcome::Attempt => "attempt",
			ExchangeOutcome::Success => "success",
			ExchangeOutcome::Declined => "declined",
			ExchangeOutcome::Failure => "failure",
		}
	}

	/// Classifies a finished exchange.
	pub fn of<T>(result: &Result<T>) -> Self {
		match result {
			Ok(_) => ExchangeOutcome::Success,
			Err(Error::Token(e)) if e.status == 403 => ExchangeOutcome::Declined,
			Err(_) => ExchangeOutcome::Failure,
		}
	}
}
impl Display for ExchangeOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
