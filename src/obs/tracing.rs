// self
use crate::{_prelude::*, auth::ScopeList};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedExchange<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedExchange<F> = F;

/// A span builder used by the exchange.
#[derive(Clone, Debug)]
pub struct ExchangeSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl ExchangeSpan {
	/// Creates a new span tagged with the call site and handler shape.
	pub fn new(stage: &'static str, principal_field: &str, scope_aware: bool) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"oauth2_redelegate.exchange",
				stage,
				principal_field,
				scope_aware
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (stage, principal_field, scope_aware);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedExchange<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a debug event describing a tokenized scope without exposing tokens.
pub fn scope_tokenized(scope: &ScopeList) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(
			scope_count = scope.len(),
			scope_fingerprint = %scope.fingerprint(),
			"Tokenized requested scope."
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = scope;
	}
}

/// Notes that a requested scope is withheld from a scope-oblivious issuer.
pub fn scope_withheld(scope: &ScopeList) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(
			scope_fingerprint = %scope.fingerprint(),
			"Issuer does not accept scope; requested scope is ignored."
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = scope;
	}
}

/// Emits a warning for failures the client cannot fix.
pub fn exchange_failed(error: &Error) {
	#[cfg(feature = "tracing")]
	{
		match error {
			Error::Token(e) => tracing::debug!(code = e.code(), status = e.status, "{e}"),
			_ => tracing::warn!(error = %error, "Redelegation failed."),
		}
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = error;
	}
}
