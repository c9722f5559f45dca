//! Bearer token redelegation exchange.
//!
//! [`Redelegate`] implements token redelegation for service chaining: an authenticated client
//! presents a bearer token it holds (plus an optional narrower scope) and receives a
//! derivative token minted by its [`Issuer`]. Each call runs strictly in order:
//! extraction, scope tokenization, issuer decision, serialization. Any failure ends the
//! exchange and is returned as an [`Error`] for the surrounding server's error handler.
//!
//! References:
//! - [A Method of Bearer Token Redelegation and Chaining for OAuth 2](https://datatracker.ietf.org/doc/html/draft-richer-oauth-chain-00)

mod builder;

pub use builder::*;

// self
use crate::{
	_prelude::*,
	auth::{IssuedToken, ScopeList},
	config::ExchangeConfig,
	issuer::{Issuer, ScopedIssue, UnscopedIssue},
	obs::{self, ExchangeOutcome, ExchangeSpan},
	request::{ExchangeRequest, TokenEndpointRequest},
	response::{TokenResponse, TokenResponseBody},
};

/// Token exchange handler that asks an [`Issuer`] for derivative tokens.
///
/// Configuration and issuer are fixed at construction and shared read-only by every
/// request, so clones are cheap and concurrent exchanges need no locking. Each exchange makes
/// at most one issuer call and never retries.
pub struct Redelegate<P> {
	config: Arc<ExchangeConfig>,
	issuer: Issuer<P>,
}
impl<P> Redelegate<P>
where
	P: 'static + Clone + Send,
{
	/// Conventional name of the exchange.
	pub const NAME: &'static str = "redelegate";

	/// Creates a handler with the default configuration.
	pub fn new(issuer: Issuer<P>) -> Self {
		Self { config: Arc::new(ExchangeConfig::default()), issuer }
	}

	/// Creates a handler after validating `config`.
	pub fn with_config(config: ExchangeConfig, issuer: Issuer<P>) -> Result<Self> {
		config.validate()?;

		Ok(Self { config: Arc::new(config), issuer })
	}

	/// Creates a handler with the default configuration around a scope-aware issuer.
	pub fn scope_aware(issue: impl 'static + ScopedIssue<P>) -> Self {
		Self::new(Issuer::scope_aware(issue))
	}

	/// Creates a handler with the default configuration around a scope-oblivious issuer.
	pub fn scope_oblivious(issue: impl 'static + UnscopedIssue<P>) -> Self {
		Self::new(Issuer::scope_oblivious(issue))
	}

	/// Returns a builder for handlers with custom configuration.
	pub fn builder() -> RedelegateBuilder<P> {
		RedelegateBuilder::default()
	}

	/// Handler configuration.
	pub fn config(&self) -> &ExchangeConfig {
		&self.config
	}

	/// Handler issuer.
	pub fn issuer(&self) -> &Issuer<P> {
		&self.issuer
	}

	/// Runs the exchange and serializes a successful result into a token response.
	pub async fn exchange<R>(&self, request: &R) -> Result<TokenResponse>
	where
		R: ?Sized + TokenEndpointRequest<Principal = P>,
	{
		self.run(request, "exchange", |issued| TokenResponseBody::new(&issued).into_response())
			.await
	}

	/// Runs the exchange and returns the issued token without serializing it.
	pub async fn issue<R>(&self, request: &R) -> Result<IssuedToken>
	where
		R: ?Sized + TokenEndpointRequest<Principal = P>,
	{
		self.run(request, "issue", Ok).await
	}

	async fn run<R, T, F>(&self, request: &R, stage: &'static str, finish: F) -> Result<T>
	where
		R: ?Sized + TokenEndpointRequest<Principal = P>,
		F: FnOnce(IssuedToken) -> Result<T>,
	{
		let span =
			ExchangeSpan::new(stage, &self.config.principal_field, self.issuer.is_scope_aware());

		obs::record_exchange_outcome(ExchangeOutcome::Attempt);

		// The request is only borrowed until extraction completes.
		let extracted = ExchangeRequest::extract(request, &self.config);
		let result = span
			.instrument(async move {
				let ExchangeRequest { principal, token, raw_scope } = extracted?;
				let scope = raw_scope.map(|raw| {
					let scope = ScopeList::tokenize(&raw, &self.config.separators);

					obs::scope_tokenized(&scope);

					scope
				});
				let issued = self.issuer.invoke(principal, token, scope).await?;

				finish(issued)
			})
			.await;

		if let Err(e) = &result {
			obs::exchange_failed(e);
		}

		obs::record_exchange_outcome(ExchangeOutcome::of(&result));

		result
	}
}
impl<P> Clone for Redelegate<P> {
	fn clone(&self) -> Self {
		Self { config: self.config.clone(), issuer: self.issuer.clone() }
	}
}
impl<P> Debug for Redelegate<P> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Redelegate")
			.field("config", &self.config)
			.field("issuer", &self.issuer)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		_preludet::{TestClient, TestRedelegate, issue_fixed, test_request},
		auth::TokenSecret,
		error::BoxError,
		issuer::IssueDecision,
	};

	#[test]
	fn handler_is_named_redelegate() {
		assert_eq!(TestRedelegate::NAME, "redelegate");
	}

	#[tokio::test]
	async fn issue_returns_token_without_serializing() {
		let handler =
			TestRedelegate::scope_oblivious(|_: TestClient, _: TokenSecret| issue_fixed("s3cr1t"));
		let request = test_request("user", TestClient::new("c123"), [("token", "shh")]);
		let issued = handler.issue(&request).await.expect("Exchange should issue a token.");

		assert_eq!(issued.access_token.expose(), "s3cr1t");
		assert_eq!(*issued.token_type(), "Bearer");
	}

	#[tokio::test]
	async fn validation_failures_skip_the_issuer() {
		let handler = TestRedelegate::scope_oblivious(|_: TestClient, _: TokenSecret| async {
			Err::<IssueDecision, BoxError>("issuer must not be called".into())
		});
		let request = test_request("user", TestClient::new("c123"), [("scope", "read")]);
		let err = handler.exchange(&request).await.expect_err("Missing token must fail.");

		assert_eq!(err.code(), Some("invalid_request"));
	}

	#[test]
	fn invalid_config_is_rejected_at_construction() {
		let config = ExchangeConfig { principal_field: String::new(), ..Default::default() };
		let result = TestRedelegate::with_config(
			config,
			Issuer::scope_oblivious(|_: TestClient, _: TokenSecret| issue_fixed("s3cr1t")),
		);

		assert!(matches!(result, Err(Error::Config(_))));
	}

	#[test]
	fn clones_share_configuration() {
		let handler = TestRedelegate::scope_aware(
			|_: TestClient, _: TokenSecret, _: Option<ScopeList>| issue_fixed("s3cr1t"),
		);
		let clone = handler.clone();

		assert!(Arc::ptr_eq(&handler.config, &clone.config));
		assert!(clone.issuer().is_scope_aware());
	}
}
