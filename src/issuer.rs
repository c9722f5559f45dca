//! Issuer contracts and the guarded invocation that turns decisions into results.
//!
//! An issuer decides whether a derivative token may be minted for the caller. Issuers come
//! in two shapes chosen once at construction: [`Issuer::ScopeAware`] receives the tokenized
//! scope, [`Issuer::ScopeOblivious`] never does. Plain async closures implement both
//! contracts, so most integrations look like:
//!
//! ```
//! use oauth2_redelegate::{
//! 	auth::{ScopeList, TokenSecret},
//! 	error::BoxError,
//! 	issuer::{IssueDecision, Issuer},
//! };
//!
//! struct Client {
//! 	id: String,
//! }
//!
//! let issuer = Issuer::scope_aware(
//! 	|client: Client, token: TokenSecret, scope: Option<ScopeList>| async move {
//! 		let decision = if client.id == "c123" && token.expose() == "shh" && scope.is_some() {
//! 			IssueDecision::issue("s3cr1t")
//! 		} else {
//! 			IssueDecision::Declined
//! 		};
//!
//! 		Ok::<_, BoxError>(decision)
//! 	},
//! );
//!
//! assert!(issuer.is_scope_aware());
//! ```

// std
use std::panic::{self, AssertUnwindSafe};
// crates.io
use futures::FutureExt;
// self
use crate::{
	_prelude::*,
	auth::{IssuedToken, ScopeList, TokenParams, TokenSecret},
	error::{BoxError, TokenError},
	obs,
};

/// Result an issuer completes with.
pub type IssueResult = Result<IssueDecision, BoxError>;

/// Boxed future returned by issuers.
pub type IssueFuture<'a> = Pin<Box<dyn Future<Output = IssueResult> + 'a + Send>>;

/// Issuer verdict for a single exchange.
#[derive(Clone, Debug, PartialEq)]
pub enum IssueDecision {
	/// Issue the contained token.
	Issued(IssuedToken),
	/// Refuse the exchange; the client receives `invalid_grant`.
	Declined,
}
impl IssueDecision {
	/// Issues `access_token` without extra parameters.
	pub fn issue(access_token: impl Into<TokenSecret>) -> Self {
		Self::Issued(IssuedToken::new(access_token))
	}

	/// Issues `access_token` with extra response parameters.
	pub fn issue_with_params(access_token: impl Into<TokenSecret>, params: TokenParams) -> Self {
		Self::Issued(IssuedToken::new(access_token).with_params(params))
	}
}
impl From<IssuedToken> for IssueDecision {
	fn from(token: IssuedToken) -> Self {
		Self::Issued(token)
	}
}
impl From<Option<IssuedToken>> for IssueDecision {
	fn from(token: Option<IssuedToken>) -> Self {
		token.map_or(Self::Declined, Self::Issued)
	}
}

/// Decision function that receives the requested scope.
pub trait ScopedIssue<P>
where
	Self: Send + Sync,
{
	/// Decides whether `principal` may exchange `token` for a token limited to `scope`.
	///
	/// `scope` is `None` when the client did not request one.
	fn issue(&self, principal: P, token: TokenSecret, scope: Option<ScopeList>) -> IssueFuture<'_>;
}
impl<P, F, Fut> ScopedIssue<P> for F
where
	F: Send + Sync + Fn(P, TokenSecret, Option<ScopeList>) -> Fut,
	Fut: 'static + Send + Future<Output = IssueResult>,
{
	fn issue(&self, principal: P, token: TokenSecret, scope: Option<ScopeList>) -> IssueFuture<'_> {
		Box::pin(self(principal, token, scope))
	}
}

/// Decision function that ignores scope.
pub trait UnscopedIssue<P>
where
	Self: Send + Sync,
{
	/// Decides whether `principal` may exchange `token`.
	fn issue(&self, principal: P, token: TokenSecret) -> IssueFuture<'_>;
}
impl<P, F, Fut> UnscopedIssue<P> for F
where
	F: Send + Sync + Fn(P, TokenSecret) -> Fut,
	Fut: 'static + Send + Future<Output = IssueResult>,
{
	fn issue(&self, principal: P, token: TokenSecret) -> IssueFuture<'_> {
		Box::pin(self(principal, token))
	}
}

/// Issuer selected at construction; the variant decides whether scope is ever delivered.
pub enum Issuer<P> {
	/// Receives the tokenized scope (or `None`).
	ScopeAware(Arc<dyn ScopedIssue<P>>),
	/// Never receives scope, even when the client requested one.
	ScopeOblivious(Arc<dyn UnscopedIssue<P>>),
}
impl<P> Issuer<P> {
	/// Wraps a scope-aware decision function.
	pub fn scope_aware(issue: impl 'static + ScopedIssue<P>) -> Self {
		Self::ScopeAware(Arc::new(issue))
	}

	/// Wraps a scope-oblivious decision function.
	pub fn scope_oblivious(issue: impl 'static + UnscopedIssue<P>) -> Self {
		Self::ScopeOblivious(Arc::new(issue))
	}

	/// Returns true if the issuer receives scope.
	pub fn is_scope_aware(&self) -> bool {
		matches!(self, Self::ScopeAware(_))
	}

	/// Asks the issuer for a decision and normalizes its outcome.
	///
	/// Issuer errors are forwarded untouched as [`Error::Issuer`]. A decline, or an issued
	/// token with an empty access token, becomes `invalid_grant`. Panics raised while calling
	/// the issuer or polling its future are caught and reported as [`Error::IssuerPanic`].
	///
	/// The call is awaited without a deadline; an issuer that never completes stalls the
	/// exchange.
	pub async fn invoke(
		&self,
		principal: P,
		token: TokenSecret,
		scope: Option<ScopeList>,
	) -> Result<IssuedToken> {
		let call = panic::catch_unwind(AssertUnwindSafe(|| match self {
			Self::ScopeAware(issue) => issue.issue(principal, token, scope),
			Self::ScopeOblivious(issue) => {
				if let Some(scope) = &scope {
					obs::scope_withheld(scope);
				}

				issue.issue(principal, token)
			},
		}))
		.map_err(Error::issuer_panic)?;
		let decision = AssertUnwindSafe(call)
			.catch_unwind()
			.await
			.map_err(Error::issuer_panic)?
			.map_err(Error::Issuer)?;

		match decision {
			IssueDecision::Issued(token) if !token.access_token.is_empty() => Ok(token),
			_ => Err(TokenError::invalid_token().into()),
		}
	}
}
impl<P> Clone for Issuer<P> {
	fn clone(&self) -> Self {
		match self {
			Self::ScopeAware(issue) => Self::ScopeAware(issue.clone()),
			Self::ScopeOblivious(issue) => Self::ScopeOblivious(issue.clone()),
		}
	}
}
impl<P> Debug for Issuer<P> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::ScopeAware(_) => f.write_str("Issuer::ScopeAware(..)"),
			Self::ScopeOblivious(_) => f.write_str("Issuer::ScopeOblivious(..)"),
		}
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::Mutex;
	// self
	use super::*;
	use crate::{
		_preludet::{TestClient, issue_fixed},
		auth::ScopeSeparators,
	};

	fn read_write() -> Option<ScopeList> {
		Some(ScopeList::tokenize("read write", &ScopeSeparators::default()))
	}

	#[tokio::test]
	async fn scope_aware_issuer_receives_scope() {
		let seen = Arc::new(Mutex::new(None));
		let sink = seen.clone();
		let issuer = Issuer::scope_aware(
			move |_: TestClient, _: TokenSecret, scope: Option<ScopeList>| {
				*sink.lock().expect("Scope sink should not be poisoned.") = Some(scope);

				issue_fixed("s3cr1t")
			},
		);
		let issued = issuer
			.invoke(TestClient::new("c123"), TokenSecret::new("shh"), read_write())
			.await
			.expect("Scope-aware issuer should issue.");

		assert_eq!(issued.access_token.expose(), "s3cr1t");

		let received = seen.lock().expect("Scope sink should not be poisoned.").take();

		assert_eq!(received, Some(read_write()));
	}

	#[tokio::test]
	async fn absent_scope_reaches_scope_aware_issuer_as_none() {
		let issuer = Issuer::scope_aware(
			|_: TestClient, _: TokenSecret, scope: Option<ScopeList>| async move {
				let result: IssueResult = match scope {
					None => Ok(IssueDecision::issue("s3cr1t")),
					Some(_) => Err("scope should be absent".into()),
				};

				result
			},
		);

		issuer
			.invoke(TestClient::new("c123"), TokenSecret::new("shh"), None)
			.await
			.expect("Absent scope should be delivered as None.");
	}

	#[tokio::test]
	async fn scope_oblivious_issuer_never_sees_scope() {
		let issuer =
			Issuer::scope_oblivious(|_: TestClient, _: TokenSecret| issue_fixed("s3cr1t"));

		assert!(!issuer.is_scope_aware());

		let issued = issuer
			.invoke(TestClient::new("c123"), TokenSecret::new("shh"), read_write())
			.await
			.expect("Scope-oblivious issuer should issue.");

		assert_eq!(issued.access_token.expose(), "s3cr1t");
	}

	#[tokio::test]
	async fn declines_and_empty_tokens_are_invalid_grant() {
		let declined = Issuer::scope_oblivious(|_: TestClient, _: TokenSecret| async {
			Ok::<_, BoxError>(IssueDecision::Declined)
		});
		let empty = Issuer::scope_oblivious(|_: TestClient, _: TokenSecret| issue_fixed(""));

		for issuer in [declined, empty] {
			let err = issuer
				.invoke(TestClient::new("c123"), TokenSecret::new("shh"), None)
				.await
				.expect_err("Declined exchanges must fail.");

			assert_eq!(err.code(), Some("invalid_grant"));
			assert_eq!(err.status(), Some(403));
			assert_eq!(err.to_string(), "Invalid token");
		}
	}

	#[tokio::test]
	async fn issuer_errors_pass_through() {
		let issuer = Issuer::scope_oblivious(|_: TestClient, _: TokenSecret| async {
			Err::<IssueDecision, BoxError>("something went wrong".into())
		});
		let err = issuer
			.invoke(TestClient::new("c123"), TokenSecret::new("shh"), None)
			.await
			.expect_err("Issuer errors must propagate.");

		assert!(matches!(err, Error::Issuer(_)));
		assert_eq!(err.to_string(), "something went wrong");
		assert_eq!(err.status(), None);
	}

	#[tokio::test]
	async fn synchronous_panics_are_caught() {
		let issuer = Issuer::scope_oblivious(|_: TestClient, _: TokenSecret| -> IssueFuture<'static> {
			panic!("something went horribly wrong");
		});
		let err = issuer
			.invoke(TestClient::new("c123"), TokenSecret::new("shh"), None)
			.await
			.expect_err("Panicking issuers must fail.");

		assert!(matches!(err, Error::IssuerPanic { .. }));
		assert_eq!(err.to_string(), "something went horribly wrong");
	}

	#[tokio::test]
	async fn panics_while_polling_are_caught() {
		let issuer = Issuer::scope_oblivious(|_: TestClient, token: TokenSecret| async move {
			if token.expose() == "shh" {
				panic!("issuer lost its keys");
			}

			Ok::<_, BoxError>(IssueDecision::issue("unreachable"))
		});
		let err = issuer
			.invoke(TestClient::new("c123"), TokenSecret::new("shh"), None)
			.await
			.expect_err("Panicking futures must fail.");

		assert_eq!(err.to_string(), "issuer lost its keys");
	}

	#[test]
	fn decisions_convert_from_options() {
		assert_eq!(IssueDecision::from(None), IssueDecision::Declined);
		assert_eq!(
			IssueDecision::from(Some(IssuedToken::new("s3cr1t"))),
			IssueDecision::issue("s3cr1t")
		);
	}
}
