// std
use std::sync::{
	Arc, Mutex,
	atomic::{AtomicUsize, Ordering},
};
// self
use oauth2_redelegate::{
	auth::{ScopeList, TokenSecret},
	config::ExchangeConfig,
	error::{BoxError, ConfigError},
	exchange::Redelegate,
	issuer::{IssueDecision, Issuer},
	request::{IncomingRequest, RequestBody},
};

#[derive(Clone, Debug, PartialEq, Eq)]
struct Client {
	id: String,
}

fn request(field: &str, fields: &[(&str, &str)]) -> IncomingRequest<Client> {
	IncomingRequest::new()
		.with_principal(field, Client { id: "c123".into() })
		.with_body(fields.iter().copied().collect::<RequestBody>())
}

/// Scope-aware handler that only issues for exactly `read` + `write`.
fn read_write_handler(separators: &[&str]) -> Redelegate<Client> {
	Redelegate::builder()
		.scope_separators(separators.iter().copied())
		.scope_aware(|client: Client, token: TokenSecret, scope: Option<ScopeList>| async move {
			match scope {
				Some(scope)
					if client.id == "c123" && token.expose() == "shh" && scope == ["read", "write"] =>
					Ok::<_, BoxError>(IssueDecision::issue("s3cr1t")),
				_ => Err("something is wrong".into()),
			}
		})
		.build()
		.expect("Read/write handler should build.")
}

#[tokio::test]
async fn principal_field_option_selects_attachment() {
	let handler = Redelegate::builder()
		.principal_field("client")
		.scope_oblivious(|client: Client, _: TokenSecret| async move {
			if client.id == "c123" {
				Ok::<_, BoxError>(IssueDecision::issue("s3cr1t"))
			} else {
				Err("incorrect client argument".into())
			}
		})
		.build()
		.expect("Handler with a custom principal field should build.");
	let response = handler
		.exchange(&request("client", &[("token", "shh")]))
		.await
		.expect("Principal attached under `client` should be used.");

	assert_eq!(response.body(), r#"{"access_token":"s3cr1t","token_type":"Bearer"}"#);
	assert!(handler.exchange(&request("user", &[("token", "shh")])).await.is_err());
}

#[tokio::test]
async fn single_comma_separator_splits_scope() {
	let response = read_write_handler(&[","])
		.exchange(&request("user", &[("token", "shh"), ("scope", "read,write")]))
		.await
		.expect("Comma-separated scope should be tokenized.");

	assert_eq!(response.body(), r#"{"access_token":"s3cr1t","token_type":"Bearer"}"#);
}

#[tokio::test]
async fn separator_priority_accepts_space_or_comma() {
	let handler = read_write_handler(&[" ", ","]);

	for scope in ["read write", "read,write"] {
		let response = handler
			.exchange(&request("user", &[("token", "shh"), ("scope", scope)]))
			.await
			.expect("Either configured separator should tokenize the scope.");

		assert_eq!(response.body(), r#"{"access_token":"s3cr1t","token_type":"Bearer"}"#);
	}
}

#[tokio::test]
async fn scope_oblivious_issuer_discards_requested_scope() {
	let calls = Arc::new(AtomicUsize::new(0));
	let counter = calls.clone();
	let handler = Redelegate::scope_oblivious(move |_: Client, _: TokenSecret| {
		counter.fetch_add(1, Ordering::SeqCst);

		async { Ok::<_, BoxError>(IssueDecision::issue("s3cr1t")) }
	});
	let response = handler
		.exchange(&request("user", &[("token", "shh"), ("scope", "read write")]))
		.await
		.expect("Scope-oblivious issuer should still issue.");

	assert_eq!(response.body(), r#"{"access_token":"s3cr1t","token_type":"Bearer"}"#);
	assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn json_configuration_drives_the_handler() {
	let seen = Arc::new(Mutex::new(Vec::new()));
	let sink = seen.clone();
	let config =
		ExchangeConfig::from_json_str(r#"{"principal_field":"client","scope_separator":"|"}"#)
			.expect("JSON configuration should parse.");
	let handler = Redelegate::with_config(
		config,
		Issuer::scope_aware(move |_: Client, _: TokenSecret, scope: Option<ScopeList>| {
			if let Some(scope) = scope {
				sink.lock()
					.expect("Scope sink should not be poisoned.")
					.extend(scope.iter().map(str::to_owned));
			}

			async { Ok::<_, BoxError>(IssueDecision::issue("s3cr1t")) }
		}),
	)
	.expect("Valid configuration should build a handler.");

	handler
		.issue(&request("client", &[("token", "shh"), ("scope", "read|write|admin")]))
		.await
		.expect("Pipe-separated scope should be tokenized.");

	assert_eq!(
		*seen.lock().expect("Scope sink should not be poisoned."),
		vec!["read".to_string(), "write".to_string(), "admin".to_string()]
	);
}

#[test]
fn handler_without_issuer_fails_to_build() {
	let err = Redelegate::<Client>::builder()
		.scope_separator(",")
		.build()
		.expect_err("Missing issuer must be rejected before any request.");

	assert!(matches!(err, ConfigError::MissingIssuer));
}
