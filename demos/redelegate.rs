//! Demonstrates a token endpoint that lets an authenticated service redelegate a user token
//! into a narrower derivative token for a downstream call.

// crates.io
use color_eyre::{Result, eyre::eyre};
// self
use oauth2_redelegate::{
	auth::{ScopeList, TokenParams, TokenSecret},
	error::BoxError,
	exchange::Redelegate,
	issuer::IssueDecision,
	request::{IncomingRequest, RequestBody},
};

#[derive(Clone, Debug)]
struct Client {
	id: String,
	allowed_scopes: Vec<&'static str>,
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let handler = Redelegate::builder()
		.principal_field("client")
		.scope_separators([" ", ","])
		.scope_aware(|client: Client, token: TokenSecret, scope: Option<ScopeList>| async move {
			if token.expose() != "user-token" {
				return Ok::<_, BoxError>(IssueDecision::Declined);
			}

			let granted = match &scope {
				Some(scope) if scope.iter().all(|s| client.allowed_scopes.iter().any(|a| *a == s)) =>
					scope.to_string(),
				Some(_) => return Ok(IssueDecision::Declined),
				None => client.allowed_scopes.join(" "),
			};

			Ok(IssueDecision::issue_with_params(
				format!("{}:{}", client.id, granted.replace(' ', "+")),
				TokenParams::new().with("expires_in", 300).with("scope", granted),
			))
		})
		.build()?;
	let request = IncomingRequest::new()
		.with_principal("client", Client {
			id: "billing-service".into(),
			allowed_scopes: vec!["invoices.read", "invoices.write"],
		})
		.with_body(RequestBody::from_iter([("token", "user-token"), ("scope", "invoices.read")]));
	let response = handler.exchange(&request).await?;

	println!("Derivative token response: {}.", response.body());

	let denied = IncomingRequest::new()
		.with_principal("client", Client {
			id: "billing-service".into(),
			allowed_scopes: vec!["invoices.read"],
		})
		.with_body(RequestBody::from_iter([("token", "user-token"), ("scope", "admin")]));

	match handler.exchange(&denied).await {
		Err(e) => println!("Narrowing refused with {}: {e}.", e.code().unwrap_or("error")),
		Ok(_) => return Err(eyre!("The admin scope must not be granted.")),
	}

	Ok(())
}
