//! Descriptor-driven request construction.

// crates.io
use oauth2::http::{
	Request,
	header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
// self
use crate::{
	_prelude::*,
	catalog::{OperationDescriptor, ParameterLocation},
	client::Arguments,
	error::{ConfigError, ValidationError},
	http::HttpRequest,
	obs,
};

const JSON: &str = "application/json";

/// Validated arguments split by location, ready to be rendered against a base URL and token.
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedRequest<'a> {
	/// Descriptor the arguments were validated against.
	pub descriptor: &'a OperationDescriptor,
	/// Query-string pairs in declaration order.
	pub query: Vec<(&'a str, String)>,
	/// JSON body members, `None` when the operation declares no body parameter.
	pub body: Option<Map<String, Value>>,
}
impl<'a> PreparedRequest<'a> {
	/// Checks `args` against `descriptor` and sorts them into query and body parts.
	///
	/// Absent or `null` optional parameters are omitted unless the descriptor supplies a
	/// default. Arguments the descriptor does not declare are dropped.
	pub fn new(
		descriptor: &'a OperationDescriptor,
		mut args: Arguments,
	) -> Result<Self, ValidationError> {
		let mut query = Vec::new();
		let mut body = descriptor.has_body().then(Map::new);

		for spec in &descriptor.parameters {
			let value = match args.remove(&spec.name) {
				Some(Value::Null) | None => spec.default.clone(),
				Some(value) => Some(value),
			};
			let Some(value) = value else {
				if spec.required {
					return Err(ValidationError::MissingParameter {
						operation: descriptor.name.clone(),
						parameter: spec.name.clone(),
					});
				}

				continue;
			};

			if !spec.kind.accepts(&value) {
				return Err(ValidationError::InvalidType {
					operation: descriptor.name.clone(),
					parameter: spec.name.clone(),
					expected: spec.kind.label(),
				});
			}

			match (spec.location, body.as_mut()) {
				(ParameterLocation::Body, Some(body)) => {
					body.insert(spec.name.clone(), value);
				},
				_ => query.push((spec.name.as_str(), query_value(value))),
			}
		}

		for argument in args.keys() {
			obs::warn_ignored_argument(&descriptor.name, argument);
		}

		Ok(Self { descriptor, query, body })
	}

	/// Resolves the full request URL against `base`.
	pub fn url(&self, base: &Url) -> Url {
		let mut url = base.clone();

		url.set_path(&format!("{}{}", base.path().trim_end_matches('/'), self.descriptor.path));
		url.set_query(None);
		url.set_fragment(None);

		if !self.query.is_empty() {
			url.query_pairs_mut().extend_pairs(self.query.iter().map(|(k, v)| (*k, v.as_str())));
		}

		url
	}

	/// Renders the HTTP request carrying `access_token` as a bearer credential.
	pub fn to_http(&self, base: &Url, access_token: &str) -> Result<HttpRequest> {
		let builder = Request::builder()
			.method(self.descriptor.method.to_http())
			.uri(self.url(base).as_str())
			.header(AUTHORIZATION, format!("Bearer {access_token}"))
			.header(ACCEPT, JSON);
		let request = match &self.body {
			Some(body) => builder
				.header(CONTENT_TYPE, JSON)
				.body(serde_json::to_vec(body).map_err(ConfigError::BodySerialize)?),
			None => builder.body(Vec::new()),
		};

		Ok(request.map_err(ConfigError::from)?)
	}
}

fn query_value(value: Value) -> String {
	match value {
		Value::String(text) => text,
		Value::Number(number) => number.to_string(),
		Value::Bool(flag) => flag.to_string(),
		other => other.to_string(),
	}
}
