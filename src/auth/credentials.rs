//! Client identifier + secret pair used for the client-credentials grant.

// crates.io
use oauth2::{ClientId, ClientSecret};
// self
use crate::_prelude::*;

/// Immutable client credentials supplied at construction.
///
/// The secret never appears in `Debug` output.
#[derive(Clone)]
pub struct Credentials {
	client_id: ClientId,
	client_secret: ClientSecret,
}
impl Credentials {
	/// Wraps a client identifier and secret.
	pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
		Self {
			client_id: ClientId::new(client_id.into()),
			client_secret: ClientSecret::new(client_secret.into()),
		}
	}

	/// Returns the client identifier.
	pub fn client_id(&self) -> &str {
		self.client_id.as_str()
	}

	/// Encodes the `client_credentials` grant as an `application/x-www-form-urlencoded` body.
	pub(crate) fn grant_form(&self) -> String {
		url::form_urlencoded::Serializer::new(String::new())
			.append_pair("grant_type", "client_credentials")
			.append_pair("client_id", self.client_id.as_str())
			.append_pair("client_secret", self.client_secret.secret())
			.finish()
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("client_id", &self.client_id.as_str())
			.field("client_secret", &"<redacted>")
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn debug_output_redacts_secret() {
		let credentials = Credentials::new("account@example.com", "super-secret");
		let rendered = format!("{credentials:?}");

		assert!(rendered.contains("account@example.com"));
		assert!(rendered.contains("<redacted>"));
		assert!(!rendered.contains("super-secret"));
	}

	#[test]
	fn grant_form_is_url_encoded() {
		let credentials = Credentials::new("account@example.com", "s3cr&t");

		assert_eq!(
			credentials.grant_form(),
			"grant_type=client_credentials&client_id=account%40example.com&client_secret=s3cr%26t"
		);
	}
}
