//! Cached access token records and token endpoint response parsing.

// crates.io
use oauth2::AccessToken;
// self
use crate::{_prelude::*, error::AuthenticationError, response};

/// Access token issued by the token endpoint, together with its lifetime.
#[derive(Clone)]
pub struct AccessTokenRecord {
	access_token: AccessToken,
	/// Instant the token was received.
	pub issued_at: OffsetDateTime,
	/// Instant the token stops being accepted upstream.
	pub expires_at: OffsetDateTime,
}
impl AccessTokenRecord {
	/// Creates a record valid for `expires_in` starting at `issued_at`.
	pub fn new(
		access_token: impl Into<String>,
		issued_at: OffsetDateTime,
		expires_in: Duration,
	) -> Self {
		Self {
			access_token: AccessToken::new(access_token.into()),
			issued_at,
			expires_at: issued_at + expires_in,
		}
	}

	pub(crate) fn secret(&self) -> &str {
		self.access_token.secret()
	}

	/// Returns `true` once `instant` reaches the expiry.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		instant >= self.expires_at
	}

	/// Determines whether the token should be replaced before use at `now`.
	///
	/// The skew is capped at half of the token lifetime so a freshly issued short-lived
	/// token is always usable at least once.
	pub fn needs_refresh_at(&self, now: OffsetDateTime, skew: Duration) -> bool {
		if self.is_expired_at(now) {
			return true;
		}

		let half_life = (self.expires_at - self.issued_at) / 2;
		let skew = if skew > half_life { half_life } else { skew };

		self.expires_at - now <= skew
	}
}
impl Debug for AccessTokenRecord {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccessTokenRecord")
			.field("access_token", &"<redacted>")
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

#[derive(Debug, Deserialize)]
struct TokenEndpointResponse {
	access_token: String,
	#[serde(default)]
	expires_in: Option<ExpiresIn>,
}

/// The API reports `expires_in` as a string; standard servers use a number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ExpiresIn {
	Seconds(i64),
	Text(String),
}
impl ExpiresIn {
	fn raw(&self) -> String {
		match self {
			Self::Seconds(secs) => secs.to_string(),
			Self::Text(text) => text.clone(),
		}
	}

	fn seconds(&self) -> Option<i64> {
		match self {
			Self::Seconds(secs) => Some(*secs),
			Self::Text(text) => text.trim().parse().ok(),
		}
	}
}

const TOKEN_ERROR_FIELDS: &[&str] = &["statusMessage", "error_description", "error"];
// Upper bound keeps `issued_at + expires_in` inside the representable date range.
const MAX_EXPIRES_IN_SECS: i64 = 10 * 365 * 24 * 60 * 60;

/// Converts a raw token endpoint reply into a cached record.
pub(crate) fn parse_token_response(
	status: u16,
	body: &[u8],
	issued_at: OffsetDateTime,
) -> Result<AccessTokenRecord, AuthenticationError> {
	if status != 200 {
		let message = response::message_field(body, TOKEN_ERROR_FIELDS)
			.unwrap_or_else(|| response::UNKNOWN_ERROR.into());

		return Err(AuthenticationError::Rejected { message, status });
	}

	let mut de = serde_json::Deserializer::from_slice(body);
	let parsed: TokenEndpointResponse = serde_path_to_error::deserialize(&mut de)
		.map_err(|source| AuthenticationError::MalformedResponse { source, status })?;
	let expires_in = parsed.expires_in.ok_or(AuthenticationError::MissingExpiresIn { status })?;
	let secs = expires_in
		.seconds()
		.filter(|secs| (1..=MAX_EXPIRES_IN_SECS).contains(secs))
		.ok_or_else(|| AuthenticationError::InvalidExpiresIn { value: expires_in.raw(), status })?;

	Ok(AccessTokenRecord::new(parsed.access_token, issued_at, Duration::seconds(secs)))
}
