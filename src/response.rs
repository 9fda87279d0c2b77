//! Response normalization: status checks, `data` envelope unwrapping, and the tagged
//! [`ApiResponse`] payload handed back to callers.

// crates.io
use oauth2::http::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
// self
use crate::{_prelude::*, error::DecodeError, http::HttpResponse};

pub(crate) const UNKNOWN_ERROR: &str = "Unknown error";

const ENVELOPE_FIELD: &str = "data";
const MESSAGE_FIELD: &str = "statusMessage";

/// Content kind carried by an [`ApiResponse`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
	/// Decoded JSON.
	Structured,
	/// Body returned verbatim because the response was not declared as JSON.
	RawText,
}

/// Decoded result of a successful operation call.
#[derive(Clone, Debug, PartialEq)]
pub enum ApiResponse {
	/// JSON payload: the `data` envelope when present, otherwise the whole body.
	Json(Value),
	/// Raw body of a 200 response whose content type is not JSON.
	Text(String),
}
impl ApiResponse {
	/// Returns the explicit content kind tag.
	pub fn kind(&self) -> ContentKind {
		match self {
			Self::Json(_) => ContentKind::Structured,
			Self::Text(_) => ContentKind::RawText,
		}
	}

	/// Borrows the JSON payload, if structured.
	pub fn as_json(&self) -> Option<&Value> {
		match self {
			Self::Json(value) => Some(value),
			Self::Text(_) => None,
		}
	}

	/// Consumes the response and returns the JSON payload, if structured.
	pub fn into_json(self) -> Option<Value> {
		match self {
			Self::Json(value) => Some(value),
			Self::Text(_) => None,
		}
	}

	/// Borrows the raw text, if the body was not JSON.
	pub fn as_text(&self) -> Option<&str> {
		match self {
			Self::Json(_) => None,
			Self::Text(text) => Some(text),
		}
	}

	/// Deserializes the payload into `T`, reporting the failing JSON path on mismatch.
	///
	/// Raw text payloads are parsed as JSON first.
	pub fn deserialize<T>(&self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let decoded = match self {
			Self::Json(value) => serde_path_to_error::deserialize(value),
			Self::Text(text) => {
				let mut de = serde_json::Deserializer::from_str(text);

				serde_path_to_error::deserialize(&mut de)
			},
		};

		decoded.map_err(|source| DecodeError { source, status: 200 }.into())
	}
}

/// Turns a raw operation response into an [`ApiResponse`] or [`Error::Api`].
pub fn normalize(response: &HttpResponse) -> Result<ApiResponse> {
	let status = response.status().as_u16();

	if status != 200 {
		let message = message_field(response.body(), &[MESSAGE_FIELD])
			.unwrap_or_else(|| UNKNOWN_ERROR.into());

		return Err(Error::Api { message, status });
	}
	if !is_json(response) {
		return Ok(ApiResponse::Text(String::from_utf8_lossy(response.body()).into_owned()));
	}

	let mut de = serde_json::Deserializer::from_slice(response.body());
	let body: Value = serde_path_to_error::deserialize(&mut de)
		.map_err(|source| DecodeError { source, status })?;

	Ok(ApiResponse::Json(unwrap_envelope(body)))
}

/// Extracts the first string-like field out of a JSON object body.
pub(crate) fn message_field(body: &[u8], fields: &[&str]) -> Option<String> {
	let Ok(Value::Object(map)) = serde_json::from_slice::<Value>(body) else {
		return None;
	};

	fields.iter().find_map(|field| match map.get(*field)? {
		Value::String(text) if !text.is_empty() => Some(text.clone()),
		Value::Null | Value::String(_) => None,
		other => Some(other.to_string()),
	})
}

fn is_json(response: &HttpResponse) -> bool {
	response
		.headers()
		.get(CONTENT_TYPE)
		.and_then(|value| value.to_str().ok())
		.is_some_and(|value| value.to_ascii_lowercase().contains("application/json"))
}

fn unwrap_envelope(body: Value) -> Value {
	match body {
		Value::Object(mut map) if map.contains_key(ENVELOPE_FIELD) =>
			map.remove(ENVELOPE_FIELD).unwrap_or(Value::Null),
		other => other,
	}
}
