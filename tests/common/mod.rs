//! Fixtures shared by the integration suites.

#![allow(dead_code)]

// crates.io
use httpmock::{Mock, prelude::*};
use serde_json::{Value, json};
// self
use oblio_client::Arguments;

pub const CLIENT_ID: &str = "account@example.com";
pub const CLIENT_SECRET: &str = "api-secret";
pub const CIF: &str = "RO37311090";

pub fn args(value: Value) -> Arguments {
	match value {
		Value::Object(map) => map,
		_ => panic!("Fixture arguments must be a JSON object."),
	}
}

pub fn envelope(data: Value) -> String {
	json!({ "status": 200, "statusMessage": "Success", "data": data }).to_string()
}

/// Token endpoint answering the way the live API does, with a string `expires_in`.
pub async fn mock_token<'a>(server: &'a MockServer, token: &str, expires_in: &str) -> Mock<'a> {
	let body = json!({
		"access_token": token,
		"expires_in": expires_in,
		"token_type": "Bearer",
		"scope": null,
		"request_time": "1571927346",
	})
	.to_string();

	server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/authorize/token")
				.header("content-type", "application/x-www-form-urlencoded");
			then.status(200).header("content-type", "application/json").body(body);
		})
		.await
}
