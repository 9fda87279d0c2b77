//! Demonstrates listing reference data and issuing an invoice against a mock Oblio API, with an
//! interceptor tagging every outbound request.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
// self
use oblio_client::{
	Client,
	catalog::DocumentType,
	client::DocumentKey,
	ext::{CallContext, RequestInterceptor},
	http::{HttpRequest, ReqwestHttpClient},
	nomenclator::ProductFilter,
	oauth2::http::HeaderValue,
	reqwest::Client as ReqwestClient,
	url::Url,
};

struct UserAgent;
impl RequestInterceptor for UserAgent {
	fn before_send(&self, _ctx: &CallContext<'_>, request: &mut HttpRequest) {
		request
			.headers_mut()
			.insert("user-agent", HeaderValue::from_static("oblio-client-demo/0.1"));
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/authorize/token");
			then.status(200).header("content-type", "application/json").body(
				json!({
					"access_token": "demo-access",
					"expires_in": "3600",
					"token_type": "Bearer",
				})
				.to_string(),
			);
		})
		.await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/nomenclature/series");
			then.status(200).header("content-type", "application/json").body(
				json!({
					"status": 200,
					"statusMessage": "Success",
					"data": [{ "type": "Factura", "name": "FCT", "next": "0042" }],
				})
				.to_string(),
			);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/nomenclature/products");
			then.status(200).header("content-type", "application/json").body(
				json!({
					"status": 200,
					"statusMessage": "Success",
					"data": [{ "name": "Consulting" }],
				})
				.to_string(),
			);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(POST).path("/api/docs/invoice");
			then.status(200).header("content-type", "application/json").body(
				json!({
					"status": 200,
					"statusMessage": "Success",
					"data": { "seriesName": "FCT", "number": "0042" },
				})
				.to_string(),
			);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(PUT).path("/api/docs/invoice/cancel");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"status\":200,\"statusMessage\":\"Success\"}");
		})
		.await;

	let http_client = ReqwestHttpClient::with_client(
		ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()?,
	);
	let client = Client::builder("account@example.com", "demo-secret")
		.base_url(Url::parse(&server.url("/api/"))?)
		.interceptor("user-agent", UserAgent)
		.http_client::<ReqwestHttpClient>(http_client)
		.build()?;
	let nomenclator = client.nomenclator();
	let series = nomenclator.series("RO37311090").await?;
	let products = nomenclator
		.products("RO37311090", &ProductFilter::default().name("Consult"))
		.await?;

	println!("Series: {:?}.", series.as_json());
	println!("Products: {:?}.", products.as_json());

	let mut invoice = oblio_client::Arguments::new();

	invoice.insert("cif".into(), json!("RO37311090"));
	invoice.insert("client".into(), json!({ "cif": "RO19", "name": "ACME SRL" }));
	invoice.insert("seriesName".into(), json!("FCT"));
	invoice.insert(
		"products".into(),
		json!([{ "name": "Consulting", "price": 100, "quantity": 1 }]),
	);

	let issued = client.create_document(DocumentType::Invoice, invoice).await?;

	println!("Issued invoice: {:?}.", issued.as_json());

	let key = DocumentKey::new("RO37311090", "FCT", "0042");

	client.cancel_document(DocumentType::Invoice, &key).await?;

	println!("Cancelled {}-{}.", key.series_name, key.number);

	token_mock.assert_async().await;

	Ok(())
}
