mod common;

// crates.io
use httpmock::prelude::*;
use parking_lot::Mutex;
use serde_json::json;
// self
use common::*;
use oblio_client::{
	_preludet::*,
	ApiResponse, Arguments, ContentKind,
	catalog::{DocumentType, HttpMethod, OperationCatalog},
	client::DocumentKey,
	error::ValidationError,
	ext::{CallContext, CallKind, RequestInterceptor},
	http::{HttpRequest, HttpResponse},
	nomenclator::ProductFilter,
};

const TOKEN: &str = "token-ops";

fn document_creation() -> Value {
	json!({
		"cif": CIF,
		"client": { "cif": "RO19", "name": "ACME SRL" },
		"seriesName": "FCT",
		"products": [
			{ "name": "Consulting", "price": 100, "quantity": 1 },
			{ "name": "Hosting", "price": 20.5, "quantity": 12 },
		],
	})
}

fn document_key() -> Value {
	json!({ "cif": CIF, "seriesName": "FCT", "number": "42" })
}

#[tokio::test]
async fn every_operation_unwraps_data_envelope() {
	let server = MockServer::start_async().await;
	let token_mock = mock_token(&server, TOKEN, "3600").await;
	let client = build_reqwest_test_client(&server.url("/api/"), CLIENT_ID, CLIENT_SECRET);
	let catalog = OperationCatalog::builtin().expect("Built-in catalog should validate.");

	for descriptor in catalog.iter() {
		let arguments = if descriptor.name == "getCompanies" {
			json!({})
		} else if descriptor.has_body() {
			document_creation()
		} else if descriptor.parameter("seriesName").is_some() {
			document_key()
		} else {
			json!({ "cif": CIF })
		};
		let path = format!("/api{}", descriptor.path);
		let method = descriptor.method;
		let name = descriptor.name.clone();
		let mock = server
			.mock_async(|when, then| {
				let when = match method {
					HttpMethod::Get => when.method(GET),
					HttpMethod::Post => when.method(POST),
					HttpMethod::Put => when.method(PUT),
					HttpMethod::Delete => when.method(DELETE),
				};

				when.path(path.as_str())
					.header("authorization", format!("Bearer {TOKEN}"))
					.header("accept", "application/json");
				then.status(200)
					.header("content-type", "application/json")
					.body(envelope(json!({ "operation": name })));
			})
			.await;
		let response = client
			.execute(&descriptor.name, args(arguments))
			.await
			.unwrap_or_else(|e| panic!("{} should succeed: {e}.", descriptor.name));

		assert_eq!(response, ApiResponse::Json(json!({ "operation": descriptor.name })));

		mock.assert_async().await;
		mock.delete_async().await;
	}

	token_mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn get_clients_sends_query_with_offset_default() {
	let server = MockServer::start_async().await;
	let _token_mock = mock_token(&server, TOKEN, "3600").await;
	let client = build_reqwest_test_client(&server.url("/api/"), CLIENT_ID, CLIENT_SECRET);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/nomenclature/clients")
				.query_param("cif", CIF)
				.query_param("offset", "0");
			then.status(200).header("content-type", "application/json").body(envelope(json!([
				{ "cif": "RO19", "name": "ACME SRL" },
			])));
		})
		.await;
	let response = client
		.get_clients(args(json!({ "cif": CIF, "name": null, "unexpected": true })))
		.await
		.expect("getClients should succeed.");

	assert_eq!(response.kind(), ContentKind::Structured);
	assert_eq!(response.as_json(), Some(&json!([{ "cif": "RO19", "name": "ACME SRL" }])));

	mock.assert_async().await;
}

#[tokio::test]
async fn add_invoice_preserves_product_order() {
	let server = MockServer::start_async().await;
	let _token_mock = mock_token(&server, TOKEN, "3600").await;
	let client = build_reqwest_test_client(&server.url("/api/"), CLIENT_ID, CLIENT_SECRET);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/docs/invoice")
				.header("content-type", "application/json")
				.json_body(document_creation());
			then.status(200).header("content-type", "application/json").body(envelope(json!({
				"seriesName": "FCT",
				"number": "43",
				"link": "https://www.oblio.eu/utils/show_file/?ic=1&id=2",
			})));
		})
		.await;
	let response = client
		.add_invoice(args(document_creation()))
		.await
		.expect("addInvoice should succeed.");

	assert_eq!(response.as_json().and_then(|data| data.get("number")), Some(&json!("43")));

	mock.assert_async().await;
}

#[tokio::test]
async fn missing_parameter_fails_before_any_call() {
	let server = MockServer::start_async().await;
	let token_mock = mock_token(&server, TOKEN, "3600").await;
	let client = build_reqwest_test_client(&server.url("/api/"), CLIENT_ID, CLIENT_SECRET);
	let err = client
		.get_series(Arguments::new())
		.await
		.expect_err("getSeries without cif should fail.");

	assert!(matches!(
		err,
		Error::Validation(ValidationError::MissingParameter { ref operation, ref parameter })
			if operation == "getSeries" && parameter == "cif"
	));

	token_mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn unknown_operation_is_rejected() {
	let server = MockServer::start_async().await;
	let token_mock = mock_token(&server, TOKEN, "3600").await;
	let client = build_reqwest_test_client(&server.url("/api/"), CLIENT_ID, CLIENT_SECRET);
	let err = client
		.execute("getWarehouses", args(json!({ "cif": CIF })))
		.await
		.expect_err("Unregistered operations should fail.");

	assert!(matches!(err, Error::UnknownOperation { ref name } if name == "getWarehouses"));

	token_mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn unauthorized_call_refreshes_token_and_retries_once() {
	let server = MockServer::start_async().await;
	let token_mock = mock_token(&server, TOKEN, "3600").await;
	let client = build_reqwest_test_client(&server.url("/api/"), CLIENT_ID, CLIENT_SECRET);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/nomenclature/series").query_param("cif", "RO0");
			then.status(401)
				.header("content-type", "application/json")
				.body("{\"status\":401,\"statusMessage\":\"Invalid cif\"}");
		})
		.await;
	let err = client
		.get_series(args(json!({ "cif": "RO0" })))
		.await
		.expect_err("Invalid cif should surface as an API error.");

	assert!(matches!(
		err,
		Error::Api { ref message, status: 401 } if message == "Invalid cif"
	));

	mock.assert_calls_async(2).await;
	token_mock.assert_calls_async(2).await;
}

#[tokio::test]
async fn undecodable_error_body_reports_unknown_error() {
	let server = MockServer::start_async().await;
	let _token_mock = mock_token(&server, TOKEN, "3600").await;
	let client = build_reqwest_test_client(&server.url("/api/"), CLIENT_ID, CLIENT_SECRET);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/nomenclature/vat_rates");
			then.status(500).header("content-type", "text/html").body("<h1>Server Error</h1>");
		})
		.await;
	let err = client
		.get_vat_rates(args(json!({ "cif": CIF })))
		.await
		.expect_err("500 responses should fail.");

	assert!(matches!(
		err,
		Error::Api { ref message, status: 500 } if message == "Unknown error"
	));
	assert_eq!(err.status(), Some(500));

	mock.assert_async().await;
}

#[tokio::test]
async fn non_json_success_is_returned_as_text() {
	let server = MockServer::start_async().await;
	let _token_mock = mock_token(&server, TOKEN, "3600").await;
	let client = build_reqwest_test_client(&server.url("/api/"), CLIENT_ID, CLIENT_SECRET);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/docs/invoice").query_param("number", "42");
			then.status(200).header("content-type", "text/plain").body("FCT 42");
		})
		.await;
	let response = client
		.document(DocumentType::Invoice, &DocumentKey::new(CIF, "FCT", "42"))
		.await
		.expect("Plain-text responses should succeed.");

	assert_eq!(response.kind(), ContentKind::RawText);
	assert_eq!(response.as_text(), Some("FCT 42"));

	mock.assert_async().await;
}

#[tokio::test]
async fn document_facade_routes_by_type() {
	let server = MockServer::start_async().await;
	let _token_mock = mock_token(&server, TOKEN, "3600").await;
	let client = build_reqwest_test_client(&server.url("/api/"), CLIENT_ID, CLIENT_SECRET);
	let cancel = server
		.mock_async(|when, then| {
			when.method(PUT)
				.path("/api/docs/proforma/cancel")
				.query_param("cif", CIF)
				.query_param("seriesName", "PRF")
				.query_param("number", "7");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"status\":200,\"statusMessage\":\"Success\"}");
		})
		.await;
	let restore = server
		.mock_async(|when, then| {
			when.method(PUT).path("/api/docs/proforma/restore");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"status\":200,\"statusMessage\":\"Success\"}");
		})
		.await;
	let create = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/docs/notice");
			then.status(200)
				.header("content-type", "application/json")
				.body(envelope(json!({ "seriesName": "AVZ", "number": "1" })));
		})
		.await;
	let key = DocumentKey::new(CIF, "PRF", "7");
	let cancelled = client
		.cancel_document(DocumentType::Proforma, &key)
		.await
		.expect("Cancel should succeed.");

	client.restore_document(DocumentType::Proforma, &key).await.expect("Restore should succeed.");

	let created = client
		.create_document(DocumentType::Notice, args(document_creation()))
		.await
		.expect("Notice creation should succeed.");

	assert_eq!(cancelled.as_json(), Some(&json!({ "status": 200, "statusMessage": "Success" })));
	assert_eq!(created.as_json(), Some(&json!({ "seriesName": "AVZ", "number": "1" })));

	cancel.assert_async().await;
	restore.assert_async().await;
	create.assert_async().await;
}

#[tokio::test]
async fn nomenclator_forwards_typed_filters() {
	#[derive(Debug, serde::Deserialize)]
	struct Product {
		name: String,
		price: String,
	}

	let server = MockServer::start_async().await;
	let _token_mock = mock_token(&server, TOKEN, "3600").await;
	let client = build_reqwest_test_client(&server.url("/api/"), CLIENT_ID, CLIENT_SECRET);
	let products = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/nomenclature/products")
				.query_param("cif", CIF)
				.query_param("workStation", "Sediu")
				.query_param("offset", "250");
			then.status(200).header("content-type", "application/json").body(envelope(json!([
				{ "name": "Consulting", "price": "100.00" },
			])));
		})
		.await;
	let companies = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/nomenclature/companies");
			then.status(200)
				.header("content-type", "application/json")
				.body(envelope(json!([{ "cif": CIF, "company": "Demo SRL" }])));
		})
		.await;
	let nomenclator = client.nomenclator();
	let listed = nomenclator
		.products(CIF, &ProductFilter::default().work_station("Sediu").offset(250))
		.await
		.expect("Product listing should succeed.")
		.deserialize::<Vec<Product>>()
		.expect("Products should decode.");

	nomenclator.companies().await.expect("Company listing should succeed.");

	assert_eq!(listed.len(), 1);
	assert_eq!(listed[0].name, "Consulting");
	assert_eq!(listed[0].price, "100.00");

	products.assert_async().await;
	companies.assert_async().await;
}

struct Tagger(&'static str);
impl RequestInterceptor for Tagger {
	fn before_send(&self, ctx: &CallContext<'_>, request: &mut HttpRequest) {
		if ctx.kind == CallKind::Operation {
			request.headers_mut().append(
				"x-oblio-tag",
				self.0.parse().expect("Tag should be a valid header value."),
			);
		}
	}
}

struct Counter(Arc<Mutex<Vec<u16>>>);
impl RequestInterceptor for Counter {
	fn after_receive(&self, _ctx: &CallContext<'_>, response: &HttpResponse) {
		self.0.lock().push(response.status().as_u16());
	}
}

#[tokio::test]
async fn interceptors_decorate_operation_requests() {
	let server = MockServer::start_async().await;
	let _token_mock = mock_token(&server, TOKEN, "3600").await;
	let statuses = Arc::new(Mutex::new(Vec::new()));
	let client = test_client_builder(&server.url("/api/"), CLIENT_ID, CLIENT_SECRET)
		.interceptor("tag", Tagger("first"))
		.interceptor("count", Counter(statuses.clone()))
		.interceptor("tag", Tagger("second"))
		.build()
		.expect("Client should build.");
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/nomenclature/languages").header("x-oblio-tag", "second");
			then.status(200)
				.header("content-type", "application/json")
				.body(envelope(json!([{ "code": "EN", "name": "Engleza" }])));
		})
		.await;

	client
		.get_languages(args(json!({ "cif": CIF })))
		.await
		.expect("getLanguages should succeed.");

	assert_eq!(client.interceptors.names().collect::<Vec<_>>(), ["tag", "count"]);
	// Token exchange first, then the operation.
	assert_eq!(*statuses.lock(), [200, 200]);

	mock.assert_async().await;
}
