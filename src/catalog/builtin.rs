// self
use crate::catalog::{
	CatalogError, DocumentType, HttpMethod, OperationCatalog, OperationDescriptor, ParameterKind,
	ParameterSpec,
};

const LISTING_OFFSET: &str = "offset";

pub(super) fn catalog() -> Result<OperationCatalog, CatalogError> {
	let mut builder = OperationCatalog::builder()
		.operation(OperationDescriptor::builder(
			"getCompanies",
			HttpMethod::Get,
			"/nomenclature/companies",
		))?
		.operation(
			OperationDescriptor::builder("getClients", HttpMethod::Get, "/nomenclature/clients")
				.parameter(cif_query())
				.parameter(ParameterSpec::query("name", ParameterKind::String))
				.parameter(offset()),
		)?
		.operation(
			OperationDescriptor::builder("getProducts", HttpMethod::Get, "/nomenclature/products")
				.parameter(cif_query())
				.parameter(ParameterSpec::query("name", ParameterKind::String))
				.parameter(ParameterSpec::query("code", ParameterKind::String))
				.parameter(ParameterSpec::query("management", ParameterKind::String))
				.parameter(ParameterSpec::query("workStation", ParameterKind::String))
				.parameter(offset()),
		)?;

	for (name, path) in [
		("getSeries", "/nomenclature/series"),
		("getLanguages", "/nomenclature/languages"),
		("getManagement", "/nomenclature/management"),
		("getVatRates", "/nomenclature/vat_rates"),
	] {
		builder = builder.operation(
			OperationDescriptor::builder(name, HttpMethod::Get, path).parameter(cif_query()),
		)?;
	}

	for kind in DocumentType::ALL {
		let path = format!("/docs/{}", kind.as_str());

		builder = builder
			.operation(creation(kind, &path))?
			.operation(
				OperationDescriptor::builder(kind.get_operation(), HttpMethod::Get, path.as_str())
					.parameters(document_key()),
			)?
			.operation(
				OperationDescriptor::builder(
					kind.cancel_operation(),
					HttpMethod::Put,
					format!("{path}/cancel"),
				)
				.parameters(document_key()),
			)?
			.operation(
				OperationDescriptor::builder(
					kind.restore_operation(),
					HttpMethod::Put,
					format!("{path}/restore"),
				)
				.parameters(document_key()),
			)?;
	}

	Ok(builder.build())
}

fn cif_query() -> ParameterSpec {
	ParameterSpec::query("cif", ParameterKind::String).required()
}

fn offset() -> ParameterSpec {
	ParameterSpec::query(LISTING_OFFSET, ParameterKind::Integer).with_default(0)
}

fn document_key() -> [ParameterSpec; 3] {
	[
		cif_query(),
		ParameterSpec::query("seriesName", ParameterKind::String).required(),
		ParameterSpec::query("number", ParameterKind::String).required(),
	]
}

fn creation(kind: DocumentType, path: &str) -> crate::catalog::OperationDescriptorBuilder {
	use ParameterKind::*;

	let body = ParameterSpec::body;
	let builder = OperationDescriptor::builder(kind.create_operation(), HttpMethod::Post, path)
		.parameter(body("cif", String).required())
		.parameter(body("client", Object).required())
		.parameter(body("issueDate", String))
		.parameter(body("dueDate", String));
	let builder = match kind {
		DocumentType::Invoice => builder.parameters([
			body("deliveryDate", String),
			body("collectDate", String),
			body("referenceDocument", Object),
			body("collect", Object),
		]),
		DocumentType::Proforma | DocumentType::Notice => builder,
	};

	builder.parameters([
		body("useStock", Integer),
		body("seriesName", String).required(),
		body("language", String),
		body("precision", Integer),
		body("currency", String),
		body("exchangeRate", Number),
		body("products", Any).required(),
		body("issuerName", String),
		body("issuerId", String),
		body("noticeNumber", String),
		body("internalNote", String),
		body("deputyName", String),
		body("deputyIdentityCard", String),
		body("deputyAuto", String),
		body("salesAgent", String),
		body("mentions", String),
		body("workStation", String),
	])
}
