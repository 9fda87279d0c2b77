//! Document lifecycle facade addressing invoices, proformas, and notices by type.

// self
use crate::{
	_prelude::*,
	catalog::DocumentType,
	client::{Arguments, Client},
	http::ApiHttpClient,
	response::ApiResponse,
};

/// Identifies an issued document.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentKey {
	/// Issuing company tax identifier.
	pub cif: String,
	/// Document series.
	pub series_name: String,
	/// Number within the series.
	pub number: String,
}
impl DocumentKey {
	/// Creates a key from its parts.
	pub fn new(
		cif: impl Into<String>,
		series_name: impl Into<String>,
		number: impl Into<String>,
	) -> Self {
		Self { cif: cif.into(), series_name: series_name.into(), number: number.into() }
	}

	/// Renders the key as operation arguments.
	pub fn to_arguments(&self) -> Arguments {
		let mut args = Arguments::new();

		args.insert("cif".into(), Value::from(self.cif.as_str()));
		args.insert("seriesName".into(), Value::from(self.series_name.as_str()));
		args.insert("number".into(), Value::from(self.number.as_str()));

		args
	}
}

impl<C> Client<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Issues a new document of `kind`.
	pub async fn create_document(
		&self,
		kind: DocumentType,
		args: Arguments,
	) -> Result<ApiResponse> {
		self.execute(kind.create_operation(), args).await
	}

	/// Fetches an issued document.
	pub async fn document(&self, kind: DocumentType, key: &DocumentKey) -> Result<ApiResponse> {
		self.execute(kind.get_operation(), key.to_arguments()).await
	}

	/// Cancels an issued document.
	pub async fn cancel_document(
		&self,
		kind: DocumentType,
		key: &DocumentKey,
	) -> Result<ApiResponse> {
		self.execute(kind.cancel_operation(), key.to_arguments()).await
	}

	/// Restores a cancelled document.
	pub async fn restore_document(
		&self,
		kind: DocumentType,
		key: &DocumentKey,
	) -> Result<ApiResponse> {
		self.execute(kind.restore_operation(), key.to_arguments()).await
	}
}
