//! Typed lookups for read-only reference data (companies, clients, products, series,
//! languages, management units, VAT rates).

// self
use crate::{
	_prelude::*,
	client::{Arguments, Client},
	http::ApiHttpClient,
	response::ApiResponse,
};

/// Optional filters for product listings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
	/// Product name substring.
	pub name: Option<String>,
	/// Product code.
	pub code: Option<String>,
	/// Management unit.
	pub management: Option<String>,
	/// Work station.
	pub work_station: Option<String>,
	/// Pagination offset; the API defaults it to `0`.
	pub offset: Option<u64>,
}
impl ProductFilter {
	/// Filters by name.
	pub fn name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());

		self
	}

	/// Filters by product code.
	pub fn code(mut self, code: impl Into<String>) -> Self {
		self.code = Some(code.into());

		self
	}

	/// Filters by management unit.
	pub fn management(mut self, management: impl Into<String>) -> Self {
		self.management = Some(management.into());

		self
	}

	/// Filters by work station.
	pub fn work_station(mut self, work_station: impl Into<String>) -> Self {
		self.work_station = Some(work_station.into());

		self
	}

	/// Starts the listing at `offset`.
	pub fn offset(mut self, offset: u64) -> Self {
		self.offset = Some(offset);

		self
	}
}

/// Borrowing facade over [`Client`] for nomenclature endpoints.
pub struct Nomenclator<'a, C>
where
	C: ?Sized + ApiHttpClient,
{
	client: &'a Client<C>,
}
impl<C> Nomenclator<'_, C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Companies accessible with the client credentials.
	pub async fn companies(&self) -> Result<ApiResponse> {
		self.client.execute("getCompanies", Arguments::new()).await
	}

	/// Clients of company `cif`, optionally filtered by name.
	pub async fn clients(
		&self,
		cif: &str,
		name: Option<&str>,
		offset: Option<u64>,
	) -> Result<ApiResponse> {
		let mut args = scoped(cif);

		insert_opt(&mut args, "name", name.map(Value::from));
		insert_opt(&mut args, "offset", offset.map(Value::from));

		self.client.execute("getClients", args).await
	}

	/// Products of company `cif`.
	pub async fn products(&self, cif: &str, filter: &ProductFilter) -> Result<ApiResponse> {
		let mut args = scoped(cif);

		insert_opt(&mut args, "name", filter.name.as_deref().map(Value::from));
		insert_opt(&mut args, "code", filter.code.as_deref().map(Value::from));
		insert_opt(&mut args, "management", filter.management.as_deref().map(Value::from));
		insert_opt(&mut args, "workStation", filter.work_station.as_deref().map(Value::from));
		insert_opt(&mut args, "offset", filter.offset.map(Value::from));

		self.client.execute("getProducts", args).await
	}

	/// Document series of company `cif`.
	pub async fn series(&self, cif: &str) -> Result<ApiResponse> {
		self.client.execute("getSeries", scoped(cif)).await
	}

	/// Document languages of company `cif`.
	pub async fn languages(&self, cif: &str) -> Result<ApiResponse> {
		self.client.execute("getLanguages", scoped(cif)).await
	}

	/// Management units of company `cif`.
	pub async fn management(&self, cif: &str) -> Result<ApiResponse> {
		self.client.execute("getManagement", scoped(cif)).await
	}

	/// VAT rates of company `cif`.
	pub async fn vat_rates(&self, cif: &str) -> Result<ApiResponse> {
		self.client.execute("getVatRates", scoped(cif)).await
	}
}
impl<C> Debug for Nomenclator<'_, C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Nomenclator").field("client", self.client).finish()
	}
}

impl<C> Client<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Returns the nomenclature facade.
	pub fn nomenclator(&self) -> Nomenclator<'_, C> {
		Nomenclator { client: self }
	}
}

fn scoped(cif: &str) -> Arguments {
	let mut args = Arguments::new();

	args.insert("cif".into(), Value::from(cif));

	args
}

fn insert_opt(args: &mut Arguments, name: &str, value: Option<Value>) {
	if let Some(value) = value {
		args.insert(name.into(), value);
	}
}
