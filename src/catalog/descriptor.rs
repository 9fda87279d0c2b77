// self
use crate::{_prelude::*, catalog::CatalogError};

/// HTTP verbs used by catalog operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
	/// `GET`
	Get,
	/// `POST`
	Post,
	/// `PUT`
	Put,
	/// `DELETE`
	Delete,
}
impl HttpMethod {
	/// Returns the request-line token.
	pub const fn as_str(self) -> &'static str {
		match self {
			HttpMethod::Get => "GET",
			HttpMethod::Post => "POST",
			HttpMethod::Put => "PUT",
			HttpMethod::Delete => "DELETE",
		}
	}

	pub(crate) fn to_http(self) -> oauth2::http::Method {
		match self {
			HttpMethod::Get => oauth2::http::Method::GET,
			HttpMethod::Post => oauth2::http::Method::POST,
			HttpMethod::Put => oauth2::http::Method::PUT,
			HttpMethod::Delete => oauth2::http::Method::DELETE,
		}
	}
}
impl Display for HttpMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Where a parameter travels in the outbound request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterLocation {
	/// URL query string.
	Query,
	/// Top-level member of the JSON body.
	Body,
}

/// Declared value kind of a parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
	/// String; numbers are accepted as well since identifiers are often numeric.
	String,
	/// Integral JSON number.
	Integer,
	/// Any JSON number.
	Number,
	/// JSON object.
	Object,
	/// Any JSON value.
	Any,
}
impl ParameterKind {
	/// Returns `true` if `value` satisfies the kind.
	pub fn accepts(self, value: &Value) -> bool {
		match self {
			ParameterKind::String => value.is_string() || value.is_number(),
			ParameterKind::Integer => value.is_i64() || value.is_u64(),
			ParameterKind::Number => value.is_number(),
			ParameterKind::Object => value.is_object(),
			ParameterKind::Any => true,
		}
	}

	/// Human-readable label used in validation errors.
	pub const fn label(self) -> &'static str {
		match self {
			ParameterKind::String => "a string",
			ParameterKind::Integer => "an integer",
			ParameterKind::Number => "a number",
			ParameterKind::Object => "an object",
			ParameterKind::Any => "any value",
		}
	}
}

/// Declared parameter of an operation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
	/// Wire name.
	pub name: String,
	/// Query or body.
	pub location: ParameterLocation,
	/// Expected value kind.
	pub kind: ParameterKind,
	/// Whether the caller must supply the parameter.
	pub required: bool,
	/// Value sent when the caller omits the parameter.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub default: Option<Value>,
}
impl ParameterSpec {
	/// Optional query-string parameter.
	pub fn query(name: impl Into<String>, kind: ParameterKind) -> Self {
		Self::new(name, ParameterLocation::Query, kind)
	}

	/// Optional JSON body parameter.
	pub fn body(name: impl Into<String>, kind: ParameterKind) -> Self {
		Self::new(name, ParameterLocation::Body, kind)
	}

	/// Marks the parameter as required.
	pub fn required(mut self) -> Self {
		self.required = true;

		self
	}

	/// Sets the value substituted when the caller omits the parameter.
	pub fn with_default(mut self, value: impl Into<Value>) -> Self {
		self.default = Some(value.into());

		self
	}

	fn new(name: impl Into<String>, location: ParameterLocation, kind: ParameterKind) -> Self {
		Self { name: name.into(), location, kind, required: false, default: None }
	}
}

/// Immutable description of one API operation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OperationDescriptor {
	/// Logical operation name (e.g. `getClients`).
	pub name: String,
	/// HTTP verb.
	pub method: HttpMethod,
	/// Path relative to the API base URL, starting with `/`.
	pub path: String,
	/// Declared parameters in order.
	pub parameters: Vec<ParameterSpec>,
}
impl OperationDescriptor {
	/// Creates a new builder for the provided name, verb, and path.
	pub fn builder(
		name: impl Into<String>,
		method: HttpMethod,
		path: impl Into<String>,
	) -> OperationDescriptorBuilder {
		OperationDescriptorBuilder {
			name: name.into(),
			method,
			path: path.into(),
			parameters: Vec::new(),
		}
	}

	/// Looks up a declared parameter by wire name.
	pub fn parameter(&self, name: &str) -> Option<&ParameterSpec> {
		self.parameters.iter().find(|spec| spec.name == name)
	}

	/// Iterates over required parameters in declaration order.
	pub fn required_parameters(&self) -> impl Iterator<Item = &ParameterSpec> {
		self.parameters.iter().filter(|spec| spec.required)
	}

	/// Returns `true` if any parameter travels in the JSON body.
	pub fn has_body(&self) -> bool {
		self.parameters.iter().any(|spec| spec.location == ParameterLocation::Body)
	}

	/// Validates invariants for the descriptor.
	pub(crate) fn validate(&self) -> Result<(), CatalogError> {
		if self.name.trim().is_empty() {
			return Err(CatalogError::EmptyName);
		}
		if !self.path.starts_with('/') {
			return Err(CatalogError::InvalidPath {
				operation: self.name.clone(),
				path: self.path.clone(),
			});
		}

		for (idx, spec) in self.parameters.iter().enumerate() {
			if self.parameters[..idx].iter().any(|earlier| earlier.name == spec.name) {
				return Err(CatalogError::DuplicateParameter {
					operation: self.name.clone(),
					parameter: spec.name.clone(),
				});
			}
		}

		Ok(())
	}
}

/// Builder for [`OperationDescriptor`] values.
#[derive(Debug)]
pub struct OperationDescriptorBuilder {
	/// Logical operation name.
	pub name: String,
	/// HTTP verb.
	pub method: HttpMethod,
	/// Path relative to the API base URL.
	pub path: String,
	/// Declared parameters in order.
	pub parameters: Vec<ParameterSpec>,
}
impl OperationDescriptorBuilder {
	/// Appends a parameter.
	pub fn parameter(mut self, spec: ParameterSpec) -> Self {
		self.parameters.push(spec);

		self
	}

	/// Appends multiple parameters.
	pub fn parameters<I>(mut self, specs: I) -> Self
	where
		I: IntoIterator<Item = ParameterSpec>,
	{
		self.parameters.extend(specs);

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<OperationDescriptor, CatalogError> {
		let descriptor = OperationDescriptor {
			name: self.name,
			method: self.method,
			path: self.path,
			parameters: self.parameters,
		};

		descriptor.validate()?;

		Ok(descriptor)
	}
}
