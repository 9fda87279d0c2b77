//! Declarative operation catalog: every API operation is a validated descriptor naming its
//! verb, path, and parameters, and the dispatcher needs nothing else to build a request.

mod builtin;
mod descriptor;

pub use descriptor::*;

// std
use std::sync::LazyLock;
// self
use crate::_prelude::*;

static BUILTIN: LazyLock<Result<Arc<OperationCatalog>, CatalogError>> =
	LazyLock::new(|| builtin::catalog().map(Arc::new));

/// Errors raised while assembling descriptors or catalogs.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum CatalogError {
	/// Operation name is empty.
	#[error("Operation name must not be empty.")]
	EmptyName,
	/// Path is not relative to the API base.
	#[error("Operation `{operation}` has path `{path}`, which must start with `/`.")]
	InvalidPath {
		/// Operation name.
		operation: String,
		/// Offending path.
		path: String,
	},
	/// Parameter declared twice.
	#[error("Operation `{operation}` declares parameter `{parameter}` more than once.")]
	DuplicateParameter {
		/// Operation name.
		operation: String,
		/// Duplicated parameter name.
		parameter: String,
	},
	/// Operation registered twice.
	#[error("Operation `{operation}` is registered more than once.")]
	DuplicateOperation {
		/// Duplicated operation name.
		operation: String,
	},
}

/// Document families sharing the create/get/cancel/restore lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
	/// Fiscal invoice.
	Invoice,
	/// Proforma invoice.
	Proforma,
	/// Delivery notice.
	Notice,
}
impl DocumentType {
	/// Every document family in catalog order.
	pub const ALL: [DocumentType; 3] =
		[DocumentType::Proforma, DocumentType::Notice, DocumentType::Invoice];

	/// Path segment under `/docs/`.
	pub const fn as_str(self) -> &'static str {
		match self {
			DocumentType::Invoice => "invoice",
			DocumentType::Proforma => "proforma",
			DocumentType::Notice => "notice",
		}
	}

	/// Creation operation name.
	pub const fn create_operation(self) -> &'static str {
		match self {
			DocumentType::Invoice => "addInvoice",
			DocumentType::Proforma => "addProforma",
			DocumentType::Notice => "addNotice",
		}
	}

	/// Lookup operation name.
	pub const fn get_operation(self) -> &'static str {
		match self {
			DocumentType::Invoice => "getInvoices",
			DocumentType::Proforma => "getProformas",
			DocumentType::Notice => "getNotices",
		}
	}

	/// Cancellation operation name.
	pub const fn cancel_operation(self) -> &'static str {
		match self {
			DocumentType::Invoice => "cancelInvoice",
			DocumentType::Proforma => "cancelProforma",
			DocumentType::Notice => "cancelNotice",
		}
	}

	/// Restoration operation name.
	pub const fn restore_operation(self) -> &'static str {
		match self {
			DocumentType::Invoice => "restoreInvoice",
			DocumentType::Proforma => "restoreProforma",
			DocumentType::Notice => "restoreNotice",
		}
	}
}
impl Display for DocumentType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Immutable name → descriptor table consulted by the dispatcher.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OperationCatalog {
	operations: BTreeMap<String, OperationDescriptor>,
}
impl OperationCatalog {
	/// Returns the shared table of Oblio operations, built on first use.
	pub fn builtin() -> Result<Arc<Self>, CatalogError> {
		BUILTIN.clone()
	}

	/// Starts an empty catalog.
	pub fn builder() -> OperationCatalogBuilder {
		OperationCatalogBuilder::default()
	}

	/// Starts from the built-in table so callers can register additional operations.
	pub fn extend_builtin() -> Result<OperationCatalogBuilder, CatalogError> {
		let builtin = Self::builtin()?;

		Ok(OperationCatalogBuilder { operations: builtin.operations.clone() })
	}

	/// Looks up a descriptor by operation name.
	pub fn get(&self, name: &str) -> Option<&OperationDescriptor> {
		self.operations.get(name)
	}

	/// Returns `true` when `name` is registered.
	pub fn contains(&self, name: &str) -> bool {
		self.operations.contains_key(name)
	}

	/// Iterates over registered names in lexical order.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.operations.keys().map(String::as_str)
	}

	/// Iterates over descriptors in lexical name order.
	pub fn iter(&self) -> impl Iterator<Item = &OperationDescriptor> {
		self.operations.values()
	}

	/// Number of registered operations.
	pub fn len(&self) -> usize {
		self.operations.len()
	}

	/// Returns `true` when the catalog holds no operations.
	pub fn is_empty(&self) -> bool {
		self.operations.is_empty()
	}
}

/// Builder that rejects invalid descriptors and duplicate names.
#[derive(Debug, Default)]
pub struct OperationCatalogBuilder {
	operations: BTreeMap<String, OperationDescriptor>,
}
impl OperationCatalogBuilder {
	/// Validates and registers the descriptor produced by `builder`.
	pub fn operation(self, builder: OperationDescriptorBuilder) -> Result<Self, CatalogError> {
		self.descriptor(builder.build()?)
	}

	/// Registers an already built descriptor.
	pub fn descriptor(mut self, descriptor: OperationDescriptor) -> Result<Self, CatalogError> {
		descriptor.validate()?;

		if self.operations.contains_key(&descriptor.name) {
			return Err(CatalogError::DuplicateOperation { operation: descriptor.name });
		}

		self.operations.insert(descriptor.name.clone(), descriptor);

		Ok(self)
	}

	/// Freezes the catalog.
	pub fn build(self) -> OperationCatalog {
		OperationCatalog { operations: self.operations }
	}
}
