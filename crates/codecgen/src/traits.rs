//! Traits at the boundary between the generator and its type source.

use crate::compat::TypeOracle;
use crate::record::Record;
use crate::types::Package;

/// Why a record could not be looked up.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("no such identifier")]
    NotFound,

    #[error("not a type")]
    NotAType,

    #[error("not a struct type")]
    NotAStruct,
}

/// Supplies structural descriptions of records and a compatibility oracle.
///
/// # Implementing Custom Providers
///
/// ```ignore
/// use codecgen::{LookupError, Record, TypeOracle, TypeProvider, types::Package};
///
/// struct MyProvider { package: Package, universe: codecgen::TypeUniverse }
///
/// impl TypeProvider for MyProvider {
///     fn package(&self) -> &Package { &self.package }
///     fn lookup_record(&self, name: &str) -> Result<Record, LookupError> { /* ... */ }
///     fn oracle(&self) -> &dyn TypeOracle { &self.universe }
/// }
/// ```
pub trait TypeProvider {
    /// The package the records live in and the generated code belongs to.
    fn package(&self) -> &Package;

    /// Resolve a record by name.
    fn lookup_record(&self, name: &str) -> Result<Record, LookupError>;

    /// Compatibility oracle for the package's types.
    fn oracle(&self) -> &dyn TypeOracle;
}
