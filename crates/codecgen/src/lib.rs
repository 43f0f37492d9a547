//! Go codec generation for struct types.
//!
//! `codecgen` reads a Go struct and emits `MarshalJSON`, `UnmarshalJSON`,
//! `MarshalYAML` and `UnmarshalYAML` methods that go through an intermediate
//! "wire" struct. Every wire field is a pointer, so decoding can tell a
//! missing key from a zero value and reject missing required fields.
//!
//! # Architecture
//!
//! ```text
//! TypeProvider          Pipeline                         Output
//! ─────────────     ──────────────────────────────     ──────────
//! GoPackage     ─┐   WireRecord::build                ┌─> wire struct
//! MemoryProvider ─┴─> WireRecord::apply_overrides ────┼─> MarshalJSON / UnmarshalJSON
//!                     AliasTable::compute             └─> MarshalYAML / UnmarshalYAML
//!                     Renderer (convert, required)
//! ```
//!
//! # Example
//!
//! ```
//! use codecgen::{FieldDescriptor, GenerateOptions, MemoryProvider, Record, generate};
//! use codecgen::types::{Package, TypeRef};
//!
//! let pkg = Package::new("store", "example.com/store");
//! let mut provider = MemoryProvider::new(pkg.clone());
//! provider.add_record(Record::new(
//!     "Item",
//!     &pkg,
//!     vec![FieldDescriptor::new("ID", TypeRef::basic("string")).with_tag(r#"json:"id""#)],
//! ));
//!
//! let generated = generate(&provider, &GenerateOptions::new("Item")).unwrap();
//! assert!(generated.code.contains("func (x *Item) UnmarshalJSON(input []byte) error {"));
//! assert!(generated.code.contains("missing required field 'id' in JSON Item"));
//! ```
//!
//! # Feature Flags
//!
//! - `input-go` (default) - [`GoPackage`], loading records from Go source with tree-sitter

pub mod compat;
pub mod convert;
pub mod error;
pub mod fragment;
pub mod generate;
pub mod imports;
pub mod input;
pub mod record;
pub mod render;
pub mod required;
pub mod tags;
pub mod traits;
pub mod types;
pub mod wire;

pub use compat::{TypeOracle, TypeUniverse};
pub use error::GenError;
pub use generate::{GenerateOptions, Generated, generate};
pub use imports::AliasTable;
pub use record::{FieldDescriptor, Position, Record};
pub use traits::{LookupError, TypeProvider};
pub use wire::{DEFAULT_SUFFIX, Warning, WireField, WireRecord};

pub use input::MemoryProvider;
#[cfg(feature = "input-go")]
pub use input::{GoPackage, LoadError};
