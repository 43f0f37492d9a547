//! The generation pipeline: lookup, wire record, overrides, aliases, render.

use crate::error::GenError;
use crate::imports::AliasTable;
use crate::render::Renderer;
use crate::traits::TypeProvider;
use crate::wire::{DEFAULT_SUFFIX, Warning, WireRecord};

/// What to generate.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Name of the record to generate codecs for.
    pub type_name: String,
    /// Name of a record whose field types replace the matching fields.
    pub override_name: Option<String>,
    /// Appended to the record name to name the wire type.
    pub suffix: String,
}

impl GenerateOptions {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            override_name: None,
            suffix: DEFAULT_SUFFIX.to_string(),
        }
    }

    pub fn with_override(mut self, name: impl Into<String>) -> Self {
        self.override_name = Some(name.into());
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }
}

/// Result of a successful generation.
#[derive(Debug, Clone)]
pub struct Generated {
    /// Complete Go source file.
    pub code: String,
    /// The wire record the code was rendered from.
    pub wire: WireRecord,
    /// Fields skipped with a warning.
    pub warnings: Vec<Warning>,
}

/// Generate JSON and YAML codec methods for a record.
///
/// Nothing is produced on failure; warnings for skipped embedded fields
/// are returned alongside the code.
pub fn generate(
    provider: &dyn TypeProvider,
    options: &GenerateOptions,
) -> Result<Generated, GenError> {
    let record = provider
        .lookup_record(&options.type_name)
        .map_err(|source| GenError::RecordLookup {
            name: options.type_name.clone(),
            source,
        })?;
    let oracle = provider.oracle();

    let mut wire = WireRecord::build(&record, &options.suffix);
    if let Some(name) = &options.override_name {
        let overrides =
            provider
                .lookup_record(name)
                .map_err(|source| GenError::OverrideLookup {
                    name: name.clone(),
                    source,
                })?;
        wire.apply_overrides(&overrides, oracle)?;
    }

    let table = AliasTable::compute(&wire)?;
    let code = Renderer::new(&wire, &table, oracle).render();
    tracing::debug!(record = %wire.original_name, bytes = code.len(), "rendered codecs");

    let warnings = wire.warnings.clone();
    Ok(Generated {
        code,
        wire,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::MemoryProvider;
    use crate::record::{FieldDescriptor, Record};
    use crate::traits::LookupError;
    use crate::types::{Package, TypeRef};

    fn provider() -> MemoryProvider {
        let pkg = Package::new("store", "example.com/store");
        let mut provider = MemoryProvider::new(pkg.clone());
        provider
            .add_record(Record::new(
                "Item",
                &pkg,
                vec![FieldDescriptor::new("Name", TypeRef::basic("string"))],
            ))
            .add_record(Record::new(
                "itemOverride",
                &pkg,
                vec![FieldDescriptor::new("Name", TypeRef::named(&pkg, "label"))],
            ))
            .add_type("label", TypeRef::basic("string"))
            .add_value("DefaultItem");
        provider
    }

    #[test]
    fn missing_record_is_reported() {
        let err = generate(&provider(), &GenerateOptions::new("Missing")).unwrap_err();
        assert_eq!(err.to_string(), "can't find Missing: no such identifier");
        assert!(matches!(
            err,
            GenError::RecordLookup {
                source: LookupError::NotFound,
                ..
            }
        ));
    }

    #[test]
    fn override_must_be_a_struct_type() {
        let options = GenerateOptions::new("Item").with_override("DefaultItem");
        let err = generate(&provider(), &options).unwrap_err();
        assert_eq!(
            err.to_string(),
            "can't find field replacement type DefaultItem: not a type"
        );
    }

    #[test]
    fn override_changes_wire_field() {
        let options = GenerateOptions::new("Item").with_override("itemOverride");
        let generated = generate(&provider(), &options).unwrap();
        assert!(generated.wire.fields[0].is_overridden());
        assert!(generated.code.contains("\tName *label\n"));
        assert!(generated.code.contains("\t\tName: (*label)(&x.Name),\n"));
        assert!(generated.code.contains("\tv.Name = (string)(*dec.Name)\n"));
    }

    #[test]
    fn suffix_names_wire_type() {
        let options = GenerateOptions::new("Item").with_suffix("Wire");
        let generated = generate(&provider(), &options).unwrap();
        assert_eq!(generated.wire.name, "ItemWire");
        assert!(generated.code.contains("type ItemWire struct {"));
    }
}
