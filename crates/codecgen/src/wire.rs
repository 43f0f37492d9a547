//! The intermediate marshaling record.
//!
//! A [`WireRecord`] mirrors the original record with every field type
//! wrapped in a pointer, so a decoder can tell "absent" from "zero value".

use crate::compat::TypeOracle;
use crate::error::GenError;
use crate::record::{FieldDescriptor, Location, Record};
use crate::types::{Package, TypeRef};
use serde::Serialize;
use std::fmt;

/// Default suffix appended to the original record name.
pub const DEFAULT_SUFFIX: &str = "JSON";

/// A field of the wire record.
#[derive(Debug, Clone, Serialize)]
pub struct WireField {
    pub name: String,
    /// Type used while encoding and decoding; always a pointer.
    pub ty: TypeRef,
    /// Struct tag, copied verbatim from the original field.
    pub tag: String,
    pub original: FieldDescriptor,
}

impl WireField {
    /// Whether an override replaced the field's type.
    pub fn is_overridden(&self) -> bool {
        self.ty != self.original.ty.ensure_pointer()
    }
}

/// A non-fatal diagnostic raised while building the wire record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub location: Location,
    pub record: String,
    pub field: String,
    pub message: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}.{}) Warning: {}",
            self.location, self.record, self.field, self.message
        )
    }
}

/// The intermediate record used purely for encoding and decoding.
#[derive(Debug, Clone, Serialize)]
pub struct WireRecord {
    pub original_name: String,
    pub name: String,
    pub package: Package,
    /// Fields in the original declaration order.
    pub fields: Vec<WireField>,
    #[serde(skip)]
    pub warnings: Vec<Warning>,
}

impl WireRecord {
    /// Build the wire record for `record`.
    ///
    /// Non-exported fields are skipped silently; embedded fields are skipped
    /// with a warning.
    pub fn build(record: &Record, suffix: &str) -> Self {
        let mut wire = WireRecord {
            original_name: record.name.clone(),
            name: format!("{}{}", record.name, suffix),
            package: record.package.clone(),
            fields: Vec::with_capacity(record.fields.len()),
            warnings: Vec::new(),
        };
        for field in &record.fields {
            if !field.exported {
                continue;
            }
            if field.embedded {
                let warning = Warning {
                    location: field.location(),
                    record: record.name.clone(),
                    field: field.name.clone(),
                    message: "ignoring embedded field".to_string(),
                };
                tracing::warn!("{}", warning);
                wire.warnings.push(warning);
                continue;
            }
            wire.fields.push(WireField {
                name: field.name.clone(),
                ty: field.ty.ensure_pointer(),
                tag: field.tag.clone(),
                original: field.clone(),
            });
        }
        tracing::debug!(
            record = %record.name,
            wire = %wire.name,
            fields = wire.fields.len(),
            "built wire record"
        );
        wire
    }

    pub fn field_by_name(&self, name: &str) -> Option<&WireField> {
        self.fields.iter().find(|f| f.name == name)
    }

    fn field_by_name_mut(&mut self, name: &str) -> Option<&mut WireField> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    /// Replace field types with those of the matching fields in `overrides`.
    ///
    /// Every override field must be exported and not embedded, must match a
    /// wire field by name, and must be convertible to and from the original
    /// field type once both are pointer-wrapped.
    pub fn apply_overrides(
        &mut self,
        overrides: &Record,
        oracle: &dyn TypeOracle,
    ) -> Result<(), GenError> {
        for of in &overrides.fields {
            if of.embedded || !of.exported {
                return Err(GenError::OverrideFieldShape {
                    location: of.location(),
                    field: of.name.clone(),
                });
            }
            let original_name = self.original_name.clone();
            let package = self.package.clone();
            let Some(field) = self.field_by_name_mut(&of.name) else {
                return Err(GenError::NoMatchingField {
                    location: of.location(),
                    field: of.name.clone(),
                    record: original_name,
                });
            };
            let replacement = of.ty.ensure_pointer();
            let original = field.original.ty.ensure_pointer();
            if !oracle.convertible(&replacement, &original)
                || !oracle.convertible(&original, &replacement)
            {
                return Err(GenError::NotConvertible {
                    location: of.location(),
                    from: of.ty.to_string_in(&package),
                    to: field.original.ty.to_string_in(&package),
                });
            }
            tracing::debug!(field = %of.name, "applied field type override");
            field.ty = replacement;
        }
        Ok(())
    }
}
