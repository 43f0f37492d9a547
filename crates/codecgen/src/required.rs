//! Required-field validation for decoding.
//!
//! Every field is required unless its tag marks it `optional:"true"` (or
//! `"yes"`), or its format tag starts with `-`, in which case the encoder
//! never writes it and the decoder can't expect it.

use crate::compat::TypeOracle;
use crate::fragment::{Expr, Stmt};
use crate::tags::StructTag;
use crate::wire::WireField;
use std::fmt;

/// Tag key marking a field optional.
pub const OPTIONAL_KEY: &str = "optional";

const OPTIONAL_VALUES: &[&str] = &["true", "yes"];

/// A supported encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    pub const ALL: [Format; 2] = [Format::Json, Format::Yaml];

    /// Struct tag key holding the field's encoded name.
    pub fn tag_key(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Yaml => "yaml",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Format::Json => "JSON",
            Format::Yaml => "YAML",
        })
    }
}

/// Whether the field may be absent when decoding `format`.
pub fn is_optional(tag: &str, format: Format) -> bool {
    let tag = StructTag(tag);
    if OPTIONAL_VALUES.contains(&tag.get(OPTIONAL_KEY).as_str()) {
        return true;
    }
    tag.get(format.tag_key()).starts_with('-')
}

/// The key under which the field appears in `format`.
///
/// Uses the name from the format tag (up to the first comma), falling back
/// to the field name with its first letter lower-cased.
pub fn encoded_name(field: &str, tag: &str, format: Format) -> String {
    let value = StructTag(tag).get(format.tag_key());
    let name = value.split(',').next().unwrap_or_default();
    if name.is_empty() || name == "-" {
        uncapitalize(field)
    } else {
        name.to_string()
    }
}

fn uncapitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Message returned by generated code when a required field is missing.
pub fn missing_field_message(encoded: &str, format: Format, record: &str) -> String {
    format!("missing required field '{}' in {} {}", encoded, format, record)
}

/// Statements moving one decoded wire field into the output record.
///
/// `decoded` names the wire record variable, `target` the record being
/// filled and `errors` the alias of the `errors` package.
pub fn decode_field(
    field: &WireField,
    format: Format,
    record: &str,
    oracle: &dyn TypeOracle,
    names: &DecodeNames<'_>,
) -> Vec<Stmt> {
    let present = Expr::ident(names.decoded).field(&field.name);
    let assign = Stmt::assign(
        Expr::ident(names.target).field(&field.name),
        field.convert_back(oracle, names.decoded),
    );
    if is_optional(&field.tag, format) {
        vec![Stmt::if_then(present.not_nil(), vec![assign])]
    } else {
        let message = missing_field_message(
            &encoded_name(&field.name, &field.tag, format),
            format,
            record,
        );
        let error = Expr::ident(names.errors)
            .field("New")
            .call(vec![Expr::Str(message)]);
        vec![
            Stmt::if_then(present.is_nil(), vec![Stmt::Return(vec![error])]),
            assign,
        ]
    }
}

/// Variable and package names used by generated decode logic.
#[derive(Debug, Clone, Copy)]
pub struct DecodeNames<'a> {
    pub decoded: &'a str,
    pub target: &'a str,
    pub errors: &'a str,
}

/// Whether any field needs a presence check in any format.
pub fn any_required<'a>(fields: impl IntoIterator<Item = &'a WireField>) -> bool {
    fields
        .into_iter()
        .any(|f| Format::ALL.iter().any(|&format| !is_optional(&f.tag, format)))
}
