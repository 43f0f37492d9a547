//! Structural description of a record (a Go struct type).

use crate::types::{Package, TypeRef};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Source position of a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub file: String,
    /// 1-based line.
    pub line: usize,
    /// 1-based column.
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Optional position rendered as a `file:line:col: ` message prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location(pub Option<Position>);

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(pos) => write!(f, "{}: ", pos),
            None => Ok(()),
        }
    }
}

/// A single declared field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub ty: TypeRef,
    /// Raw struct tag, without the surrounding quotes.
    pub tag: String,
    /// Whether the field is exported (visible outside its package).
    pub exported: bool,
    pub embedded: bool,
    pub position: Option<Position>,
}

impl FieldDescriptor {
    /// A named field; exportedness follows Go's capitalization rule.
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        let name = name.into();
        Self {
            exported: is_exported(&name),
            name,
            ty,
            tag: String::new(),
            embedded: false,
            position: None,
        }
    }

    /// An embedded field; its name is the type's name.
    pub fn embedded(ty: TypeRef) -> Self {
        let name = embedded_name(&ty);
        Self {
            embedded: true,
            ..Self::new(name, ty)
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn location(&self) -> Location {
        Location(self.position.clone())
    }
}

/// A record type: an ordered list of fields owned by a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub name: String,
    pub package: Package,
    pub fields: Vec<FieldDescriptor>,
    pub position: Option<Position>,
}

impl Record {
    pub fn new(name: impl Into<String>, package: &Package, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            name: name.into(),
            package: package.clone(),
            fields,
            position: None,
        }
    }
}

/// Go's rule: an identifier is exported if it starts with an upper-case letter.
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

fn embedded_name(ty: &TypeRef) -> String {
    match ty {
        TypeRef::Pointer(elem) => embedded_name(elem),
        TypeRef::Named(named) => named.name.clone(),
        TypeRef::Basic(name) => name.clone(),
        other => format!("{:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exported_follows_capitalization() {
        assert!(FieldDescriptor::new("ID", TypeRef::basic("string")).exported);
        assert!(!FieldDescriptor::new("id", TypeRef::basic("string")).exported);
        assert!(!FieldDescriptor::new("_X", TypeRef::basic("string")).exported);
    }

    #[test]
    fn embedded_field_takes_type_name() {
        let pkg = Package::new("sync", "sync");
        let field = FieldDescriptor::embedded(TypeRef::pointer(TypeRef::named(&pkg, "Mutex")));
        assert_eq!(field.name, "Mutex");
        assert!(field.embedded);
        assert!(field.exported);
    }

    #[test]
    fn location_prefix() {
        let pos = Position {
            file: "item.go".into(),
            line: 4,
            column: 2,
        };
        assert_eq!(Location(Some(pos)).to_string(), "item.go:4:2: ");
        assert_eq!(Location(None).to_string(), "");
    }
}
