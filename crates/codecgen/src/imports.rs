//! Import aliasing for generated code.
//!
//! Collects every package referenced by the wire and original field types
//! and assigns each one a unique alias. Registration order is preserved,
//! so aliases and the emitted import block are reproducible.

use crate::error::GenError;
use crate::types::{NamedType, Package, Qualifier, TypeRef};
use crate::wire::WireRecord;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::collections::HashSet;

/// Package providing the JSON encoder.
pub const JSON_PACKAGE: &str = "encoding/json";
/// Package providing `errors.New`.
pub const ERRORS_PACKAGE: &str = "errors";

/// Identifiers the generated methods declare locally.
pub const LOCAL_IDENTS: &[&str] = &["x", "v", "dec", "err", "input", "unmarshal"];

/// Maps package paths to the alias they are referenced by.
#[derive(Debug, Clone)]
pub struct AliasTable {
    local: Package,
    /// alias → path, in registration order.
    by_alias: IndexMap<String, String>,
    /// path → alias.
    by_path: IndexMap<String, String>,
    reserved: HashSet<String>,
    counter: usize,
}

impl AliasTable {
    /// An empty table for code living in `local`, with the encoder and error
    /// packages pre-registered.
    pub fn new(local: &Package) -> Self {
        let mut table = Self {
            local: local.clone(),
            by_alias: IndexMap::new(),
            by_path: IndexMap::new(),
            reserved: LOCAL_IDENTS.iter().map(|s| s.to_string()).collect(),
            counter: 0,
        };
        table.register("json", JSON_PACKAGE);
        table.register("errors", ERRORS_PACKAGE);
        table
    }

    /// Build the table for a wire record.
    ///
    /// Walks the wire type and the original type of every field. The record
    /// and wire type names are reserved so no alias can shadow them.
    pub fn compute(wire: &WireRecord) -> Result<Self, GenError> {
        let mut table = Self::new(&wire.package);
        table.reserve(&wire.original_name);
        table.reserve(&wire.name);
        for field in &wire.fields {
            walk_named_types(&field.ty, &mut |named| table.add_named(named))?;
            walk_named_types(&field.original.ty, &mut |named| table.add_named(named))?;
        }
        tracing::debug!(imports = table.by_path.len(), "computed import aliases");
        Ok(table)
    }

    /// Mark an identifier as unavailable for aliases.
    pub fn reserve(&mut self, ident: &str) {
        self.reserved.insert(ident.to_string());
    }

    fn add_named(&mut self, named: &NamedType) {
        if named.package.path != self.local.path {
            self.register(&named.package.name, &named.package.path);
        }
    }

    /// Register a package, returning its alias.
    ///
    /// A package keeps its name unless that name is taken by another package
    /// or reserved; then it is prefixed with `_`, and if that is taken too a
    /// counter is appended.
    pub fn register(&mut self, name: &str, path: &str) -> &str {
        if !self.by_path.contains_key(path) {
            let mut alias = name.to_string();
            if self.is_taken(&alias) {
                alias = format!("_{}", name);
                while self.is_taken(&alias) {
                    alias = format!("_{}_{}", name, self.counter);
                    self.counter += 1;
                }
            }
            self.by_alias.insert(alias.clone(), path.to_string());
            self.by_path.insert(path.to_string(), alias);
        }
        &self.by_path[path]
    }

    fn is_taken(&self, alias: &str) -> bool {
        self.by_alias.contains_key(alias) || self.reserved.contains(alias)
    }

    /// Alias of a registered package.
    pub fn alias(&self, path: &str) -> Option<&str> {
        self.by_path.get(path).map(String::as_str)
    }

    /// `(alias, path)` pairs in registration order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.by_path
            .iter()
            .map(|(path, alias)| (alias.as_str(), path.as_str()))
    }

    pub fn local(&self) -> &Package {
        &self.local
    }

    /// A qualifier that prints through this table and records which
    /// packages were printed.
    pub fn qualifier(&self) -> TrackingQualifier<'_> {
        TrackingQualifier {
            table: self,
            used: RefCell::new(HashSet::new()),
        }
    }
}

/// Prints packages by their alias and remembers every package it printed.
pub struct TrackingQualifier<'a> {
    table: &'a AliasTable,
    used: RefCell<HashSet<String>>,
}

impl TrackingQualifier<'_> {
    /// Mark a package as used without printing a type from it.
    pub fn mark_used(&self, path: &str) {
        self.used.borrow_mut().insert(path.to_string());
    }

    /// Registered `(alias, path)` pairs that were used, in table order.
    pub fn used_entries(&self) -> Vec<(String, String)> {
        let used = self.used.borrow();
        self.table
            .entries()
            .filter(|(_, path)| used.contains(*path))
            .map(|(alias, path)| (alias.to_string(), path.to_string()))
            .collect()
    }
}

impl Qualifier for TrackingQualifier<'_> {
    fn qualify(&self, package: &Package) -> Option<String> {
        if package.path == self.table.local.path {
            return None;
        }
        self.mark_used(&package.path);
        Some(
            self.table
                .alias(&package.path)
                .unwrap_or(&package.name)
                .to_string(),
        )
    }
}

/// Call `callback` for every named type reachable from `ty`.
///
/// Descends through pointers, slices, arrays, maps, channels, anonymous
/// structs and type arguments. Interface types with methods and function
/// types are rejected.
pub fn walk_named_types(
    ty: &TypeRef,
    callback: &mut dyn FnMut(&NamedType),
) -> Result<(), GenError> {
    match ty {
        TypeRef::Basic(_) => Ok(()),
        TypeRef::Named(named) => {
            callback(named);
            for arg in &named.args {
                walk_named_types(arg, callback)?;
            }
            Ok(())
        }
        TypeRef::Pointer(elem)
        | TypeRef::Slice(elem)
        | TypeRef::Array { elem, .. }
        | TypeRef::Chan { elem, .. } => walk_named_types(elem, callback),
        TypeRef::Map { key, value } => {
            walk_named_types(key, callback)?;
            walk_named_types(value, callback)
        }
        TypeRef::Struct(fields) => {
            for field in fields {
                walk_named_types(&field.ty, callback)?;
            }
            Ok(())
        }
        TypeRef::Interface(body) if body.trim().is_empty() => Ok(()),
        TypeRef::Interface(body) => Err(GenError::UnsupportedType(format!(
            "interface{{{}}}",
            body.trim()
        ))),
        TypeRef::Func(signature) => Err(GenError::UnsupportedType(signature.clone())),
    }
}
