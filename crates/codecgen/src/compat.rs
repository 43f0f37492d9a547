//! Type compatibility: identity, assignability and convertibility.
//!
//! The rules follow the Go specification, restricted to what can be decided
//! from a single package's declarations. Named types from other packages are
//! opaque unless their underlying type has been declared.

use crate::types::{NamedType, Package, TypeRef};
use std::collections::HashMap;

/// Answers compatibility questions between two types.
pub trait TypeOracle {
    /// Whether `a` and `b` are the same type.
    fn identical(&self, a: &TypeRef, b: &TypeRef) -> bool;

    /// Whether a value of type `from` can be assigned to `to` without a
    /// conversion.
    fn assignable(&self, from: &TypeRef, to: &TypeRef) -> bool;

    /// Whether `from` can be converted to `to` with an explicit conversion.
    fn convertible(&self, from: &TypeRef, to: &TypeRef) -> bool;
}

/// Upper bound on named-type resolution steps; guards against cyclic input.
const MAX_RESOLVE_DEPTH: usize = 32;

/// Known underlying types of named types.
#[derive(Debug, Clone, Default)]
pub struct TypeUniverse {
    declared: HashMap<(String, String), TypeRef>,
}

impl TypeUniverse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `package.name` is defined as `underlying`.
    ///
    /// `underlying` may itself be a named type; it is resolved lazily.
    pub fn declare(&mut self, package: &Package, name: impl Into<String>, underlying: TypeRef) {
        self.declared
            .insert((package.path.clone(), name.into()), underlying);
    }

    /// The underlying type of `ty`.
    ///
    /// Undeclared named types and instantiated generics are their own
    /// underlying type.
    pub fn underlying(&self, ty: &TypeRef) -> TypeRef {
        let mut current = ty.clone();
        for _ in 0..MAX_RESOLVE_DEPTH {
            let TypeRef::Named(NamedType {
                package,
                name,
                args,
            }) = &current
            else {
                return current;
            };
            if !args.is_empty() {
                return current;
            }
            match self.declared.get(&(package.path.clone(), name.clone())) {
                Some(next) => current = next.clone(),
                None => return current,
            }
        }
        current
    }

    fn identical_with(&self, a: &TypeRef, b: &TypeRef, ignore_tags: bool) -> bool {
        match (a, b) {
            (TypeRef::Basic(x), TypeRef::Basic(y)) => canonical_basic(x) == canonical_basic(y),
            (TypeRef::Named(x), TypeRef::Named(y)) => {
                x.package.path == y.package.path
                    && x.name == y.name
                    && x.args.len() == y.args.len()
                    && x.args
                        .iter()
                        .zip(&y.args)
                        .all(|(p, q)| self.identical_with(p, q, ignore_tags))
            }
            (TypeRef::Pointer(x), TypeRef::Pointer(y)) | (TypeRef::Slice(x), TypeRef::Slice(y)) => {
                self.identical_with(x, y, ignore_tags)
            }
            (
                TypeRef::Array { len: l1, elem: e1 },
                TypeRef::Array { len: l2, elem: e2 },
            ) => l1.trim() == l2.trim() && self.identical_with(e1, e2, ignore_tags),
            (
                TypeRef::Map { key: k1, value: v1 },
                TypeRef::Map { key: k2, value: v2 },
            ) => self.identical_with(k1, k2, ignore_tags) && self.identical_with(v1, v2, ignore_tags),
            (
                TypeRef::Chan { dir: d1, elem: e1 },
                TypeRef::Chan { dir: d2, elem: e2 },
            ) => d1 == d2 && self.identical_with(e1, e2, ignore_tags),
            (TypeRef::Struct(f1), TypeRef::Struct(f2)) => {
                f1.len() == f2.len()
                    && f1.iter().zip(f2).all(|(x, y)| {
                        x.name == y.name
                            && x.embedded == y.embedded
                            && (ignore_tags || x.tag == y.tag)
                            && self.identical_with(&x.ty, &y.ty, ignore_tags)
                    })
            }
            (TypeRef::Interface(x), TypeRef::Interface(y)) | (TypeRef::Func(x), TypeRef::Func(y)) => {
                squash_whitespace(x) == squash_whitespace(y)
            }
            _ => false,
        }
    }
}

impl TypeOracle for TypeUniverse {
    fn identical(&self, a: &TypeRef, b: &TypeRef) -> bool {
        self.identical_with(a, b, false)
    }

    fn assignable(&self, from: &TypeRef, to: &TypeRef) -> bool {
        if self.identical(from, to) {
            return true;
        }
        let (uf, ut) = (self.underlying(from), self.underlying(to));
        if (!from.is_named() || !to.is_named()) && self.identical(&uf, &ut) {
            return true;
        }
        matches!(&ut, TypeRef::Interface(body) if body.trim().is_empty())
    }

    fn convertible(&self, from: &TypeRef, to: &TypeRef) -> bool {
        if self.assignable(from, to) {
            return true;
        }
        let (uf, ut) = (self.underlying(from), self.underlying(to));
        if self.identical_with(&uf, &ut, true) {
            return true;
        }
        if let (TypeRef::Pointer(x), TypeRef::Pointer(y)) = (from, to) {
            if self.identical_with(&self.underlying(x), &self.underlying(y), true) {
                return true;
            }
        }
        let (kf, kt) = (BasicKind::of(&uf), BasicKind::of(&ut));
        match (kf, kt) {
            (Some(f), Some(t)) if f.is_numeric() && t.is_numeric() => true,
            (Some(BasicKind::Complex), Some(BasicKind::Complex)) => true,
            (Some(BasicKind::Integer), Some(BasicKind::String)) => true,
            _ => {
                (kt == Some(BasicKind::String) && is_byte_or_rune_slice(&uf))
                    || (kf == Some(BasicKind::String) && is_byte_or_rune_slice(&ut))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BasicKind {
    Integer,
    Float,
    Complex,
    String,
    Bool,
}

impl BasicKind {
    fn of(ty: &TypeRef) -> Option<Self> {
        let TypeRef::Basic(name) = ty else {
            return None;
        };
        Some(match canonical_basic(name) {
            "int" | "int8" | "int16" | "int32" | "int64" | "uint" | "uint8" | "uint16"
            | "uint32" | "uint64" | "uintptr" => BasicKind::Integer,
            "float32" | "float64" => BasicKind::Float,
            "complex64" | "complex128" => BasicKind::Complex,
            "string" => BasicKind::String,
            "bool" => BasicKind::Bool,
            _ => return None,
        })
    }

    fn is_numeric(self) -> bool {
        matches!(self, BasicKind::Integer | BasicKind::Float)
    }
}

fn canonical_basic(name: &str) -> &str {
    match name {
        "byte" => "uint8",
        "rune" => "int32",
        other => other,
    }
}

fn is_byte_or_rune_slice(ty: &TypeRef) -> bool {
    matches!(ty, TypeRef::Slice(elem)
        if matches!(elem.as_ref(), TypeRef::Basic(n) if matches!(canonical_basic(n), "uint8" | "int32")))
}

fn squash_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
