//! Go type model.
//!
//! A [`TypeRef`] is a structural description of a Go type as it appears in a
//! field declaration. It carries no semantic information beyond its shape;
//! questions such as "is this convertible to that" are answered by a
//! [`TypeOracle`](crate::compat::TypeOracle).

use serde::{Deserialize, Serialize};
use std::fmt;

/// A Go package, identified by its import path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Package {
    /// Package name as written in its package clause (e.g. `big`).
    pub name: String,
    /// Import path (e.g. `math/big`).
    pub path: String,
}

impl Package {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Package for an import path whose name is derived from the path.
    pub fn from_path(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            name: default_package_name(&path),
            path,
        }
    }
}

/// Guess the package name for an import path.
///
/// Go does not require the package name to match the last path element, so
/// this is a heuristic: major version elements (`/v2`) and gopkg.in version
/// suffixes (`yaml.v3`) are dropped, `go-` prefixes and `-go` suffixes are
/// stripped and any remaining non-identifier characters become `_`.
pub fn default_package_name(path: &str) -> String {
    let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.len() > 1 && is_major_version(segments[segments.len() - 1]) {
        segments.pop();
    }
    let mut last = segments.last().copied().unwrap_or(path);
    if let Some(dot) = last.rfind(".v") {
        if is_major_version(&last[dot + 1..]) {
            last = &last[..dot];
        }
    }
    let last = last.strip_prefix("go-").unwrap_or(last);
    let last = last.strip_suffix("-go").unwrap_or(last);
    let name: String = last
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if name.is_empty() { "_".to_string() } else { name }
}

fn is_major_version(s: &str) -> bool {
    s.strip_prefix('v')
        .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
}

/// A named (defined) type such as `big.Int` or a local `Item`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamedType {
    pub package: Package,
    pub name: String,
    /// Type arguments of an instantiated generic type.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<TypeRef>,
}

/// Direction of a channel type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

/// A field of an anonymous struct type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StructField {
    pub name: String,
    pub ty: TypeRef,
    pub tag: String,
    pub embedded: bool,
}

/// A Go type expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeRef {
    /// A predeclared type: `int`, `string`, `error`, ...
    Basic(String),
    Named(NamedType),
    Pointer(Box<TypeRef>),
    Slice(Box<TypeRef>),
    Array { len: String, elem: Box<TypeRef> },
    Map { key: Box<TypeRef>, value: Box<TypeRef> },
    Chan { dir: ChanDir, elem: Box<TypeRef> },
    Struct(Vec<StructField>),
    /// Interface type; holds the method set source text, empty for `interface{}`.
    Interface(String),
    /// Function type; holds the full source text of the signature.
    Func(String),
}

/// Predeclared Go type names.
pub const PREDECLARED: &[&str] = &[
    "bool", "string", "int", "int8", "int16", "int32", "int64", "uint", "uint8", "uint16",
    "uint32", "uint64", "uintptr", "float32", "float64", "complex64", "complex128", "byte",
    "rune", "error",
];

impl TypeRef {
    pub fn basic(name: impl Into<String>) -> Self {
        TypeRef::Basic(name.into())
    }

    pub fn named(package: &Package, name: impl Into<String>) -> Self {
        TypeRef::Named(NamedType {
            package: package.clone(),
            name: name.into(),
            args: Vec::new(),
        })
    }

    pub fn pointer(elem: TypeRef) -> Self {
        TypeRef::Pointer(Box::new(elem))
    }

    pub fn slice(elem: TypeRef) -> Self {
        TypeRef::Slice(Box::new(elem))
    }

    pub fn map(key: TypeRef, value: TypeRef) -> Self {
        TypeRef::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// The empty interface, `interface{}`.
    pub fn any() -> Self {
        TypeRef::Interface(String::new())
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, TypeRef::Pointer(_))
    }

    /// Element type of a pointer, or `None` for any other type.
    pub fn elem(&self) -> Option<&TypeRef> {
        match self {
            TypeRef::Pointer(elem) => Some(elem),
            _ => None,
        }
    }

    /// Wrap in a pointer unless the type already is one.
    pub fn ensure_pointer(&self) -> TypeRef {
        if self.is_pointer() {
            self.clone()
        } else {
            TypeRef::pointer(self.clone())
        }
    }

    /// Whether this is a defined type in Go's sense (predeclared or named).
    pub fn is_named(&self) -> bool {
        matches!(self, TypeRef::Basic(_) | TypeRef::Named(_))
    }

    /// Render the type, asking `qualifier` how to prefix each package.
    ///
    /// The qualifier returns `None` for packages whose members are referenced
    /// unqualified.
    pub fn display<'a, Q>(&'a self, qualifier: &'a Q) -> impl fmt::Display + 'a
    where
        Q: Qualifier + ?Sized,
    {
        TypeDisplay {
            ty: self,
            qualifier,
        }
    }

    /// Render using plain package names for every package except `local`.
    pub fn to_string_in(&self, local: &Package) -> String {
        self.display(&LocalQualifier(local)).to_string()
    }
}

/// Decides the prefix used when printing a package's types.
pub trait Qualifier {
    fn qualify(&self, package: &Package) -> Option<String>;
}

/// Leaves one package unqualified and uses package names for the rest.
pub struct LocalQualifier<'a>(pub &'a Package);

impl Qualifier for LocalQualifier<'_> {
    fn qualify(&self, package: &Package) -> Option<String> {
        if package.path == self.0.path {
            None
        } else {
            Some(package.name.clone())
        }
    }
}

struct TypeDisplay<'a, Q: ?Sized> {
    ty: &'a TypeRef,
    qualifier: &'a Q,
}

impl<Q: Qualifier + ?Sized> TypeDisplay<'_, Q> {
    fn nested<'b>(&'b self, ty: &'b TypeRef) -> TypeDisplay<'b, Q> {
        TypeDisplay {
            ty,
            qualifier: self.qualifier,
        }
    }
}

impl<Q: Qualifier + ?Sized> fmt::Display for TypeDisplay<'_, Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ty {
            TypeRef::Basic(name) => f.write_str(name),
            TypeRef::Named(named) => {
                if let Some(prefix) = self.qualifier.qualify(&named.package) {
                    write!(f, "{}.", prefix)?;
                }
                f.write_str(&named.name)?;
                if !named.args.is_empty() {
                    f.write_str("[")?;
                    for (i, arg) in named.args.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{}", self.nested(arg))?;
                    }
                    f.write_str("]")?;
                }
                Ok(())
            }
            TypeRef::Pointer(elem) => write!(f, "*{}", self.nested(elem)),
            TypeRef::Slice(elem) => write!(f, "[]{}", self.nested(elem)),
            TypeRef::Array { len, elem } => write!(f, "[{}]{}", len, self.nested(elem)),
            TypeRef::Map { key, value } => {
                write!(f, "map[{}]{}", self.nested(key), self.nested(value))
            }
            TypeRef::Chan { dir, elem } => {
                let prefix = match dir {
                    ChanDir::Both => "chan ",
                    ChanDir::Send => "chan<- ",
                    ChanDir::Recv => "<-chan ",
                };
                // `chan (<-chan T)` needs parentheses to bind correctly.
                if *dir != ChanDir::Send
                    && matches!(elem.as_ref(), TypeRef::Chan { dir: ChanDir::Recv, .. })
                {
                    write!(f, "{}({})", prefix, self.nested(elem))
                } else {
                    write!(f, "{}{}", prefix, self.nested(elem))
                }
            }
            TypeRef::Struct(fields) => {
                f.write_str("struct{")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    if !field.embedded {
                        write!(f, "{} ", field.name)?;
                    }
                    write!(f, "{}", self.nested(&field.ty))?;
                    if !field.tag.is_empty() {
                        write!(f, " {}", crate::tags::quote_tag(&field.tag))?;
                    }
                }
                f.write_str("}")
            }
            TypeRef::Interface(body) => write!(f, "interface{{{}}}", body.trim()),
            TypeRef::Func(signature) => f.write_str(signature),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_name_heuristics() {
        assert_eq!(default_package_name("math/big"), "big");
        assert_eq!(default_package_name("gopkg.in/yaml.v3"), "yaml");
        assert_eq!(default_package_name("github.com/jackc/pgx/v5"), "pgx");
        assert_eq!(default_package_name("github.com/mattn/go-sqlite3"), "sqlite3");
        assert_eq!(default_package_name("github.com/x/sql-go"), "sql");
        assert_eq!(default_package_name("encoding/json"), "json");
    }

    #[test]
    fn display_with_qualifier() {
        let local = Package::new("store", "example.com/store");
        let big = Package::from_path("math/big");
        let ty = TypeRef::map(
            TypeRef::basic("string"),
            TypeRef::slice(TypeRef::pointer(TypeRef::named(&big, "Int"))),
        );
        assert_eq!(ty.to_string_in(&local), "map[string][]*big.Int");

        let item = TypeRef::pointer(TypeRef::named(&local, "Item"));
        assert_eq!(item.to_string_in(&local), "*Item");
    }

    #[test]
    fn display_channels_and_structs() {
        let local = Package::new("p", "p");
        let nested = TypeRef::Chan {
            dir: ChanDir::Both,
            elem: Box::new(TypeRef::Chan {
                dir: ChanDir::Recv,
                elem: Box::new(TypeRef::basic("int")),
            }),
        };
        assert_eq!(nested.to_string_in(&local), "chan (<-chan int)");

        let anon = TypeRef::Struct(vec![StructField {
            name: "A".into(),
            ty: TypeRef::basic("int"),
            tag: r#"json:"a""#.into(),
            embedded: false,
        }]);
        assert_eq!(anon.to_string_in(&local), "struct{A int `json:\"a\"`}");
    }

    #[test]
    fn ensure_pointer_is_idempotent() {
        let ty = TypeRef::basic("string");
        let once = ty.ensure_pointer();
        assert_eq!(once, TypeRef::pointer(ty.clone()));
        assert_eq!(once.ensure_pointer(), once);
        assert_eq!(once.elem(), Some(&ty));
    }
}
