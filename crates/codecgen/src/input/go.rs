//! Go package loader.
//!
//! Parses every non-test `.go` file of a directory with tree-sitter and
//! records the package's type declarations. Only declarations are read;
//! function bodies are ignored.

use super::go_mod;
use crate::compat::{TypeOracle, TypeUniverse};
use crate::record::{FieldDescriptor, Position, Record};
use crate::tags::unquote;
use crate::traits::{LookupError, TypeProvider};
use crate::types::{ChanDir, NamedType, PREDECLARED, Package, StructField, TypeRef};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use tree_sitter::{Node, Parser, Tree};

/// Upper bound on chained alias and defined-type declarations
/// (`type A = B`, `type A B`).
const MAX_ALIAS_DEPTH: usize = 32;

/// Error loading a Go package.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("tree-sitter init: {0}")]
    Parser(String),

    #[error("{0}: syntax error")]
    Syntax(Position),

    #[error("no Go package found in {0}")]
    NoPackage(PathBuf),

    #[error("multiple packages in {dir}: {names}")]
    MultiplePackages { dir: PathBuf, names: String },
}

#[derive(Debug, Clone)]
enum Declaration {
    Struct {
        fields: Vec<FieldDescriptor>,
        position: Position,
    },
    /// Any other defined type, with its underlying type.
    Type(TypeRef),
    Alias(TypeRef),
    /// A function, variable or constant.
    Value,
}

/// A Go package loaded from source.
#[derive(Debug, Clone)]
pub struct GoPackage {
    package: Package,
    decls: HashMap<String, Declaration>,
    universe: TypeUniverse,
}

struct SourceFile {
    path: PathBuf,
    source: String,
    tree: Tree,
}

impl GoPackage {
    /// Load the package in `dir`.
    ///
    /// `_test.go` files and files constrained by `//go:build ignore` are
    /// skipped. The import path comes from the enclosing go.mod, or is the
    /// package name when there is none.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, LoadError> {
        Self::load_excluding(dir, None)
    }

    /// Like [`GoPackage::load`], but never reads `excluded`.
    ///
    /// Used to keep a previously generated output file, possibly stale or
    /// truncated, out of the package being generated for.
    pub fn load_excluding(
        dir: impl AsRef<Path>,
        excluded: Option<&Path>,
    ) -> Result<Self, LoadError> {
        let dir = dir.as_ref();
        let mut parser = Parser::new();
        parser
            .set_language(&arborium_go::language().into())
            .map_err(|e| LoadError::Parser(e.to_string()))?;

        let mut files = Vec::new();
        for (path, source) in read_sources(dir, excluded)? {
            let tree = parser
                .parse(&source, None)
                .ok_or_else(|| LoadError::Parser(format!("failed to parse {}", path.display())))?;
            if let Some(node) = first_error(tree.root_node()) {
                return Err(LoadError::Syntax(position_of(&path, node)));
            }
            files.push(SourceFile { path, source, tree });
        }

        let names: BTreeSet<String> = files
            .iter()
            .filter_map(|f| package_name(&f.source, &f.tree))
            .collect();
        let name = match names.len() {
            0 => return Err(LoadError::NoPackage(dir.to_path_buf())),
            1 => names.into_iter().next().unwrap_or_default(),
            _ => {
                return Err(LoadError::MultiplePackages {
                    dir: dir.to_path_buf(),
                    names: names.into_iter().collect::<Vec<_>>().join(", "),
                });
            }
        };
        let path = go_mod::import_path_for(dir).unwrap_or_else(|| name.clone());
        let package = Package::new(name, path);

        let mut decls = HashMap::new();
        for file in &files {
            let ctx = FileContext::new(file, &package);
            ctx.read_decls(file.tree.root_node(), &mut decls);
        }
        expand_aliases(&package, &mut decls);

        let mut universe = TypeUniverse::new();
        for (name, decl) in &decls {
            match decl {
                Declaration::Struct { fields, .. } => {
                    universe.declare(&package, name.clone(), struct_type(fields))
                }
                Declaration::Type(underlying) => {
                    universe.declare(&package, name.clone(), underlying.clone())
                }
                Declaration::Alias(_) | Declaration::Value => {}
            }
        }

        tracing::debug!(
            dir = %dir.display(),
            package = %package.path,
            files = files.len(),
            decls = decls.len(),
            "loaded Go package"
        );
        Ok(Self {
            package,
            decls,
            universe,
        })
    }

    /// Declare the underlying type of a named type from another package.
    pub fn declare_external(&mut self, package: &Package, name: &str, underlying: TypeRef) {
        self.universe.declare(package, name, underlying);
    }

    fn lookup(&self, name: &str, depth: usize) -> Result<Record, LookupError> {
        match self.decls.get(name) {
            None => Err(LookupError::NotFound),
            Some(Declaration::Value) => Err(LookupError::NotAType),
            Some(Declaration::Struct { fields, position }) => Ok(Record {
                name: name.to_string(),
                package: self.package.clone(),
                fields: fields.clone(),
                position: Some(position.clone()),
            }),
            Some(
                Declaration::Alias(TypeRef::Named(target))
                | Declaration::Type(TypeRef::Named(target)),
            ) if target.package == self.package
                && target.args.is_empty()
                && depth < MAX_ALIAS_DEPTH =>
            {
                let mut record = self.lookup(&target.name, depth + 1)?;
                record.name = name.to_string();
                Ok(record)
            }
            Some(Declaration::Alias(_) | Declaration::Type(_)) => Err(LookupError::NotAStruct),
        }
    }
}

impl TypeProvider for GoPackage {
    fn package(&self) -> &Package {
        &self.package
    }

    fn lookup_record(&self, name: &str) -> Result<Record, LookupError> {
        self.lookup(name, 0)
    }

    fn oracle(&self) -> &dyn TypeOracle {
        &self.universe
    }
}

fn read_sources(
    dir: &Path,
    excluded: Option<&Path>,
) -> Result<Vec<(PathBuf, String)>, LoadError> {
    let excluded = excluded.and_then(|p| p.canonicalize().ok());
    let io_error = |source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !name.ends_with(".go") || name.ends_with("_test.go") || !path.is_file() {
            continue;
        }
        if excluded.is_some() && path.canonicalize().ok() == excluded {
            tracing::debug!(file = %path.display(), "skipping output file");
            continue;
        }
        paths.push(path);
    }
    paths.sort();

    let mut sources = Vec::with_capacity(paths.len());
    for path in paths {
        let source = std::fs::read_to_string(&path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;
        if is_ignored(&source) {
            tracing::debug!(file = %path.display(), "skipping ignored file");
            continue;
        }
        sources.push((path, source));
    }
    Ok(sources)
}

/// Whether the file carries a `//go:build ignore` or `// +build ignore`
/// constraint.
fn is_ignored(source: &str) -> bool {
    for line in source.lines() {
        let line = line.trim();
        if line.starts_with("package ") {
            break;
        }
        if let Some(expr) = line.strip_prefix("//go:build") {
            return expr.trim() == "ignore";
        }
        let legacy = line.strip_prefix("// +build");
        if legacy.is_some_and(|expr| expr.split_whitespace().any(|term| term == "ignore")) {
            return true;
        }
    }
    false
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = first_error(child) {
            return Some(found);
        }
    }
    Some(node)
}

fn position_of(path: &Path, node: Node) -> Position {
    let point = node.start_position();
    Position {
        file: path.display().to_string(),
        line: point.row + 1,
        column: point.column + 1,
    }
}

fn package_name(source: &str, tree: &Tree) -> Option<String> {
    let root = tree.root_node();
    let mut cursor = root.walk();
    let clause = root
        .children(&mut cursor)
        .find(|c| c.kind() == "package_clause")?;
    let name = clause.named_child(0)?;
    name.utf8_text(source.as_bytes()).ok().map(str::to_string)
}

fn struct_type(fields: &[FieldDescriptor]) -> TypeRef {
    TypeRef::Struct(
        fields
            .iter()
            .map(|f| StructField {
                name: f.name.clone(),
                ty: f.ty.clone(),
                tag: f.tag.clone(),
                embedded: f.embedded,
            })
            .collect(),
    )
}

/// Replace references to local aliases with their targets.
fn expand_aliases(package: &Package, decls: &mut HashMap<String, Declaration>) {
    let aliases: HashMap<String, TypeRef> = decls
        .iter()
        .filter_map(|(name, decl)| match decl {
            Declaration::Alias(target) => Some((name.clone(), target.clone())),
            _ => None,
        })
        .collect();
    if aliases.is_empty() {
        return;
    }
    let expander = AliasExpander {
        package,
        aliases: &aliases,
    };
    for decl in decls.values_mut() {
        match decl {
            Declaration::Struct { fields, .. } => {
                for field in fields {
                    field.ty = expander.expand(&field.ty, 0);
                }
            }
            Declaration::Type(ty) | Declaration::Alias(ty) => *ty = expander.expand(ty, 0),
            Declaration::Value => {}
        }
    }
}

struct AliasExpander<'a> {
    package: &'a Package,
    aliases: &'a HashMap<String, TypeRef>,
}

impl AliasExpander<'_> {
    fn expand(&self, ty: &TypeRef, depth: usize) -> TypeRef {
        match ty {
            TypeRef::Named(named) if named.package == *self.package && named.args.is_empty() => {
                match self.aliases.get(&named.name) {
                    Some(target) if depth < MAX_ALIAS_DEPTH => self.expand(target, depth + 1),
                    _ => ty.clone(),
                }
            }
            TypeRef::Named(named) => TypeRef::Named(NamedType {
                args: named.args.iter().map(|a| self.expand(a, depth)).collect(),
                ..named.clone()
            }),
            TypeRef::Pointer(elem) => TypeRef::pointer(self.expand(elem, depth)),
            TypeRef::Slice(elem) => TypeRef::slice(self.expand(elem, depth)),
            TypeRef::Array { len, elem } => TypeRef::Array {
                len: len.clone(),
                elem: Box::new(self.expand(elem, depth)),
            },
            TypeRef::Map { key, value } => {
                TypeRef::map(self.expand(key, depth), self.expand(value, depth))
            }
            TypeRef::Chan { dir, elem } => TypeRef::Chan {
                dir: *dir,
                elem: Box::new(self.expand(elem, depth)),
            },
            TypeRef::Struct(fields) => TypeRef::Struct(
                fields
                    .iter()
                    .map(|f| StructField {
                        ty: self.expand(&f.ty, depth),
                        ..f.clone()
                    })
                    .collect(),
            ),
            TypeRef::Basic(_) | TypeRef::Interface(_) | TypeRef::Func(_) => ty.clone(),
        }
    }
}

/// Per-file state: the source text and the file's import names.
struct FileContext<'a> {
    path: &'a Path,
    source: &'a str,
    package: &'a Package,
    imports: HashMap<String, Package>,
}

impl<'a> FileContext<'a> {
    fn new(file: &'a SourceFile, package: &'a Package) -> Self {
        let mut ctx = Self {
            path: &file.path,
            source: &file.source,
            package,
            imports: HashMap::new(),
        };
        ctx.read_imports(file.tree.root_node());
        ctx
    }

    fn node_text(&self, node: Node) -> &str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    fn position(&self, node: Node) -> Position {
        position_of(self.path, node)
    }

    fn read_imports(&mut self, root: Node) {
        let mut cursor = root.walk();
        for decl in root.children(&mut cursor) {
            if decl.kind() == "import_declaration" {
                self.read_import_specs(decl);
            }
        }
    }

    fn read_import_specs(&mut self, node: Node) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "import_spec" => self.read_import_spec(child),
                "import_spec_list" => self.read_import_specs(child),
                _ => {}
            }
        }
    }

    fn read_import_spec(&mut self, spec: Node) {
        let Some(path) = spec
            .child_by_field_name("path")
            .and_then(|p| unquote(self.node_text(p)))
        else {
            return;
        };
        match spec.child_by_field_name("name") {
            Some(name) if name.kind() == "package_identifier" => {
                let name = self.node_text(name).to_string();
                self.imports
                    .insert(name.clone(), Package::new(name, path));
            }
            // Dot and blank imports bind no package name.
            Some(_) => {}
            None => {
                let package = Package::from_path(path);
                self.imports.insert(package.name.clone(), package);
            }
        }
    }

    fn read_decls(&self, root: Node, decls: &mut HashMap<String, Declaration>) {
        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            match child.kind() {
                "type_declaration" => {
                    let mut specs = child.walk();
                    for spec in child.named_children(&mut specs) {
                        self.read_type_spec(spec, decls);
                    }
                }
                "function_declaration" => {
                    if let Some(name) = child.child_by_field_name("name") {
                        decls.insert(self.node_text(name).to_string(), Declaration::Value);
                    }
                }
                "var_declaration" | "const_declaration" => self.read_value_specs(child, decls),
                _ => {}
            }
        }
    }

    fn read_type_spec(&self, spec: Node, decls: &mut HashMap<String, Declaration>) {
        let (Some(name), Some(ty)) = (
            spec.child_by_field_name("name"),
            spec.child_by_field_name("type"),
        ) else {
            return;
        };
        let decl = match spec.kind() {
            "type_alias" => Declaration::Alias(self.resolve_type(ty)),
            "type_spec" if ty.kind() == "struct_type" => Declaration::Struct {
                fields: self.read_struct_fields(ty),
                position: self.position(name),
            },
            "type_spec" => Declaration::Type(self.resolve_type(ty)),
            _ => return,
        };
        decls.insert(self.node_text(name).to_string(), decl);
    }

    fn read_value_specs(&self, node: Node, decls: &mut HashMap<String, Declaration>) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "var_spec" | "const_spec" => {
                    let mut names = child.walk();
                    for name in child.children_by_field_name("name", &mut names) {
                        decls.insert(self.node_text(name).to_string(), Declaration::Value);
                    }
                }
                "var_spec_list" | "const_spec_list" => self.read_value_specs(child, decls),
                _ => {}
            }
        }
    }

    /// Fields of a `struct_type` node, in declaration order.
    fn read_struct_fields(&self, node: Node) -> Vec<FieldDescriptor> {
        let mut fields = Vec::new();
        let mut cursor = node.walk();
        let Some(list) = node
            .named_children(&mut cursor)
            .find(|c| c.kind() == "field_declaration_list")
        else {
            return fields;
        };

        let mut cursor = list.walk();
        for decl in list.named_children(&mut cursor) {
            if decl.kind() != "field_declaration" {
                continue;
            }
            let tag = decl
                .child_by_field_name("tag")
                .and_then(|t| unquote(self.node_text(t)))
                .unwrap_or_default();
            let ty = self.child_type(decl, "type");

            let mut names_cursor = decl.walk();
            let names: Vec<Node> = decl
                .children_by_field_name("name", &mut names_cursor)
                .collect();
            if names.is_empty() {
                let mut tokens = decl.walk();
                let pointer = decl.children(&mut tokens).any(|c| c.kind() == "*");
                let ty = if pointer { TypeRef::pointer(ty) } else { ty };
                fields.push(
                    FieldDescriptor::embedded(ty)
                        .with_tag(tag)
                        .at(self.position(decl)),
                );
            } else {
                for name in names {
                    fields.push(
                        FieldDescriptor::new(self.node_text(name), ty.clone())
                            .with_tag(&tag)
                            .at(self.position(name)),
                    );
                }
            }
        }
        fields
    }

    fn child_type(&self, node: Node, field: &str) -> TypeRef {
        match node.child_by_field_name(field) {
            Some(child) => self.resolve_type(child),
            None => TypeRef::Basic(self.node_text(node).to_string()),
        }
    }

    fn first_named_type(&self, node: Node) -> TypeRef {
        match node.named_child(0) {
            Some(child) => self.resolve_type(child),
            None => TypeRef::Basic(self.node_text(node).to_string()),
        }
    }

    /// Convert a type expression, resolving package names through the
    /// file's imports.
    fn resolve_type(&self, node: Node) -> TypeRef {
        match node.kind() {
            "type_identifier" => self.identifier_type(self.node_text(node)),
            "qualified_type" => {
                let package = node
                    .child_by_field_name("package")
                    .map(|p| self.node_text(p))
                    .unwrap_or_default();
                let name = node
                    .child_by_field_name("name")
                    .map(|n| self.node_text(n))
                    .unwrap_or_default();
                TypeRef::named(&self.imported(package), name)
            }
            "generic_type" => {
                let base = self.child_type(node, "type");
                let mut args = Vec::new();
                if let Some(list) = node.child_by_field_name("type_arguments") {
                    let mut cursor = list.walk();
                    for arg in list.named_children(&mut cursor) {
                        args.push(if arg.kind() == "type_elem" {
                            self.first_named_type(arg)
                        } else {
                            self.resolve_type(arg)
                        });
                    }
                }
                match base {
                    TypeRef::Named(named) => TypeRef::Named(NamedType { args, ..named }),
                    other => other,
                }
            }
            "pointer_type" => TypeRef::pointer(self.first_named_type(node)),
            "slice_type" => TypeRef::slice(self.child_type(node, "element")),
            "array_type" => TypeRef::Array {
                len: node
                    .child_by_field_name("length")
                    .map(|l| self.node_text(l).to_string())
                    .unwrap_or_default(),
                elem: Box::new(self.child_type(node, "element")),
            },
            "map_type" => TypeRef::map(self.child_type(node, "key"), self.child_type(node, "value")),
            "channel_type" => TypeRef::Chan {
                dir: self.channel_dir(node),
                elem: Box::new(self.child_type(node, "value")),
            },
            "struct_type" => struct_type(&self.read_struct_fields(node)),
            "interface_type" => {
                let text = self.node_text(node);
                let body = text
                    .strip_prefix("interface")
                    .map(str::trim)
                    .and_then(|b| b.strip_prefix('{'))
                    .and_then(|b| b.strip_suffix('}'))
                    .unwrap_or_default();
                TypeRef::Interface(body.trim().to_string())
            }
            "function_type" => TypeRef::Func(self.node_text(node).to_string()),
            "parenthesized_type" => self.first_named_type(node),
            _ => TypeRef::Basic(self.node_text(node).to_string()),
        }
    }

    fn identifier_type(&self, name: &str) -> TypeRef {
        if name == "any" {
            TypeRef::any()
        } else if PREDECLARED.contains(&name) {
            TypeRef::basic(name)
        } else {
            TypeRef::named(self.package, name)
        }
    }

    fn imported(&self, name: &str) -> Package {
        self.imports
            .get(name)
            .cloned()
            .unwrap_or_else(|| Package::new(name, name))
    }

    fn channel_dir(&self, node: Node) -> ChanDir {
        let mut cursor = node.walk();
        let tokens: Vec<&str> = node
            .children(&mut cursor)
            .filter(|c| !c.is_named())
            .map(|c| c.kind())
            .collect();
        match tokens.as_slice() {
            ["<-", "chan", ..] => ChanDir::Recv,
            ["chan", "<-", ..] => ChanDir::Send,
            _ => ChanDir::Both,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    fn store_package() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "go.mod", "module example.com/shop\n\ngo 1.21\n");
        write(
            dir.path(),
            "item.go",
            r#"package shop

import (
	"sync"
	"time"

	hex "example.com/common/hexutil"
)

type specialString string

type Label = string

// Item is a stored item.
type Item struct {
	sync.Mutex
	ID     string  `json:"id"`
	Label  Label   `json:"label" optional:"true"`
	Weight float64 `json:"wt"`
	A, B   int
	Hash   *hex.Big
	Seen   map[string]time.Time
	Tags   []specialString
	secret string
}

type Alias = Item

type Count int

type Other Item

type Stamp time.Time

func NewItem() *Item { return &Item{} }

var DefaultItem = Item{}

const (
	MaxItems = 10
	MinItems = 1
)
"#,
        );
        dir
    }

    #[test]
    fn loads_struct_fields() {
        let dir = store_package();
        let pkg = GoPackage::load(dir.path()).unwrap();
        assert_eq!(pkg.package().name, "shop");
        assert_eq!(pkg.package().path, "example.com/shop");

        let item = pkg.lookup_record("Item").unwrap();
        let names: Vec<_> = item.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            ["Mutex", "ID", "Label", "Weight", "A", "B", "Hash", "Seen", "Tags", "secret"]
        );

        assert!(item.fields[0].embedded);
        assert_eq!(item.fields[1].tag, r#"json:"id""#);
        assert_eq!(item.fields[2].ty, TypeRef::basic("string"));
        assert_eq!(item.fields[5].ty, TypeRef::basic("int"));
        assert!(!item.fields[9].exported);

        let hex = Package::new("hex", "example.com/common/hexutil");
        assert_eq!(
            item.fields[6].ty,
            TypeRef::pointer(TypeRef::named(&hex, "Big"))
        );
        assert_eq!(
            item.fields[7].ty.to_string_in(pkg.package()),
            "map[string]time.Time"
        );

        let position = item.fields[1].position.as_ref().unwrap();
        assert!(position.file.ends_with("item.go"));
        assert_eq!((position.line, position.column), (17, 2));
    }

    #[test]
    fn lookup_failures() {
        let dir = store_package();
        let pkg = GoPackage::load(dir.path()).unwrap();
        assert_eq!(pkg.lookup_record("Missing"), Err(LookupError::NotFound));
        assert_eq!(pkg.lookup_record("NewItem"), Err(LookupError::NotAType));
        assert_eq!(pkg.lookup_record("DefaultItem"), Err(LookupError::NotAType));
        assert_eq!(pkg.lookup_record("MaxItems"), Err(LookupError::NotAType));
        assert_eq!(pkg.lookup_record("Count"), Err(LookupError::NotAStruct));
        assert_eq!(pkg.lookup_record("Label"), Err(LookupError::NotAStruct));
        assert_eq!(pkg.lookup_record("Stamp"), Err(LookupError::NotAStruct));
    }

    #[test]
    fn aliases_are_followed() {
        let dir = store_package();
        let pkg = GoPackage::load(dir.path()).unwrap();
        let alias = pkg.lookup_record("Alias").unwrap();
        assert_eq!(alias.name, "Alias");
        assert_eq!(alias.fields.len(), 10);
    }

    #[test]
    fn defined_types_over_local_structs_are_records() {
        let dir = store_package();
        let pkg = GoPackage::load(dir.path()).unwrap();
        let other = pkg.lookup_record("Other").unwrap();
        assert_eq!(other.name, "Other");
        assert_eq!(other.fields.len(), 10);
        assert_eq!(other.fields[1].name, "ID");

        let generated =
            crate::generate(&pkg, &crate::GenerateOptions::new("Other")).unwrap();
        assert!(generated.code.contains("type OtherJSON struct {"));
        assert!(generated.code.contains("func (x *Other) UnmarshalJSON(input []byte) error {"));
    }

    #[test]
    fn local_types_feed_the_oracle() {
        let dir = store_package();
        let pkg = GoPackage::load(dir.path()).unwrap();
        let special = TypeRef::named(pkg.package(), "specialString");
        let string = TypeRef::basic("string");
        assert!(pkg.oracle().convertible(&special, &string));
        assert!(!pkg.oracle().assignable(&special, &string));
    }

    #[test]
    fn skips_tests_and_ignored_files() {
        let dir = store_package();
        write(dir.path(), "item_test.go", "package shop_test\n");
        write(
            dir.path(),
            "gen.go",
            "//go:build ignore\n\npackage main\n\nfunc main() {}\n",
        );
        write(
            dir.path(),
            "legacy.go",
            "// +build ignore\n\npackage main\n\nfunc main() {}\n",
        );
        let pkg = GoPackage::load(dir.path()).unwrap();
        assert_eq!(pkg.package().name, "shop");
    }

    #[test]
    fn excluded_file_is_not_parsed() {
        let dir = store_package();
        let out = dir.path().join("item_codec.go");
        write(dir.path(), "item_codec.go", "stale\n");
        assert!(matches!(
            GoPackage::load(dir.path()),
            Err(LoadError::Syntax(_))
        ));

        let pkg = GoPackage::load_excluding(dir.path(), Some(&out)).unwrap();
        assert!(pkg.lookup_record("Item").is_ok());

        let missing = dir.path().join("not_yet_written.go");
        assert!(GoPackage::load_excluding(dir.path(), Some(&missing)).is_ok());
    }

    #[test]
    fn reports_package_problems() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            GoPackage::load(dir.path()),
            Err(LoadError::NoPackage(_))
        ));

        write(dir.path(), "a.go", "package a\n");
        write(dir.path(), "b.go", "package b\n");
        let err = GoPackage::load(dir.path()).unwrap_err();
        assert!(err.to_string().ends_with(": a, b"), "{err}");
    }

    #[test]
    fn reports_syntax_errors_with_position() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "bad.go", "package bad\n\ntype Item struct {\n\tID string =\n}\n");
        match GoPackage::load(dir.path()) {
            Err(LoadError::Syntax(position)) => {
                assert!(position.file.ends_with("bad.go"));
                assert!(position.line >= 3);
            }
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn falls_back_to_package_name_without_go_mod() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "p.go", "package loose\n\ntype T struct{ N int }\n");
        let pkg = GoPackage::load(dir.path()).unwrap();
        assert_eq!(pkg.package().path, "loose");
        assert_eq!(pkg.lookup_record("T").unwrap().fields.len(), 1);
    }
}
