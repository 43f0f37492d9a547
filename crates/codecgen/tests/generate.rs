//! End-to-end generation from Go source.
//!
//! Run `cargo insta review` to update snapshots after intentional changes.

use codecgen::types::{Package, TypeRef};
use codecgen::{GenError, GenerateOptions, GoPackage, generate};
use std::fs;
use std::path::Path;

fn package(files: &[(&str, &str)]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("go.mod"), "module example.com/store\n\ngo 1.21\n").unwrap();
    for (name, content) in files {
        fs::write(dir.path().join(name), content).unwrap();
    }
    dir
}

fn generate_in(dir: &Path, options: &GenerateOptions) -> Result<codecgen::Generated, GenError> {
    let pkg = GoPackage::load(dir).unwrap();
    generate(&pkg, options)
}

const ITEM: &str = r#"package store

type Item struct {
	ID     string  `json:"id"`
	Label  string  `json:"label" optional:"true"`
	Weight float64 `json:"wt"`
}
"#;

#[test]
fn item_codecs() {
    let dir = package(&[("item.go", ITEM)]);
    let generated = generate_in(dir.path(), &GenerateOptions::new("Item")).unwrap();
    assert!(generated.warnings.is_empty());
    insta::assert_snapshot!("item", generated.code);
}

#[test]
fn override_routes_through_replacement_type() {
    let source = r#"package store

type specialString string

type Item struct {
	Name string `json:"name"`
	Note string `json:"note" optional:"yes"`
}

type itemOverride struct {
	Name specialString
}
"#;
    let dir = package(&[("item.go", source)]);
    let options = GenerateOptions::new("Item").with_override("itemOverride");
    let generated = generate_in(dir.path(), &options).unwrap();
    let code = &generated.code;

    assert!(code.contains("\tName *specialString `json:\"name\"`\n"));
    assert!(code.contains("\tNote *string `json:\"note\" optional:\"yes\"`\n"));
    assert!(code.contains("\t\tName: (*specialString)(&x.Name),\n"));
    assert!(code.contains("\t\tNote: &x.Note,\n"));
    assert!(code.contains("\tv.Name = (string)(*dec.Name)\n"));
    assert!(code.contains("\t\tv.Note = *dec.Note\n"));
}

#[test]
fn override_without_matching_field_fails() {
    let source = r#"package store

type Item struct {
	Name string
}

type itemOverride struct {
	Colour string
}
"#;
    let dir = package(&[("item.go", source)]);
    let options = GenerateOptions::new("Item").with_override("itemOverride");
    let err = generate_in(dir.path(), &options).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("item.go:8:2: "), "{message}");
    assert!(message.ends_with("no matching field for Colour in original type Item"));
}

#[test]
fn override_with_unconvertible_type_fails() {
    let source = r#"package store

type Item struct {
	Weight float64
}

type itemOverride struct {
	Weight []string
}
"#;
    let dir = package(&[("item.go", source)]);
    let options = GenerateOptions::new("Item").with_override("itemOverride");
    let err = generate_in(dir.path(), &options).unwrap_err();
    assert!(matches!(err, GenError::NotConvertible { .. }));
    assert!(
        err.to_string()
            .ends_with("field override type []string is not convertible to float64")
    );
}

#[test]
fn explicit_import_names_are_used() {
    let source = r#"package store

import (
	"example.com/alpha/types"
	other "example.com/beta/types"
)

type Pair struct {
	Left  types.ID
	Right *other.ID
	Both  map[types.Key][]other.Key
}
"#;
    let dir = package(&[("pair.go", source)]);
    let generated = generate_in(dir.path(), &GenerateOptions::new("Pair")).unwrap();
    let code = &generated.code;

    assert!(code.contains(
        "import (\n\tjson \"encoding/json\"\n\terrors \"errors\"\n\ttypes \"example.com/alpha/types\"\n\tother \"example.com/beta/types\"\n)\n"
    ));
    assert!(code.contains("\tLeft *types.ID\n"));
    assert!(code.contains("\tRight *other.ID\n"));
    assert!(code.contains("\tBoth *map[types.Key][]other.Key\n"));
}

#[test]
fn colliding_package_names_get_distinct_aliases() {
    let item = r#"package store

import "example.com/alpha/types"

type Item struct {
	ID types.ID `json:"id"`
}
"#;
    let replacement = r#"package store

import "example.com/beta/types"

type itemOverride struct {
	ID types.ID
}
"#;
    let dir = package(&[("item.go", item), ("override.go", replacement)]);
    let mut pkg = GoPackage::load(dir.path()).unwrap();
    for path in ["example.com/alpha/types", "example.com/beta/types"] {
        pkg.declare_external(&Package::from_path(path), "ID", TypeRef::basic("string"));
    }

    let options = GenerateOptions::new("Item").with_override("itemOverride");
    let generated = generate(&pkg, &options).unwrap();
    let code = &generated.code;

    assert!(code.contains(
        "\ttypes \"example.com/beta/types\"\n\t_types \"example.com/alpha/types\"\n)\n"
    ));
    assert!(code.contains("\tID *types.ID `json:\"id\"`\n"));
    assert!(code.contains("\t\tID: (*types.ID)(&x.ID),\n"));
    assert!(code.contains("\tv.ID = (_types.ID)(*dec.ID)\n"));
}

#[test]
fn excluded_fields_never_appear() {
    let source = r#"package store

import "sync"

type Item struct {
	sync.Mutex
	*Base
	ID    string
	cache map[string]int
}

type Base struct {
	Created int64
}
"#;
    let dir = package(&[("item.go", source)]);
    let generated = generate_in(dir.path(), &GenerateOptions::new("Item")).unwrap();

    let warnings: Vec<String> = generated.warnings.iter().map(|w| w.to_string()).collect();
    assert_eq!(warnings.len(), 2);
    assert!(warnings[0].ends_with("item.go:6:2: (Item.Mutex) Warning: ignoring embedded field"));
    assert!(warnings[1].ends_with("(Item.Base) Warning: ignoring embedded field"));

    let code = &generated.code;
    for excluded in ["Mutex", "Base", "cache", "sync"] {
        assert!(!code.contains(excluded), "{excluded} leaked into output");
    }
    assert!(code.contains("type ItemJSON struct {\n\tID *string\n}\n"));
}

#[test]
fn required_message_uses_format_specific_names() {
    let source = r#"package store

type Item struct {
	Weight float64 `json:"wt" yaml:"weight_kg"`
	Skip   string  `json:"-" yaml:"skip"`
}
"#;
    let dir = package(&[("item.go", source)]);
    let generated = generate_in(dir.path(), &GenerateOptions::new("Item")).unwrap();
    let code = &generated.code;

    assert!(code.contains("missing required field 'wt' in JSON Item"));
    assert!(code.contains("missing required field 'weight_kg' in YAML Item"));
    assert!(code.contains("missing required field 'skip' in YAML Item"));
    assert!(!code.contains("missing required field 'skip' in JSON Item"));
}

#[test]
fn unknown_record_is_reported() {
    let dir = package(&[("item.go", ITEM)]);
    let err = generate_in(dir.path(), &GenerateOptions::new("Missing")).unwrap_err();
    assert_eq!(err.to_string(), "can't find Missing: no such identifier");
}

#[test]
fn function_typed_fields_are_rejected() {
    let source = r#"package store

type Hooks struct {
	OnSave func(id string) error
}
"#;
    let dir = package(&[("hooks.go", source)]);
    let err = generate_in(dir.path(), &GenerateOptions::new("Hooks")).unwrap_err();
    assert_eq!(err.to_string(), "can't walk func(id string) error");
}
