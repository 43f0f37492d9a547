//! Assembles the wire type declaration and the four codec methods.

use crate::compat::TypeOracle;
use crate::fragment::{
    Decl, DeclField, Expr, File, FuncDecl, GoWriter, Import, Param, Stmt, StructDecl,
};
use crate::imports::{AliasTable, ERRORS_PACKAGE, JSON_PACKAGE};
use crate::required::{DecodeNames, Format, any_required, decode_field};
use crate::types::TypeRef;
use crate::wire::WireRecord;

/// First line of every generated file.
pub const HEADER: &str = "Code generated by codecgen. DO NOT EDIT.";

/// Renders a wire record into Go source.
pub struct Renderer<'a> {
    wire: &'a WireRecord,
    table: &'a AliasTable,
    oracle: &'a dyn TypeOracle,
}

impl<'a> Renderer<'a> {
    pub fn new(wire: &'a WireRecord, table: &'a AliasTable, oracle: &'a dyn TypeOracle) -> Self {
        Self {
            wire,
            table,
            oracle,
        }
    }

    fn record_type(&self) -> TypeRef {
        TypeRef::named(&self.wire.package, self.wire.original_name.clone())
    }

    fn wire_type(&self) -> TypeRef {
        TypeRef::named(&self.wire.package, self.wire.name.clone())
    }

    fn alias(&self, path: &str) -> String {
        self.table.alias(path).unwrap_or(path).to_string()
    }

    fn receiver(&self) -> Param {
        Param::new("x", TypeRef::pointer(self.record_type()))
    }

    /// Declaration of the wire struct, tags re-attached verbatim.
    pub fn type_decl(&self) -> StructDecl {
        StructDecl {
            doc: Some(format!(
                "{} is the JSON and YAML encoding of {}.",
                self.wire.name, self.wire.original_name
            )),
            name: self.wire.name.clone(),
            fields: self
                .wire
                .fields
                .iter()
                .map(|f| DeclField {
                    name: f.name.clone(),
                    ty: f.ty.clone(),
                    tag: f.tag.clone(),
                })
                .collect(),
        }
    }

    /// `&WireType{Field: <convert>, ...}` built from the receiver.
    fn encoded_value(&self) -> Expr {
        Expr::Composite {
            ty: self.wire_type(),
            fields: self
                .wire
                .fields
                .iter()
                .map(|f| (f.name.clone(), f.convert(self.oracle, "x")))
                .collect(),
        }
        .addr()
    }

    /// `var dec W; if err := <decode>; err != nil {...}; var v R; ...; *x = v`
    fn decode_body(&self, decode: Expr, format: Format) -> Vec<Stmt> {
        let mut body = vec![
            Stmt::Var {
                name: "dec".into(),
                ty: self.wire_type(),
            },
            Stmt::If {
                init: Some(Box::new(Stmt::Define {
                    names: vec!["err".into()],
                    value: decode,
                })),
                cond: Expr::ident("err").not_nil(),
                body: vec![Stmt::Return(vec![Expr::ident("err")])],
            },
            Stmt::Var {
                name: "v".into(),
                ty: self.record_type(),
            },
        ];
        let errors = self.alias(ERRORS_PACKAGE);
        let names = DecodeNames {
            decoded: "dec",
            target: "v",
            errors: &errors,
        };
        for field in &self.wire.fields {
            body.extend(decode_field(
                field,
                format,
                &self.wire.original_name,
                self.oracle,
                &names,
            ));
        }
        body.push(Stmt::assign(Expr::ident("x").deref(), Expr::ident("v")));
        body.push(Stmt::Return(vec![Expr::Nil]));
        body
    }

    pub fn marshal_json(&self) -> FuncDecl {
        let json = self.alias(JSON_PACKAGE);
        FuncDecl {
            doc: Some(format!("MarshalJSON implements {}.Marshaler.", json)),
            receiver: self.receiver(),
            name: "MarshalJSON".into(),
            params: Vec::new(),
            results: vec![TypeRef::slice(TypeRef::basic("byte")), TypeRef::basic("error")],
            body: vec![Stmt::Return(vec![
                Expr::ident(json).field("Marshal").call(vec![self.encoded_value()]),
            ])],
        }
    }

    pub fn unmarshal_json(&self) -> FuncDecl {
        let json = self.alias(JSON_PACKAGE);
        let decode = Expr::ident(&json)
            .field("Unmarshal")
            .call(vec![Expr::ident("input"), Expr::ident("dec").addr()]);
        FuncDecl {
            doc: Some(format!("UnmarshalJSON implements {}.Unmarshaler.", json)),
            receiver: self.receiver(),
            name: "UnmarshalJSON".into(),
            params: vec![Param::new("input", TypeRef::slice(TypeRef::basic("byte")))],
            results: vec![TypeRef::basic("error")],
            body: self.decode_body(decode, Format::Json),
        }
    }

    pub fn marshal_yaml(&self) -> FuncDecl {
        FuncDecl {
            doc: Some("MarshalYAML implements yaml.Marshaler.".into()),
            receiver: self.receiver(),
            name: "MarshalYAML".into(),
            params: Vec::new(),
            results: vec![TypeRef::any(), TypeRef::basic("error")],
            body: vec![Stmt::Return(vec![self.encoded_value(), Expr::Nil])],
        }
    }

    pub fn unmarshal_yaml(&self) -> FuncDecl {
        let decode = Expr::ident("unmarshal").call(vec![Expr::ident("dec").addr()]);
        FuncDecl {
            doc: Some("UnmarshalYAML implements yaml.Unmarshaler.".into()),
            receiver: self.receiver(),
            name: "UnmarshalYAML".into(),
            params: vec![Param::new(
                "unmarshal",
                TypeRef::Func("func(interface{}) error".into()),
            )],
            results: vec![TypeRef::basic("error")],
            body: self.decode_body(decode, Format::Yaml),
        }
    }

    /// All declarations in emission order.
    pub fn decls(&self) -> Vec<Decl> {
        vec![
            Decl::Struct(self.type_decl()),
            Decl::Func(self.marshal_json()),
            Decl::Func(self.unmarshal_json()),
            Decl::Func(self.marshal_yaml()),
            Decl::Func(self.unmarshal_yaml()),
        ]
    }

    /// Render the complete file.
    ///
    /// Only packages that the emitted code references are imported.
    pub fn render(&self) -> String {
        let decls = self.decls();
        let qualifier = self.table.qualifier();
        qualifier.mark_used(JSON_PACKAGE);
        if any_required(&self.wire.fields) {
            qualifier.mark_used(ERRORS_PACKAGE);
        }

        // First pass only discovers which packages get printed.
        let mut probe = GoWriter::new(&qualifier);
        for decl in &decls {
            probe.write_decl(decl);
        }

        let file = File {
            header: HEADER.to_string(),
            package: self.wire.package.name.clone(),
            imports: qualifier
                .used_entries()
                .into_iter()
                .map(|(alias, path)| Import { alias, path })
                .collect(),
            decls,
        };
        let mut writer = GoWriter::new(&qualifier);
        writer.write_file(&file);
        writer.finish()
    }
}
