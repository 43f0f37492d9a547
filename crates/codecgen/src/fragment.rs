//! Typed fragments of generated Go code and the writer that prints them.
//!
//! Generation builds [`Expr`], [`Stmt`] and [`Decl`] values; only
//! [`GoWriter`] turns them into text.

use crate::tags::{go_string, quote_tag};
use crate::types::{Qualifier, TypeRef};
use std::fmt::Write;

/// A Go expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Ident(String),
    /// `expr.name`
    Selector(Box<Expr>, String),
    /// `*expr`
    Deref(Box<Expr>),
    /// `&expr`
    AddrOf(Box<Expr>),
    /// `(T)(expr)`
    Convert { ty: TypeRef, value: Box<Expr> },
    Call { func: Box<Expr>, args: Vec<Expr> },
    /// `T{Name: value, ...}`
    Composite {
        ty: TypeRef,
        fields: Vec<(String, Expr)>,
    },
    Str(String),
    Nil,
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Eq,
    Ne,
}

impl BinaryOp {
    fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
        }
    }
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident(name.into())
    }

    pub fn field(self, name: impl Into<String>) -> Self {
        Expr::Selector(Box::new(self), name.into())
    }

    pub fn deref(self) -> Self {
        Expr::Deref(Box::new(self))
    }

    pub fn addr(self) -> Self {
        Expr::AddrOf(Box::new(self))
    }

    pub fn convert(self, ty: TypeRef) -> Self {
        Expr::Convert {
            ty,
            value: Box::new(self),
        }
    }

    pub fn call(self, args: Vec<Expr>) -> Self {
        Expr::Call {
            func: Box::new(self),
            args,
        }
    }

    pub fn is_nil(self) -> Self {
        Expr::Binary {
            op: BinaryOp::Eq,
            lhs: Box::new(self),
            rhs: Box::new(Expr::Nil),
        }
    }

    pub fn not_nil(self) -> Self {
        Expr::Binary {
            op: BinaryOp::Ne,
            lhs: Box::new(self),
            rhs: Box::new(Expr::Nil),
        }
    }
}

/// A Go statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `var name T`
    Var { name: String, ty: TypeRef },
    /// `a, b := value`
    Define { names: Vec<String>, value: Expr },
    /// `target = value`
    Assign { target: Expr, value: Expr },
    If {
        init: Option<Box<Stmt>>,
        cond: Expr,
        body: Vec<Stmt>,
    },
    Return(Vec<Expr>),
}

impl Stmt {
    pub fn assign(target: Expr, value: Expr) -> Self {
        Stmt::Assign { target, value }
    }

    pub fn if_then(cond: Expr, body: Vec<Stmt>) -> Self {
        Stmt::If {
            init: None,
            cond,
            body,
        }
    }
}

/// A named, typed parameter or receiver.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: TypeRef,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A method declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub doc: Option<String>,
    pub receiver: Param,
    pub name: String,
    pub params: Vec<Param>,
    pub results: Vec<TypeRef>,
    pub body: Vec<Stmt>,
}

/// A field of a struct declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct DeclField {
    pub name: String,
    pub ty: TypeRef,
    pub tag: String,
}

/// A named struct type declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct StructDecl {
    pub doc: Option<String>,
    pub name: String,
    pub fields: Vec<DeclField>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Struct(StructDecl),
    Func(FuncDecl),
}

/// An import spec, always written with an explicit name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub alias: String,
    pub path: String,
}

/// A complete Go source file.
#[derive(Debug, Clone, PartialEq)]
pub struct File {
    pub header: String,
    pub package: String,
    pub imports: Vec<Import>,
    pub decls: Vec<Decl>,
}

/// Emits fragments as Go source text.
pub struct GoWriter<'q> {
    output: String,
    indent: usize,
    qualifier: &'q dyn Qualifier,
}

impl<'q> GoWriter<'q> {
    pub fn new(qualifier: &'q dyn Qualifier) -> Self {
        Self {
            output: String::new(),
            indent: 0,
            qualifier,
        }
    }

    pub fn finish(self) -> String {
        self.output
    }

    /// Emit a whole file.
    pub fn write_file(&mut self, file: &File) {
        for line in file.header.lines() {
            writeln!(self.output, "// {}", line).unwrap();
        }
        self.output.push('\n');
        writeln!(self.output, "package {}", file.package).unwrap();
        if !file.imports.is_empty() {
            self.output.push_str("\nimport (\n");
            for import in &file.imports {
                writeln!(self.output, "\t{} {}", import.alias, go_string(&import.path)).unwrap();
            }
            self.output.push_str(")\n");
        }
        for decl in &file.decls {
            self.output.push('\n');
            self.write_decl(decl);
        }
    }

    pub fn write_decl(&mut self, decl: &Decl) {
        match decl {
            Decl::Struct(decl) => self.write_struct(decl),
            Decl::Func(decl) => self.write_func(decl),
        }
    }

    fn write_doc(&mut self, doc: &Option<String>) {
        if let Some(doc) = doc {
            for line in doc.lines() {
                self.write_indent();
                writeln!(self.output, "// {}", line).unwrap();
            }
        }
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.output.push('\t');
        }
    }

    fn write_type(&mut self, ty: &TypeRef) {
        let qualifier = self.qualifier;
        write!(self.output, "{}", ty.display(qualifier)).unwrap();
    }

    fn write_struct(&mut self, decl: &StructDecl) {
        self.write_doc(&decl.doc);
        writeln!(self.output, "type {} struct {{", decl.name).unwrap();
        self.indent += 1;
        for field in &decl.fields {
            self.write_indent();
            write!(self.output, "{} ", field.name).unwrap();
            self.write_type(&field.ty);
            if !field.tag.is_empty() {
                write!(self.output, " {}", quote_tag(&field.tag)).unwrap();
            }
            self.output.push('\n');
        }
        self.indent -= 1;
        self.output.push_str("}\n");
    }

    fn write_func(&mut self, decl: &FuncDecl) {
        self.write_doc(&decl.doc);
        write!(self.output, "func ({} ", decl.receiver.name).unwrap();
        self.write_type(&decl.receiver.ty);
        write!(self.output, ") {}(", decl.name).unwrap();
        for (i, param) in decl.params.iter().enumerate() {
            if i > 0 {
                self.output.push_str(", ");
            }
            write!(self.output, "{} ", param.name).unwrap();
            self.write_type(&param.ty);
        }
        self.output.push(')');
        match decl.results.as_slice() {
            [] => {}
            [single] => {
                self.output.push(' ');
                self.write_type(single);
            }
            many => {
                self.output.push_str(" (");
                for (i, ty) in many.iter().enumerate() {
                    if i > 0 {
                        self.output.push_str(", ");
                    }
                    self.write_type(ty);
                }
                self.output.push(')');
            }
        }
        self.output.push_str(" {\n");
        self.write_block(&decl.body);
        self.output.push_str("}\n");
    }

    fn write_block(&mut self, body: &[Stmt]) {
        self.indent += 1;
        for stmt in body {
            self.write_indent();
            self.write_stmt(stmt);
            self.output.push('\n');
        }
        self.indent -= 1;
    }

    /// Emit a statement at the current position, without indentation or a
    /// trailing newline.
    pub fn write_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Var { name, ty } => {
                write!(self.output, "var {} ", name).unwrap();
                self.write_type(ty);
            }
            Stmt::Define { names, value } => {
                write!(self.output, "{} := ", names.join(", ")).unwrap();
                self.write_expr(value);
            }
            Stmt::Assign { target, value } => {
                self.write_expr(target);
                self.output.push_str(" = ");
                self.write_expr(value);
            }
            Stmt::If { init, cond, body } => {
                self.output.push_str("if ");
                if let Some(init) = init {
                    self.write_stmt(init);
                    self.output.push_str("; ");
                }
                self.write_expr(cond);
                self.output.push_str(" {\n");
                self.write_block(body);
                self.write_indent();
                self.output.push('}');
            }
            Stmt::Return(values) => {
                self.output.push_str("return");
                for (i, value) in values.iter().enumerate() {
                    self.output.push_str(if i == 0 { " " } else { ", " });
                    self.write_expr(value);
                }
            }
        }
    }

    /// Emit an expression at the current position.
    pub fn write_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Ident(name) => self.output.push_str(name),
            Expr::Selector(base, name) => {
                self.write_expr(base);
                write!(self.output, ".{}", name).unwrap();
            }
            Expr::Deref(inner) => {
                self.output.push('*');
                self.write_expr(inner);
            }
            Expr::AddrOf(inner) => {
                self.output.push('&');
                self.write_expr(inner);
            }
            Expr::Convert { ty, value } => {
                self.output.push('(');
                self.write_type(ty);
                self.output.push_str(")(");
                self.write_expr(value);
                self.output.push(')');
            }
            Expr::Call { func, args } => {
                self.write_expr(func);
                self.output.push('(');
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        self.output.push_str(", ");
                    }
                    self.write_expr(arg);
                }
                self.output.push(')');
            }
            Expr::Composite { ty, fields } => {
                self.write_type(ty);
                if fields.is_empty() {
                    self.output.push_str("{}");
                    return;
                }
                self.output.push_str("{\n");
                self.indent += 1;
                for (name, value) in fields {
                    self.write_indent();
                    write!(self.output, "{}: ", name).unwrap();
                    self.write_expr(value);
                    self.output.push_str(",\n");
                }
                self.indent -= 1;
                self.write_indent();
                self.output.push('}');
            }
            Expr::Str(value) => self.output.push_str(&go_string(value)),
            Expr::Nil => self.output.push_str("nil"),
            Expr::Binary { op, lhs, rhs } => {
                self.write_expr(lhs);
                write!(self.output, " {} ", op.as_str()).unwrap();
                self.write_expr(rhs);
            }
        }
    }
}

/// Render a single expression to text.
pub fn expr_to_string(expr: &Expr, qualifier: &dyn Qualifier) -> String {
    let mut writer = GoWriter::new(qualifier);
    writer.write_expr(expr);
    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LocalQualifier, Package};

    fn local() -> Package {
        Package::new("store", "example.com/store")
    }

    #[test]
    fn expressions() {
        let pkg = local();
        let q = LocalQualifier(&pkg);
        let expr = Expr::ident("dec")
            .field("Weight")
            .deref()
            .convert(TypeRef::basic("float64"));
        assert_eq!(expr_to_string(&expr, &q), "(float64)(*dec.Weight)");
        assert_eq!(
            expr_to_string(&Expr::ident("dec").field("ID").is_nil(), &q),
            "dec.ID == nil"
        );
        assert_eq!(
            expr_to_string(&Expr::Str("missing 'id'".into()), &q),
            "\"missing 'id'\""
        );
    }

    #[test]
    fn if_statement_with_init() {
        let pkg = local();
        let q = LocalQualifier(&pkg);
        let stmt = Stmt::If {
            init: Some(Box::new(Stmt::Define {
                names: vec!["err".into()],
                value: Expr::ident("fn").call(vec![Expr::ident("dec").addr()]),
            })),
            cond: Expr::ident("err").not_nil(),
            body: vec![Stmt::Return(vec![Expr::ident("err")])],
        };
        let mut writer = GoWriter::new(&q);
        writer.write_stmt(&stmt);
        assert_eq!(
            writer.finish(),
            "if err := fn(&dec); err != nil {\n\treturn err\n}"
        );
    }

    #[test]
    fn composite_literal_is_multiline() {
        let pkg = local();
        let q = LocalQualifier(&pkg);
        let expr = Expr::Composite {
            ty: TypeRef::named(&pkg, "ItemJSON"),
            fields: vec![("ID".into(), Expr::ident("x").field("ID").addr())],
        }
        .addr();
        assert_eq!(expr_to_string(&expr, &q), "&ItemJSON{\n\tID: &x.ID,\n}");
    }

    #[test]
    fn struct_declaration() {
        let pkg = local();
        let q = LocalQualifier(&pkg);
        let mut writer = GoWriter::new(&q);
        writer.write_decl(&Decl::Struct(StructDecl {
            doc: Some("ItemJSON is a wire type.".into()),
            name: "ItemJSON".into(),
            fields: vec![
                DeclField {
                    name: "ID".into(),
                    ty: TypeRef::pointer(TypeRef::basic("string")),
                    tag: r#"json:"id""#.into(),
                },
                DeclField {
                    name: "N".into(),
                    ty: TypeRef::pointer(TypeRef::basic("int")),
                    tag: String::new(),
                },
            ],
        }));
        assert_eq!(
            writer.finish(),
            "// ItemJSON is a wire type.\ntype ItemJSON struct {\n\tID *string `json:\"id\"`\n\tN *int\n}\n"
        );
    }
}
