use std::{
    fmt::{self, Write},
    format_args as f,
};

use crate::{
    ast::{Expr, ExprKind, Literal, Source, Stmt, StmtKind, Typed},
    catalog::Catalog,
    codegen::Options,
};

/// Emits a Java compilation unit with a single class whose `main` method
/// runs the program's statements in order.
pub struct Generator<'a> {
    code: String,
    catalog: &'a Catalog,
    options: &'a Options,
    level: usize,
}

impl Generator<'_> {
    pub fn new<'a>(catalog: &'a Catalog, options: &'a Options) -> Generator<'a> {
        Generator {
            code: String::with_capacity(4 * 1024),
            catalog,
            options,
            level: 0,
        }
    }

    pub fn generate(mut self, source: &Source<Typed>) -> String {
        let options = self.options;
        self.out(f!("public final class {} {{", options.class_name));
        self.out_line();
        self.indented(|this| {
            this.out("public static void main(String[] args) {");
            this.indented(|this| this.g_block(&source.statements));
            this.out("}");
        });
        self.out_line();
        self.out("}");
        self.code
    }

    fn g_block(&mut self, statements: &[Stmt<Typed>]) {
        for stmt in statements {
            self.g_stmt(stmt);
        }
    }

    fn g_stmt(&mut self, stmt: &Stmt<Typed>) {
        match &stmt.kind {
            StmtKind::Expr(expr) => {
                let expr = JavaExpr(expr);
                self.out(f!("{expr};"));
            }
            StmtKind::Declaration {
                name,
                ty,
                initializer,
            } => {
                let catalog = self.catalog;
                let ty = catalog.host_type(*ty);
                match initializer {
                    Some(value) => {
                        let value = JavaExpr(value);
                        self.out(f!("{ty} {name} = {value};"));
                    }
                    None => self.out(f!("{ty} {name};")),
                }
            }
            StmtKind::Assignment { target, value } => {
                let value = JavaExpr(value);
                self.out(f!("{target} = {value};"));
            }
            StmtKind::If {
                predicate,
                then_arm,
                else_arm,
            } => {
                let predicate = JavaExpr(predicate);
                self.out(f!("if ({predicate}) {{"));
                self.indented(|this| this.g_block(then_arm));
                if !else_arm.is_empty() {
                    self.out("} else {");
                    self.indented(|this| this.g_block(else_arm));
                }
                self.out("}");
            }
            StmtKind::While { predicate, body } => {
                let predicate = JavaExpr(predicate);
                self.out(f!("while ({predicate}) {{"));
                self.indented(|this| this.g_block(body));
                self.out("}");
            }
        }
    }
}

/// Utility functions.
impl Generator<'_> {
    /// Writes a full line at the current indentation level.
    fn out(&mut self, f: impl fmt::Display) {
        let width = self.level * self.options.indent_width;
        // Writing into a `String` never fails.
        _ = writeln!(self.code, "{:width$}{f}", "");
    }

    /// Writes an empty line.
    fn out_line(&mut self) {
        self.code.push('\n');
    }

    fn indented<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.level += 1;
        let res = f(self);
        self.level -= 1;
        res
    }
}

/// Displays an expression as Java source.
struct JavaExpr<'e>(&'e Expr<Typed>);

impl fmt::Display for JavaExpr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.kind {
            ExprKind::Literal(literal) => match literal {
                Literal::Bool(b) => write!(f, "{b}"),
                Literal::Integer(i) => write!(f, "{i}"),
                Literal::Decimal(d) => f.write_str(d.as_str()),
                Literal::String(s) => {
                    f.write_char('"')?;
                    for c in s.as_str().chars() {
                        if matches!(c, '"' | '\\') {
                            f.write_char('\\')?;
                        }
                        f.write_char(c)?;
                    }
                    f.write_char('"')
                }
            },
            ExprKind::Group(inner) => write!(f, "({})", JavaExpr(inner)),
            ExprKind::Binary { op, lhs, rhs } => {
                write!(f, "{} {op} {}", JavaExpr(lhs), JavaExpr(rhs))
            }
            ExprKind::Variable(ident) => write!(f, "{ident}"),
            ExprKind::Call { args, callee, .. } => {
                write!(f, "{callee}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", JavaExpr(arg))?;
                }
                f.write_char(')')
            }
        }
    }
}
