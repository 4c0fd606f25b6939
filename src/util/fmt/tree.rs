use std::{fmt::Display, io::Write};

use crate::{ast::*, types::Type};

const INDENT_WIDTH: usize = 2;

pub fn print_source_string<I: InfoWriter>(source: &Source<I>) -> String {
    let mut buf = Vec::with_capacity(1024);
    print_source(&mut buf, source).unwrap();
    String::from_utf8(buf).unwrap()
}

pub fn print_source<I: InfoWriter>(w: &mut impl Write, source: &Source<I>) -> std::io::Result<()> {
    print_block(w, 0, &source.statements)
}

fn print_block<I: InfoWriter>(
    w: &mut impl Write,
    i: usize,
    statements: &[Stmt<I>],
) -> std::io::Result<()> {
    for stmt in statements {
        print_stmt(w, i, stmt)?;
    }
    Ok(())
}

fn print_stmt<I: InfoWriter>(w: &mut impl Write, i: usize, stmt: &Stmt<I>) -> std::io::Result<()> {
    sp(w, i)?;
    match &stmt.kind {
        StmtKind::Expr(expr) => {
            writeln!(w, "expression")?;
            print_expr(w, i + 1, expr)?;
        }
        StmtKind::Declaration {
            name,
            ty,
            initializer,
        } => {
            write!(w, "declaration {name}: {}", ty.write())?;
            if let Some(initializer) = initializer {
                writeln!(w, " (initialized)")?;
                print_expr(w, i + 1, initializer)?;
            } else {
                writeln!(w)?;
            }
        }
        StmtKind::Assignment { target, value } => {
            writeln!(w, "assignment {target}")?;
            print_expr(w, i + 1, value)?;
        }
        StmtKind::If {
            predicate,
            then_arm,
            else_arm,
        } => {
            writeln!(w, "if")?;
            print_expr(w, i + 1, predicate)?;
            sp(w, i + 1)?;
            writeln!(w, "then")?;
            print_block(w, i + 2, then_arm)?;
            if !else_arm.is_empty() {
                sp(w, i + 1)?;
                writeln!(w, "else")?;
                print_block(w, i + 2, else_arm)?;
            }
        }
        StmtKind::While { predicate, body } => {
            writeln!(w, "while")?;
            print_expr(w, i + 1, predicate)?;
            sp(w, i + 1)?;
            writeln!(w, "do")?;
            print_block(w, i + 2, body)?;
        }
    }
    Ok(())
}

pub fn print_expr<I: InfoWriter>(
    w: &mut impl Write,
    i: usize,
    expr: &Expr<I>,
) -> std::io::Result<()> {
    sp(w, i)?;
    let info = expr.info.write_resolved(); // inferred type, for typed trees
    let span = expr.span;
    match &expr.kind {
        ExprKind::Literal(literal) => {
            writeln!(w, "{} ({span}{info})", literal.write())?;
        }
        ExprKind::Group(inner) => {
            writeln!(w, "group ({span}{info})")?;
            print_expr(w, i + 1, inner)?;
        }
        ExprKind::Binary { op, lhs, rhs } => {
            writeln!(w, "binary {op:?} ({span}{info})")?;
            print_expr(w, i + 1, lhs)?;
            print_expr(w, i + 1, rhs)?;
        }
        ExprKind::Variable(ident) => {
            writeln!(w, "variable {ident} ({span}{info})")?;
        }
        ExprKind::Call { name, args, callee } => {
            let callee = callee.write_resolved();
            writeln!(w, "call {name}{callee} ({span}{info})")?;
            for arg in args {
                print_expr(w, i + 1, arg)?;
            }
        }
    }
    Ok(())
}

fn sp(w: &mut impl Write, i: usize) -> std::io::Result<()> {
    write!(w, "{:width$}", "", width = i * INDENT_WIDTH)
}

pub trait InfoWriter:
    Info<Ty: NameWriter, Expr: NameWriter, Literal: NameWriter, Callee: NameWriter>
{
}

impl<I> InfoWriter for I
where
    I: Info,
    I::Ty: NameWriter,
    I::Expr: NameWriter,
    I::Literal: NameWriter,
    I::Callee: NameWriter,
{
}

pub trait NameWriter {
    fn write(&self) -> impl Display + '_;

    /// What the analyzer resolved for this node; nothing before analysis.
    fn write_resolved(&self) -> impl Display + '_ {
        ""
    }
}

impl NameWriter for () {
    fn write(&self) -> impl Display + '_ {
        ""
    }
}

impl NameWriter for TypeName {
    fn write(&self) -> impl Display + '_ {
        self.name()
    }
}

impl NameWriter for Type {
    fn write(&self) -> impl Display + '_ {
        self.name()
    }

    fn write_resolved(&self) -> impl Display + '_ {
        struct TypeWriter(Type);

        impl Display for TypeWriter {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, " %: {}", self.0)
            }
        }

        TypeWriter(*self)
    }
}

impl NameWriter for RawLiteral {
    fn write(&self) -> impl Display + '_ {
        self
    }
}

impl NameWriter for Literal {
    fn write(&self) -> impl Display + '_ {
        self
    }
}

/// Host name of a resolved call.
impl NameWriter for Box<str> {
    fn write(&self) -> impl Display + '_ {
        &**self
    }

    fn write_resolved(&self) -> impl Display + '_ {
        format!(" -> {self}")
    }
}
