// source      ::= statement+
// statement   ::= declaration | assignment | if | while | expr ';'
// declaration ::= LET ID ':' TYPE ['=' expr] ';'
// assignment  ::= ID '=' expr ';'
// if          ::= IF expr THEN statement* [ELSE statement*] END
// while       ::= WHILE expr DO statement* END
// expr        ::= expr ('==' | '!=') expr
//               | expr ('+' | '-') expr
//               | expr ('*' | '/') expr
//               | '(' expr ')'
//               | ID '(' [expr (',' expr)*] ')'
//               | ID
//               | integer
//               | decimal
//               | string
//               | TRUE
//               | FALSE

// Precedence
//
// * /
// + -
// == !=

use std::fmt::{self, Debug};

use crate::{token::Span, types::Type};

/// Describes the annotations a tree carries, which change as it goes through
/// the pipeline.
pub trait Info {
    /// Type annotation of declarations.
    type Ty: Debug + PartialEq;
    /// Annotation attached to every expression.
    type Expr: Debug + PartialEq;
    type Literal: Debug + PartialEq;
    /// What a call resolves to.
    type Callee: Debug + PartialEq;
}

/// Tree produced by the parser.
#[derive(Debug, PartialEq)]
pub struct Untyped;

impl Info for Untyped {
    type Ty = TypeName;
    type Expr = ();
    type Literal = RawLiteral;
    type Callee = ();
}

/// Tree produced by the analyzer.
#[derive(Debug, PartialEq)]
pub struct Typed;

impl Info for Typed {
    type Ty = Type;
    type Expr = Type;
    type Literal = Literal;
    /// The host name of the called function.
    type Callee = Box<str>;
}

#[derive(Debug, PartialEq)]
pub struct Source<I: Info> {
    /// Non empty list of statements.
    pub statements: Vec<Stmt<I>>,
}

#[derive(Debug, PartialEq)]
pub struct Stmt<I: Info> {
    pub kind: StmtKind<I>,
    pub span: Span,
}

#[derive(Debug, PartialEq)]
pub enum StmtKind<I: Info> {
    Expr(Expr<I>),
    Declaration {
        name: Ident,
        ty: I::Ty,
        initializer: Option<Expr<I>>,
    },
    Assignment {
        target: Ident,
        value: Expr<I>,
    },
    If {
        predicate: Expr<I>,
        then_arm: Vec<Stmt<I>>,
        /// Empty if there is no `ELSE`.
        else_arm: Vec<Stmt<I>>,
    },
    While {
        predicate: Expr<I>,
        body: Vec<Stmt<I>>,
    },
}

#[derive(Debug, PartialEq)]
pub struct Expr<I: Info> {
    pub kind: ExprKind<I>,
    pub span: Span,
    pub info: I::Expr,
}

#[derive(Debug, PartialEq)]
pub enum ExprKind<I: Info> {
    Literal(I::Literal),
    Group(Box<Expr<I>>),
    Binary {
        op: BinaryOperator,
        lhs: Box<Expr<I>>,
        rhs: Box<Expr<I>>,
    },
    Variable(Ident),
    Call {
        name: Ident,
        args: Vec<Expr<I>>,
        callee: I::Callee,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BinaryOperator {
    Eq,
    NotEq,
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOperator {
    /// Equality operators compare any pair of compatible values; the others
    /// are arithmetic.
    pub fn is_equality(self) -> bool {
        matches!(self, BinaryOperator::Eq | BinaryOperator::NotEq)
    }

    /// The operator as spelled in source, which is also how the target
    /// language spells it.
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOperator::Eq => "==",
            BinaryOperator::NotEq => "!=",
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A literal as written in the source, before any bounds checking.
#[derive(Debug, PartialEq)]
pub enum RawLiteral {
    Bool(bool),
    /// The digits of the literal.
    Integer(Box<str>),
    /// The digits of the literal, with exactly one decimal point.
    Decimal(Box<str>),
    /// String contents, without the quotes.
    String(Box<str>),
}

/// A literal whose value has been checked.
#[derive(Debug, PartialEq)]
pub enum Literal {
    Bool(bool),
    Integer(i32),
    Decimal(BoundedDecimal),
    String(ValidString),
}

impl Literal {
    pub fn ty(&self) -> Type {
        match self {
            Literal::Bool(_) => Type::Boolean,
            Literal::Integer(_) => Type::Integer,
            Literal::Decimal(_) => Type::Decimal,
            Literal::String(_) => Type::String,
        }
    }
}

/// A non-negative decimal number whose magnitude is below 10^31, kept in its
/// canonical textual form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoundedDecimal(Box<str>);

impl BoundedDecimal {
    pub const MAX_INTEGER_DIGITS: usize = 31;

    /// Validates a decimal literal of the form `digits.digits`. Leading zeros
    /// of the integer part are dropped (one is kept before the point).
    pub fn new(text: &str) -> Option<BoundedDecimal> {
        let (int, frac) = text.split_once('.')?;
        let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(int) || !all_digits(frac) {
            return None;
        }
        let int = int.trim_start_matches('0');
        if int.len() > Self::MAX_INTEGER_DIGITS {
            return None;
        }
        let int = if int.is_empty() { "0" } else { int };
        Some(BoundedDecimal(format!("{int}.{frac}").into_boxed_str()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A string whose characters are all in the allowed set (see
/// [`ValidString::is_allowed`]).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidString(Box<str>);

impl ValidString {
    /// Fails with the first character outside of the allowed set.
    pub fn new(text: &str) -> Result<ValidString, char> {
        match text.chars().find(|c| !Self::is_allowed(*c)) {
            Some(c) => Err(c),
            None => Ok(ValidString(text.into())),
        }
    }

    pub fn is_allowed(c: char) -> bool {
        c.is_ascii_alphanumeric() || matches!(c, '_' | '!' | '?' | '.' | '+' | '-' | '/' | '*' | ' ')
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RawLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawLiteral::Bool(b) => write!(f, "bool {b}"),
            RawLiteral::Integer(i) => write!(f, "int {i}"),
            RawLiteral::Decimal(d) => write!(f, "decimal {d}"),
            RawLiteral::String(s) => write!(f, "string {s:?}"),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Bool(b) => write!(f, "bool {b}"),
            Literal::Integer(i) => write!(f, "int {i}"),
            Literal::Decimal(d) => write!(f, "decimal {}", d.as_str()),
            Literal::String(s) => write!(f, "string {:?}", s.as_str()),
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct TypeName(pub Ident);

impl TypeName {
    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn span(&self) -> Span {
        self.0.span
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Ident {
    pub name: Box<str>,
    pub span: Span,
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_decimal() {
        let ok = |s: &str| BoundedDecimal::new(s).map(|d| d.as_str().to_owned());
        assert_eq!(ok("1.5").as_deref(), Some("1.5"));
        assert_eq!(ok("007.250").as_deref(), Some("7.250"));
        assert_eq!(ok("000.1").as_deref(), Some("0.1"));
        // 10^31 - 1 has 31 digits, 10^31 has 32.
        let below = format!("{}.0", "9".repeat(31));
        let at_limit = format!("1{}.0", "0".repeat(31));
        assert!(BoundedDecimal::new(&below).is_some());
        assert!(BoundedDecimal::new(&at_limit).is_none());
        assert!(BoundedDecimal::new(&format!("000{below}")).is_some());
        assert!(BoundedDecimal::new("1").is_none());
        assert!(BoundedDecimal::new("1.").is_none());
    }

    #[test]
    fn valid_string() {
        assert!(ValidString::new("").is_ok());
        assert!(ValidString::new("Hello, World!").is_err());
        assert!(ValidString::new("hello_world 1+2-3*4/5 ok?!.").is_ok());
        assert_eq!(ValidString::new("a#b"), Err('#'));
        assert_eq!(ValidString::new("tab\there"), Err('\t'));
        assert_eq!(ValidString::new("caf\u{e9}"), Err('\u{e9}'));
    }
}
