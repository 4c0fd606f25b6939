use log::{debug, trace};

use crate::{
    ast::{
        BinaryOperator, BoundedDecimal, Expr, ExprKind, Ident, Literal, RawLiteral, Source, Stmt,
        StmtKind, Typed, TypeName, Untyped, ValidString,
    },
    catalog::Catalog,
    scope::Scope,
    token::{Span, Spanned},
    types::Type,
};

type Result<T, E = Spanned<Error>> = std::result::Result<T, E>;

/// Checks the given tree against the catalog, resolving every name and
/// annotating every expression with its type.
///
/// Top-level declarations are bound in `scope`, so a caller may inspect them
/// once analysis succeeds.
pub fn analyze(
    source: Source<Untyped>,
    catalog: &Catalog,
    scope: &mut Scope<'_>,
) -> Result<Source<Typed>> {
    if source.statements.is_empty() {
        return Err(Span::new_of_length(0, 0).wrap(Error::EmptySource));
    }
    let analyzer = Analyzer { catalog };
    let statements = analyzer.analyze_block(source.statements, scope)?;
    debug!("analyzed {} top-level statements", statements.len());
    Ok(Source { statements })
}

struct Analyzer<'cat> {
    catalog: &'cat Catalog,
}

impl Analyzer<'_> {
    fn analyze_block(
        &self,
        statements: Vec<Stmt<Untyped>>,
        scope: &mut Scope<'_>,
    ) -> Result<Vec<Stmt<Typed>>> {
        statements
            .into_iter()
            .map(|stmt| self.analyze_stmt(stmt, scope))
            .collect()
    }

    /// Analyzes `statements` in a fresh scope nested in `scope`.
    fn analyze_nested_block(
        &self,
        statements: Vec<Stmt<Untyped>>,
        scope: &Scope<'_>,
    ) -> Result<Vec<Stmt<Typed>>> {
        let mut child = scope.child();
        trace!("enter scope (depth {})", child.depth());
        let statements = self.analyze_block(statements, &mut child)?;
        trace!("leave scope (depth {})", child.depth());
        Ok(statements)
    }

    fn analyze_stmt(&self, stmt: Stmt<Untyped>, scope: &mut Scope<'_>) -> Result<Stmt<Typed>> {
        let span = stmt.span;
        let kind = match stmt.kind {
            StmtKind::Expr(expr) => {
                if !matches!(expr.kind, ExprKind::Call { .. }) {
                    return Err(expr.span.wrap(Error::NotAStatementExpression));
                }
                StmtKind::Expr(self.analyze_expr(expr, scope)?)
            }
            StmtKind::Declaration {
                name,
                ty,
                initializer,
            } => self.analyze_declaration(name, &ty, initializer, scope)?,
            StmtKind::Assignment { target, value } => {
                let Some(target_ty) = scope.lookup(&target.name) else {
                    return Err(Self::undeclared(&target));
                };
                let value = self.analyze_expr(value, scope)?;
                Self::ensure_assignable(&value, target_ty)?;
                StmtKind::Assignment { target, value }
            }
            StmtKind::If {
                predicate,
                then_arm,
                else_arm,
            } => {
                let predicate = self.analyze_predicate(predicate, scope)?;
                if then_arm.is_empty() {
                    return Err(span.wrap(Error::EmptyThenBranch));
                }
                let then_arm = self.analyze_nested_block(then_arm, scope)?;
                let else_arm = self.analyze_nested_block(else_arm, scope)?;
                StmtKind::If {
                    predicate,
                    then_arm,
                    else_arm,
                }
            }
            StmtKind::While { predicate, body } => {
                let predicate = self.analyze_predicate(predicate, scope)?;
                let body = self.analyze_nested_block(body, scope)?;
                StmtKind::While { predicate, body }
            }
        };
        Ok(Stmt { kind, span })
    }

    fn analyze_declaration(
        &self,
        name: Ident,
        ty: &TypeName,
        initializer: Option<Expr<Untyped>>,
        scope: &mut Scope<'_>,
    ) -> Result<StmtKind<Typed>> {
        if self.catalog.is_host_reserved(&name.name) {
            let error = Error::ReservedName {
                name: name.name.clone(),
            };
            return Err(name.span.wrap(error));
        }
        let Some(declared) = self.catalog.lookup_type(ty.name()) else {
            let error = Error::UnknownType {
                name: ty.name().into(),
            };
            return Err(ty.span().wrap(error));
        };
        if declared == Type::Void {
            return Err(ty.span().wrap(Error::VoidDeclaration));
        }

        // The initializer can't see the variable being declared.
        let initializer = match initializer {
            Some(expr) => {
                let expr = self.analyze_expr(expr, scope)?;
                Self::ensure_assignable(&expr, declared)?;
                Some(expr)
            }
            None => None,
        };

        if scope.define(&name.name, declared).is_some() {
            let error = Error::Redeclaration {
                name: name.name.clone(),
            };
            return Err(name.span.wrap(error));
        }
        trace!("bound {name}: {declared} (depth {})", scope.depth());

        Ok(StmtKind::Declaration {
            name,
            ty: declared,
            initializer,
        })
    }

    fn analyze_predicate(&self, predicate: Expr<Untyped>, scope: &Scope<'_>) -> Result<Expr<Typed>> {
        let predicate = self.analyze_expr(predicate, scope)?;
        if predicate.info != Type::Boolean {
            let error = Error::NonBooleanCondition {
                actual: predicate.info,
            };
            return Err(predicate.span.wrap(error));
        }
        Ok(predicate)
    }

    fn analyze_expr(&self, expr: Expr<Untyped>, scope: &Scope<'_>) -> Result<Expr<Typed>> {
        let span = expr.span;
        let (kind, ty) = match expr.kind {
            ExprKind::Literal(raw) => {
                let literal = Self::check_literal(raw).map_err(|e| span.wrap(e))?;
                let ty = literal.ty();
                (ExprKind::Literal(literal), ty)
            }
            ExprKind::Group(inner) => {
                let inner = self.analyze_expr(*inner, scope)?;
                let ty = inner.info;
                (ExprKind::Group(Box::new(inner)), ty)
            }
            ExprKind::Binary { op, lhs, rhs } => {
                let lhs = self.analyze_expr(*lhs, scope)?;
                let rhs = self.analyze_expr(*rhs, scope)?;
                let Some(ty) = Self::binary_type(op, lhs.info, rhs.info) else {
                    let error = Error::IncompatibleOperandTypes {
                        op,
                        lhs: lhs.info,
                        rhs: rhs.info,
                    };
                    return Err(span.wrap(error));
                };
                let kind = ExprKind::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                };
                (kind, ty)
            }
            ExprKind::Variable(ident) => {
                let Some(ty) = scope.lookup(&ident.name) else {
                    return Err(Self::undeclared(&ident));
                };
                (ExprKind::Variable(ident), ty)
            }
            ExprKind::Call { name, args, .. } => {
                let Some(signature) = self.catalog.lookup_function(&name.name, args.len()) else {
                    let error = Error::UnknownFunction {
                        name: name.name.clone(),
                        arity: args.len(),
                    };
                    return Err(span.wrap(error));
                };

                let args = args
                    .into_iter()
                    .zip(signature.params.iter())
                    .map(|(arg, &param)| {
                        let arg = self.analyze_expr(arg, scope)?;
                        if !arg.info.is_assignable_to(param) {
                            let error = Error::ArgumentTypeMismatch {
                                expected: param,
                                actual: arg.info,
                            };
                            return Err(arg.span.wrap(error));
                        }
                        Ok(arg)
                    })
                    .collect::<Result<Vec<_>>>()?;

                let kind = ExprKind::Call {
                    name,
                    args,
                    callee: signature.host_name.clone(),
                };
                (kind, signature.ret)
            }
        };
        Ok(Expr {
            kind,
            span,
            info: ty,
        })
    }

    fn check_literal(raw: RawLiteral) -> Result<Literal, Error> {
        let literal = match raw {
            RawLiteral::Bool(b) => Literal::Bool(b),
            RawLiteral::Integer(digits) => {
                let value = digits.parse().map_err(|_| Error::IntegerOutOfRange)?;
                Literal::Integer(value)
            }
            RawLiteral::Decimal(digits) => {
                let value = BoundedDecimal::new(&digits).ok_or(Error::DecimalOutOfRange)?;
                Literal::Decimal(value)
            }
            RawLiteral::String(contents) => {
                let value = ValidString::new(&contents).map_err(Error::InvalidStringCharacter)?;
                Literal::String(value)
            }
        };
        Ok(literal)
    }

    fn binary_type(op: BinaryOperator, lhs: Type, rhs: Type) -> Option<Type> {
        if op.is_equality() {
            (lhs == rhs && lhs != Type::Void).then_some(Type::Boolean)
        } else {
            lhs.widen(rhs)
        }
    }

    fn ensure_assignable(value: &Expr<Typed>, target: Type) -> Result<()> {
        if value.info.is_assignable_to(target) {
            Ok(())
        } else {
            let error = Error::NotAssignable {
                src: value.info,
                dst: target,
            };
            Err(value.span.wrap(error))
        }
    }

    fn undeclared(ident: &Ident) -> Spanned<Error> {
        ident.span.wrap(Error::UndeclaredVariable {
            name: ident.name.clone(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("empty source")]
    EmptySource,
    #[error("expression statement must be a function call")]
    NotAStatementExpression,
    #[error("unknown type `{name}`")]
    UnknownType { name: Box<str> },
    #[error("variable can't be declared as VOID")]
    VoidDeclaration,
    #[error("`{name}` is reserved in the generated Java")]
    ReservedName { name: Box<str> },
    #[error("variable `{name}` is already declared in this scope")]
    Redeclaration { name: Box<str> },
    #[error("undeclared variable `{name}`")]
    UndeclaredVariable { name: Box<str> },
    #[error("type {src} is not assignable to {dst}")]
    NotAssignable { src: Type, dst: Type },
    #[error("condition must be BOOLEAN, but got {actual}")]
    NonBooleanCondition { actual: Type },
    #[error("THEN branch can't be empty")]
    EmptyThenBranch,
    #[error("integer literal out of range")]
    IntegerOutOfRange,
    #[error("decimal literal out of range")]
    DecimalOutOfRange,
    #[error("invalid character {0:?} in string")]
    InvalidStringCharacter(char),
    #[error("incompatible operand types {lhs} and {rhs} for `{op}`")]
    IncompatibleOperandTypes {
        op: BinaryOperator,
        lhs: Type,
        rhs: Type,
    },
    #[error("unknown function `{name}` with {arity} arguments")]
    UnknownFunction { name: Box<str>, arity: usize },
    #[error("argument of type {actual} is not assignable to parameter of type {expected}")]
    ArgumentTypeMismatch { expected: Type, actual: Type },
}
