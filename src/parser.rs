use std::fmt;

use log::debug;

use crate::{
    ast::{BinaryOperator, Expr, ExprKind, Ident, RawLiteral, Source, Stmt, StmtKind, TypeName, Untyped},
    lexer,
    token::{Keyword, Span, Spanned, Token, TokenKind},
};

type Result<T, E = Spanned<Error>> = std::result::Result<T, E>;

/// Lexes and parses the provided source, writing the tokens into the given
/// buffer.
pub fn parse_program(src: &str, tokens: &mut Vec<Token>) -> Result<Source<Untyped>> {
    tokens.clear();
    lexer::lex(src, tokens).map_err(|e| e.span.wrap(Error::Lexer(e.inner)))?;
    parse(src, tokens)
}

/// Parses an already lexed source.
pub fn parse(src: &str, tokens: &[Token]) -> Result<Source<Untyped>> {
    let mut p = Parser::new(src, tokens);
    let source = p.parse_source()?;
    debug!("parsed {} top-level statements", source.statements.len());
    Ok(source)
}

struct Parser<'src, 'tok> {
    src: &'src str,
    tokens: &'tok [Token],
    cursor: usize,
}

impl Parser<'_, '_> {
    fn parse_source(&mut self) -> Result<Source<Untyped>> {
        let mut statements = Vec::with_capacity(16);
        while !self.is(TokenKind::Eof) {
            statements.push(self.parse_stmt()?);
        }
        if statements.is_empty() {
            let s = Span::new_of_bounds(0..self.src.len());
            return Err(s.wrap(Error::EmptySource));
        }
        Ok(Source { statements })
    }

    fn parse_stmt(&mut self) -> Result<Stmt<Untyped>> {
        let current = self.peek();
        match current.keyword(self.src) {
            Some(Keyword::Let) => self.parse_declaration(),
            Some(Keyword::If) => self.parse_if(),
            Some(Keyword::While) => self.parse_while(),
            _ if current.kind == TokenKind::Identifier
                && self.peek_nth(1).kind == TokenKind::Assign =>
            {
                self.parse_assignment()
            }
            _ => self.parse_expr_stmt(),
        }
    }

    fn parse_declaration(&mut self) -> Result<Stmt<Untyped>> {
        let start = self.consume_keyword(Keyword::Let)?;
        let name = self.parse_ident()?;
        self.consume(TokenKind::Colon)?;
        let ty = self.parse_ident().map(TypeName)?;
        let initializer = if self.take(TokenKind::Assign) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        let end = self.consume(TokenKind::Semicolon)?;

        Ok(Stmt {
            kind: StmtKind::Declaration {
                name,
                ty,
                initializer,
            },
            span: start.span().to(end.span()),
        })
    }

    fn parse_assignment(&mut self) -> Result<Stmt<Untyped>> {
        let target = self.parse_ident()?;
        self.consume(TokenKind::Assign)?;
        let value = self.parse_expr()?;
        let end = self.consume(TokenKind::Semicolon)?;

        let span = target.span.to(end.span());
        Ok(Stmt {
            kind: StmtKind::Assignment { target, value },
            span,
        })
    }

    fn parse_if(&mut self) -> Result<Stmt<Untyped>> {
        let start = self.consume_keyword(Keyword::If)?;
        let predicate = self.parse_expr()?;
        self.consume_keyword(Keyword::Then)?;
        let then_arm = self.parse_block(&[Keyword::Else, Keyword::End])?;
        let else_arm = if self.take_keyword(Keyword::Else) {
            self.parse_block(&[Keyword::End])?
        } else {
            Vec::new()
        };
        let end = self.consume_keyword(Keyword::End)?;

        Ok(Stmt {
            kind: StmtKind::If {
                predicate,
                then_arm,
                else_arm,
            },
            span: start.span().to(end.span()),
        })
    }

    fn parse_while(&mut self) -> Result<Stmt<Untyped>> {
        let start = self.consume_keyword(Keyword::While)?;
        let predicate = self.parse_expr()?;
        self.consume_keyword(Keyword::Do)?;
        let body = self.parse_block(&[Keyword::End])?;
        let end = self.consume_keyword(Keyword::End)?;

        Ok(Stmt {
            kind: StmtKind::While { predicate, body },
            span: start.span().to(end.span()),
        })
    }

    fn parse_expr_stmt(&mut self) -> Result<Stmt<Untyped>> {
        let expr = self.parse_expr()?;
        let end = self.consume(TokenKind::Semicolon)?;

        let span = expr.span.to(end.span());
        Ok(Stmt {
            kind: StmtKind::Expr(expr),
            span,
        })
    }

    /// Parses statements until one of the `end` keywords (or the end of
    /// input) is found. Does **NOT** consume the terminating keyword.
    fn parse_block(&mut self, end: &[Keyword]) -> Result<Vec<Stmt<Untyped>>> {
        let mut statements = Vec::new();
        loop {
            let current = self.peek();
            let at_end = current
                .keyword(self.src)
                .is_some_and(|keyword| end.contains(&keyword));
            if at_end || current.is_eof() {
                break;
            }
            statements.push(self.parse_stmt()?);
        }
        Ok(statements)
    }

    fn parse_ident(&mut self) -> Result<Ident> {
        let token = self.consume(TokenKind::Identifier)?;
        if let Some(keyword) = token.keyword(self.src) {
            return Err(token.span().wrap(Error::KeywordAsName { keyword }));
        }
        Ok(self.ident(token))
    }

    fn parse_expr(&mut self) -> Result<Expr<Untyped>> {
        self.parse_expr_bp(0)
    }

    fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Expr<Untyped>> {
        let lhs_token = self.advance();
        let mut lhs = self.parse_primary(lhs_token)?;

        loop {
            let op_token = self.peek();

            let Some((op, (lbp, rbp))) = Self::infix_binding_power(op_token.kind) else {
                // Not an infix operator
                break;
            };
            if lbp < min_bp {
                // Operator binds less tightly than the minimum required
                break;
            }

            self.advance(); // Operator
            let rhs = self.parse_expr_bp(rbp)?;

            let span = lhs.span.to(rhs.span);
            lhs = Expr {
                kind: ExprKind::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                span,
                info: (),
            };
        }

        Ok(lhs)
    }

    /// Parses the tokens that start an expression: literals, variables,
    /// calls and grouping.
    fn parse_primary(&mut self, token: Token) -> Result<Expr<Untyped>> {
        let (kind, span) = match token.kind {
            TokenKind::Identifier => match token.keyword(self.src) {
                Some(Keyword::True) => (ExprKind::Literal(RawLiteral::Bool(true)), token.span()),
                Some(Keyword::False) => (ExprKind::Literal(RawLiteral::Bool(false)), token.span()),
                Some(keyword) => {
                    let error = Error::UnexpectedKeywordInExpr { keyword };
                    return Err(token.span().wrap(error));
                }
                None => {
                    let name = self.ident(token);

                    // Call: ID ( [expr [, expr]*] )
                    if self.take(TokenKind::LParen) {
                        let args =
                            self.parse_list(TokenKind::RParen, TokenKind::Comma, Self::parse_expr)?;
                        let end = self.consume(TokenKind::RParen)?;
                        let span = token.span().to(end.span());
                        let call = ExprKind::Call {
                            name,
                            args,
                            callee: (),
                        };
                        (call, span)
                    } else {
                        (ExprKind::Variable(name), token.span())
                    }
                }
            },
            TokenKind::Integer => {
                let digits = token.text(self.src).into();
                (ExprKind::Literal(RawLiteral::Integer(digits)), token.span())
            }
            TokenKind::Decimal => {
                let digits = token.text(self.src).into();
                (ExprKind::Literal(RawLiteral::Decimal(digits)), token.span())
            }
            TokenKind::String => {
                let contents = token.span().offset(1, -1).substr(self.src).into();
                (ExprKind::Literal(RawLiteral::String(contents)), token.span())
            }

            // Grouping: ( expr )
            TokenKind::LParen => {
                let expr = self.parse_expr()?;
                let current = self.peek();
                if current.kind != TokenKind::RParen {
                    return Err(current.span().wrap(Error::UnclosedGroup));
                }
                self.advance();
                (ExprKind::Group(Box::new(expr)), token.span().to(current.span()))
            }

            other => {
                let error = Error::UnexpectedTokenInExpr { token: other };
                return Err(token.span().wrap(error));
            }
        };

        Ok(Expr {
            kind,
            span,
            info: (),
        })
    }

    /// Parses `[item (separator item)*]` until `end_delim` is found. Does
    /// **NOT** consume the end delimiter.
    fn parse_list<T>(
        &mut self,
        end_delim: TokenKind,
        separator: TokenKind,
        parse_item: impl Fn(&mut Self) -> Result<T>,
    ) -> Result<Vec<T>> {
        debug_assert_ne!(end_delim, separator);

        let mut items = Vec::new();
        if self.is(end_delim) {
            return Ok(items);
        }
        loop {
            items.push(parse_item(self)?);

            // After an item, either the separator (and another item) or the
            // end delimiter must follow.
            let c = self.peek();
            if c.kind == separator {
                self.advance();
            } else if c.kind == end_delim {
                break;
            } else {
                return Err(c.span().wrap(Error::UnexpectedAny {
                    actual: c.kind,
                    expected: Box::from([separator, end_delim]),
                }));
            }
        }
        Ok(items)
    }

    fn infix_binding_power(kind: TokenKind) -> Option<(BinaryOperator, (u8, u8))> {
        let bp = match kind {
            // Equality (left-associative)
            TokenKind::EqEq => (BinaryOperator::Eq, (1, 2)),
            TokenKind::BangEq => (BinaryOperator::NotEq, (1, 2)),

            // Addition/Subtraction (left-associative)
            TokenKind::Plus => (BinaryOperator::Add, (3, 4)),
            TokenKind::Minus => (BinaryOperator::Sub, (3, 4)),

            // Multiplication/Division (left-associative)
            TokenKind::Star => (BinaryOperator::Mul, (5, 6)),
            TokenKind::Slash => (BinaryOperator::Div, (5, 6)),

            _ => return None,
        };
        Some(bp)
    }
}

impl Parser<'_, '_> {
    fn new<'src, 'tok>(src: &'src str, tokens: &'tok [Token]) -> Parser<'src, 'tok> {
        Parser {
            src,
            tokens,
            cursor: 0,
        }
    }

    fn ident(&self, token: Token) -> Ident {
        debug_assert_eq!(token.kind, TokenKind::Identifier);
        Ident {
            name: token.text(self.src).into(),
            span: token.span(),
        }
    }

    /// Returns the current token.
    #[inline]
    fn peek(&self) -> Token {
        self.peek_nth(0)
    }

    /// Returns the token `n` positions ahead of the current one. Past the end
    /// of the stream, this is always EOF.
    fn peek_nth(&self, n: usize) -> Token {
        match self.tokens.get(self.cursor + n) {
            Some(token) => *token,
            None => Token::new(TokenKind::Eof, Span::new_of_length(self.src.len(), 0)),
        }
    }

    /// Returns the current token and advances.
    fn advance(&mut self) -> Token {
        let c = self.peek();
        if !c.is_eof() {
            self.cursor += 1;
        }
        c
    }

    /// Checks whether the current token matches the given one.
    fn is(&self, expect: TokenKind) -> bool {
        self.peek().kind == expect
    }

    /// Advances if the current token matches the provided one, returning true.
    /// If not, returns false and doesn't advance.
    fn take(&mut self, expect: TokenKind) -> bool {
        if self.is(expect) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Like [`Parser::take`], but for keywords.
    fn take_keyword(&mut self, expect: Keyword) -> bool {
        if self.peek().keyword(self.src) == Some(expect) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Advances if the current token matches the provided one. If not, fails.
    fn consume(&mut self, expect: TokenKind) -> Result<Token> {
        let c = self.peek();
        if c.kind == expect {
            self.advance();
            Ok(c)
        } else {
            Err(c.span().wrap(Error::Unexpected {
                actual: c.kind,
                expected: Expected::Token(expect),
            }))
        }
    }

    /// Advances if the current token is the provided keyword. If not, fails.
    fn consume_keyword(&mut self, expect: Keyword) -> Result<Token> {
        let c = self.peek();
        if c.keyword(self.src) == Some(expect) {
            self.advance();
            Ok(c)
        } else {
            Err(c.span().wrap(Error::Unexpected {
                actual: c.kind,
                expected: Expected::Keyword(expect),
            }))
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("expected {expected}, but got {actual:?}")]
    Unexpected {
        actual: TokenKind,
        expected: Expected,
    },
    #[error("expected one of {expected:?}, but got {actual:?}")]
    UnexpectedAny {
        actual: TokenKind,
        expected: Box<[TokenKind]>,
    },
    #[error("unexpected token {token:?} in expression")]
    UnexpectedTokenInExpr { token: TokenKind },
    #[error("unexpected keyword {keyword} in expression")]
    UnexpectedKeywordInExpr { keyword: Keyword },
    #[error("keyword {keyword} can't be used as a name")]
    KeywordAsName { keyword: Keyword },
    #[error("unclosed parenthesized expression")]
    UnclosedGroup,
    #[error("empty source")]
    EmptySource,
    #[error(transparent)]
    Lexer(#[from] lexer::Error),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Expected {
    Token(TokenKind),
    Keyword(Keyword),
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Token(kind) => write!(f, "token {kind:?}"),
            Expected::Keyword(keyword) => write!(f, "keyword {keyword}"),
        }
    }
}
