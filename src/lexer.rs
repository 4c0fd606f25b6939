use std::str::Chars;

use log::debug;

use crate::token::{Span, Spanned, Token, TokenKind};

pub const SUGGESTED_TOKENS_CAPACITY: usize = 1_024;

type Result<T, E = Spanned<Error>> = std::result::Result<T, E>;

/// Lexes the provided string, producing the tokens into the provided buffer.
///
/// The last token is always [`TokenKind::Eof`]. Whitespace is never
/// produced.
pub fn lex(src: &str, tokens: &mut Vec<Token>) -> Result<()> {
    Lexer::new(src, tokens).lex()
}

/// A convenience function that allocates a new buffer per lexed input and
/// returns it.
pub fn lex_in_new(src: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::with_capacity(SUGGESTED_TOKENS_CAPACITY);
    lex(src, &mut tokens)?;
    Ok(tokens)
}

struct Lexer<'src, 'tok> {
    src: &'src str,
    iter: Chars<'src>,
    cursor: usize,
    current_lo: usize,
    tokens: &'tok mut Vec<Token>,
}

impl Lexer<'_, '_> {
    /// Scans the source string until the input is exhausted or the first
    /// error is found.
    fn lex(mut self) -> Result<()> {
        assert_eq!(self.tokens.len(), 0, "must pass clean tokens buffer");
        loop {
            self.whitespace();
            if self.is_at_end() {
                self.current_lo = self.cursor;
                self.produce(TokenKind::Eof);
                break;
            }
            let next = self.scan_token_kind()?;
            self.produce(next);
        }
        debug!("lexed {} tokens", self.tokens.len());
        Ok(())
    }

    /// Tries to scan the current character.
    fn scan_token_kind(&mut self) -> Result<TokenKind> {
        use TokenKind::*;
        let kind = match self.mark_advance() {
            '"' => self.string()?,
            c if c.is_ascii_digit() => self.number()?,
            c if c.is_ascii_alphabetic() || c == '_' => self.identifier(),
            '=' => match self.peek() {
                '=' => self.advance_with(EqEq),
                _ => Assign,
            },
            '!' => match self.peek() {
                '=' => self.advance_with(BangEq),
                _ => Bang,
            },
            ':' => Colon,
            ';' => Semicolon,
            ',' => Comma,
            '(' => LParen,
            ')' => RParen,
            '+' => Plus,
            '-' => Minus,
            '*' => Star,
            '/' => Slash,
            c => return Err(self.span().wrap(Error::UnexpectedChar(c))),
        };
        Ok(kind)
    }

    /// Lexes a string token, which runs up to the next quotation mark. There
    /// are no escape sequences.
    fn string(&mut self) -> Result<TokenKind> {
        loop {
            if self.is_at_end() {
                return Err(self.span().wrap(Error::UnclosedString));
            }
            if self.advance() == '"' {
                return Ok(TokenKind::String);
            }
        }
    }

    /// Lexes an integer or a decimal. A dot only belongs to the number if a
    /// digit follows it.
    fn number(&mut self) -> Result<TokenKind> {
        let mut kind = TokenKind::Integer;
        self.digits();
        while self.peek() == '.' && self.peek_nth(1).is_ascii_digit() {
            let (_, dot_span) = self.advance_with_span();
            if kind == TokenKind::Decimal {
                return Err(dot_span.wrap(Error::MultipleDecimalPoints));
            }
            kind = TokenKind::Decimal;
            self.digits();
        }
        Ok(kind)
    }

    fn digits(&mut self) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }
    }

    fn identifier(&mut self) -> TokenKind {
        let valid_identifier_suffix = |c: char| c.is_ascii_alphanumeric() || c == '_';
        while valid_identifier_suffix(self.peek()) {
            self.advance();
        }
        TokenKind::Identifier
    }

    fn whitespace(&mut self) {
        while matches!(self.peek(), ' ' | '\t' | '\r' | '\n') {
            self.advance();
        }
    }
}

impl Lexer<'_, '_> {
    /// Constructs a new lexer with the default state.
    fn new<'src, 'tok>(src: &'src str, tokens: &'tok mut Vec<Token>) -> Lexer<'src, 'tok> {
        Lexer {
            src,
            iter: src.chars(),
            cursor: 0,
            current_lo: 0,
            tokens,
        }
    }

    fn is_at_end(&self) -> bool {
        self.cursor >= self.src.len()
    }

    /// Starts a new token "mark" and advances the iterator.
    fn mark_advance(&mut self) -> char {
        self.current_lo = self.cursor;
        self.advance()
    }

    /// Returns the next char and advances the iterator.
    fn advance(&mut self) -> char {
        self.iter
            .next()
            .inspect(|c| self.cursor += c.len_utf8())
            .unwrap_or('\0')
    }

    /// Advances and returns the provided value.
    fn advance_with<T>(&mut self, value: T) -> T {
        self.advance();
        value
    }

    /// Returns the next char (with its span) and advances the iterator.
    fn advance_with_span(&mut self) -> (char, Span) {
        let lo = self.cursor;
        let char = self.advance();
        let hi = lo + char.len_utf8();
        let span = Span::new_of_bounds(lo..hi);
        (char, span)
    }

    /// Returns the next char without advancing the iterator.
    fn peek(&self) -> char {
        self.peek_nth(0)
    }

    /// Returns the char `n` positions ahead without advancing the iterator.
    fn peek_nth(&self, n: usize) -> char {
        self.iter.clone().nth(n).unwrap_or('\0')
    }

    /// Returns the current span.
    fn span(&self) -> Span {
        Span::new_of_bounds(self.current_lo..self.cursor)
    }

    /// Produces a token using the marked bounds.
    fn produce(&mut self, kind: TokenKind) {
        let token = Token::new(kind, self.span());
        self.tokens.push(token);
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("unclosed string")]
    UnclosedString,
    #[error("multiple decimal points in number")]
    MultipleDecimalPoints,
    #[error("unexpected character {0:?}")]
    UnexpectedChar(char),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_demo_program_no_errors() {
        let input = include_str!("../demos/big.plc");
        assert!(lex_in_new(input).is_ok());
    }

    #[test]
    fn tests_with_span() {
        use TokenKind::*;
        let cases = cases!(match .. {
            "+-*/" => [
                (Plus, 0..1),
                (Minus, 1..2),
                (Star, 2..3),
                (Slash, 3..4),
                (Eof, 4..4),
            ],
            "= == ! != =!=" => [
                (Assign, 0..1),
                (EqEq, 2..4),
                (Bang, 5..6),
                (BangEq, 7..9),
                (Assign, 10..11),
                (BangEq, 11..13),
                (Eof, 13..13),
            ],
            "LET x : INTEGER = 5 ;" => [
                (Identifier, 0..3),
                (Identifier, 4..5),
                (Colon, 6..7),
                (Identifier, 8..15),
                (Assign, 16..17),
                (Integer, 18..19),
                (Semicolon, 20..21),
                (Eof, 21..21),
            ],
            "1 12 1.5 007.250 3." => [
                (Integer, 0..1),
                (Integer, 2..4),
                (Decimal, 5..8),
                (Decimal, 9..16),
                (Integer, 17..18),
            ],
            "f _foo foo_1 B9 9B" => [
                (Identifier, 0..1),
                (Identifier, 2..6),
                (Identifier, 7..12),
                (Identifier, 13..15),
                (Integer, 16..17),
                (Identifier, 17..18),
                (Eof, 18..18),
            ],
            r#""" "hi there" "a#b""# => [
                (String, 0..2),
                (String, 3..13),
                (String, 14..19),
                (Eof, 19..19),
            ],
            "print(a,b);" => [
                (Identifier, 0..5),
                (LParen, 5..6),
                (Identifier, 6..7),
                (Comma, 7..8),
                (Identifier, 8..9),
                (RParen, 9..10),
                (Semicolon, 10..11),
                (Eof, 11..11),
            ],
            " \t\r\n" => [(Eof, 4..4)],
            "" => [(Eof, 0..0)],
        });

        for (input, tokens) in cases {
            // The `3.` case fails on the trailing dot, so only compare the
            // tokens lexed before it.
            let mut lexed = Vec::new();
            let result = lex(input, &mut lexed);
            if *input == "1 12 1.5 007.250 3." {
                assert_eq!(
                    result,
                    Err(Span::new_of_length(18, 1).wrap(Error::UnexpectedChar('.')))
                );
            } else {
                assert_eq!(result, Ok(()));
            }
            assert_eq!(lexed, tokens.as_slice());
        }
    }

    #[test]
    fn test_errors() {
        let cases = [
            (r#""unclosed"#, 0..9, Error::UnclosedString),
            (r#"x = "a" + "b"#, 10..12, Error::UnclosedString),
            ("1.2.3", 3..4, Error::MultipleDecimalPoints),
            ("x # y", 2..3, Error::UnexpectedChar('#')),
            ("a.b", 1..2, Error::UnexpectedChar('.')),
            ("{", 0..1, Error::UnexpectedChar('{')),
        ];
        for (input, range, error) in cases {
            let expected = Span::new_of_bounds(range).wrap(error);
            assert_eq!(lex_in_new(input), Err(expected), "input: {input:?}");
        }
    }

    #[test]
    fn test_error_display() {
        let error = lex_in_new("1.2.3").unwrap_err();
        assert_eq!(format!("{error}"), "multiple decimal points in number");
        assert_eq!(format!("{error:#}"), "3..4: multiple decimal points in number");
    }

    macro_rules! cases {
        (match .. {
            $($str:expr => [$(($kind:expr, $range:expr)),* $(,)?]),* $(,)?
        }) => {{
            &[$((
                $str,
                vec![
                    $(Token::new($kind, Span::new_of_bounds($range.start..$range.end))),*
                ],
            )),*]
        }};
    }
    use cases;
}
