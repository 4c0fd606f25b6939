use std::{fmt, ops::Range};

#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    lo: usize,
    len: u32,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Token {
        Token {
            kind,
            len: span.len,
            lo: span.lo,
        }
    }

    pub fn span(&self) -> Span {
        Span {
            len: self.len,
            lo: self.lo,
        }
    }

    /// Returns the source text covered by this token.
    pub fn text<'src>(&self, src: &'src str) -> &'src str {
        self.span().substr(src)
    }

    /// Interprets the token as a keyword, if it is an identifier spelling one.
    pub fn keyword(&self, src: &str) -> Option<Keyword> {
        if self.kind != TokenKind::Identifier {
            return None;
        }
        KEYWORDS.get(self.text(src)).copied()
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token({:?}, {})", self.kind, self.span())
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Span {
    pub len: u32,
    pub lo: usize,
}

impl Span {
    pub fn new_of_bounds(Range { start: lo, end: hi }: Range<usize>) -> Span {
        debug_assert!(hi >= lo);
        Self::new_of_length(lo, u32::try_from(hi - lo).unwrap())
    }

    pub const fn new_of_length(lo: usize, len: u32) -> Span {
        Span { len, lo }
    }

    pub fn hi(&self) -> usize {
        self.lo + self.len as usize
    }

    /// Returns a span covering both `self` and `other` (and anything in
    /// between).
    pub fn to(self, other: Span) -> Span {
        let lo = self.lo.min(other.lo);
        let hi = self.hi().max(other.hi());
        Span::new_of_bounds(lo..hi)
    }

    /// Shrinks or grows the span bounds by the given increments.
    pub fn offset(self, lo: isize, hi: isize) -> Span {
        let new_lo = self.lo.checked_add_signed(lo).unwrap();
        let new_hi = self.hi().checked_add_signed(hi).unwrap();
        Span::new_of_bounds(new_lo..new_hi)
    }

    pub fn substr(self, src: &str) -> &str {
        &src[self.lo..self.hi()]
    }

    pub fn wrap<T>(self, inner: T) -> Spanned<T> {
        Spanned { span: self, inner }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Span({self}, len: {})", self.len)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lo = self.lo;
        let hi = self.hi();
        write!(f, "{lo}..{hi}")
    }
}

/// A value tagged with the source span it refers to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Spanned<T> {
    pub span: Span,
    pub inner: T,
}

/// Shows the inner value. With the alternate flag (`{:#}`), the span is
/// prepended as in `4..5: message`.
impl<T: fmt::Display> fmt::Display for Spanned<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write!(f, "{}: ", self.span)?;
        }
        write!(f, "{}", self.inner)
    }
}

impl<T: std::error::Error> std::error::Error for Spanned<T> {}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    Integer,
    Decimal,
    String,

    /// `=`
    Assign,
    /// `==`
    EqEq,
    /// `!`
    Bang,
    /// `!=`
    BangEq,
    Colon,
    Semicolon,
    Comma,
    LParen,
    RParen,
    Plus,
    Minus,
    Star,
    Slash,

    Eof,
}

/// Reserved words. The lexer never produces these: they are identifiers
/// whose text the parser recognizes (see [`Token::keyword`]).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Keyword {
    Let,
    If,
    Then,
    Else,
    End,
    While,
    Do,
    True,
    False,
}

impl Keyword {
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Let => "LET",
            Keyword::If => "IF",
            Keyword::Then => "THEN",
            Keyword::Else => "ELSE",
            Keyword::End => "END",
            Keyword::While => "WHILE",
            Keyword::Do => "DO",
            Keyword::True => "TRUE",
            Keyword::False => "FALSE",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Keywords are case sensitive.
pub static KEYWORDS: phf::Map<&'static str, Keyword> = phf::phf_map! {
    "LET" => Keyword::Let,
    "IF" => Keyword::If,
    "THEN" => Keyword::Then,
    "ELSE" => Keyword::Else,
    "END" => Keyword::End,
    "WHILE" => Keyword::While,
    "DO" => Keyword::Do,
    "TRUE" => Keyword::True,
    "FALSE" => Keyword::False,
};
