use std::fmt::Write;

use crate::token::Span;

/// Position of a byte offset, both 1-based. Columns count characters.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LineCol {
    pub line: usize,
    pub col: usize,
}

/// Locates `offset` in `src`. Offsets past the end map to the end.
pub fn line_col(src: &str, offset: usize) -> LineCol {
    let offset = offset.min(src.len());
    let before = &src[..offset];
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    LineCol {
        line: before.matches('\n').count() + 1,
        col: before[line_start..].chars().count() + 1,
    }
}

/// Renders `message` with the source line `span` starts on, underlining the
/// span (up to the end of that line):
///
/// ```text
/// error: undeclared variable `y`
///  --> line 2, col 1
///   |
/// 2 | y = 2;
///   | ^
/// ```
pub fn render(src: &str, span: Span, message: impl std::fmt::Display) -> String {
    let LineCol { line, col } = line_col(src, span.lo);

    let lo = span.lo.min(src.len());
    let line_start = src[..lo].rfind('\n').map_or(0, |i| i + 1);
    let line_end = src[lo..].find('\n').map_or(src.len(), |i| lo + i);
    let text = src[line_start..line_end].trim_end_matches('\r');

    let hi = span.hi().clamp(lo, line_end);
    let carets = src[lo..hi].chars().count().max(1);

    let gutter = line.to_string().len();
    let mut out = String::new();
    // Writing into a `String` never fails.
    _ = writeln!(out, "error: {message}");
    _ = writeln!(out, "{:gutter$}--> line {line}, col {col}", "");
    _ = writeln!(out, "{:gutter$} |", "");
    _ = writeln!(out, "{line} | {text}");
    _ = write!(out, "{:gutter$} | {:pad$}{}", "", "", "^".repeat(carets), pad = col - 1);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col() {
        let src = "ab\ncd\n\nxé";
        assert_eq!(line_col(src, 0), LineCol { line: 1, col: 1 });
        assert_eq!(line_col(src, 2), LineCol { line: 1, col: 3 });
        assert_eq!(line_col(src, 3), LineCol { line: 2, col: 1 });
        assert_eq!(line_col(src, 7), LineCol { line: 4, col: 1 });
        assert_eq!(line_col(src, src.len()), LineCol { line: 4, col: 3 });
        assert_eq!(line_col(src, 1_000), LineCol { line: 4, col: 3 });
    }

    #[test]
    fn test_render() {
        let src = "LET x : INTEGER = 1;\ny = 2;\n";
        let rendered = render(src, Span::new_of_length(21, 1), "undeclared variable `y`");
        let expected = indoc::indoc! {"
            error: undeclared variable `y`
             --> line 2, col 1
              |
            2 | y = 2;
              | ^"};
        pretty_assertions::assert_eq!(rendered, expected);
    }

    #[test]
    fn test_render_underlines_whole_span() {
        let src = "LET x : INTEGER = 1.5;";
        let rendered = render(src, Span::new_of_length(18, 3), "mismatch");
        assert!(rendered.ends_with("1 | LET x : INTEGER = 1.5;\n  |                   ^^^"));
    }

    #[test]
    fn test_render_at_eof() {
        let src = "x = 1";
        let rendered = render(src, Span::new_of_length(5, 0), "expected token Semicolon");
        assert!(rendered.ends_with("1 | x = 1\n  |      ^"));
    }
}
