/// The lexer takes the source input, mapping it into a sequence of tokens.
pub mod lexer;

/// The parser takes a sequence of tokens, mapping it into an AST.
pub mod parser;

/// The analyzer takes an untyped AST, resolves its names and checks its types
/// against a [`Catalog`](catalog::Catalog), and maps it into a typed AST.
pub mod analyzer;

/// The generator maps a typed AST into Java source.
pub mod codegen;

pub mod ast;
pub mod catalog;
pub mod scope;
pub mod token;
pub mod types;

pub mod util {
    pub mod fmt;
    #[cfg(test)]
    pub(crate) mod test_utils;
}

use crate::{
    catalog::Catalog,
    codegen::Options,
    scope::Scope,
    token::{Span, Spanned},
};

/// Compiles `src` to Java with the standard catalog and default options.
pub fn compile(src: &str) -> Result<String, CompileError> {
    compile_with(src, Catalog::standard(), &Options::default())
}

/// Runs the whole pipeline. Every compilation starts from a fresh scope, so
/// nothing leaks from one to the next.
pub fn compile_with(src: &str, catalog: &Catalog, options: &Options) -> Result<String, CompileError> {
    let tokens = lexer::lex_in_new(src)?;
    let source = parser::parse(src, &tokens)?;
    let typed = analyzer::analyze(source, catalog, &mut Scope::new())?;
    Ok(codegen::generate(&typed, catalog, options))
}

/// The first error found by any stage.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error(transparent)]
    Lex(#[from] Spanned<lexer::Error>),
    #[error(transparent)]
    Parse(#[from] Spanned<parser::Error>),
    #[error(transparent)]
    Analysis(#[from] Spanned<analyzer::Error>),
}

impl CompileError {
    pub fn span(&self) -> Span {
        match self {
            CompileError::Lex(e) => e.span,
            CompileError::Parse(e) => e.span,
            CompileError::Analysis(e) => e.span,
        }
    }

    /// Renders the error with the source line it points into.
    pub fn render(&self, src: &str) -> String {
        util::fmt::error::render(src, self.span(), self)
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_compile_declaration_and_assignment() {
        let java = compile("LET x : INTEGER = 5 ; x = x + 1 ;").unwrap();
        let expected = indoc! {"
            public final class Main {

                public static void main(String[] args) {
                    int x = 5;
                    x = x + 1;
                }

            }
        "};
        assert_eq!(java, expected);
    }

    #[test]
    fn test_compile_if() {
        let java = compile("IF TRUE THEN LET y : BOOLEAN = FALSE ; END").unwrap();
        assert!(java.contains("        if (true) {\n            boolean y = false;\n        }\n"));
    }

    #[test]
    fn test_compile_print() {
        let java = compile(r#"print("hello");"#).unwrap();
        assert!(java.contains("        System.out.println(\"hello\");\n"));
    }

    #[test]
    fn test_compile_is_deterministic() {
        let src = include_str!("../demos/big.plc");
        assert_eq!(compile(src), compile(src));
    }

    #[test]
    fn test_compilations_are_isolated() {
        assert!(compile("LET x : INTEGER = 1;").is_ok());
        let error = compile("x = 2;").unwrap_err();
        assert_eq!(format!("{error:#}"), "0..1: undeclared variable `x`");
    }

    #[test]
    fn test_errors_from_every_stage() {
        let lex = compile("print(#);").unwrap_err();
        assert!(matches!(lex, CompileError::Lex(_)));
        assert_eq!(format!("{lex:#}"), "6..7: unexpected character '#'");

        let parse = compile("").unwrap_err();
        assert!(matches!(parse, CompileError::Parse(_)));
        assert_eq!(parse.to_string(), "empty source");

        let analysis = compile("LET x : INTEGER = 2147483648;").unwrap_err();
        assert!(matches!(analysis, CompileError::Analysis(_)));
        assert_eq!(analysis.span(), Span::new_of_bounds(18..28));
    }

    #[test]
    fn test_boundaries() {
        assert!(compile("LET x : INTEGER = 2147483647;").is_ok());
        assert!(compile("WHILE FALSE DO END").is_ok());
        assert!(compile(r##"print("#");"##).is_err());
        assert!(compile("LET b : ANY = TRUE; LET s : ANY = \"s\";").is_ok());
        assert!(compile("LET v : ANY = print(1);").is_err());
    }

    #[test]
    fn test_names_must_be_valid_in_both_languages() {
        let keyword = compile("LET END : INTEGER = 1; END = 2;").unwrap_err();
        assert!(matches!(keyword, CompileError::Parse(_)));
        assert_eq!(format!("{keyword:#}"), "4..7: keyword END can't be used as a name");

        let java = compile("LET class : INTEGER = 1; LET new : STRING;").unwrap_err();
        assert!(matches!(java, CompileError::Analysis(_)));
        assert_eq!(java.span(), Span::new_of_bounds(4..9));

        let java = compile("LET clazz : INTEGER = 1; LET fresh : STRING;").unwrap();
        assert!(java.contains("        int clazz = 1;\n        String fresh;\n"));
    }

    #[test]
    fn test_render() {
        let src = "LET x : INTEGER = 1;\nIF x THEN print(x); END\n";
        let error = compile(src).unwrap_err();
        let expected = indoc! {"
            error: condition must be BOOLEAN, but got INTEGER
             --> line 2, col 4
              |
            2 | IF x THEN print(x); END
              |    ^"};
        assert_eq!(error.render(src), expected);
    }
}
