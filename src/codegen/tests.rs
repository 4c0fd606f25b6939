use indoc::indoc;
use pretty_assertions::assert_eq;

use crate::{
    analyzer,
    catalog::Catalog,
    codegen::{generate, Options},
    parser,
    scope::Scope,
    types::Type,
};

fn java_with(src: &str, catalog: &Catalog, options: &Options) -> String {
    let source = parser::parse_program(src, &mut Vec::new()).unwrap();
    let typed = analyzer::analyze(source, catalog, &mut Scope::new()).unwrap();
    generate(&typed, catalog, options)
}

fn java(src: &str) -> String {
    java_with(src, Catalog::standard(), &Options::default())
}

/// Body of `main`, dedented.
fn main_body(src: &str) -> String {
    let code = java(src);
    let lines: Vec<_> = code.lines().collect();
    // Class header, blank line and `main` header; closing `}`, blank line and
    // class `}`.
    lines[3..lines.len() - 3]
        .iter()
        .map(|&line| format!("{}\n", line.strip_prefix("        ").unwrap_or(line)))
        .collect()
}

#[test]
fn test_declaration_and_assignment() {
    let code = java("LET x : INTEGER = 5 ; x = x + 1 ;");
    let expected = indoc! {"
        public final class Main {

            public static void main(String[] args) {
                int x = 5;
                x = x + 1;
            }

        }
    "};
    assert_eq!(code, expected);
}

#[test]
fn test_if_without_else() {
    let body = main_body("IF TRUE THEN LET y : BOOLEAN = FALSE ; END");
    let expected = indoc! {"
        if (true) {
            boolean y = false;
        }
    "};
    assert_eq!(body, expected);
}

#[test]
fn test_if_with_else_and_nesting() {
    let src = r#"
        LET n : INTEGER = 3;
        IF n == 3 THEN
            WHILE n != 0 DO
                n = n - 1;
            END
        ELSE
            print("other");
        END
    "#;
    let expected = indoc! {r#"
        int n = 3;
        if (n == 3) {
            while (n != 0) {
                n = n - 1;
            }
        } else {
            System.out.println("other");
        }
    "#};
    assert_eq!(main_body(src), expected);
}

#[test]
fn test_print() {
    let body = main_body(r#"print("hello");"#);
    assert_eq!(body, "System.out.println(\"hello\");\n");
}

#[test]
fn test_expressions() {
    let src = "LET d : DECIMAL = (1 + 2.50) * max(1, 007.5) / 2;";
    let body = main_body(src);
    assert_eq!(body, "double d = (1 + 2.50) * Math.max(1, 7.5) / 2;\n");
}

#[test]
fn test_declarations_without_initializer() {
    let src = r#"LET s : STRING; LET a : ANY = "x"; LET b : BOOLEAN;"#;
    let expected = indoc! {r#"
        String s;
        Object a = "x";
        boolean b;
    "#};
    assert_eq!(main_body(src), expected);
}

#[test]
fn test_empty_while() {
    let body = main_body("WHILE FALSE DO END");
    assert_eq!(body, "while (false) {\n}\n");
}

#[test]
fn test_options() {
    let options = Options {
        class_name: "Program".to_owned(),
        indent_width: 2,
    };
    let code = java_with("IF TRUE THEN print(1); END", Catalog::standard(), &options);
    let expected = indoc! {"
        public final class Program {

          public static void main(String[] args) {
            if (true) {
              System.out.println(1);
            }
          }

        }
    "};
    assert_eq!(code, expected);
}

#[test]
fn test_catalog_host_names() {
    let mut catalog = Catalog::standard().clone();
    catalog
        .set_host_type(Type::Integer, "long")
        .define_function("twice", &[Type::Integer], Type::Integer, "Util.twice");
    let code = java_with("LET x : INTEGER = twice(2);", &catalog, &Options::default());
    assert!(code.contains("        long x = Util.twice(2);\n"));
}

#[test]
fn test_output_is_well_formed() {
    let code = java(include_str!("../../demos/big.plc"));

    let opening = code.matches('{').count();
    let closing = code.matches('}').count();
    assert_eq!(opening, closing);

    for line in code.lines().map(str::trim).filter(|line| !line.is_empty()) {
        assert!(
            line.ends_with(';') || line.ends_with('{') || line.ends_with('}'),
            "unterminated line: {line:?}"
        );
    }
}
