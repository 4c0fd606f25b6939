use crate::{
    analyzer,
    catalog::Catalog,
    parser,
    scope::Scope,
    token::Spanned,
    types::Type,
    util::fmt::tree,
};

pub fn format_error<E: std::fmt::Display>(e: &Spanned<E>) -> String {
    format!("{e:#}")
}

/// The standard catalog, plus a two-argument `print`.
pub fn test_catalog() -> Catalog {
    let mut catalog = Catalog::standard().clone();
    catalog.define_function("print", &[Type::Any, Type::Any], Type::Void, "Printer.print2");
    catalog
}

/// Each variant contains the input.
pub enum Test {
    Parser(&'static str),
    Analyzer(&'static str),
}

pub enum Assertion {
    TreeOk(&'static str),
    ExpectedErrors(&'static [&'static str]),
}

/// Runs the stages the test asks for, returning the printed tree (empty on
/// failure) and the formatted errors.
#[track_caller]
pub fn run_pipeline(test: Test) -> (String, Vec<String>) {
    let tokens_buf = &mut Vec::with_capacity(1024);

    match test {
        Test::Parser(input) => match parser::parse_program(input, tokens_buf) {
            Ok(source) => (tree::print_source_string(&source), vec![]),
            Err(error) => (String::new(), vec![format_error(&error)]),
        },
        Test::Analyzer(input) => {
            let source = match parser::parse_program(input, tokens_buf) {
                Ok(source) => source,
                Err(error) => return (String::new(), vec![format_error(&error)]),
            };
            let catalog = test_catalog();
            match analyzer::analyze(source, &catalog, &mut Scope::new()) {
                Ok(source) => (tree::print_source_string(&source), vec![]),
                Err(error) => (String::new(), vec![format_error(&error)]),
            }
        }
    }
}

#[track_caller]
pub fn run_assertion(
    assertion: Assertion,
    formatted_actual_tree: &str,
    formatted_actual_errors: &[String],
) {
    match assertion {
        Assertion::TreeOk(expected_tree) => {
            let expected_errors: &[&str] = &[];
            ::pretty_assertions::assert_eq!(formatted_actual_errors, expected_errors);
            ::pretty_assertions::assert_eq!(formatted_actual_tree.trim(), expected_tree.trim());
        }
        Assertion::ExpectedErrors(expected_errors) => {
            ::pretty_assertions::assert_eq!(formatted_actual_errors, expected_errors);
        }
    }
}

macro_rules! tree_tests {
    (
        use $test_kind:ident;

        $(
            fn $test_name:ident() {
                let source = $source:expr;
                $($assertions_tt:tt)*
            }
        )*
    ) => {
        $(
            #[test]
            fn $test_name() {
                let test: crate::util::test_utils::Test =
                    tree_tests!(@@get_test($test_kind), $source);
                let (formatted_actual_tree, formatted_actual_errors) =
                    crate::util::test_utils::run_pipeline(test);
                let ctx = (&formatted_actual_tree, &formatted_actual_errors);
                tree_tests!(@@expand_assertions, ctx, [$($assertions_tt)*]);
            }
        )*
    };

    (@@expand_assertions, $ctx:expr, []) => {};
    (@@expand_assertions, $ctx:expr, [
        let $assertion:ident = $assertion_expected:expr;
        $($rest_assertions_tt:tt)*
    ]) => {
        crate::util::test_utils::run_assertion(
            tree_tests!(@@assertion, $assertion, $assertion_expected),
            $ctx.0,
            $ctx.1,
        );
        tree_tests!(@@expand_assertions, $ctx, [$($rest_assertions_tt)*]);
    };

    (@@assertion, tree_ok, $expected:expr) => {
        crate::util::test_utils::Assertion::TreeOk(::indoc::indoc! { $expected })
    };
    (@@assertion, expected_errors, $expected:expr) => {
        crate::util::test_utils::Assertion::ExpectedErrors($expected)
    };

    (@@get_test(parser), $source:expr) => {
        crate::util::test_utils::Test::Parser($source)
    };
    (@@get_test(analyzer), $source:expr) => {
        crate::util::test_utils::Test::Analyzer($source)
    };
}
pub(crate) use tree_tests;
