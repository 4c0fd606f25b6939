use std::{
    error::Error,
    fs,
    io::{self, Read, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::{Parser, ValueEnum};
use log::debug;
use plc::{
    analyzer,
    catalog::Catalog,
    codegen::{self, Options},
    lexer, parser,
    scope::Scope,
    util::fmt::tree,
    CompileError,
};

/// Compiles a PLC source file into Java.
#[derive(Parser, Debug)]
#[command(name = "plcc", version)]
struct Cli {
    /// Source file. Reads from stdin if omitted.
    file: Option<PathBuf>,

    /// What to print.
    #[arg(long, value_enum, default_value_t = Emit::Java)]
    emit: Emit,

    /// Name of the generated class.
    #[arg(long, default_value = "Main")]
    class_name: String,

    /// Spaces per indentation level in the generated code.
    #[arg(long, default_value_t = 4)]
    indent: usize,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// The token stream, one token per line.
    Tokens,
    /// The untyped syntax tree.
    Ast,
    /// The syntax tree annotated with types.
    Typed,
    /// Java source.
    Java,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let src = match read_source(cli.file.as_ref()) {
        Ok(src) => src,
        Err(error) => {
            eprintln!("failed to read input: {error}");
            return ExitCode::FAILURE;
        }
    };

    match run(&cli, &src) {
        Ok(()) => ExitCode::SUCCESS,
        Err(RunError::Compile(error)) => {
            eprintln!("{}", error.render(&src));
            ExitCode::FAILURE
        }
        Err(RunError::Io(error)) => {
            eprintln!("failed to write output: {error}");
            ExitCode::FAILURE
        }
    }
}

fn read_source(file: Option<&PathBuf>) -> Result<String, Box<dyn Error>> {
    let src = match file {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut src = String::new();
            io::stdin().read_to_string(&mut src)?;
            src
        }
    };
    debug!("read {} bytes", src.len());
    Ok(src)
}

#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

fn run(cli: &Cli, src: &str) -> Result<(), RunError> {
    let catalog = Catalog::standard();
    let mut out = io::stdout().lock();

    let tokens = lexer::lex_in_new(src).map_err(CompileError::from)?;
    if cli.emit == Emit::Tokens {
        for token in &tokens {
            writeln!(out, "{token:?}")?;
        }
        return Ok(());
    }

    let source = parser::parse(src, &tokens).map_err(CompileError::from)?;
    if cli.emit == Emit::Ast {
        tree::print_source(&mut out, &source)?;
        return Ok(());
    }

    let typed = analyzer::analyze(source, catalog, &mut Scope::new()).map_err(CompileError::from)?;
    if cli.emit == Emit::Typed {
        tree::print_source(&mut out, &typed)?;
        return Ok(());
    }

    let options = Options {
        class_name: cli.class_name.clone(),
        indent_width: cli.indent,
    };
    write!(out, "{}", codegen::generate(&typed, catalog, &options))?;
    Ok(())
}
