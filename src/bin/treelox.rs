//! Lox interpreter command-line.
//!
//! When called without a script it drops into an interactive read-evaluate-print loop.
//!
//! `--tokens` and `--ast` dump the lexemes or the syntax tree of the input instead of running it.
//! Set `RUST_LOG=treelox=debug` to trace the interpreter phases on stderr.

use std::fs;
use std::io::{self, prelude::*};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{self, Context};
use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter};

use treelox::interpreter::{self, Interpreter, LoxError};

/// Exit status for command line usage errors, see `sysexits.h`.
const EX_USAGE: i32 = 64;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Print the lexemes of the input instead of running it.
    #[arg(long, conflicts_with = "ast")]
    tokens: bool,

    /// Print the syntax tree of the input instead of running it.
    #[arg(long)]
    ast: bool,

    /// Script to run.  Starts an interactive prompt when omitted.
    script: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    Run,
    Tokens,
    Ast,
}

impl Args {
    fn mode(&self) -> Mode {
        if self.tokens {
            Mode::Tokens
        } else if self.ast {
            Mode::Ast
        } else {
            Mode::Run
        }
    }
}

fn main() -> Result<(), anyhow::Error> {
    let args = Args::try_parse().unwrap_or_else(|e| {
        let code = if e.use_stderr() { EX_USAGE } else { 0 };
        let _ = e.print();
        process::exit(code);
    });
    init_tracing()?;

    match &args.script {
        Some(path) => run_file(path, args.mode()),
        None => run_prompt(args.mode()),
    }
}

fn init_tracing() -> Result<(), anyhow::Error> {
    tracing::subscriber::set_global_default(
        tracing_subscriber::registry().with(
            fmt::layer().with_writer(io::stderr).with_filter(
                EnvFilter::builder()
                    .with_default_directive(LevelFilter::WARN.into())
                    .from_env_lossy(),
            ),
        ),
    )?;
    Ok(())
}

fn run_file(path: &Path, mode: Mode) -> Result<(), anyhow::Error> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let mut stdout = io::stdout();
    let result = {
        let mut interp = Interpreter::new(&mut stdout);
        execute(&mut interp, &source, mode, false)
    };
    stdout.flush()?;

    if let Err(e) = result {
        eprintln!("{}", e);
        process::exit(e.exit_code());
    }
    Ok(())
}

fn run_prompt(mode: Mode) -> Result<(), anyhow::Error> {
    let mut editor = DefaultEditor::new()?;
    let mut stdout = io::stdout();
    let mut interp = Interpreter::new(&mut stdout);

    loop {
        match editor.readline("> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                editor.add_history_entry(line.as_str())?;
                // Errors end the line, not the session.
                if let Err(e) = execute(&mut interp, &line, mode, true) {
                    eprintln!("{}", e);
                }
            }
            Err(ReadlineError::Eof | ReadlineError::Interrupted) => break,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

fn execute<W: Write>(
    interp: &mut Interpreter<'_, W>,
    source: &str,
    mode: Mode,
    interactive: bool,
) -> Result<(), LoxError> {
    match mode {
        Mode::Run if interactive => interp.run_line(source),
        Mode::Run => interp.run(source),
        Mode::Tokens => {
            let (lexemes, errors) = interpreter::scan(source);
            for lexeme in lexemes {
                println!("{}", lexeme);
            }
            if errors.is_empty() {
                Ok(())
            } else {
                Err(errors.into())
            }
        }
        Mode::Ast => {
            for stmt in interpreter::parse(source)? {
                println!("{}", stmt);
            }
            Ok(())
        }
    }
}
