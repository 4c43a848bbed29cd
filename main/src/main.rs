//! `jsonfmt`: validate a JSON document and print it in compact or pretty form.

use std::{
    fs,
    io::{self, Read, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::Parser;
use json_codec::{JsonValue, ParseError, ParseOutcome, Style};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "jsonfmt", version, about = "Validate and reformat JSON documents")]
struct Cli {
    #[arg(value_name = "FILE", help = "Input file, read from stdin when omitted")]
    file: Option<PathBuf>,

    #[arg(short, long, help = "Indent the output instead of writing it compactly")]
    pretty: bool,

    #[arg(long, conflicts_with = "pretty", help = "Only validate the input, print nothing")]
    check: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("unexpected input after the document at line {line} column {column}")]
    TrailingInput { line: usize, column: usize },
    #[error("failed to write output: {0}")]
    Write(#[from] io::Error),
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let source = read_input(cli.file.as_ref())?;
    let value = parse_document(&source)?;

    if cli.check {
        tracing::info!("input is valid JSON");
        return Ok(());
    }

    let style = if cli.pretty {
        Style::Pretty
    } else {
        Style::Compact
    };

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", value.serialize(style))?;
    stdout.flush()?;

    Ok(())
}

fn read_input(file: Option<&PathBuf>) -> Result<String, CliError> {
    let source = match file {
        Some(path) => fs::read_to_string(path).map_err(|source| CliError::Read {
            name: path.display().to_string(),
            source,
        })?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|source| CliError::Read {
                    name: "stdin".to_string(),
                    source,
                })?;
            buf
        }
    };

    tracing::debug!(bytes = source.len(), "read input");
    Ok(source)
}

fn parse_document(source: &str) -> Result<JsonValue, CliError> {
    match json_codec::parse(source) {
        ParseOutcome::Success { value, rest } if rest.is_empty() => Ok(value),
        ParseOutcome::Success { rest, .. } => {
            let consumed = &source[..source.len() - rest.len()];
            let line = consumed.matches('\n').count() + 1;
            let column = consumed
                .rsplit('\n')
                .next()
                .map_or(0, |last| last.chars().count())
                + 1;

            Err(CliError::TrailingInput { line, column })
        }
        ParseOutcome::Error { error, state } => {
            tracing::debug!(
                stopped_at = state.offset(),
                line = state.line(),
                column = state.column(),
                "parser stopped"
            );
            Err(error.into())
        }
    }
}
