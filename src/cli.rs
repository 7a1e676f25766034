use std::{io::BufRead, str::FromStr};

use anyhow::Context as _;
use decexpr::{Bindings, CompiledExpression};
use rust_decimal::Decimal;

#[derive(clap::Parser, Debug)]
#[clap(about, long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Decimal separator used in number literals
    #[arg(long, global = true, default_value_t = '.')]
    pub decimal_separator: char,

    /// Digit group separator allowed inside number literals
    #[arg(long, global = true)]
    pub group_separator: Option<char>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    /// Fully parenthesised infix
    Infix,
    /// Reverse Polish notation with variable names
    Postfix,
    /// Instruction listing
    Program,
}

#[derive(clap::Subcommand, Debug)]
pub(crate) enum Command {
    /// Evaluate an expression once
    Eval {
        expression: String,

        /// Variable binding, e.g. `--var a=2.5`
        #[arg(short, long = "var", value_parser = parse_binding)]
        vars: Vec<(String, Decimal)>,
    },

    /// Compile an expression and print its compiled form
    Compile {
        expression: String,

        /// Specifies the output format
        #[arg(short, long)]
        #[clap(value_enum, default_value_t = OutputFormat::Infix)]
        format: OutputFormat,
    },

    /// Compile once, then execute for every row of bindings in a file
    Batch {
        expression: String,

        /// Rows of `name=value` pairs; reads stdin when omitted
        file: Option<std::path::PathBuf>,
    },
}

/// Parses `name=value`.
pub(crate) fn parse_binding(s: &str) -> Result<(String, Decimal), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected `name=value`, found `{s}`"))?;

    let name = name.trim();
    if name.is_empty() || !name.chars().all(char::is_alphabetic) {
        return Err(format!("invalid variable name `{name}`"));
    }

    let value = Decimal::from_str(value.trim()).map_err(|e| format!("invalid value `{value}`: {e}"))?;

    Ok((name.to_owned(), value))
}

/// Parses a row of whitespace-separated bindings, e.g. `a=1 b=2.5`.
pub(crate) fn parse_row(line: &str) -> Result<Vec<(String, Decimal)>, String> {
    line.split_whitespace().map(parse_binding).collect()
}

/// Results of a batch run, one entry per executed row.
#[derive(Debug)]
pub(crate) struct BatchReport {
    /// 1-based line number and the outcome of that row.
    pub rows: Vec<(usize, anyhow::Result<Decimal>)>,
    pub failed: usize,
}

/// Executes `compiled` once per row of `reader`. Blank lines and `#` comments
/// are skipped; a failing row is recorded and the run continues.
pub(crate) fn run_batch(compiled: &CompiledExpression, reader: impl BufRead) -> anyhow::Result<BatchReport> {
    let mut report = BatchReport {
        rows: vec![],
        failed: 0,
    };

    for (n, line) in reader.lines().enumerate() {
        let line = line.context("read bindings")?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let outcome = run_row(compiled, line);
        if outcome.is_err() {
            report.failed += 1;
        }
        report.rows.push((n + 1, outcome));
    }

    Ok(report)
}

fn run_row(compiled: &CompiledExpression, line: &str) -> anyhow::Result<Decimal> {
    let bindings = Bindings::from_iter(parse_row(line).map_err(anyhow::Error::msg)?);
    log::debug!("executing with {} binding(s)", bindings.len());

    Ok(compiled.execute(&bindings)?)
}
