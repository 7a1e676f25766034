mod cli;

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
    process,
    time::Instant,
};

use anyhow::Context as _;
use clap::Parser;
use cli::{Cli, Command, OutputFormat};
use decexpr::{Bindings, Evaluator, NumberFormat};
use rust_decimal::Decimal;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let now = Instant::now();

    let status = NumberFormat::new(cli.decimal_separator, cli.group_separator)
        .map(Evaluator::with_format)
        .map_err(anyhow::Error::from)
        .and_then(|evaluator| match cli.command {
            Command::Eval { expression, vars } => eval(&evaluator, &expression, vars),
            Command::Compile { expression, format } => compile(&evaluator, &expression, format),
            Command::Batch { expression, file } => {
                batch(&evaluator, &expression, file.as_deref())
            }
        });

    let duration = now.elapsed();
    log::info!("Duration: {duration:.2?}");

    if let Err(why) = status {
        eprintln!("{why:#}");
        process::exit(1);
    }
}

fn eval(evaluator: &Evaluator, expression: &str, vars: Vec<(String, Decimal)>) -> anyhow::Result<()> {
    let bindings = Bindings::from_iter(vars);
    let value = evaluator.evaluate(expression, &bindings)?;
    println!("{value}");
    Ok(())
}

fn compile(evaluator: &Evaluator, expression: &str, format: OutputFormat) -> anyhow::Result<()> {
    let compiled = evaluator.compile(expression)?;

    println!("parameters: [{}]", compiled.parameters().join(", "));
    match format {
        OutputFormat::Infix => println!("{compiled}"),
        OutputFormat::Postfix => println!("{}", compiled.to_postfix()),
        OutputFormat::Program => {
            for ins in compiled.program().instructions() {
                println!("  {ins}");
            }
        }
    }
    Ok(())
}

fn batch(evaluator: &Evaluator, expression: &str, file: Option<&Path>) -> anyhow::Result<()> {
    let compiled = evaluator.compile(expression)?;

    let reader: Box<dyn BufRead> = match file {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(io::stdin())),
    };

    let report = cli::run_batch(&compiled, reader)?;
    for (line, outcome) in &report.rows {
        match outcome {
            Ok(value) => println!("{value}"),
            Err(why) => {
                eprintln!("line {line}: {why:#}");
                println!("error");
            }
        }
    }

    if report.failed > 0 {
        anyhow::bail!("{} row(s) failed", report.failed);
    }
    Ok(())
}
