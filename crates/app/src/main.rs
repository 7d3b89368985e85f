use std::fmt;
use std::path::PathBuf;

use placement_core::scoring::Analyzer;
use services::{Clock, PlacementSession};

mod bank;
mod render;
mod terminal;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    EmptyAnswers,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::EmptyAnswers => write!(f, "--answers needs at least one answer"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--bank <path>] [--json] [--answers <a,b,...>] [--answer <a>]...");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --bank <path>       Question bank JSON (default: built-in 12-question bank)");
    eprintln!("  --json              Print the result as JSON");
    eprintln!("  --answers <list>    Comma-separated answers; runs without the interactive screen");
    eprintln!("  --answer <value>    One answer, kept verbatim (may contain commas); repeatable");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  PLACEMENT_BANK, PLACEMENT_JSON, RUST_LOG");
}

#[derive(Debug, Default)]
struct Args {
    bank: Option<PathBuf>,
    json: bool,
    answers: Option<Vec<String>>,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self {
            bank: std::env::var_os("PLACEMENT_BANK").map(PathBuf::from),
            json: std::env::var("PLACEMENT_JSON")
                .is_ok_and(|value| matches!(value.trim(), "1" | "true" | "yes")),
            answers: None,
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--bank" => parsed.bank = Some(PathBuf::from(require_value(args, "--bank")?)),
                "--json" => parsed.json = true,
                "--answers" => {
                    let raw = require_value(args, "--answers")?;
                    parsed
                        .answers
                        .get_or_insert_with(Vec::new)
                        .extend(split_answers(&raw)?);
                }
                "--answer" => {
                    let answer = require_value(args, "--answer")?;
                    parsed.answers.get_or_insert_with(Vec::new).push(answer);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(parsed)
    }
}

fn split_answers(raw: &str) -> Result<Vec<String>, ArgsError> {
    let answers: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|answer| !answer.is_empty())
        .map(str::to_string)
        .collect();
    if answers.is_empty() {
        return Err(ArgsError::EmptyAnswers);
    }
    Ok(answers)
}

/// Answer questions in order from a fixed list, without a terminal.
fn run_scripted(
    session: &mut PlacementSession,
    answers: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut answers = answers.iter();
    while !session.is_complete() {
        let index = session.snapshot().current_index;
        let answer = answers
            .next()
            .ok_or_else(|| format!("--answers ran out before question {}", index + 1))?;
        session.tick()?;
        session.select(answer)?;
        session.advance()?;
    }
    if answers.next().is_some() {
        tracing::warn!("extra --answers ignored after the last question");
    }
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let bank = bank::load_bank(args.bank.as_deref())?;
    let mut session = PlacementSession::start(bank, Clock::default_clock());

    match &args.answers {
        Some(answers) => run_scripted(&mut session, answers)?,
        None => {
            if terminal::run_interactive(&mut session)? == terminal::Exit::Quit {
                // Nothing is persisted; an abandoned session is simply dropped.
                eprintln!("placement test abandoned");
                return Ok(());
            }
        }
    }

    let result = session.finish_and_analyze(&Analyzer::new())?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render::report_text(&result));
    }
    Ok(())
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
