use std::io::{stderr, stdout, BufWriter, Write};
use std::process::exit;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use savings_ledger::codec::{AmountCodec, KeyCache, KeyMaterial};
use savings_ledger::engine::{LedgerEngine, LedgerReport};
use savings_ledger::storage::AccountStorage;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: savings-ledger [ledger].csv [goals.csv:optional] [log_level:optional] > [report].csv");
        eprintln!("Available log levels: error, warn, info, debug, trace (default: error)");
        eprintln!("Key material is read from SAVINGS_LEDGER_PASSPHRASE and SAVINGS_LEDGER_SALT");
        exit(1);
    }

    let ledger_path = &args[1];
    let (goals_path, log_level) = split_optional_args(&args[2..]);

    setup_logging(log_level);

    let material = KeyMaterial::from_env().context("Envelope key material is not configured")?;
    let codec = AmountCodec::new(material).with_key_cache(KeyCache::new());
    let storage = Arc::new(AccountStorage::new());
    let engine = LedgerEngine::new(storage, codec);

    let timer = Instant::now();
    engine.run(ledger_path).await?;

    if let Some(goals_path) = goals_path {
        engine.import_goals(goals_path).await?;
    }

    let duration = timer.elapsed();

    info!("Processed ledger in: {duration:?}");

    write_reports_to_stdout(&engine.reports().await)?;

    Ok(())
}

/// The goals file and the log level are both optional; a recognised level name is never a path.
fn split_optional_args(args: &[String]) -> (Option<&str>, LevelFilter) {
    match args {
        [] => (None, LevelFilter::ERROR),
        [single] => match try_parse_log_level(single) {
            Some(level) => (None, level),
            None => (Some(single.as_str()), LevelFilter::ERROR)
        },
        [goals, level, ..] => (Some(goals.as_str()), parse_log_level(level))
    }
}

fn try_parse_log_level(level: &str) -> Option<LevelFilter> {
    match level.to_lowercase().as_str() {
        "trace" => Some(LevelFilter::TRACE),
        "debug" => Some(LevelFilter::DEBUG),
        "info" => Some(LevelFilter::INFO),
        "warn" => Some(LevelFilter::WARN),
        "error" => Some(LevelFilter::ERROR),
        _ => None
    }
}

fn parse_log_level(level: &str) -> LevelFilter {
    try_parse_log_level(level).unwrap_or_else(|| {
        eprintln!("Invalid log level '{}', defaulting to 'error'", level);
        LevelFilter::ERROR
    })
}

fn setup_logging(level: LevelFilter) {
    //NOTE: stdout carries the report, logging goes to stderr
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}

fn write_reports_to_stdout(reports: &[LedgerReport]) -> Result<()> {
    let mut output = BufWriter::new(stdout().lock());

    writeln!(output, "account,record,label,amount,full")?;

    for report in reports {
        writeln!(output, "{},balance,,{},", report.account_id, report.balance)?;

        for snapshot in &report.history {
            writeln!(output, "{},history,{},{},", report.account_id, snapshot.label, snapshot.amount)?;
        }

        for progress in &report.allocation.goals {
            writeln!(output, "{},goal,{},{},{}", report.account_id, progress.goal_id, progress.current_amount, progress.is_full)?;
        }
    }

    output.flush()?;

    Ok(())
}
