//! Smoke check for the dashboard feeds: fetch each configured source once
//! and report whether it served live or sample data.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use coopfeed::{FeedConfig, FeedFacade, FetchRequest, FetchResult, HttpTransport, SourceKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug)]
struct CliArgs {
    sources: Vec<SourceKind>,
    format: OutputFormat,
    pretty: bool,
    budget: Option<Duration>,
    help: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    coopfeed::init_logging();

    let args = match parse_args(std::env::args().skip(1).collect()) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            std::process::exit(2);
        }
    };
    if args.help {
        print_help();
        return Ok(());
    }

    let config = FeedConfig::from_env();
    let facade = FeedFacade::new(config, Arc::new(HttpTransport::new()));

    let mut payloads = Vec::new();
    for source in &args.sources {
        let request = default_request(*source);
        let result = match args.budget {
            Some(budget) => facade.fetch_within(&request, budget).await,
            None => facade.fetch(&request).await,
        };

        match args.format {
            OutputFormat::Text => println!("{}", render_text(*source, &result)),
            OutputFormat::Json => payloads.push(render_json(*source, &result)),
        }
    }

    if args.format == OutputFormat::Json {
        let output = if args.pretty {
            serde_json::to_string_pretty(&payloads)?
        } else {
            serde_json::to_string(&payloads)?
        };
        println!("{output}");
    }

    Ok(())
}

fn default_request(source: SourceKind) -> FetchRequest {
    match source {
        SourceKind::Weather => FetchRequest::weather("Delhi"),
        SourceKind::News => FetchRequest::news("poultry India"),
        SourceKind::Market => FetchRequest::market("poultry"),
        SourceKind::Health => FetchRequest::health("all"),
    }
}

fn render_text(source: SourceKind, result: &FetchResult) -> String {
    match result {
        FetchResult::Live { attempts, .. } => {
            format!("{source:?}: live data after {attempts} attempt(s)")
        }
        FetchResult::Fallback {
            reason, attempts, ..
        } => format!("{source:?}: sample data ({reason}) after {attempts} attempt(s)"),
    }
}

fn render_json(source: SourceKind, result: &FetchResult) -> serde_json::Value {
    serde_json::json!({
        "source": source,
        "live": result.is_live(),
        "attempts": result.attempts(),
        "payload": result.payload(),
    })
}

fn parse_args(argv: Vec<String>) -> Result<CliArgs, String> {
    let mut sources = Vec::new();
    let mut format = OutputFormat::Text;
    let mut pretty = false;
    let mut budget = None;
    let mut help = false;

    let mut iter = argv.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--source" => {
                let value = iter.next().ok_or("--source needs a value")?;
                sources.push(parse_source(&value)?);
            }
            "--json" => format = OutputFormat::Json,
            "--pretty" => pretty = true,
            "--budget" => {
                let value = iter.next().ok_or("--budget needs a value in seconds")?;
                let secs: u64 = value
                    .parse()
                    .map_err(|_| format!("invalid budget: {value}"))?;
                budget = Some(Duration::from_secs(secs));
            }
            "--help" | "-h" => help = true,
            other => return Err(format!("Unknown flag: {other}. Use --help for usage.")),
        }
    }

    if sources.is_empty() {
        sources = vec![
            SourceKind::Weather,
            SourceKind::News,
            SourceKind::Market,
            SourceKind::Health,
        ];
    }

    Ok(CliArgs {
        sources,
        format,
        pretty,
        budget,
        help,
    })
}

fn parse_source(value: &str) -> Result<SourceKind, String> {
    match value {
        "weather" => Ok(SourceKind::Weather),
        "news" => Ok(SourceKind::News),
        "market" => Ok(SourceKind::Market),
        "health" => Ok(SourceKind::Health),
        _ => Err(format!("Unknown source: {value}")),
    }
}

fn print_help() {
    println!(
        "feedcheck {}\n\nUsage:\n  feedcheck [--source weather|news|market|health]... [--json] [--pretty] [--budget <secs>]\n\nFlags:\n  --source <kind>   Source to check (repeatable; default all)\n  --json            Emit JSON instead of text\n  --pretty          Pretty-print JSON output\n  --budget <secs>   Per-source fetch budget\n  -h, --help        Show help",
        env!("CARGO_PKG_VERSION")
    );
}
