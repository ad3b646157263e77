//! CLI commands implementation.

use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;

use sutime::{CoreNlpService, TaggerConfig, TemporalAnnotationAdapter};

#[derive(Parser)]
#[command(name = "sutime")]
#[command(about = "Temporal-expression tagging client")]
#[command(version)]
pub struct Cli {
    /// Config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Annotation server endpoint
    #[arg(long, global = true, env = "SUTIME_ENDPOINT")]
    endpoint: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Tag time expressions in text and print them as JSON
    Parse {
        /// Input text (reads stdin if omitted)
        text: Option<String>,
        /// Anchor date for relative expressions (yyyy-mm-dd)
        #[arg(short, long)]
        reference_date: Option<String>,
        /// Recognize multi-token ranges as single expressions
        #[arg(long)]
        mark_time_ranges: bool,
        /// Attach begin/end range info to expressions
        #[arg(long)]
        include_range: bool,
        /// Grammar language (name or ISO 639-1 code)
        #[arg(short, long)]
        language: Option<String>,
    },

    /// Check that the annotation server is reachable
    Ping,
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => TaggerConfig::load(path)?,
        None => TaggerConfig::default(),
    };
    if let Some(endpoint) = &cli.endpoint {
        config.endpoint = endpoint.clone();
    }

    match cli.command {
        Commands::Parse {
            text,
            reference_date,
            mark_time_ranges,
            include_range,
            language,
        } => {
            config.mark_time_ranges = config.mark_time_ranges || mark_time_ranges;
            config.include_range = config.include_range || include_range;
            if language.is_some() {
                config.language = language;
            }
            cmd_parse(config, text, reference_date.as_deref()).await
        }
        Commands::Ping => cmd_ping(&config).await,
    }
}

async fn cmd_parse(
    config: TaggerConfig,
    text: Option<String>,
    reference_date: Option<&str>,
) -> anyhow::Result<()> {
    let text = match text {
        Some(t) => t,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let adapter = TemporalAnnotationAdapter::connect(config).await?;
    let json = adapter.annotate(&text, reference_date).await?;
    println!("{}", json);
    Ok(())
}

async fn cmd_ping(config: &TaggerConfig) -> anyhow::Result<()> {
    if CoreNlpService::ping(config).await {
        println!(
            "{} Annotation server reachable at {}",
            style("✓").green(),
            config.endpoint
        );
        Ok(())
    } else {
        println!(
            "{} Annotation server not reachable at {}",
            style("✗").red(),
            config.endpoint
        );
        std::process::exit(1);
    }
}
