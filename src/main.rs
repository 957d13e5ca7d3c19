use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use blocklist_pruner::{Pruner, PrunerConfig, config, files};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

/// Remove dead domains and URLs from a blocklist.
///
/// Domains that still resolve, even to a sinkhole address, are kept.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Blocklist to prune
    #[arg(short, long, default_value = "domains/blocklist.txt")]
    input: PathBuf,

    /// Where to write the cleaned blocklist
    #[arg(short, long, default_value = "cleaned/blocklist.txt")]
    output: PathBuf,

    /// Prune every *.txt list in this folder instead of a single file
    #[arg(long, conflicts_with_all = ["input", "output"], requires = "output_dir")]
    input_dir: Option<PathBuf>,

    /// Folder receiving the cleaned lists, under their original names
    #[arg(long, requires = "input_dir")]
    output_dir: Option<PathBuf>,

    /// DoH JSON endpoint to query. Repeat for several; defaults to
    /// Cloudflare, Google and Quad9
    #[arg(short, long = "endpoint")]
    endpoints: Vec<String>,

    /// Per-request timeout in seconds
    #[arg(short, long, default_value_t = config::DEFAULT_TIMEOUT.as_secs())]
    timeout_secs: u64,

    /// User-agent sent with DoH queries and probes
    #[arg(short, long, default_value = config::DEFAULT_USER_AGENT)]
    user_agent: String,

    /// Copy the output directory here after writing
    #[arg(long)]
    backup_dir: Option<PathBuf>,

    /// Log level, overridden by RUST_LOG
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from(args.log_level).into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = PrunerConfig::new()
        .with_timeout(Duration::from_secs(args.timeout_secs))
        .with_user_agent(args.user_agent);
    if !args.endpoints.is_empty() {
        config = config.with_endpoints(args.endpoints);
    }

    if let (Some(input_dir), Some(output_dir)) = (&args.input_dir, &args.output_dir) {
        let pruner = Pruner::from_config(&config).context("failed to set up resolver")?;
        let reports = pruner.prune_dir(input_dir, output_dir)?;
        backup(args.backup_dir.as_deref(), output_dir)?;

        for (path, report) in &reports {
            println!("Cleaned blocklist written to {}", path.display());
            print!("{}", report.summary());
        }
        return Ok(());
    }

    let lines = files::read_lines(&args.input)?;
    let pruner = Pruner::from_config(&config).context("failed to set up resolver")?;
    let report = pruner.run(&lines);

    files::write_lines(&report.kept, &args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    let output_dir = args
        .output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    backup(args.backup_dir.as_deref(), output_dir)?;

    println!("Cleaned blocklist written to {}", args.output.display());
    print!("{}", report.summary());
    Ok(())
}

fn backup(target: Option<&Path>, source: &Path) -> anyhow::Result<()> {
    if let Some(target) = target {
        files::backup_dir(source, target)
            .with_context(|| format!("failed to back up to {}", target.display()))?;
    }
    Ok(())
}
