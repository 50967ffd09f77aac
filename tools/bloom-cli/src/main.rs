//! bloom-cli: build, export and query Bloom filters
//!
//! ```text
//! bloom-cli build --capacity 100 --max-fpr 0.01 --insert alice --insert bob --query carol
//! bloom-cli query --hex <exported hex> --hash-count 7 --query alice
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use nonce_bloom::{
    BloomConfig, BloomConfigBuilder, BloomFilter, InsertOutcome, Instrumented, MembershipFilter,
    Metrics,
};

#[derive(Parser, Debug)]
#[command(name = "bloom-cli")]
#[command(about = "Build, export and query nonce-rehashed Bloom filters")]
struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a filter, insert entries and print its hex export
    Build(BuildArgs),
    /// Load an exported filter and test entries against it
    Query(QueryArgs),
}

#[derive(Args, Debug)]
struct BuildArgs {
    /// JSON file holding a filter configuration; overrides the sizing flags
    #[arg(long)]
    config: Option<PathBuf>,

    /// Filter length in bytes
    #[arg(long)]
    size_bytes: Option<usize>,

    /// Number of hash functions
    #[arg(long)]
    hash_count: Option<usize>,

    /// Maximum number of unique entries
    #[arg(long)]
    capacity: Option<usize>,

    /// Maximum false positive rate, in (0, 1)
    #[arg(long)]
    max_fpr: Option<f64>,

    /// Entry to insert (repeatable)
    #[arg(long = "insert")]
    inserts: Vec<String>,

    /// Entry to test after inserting (repeatable)
    #[arg(long = "query")]
    queries: Vec<String>,
}

#[derive(Args, Debug)]
struct QueryArgs {
    /// Hex-encoded filter bytes
    #[arg(long)]
    hex: String,

    /// Hash count the filter was built with
    #[arg(long)]
    hash_count: usize,

    /// Entry to test (repeatable)
    #[arg(long = "query")]
    queries: Vec<String>,
}

fn init_logging(level: &str) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .context("invalid log level")?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init()
        .context("failed to install tracing subscriber")?;
    Ok(())
}

fn load_config(args: &BuildArgs) -> Result<BloomConfig> {
    if let Some(path) = &args.config {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: BloomConfig = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        config.validate()?;
        return Ok(config);
    }

    let mut builder = BloomConfigBuilder::new();
    if let Some(bytes) = args.size_bytes {
        builder = builder.size_bytes(bytes);
    }
    if let Some(k) = args.hash_count {
        builder = builder.hash_count(k);
    }
    if let Some(capacity) = args.capacity {
        builder = builder.capacity(capacity);
    }
    if let Some(rate) = args.max_fpr {
        builder = builder.max_false_positive_rate(rate);
    }
    Ok(builder.build()?)
}

fn report<F: MembershipFilter>(filter: &F, queries: &[String]) {
    for entry in queries {
        match filter.exists(entry) {
            (true, rate) => println!("{entry}: possibly present (false positive rate {rate:.6})"),
            (false, _) => println!("{entry}: absent"),
        }
    }
}

fn run_build(args: BuildArgs) -> Result<()> {
    let config = load_config(&args)?;
    info!(
        size_bits = config.size_bits(),
        hash_count = config.hash_count,
        capacity = ?config.capacity,
        max_false_positive_rate = ?config.max_false_positive_rate,
        "Building filter"
    );

    let metrics = Arc::new(Metrics::new());
    let mut filter = Instrumented::new(BloomFilter::from_config(&config)?, metrics.clone());

    for entry in &args.inserts {
        match filter.insert(entry) {
            Ok(InsertOutcome::Inserted) => {}
            Ok(InsertOutcome::AlreadyPresent) => info!(entry = %entry, "Entry already present"),
            Err(e) if e.is_insert_rejection() => warn!(entry = %entry, error = %e, "Insert rejected"),
            Err(e) => return Err(e.into()),
        }
    }

    report(&filter, &args.queries);

    let snapshot = metrics.snapshot();
    info!(
        accepted = snapshot.inserts_accepted,
        duplicate = snapshot.inserts_duplicate,
        rejected = snapshot.inserts_rejected_capacity + snapshot.inserts_rejected_accuracy,
        avg_insert_ns = snapshot.avg_insert_ns,
        "Inserts complete"
    );

    let filter = filter.into_inner();
    println!("{filter}");
    println!("hash count: {}", filter.hash_count());
    println!("accuracy: {:.6}", filter.accuracy());
    println!("hex: {}", filter.to_hex());
    Ok(())
}

fn run_query(args: QueryArgs) -> Result<()> {
    let filter = BloomFilter::from_hex(args.hex.trim(), args.hash_count)
        .context("failed to import filter")?;
    info!(
        size_bits = filter.size_bits(),
        hash_count = filter.hash_count(),
        bits_set = filter.bits_set(),
        "Imported filter"
    );

    report(&filter, &args.queries);
    println!("{filter}");
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    match cli.command {
        Command::Build(args) => run_build(args),
        Command::Query(args) => run_query(args),
    }
}
