use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use config::ArchiveConfig;
use sigma_aggregator::{AggregationReport, Aggregator};
use sigma_protocol::{
    output_schemas, serialize_json_pretty, BrowseQuery, SearchFilters, SortKey, SortOrder,
};
use sigma_search::ArchiveStore;
use std::io;
use std::path::PathBuf;

mod config;
mod render;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| {
            if text.ends_with('\n') {
                Ok(())
            } else {
                stdout.write_all(b"\n")
            }
        })
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "sigma-archive")]
#[command(about = "Aggregate and browse the Sigma exploit archive", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Config file, JSON or TOML (overrides SIGMA_ARCHIVE_CONFIG and ./sigma-archive.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Flatten a directory of per-record JSON files into exploits.json + stats.json
    Aggregate(AggregateArgs),

    /// Filter, sort and page through aggregated records
    Search(SearchArgs),

    /// Print one record by id
    Show(ShowArgs),

    /// Summarize the precomputed archive statistics
    Stats(StatsArgs),

    /// Print the JSON Schema of the output files
    Schema,
}

#[derive(Args)]
struct AggregateArgs {
    /// Directory of per-record JSON files
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Directory receiving exploits.json and stats.json
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Files read per batch
    #[arg(long)]
    batch_size: Option<usize>,

    /// Authors kept in author_counts
    #[arg(long)]
    top_authors: Option<usize>,

    /// Output JSON report
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct SearchArgs {
    /// Free text across title, author, content and CVE ids
    query: Option<String>,

    /// Exact category
    #[arg(long)]
    category: Option<String>,

    /// Exact author
    #[arg(long)]
    author: Option<String>,

    /// CVE substring
    #[arg(long)]
    cve: Option<String>,

    /// Substring of the record date, usually a year
    #[arg(long)]
    year: Option<String>,

    /// Field to sort by
    #[arg(long, default_value_t = SortKey::Id)]
    sort: SortKey,

    /// asc or desc
    #[arg(long, default_value_t = SortOrder::Desc)]
    order: SortOrder,

    /// 1-based page number
    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Records per page (defaults to browse.page_size)
    #[arg(long)]
    page_size: Option<usize>,

    /// Directory holding exploits.json and stats.json
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Output JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ShowArgs {
    /// Record id
    id: i64,

    /// Directory holding exploits.json and stats.json
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Output JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct StatsArgs {
    /// Entries listed under top categories and top authors
    #[arg(long, default_value_t = 5)]
    top: usize,

    /// Directory holding exploits.json and stats.json
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Output JSON
    #[arg(long)]
    json: bool,
}

pub async fn main_entry() -> Result<()> {
    let mut cli = Cli::parse();

    // Keep stdout clean for JSON consumers.
    let json_output = match &cli.command {
        Commands::Aggregate(args) => args.json,
        Commands::Search(args) => args.json,
        Commands::Show(args) => args.json,
        Commands::Stats(args) => args.json,
        Commands::Schema => true,
    };
    if json_output {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let (config, config_path) = ArchiveConfig::load(cli.config.as_deref())?;
    if let Some(path) = &config_path {
        log::info!("Using config {}", path.display());
    }

    match cli.command {
        Commands::Aggregate(args) => run_aggregate(args, config).await?,
        Commands::Search(args) => run_search(args, config).await?,
        Commands::Show(args) => run_show(args, config).await?,
        Commands::Stats(args) => run_stats(args, config).await?,
        Commands::Schema => print_stdout(&serialize_json_pretty(&output_schemas())?)?,
    }

    Ok(())
}

async fn run_aggregate(args: AggregateArgs, config: ArchiveConfig) -> Result<()> {
    let mut settings = config.aggregate;
    if let Some(dir) = args.data_dir {
        settings.data_dir = dir;
    }
    if let Some(dir) = args.output_dir {
        settings.output_dir = dir;
    }
    if let Some(batch_size) = args.batch_size {
        settings.batch_size = batch_size;
    }
    if let Some(top_authors) = args.top_authors {
        settings.top_authors = top_authors;
    }

    log::info!("Starting data aggregation from {}", settings.data_dir.display());
    let aggregator = Aggregator::new(settings).context("Invalid aggregation settings")?;
    let report: AggregationReport = aggregator.run().await.with_context(|| {
        format!(
            "Aggregation of {} failed",
            aggregator.config().data_dir.display()
        )
    })?;

    if args.json {
        print_stdout(&serialize_json_pretty(&report)?)?;
    } else {
        print_stdout(&render::render_aggregation(&report))?;
    }
    Ok(())
}

async fn run_search(args: SearchArgs, config: ArchiveConfig) -> Result<()> {
    let data_dir = args.data_dir.clone().unwrap_or_else(|| config.browse_dir());
    let store = ArchiveStore::open(&data_dir);

    let query = BrowseQuery {
        filters: SearchFilters {
            query: args.query.unwrap_or_default(),
            category: args.category.unwrap_or_default(),
            author: args.author.unwrap_or_default(),
            cve: args.cve.unwrap_or_default(),
            year: args.year.unwrap_or_default(),
        },
        sort: args.sort,
        order: args.order,
        page: args.page,
        page_size: args.page_size.unwrap_or(config.browse.page_size),
    };

    let page = store.browse(&query).await?;
    if args.json {
        print_stdout(&serialize_json_pretty(&page)?)?;
        return Ok(());
    }

    let archive_total = store.records().await?.len();
    print_stdout(&render::render_page(&page, Some(archive_total)))?;
    Ok(())
}

async fn run_show(args: ShowArgs, config: ArchiveConfig) -> Result<()> {
    let data_dir = args.data_dir.unwrap_or_else(|| config.browse_dir());
    let store = ArchiveStore::open(&data_dir);

    let Some(record) = store.get(args.id).await? else {
        anyhow::bail!("No exploit with id {} in {}", args.id, data_dir.display());
    };

    if args.json {
        print_stdout(&serialize_json_pretty(record)?)?;
    } else {
        print_stdout(&render::render_record(record))?;
    }
    Ok(())
}

async fn run_stats(args: StatsArgs, config: ArchiveConfig) -> Result<()> {
    let data_dir = args.data_dir.unwrap_or_else(|| config.browse_dir());
    let store = ArchiveStore::open(&data_dir);
    let stats = store.stats().await?;

    if args.json {
        print_stdout(&serialize_json_pretty(stats)?)?;
    } else {
        print_stdout(&render::render_stats(stats, args.top))?;
    }
    Ok(())
}
