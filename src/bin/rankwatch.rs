//! rankwatch CLI - market-cap ranking board from the command line
//!
//! ## Example Usage
//!
//! ```bash
//! # Top 150 from a local CSV export using the TWSE sheet column labels
//! rankwatch rank ranks.csv --twse
//!
//! # Only the likely additions / removals, prediction thresholds 40/50
//! rankwatch candidates ranks.csv --twse --remove-threshold 50
//!
//! # JSON report of a published sheet (requires the `async` feature)
//! rankwatch rank "https://docs.google.com/.../pub?output=csv" --format json
//!
//! # Show the effective configuration
//! rankwatch config
//! ```

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::{ColoredString, Colorize};
use indicatif::{ProgressBar, ProgressStyle};
use rankwatch::config::{ColumnMap, RankingConfig};
use rankwatch::data::file_source;
use rankwatch::export::{format_rank, write_csv, write_json};
use rankwatch::pipeline::{
    MembershipStatus, RankBand, RankedInstrument, RankingPipeline, RankingReport,
};
use rankwatch::table::RawTable;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

/// rankwatch: market-cap ranking and index reconstitution watch
#[derive(Parser)]
#[command(name = "rankwatch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Market-cap ranking board with index add/remove candidates", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the ranking table
    Rank {
        #[command(flatten)]
        run: RunArgs,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "table")]
        format: OutputFormat,

        /// Write output to a file instead of stdout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// Show only likely index additions and removals
    Candidates {
        #[command(flatten)]
        run: RunArgs,
    },

    /// Print the effective configuration as TOML
    Config,
}

#[derive(Args)]
struct RunArgs {
    /// CSV/JSON file or http(s) URL; defaults to `source` from the config file
    #[arg(value_name = "SOURCE")]
    source: Option<String>,

    /// Rows in the main table
    #[arg(short = 'n', long)]
    top_n: Option<usize>,

    /// Non-members with rank number <= this become addition candidates
    #[arg(long)]
    add_threshold: Option<u32>,

    /// Members with rank number > this become removal candidates
    #[arg(long)]
    remove_threshold: Option<u32>,

    /// Marker text meaning "in the index"
    #[arg(long)]
    token: Option<String>,

    /// Use the TWSE Google Sheet column labels
    #[arg(long)]
    twse: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

/// Configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Config {
    /// Default source when none is given on the command line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    #[serde(default)]
    ranking: RankingConfig,
}

fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".rankwatch").join("config.toml"))
}

impl Config {
    /// Load the configuration.
    ///
    /// A file named with `--config` must exist and parse; problems with the
    /// default file only produce a warning.
    fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            return toml::from_str(&contents)
                .with_context(|| format!("parsing config {}", path.display()));
        }

        let Some(config_path) = default_config_path() else {
            return Ok(Config::default());
        };
        if !config_path.exists() {
            return Ok(Config::default());
        }

        match fs::read_to_string(&config_path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    eprintln!("{} Failed to parse config: {}", "Warning:".yellow(), e);
                }
            },
            Err(e) => {
                eprintln!("{} Failed to read config: {}", "Warning:".yellow(), e);
            }
        }

        Ok(Config::default())
    }

    /// Apply command-line overrides on top of the file values
    fn ranking_for(&self, args: &RunArgs) -> RankingConfig {
        let mut ranking = self.ranking.clone();
        if args.twse {
            ranking.columns = ColumnMap::twse_sheet();
        }
        if let Some(top_n) = args.top_n {
            ranking.top_n = top_n;
        }
        if let Some(add) = args.add_threshold {
            ranking.add_threshold = add;
        }
        if let Some(remove) = args.remove_threshold {
            ranking.remove_threshold = remove;
        }
        if let Some(token) = &args.token {
            ranking.membership_token = token.clone();
        }
        ranking
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            process::exit(1);
        }
    };

    if cli.verbose {
        println!(
            "{} v{}",
            "rankwatch".cyan().bold(),
            env!("CARGO_PKG_VERSION")
        );
    }

    let result = match cli.command {
        Commands::Rank {
            run,
            format,
            output,
        } => run_rank(&config, &run, format, output.as_deref(), cli.verbose),
        Commands::Candidates { run } => run_candidates(&config, &run, cli.verbose),
        Commands::Config => show_config(&config),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

fn run_rank(
    config: &Config,
    args: &RunArgs,
    format: OutputFormat,
    output: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    let report = build_report(config, args, verbose)?;

    let mut out: Box<dyn Write> = match output {
        Some(path) => Box::new(
            fs::File::create(path).with_context(|| format!("creating {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };

    match format {
        OutputFormat::Json => {
            write_json(&report, &mut out, true)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => write_csv(&report.rows, &mut out)?,
        OutputFormat::Table => print_board(&mut out, &report)?,
    }

    if let Some(path) = output {
        println!("{} {}", "Saved to".green(), path.display());
    }
    Ok(())
}

fn run_candidates(config: &Config, args: &RunArgs, verbose: bool) -> Result<()> {
    let report = build_report(config, args, verbose)?;
    let mut out = io::stdout().lock();

    if report.is_empty() {
        writeln!(out, "{}", "⚠️ No data loaded".yellow())?;
        return Ok(());
    }

    print_section(&mut out, "Likely additions", &report.likely_additions)?;
    writeln!(out)?;
    print_section(&mut out, "Likely removals", &report.likely_removals)?;
    Ok(())
}

fn show_config(config: &Config) -> Result<()> {
    config
        .ranking
        .validate()
        .context("configuration is invalid")?;
    let text = toml::to_string_pretty(config)?;
    println!("{}", text);
    Ok(())
}

fn build_report(config: &Config, args: &RunArgs, verbose: bool) -> Result<RankingReport> {
    let ranking = config.ranking_for(args);
    let pipeline = RankingPipeline::new(ranking)?;

    let source = match args.source.as_ref().or(config.source.as_ref()) {
        Some(source) => source.clone(),
        None => bail!("no source given and no `source` in the config file"),
    };

    if verbose {
        let cfg = pipeline.config();
        println!("  {} {}", "Source:".bold(), source);
        println!(
            "  {} add ≤ {}, remove > {}, top {}",
            "Thresholds:".bold(),
            cfg.add_threshold,
            cfg.remove_threshold,
            cfg.top_n
        );
        println!();
    }

    let table = load_table(&source)?;
    let report = pipeline.run(&table);

    if verbose && !report.diagnostics.is_clean() {
        let diag = &report.diagnostics;
        if !diag.missing_columns.is_empty() {
            let names: Vec<&str> = diag.missing_columns.iter().map(|f| f.as_str()).collect();
            println!("  {} {}", "Missing columns:".yellow(), names.join(", "));
        }
        if diag.malformed_total() > 0 {
            println!(
                "  {} {}",
                "Malformed cells:".yellow(),
                diag.malformed_total()
            );
        }
        println!();
    }

    Ok(report)
}

fn load_table(source: &str) -> Result<RawTable> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.set_message(format!("Loading {}", source));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let table = if source.starts_with("http://") || source.starts_with("https://") {
        fetch_url(source)
    } else {
        file_source(Path::new(source))
            .load()
            .with_context(|| format!("loading {}", source))
    };

    spinner.finish_and_clear();
    table
}

#[cfg(feature = "async")]
fn fetch_url(url: &str) -> Result<RawTable> {
    let source = rankwatch::data::HttpCsvSource::new(url)?;
    let runtime = tokio::runtime::Runtime::new()?;
    let table = runtime
        .block_on(source.fetch())
        .with_context(|| format!("fetching {}", url))?;
    Ok(table)
}

#[cfg(not(feature = "async"))]
fn fetch_url(url: &str) -> Result<RawTable> {
    bail!("cannot fetch {}: rankwatch was built without the `async` feature", url)
}

fn print_board<W: Write>(out: &mut W, report: &RankingReport) -> Result<()> {
    if report.is_empty() {
        writeln!(out, "{}", "⚠️ No data loaded".yellow())?;
        return Ok(());
    }

    let now = Local::now();
    writeln!(out, "{}", format!("📅 {}", now.format("%Y-%m-%d (%a)")).bold())?;
    writeln!(
        out,
        "{}",
        format!("🏆 Market-cap ranking Top {}", report.rows.len()).cyan().bold()
    )?;
    writeln!(
        out,
        "{}",
        "🟢 safe tier | 🟡 watch tier | 🔴 danger tier".dimmed()
    )?;
    writeln!(out)?;

    print_rows(out, &report.rows)?;

    writeln!(out)?;
    if let Some(as_of) = report.as_of {
        let local: DateTime<Local> = as_of.into();
        writeln!(out, "Snapshot time: {}", local.format("%Y-%m-%d %H:%M:%S"))?;
    }
    writeln!(out, "Last updated: {}", now.format("%H:%M:%S"))?;
    Ok(())
}

fn print_section<W: Write>(out: &mut W, title: &str, rows: &[RankedInstrument]) -> Result<()> {
    writeln!(out, "{} ({})", title.bold(), rows.len())?;
    if rows.is_empty() {
        writeln!(out, "  {}", "none".dimmed())?;
        return Ok(());
    }
    print_rows(out, rows)
}

fn print_rows<W: Write>(out: &mut W, rows: &[RankedInstrument]) -> Result<()> {
    writeln!(
        out,
        "{:>5}  {:<8} {:<14} {:>10} {:>12} {:>8} {:>4}",
        "Rank".bold(),
        "Code".bold(),
        "Name".bold(),
        "Price".bold(),
        "Mkt cap".bold(),
        "Change".bold(),
        "In".bold()
    )?;

    for row in rows {
        writeln!(
            out,
            "{:>5}  {:<8} {:<14} {:>10} {:>12} {:>8} {:>4}",
            band_style(&format!("{:>5}", format_rank(row.current_rank)), row.rank_band),
            row.symbol,
            row.name,
            row.price.map(|p| format!("$ {:.2}", p)).unwrap_or_default(),
            row.market_cap
                .map(|c| format!("$ {:.0}", c))
                .unwrap_or_default(),
            row.rank_delta.glyph(),
            membership_style(row.membership_status)
        )?;
    }
    Ok(())
}

fn band_style(text: &str, band: RankBand) -> ColoredString {
    match band {
        RankBand::Safe => text.black().on_green(),
        RankBand::Watch => text.black().on_yellow(),
        RankBand::Danger => text.black().on_red(),
        RankBand::Outside | RankBand::Unranked => text.normal(),
    }
}

fn membership_style(status: MembershipStatus) -> ColoredString {
    match status {
        MembershipStatus::In => status.short().red().bold(),
        MembershipStatus::Out => status.short().green().bold(),
        MembershipStatus::Unknown => status.short().normal(),
    }
}
