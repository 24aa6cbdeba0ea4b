//! CLI binary for gate-extract.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ExtractionConfig`, runs the pipeline and prints a summary.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use gate_extract::{
    extract, merge_answer_key_file, merge_answer_key_into_file, pipeline::write,
    DuplicatePolicy, ExtractionConfig, ExtractionProgressCallback, PageSelection,
    ProgressCallback, Segmentation,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar over pages, one log line per page.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}/{len} pages  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");
        bar.set_style(style);
        bar.set_prefix("Extracting");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl ExtractionProgressCallback for CliProgressCallback {
    fn on_extraction_start(&self, total_pages: usize) {
        self.bar.set_length(total_pages as u64);
    }

    fn on_page_start(&self, page_num: usize, _total: usize) {
        self.bar.set_message(format!("page {page_num}"));
    }

    fn on_page_complete(&self, page_num: usize, total: usize, questions: usize) {
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}",
            green("✓"),
            page_num,
            total,
            dim(&format!("{questions:>3} questions")),
        ));
        self.bar.inc(1);
    }

    fn on_extraction_complete(&self, _total_pages: usize, _questions: usize) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Extract questions from a table dump
  gate2json extract CS1_tables.json

  # Custom output path and answer key
  gate2json extract CS1_tables.json -o output/gate_questions.json --answer-key CS1_keys.json

  # One question per table row, keep only the first copy of repeated ids
  gate2json extract tables.json --segmentation row --duplicates first

  # Add answers to an existing questions file
  gate2json merge-key output/gate_questions.json CS1_keys.json

TABLE DOCUMENT FORMAT:
  JSON, pages → tables → rows → cells, each cell a string or null:
    [[[["Q1", "What is 2+2? (A) 3 (B) 4"], ["Q2", null]]]]
  or the same wrapped as {"source": "CS1.pdf", "pages": [...]}.

ENVIRONMENT VARIABLES:
  GATE2JSON_OUTPUT        Default output path
  GATE2JSON_ANSWER_KEY    Answer-key table document
  GATE2JSON_MERGE_OUTPUT  Default output path for merge-key
  RUST_LOG                Log filter (overrides -v / -q)
"#;

/// Extract GATE exam questions from table dumps into structured JSON.
#[derive(Parser, Debug)]
#[command(
    name = "gate2json",
    version,
    about = "Extract MCQ / MSQ / NAT questions from tabular exam papers into JSON",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "GATE2JSON_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "GATE2JSON_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract questions from a table document.
    Extract(ExtractArgs),
    /// Attach answers from an answer-key document to an existing questions file.
    MergeKey(MergeKeyArgs),
}

#[derive(Args, Debug)]
struct ExtractArgs {
    /// Table document (JSON) produced by the PDF table extractor.
    input: PathBuf,

    /// Output JSON path.
    #[arg(short, long, env = "GATE2JSON_OUTPUT", default_value = "gate_questions.json")]
    output: PathBuf,

    /// Answer-key table document to merge into the questions.
    #[arg(long, env = "GATE2JSON_ANSWER_KEY")]
    answer_key: Option<PathBuf>,

    /// How cells are grouped into questions.
    #[arg(long, env = "GATE2JSON_SEGMENTATION", value_enum, default_value = "marker")]
    segmentation: SegmentationArg,

    /// What to do with repeated question ids.
    #[arg(long, env = "GATE2JSON_DUPLICATES", value_enum, default_value = "keep")]
    duplicates: DuplicatesArg,

    /// Page selection: all, 5, 3-15, or 1,3,5,7.
    #[arg(long, env = "GATE2JSON_PAGES", default_value = "all")]
    pages: String,

    /// Pages processed at once.
    #[arg(short, long, env = "GATE2JSON_CONCURRENCY", default_value_t = 4)]
    concurrency: usize,

    /// Rewrite options like "3\n4" as "3/4".
    #[arg(long, env = "GATE2JSON_NORMALIZE_FRACTIONS")]
    normalize_fractions: bool,

    /// Print run statistics as JSON to stderr.
    #[arg(long, env = "GATE2JSON_STATS")]
    stats: bool,

    /// Disable progress bar.
    #[arg(long, env = "GATE2JSON_NO_PROGRESS")]
    no_progress: bool,
}

#[derive(Args, Debug)]
struct MergeKeyArgs {
    /// Questions JSON written by `gate2json extract`.
    questions: PathBuf,

    /// Answer-key table document.
    answer_key: PathBuf,

    /// Output JSON path.
    #[arg(
        short,
        long,
        env = "GATE2JSON_MERGE_OUTPUT",
        default_value = "gate_questions_updated.json"
    )]
    output: PathBuf,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum SegmentationArg {
    /// Split at question-number cells
    Marker,
    /// One question per table row
    Row,
    /// One question per table
    Table,
}

impl From<SegmentationArg> for Segmentation {
    fn from(v: SegmentationArg) -> Self {
        match v {
            SegmentationArg::Marker => Segmentation::MarkerScan,
            SegmentationArg::Row => Segmentation::PerRow,
            SegmentationArg::Table => Segmentation::PerTable,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum DuplicatesArg {
    Keep,
    First,
    Last,
    Reject,
}

impl From<DuplicatesArg> for DuplicatePolicy {
    fn from(v: DuplicatesArg) -> Self {
        match v {
            DuplicatesArg::Keep => DuplicatePolicy::KeepAll,
            DuplicatesArg::First => DuplicatePolicy::FirstWins,
            DuplicatesArg::Last => DuplicatePolicy::LastWins,
            DuplicatesArg::Reject => DuplicatePolicy::Reject,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO logs; verbose always wins.
    let show_progress = match &cli.command {
        Command::Extract(args) => !cli.quiet && !args.no_progress,
        Command::MergeKey(_) => false,
    };
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Extract(args) => run_extract(args, show_progress, cli.quiet).await,
        Command::MergeKey(args) => run_merge_key(args, cli.quiet).await,
    }
}

async fn run_extract(args: ExtractArgs, show_progress: bool, quiet: bool) -> Result<()> {
    let progress: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn ExtractionProgressCallback>)
    } else {
        None
    };
    let config = build_config(&args, progress)?;

    let mut output = extract(&args.input, &config)
        .await
        .context("Extraction failed")?;

    if let Some(ref key_path) = args.answer_key {
        let report = merge_answer_key_file(&mut output.questions, key_path)
            .await
            .with_context(|| format!("Failed to merge answer key {:?}", key_path))?;
        if !quiet {
            eprintln!(
                "{} answers for {}/{} questions",
                green("✓"),
                bold(&report.matched.to_string()),
                report.total
            );
            if !report.issues.is_empty() {
                eprintln!("  {} key rows skipped", yellow(&report.issues.len().to_string()));
            }
        }
    }

    write::write_questions(&output.questions, &args.output)
        .await
        .context("Failed to write output")?;

    if !quiet {
        let skipped = output.stats.skipped_blocks;
        if skipped > 0 || output.stats.duplicate_ids > 0 {
            eprintln!(
                "{} {} blocks skipped, {} duplicate ids",
                yellow("⚠"),
                skipped,
                output.stats.duplicate_ids
            );
        }
        if args.stats {
            eprintln!(
                "{}",
                serde_json::to_string_pretty(&output.stats).context("Failed to serialise stats")?
            );
        }
    }

    println!("{}", saved_line(output.questions.len(), &args.output));
    Ok(())
}

async fn run_merge_key(args: MergeKeyArgs, quiet: bool) -> Result<()> {
    let report = merge_answer_key_into_file(&args.questions, &args.answer_key, &args.output)
        .await
        .context("Answer-key merge failed")?;

    if !quiet && !report.issues.is_empty() {
        eprintln!("{} {} key rows skipped", yellow("⚠"), report.issues.len());
    }
    if !quiet {
        eprintln!(
            "{} answers for {}/{} questions",
            green("✓"),
            bold(&report.matched.to_string()),
            report.total
        );
    }
    println!("{}", saved_line(report.total, &args.output));
    Ok(())
}

/// Summary line for stdout; plain text so it survives pipes.
fn saved_line(count: usize, path: &Path) -> String {
    format!("Saved {} questions to {}", count, path.display())
}

/// Map CLI args to `ExtractionConfig`.
fn build_config(args: &ExtractArgs, progress: Option<ProgressCallback>) -> Result<ExtractionConfig> {
    let pages = parse_pages(&args.pages)?;

    let mut builder = ExtractionConfig::builder()
        .segmentation(args.segmentation.into())
        .duplicates(args.duplicates.into())
        .concurrency(args.concurrency)
        .normalize_fractions(args.normalize_fractions)
        .pages(pages);

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Parse `--pages` string into `PageSelection`.
fn parse_pages(s: &str) -> Result<PageSelection> {
    let s = s.trim().to_lowercase();

    if s == "all" {
        return Ok(PageSelection::All);
    }

    // Range: "3-15"
    if let Some((start, end)) = s.split_once('-') {
        let start: usize = start
            .trim()
            .parse()
            .context("Invalid start page in range")?;
        let end: usize = end.trim().parse().context("Invalid end page in range")?;

        if start < 1 {
            anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", start);
        }
        if start > end {
            anyhow::bail!(
                "Invalid page range '{}-{}': start must be <= end",
                start,
                end
            );
        }

        return Ok(PageSelection::Range(start, end));
    }

    // Set: "1,3,5,7"
    if s.contains(',') {
        let pages: Vec<usize> = s
            .split(',')
            .map(|p| {
                p.trim()
                    .parse::<usize>()
                    .with_context(|| format!("Invalid page number: '{}'", p.trim()))
            })
            .collect::<Result<Vec<_>>>()?;

        if let Some(&p) = pages.iter().find(|&&p| p < 1) {
            anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", p);
        }

        return Ok(PageSelection::Set(pages));
    }

    // Single page: "5"
    let page: usize = s.parse().context("Invalid page number")?;
    if page < 1 {
        anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", page);
    }

    Ok(PageSelection::Single(page))
}
