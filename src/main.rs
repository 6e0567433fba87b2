use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod error;
mod log;
mod model;
mod render;

use model::BuildStatistics;
use render::{OutputFormat, StatisticsFormat};

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "nv")]
#[command(about = "Ninja build log analyzer", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,

    /// Path to the .ninja_log file
    #[arg(long, global = true, default_value = ".ninja_log")]
    logfile: PathBuf,

    #[command(subcommand)]
    cmd: Option<Commands>,

    #[command(flatten)]
    analyze: AnalyzeArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze Ninja build logs (default command)
    Analyze(AnalyzeArgs),

    /// Show build statistics and metrics
    Stats {
        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: StatisticsFormat,
    },

    /// Visualize build statistics and metrics
    Visualize {
        /// Where to write the HTML timeline (defaults to a temporary file)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Open the timeline with the system viewer
        #[arg(long)]
        open: bool,
    },
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Sort output by duration
    #[arg(short, long)]
    sort: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    format: OutputFormat,

    /// Output file path (use '-' for stdout)
    #[arg(short, long, default_value = "-")]
    output: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so listings on stdout stay clean. RUST_LOG wins over -v/-q.
    let level = cli.verbose.tracing_level_filter();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,nv={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cmd = cli.cmd.unwrap_or(Commands::Analyze(cli.analyze));
    match cmd {
        Commands::Analyze(args) => analyze(&cli.logfile, args),
        Commands::Stats { format } => {
            let file = log::load(&cli.logfile)?;
            let stats = BuildStatistics::compute(&file.entries);
            print!("{}", format.render(&stats));
            Ok(())
        }
        Commands::Visualize { output, open } => visualize(&cli.logfile, output, open),
    }
}

fn analyze(logfile: &Path, args: AnalyzeArgs) -> Result<()> {
    let mut entries = log::load(logfile)?.entries;
    if args.sort {
        // Stable: equal durations keep file order.
        entries.sort_by(|a, b| b.duration().total_cmp(&a.duration()));
    }

    let text = args.format.render(&entries)?;
    if args.output == "-" {
        print!("{text}");
    } else {
        std::fs::write(&args.output, text)
            .with_context(|| format!("write output file {}", args.output))?;
    }
    Ok(())
}

fn visualize(logfile: &Path, output: Option<PathBuf>, launch: bool) -> Result<()> {
    let file = log::load(logfile)?;

    // Both only read the entries.
    let (stats, lanes) = rayon::join(
        || BuildStatistics::compute(&file.entries),
        || model::layout(&file.entries),
    );
    info!(lanes = lanes.lanes.len(), cores = stats.parallelism.cores, "computed timeline");

    let data = model::build_report_data(&stats, &lanes);
    let html = render::render_html_report(&data)?;

    let out = write_report(output, &html)?;
    println!("Generated visualization at: {}", out.display());

    if launch {
        open::that(&out).with_context(|| format!("open {}", out.display()))?;
    }
    Ok(())
}

/// Write the timeline to `output`, or to a fresh file in the temp directory
/// that outlives this process.
fn write_report(output: Option<PathBuf>, html: &str) -> Result<PathBuf> {
    if let Some(out) = output {
        std::fs::write(&out, html).with_context(|| format!("write timeline {}", out.display()))?;
        return Ok(out);
    }

    let mut file = tempfile::Builder::new()
        .prefix("ninja-timeline-")
        .suffix(".html")
        .tempfile()
        .context("create timeline file")?;
    file.write_all(html.as_bytes())
        .with_context(|| format!("write timeline {}", file.path().display()))?;
    let (_, path) = file.keep().context("keep timeline file")?;
    Ok(path)
}
