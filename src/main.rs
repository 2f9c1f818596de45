use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod host;
mod log;
mod model;
mod render;
mod report;
mod schema;
mod source;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "benchmark-report")]
#[command(about = "Resource usage report and JSON schema tools", long_about = None)]
struct Cli {
    /// Log at DEBUG level (RUST_LOG overrides).
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a raw stats dump into a CSV, a chart and a resource recommendation.
    Report {
        /// Explicit input file; skips the directory scan.
        #[arg(long, env = "BENCHMARK_REPORT_INPUT")]
        input: Option<PathBuf>,

        /// Directory scanned for the newest matching file.
        #[arg(long, default_value = ".")]
        dir: PathBuf,

        #[arg(long, default_value = source::DEFAULT_PATTERN)]
        pattern: String,

        /// Where to write outputs (default: next to the input).
        #[arg(long)]
        out_dir: Option<PathBuf>,

        #[arg(long)]
        no_plot: bool,
    },

    /// Print the key/type structure of a JSON document.
    Schema {
        #[arg(long, default_value = schema::DEFAULT_INPUT)]
        input: PathBuf,

        /// Top-level key whose first element is described in depth.
        #[arg(long, default_value = schema::DEFAULT_EXPAND_KEY)]
        expand: String,

        /// Describe the whole document instead.
        #[arg(long)]
        full: bool,
    },
}

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match cli.cmd {
        Commands::Report {
            input,
            dir,
            pattern,
            out_dir,
            no_plot,
        } => {
            let source = match input {
                Some(path) => source::InputSource::Explicit(path),
                None => source::InputSource::Latest { dir, pattern },
            };
            let outcome = report::run(&report::ReportOptions {
                source,
                out_dir,
                plot: !no_plot,
            })?;
            tracing::info!(
                input = %outcome.input.display(),
                csv = %outcome.csv.display(),
                plot = ?outcome.plot,
                samples = outcome.summary.samples,
                dropped = outcome.dropped,
                "report complete"
            );
            println!("{}", outcome.recommendation);
        }
        Commands::Schema {
            input,
            expand,
            full,
        } => {
            let doc = schema::load(&input)?;
            let text = if full {
                schema::describe_full(&doc)
            } else {
                schema::describe_top_level(&doc, &expand)
            };
            print!("{}", text);
        }
    }

    Ok(())
}
