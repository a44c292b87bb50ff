use std::path::PathBuf;
use std::time::Duration;

use abpe::config::AdaptConfig;
use abpe::filter::filter_merges;
use abpe::pipeline::Adapter;
use abpe::serialization::{load_pretrained_merges, write_merge_file, write_report};
use anyhow::{bail, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use serde_json::json;

const DEFAULT_OUTPUT: &str = "adapted.txt";
const DEFAULT_MERGE_OUTPUT: &str = "final_merges.txt";

#[derive(Parser, Debug)]
#[command(author, version, about = "Corpus-adaptive BPE merge toolkit", long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (-q, -qq)
    #[arg(short = 'q', long, global = true, action = ArgAction::Count)]
    quiet: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the full filter-apply-refine pipeline over a corpus
    Adapt(AdaptArgs),
    /// Validate a pretrained merge table without touching a corpus
    Filter(FilterArgs),
}

#[derive(Args, Debug)]
struct AdaptArgs {
    /// Pretrained tokenizer.json (or a directory containing one)
    #[arg(short = 'm', long, value_name = "PATH")]
    tokenizer: PathBuf,

    /// UTF-8 corpus text file
    #[arg(short = 'c', long, value_name = "PATH")]
    corpus: PathBuf,

    /// Maximum number of pretrained merges to accept
    #[arg(short = 'n', long, value_name = "COUNT")]
    num_merges: usize,

    /// Output path for the flattened token stream
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Output path for the final merge list
    #[arg(long, value_name = "PATH", default_value = DEFAULT_MERGE_OUTPUT)]
    merge_output: PathBuf,

    /// Optional path for the JSON run report
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,

    /// Skip the swap-based refinement pass
    #[arg(long)]
    no_refine: bool,

    /// Disable the spinner and per-merge logging
    #[arg(long)]
    no_progress: bool,
}

#[derive(Args, Debug)]
struct FilterArgs {
    /// Pretrained tokenizer.json (or a directory containing one)
    #[arg(short = 'm', long, value_name = "PATH")]
    tokenizer: PathBuf,

    /// Maximum number of pretrained merges to accept
    #[arg(short = 'n', long, value_name = "COUNT")]
    num_merges: usize,

    /// Optional path for the accepted merge list
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Emit a JSON summary instead of human-readable output
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Adapt(args) => run_adapt(args),
        Commands::Filter(args) => run_filter(args),
    }
}

fn init_logging(verbose: u8, quiet: u8) {
    use log::LevelFilter;

    let level = if quiet > 0 {
        match quiet {
            1 => LevelFilter::Warn,
            _ => LevelFilter::Error,
        }
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    builder.format_timestamp_millis();
    builder.filter_level(level);
    let _ = builder.try_init();
}

fn run_adapt(args: AdaptArgs) -> Result<()> {
    let cfg = AdaptConfig::builder()
        .num_merges(args.num_merges)
        .refine(!args.no_refine)
        .show_progress(!args.no_progress)
        .build()?;

    let spinner = if args.no_progress {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner} adapting merges... {elapsed}")
            .expect("static template is valid");
        pb.set_style(style);
        pb.enable_steady_tick(Duration::from_millis(80));
        Some(pb)
    };

    let adapter = Adapter::new(cfg);
    let artifacts = adapter
        .adapt_paths(&args.tokenizer, &args.corpus)
        .with_context(|| {
            format!(
                "failed to adapt {} to {}",
                args.tokenizer.display(),
                args.corpus.display()
            )
        })?;
    if let Some(pb) = spinner {
        pb.finish_with_message("adaptation complete");
    }

    std::fs::write(&args.output, &artifacts.output_text)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    write_merge_file(&args.merge_output, &artifacts.final_merges)
        .with_context(|| format!("failed to write {}", args.merge_output.display()))?;
    if let Some(report_path) = &args.report {
        write_report(report_path, &artifacts.report)
            .with_context(|| format!("failed to write {}", report_path.display()))?;
    }

    let report = &artifacts.report;
    info!(
        "adaptation complete: accepted={} skipped={} swaps={} duration={:.2?}",
        report.accepted_merges,
        report.skipped_merges.len(),
        report.refinement_log.len(),
        report.total_duration
    );
    println!(
        "wrote {} final merges to {}",
        artifacts.final_merges.len(),
        args.merge_output.display()
    );
    println!(
        "corpus {} chars | tokens {} -> {} | compression utility {:.6}",
        report.char_count,
        report.initial_corpus_size,
        report.final_corpus_size,
        report.compression_utility
    );

    Ok(())
}

fn run_filter(args: FilterArgs) -> Result<()> {
    if args.num_merges == 0 {
        bail!("num-merges must be greater than zero");
    }
    let merges = load_pretrained_merges(&args.tokenizer)
        .with_context(|| format!("failed to load {}", args.tokenizer.display()))?;
    let outcome = filter_merges(&merges, args.num_merges);

    if let Some(output) = &args.output {
        write_merge_file(output, &outcome.accepted)
            .with_context(|| format!("failed to write {}", output.display()))?;
    }

    if args.json {
        let summary = json!({
            "pretrained": merges.len(),
            "accepted": outcome.accepted.len(),
            "skipped": outcome.skipped,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "accepted {} of {} pretrained merges ({} skipped)",
            outcome.accepted.len(),
            merges.len(),
            outcome.skipped.len()
        );
        for skipped in &outcome.skipped {
            println!("  {skipped}");
        }
    }

    Ok(())
}
