use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use blogger2wxr::models::ConversionReport;
use blogger2wxr::atom::parse_file;
use blogger2wxr::{Config, Converter, ConverterConfig, Error, ProgressObserver};

#[derive(Parser, Debug)]
#[command(name = "blogger2wxr")]
#[command(version = "0.1.0")]
#[command(about = "Convert a Blogger Atom export into a WordPress WXR import file")]
struct Args {
    /// Blogger export file (Atom XML)
    input: PathBuf,

    /// Destination file (defaults to <input-stem>_to_wordpress.xml beside the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Report format (text, json)
    #[arg(short, long, default_value = "text")]
    report: String,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,
}

struct BarObserver {
    bar: ProgressBar,
}

impl BarObserver {
    fn new() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} entries")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Self { bar }
    }
}

impl ProgressObserver for BarObserver {
    fn on_start(&self, posts: usize, comments: usize) {
        self.bar.set_length((posts + comments) as u64);
    }

    fn on_post(&self) {
        self.bar.inc(1);
    }

    fn on_comment(&self) {
        self.bar.inc(1);
    }

    fn on_finish(&self) {
        self.bar.finish_and_clear();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("blogger2wxr=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Usage errors exit with 1; --help and --version keep clap's behaviour
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(1);
        }
        Err(e) => e.exit(),
    };

    let config = Config::from_env()?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input));

    let report = match run(&args, ConverterConfig::from(&config), &output).await {
        Ok(report) => report,
        Err(e) => match input_failure(&e) {
            Some(err) => {
                println!("{}", err);
                std::process::exit(1);
            }
            None => return Err(e),
        },
    };

    println!("Conversion completed. WXR file saved at: {}", output.display());
    print_report(&report, &args.report)?;

    Ok(())
}

async fn run(args: &Args, config: ConverterConfig, output: &Path) -> anyhow::Result<ConversionReport> {
    let input = args.input.clone();
    let show_progress = !args.no_progress;

    // Reading, parsing and conversion run as one unit on a worker thread
    let conversion = tokio::task::spawn_blocking(move || -> blogger2wxr::Result<_> {
        let source = parse_file(&input)?;
        let mut converter = Converter::new(config);
        if show_progress {
            converter = converter.with_progress(Arc::new(BarObserver::new()));
        }
        Ok(converter.convert(&source))
    })
    .await??;

    let xml = blogger2wxr::wxr::to_xml_string(&conversion.document)?;
    tokio::fs::write(output, xml).await?;
    tracing::info!("Output written to: {}", output.display());

    Ok(conversion.report)
}

/// Missing or unreadable-as-Atom input: reported as a plain message with exit code 1.
fn input_failure(err: &anyhow::Error) -> Option<&Error> {
    err.downcast_ref::<Error>().filter(|e| e.is_input_error())
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{}_to_wordpress.xml", stem))
}

fn print_report(report: &ConversionReport, format: &str) -> anyhow::Result<()> {
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(report)?),
        _ => print!("{}", format_text(report)),
    }
    Ok(())
}

fn format_text(report: &ConversionReport) -> String {
    let mut output = String::new();

    output.push_str(&format!("Posts: {}\n", report.posts));
    output.push_str(&format!("Comments: {}\n", report.comments));
    output.push_str(&format!("Authors: {}\n", report.authors));
    output.push_str(&format!(
        "Tags: {} ({} URL labels discarded)\n",
        report.tags, report.discarded_labels
    ));

    if report.has_skipped() {
        output.push_str(&format!(
            "\nSkipped comments ({}):\n",
            report.skipped_comments.len()
        ));
        for skipped in &report.skipped_comments {
            output.push_str(&format!(
                "  - {} (in reply to {:?})\n",
                skipped.source_id, skipped.in_reply_to
            ));
        }
    }

    output
}
