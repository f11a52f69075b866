use argh::FromArgs;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use mimalloc::MiMalloc;
use segregation_plots::{
    config::ReportConfig,
    report::{generate_report, report_plan},
};
use std::{path::PathBuf, time::Instant};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Debug, FromArgs)]
/// Plots segregation statistics for a census year
struct Args {
    #[argh(positional)]
    /// census year of the summaries, e.g. 2010
    year: u32,

    /// path to a YAML report configuration
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args: Args = argh::from_env();

    let config = match &args.config {
        Some(path) => ReportConfig::load_from_file(path)?,
        None => ReportConfig::default(),
    };

    // Start stopwatch
    let start_time = Instant::now();
    let tables = report_plan(args.year, &config).len();
    let progress = ProgressBar::new(tables as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")?.progress_chars("=> "),
    );

    let summary = generate_report(args.year, &config, |key| {
        progress.set_message(key.file_name());
        progress.inc(1);
    })?;
    progress.finish_and_clear();

    info!("Report complete in {}ms", start_time.elapsed().as_millis());
    println!(
        "Wrote {} pages from {} tables to {}",
        summary.pages,
        summary.tables,
        summary.path.display()
    );

    Ok(())
}
