mod cli;

use price_series::pipeline;
use price_series::progress;
use price_series::source;
use price_series::utils;

/// Prints the report for one processed series.
fn print_report(report: &pipeline::SeriesReport) {
    println!("{}", "-".repeat(80));
    println!(
        "📊 {} ({}, {})",
        report.input.display(),
        report.ticker.as_deref().unwrap_or("unknown ticker"),
        report.retrieval,
    );
    println!(
        "   rows loaded: {}, kept: {}, discarded: {}",
        report.loaded,
        report.accepted(),
        report.rejected
    );
    match &report.close {
        Some(close) => {
            println!("   Min Price: {}", close.min);
            println!("   Max Price: {}", close.max);
            println!("   Avg Price: {}", close.mean);
        }
        None => println!("   No rows left after cleaning"),
    }
    if let Some(mean) = report.mean_volume {
        println!("   The average volume is {}", mean);
    }
    for written in [&report.high_volume, &report.weekly].into_iter().flatten() {
        let check = match written.verified {
            Some(true) => " (verified)",
            Some(false) => " (⚠️ verification failed)",
            None => "",
        };
        println!("   wrote {} rows to {}{}", written.rows, written.path.display(), check);
    }
    for line in &report.preview {
        println!("{}", line);
    }
}

/// Main entry point of the application.
///
/// 1. Parses command-line arguments and installs the log subscriber.
/// 2. Resolves input files and prepares the output directory.
/// 3. Runs the pipeline for every input, in parallel across files.
/// 4. Prints one report per series.
///
/// # Returns
///
/// * `anyhow::Result<()>` - Success or an error if any step fails.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let total_start = std::time::Instant::now();
    let args = cli::Args::parse();
    println!("Start processing...");

    let inputs = source::resolve_inputs(&args.input)?;
    source::ensure_dir_exist(&args.output)?;

    let config = pipeline::PipelineConfig {
        output_dir: args.output.clone(),
        cache_dir: args.cache.clone(),
        verify: args.check,
        preview_rows: args.preview,
    };

    let threads = utils::effective_threads(args.threads)?;
    println!("🚀 Using {} thread(s) for {} file(s)", threads, inputs.len());

    let reports = if args.threads.is_some() {
        let local_pool = utils::configure_thread_pool(threads)?;
        local_pool.install(|| progress::process_files(&inputs, &config))?
    } else {
        progress::process_files(&inputs, &config)?
    };

    for report in &reports {
        print_report(report);
    }

    println!(
        "✅ Processing completed in {:?} seconds",
        total_start.elapsed().as_secs_f64()
    );

    if reports.iter().all(pipeline::SeriesReport::verified_ok) {
        Ok(())
    } else {
        Err(anyhow::anyhow!("Some output files did not read back as written"))
    }
}
