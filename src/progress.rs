use crate::pipeline;

use rayon::prelude::*;

/// Builds the progress bar shown while series are processed.
fn progress_bar(len: u64) -> anyhow::Result<indicatif::ProgressBar> {
    let bar = indicatif::ProgressBar::new(len);
    bar.set_style(
        indicatif::ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )?
        .progress_chars("#>-"),
    );
    Ok(bar)
}

/// Runs the pipeline over every input file on the current Rayon pool.
///
/// Each file is an independent series with its own filter pass, so files
/// are processed in parallel. Reports come back in input order. The first
/// failing file aborts the run.
///
/// # Arguments
/// * `inputs` - CSV files to process.
/// * `config` - Settings shared by all files.
///
/// # Returns
/// * `anyhow::Result<Vec<SeriesReport>>` - One report per input.
pub fn process_files(
    inputs: &[std::path::PathBuf],
    config: &pipeline::PipelineConfig,
) -> anyhow::Result<Vec<pipeline::SeriesReport>> {
    let bar = progress_bar(inputs.len() as u64)?;
    let pipeline = pipeline::Pipeline::new(config.clone());

    let reports = inputs
        .par_iter()
        .map(|input| {
            tracing::debug!(thread = ?std::thread::current().id(), file = %input.display(), "processing");
            let report = pipeline.run(input);
            bar.inc(1);
            report
        })
        .collect::<anyhow::Result<Vec<_>>>();

    match &reports {
        Ok(_) => bar.finish_with_message("done"),
        Err(_) => bar.abandon_with_message("failed"),
    }
    reports
}
