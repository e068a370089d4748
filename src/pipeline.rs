use crate::bar;
use crate::csv_processor;
use crate::ordered;
use crate::resample;
use crate::source;
use crate::stats;
use crate::utils;

use anyhow::Context;

/// Settings shared by every series processed in one run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory receiving the generated CSV files.
    pub output_dir: std::path::PathBuf,
    /// Local cache for input files; `None` reads inputs in place.
    pub cache_dir: Option<std::path::PathBuf>,
    /// Re-read written files and compare them with what was written.
    pub verify: bool,
    /// Rows shown in each preview. Zero disables previews.
    pub preview_rows: usize,
}

impl PipelineConfig {
    pub fn new<P: Into<std::path::PathBuf>>(output_dir: P) -> Self {
        PipelineConfig {
            output_dir: output_dir.into(),
            cache_dir: None,
            verify: false,
            preview_rows: 5,
        }
    }
}

/// Outcome of one written file.
#[derive(Debug, Clone, PartialEq)]
pub struct WrittenFile {
    pub path: std::path::PathBuf,
    pub rows: usize,
    /// `Some` when verification was requested.
    pub verified: Option<bool>,
}

/// Everything one pipeline run learned about a series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesReport {
    pub input: std::path::PathBuf,
    pub retrieval: source::Retrieval,
    pub ticker: Option<String>,
    pub loaded: usize,
    pub rejected: usize,
    pub close: Option<stats::CloseSummary>,
    pub mean_volume: Option<f64>,
    pub high_volume: Option<WrittenFile>,
    pub weekly: Option<WrittenFile>,
    /// Preview lines, section headers included. Printed by the caller so
    /// concurrent runs do not interleave their output.
    pub preview: Vec<String>,
}

impl SeriesReport {
    /// Rows left after cleaning.
    pub fn accepted(&self) -> usize {
        self.loaded - self.rejected
    }

    /// `false` if any verified file did not read back as written.
    pub fn verified_ok(&self) -> bool {
        [&self.high_volume, &self.weekly]
            .into_iter()
            .flatten()
            .all(|f| f.verified != Some(false))
    }
}

/// Runs the cleaning and analysis stages for one series at a time.
///
/// Stages, in order: retrieve, load, clean, summarize, high-volume split,
/// weekly aggregation. Each stage works on the output of the previous one;
/// nothing is shared between runs.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Pipeline { config }
    }

    fn output_path(&self, input: &std::path::Path, suffix: &str) -> std::path::PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "series".to_string());
        self.config.output_dir.join(format!("{}.{}.csv", stem, suffix))
    }

    /// Processes the series stored at `input`.
    ///
    /// # Errors
    /// * Retrieval, read or write failures, with the file in the context.
    pub fn run<P: AsRef<std::path::Path>>(&self, input: P) -> anyhow::Result<SeriesReport> {
        let input = input.as_ref();
        let (path, retrieval) = source::retrieve(input, self.config.cache_dir.as_deref())
            .with_context(|| format!("Failed to retrieve {}", input.display()))?;
        tracing::info!(file = %input.display(), "{}", retrieval);

        let loaded = csv_processor::read_bars_from_path(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let ticker = loaded.ticker;
        let loaded_rows = loaded.bars.len();

        let bars = clean(loaded.bars);
        let rejected = loaded_rows - bars.len();
        let mut preview = Vec::new();
        if self.config.preview_rows > 0 {
            preview.push(format!("📄 Cleaned series ({} rows):", bars.len()));
            preview.extend(utils::format_bars(&bars, self.config.preview_rows));
        }

        let close = stats::CloseSummary::from_bars(&bars);
        let mut report = SeriesReport {
            input: input.to_path_buf(),
            retrieval,
            ticker,
            loaded: loaded_rows,
            rejected,
            close,
            mean_volume: None,
            high_volume: None,
            weekly: None,
            preview,
        };

        let Some(high) = stats::high_volume(&bars) else {
            tracing::warn!(file = %input.display(), "series is empty after cleaning, nothing to write");
            return Ok(report);
        };
        report.mean_volume = Some(high.mean_volume);
        let ticker = report.ticker.clone();
        report.high_volume =
            Some(self.write_high_volume(input, ticker.as_deref(), &high, &mut report.preview)?);

        let weekly = resample::resample_weekly(&bars);
        report.weekly = Some(self.write_weekly(input, ticker.as_deref(), &weekly, &mut report.preview)?);

        Ok(report)
    }

    fn write_high_volume(
        &self,
        input: &std::path::Path,
        ticker: Option<&str>,
        high: &stats::HighVolume,
        preview: &mut Vec<String>,
    ) -> anyhow::Result<WrittenFile> {
        let path = self.output_path(input, source::HIGH_VOLUME_SUFFIX);
        csv_processor::write_bars(&path, ticker, &high.bars)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!(file = %path.display(), rows = high.bars.len(), "wrote high-volume days");

        let verified = if self.config.verify {
            Some(csv_processor::verify_bars(&path, &high.bars)?)
        } else {
            None
        };

        if self.config.preview_rows > 0 {
            preview.push(format!("📈 High-volume days (volume >= {:.0}):", high.mean_volume));
            preview.extend(utils::format_bars_with_weekday(&high.bars, self.config.preview_rows));
        }

        Ok(WrittenFile {
            path,
            rows: high.bars.len(),
            verified,
        })
    }

    fn write_weekly(
        &self,
        input: &std::path::Path,
        ticker: Option<&str>,
        weekly: &[resample::WeeklyBar],
        preview: &mut Vec<String>,
    ) -> anyhow::Result<WrittenFile> {
        let path = self.output_path(input, source::WEEKLY_SUFFIX);
        csv_processor::write_weekly(&path, ticker, weekly)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!(file = %path.display(), rows = weekly.len(), "wrote weekly aggregation");

        let verified = if self.config.verify {
            Some(csv_processor::verify_weekly(&path, weekly)?)
        } else {
            None
        };

        if self.config.preview_rows > 0 {
            preview.push(format!("📈 Weekly aggregation ({} weeks):", weekly.len()));
            preview.extend(utils::format_weekly_head_tail(weekly, self.config.preview_rows));
        }

        Ok(WrittenFile {
            path,
            rows: weekly.len(),
            verified,
        })
    }
}

/// Drops out-of-order and duplicate-date rows, logging each one.
pub fn clean(bars: Vec<bar::PriceBar>) -> Vec<bar::PriceBar> {
    let outcome = ordered::filter_ordered(bars);
    if !outcome.rejected.is_empty() {
        tracing::warn!("Discarding {} rows that are out of order", outcome.rejected.len());
        for row in &outcome.rejected {
            tracing::warn!(date = %row.date, close = row.close, volume = row.volume, "discarded row");
        }
    }
    outcome.accepted
}
