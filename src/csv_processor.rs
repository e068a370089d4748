use crate::bar;
use crate::error;
use crate::resample;

/// Columns every price file must provide, after header normalization.
const REQUIRED_COLUMNS: [&str; 6] = ["date", "open", "high", "low", "close", "volume"];

/// Price columns that carry the ticker prefix when written back out.
const PREFIXED_COLUMNS: [&str; 6] = ["Open", "High", "Low", "Close", "Volume", "Adjusted"];

/// Tolerance used when comparing weekly means read back from disk.
const WEEKLY_TOLERANCE: f64 = 1e-6;

/// A price series as read from one CSV file, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSeries {
    /// Ticker taken from prefixed headers such as `AAPL.Close`.
    pub ticker: Option<String>,
    pub bars: Vec<bar::PriceBar>,
}

/// Normalizes a raw header row.
///
/// `AAPL.Close` becomes `close` and yields ticker `AAPL`; every other
/// header is trimmed and lower-cased. The first prefix seen wins.
///
/// # Returns
/// * `(csv::StringRecord, Option<String>)` - Normalized headers and the ticker, if any.
fn normalize_headers(raw: &csv::StringRecord) -> (csv::StringRecord, Option<String>) {
    let mut ticker = None::<String>;
    let mut normalized = csv::StringRecord::new();

    for header in raw.iter() {
        let header = header.trim();
        match header.rsplit_once('.') {
            Some((prefix, field)) if !prefix.is_empty() && !field.is_empty() => {
                if ticker.is_none() {
                    ticker = Some(prefix.to_string());
                }
                normalized.push_field(&field.to_lowercase());
            }
            _ => normalized.push_field(&header.to_lowercase()),
        }
    }

    (normalized, ticker)
}

/// Reads a price series from any CSV source.
///
/// Headers are normalized first, then each row is deserialized into a
/// `PriceBar`. A row that fails to deserialize (for instance an unparsable
/// date) aborts the read with the row position in the error.
///
/// # Errors
/// * `SeriesError::MissingColumn` if a required column is absent.
/// * `SeriesError::Csv` on malformed rows.
pub fn read_bars<R: std::io::Read>(input: R) -> error::Result<LoadedSeries> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let (headers, ticker) = normalize_headers(reader.headers()?);
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(error::SeriesError::MissingColumn(column.to_string()));
        }
    }
    reader.set_headers(headers);

    let mut bars = Vec::new();
    for result in reader.deserialize::<bar::PriceBar>() {
        bars.push(result?);
    }

    Ok(LoadedSeries { ticker, bars })
}

/// Reads a price series from a file through a read-only memory map.
///
/// # Arguments
/// * `path` - Path to the CSV file.
pub fn read_bars_from_path<P: AsRef<std::path::Path>>(path: P) -> error::Result<LoadedSeries> {
    let file = std::fs::File::open(path.as_ref())?;
    if file.metadata()?.len() == 0 {
        // Mapping an empty file fails on some platforms.
        return read_bars(std::io::empty());
    }
    let mmap = unsafe { memmap2::Mmap::map(&file)? };
    read_bars(&mmap[..])
}

/// Header row written for a series, mirroring the layout `read_bars` accepts.
///
/// `last` names the column after the band columns: `direction` for daily
/// bars, `sessions` for weekly ones.
fn prefixed_headers(ticker: Option<&str>, last: &str) -> Vec<String> {
    let mut headers = vec!["Date".to_string()];
    headers.extend(PREFIXED_COLUMNS.iter().map(|column| match ticker {
        Some(t) => format!("{}.{}", t, column),
        None => column.to_string(),
    }));
    headers.extend(["dn", "mavg", "up", last].map(String::from));
    headers
}

/// Writes bars to `path` with ticker-prefixed price headers.
///
/// # Arguments
/// * `path` - Destination file, overwritten if present.
/// * `ticker` - Prefix for the price columns.
/// * `bars` - Rows to write, in order.
pub fn write_bars<P: AsRef<std::path::Path>>(
    path: P,
    ticker: Option<&str>,
    bars: &[bar::PriceBar],
) -> error::Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path.as_ref())?;
    writer.write_record(prefixed_headers(ticker, "direction"))?;
    for bar in bars {
        writer.serialize(bar)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes weekly aggregates to `path`, one row per week, with the same
/// ticker-prefixed price headers as `write_bars`.
pub fn write_weekly<P: AsRef<std::path::Path>>(
    path: P,
    ticker: Option<&str>,
    weekly: &[resample::WeeklyBar],
) -> error::Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path.as_ref())?;
    writer.write_record(prefixed_headers(ticker, "sessions"))?;
    for week in weekly {
        writer.serialize(week)?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads weekly aggregates written by `write_weekly`.
pub fn read_weekly<P: AsRef<std::path::Path>>(path: P) -> error::Result<Vec<resample::WeeklyBar>> {
    let mut reader = csv::Reader::from_path(path.as_ref())?;
    let (headers, _) = normalize_headers(reader.headers()?);
    reader.set_headers(headers);
    let mut weekly = Vec::new();
    for result in reader.deserialize::<resample::WeeklyBar>() {
        weekly.push(result?);
    }
    Ok(weekly)
}

/// Re-reads a written series and checks it matches `expected` exactly.
pub fn verify_bars<P: AsRef<std::path::Path>>(path: P, expected: &[bar::PriceBar]) -> error::Result<bool> {
    let loaded = read_bars_from_path(path)?;
    Ok(loaded.bars == expected)
}

/// Re-reads written weekly aggregates and checks week labels and close means.
pub fn verify_weekly<P: AsRef<std::path::Path>>(
    path: P,
    expected: &[resample::WeeklyBar],
) -> error::Result<bool> {
    let loaded = read_weekly(path)?;
    if loaded.len() != expected.len() {
        return Ok(false);
    }
    let matches = loaded.iter().zip(expected).all(|(got, want)| {
        got.week_ending == want.week_ending && (got.close - want.close).abs() < WEEKLY_TOLERANCE
    });
    Ok(matches)
}
