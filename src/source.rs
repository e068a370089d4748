use crate::error;

/// Where the data for a run was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retrieval {
    /// Read straight from the input path; no cache configured.
    Direct,
    /// A cached copy already existed and was used.
    Cached,
    /// The input was copied into the cache, then read from there.
    Fetched,
}

impl std::fmt::Display for Retrieval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Retrieval::Direct => write!(f, "read from source"),
            Retrieval::Cached => write!(f, "retrieved locally"),
            Retrieval::Fetched => write!(f, "retrieved from source and written locally"),
        }
    }
}

/// Suffixes the pipeline appends to an input's stem for the files it writes.
pub const HIGH_VOLUME_SUFFIX: &str = "high-volume";
pub const WEEKLY_SUFFIX: &str = "weekly-aggregation";

/// Whether `path` names a file written by a previous run, such as
/// `aapl.high-volume.csv`.
pub fn is_generated_output(path: &std::path::Path) -> bool {
    let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
        return false;
    };
    [HIGH_VOLUME_SUFFIX, WEEKLY_SUFFIX]
        .iter()
        .any(|suffix| stem.ends_with(&format!(".{}", suffix)))
}

/// Fails if `path` does not exist.
pub fn check_path<P: AsRef<std::path::Path>>(path: P) -> error::Result<()> {
    if path.as_ref().exists() {
        Ok(())
    } else {
        Err(error::SeriesError::PathNotFound(path.as_ref().to_path_buf()))
    }
}

/// Creates `dir` and its parents when missing.
pub fn ensure_dir_exist<P: AsRef<std::path::Path>>(dir: P) -> error::Result<()> {
    std::fs::create_dir_all(dir.as_ref())?;
    Ok(())
}

/// Lists the CSV files behind `path`.
///
/// A file is returned as-is. A directory yields its `.csv` entries (case
/// insensitive extension), sorted by name so runs are reproducible.
/// Files written by earlier runs (see `is_generated_output`) are skipped, so
/// the output directory may be the input directory.
///
/// # Errors
/// * `SeriesError::PathNotFound` if `path` does not exist.
/// * `SeriesError::NoInputs` if a directory holds no CSV file.
pub fn resolve_inputs<P: AsRef<std::path::Path>>(path: P) -> error::Result<Vec<std::path::PathBuf>> {
    let path = path.as_ref();
    check_path(path)?;
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = std::fs::read_dir(path)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .map_or(false, |ext| ext.eq_ignore_ascii_case("csv"))
                && !is_generated_output(p)
        })
        .collect::<Vec<_>>();

    if files.is_empty() {
        return Err(error::SeriesError::NoInputs(path.to_path_buf()));
    }
    files.sort();
    Ok(files)
}

/// Resolves the file a series should be read from, filling the cache on a miss.
///
/// Without `cache_dir` the source itself is read. With one, an existing
/// `cache_dir/<file name>` is preferred; otherwise the source is copied
/// there first so later runs are served from the cache.
///
/// # Returns
/// * `(PathBuf, Retrieval)` - Path to read and how it was obtained.
pub fn retrieve<P: AsRef<std::path::Path>>(
    source: P,
    cache_dir: Option<&std::path::Path>,
) -> error::Result<(std::path::PathBuf, Retrieval)> {
    let source = source.as_ref();
    let Some(cache_dir) = cache_dir else {
        check_path(source)?;
        return Ok((source.to_path_buf(), Retrieval::Direct));
    };

    let file_name = source
        .file_name()
        .ok_or_else(|| error::SeriesError::PathNotFound(source.to_path_buf()))?;
    let cached = cache_dir.join(file_name);
    if cached.is_file() {
        return Ok((cached, Retrieval::Cached));
    }

    check_path(source)?;
    ensure_dir_exist(cache_dir)?;
    std::fs::copy(source, &cached)?;
    Ok((cached, Retrieval::Fetched))
}
