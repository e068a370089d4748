/// Errors raised while locating, reading or writing a price series.
#[derive(Debug, thiserror::Error)]
pub enum SeriesError {
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    #[error("CSV error")]
    Csv(#[from] csv::Error),

    /// A column every price series must carry is absent from the header row.
    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("no CSV files found in {0}")]
    NoInputs(std::path::PathBuf),

    #[error("path does not exist: {0}")]
    PathNotFound(std::path::PathBuf),
}

pub type Result<T> = std::result::Result<T, SeriesError>;
