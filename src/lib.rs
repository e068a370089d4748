//! Daily price series cleaning and analysis.
//!
//! Loads daily OHLCV CSV files, drops rows that break chronological order
//! (`ordered`), then derives close statistics, a high-volume subset and a
//! weekly aggregation (`pipeline`).

pub mod bar;
pub mod csv_processor;
pub mod error;
pub mod ordered;
pub mod pipeline;
pub mod progress;
pub mod resample;
pub mod source;
pub mod stats;
pub mod utils;
