use crate::ordered;

/// Daily direction indicator carried by some price files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Direction {
    Increasing,
    Decreasing,
}

/// One daily observation of a price series.
///
/// Field names match the normalized CSV header (see `csv_processor`), so a
/// `TICKER.Open` column lands in `open`. The moving-average band columns
/// (`dn`, `mavg`, `up`), `adjusted` and `direction` are optional: files
/// without them still load, and empty cells become `None`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PriceBar {
    pub date: chrono::NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    #[serde(default)]
    pub adjusted: Option<f64>,
    #[serde(default)]
    pub dn: Option<f64>,
    #[serde(default)]
    pub mavg: Option<f64>,
    #[serde(default)]
    pub up: Option<f64>,
    #[serde(default)]
    pub direction: Option<Direction>,
}

impl PriceBar {
    /// Bar with only the required columns filled.
    pub fn new(date: chrono::NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        PriceBar {
            date,
            open,
            high,
            low,
            close,
            volume,
            adjusted: None,
            dn: None,
            mavg: None,
            up: None,
            direction: None,
        }
    }
}

impl ordered::Timestamped for PriceBar {
    fn timestamp(&self) -> Option<chrono::NaiveDate> {
        Some(self.date)
    }
}
