use crate::bar;

use chrono::Datelike;

/// Min, max and mean of the close column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloseSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl CloseSummary {
    /// Summarizes closing prices; `None` for an empty series.
    pub fn from_bars(bars: &[bar::PriceBar]) -> Option<Self> {
        let first = bars.first()?;
        let (min, max, sum) = bars.iter().fold(
            (first.close, first.close, 0.0),
            |(min, max, sum), b| (min.min(b.close), max.max(b.close), sum + b.close),
        );
        Some(CloseSummary {
            min,
            max,
            mean: sum / bars.len() as f64,
        })
    }
}

/// Mean daily volume; `None` for an empty series.
pub fn mean_volume(bars: &[bar::PriceBar]) -> Option<f64> {
    if bars.is_empty() {
        return None;
    }
    let total: f64 = bars.iter().map(|b| b.volume as f64).sum();
    Some(total / bars.len() as f64)
}

/// A series split around a volume threshold. Both sides keep input order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VolumePartition {
    pub at_or_above: Vec<bar::PriceBar>,
    pub below: Vec<bar::PriceBar>,
}

/// Splits `bars` into days whose volume is `>= threshold` and the rest.
pub fn partition_by_volume(bars: &[bar::PriceBar], threshold: f64) -> VolumePartition {
    let (at_or_above, below): (Vec<_>, Vec<_>) = bars
        .iter()
        .cloned()
        .partition(|b| b.volume as f64 >= threshold);
    VolumePartition { at_or_above, below }
}

/// Days trading at or above the series' own mean volume.
#[derive(Debug, Clone, PartialEq)]
pub struct HighVolume {
    pub mean_volume: f64,
    pub bars: Vec<bar::PriceBar>,
}

pub fn high_volume(bars: &[bar::PriceBar]) -> Option<HighVolume> {
    let mean = mean_volume(bars)?;
    Some(HighVolume {
        mean_volume: mean,
        bars: partition_by_volume(bars, mean).at_or_above,
    })
}

pub fn day_of_week(bar: &bar::PriceBar) -> chrono::Weekday {
    bar.date.weekday()
}
