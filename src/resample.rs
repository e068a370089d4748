use crate::bar;

use chrono::Datelike;

/// One week of a daily series, each column averaged over the week's bars.
///
/// `week_ending` is the Sunday that closes the calendar week. Optional
/// columns average only the days where they are present.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WeeklyBar {
    #[serde(rename = "date")]
    pub week_ending: chrono::NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub adjusted: Option<f64>,
    pub dn: Option<f64>,
    pub mavg: Option<f64>,
    pub up: Option<f64>,
    /// Number of daily bars that fell into the week.
    pub sessions: usize,
}

/// Running arithmetic mean.
#[derive(Debug, Clone, Copy, Default)]
struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn push_opt(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.push(v);
        }
    }

    fn value(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Accumulates the bars of one week.
#[derive(Debug, Clone, Copy)]
struct WeekAccumulator {
    week_ending: chrono::NaiveDate,
    open: Mean,
    high: Mean,
    low: Mean,
    close: Mean,
    volume: Mean,
    adjusted: Mean,
    dn: Mean,
    mavg: Mean,
    up: Mean,
}

impl WeekAccumulator {
    fn start(week_ending: chrono::NaiveDate, item: &bar::PriceBar) -> Self {
        let mut acc = WeekAccumulator {
            week_ending,
            open: Mean::default(),
            high: Mean::default(),
            low: Mean::default(),
            close: Mean::default(),
            volume: Mean::default(),
            adjusted: Mean::default(),
            dn: Mean::default(),
            mavg: Mean::default(),
            up: Mean::default(),
        };
        acc.add(item);
        acc
    }

    fn add(&mut self, item: &bar::PriceBar) {
        self.open.push(item.open);
        self.high.push(item.high);
        self.low.push(item.low);
        self.close.push(item.close);
        self.volume.push(item.volume as f64);
        self.adjusted.push_opt(item.adjusted);
        self.dn.push_opt(item.dn);
        self.mavg.push_opt(item.mavg);
        self.up.push_opt(item.up);
    }

    fn finish(&self) -> WeeklyBar {
        // Required columns are pushed for every bar, and a week is only
        // started from a bar, so their means always exist.
        WeeklyBar {
            week_ending: self.week_ending,
            open: self.open.value().unwrap_or_default(),
            high: self.high.value().unwrap_or_default(),
            low: self.low.value().unwrap_or_default(),
            close: self.close.value().unwrap_or_default(),
            volume: self.volume.value().unwrap_or_default(),
            adjusted: self.adjusted.value(),
            dn: self.dn.value(),
            mavg: self.mavg.value(),
            up: self.up.value(),
            sessions: self.close.count,
        }
    }
}

/// Sunday closing the calendar week that contains `date`.
pub fn week_ending(date: chrono::NaiveDate) -> chrono::NaiveDate {
    let days_left = 6 - date.weekday().num_days_from_monday();
    date.checked_add_days(chrono::Days::new(u64::from(days_left)))
        .unwrap_or(chrono::NaiveDate::MAX)
}

/// Aggregates a daily series into weekly bars.
///
/// Bars are grouped by the Sunday that ends their week and each numeric
/// column is averaged within the group. Weeks without any bar produce no
/// row. `items` must be in increasing date order, as produced by
/// `ordered::filter_ordered`; a week split by out-of-order rows would be
/// emitted twice.
///
/// # Arguments
/// * `items` - Daily bars in increasing date order.
///
/// # Returns
/// * `Vec<WeeklyBar>` - One bar per week that has data, oldest first.
pub fn resample_weekly(items: &[bar::PriceBar]) -> Vec<WeeklyBar> {
    let mut resampled = Vec::new();
    let mut current: Option<WeekAccumulator> = None;

    for item in items {
        let bucket = week_ending(item.date);

        match current {
            Some(ref mut acc) if acc.week_ending == bucket => acc.add(item),
            Some(acc) => {
                resampled.push(acc.finish());
                current = Some(WeekAccumulator::start(bucket, item));
            }
            None => current = Some(WeekAccumulator::start(bucket, item)),
        }
    }

    if let Some(acc) = current {
        resampled.push(acc.finish());
    }

    resampled
}
