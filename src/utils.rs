use crate::bar;
use crate::resample;
use crate::stats;

/// Configures a custom Rayon thread pool with specified size.
///
/// # Arguments
/// * `num_threads` - Desired number of threads for the pool.
///
/// # Returns
/// * `Result<ThreadPool>` - Created thread pool or an error if creation fails.
pub fn configure_thread_pool(num_threads: usize) -> anyhow::Result<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build thread pool: {}", e))
}

/// Caps a requested thread count at the number of available CPUs.
///
/// `None` keeps Rayon's default pool size.
pub fn effective_threads(requested: Option<usize>) -> anyhow::Result<usize> {
    match requested {
        Some(0) => Err(anyhow::anyhow!("Number of threads must be a positive integer")),
        Some(n) => {
            let max_threads = num_cpus::get();
            if n > max_threads {
                tracing::warn!(requested = n, max_threads, "limiting thread count to available CPUs");
                Ok(max_threads)
            } else {
                Ok(n)
            }
        }
        None => Ok(rayon::current_num_threads()),
    }
}

fn format_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v))
}

/// Formats the first `count` daily bars, one line each.
///
/// # Example Output
/// ```text
///  - 2015-02-17 open: 127.49, high: 128.88, low: 126.92, close: 127.83, vol: 63152400, mavg: 117.93
/// ```
pub fn format_bars(items: &[bar::PriceBar], count: usize) -> Vec<String> {
    items
        .iter()
        .take(count)
        .map(|item| {
            format!(
                " - {} open: {:.2}, high: {:.2}, low: {:.2}, close: {:.2}, vol: {}, mavg: {}",
                item.date,
                item.open,
                item.high,
                item.low,
                item.close,
                item.volume,
                format_opt(item.mavg),
            )
        })
        .collect()
}

/// Formats the first `count` daily bars with their day of week.
pub fn format_bars_with_weekday(items: &[bar::PriceBar], count: usize) -> Vec<String> {
    items
        .iter()
        .take(count)
        .map(|item| {
            format!(
                " - {} {:<9} close: {:.2}, vol: {}",
                item.date,
                stats::day_of_week(item).to_string(),
                item.close,
                item.volume,
            )
        })
        .collect()
}

fn format_weekly_row(item: &resample::WeeklyBar) -> String {
    format!(
        " - week ending {} open: {:.2}, high: {:.2}, low: {:.2}, close: {:.2}, vol: {:.0}, days: {}",
        item.week_ending,
        item.open,
        item.high,
        item.low,
        item.close,
        item.volume,
        item.sessions,
    )
}

/// Formats the first and last `count` weekly bars.
///
/// Short series are formatted once in full.
pub fn format_weekly_head_tail(items: &[resample::WeeklyBar], count: usize) -> Vec<String> {
    if items.len() <= count * 2 {
        return items.iter().map(format_weekly_row).collect();
    }
    let mut lines: Vec<String> = items[..count].iter().map(format_weekly_row).collect();
    lines.push("   ...".to_string());
    lines.extend(items[items.len() - count..].iter().map(format_weekly_row));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn weeks(n: usize) -> Vec<resample::WeeklyBar> {
        let bars: Vec<_> = (0..n as u64)
            .map(|i| {
                let date = NaiveDate::from_ymd_opt(2015, 1, 5).unwrap() + chrono::Days::new(7 * i);
                bar::PriceBar::new(date, 1.0, 1.0, 1.0, 1.0, 1)
            })
            .collect();
        resample::resample_weekly(&bars)
    }

    #[test]
    fn head_tail_elides_middle() {
        let lines = format_weekly_head_tail(&weeks(10), 2);
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[2], "   ...");
        assert!(lines[0].contains("2015-01-11"));
    }

    #[test]
    fn short_series_formatted_in_full() {
        assert_eq!(format_weekly_head_tail(&weeks(3), 2).len(), 3);
    }

    #[test]
    fn bar_preview_respects_count() {
        let date = NaiveDate::from_ymd_opt(2015, 2, 17).unwrap();
        let bars = vec![bar::PriceBar::new(date, 1.0, 2.0, 0.5, 1.5, 10); 4];
        let lines = format_bars_with_weekday(&bars, 3);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with(" - 2015-02-17 Tue"));
    }
}
