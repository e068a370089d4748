/// A record that carries a calendar date.
///
/// `None` means the record has no usable date. When the first record of a
/// sequence reports `None` the sequence is not treated as a time series and
/// `filter_ordered` passes it through untouched. A `None` anywhere later can
/// never exceed the watermark, so that record is rejected.
pub trait Timestamped {
    fn timestamp(&self) -> Option<chrono::NaiveDate>;
}

/// Result of one filtering pass.
///
/// `accepted` keeps input order and is strictly increasing by date.
/// `rejected` holds the discarded records in the order they were met.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome<T> {
    pub accepted: Vec<T>,
    pub rejected: Vec<T>,
}

impl<T> FilterOutcome<T> {
    /// Outcome that accepts `records` as-is.
    fn passthrough(records: Vec<T>) -> Self {
        FilterOutcome {
            accepted: records,
            rejected: Vec::new(),
        }
    }
}

/// Greedy watermark check over a stream of dates.
///
/// The watermark starts below every date, so even `NaiveDate::MIN` is
/// admitted first, and only moves forward to the date of each admitted
/// record. A date equal to the watermark is a duplicate and is refused.
#[derive(Debug, Clone, Copy)]
pub struct OrderedSequenceFilter {
    watermark: Option<chrono::NaiveDate>,
}

impl Default for OrderedSequenceFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderedSequenceFilter {
    pub fn new() -> Self {
        OrderedSequenceFilter { watermark: None }
    }

    /// Date of the last admitted record, `None` before any.
    pub fn watermark(&self) -> Option<chrono::NaiveDate> {
        self.watermark
    }

    /// Decides one record. Returns `true` and advances the watermark when
    /// `date` is strictly later than it; otherwise leaves it unchanged.
    pub fn admit(&mut self, date: Option<chrono::NaiveDate>) -> bool {
        match date {
            Some(d) if self.watermark.map_or(true, |w| d > w) => {
                self.watermark = Some(d);
                true
            }
            _ => false,
        }
    }
}

/// Splits `records` into those that extend the accepted run in strictly
/// increasing date order and those that do not, in one pass.
///
/// Records are never reconsidered: a rejected record stays rejected even if
/// it would fit before a later accepted one. Empty input, or input whose
/// first record has no date, is returned unchanged with nothing rejected.
pub fn filter_ordered<T: Timestamped>(records: Vec<T>) -> FilterOutcome<T> {
    match records.first() {
        Some(first) if first.timestamp().is_some() => {}
        _ => return FilterOutcome::passthrough(records),
    }

    let mut filter = OrderedSequenceFilter::new();
    let mut accepted = Vec::with_capacity(records.len());
    let mut rejected = Vec::new();

    for record in records {
        if filter.admit(record.timestamp()) {
            accepted.push(record);
        } else {
            rejected.push(record);
        }
    }

    FilterOutcome { accepted, rejected }
}

/// Whether every adjacent pair of dated records is strictly increasing.
pub fn is_strictly_increasing<T: Timestamped>(records: &[T]) -> bool {
    records.windows(2).all(|pair| match (pair[0].timestamp(), pair[1].timestamp()) {
        (Some(a), Some(b)) => a < b,
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        date: Option<NaiveDate>,
        tag: usize,
    }

    impl Timestamped for Row {
        fn timestamp(&self) -> Option<NaiveDate> {
            self.date
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn rows(dates: &[NaiveDate]) -> Vec<Row> {
        dates
            .iter()
            .enumerate()
            .map(|(tag, date)| Row { date: Some(*date), tag })
            .collect()
    }

    fn tags(rows: &[Row]) -> Vec<usize> {
        rows.iter().map(|r| r.tag).collect()
    }

    #[test]
    fn drops_duplicates_and_late_rows() {
        let input = rows(&[
            d(2015, 2, 17),
            d(2015, 2, 17),
            d(2015, 2, 18),
            d(2015, 2, 16),
            d(2015, 2, 15),
            d(2015, 2, 17),
        ]);
        let out = filter_ordered(input);
        assert_eq!(tags(&out.accepted), vec![0, 2]);
        assert_eq!(tags(&out.rejected), vec![1, 3, 4, 5]);
    }

    #[test]
    fn increasing_input_is_untouched() {
        let input = rows(&[d(2015, 2, 17), d(2015, 2, 19), d(2015, 2, 20)]);
        let out = filter_ordered(input.clone());
        assert_eq!(out.accepted, input);
        assert!(out.rejected.is_empty());
    }

    #[test]
    fn single_record_always_accepted() {
        let input = rows(&[NaiveDate::MIN]);
        let out = filter_ordered(input.clone());
        assert_eq!(out.accepted, input);
        assert!(out.rejected.is_empty());
    }

    #[test]
    fn empty_input_is_noop() {
        let out = filter_ordered(Vec::<Row>::new());
        assert!(out.accepted.is_empty());
        assert!(out.rejected.is_empty());
    }

    #[test]
    fn undated_first_record_is_noop() {
        let input = vec![
            Row { date: None, tag: 0 },
            Row { date: Some(d(2015, 2, 18)), tag: 1 },
            Row { date: Some(d(2015, 2, 17)), tag: 2 },
        ];
        let out = filter_ordered(input.clone());
        assert_eq!(out.accepted, input);
        assert!(out.rejected.is_empty());
    }

    #[test]
    fn undated_record_mid_sequence_is_rejected() {
        let input = vec![
            Row { date: Some(d(2015, 2, 17)), tag: 0 },
            Row { date: None, tag: 1 },
            Row { date: Some(d(2015, 2, 18)), tag: 2 },
        ];
        let out = filter_ordered(input);
        assert_eq!(tags(&out.accepted), vec![0, 2]);
        assert_eq!(tags(&out.rejected), vec![1]);
    }

    #[test]
    fn greedy_not_longest_subsequence() {
        // An early outlier blocks the longer run that follows it.
        let input = rows(&[d(2020, 1, 1), d(2015, 1, 1), d(2015, 1, 2), d(2015, 1, 3)]);
        let out = filter_ordered(input);
        assert_eq!(tags(&out.accepted), vec![0]);
        assert_eq!(tags(&out.rejected), vec![1, 2, 3]);
    }

    #[test]
    fn rejection_leaves_watermark() {
        let mut filter = OrderedSequenceFilter::new();
        assert_eq!(filter.watermark(), None);
        assert!(filter.admit(Some(d(2015, 2, 17))));
        assert!(!filter.admit(Some(d(2015, 2, 16))));
        assert!(!filter.admit(None));
        assert_eq!(filter.watermark(), Some(d(2015, 2, 17)));
    }

    fn dated_rows() -> impl Strategy<Value = Vec<Row>> {
        prop::collection::vec(0i64..60, 0..64).prop_map(|offsets| {
            let base = d(2015, 1, 1);
            offsets
                .into_iter()
                .enumerate()
                .map(|(tag, off)| Row {
                    date: Some(base + chrono::Duration::days(off)),
                    tag,
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn accepted_is_strictly_increasing(input in dated_rows()) {
            let out = filter_ordered(input);
            prop_assert!(is_strictly_increasing(&out.accepted));
        }

        #[test]
        fn partition_is_complete_and_ordered(input in dated_rows()) {
            let n = input.len();
            let out = filter_ordered(input);
            prop_assert_eq!(out.accepted.len() + out.rejected.len(), n);

            let accepted = tags(&out.accepted);
            let rejected = tags(&out.rejected);
            prop_assert!(accepted.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(rejected.windows(2).all(|w| w[0] < w[1]));

            let mut all: Vec<usize> = accepted.into_iter().chain(rejected).collect();
            all.sort_unstable();
            prop_assert_eq!(all, (0..n).collect::<Vec<_>>());
        }

        #[test]
        fn filtering_twice_changes_nothing(input in dated_rows()) {
            let once = filter_ordered(input).accepted;
            let twice = filter_ordered(once.clone());
            prop_assert_eq!(twice.accepted, once);
            prop_assert!(twice.rejected.is_empty());
        }
    }
}
