use chrono::{DateTime, Duration, Utc};

use super::{equal_width_bin, Histogram};

/// Equal-width histogram over instants, binned on epoch milliseconds
#[derive(Debug, Clone, PartialEq)]
pub struct TemporalHistogram {
    name: String,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    counts: Vec<usize>,
}

impl TemporalHistogram {
    pub fn new(name: impl Into<String>, instants: &[DateTime<Utc>], num_bins: usize) -> Self {
        let start = instants.iter().min().copied().unwrap_or_default();
        let end = instants.iter().max().copied().unwrap_or(start);
        Self::with_range(name, instants, num_bins, start, end)
    }

    pub fn with_range(
        name: impl Into<String>,
        instants: &[DateTime<Utc>],
        num_bins: usize,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        let num_bins = num_bins.max(1);
        let mut counts = vec![0; num_bins];
        let (lo, hi) = (millis(start), millis(end));
        for &instant in instants {
            if let Some(bin) = equal_width_bin(millis(instant), lo, hi, num_bins) {
                counts[bin] += 1;
            }
        }

        Self {
            name: name.into(),
            start,
            end,
            counts,
        }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Bin width, truncated to whole milliseconds
    pub fn bin_width(&self) -> Duration {
        let span = self.end - self.start;
        Duration::milliseconds(span.num_milliseconds() / self.counts.len() as i64)
    }

    pub fn bin_index(&self, instant: DateTime<Utc>) -> Option<usize> {
        equal_width_bin(millis(instant), millis(self.start), millis(self.end), self.counts.len())
    }
}

impl Histogram for TemporalHistogram {
    fn name(&self) -> &str {
        &self.name
    }

    fn counts(&self) -> &[usize] {
        &self.counts
    }
}

pub(crate) fn millis(instant: DateTime<Utc>) -> f64 {
    instant.timestamp_millis() as f64
}
