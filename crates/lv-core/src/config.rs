//! Table configuration

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Tunables shared by a table and its active query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Upper cap on the default histogram bin count
    pub max_histogram_bins: usize,

    /// Lower floor on the default histogram bin count
    pub min_histogram_bins: usize,

    /// Whether the query also summarizes its non-queried partition
    pub calculate_non_query_statistics: bool,

    /// Whether the pairwise 2D histogram pass runs after statistics
    pub calculate_2d_histograms: bool,

    /// Relative tolerance for values landing just past a 2D bin range's end
    pub histogram_2d_epsilon: f64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            max_histogram_bins: 100,
            min_histogram_bins: 1,
            calculate_non_query_statistics: true,
            calculate_2d_histograms: true,
            histogram_2d_epsilon: 1e-9,
        }
    }
}

impl TableConfig {
    /// Parse a configuration from JSON; absent fields take their defaults
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let config: TableConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the bin limits are usable
    pub fn validate(&self) -> CoreResult<()> {
        if self.min_histogram_bins == 0 {
            return Err(CoreError::Config("min_histogram_bins must be at least 1".to_string()));
        }
        if self.min_histogram_bins > self.max_histogram_bins {
            return Err(CoreError::Config(format!(
                "min_histogram_bins ({}) exceeds max_histogram_bins ({})",
                self.min_histogram_bins, self.max_histogram_bins
            )));
        }
        if !(self.histogram_2d_epsilon >= 0.0) {
            return Err(CoreError::Config("histogram_2d_epsilon must be non-negative".to_string()));
        }
        Ok(())
    }

    /// Default bin count for a table: `floor(sqrt(n))`, clamped to the limits
    pub fn default_bin_count(&self, tuple_count: usize) -> usize {
        let bins = (tuple_count as f64).sqrt().floor() as usize;
        bins.min(self.max_histogram_bins).max(self.min_histogram_bins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bin_count() {
        let config = TableConfig::default();
        assert_eq!(config.default_bin_count(0), 1);
        assert_eq!(config.default_bin_count(10), 3);
        assert_eq!(config.default_bin_count(10_000), 100);
        assert_eq!(config.default_bin_count(1_000_000), 100);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = TableConfig::from_json(r#"{ "max_histogram_bins": 20 }"#).unwrap();
        assert_eq!(config.max_histogram_bins, 20);
        assert!(config.calculate_non_query_statistics);
        assert_eq!(config.default_bin_count(10_000), 20);
    }

    #[test]
    fn test_invalid_limits_rejected() {
        let result = TableConfig::from_json(r#"{ "min_histogram_bins": 50, "max_histogram_bins": 10 }"#);
        assert!(matches!(result, Err(CoreError::Config(_))));
    }

    #[test]
    fn test_json_round_trip() {
        let config = TableConfig {
            calculate_2d_histograms: false,
            ..TableConfig::default()
        };
        let parsed = TableConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }
}
