use indexmap::IndexMap;

use super::Histogram;

/// One bin per category label, in first-seen order
#[derive(Debug, Clone, PartialEq)]
pub struct CategoricalHistogram {
    name: String,
    labels: Vec<String>,
    counts: Vec<usize>,
}

impl CategoricalHistogram {
    pub fn from_counts(name: impl Into<String>, category_counts: &IndexMap<String, usize>) -> Self {
        let (labels, counts) = category_counts
            .iter()
            .map(|(label, count)| (label.clone(), *count))
            .unzip();
        Self {
            name: name.into(),
            labels,
            counts,
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn count_for(&self, label: &str) -> usize {
        self.labels
            .iter()
            .position(|l| l == label)
            .map(|i| self.counts[i])
            .unwrap_or(0)
    }
}

impl Histogram for CategoricalHistogram {
    fn name(&self) -> &str {
        &self.name
    }

    fn counts(&self) -> &[usize] {
        &self.counts
    }
}
