use std::collections::BTreeSet;

use super::bounds::FocusClass;

/// Category column state: the labels currently in focus
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoricalColumn {
    focus_categories: Option<BTreeSet<String>>,
}

impl CategoricalColumn {
    /// `None` means every category is in focus
    pub fn focus_categories(&self) -> Option<&BTreeSet<String>> {
        self.focus_categories.as_ref()
    }

    pub fn set_focus_categories<I, S>(&mut self, categories: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.focus_categories = Some(categories.into_iter().map(Into::into).collect());
    }

    pub fn reset_focus(&mut self) {
        self.focus_categories = None;
    }

    /// Out-of-focus labels are context; categories have no above/below
    pub(crate) fn classify(&self, category: &str) -> FocusClass {
        match &self.focus_categories {
            Some(focus) if !focus.contains(category) => FocusClass::LowerContext,
            _ => FocusClass::Focus,
        }
    }
}
