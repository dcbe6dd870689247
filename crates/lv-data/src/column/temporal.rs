use chrono::{DateTime, Utc};

use super::bounds::{FocusClass, ScaleFocusBounds};

/// Instant column state: data extent and zoom range
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemporalColumn {
    bounds: ScaleFocusBounds<DateTime<Utc>>,
}

impl TemporalColumn {
    pub fn start_scale_instant(&self) -> Option<DateTime<Utc>> {
        self.bounds.scale_min()
    }

    pub fn end_scale_instant(&self) -> Option<DateTime<Utc>> {
        self.bounds.scale_max()
    }

    pub fn start_focus_instant(&self) -> Option<DateTime<Utc>> {
        self.bounds.focus_min()
    }

    pub fn end_focus_instant(&self) -> Option<DateTime<Utc>> {
        self.bounds.focus_max()
    }

    pub fn set_start_scale_instant(&mut self, instant: DateTime<Utc>) {
        self.bounds.set_scale_min(instant);
    }

    pub fn set_end_scale_instant(&mut self, instant: DateTime<Utc>) {
        self.bounds.set_scale_max(instant);
    }

    pub fn set_start_focus_instant(&mut self, instant: DateTime<Utc>) {
        self.bounds.set_focus_min(instant);
    }

    pub fn set_end_focus_instant(&mut self, instant: DateTime<Utc>) {
        self.bounds.set_focus_max(instant);
    }

    pub fn set_focus_bounds(&mut self, start: DateTime<Utc>, end: DateTime<Utc>) {
        self.bounds.set_focus(start, end);
    }

    pub fn reset_focus(&mut self) {
        self.bounds.reset_focus();
    }

    pub(crate) fn set_scale_bounds(&mut self, start: DateTime<Utc>, end: DateTime<Utc>) {
        self.bounds.set_scale_min(start);
        self.bounds.set_scale_max(end);
    }

    pub(crate) fn classify(&self, instant: DateTime<Utc>) -> FocusClass {
        self.bounds.classify(instant)
    }
}
