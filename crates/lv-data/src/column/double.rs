use super::bounds::{FocusClass, ScaleFocusBounds};

/// Numeric column state: data extent and zoom range
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DoubleColumn {
    bounds: ScaleFocusBounds<f64>,
}

impl DoubleColumn {
    pub fn minimum_scale_value(&self) -> Option<f64> {
        self.bounds.scale_min()
    }

    pub fn maximum_scale_value(&self) -> Option<f64> {
        self.bounds.scale_max()
    }

    pub fn minimum_focus_value(&self) -> Option<f64> {
        self.bounds.focus_min()
    }

    pub fn maximum_focus_value(&self) -> Option<f64> {
        self.bounds.focus_max()
    }

    pub fn set_minimum_scale_value(&mut self, value: f64) {
        self.bounds.set_scale_min(value);
    }

    pub fn set_maximum_scale_value(&mut self, value: f64) {
        self.bounds.set_scale_max(value);
    }

    pub fn set_minimum_focus_value(&mut self, value: f64) {
        self.bounds.set_focus_min(value);
    }

    pub fn set_maximum_focus_value(&mut self, value: f64) {
        self.bounds.set_focus_max(value);
    }

    pub fn set_focus_bounds(&mut self, min: f64, max: f64) {
        self.bounds.set_focus(min, max);
    }

    pub fn reset_focus(&mut self) {
        self.bounds.reset_focus();
    }

    pub(crate) fn set_scale_bounds(&mut self, min: f64, max: f64) {
        self.bounds.set_scale_min(min);
        self.bounds.set_scale_max(max);
    }

    /// NaN and infinities are never in focus
    pub(crate) fn classify(&self, value: f64) -> FocusClass {
        if !value.is_finite() {
            FocusClass::LowerContext
        } else {
            self.bounds.classify(value)
        }
    }
}
