//! Scale and focus bounds shared by ordered columns

/// Where a value sits relative to a column's focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusClass {
    Focus,
    LowerContext,
    UpperContext,
}

/// Absolute data extent (scale) plus a zoomed sub-range (focus).
///
/// The focus always lies within the scale. A focus bound sitting on its
/// scale bound follows the scale bound when the scale widens.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ScaleFocusBounds<T> {
    scale_min: Option<T>,
    scale_max: Option<T>,
    focus_min: Option<T>,
    focus_max: Option<T>,
}

impl<T> Default for ScaleFocusBounds<T> {
    fn default() -> Self {
        Self {
            scale_min: None,
            scale_max: None,
            focus_min: None,
            focus_max: None,
        }
    }
}

impl<T: Copy + PartialOrd> ScaleFocusBounds<T> {
    pub fn scale_min(&self) -> Option<T> {
        self.scale_min
    }

    pub fn scale_max(&self) -> Option<T> {
        self.scale_max
    }

    pub fn focus_min(&self) -> Option<T> {
        self.focus_min
    }

    pub fn focus_max(&self) -> Option<T> {
        self.focus_max
    }

    pub fn set_scale_min(&mut self, value: T) {
        let at_boundary = match (self.focus_min, self.scale_min) {
            (Some(focus), Some(scale)) => focus <= scale,
            _ => true,
        };
        self.scale_min = Some(value);
        if at_boundary || self.focus_min.map_or(true, |focus| focus < value) {
            self.focus_min = Some(value);
        }
        if self.focus_max.map_or(false, |focus| focus < value) {
            self.focus_max = Some(value);
        }
    }

    pub fn set_scale_max(&mut self, value: T) {
        let at_boundary = match (self.focus_max, self.scale_max) {
            (Some(focus), Some(scale)) => focus >= scale,
            _ => true,
        };
        self.scale_max = Some(value);
        if at_boundary || self.focus_max.map_or(true, |focus| focus > value) {
            self.focus_max = Some(value);
        }
        if self.focus_min.map_or(false, |focus| focus > value) {
            self.focus_min = Some(value);
        }
    }

    /// Clamped into `[scale_min, focus_max]`
    pub fn set_focus_min(&mut self, value: T) {
        let mut value = value;
        if let Some(scale) = self.scale_min {
            if value < scale {
                value = scale;
            }
        }
        if let Some(focus) = self.focus_max {
            if value > focus {
                value = focus;
            }
        }
        self.focus_min = Some(value);
    }

    /// Clamped into `[focus_min, scale_max]`
    pub fn set_focus_max(&mut self, value: T) {
        let mut value = value;
        if let Some(scale) = self.scale_max {
            if value > scale {
                value = scale;
            }
        }
        if let Some(focus) = self.focus_min {
            if value < focus {
                value = focus;
            }
        }
        self.focus_max = Some(value);
    }

    pub fn set_focus(&mut self, min: T, max: T) {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        // Widen first so neither setter clamps against the old focus
        self.focus_min = self.scale_min;
        self.focus_max = self.scale_max;
        self.set_focus_min(lo);
        self.set_focus_max(hi);
    }

    pub fn reset_focus(&mut self) {
        self.focus_min = self.scale_min;
        self.focus_max = self.scale_max;
    }

    /// Unset bounds impose no constraint
    pub fn classify(&self, value: T) -> FocusClass {
        if self.focus_min.map_or(false, |focus| value < focus) {
            FocusClass::LowerContext
        } else if self.focus_max.map_or(false, |focus| value > focus) {
            FocusClass::UpperContext
        } else {
            FocusClass::Focus
        }
    }
}
