//! Row storage

use lv_core::Value;

/// One data row: a positional vector with one element per enabled column.
///
/// Index arguments must be below [`Tuple::element_count`]; anything else is
/// a caller bug and panics.
#[derive(Debug, Clone, Default)]
pub struct Tuple {
    elements: Vec<Value>,
    query_flag: bool,
    order_factor: i64,
}

impl Tuple {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_elements(elements: Vec<Value>) -> Self {
        Self {
            elements,
            ..Self::default()
        }
    }

    /// Append at the next free slot
    pub fn add_element(&mut self, value: Value) {
        self.elements.push(value);
    }

    /// Insert before `index`, shifting later slots right
    pub fn insert_element(&mut self, index: usize, value: Value) {
        self.elements.insert(index, value);
    }

    /// Delete a slot, shifting later slots left
    pub fn remove_element(&mut self, index: usize) -> Value {
        self.elements.remove(index)
    }

    /// Move the element at `from` to `to`, rotating the slots in between
    pub fn move_element(&mut self, from: usize, to: usize) {
        if from < to {
            self.elements[from..=to].rotate_left(1);
        } else if to < from {
            self.elements[to..=from].rotate_right(1);
        }
    }

    pub fn element(&self, index: usize) -> &Value {
        &self.elements[index]
    }

    pub fn element_mut(&mut self, index: usize) -> &mut Value {
        &mut self.elements[index]
    }

    pub fn set_element(&mut self, index: usize, value: Value) {
        self.elements[index] = value;
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn elements(&self) -> &[Value] {
        &self.elements
    }

    /// Rebuild the element vector by gathering the given old positions
    pub(crate) fn reorder_elements(&mut self, old_indices: &[usize]) {
        let reordered = old_indices
            .iter()
            .map(|&old| self.elements[old].clone())
            .collect();
        self.elements = reordered;
    }

    /// Whether the active query currently selects this row
    pub fn query_flag(&self) -> bool {
        self.query_flag
    }

    pub fn set_query_flag(&mut self, flag: bool) {
        self.query_flag = flag;
    }

    pub fn order_factor(&self) -> i64 {
        self.order_factor
    }

    pub fn set_order_factor(&mut self, order_factor: i64) {
        self.order_factor = order_factor;
    }

    /// Stable sort, higher order factor first
    pub fn sort_by_order_factor(tuples: &mut [Tuple]) {
        tuples.sort_by(|a, b| b.order_factor.cmp(&a.order_factor));
    }
}

impl PartialEq for Tuple {
    fn eq(&self, other: &Self) -> bool {
        self.elements == other.elements
    }
}

impl From<Vec<Value>> for Tuple {
    fn from(elements: Vec<Value>) -> Self {
        Self::from_elements(elements)
    }
}
