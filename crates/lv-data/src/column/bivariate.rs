use lv_core::ColumnId;

/// A column synthesized from two existing columns
#[derive(Debug, Clone, PartialEq)]
pub struct BivariateColumn {
    first: ColumnId,
    second: ColumnId,
}

impl BivariateColumn {
    pub(crate) fn new(first: ColumnId, second: ColumnId) -> Self {
        Self { first, second }
    }

    pub fn first(&self) -> ColumnId {
        self.first
    }

    pub fn second(&self) -> ColumnId {
        self.second
    }

    pub(crate) fn swap(&mut self) {
        std::mem::swap(&mut self.first, &mut self.second);
    }
}
