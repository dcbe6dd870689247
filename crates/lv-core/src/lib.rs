//! Core functionality for the linked-brushing table engine
//! 
//! This crate provides the cell value model, stable column identities,
//! selection predicates, the change-notification contract and the
//! configuration shared by the data engine and its observers.

pub mod config;
pub mod error;
pub mod events;
pub mod selection;
pub mod value;

// Re-export commonly used types
pub use config::TableConfig;
pub use error::{CoreError, CoreResult};
pub use events::{ColumnHandle, DataTableListener, EventDispatcher, TableEvent};
pub use selection::{
    CategoricalColumnSelection, ColumnSelection, ColumnSelectionRange,
    DoubleColumnSelectionRange, SelectionId, TemporalColumnSelectionRange,
};
pub use value::{ColumnId, Value, ValueKind};
