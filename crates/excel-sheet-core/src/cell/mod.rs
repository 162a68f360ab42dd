//! Cell-related types
//!
//! This module contains:
//! - [`CellAddress`] - A cell's location (e.g., "A1")
//! - [`SheetStore`] - Sparse storage of cell text

mod address;
mod storage;

pub use address::CellAddress;
pub use storage::SheetStore;
