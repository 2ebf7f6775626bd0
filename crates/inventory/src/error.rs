use thiserror::Error;

/// Recoverable failures raised by fabric, lens and adapter lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InventoryError {
    /// Flat fabric index outside `0..size`.
    #[error("fabric index {index} is out of range (size {size})")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Fabric size.
        size: usize,
    },
    /// View position outside the lens.
    #[error("no slot at position {index} (lens size {size})")]
    NoSuchSlot {
        /// Requested position.
        index: usize,
        /// Lens size.
        size: usize,
    },
    /// Grid coordinate outside the grid.
    #[error("grid coordinate ({x}, {y}) is outside a {width}x{height} grid")]
    OutOfBounds {
        /// Requested column.
        x: usize,
        /// Requested row.
        y: usize,
        /// Grid width.
        width: usize,
        /// Grid height.
        height: usize,
    },
}

/// Result alias used throughout the crate.
pub type InventoryResult<T> = Result<T, InventoryError>;
