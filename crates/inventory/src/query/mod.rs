//! Query operators: pure transformations from one view to another.
//!
//! No operator mutates its source lens or fabric. Append, grid extraction,
//! reversal and search reuse the source fabric; union builds a composite.
//! Shape mismatches and empty searches yield the empty view.

mod append;
mod grid;
mod matcher;
mod reverse;
mod union;

pub use append::AppendQuery;
pub use grid::GridQuery;
pub use matcher::KeyValueMatcherQuery;
pub use reverse::ReverseQuery;
pub use union::UnionQuery;

use crate::adapter::Adapter;
use crate::view::Inventory;

/// A named view transformation.
pub trait Query {
    /// Derive a new view from `inventory`, whose single-adapter form is
    /// `adapter`.
    fn execute(&self, inventory: &Inventory, adapter: &Adapter) -> Inventory;
}
