#![warn(missing_docs)]
//! Core primitives shared across the workspace.

pub mod item;
pub mod property;

// Re-export commonly used types
pub use item::{FoodType, ItemStack, ItemType, ParseItemError, ToolMaterial, ToolType};
pub use property::{KeyValueMatcher, MatchOperator, PropertyKey, PropertyValue, ValueMatcher};
