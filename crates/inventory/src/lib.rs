#![warn(missing_docs)]
//! Inventory view composition.
//!
//! Concrete containers implement [`Fabric`] once. A [`Lens`] describes how a
//! view's positions map onto fabric slots, an [`Adapter`] binds the two, and
//! [`Query`] operators derive new views (append, grid extraction, reversal,
//! union, key/value search) without copying any stored item.

mod adapter;
mod container;
mod error;
mod fabric;
mod lens;
pub mod query;
mod view;

pub use adapter::*;
pub use container::*;
pub use error::*;
pub use fabric::*;
pub use lens::*;
pub use query::{AppendQuery, GridQuery, KeyValueMatcherQuery, Query, ReverseQuery, UnionQuery};
pub use view::*;
