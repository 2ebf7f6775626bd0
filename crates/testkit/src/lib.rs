#![warn(missing_docs)]
//! Test support for inventory views: numbered fixtures and JSON snapshots.

mod fixtures;
mod snapshot;

pub use fixtures::*;
pub use snapshot::*;
