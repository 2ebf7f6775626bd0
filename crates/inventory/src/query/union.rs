use super::Query;
use crate::adapter::Adapter;
use crate::view::Inventory;

/// The source followed by another, possibly unrelated, view.
///
/// The result is backed by a composite of both fabrics, so writes through
/// it land in the original containers.
#[derive(Debug, Clone)]
pub struct UnionQuery {
    other: Inventory,
}

impl UnionQuery {
    /// Union with `other`.
    pub fn new(other: Inventory) -> Self {
        Self { other }
    }
}

impl Query for UnionQuery {
    fn execute(&self, _inventory: &Inventory, adapter: &Adapter) -> Inventory {
        let other = self.other.adapter();
        Inventory::from_adapter(Adapter::concat(&[adapter, &*other]))
    }
}
