use super::Query;
use crate::adapter::Adapter;
use crate::lens::{CompoundLensBuilder, LensTreeBuilder};
use crate::view::Inventory;
use std::rc::Rc;

/// The source's leaf slots in reverse order, over the same fabric.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReverseQuery;

impl Query for ReverseQuery {
    fn execute(&self, _inventory: &Inventory, adapter: &Adapter) -> Inventory {
        let mut tree = LensTreeBuilder::new();
        let slots: Vec<_> = adapter
            .slots()
            .iter()
            .rev()
            .map(|slot| tree.absolute_slot(slot))
            .collect();
        let root = CompoundLensBuilder::new().extend(slots).build(&mut tree);
        Inventory::bind(&tree.build(root), Rc::clone(adapter.fabric()))
    }
}
