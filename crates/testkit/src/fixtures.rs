//! Containers whose contents identify their slots.

use slotlens_core::{ItemStack, ItemType};
use slotlens_inventory::{
    share, Fabric, FabricRef, Inventory, InventoryResult, LensTreeBuilder, SlotContainer,
};

/// Container of `size` slots where slot `i` holds one `item:<first + i>`.
pub fn numbered_container(size: usize, first: u16) -> SlotContainer {
    let mut container = SlotContainer::new(size);
    for slot in 0..size {
        container
            .set(slot, Some(numbered_stack(first + slot as u16)))
            .expect("slot in range");
    }
    container
}

/// Shared handle to a [`numbered_container`].
pub fn numbered(size: usize, first: u16) -> FabricRef {
    share(numbered_container(size, first))
}

/// One `item:<id>`.
pub fn numbered_stack(id: u16) -> ItemStack {
    ItemStack::new(ItemType::Item(id), 1)
}

/// `width` x `height` grid view over `fabric`, starting at index 0.
pub fn grid_view(fabric: &FabricRef, width: usize, height: usize) -> Inventory {
    let mut tree = LensTreeBuilder::new();
    let root = tree.grid(0, width, height);
    Inventory::bind(&tree.build(root), fabric.clone())
}

/// Flat view over every slot of `fabric`.
pub fn flat_view(fabric: &FabricRef) -> Inventory {
    let size = fabric.borrow().size();
    grid_view(fabric, size, 1)
}

/// Numeric item id held by each slot of `view`, `None` for empty slots.
pub fn item_ids(view: &Inventory) -> InventoryResult<Vec<Option<u16>>> {
    Ok(view
        .contents()?
        .into_iter()
        .map(|slot| slot.and_then(|stack| stack.item_type.numeric_id()))
        .collect())
}
