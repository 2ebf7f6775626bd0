//! Raw slot storage.
//!
//! A [`Fabric`] is a flat, mutable array of item slots indexed `0..size`.
//! Concrete containers implement it once; [`CompositeFabric`] glues several
//! fabrics into one contiguous index space without copying their contents.

use crate::error::{InventoryError, InventoryResult};
use slotlens_core::{ItemStack, PropertyKey, PropertyValue};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

/// Shared handle to a fabric.
///
/// Fabrics are single-mutator storage; the host schedules access, the handle
/// only provides shared ownership and run-time borrow checks.
pub type FabricRef = Rc<RefCell<dyn Fabric>>;

/// Wrap a fabric in a shared handle.
pub fn share<F: Fabric + 'static>(fabric: F) -> FabricRef {
    Rc::new(RefCell::new(fabric))
}

/// Primitive slot-storage contract implemented by every container type.
pub trait Fabric {
    /// Number of slots.
    fn size(&self) -> usize;

    /// Stack-size ceiling for this storage.
    fn max_stack_size(&self) -> u32;

    /// Read the stack at `index`.
    fn get(&self, index: usize) -> InventoryResult<Option<ItemStack>>;

    /// Replace the stack at `index`.
    fn set(&mut self, index: usize, stack: Option<ItemStack>) -> InventoryResult<()>;

    /// Flag the storage as changed for external listeners.
    fn mark_dirty(&mut self);

    /// Empty every slot.
    fn clear(&mut self);

    /// Container-level property lookup.
    fn property(&self, _key: &PropertyKey) -> Option<PropertyValue> {
        None
    }

    /// Slot-level property lookup at a flat index.
    fn slot_property(&self, _index: usize, _key: &PropertyKey) -> Option<PropertyValue> {
        None
    }

    /// For composites, the child fabric owning `index` and the child-local
    /// index. Primitive storage returns `None`.
    fn route(&self, _index: usize) -> Option<(FabricRef, usize)> {
        None
    }

    /// Whether this fabric aggregates other fabrics.
    fn is_composite(&self) -> bool {
        false
    }
}

/// Fail with [`InventoryError::IndexOutOfRange`] unless `index < size`.
pub(crate) fn check_index(index: usize, size: usize) -> InventoryResult<()> {
    if index < size {
        Ok(())
    } else {
        Err(InventoryError::IndexOutOfRange { index, size })
    }
}

/// Follow composite routing down to the primitive fabric that stores `index`.
pub fn resolve_container(fabric: &FabricRef, index: usize) -> (FabricRef, usize) {
    let mut current = Rc::clone(fabric);
    let mut local = index;
    loop {
        let next = current.borrow().route(local);
        match next {
            Some((child, child_index)) => {
                current = child;
                local = child_index;
            }
            None => return (current, local),
        }
    }
}

/// Identity of a fabric handle, usable for grouping and comparisons.
pub fn fabric_id(fabric: &FabricRef) -> *const () {
    Rc::as_ptr(fabric) as *const ()
}

/// Ordered aggregation of child fabrics into one index space.
///
/// `offsets[k]` is the global index of child `k`'s first slot and
/// `offsets[n]` is the total size. The child list never changes; build a new
/// composite to change composition.
pub struct CompositeFabric {
    children: Vec<FabricRef>,
    offsets: Vec<usize>,
}

impl CompositeFabric {
    /// Build a composite over `children` in order. Zero children gives an
    /// empty fabric.
    pub fn new(children: Vec<FabricRef>) -> Self {
        let mut offsets = Vec::with_capacity(children.len() + 1);
        let mut total = 0;
        offsets.push(total);
        for child in &children {
            total += child.borrow().size();
            offsets.push(total);
        }
        debug!(children = children.len(), size = total, "built composite fabric");
        Self { children, offsets }
    }

    /// Child fabrics in index order.
    pub fn children(&self) -> &[FabricRef] {
        &self.children
    }

    /// Prefix-sum table, one entry longer than the child list.
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Child position and local index for a global index.
    pub fn locate(&self, index: usize) -> InventoryResult<(usize, usize)> {
        check_index(index, self.size())?;
        // First offset strictly greater than `index`, minus one. Empty children
        // share an offset with their successor and are skipped.
        let child = self.offsets.partition_point(|&offset| offset <= index) - 1;
        Ok((child, index - self.offsets[child]))
    }
}

impl Fabric for CompositeFabric {
    fn size(&self) -> usize {
        self.offsets.last().copied().unwrap_or(0)
    }

    /// Most permissive child wins. This is a coarse ceiling, not a per-slot
    /// capacity.
    fn max_stack_size(&self) -> u32 {
        self.children
            .iter()
            .map(|child| child.borrow().max_stack_size())
            .max()
            .unwrap_or(0)
    }

    fn get(&self, index: usize) -> InventoryResult<Option<ItemStack>> {
        let (child, local) = self.locate(index)?;
        self.children[child].borrow().get(local)
    }

    fn set(&mut self, index: usize, stack: Option<ItemStack>) -> InventoryResult<()> {
        let (child, local) = self.locate(index)?;
        self.children[child].borrow_mut().set(local, stack)
    }

    fn mark_dirty(&mut self) {
        for child in &self.children {
            child.borrow_mut().mark_dirty();
        }
    }

    fn clear(&mut self) {
        for child in &self.children {
            child.borrow_mut().clear();
        }
    }

    fn slot_property(&self, index: usize, key: &PropertyKey) -> Option<PropertyValue> {
        let (child, local) = self.locate(index).ok()?;
        self.children[child].borrow().slot_property(local, key)
    }

    fn route(&self, index: usize) -> Option<(FabricRef, usize)> {
        let (child, local) = self.locate(index).ok()?;
        Some((Rc::clone(&self.children[child]), local))
    }

    fn is_composite(&self) -> bool {
        true
    }
}
