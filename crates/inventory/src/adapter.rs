//! Binding of a lens to a fabric.

use crate::error::{InventoryError, InventoryResult};
use crate::fabric::{fabric_id, resolve_container, share, CompositeFabric, FabricRef};
use crate::lens::{CompoundLensBuilder, Lens, LensTreeBuilder};
use slotlens_core::{ItemStack, PropertyKey, PropertyValue};
use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

/// Leaf lenses of a view that resolve to the same primitive container.
#[derive(Clone)]
pub struct ContainerGroup {
    /// The primitive container.
    pub container: FabricRef,
    /// Leaf lenses of the view stored in `container`, in view order.
    pub slots: Vec<Lens>,
}

impl ContainerGroup {
    /// Container-level property of the group's container.
    pub fn property(&self, key: &PropertyKey) -> Option<PropertyValue> {
        self.container.borrow().property(key)
    }
}

impl fmt::Debug for ContainerGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerGroup")
            .field("container", &fabric_id(&self.container))
            .field("slots", &self.slots.len())
            .finish()
    }
}

/// A lens bound to a fabric.
///
/// Every operation is translated through the lens into fabric-level index
/// operations. The adapter owns no item data; child adapters and the
/// container grouping are memoized until [`Adapter::invalidate`].
#[derive(Clone)]
pub struct Adapter {
    lens: Lens,
    fabric: FabricRef,
    children: OnceCell<Vec<Adapter>>,
    groups: OnceCell<Vec<ContainerGroup>>,
}

impl Adapter {
    /// Bind `lens` to `fabric`.
    pub fn new(lens: Lens, fabric: FabricRef) -> Self {
        debug_assert!(
            {
                let size = fabric.borrow().size();
                lens.leaf_indices().iter().all(|&index| index < size)
            },
            "lens addresses slots beyond the fabric"
        );
        Self {
            lens,
            fabric,
            children: OnceCell::new(),
            groups: OnceCell::new(),
        }
    }

    /// Zero-slot adapter over an empty composite.
    pub fn empty() -> Self {
        Self::new(Lens::empty(), share(CompositeFabric::new(Vec::new())))
    }

    /// Present several adapters as one: a composite over their fabrics and a
    /// compound lens mounting each part's lens at its fabric's offset.
    pub fn concat(parts: &[&Adapter]) -> Self {
        let fabric = CompositeFabric::new(
            parts
                .iter()
                .map(|part| Rc::clone(&part.fabric))
                .collect(),
        );
        let mut tree = LensTreeBuilder::new();
        let mut compound = CompoundLensBuilder::new();
        for (part, &offset) in parts.iter().zip(fabric.offsets()) {
            let copy = tree.graft(&part.lens);
            compound = compound.add(tree.delegating(offset + part.lens.offset(), copy));
        }
        let root = compound.build(&mut tree);
        Self::new(tree.build(root), share(fabric))
    }

    /// Bound lens.
    pub fn root_lens(&self) -> &Lens {
        &self.lens
    }

    /// Bound fabric.
    pub fn fabric(&self) -> &FabricRef {
        &self.fabric
    }

    /// Number of view positions.
    pub fn size(&self) -> usize {
        self.lens.size()
    }

    /// Stack-size ceiling of the bound fabric.
    pub fn max_stack_size(&self) -> u32 {
        self.fabric.borrow().max_stack_size()
    }

    /// Leaf slot lenses in view order.
    pub fn slots(&self) -> Vec<Lens> {
        self.lens.slots()
    }

    /// Absolute fabric index behind view position `index`.
    pub fn fabric_index(&self, index: usize) -> InventoryResult<usize> {
        self.lens
            .slot_lens(index)?
            .fabric_index()
            .ok_or(InventoryError::NoSuchSlot {
                index,
                size: self.size(),
            })
    }

    /// Read the stack at view position `index`.
    pub fn peek(&self, index: usize) -> InventoryResult<Option<ItemStack>> {
        let slot = self.fabric_index(index)?;
        self.fabric.borrow().get(slot)
    }

    /// Take the stack at view position `index`, leaving the slot empty.
    pub fn poll(&self, index: usize) -> InventoryResult<Option<ItemStack>> {
        let slot = self.fabric_index(index)?;
        let mut fabric = self.fabric.borrow_mut();
        let stack = fabric.get(slot)?;
        if stack.is_some() {
            fabric.set(slot, None)?;
        }
        Ok(stack)
    }

    /// Replace the stack at view position `index`.
    pub fn set(&self, index: usize, stack: Option<ItemStack>) -> InventoryResult<()> {
        let slot = self.fabric_index(index)?;
        self.fabric.borrow_mut().set(slot, stack)
    }

    /// Snapshot of every slot in view order.
    pub fn contents(&self) -> InventoryResult<Vec<Option<ItemStack>>> {
        let fabric = self.fabric.borrow();
        self.lens
            .leaf_indices()
            .into_iter()
            .map(|slot| fabric.get(slot))
            .collect()
    }

    /// Empty the slots this view covers; other slots of the fabric are kept.
    pub fn clear(&self) -> InventoryResult<()> {
        let mut fabric = self.fabric.borrow_mut();
        for slot in self.lens.leaf_indices() {
            fabric.set(slot, None)?;
        }
        Ok(())
    }

    /// Forward a change notification to the fabric.
    pub fn mark_dirty(&self) {
        self.fabric.borrow_mut().mark_dirty();
    }

    /// One adapter per child lens, bound to the same fabric.
    pub fn children(&self) -> &[Adapter] {
        self.children.get_or_init(|| {
            self.lens
                .children()
                .into_iter()
                .map(|child| Adapter::new(child, Rc::clone(&self.fabric)))
                .collect()
        })
    }

    /// Leaf lenses partitioned by the primitive container they resolve to,
    /// in order of first appearance.
    pub fn group_by_container(&self) -> &[ContainerGroup] {
        self.groups.get_or_init(|| {
            let mut groups: Vec<ContainerGroup> = Vec::new();
            for slot in self.lens.slots() {
                let Some(index) = slot.fabric_index() else {
                    continue;
                };
                let (container, _) = resolve_container(&self.fabric, index);
                let id = fabric_id(&container);
                match groups
                    .iter_mut()
                    .find(|group| fabric_id(&group.container) == id)
                {
                    Some(group) => group.slots.push(slot),
                    None => groups.push(ContainerGroup {
                        container,
                        slots: vec![slot],
                    }),
                }
            }
            groups
        })
    }

    /// Drop memoized children and grouping.
    pub fn invalidate(&mut self) {
        self.children.take();
        self.groups.take();
    }
}

impl fmt::Debug for Adapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Adapter")
            .field("lens", &self.lens.id())
            .field("size", &self.lens.size())
            .field("fabric", &fabric_id(&self.fabric))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::SlotContainer;
    use slotlens_core::ItemType;

    fn stack(id: u16) -> Option<ItemStack> {
        Some(ItemStack::new(ItemType::Item(id), 1))
    }

    #[test]
    fn operations_translate_through_the_lens() {
        let fabric = share(SlotContainer::new(6));
        let mut tree = LensTreeBuilder::new();
        let grid = tree.grid(0, 2, 2);
        let mounted = tree.delegating(2, grid);
        let adapter = tree.build(mounted).adapter(fabric.clone());

        adapter.set(0, stack(7)).unwrap();
        assert_eq!(fabric.borrow().get(2).unwrap(), stack(7));
        assert_eq!(adapter.peek(0).unwrap(), stack(7));

        assert_eq!(adapter.poll(0).unwrap(), stack(7));
        assert_eq!(fabric.borrow().get(2).unwrap(), None);
        assert_eq!(adapter.poll(0).unwrap(), None);

        assert_eq!(
            adapter.peek(4),
            Err(InventoryError::NoSuchSlot { index: 4, size: 4 })
        );
    }

    #[test]
    fn children_share_the_fabric() {
        let fabric = share(SlotContainer::new(4));
        let mut tree = LensTreeBuilder::new();
        let left = tree.grid(0, 2, 1);
        let right = tree.grid(2, 2, 1);
        let root = CompoundLensBuilder::new().add(left).add(right).build(&mut tree);
        let adapter = tree.build(root).adapter(fabric.clone());

        let children = adapter.children();
        assert_eq!(children.len(), 2);
        children[1].set(1, stack(3)).unwrap();
        assert_eq!(fabric.borrow().get(3).unwrap(), stack(3));
        assert_eq!(fabric_id(children[0].fabric()), fabric_id(&fabric));
    }

    #[test]
    fn clear_only_touches_the_view() {
        let fabric = share(SlotContainer::new(3));
        for slot in 0..3 {
            fabric.borrow_mut().set(slot, stack(slot as u16)).unwrap();
        }
        let mut tree = LensTreeBuilder::new();
        let root = tree.grid(1, 2, 1);
        let adapter = tree.build(root).adapter(fabric.clone());

        adapter.clear().unwrap();
        assert_eq!(fabric.borrow().get(0).unwrap(), stack(0));
        assert_eq!(adapter.contents().unwrap(), vec![None, None]);
    }

    #[test]
    fn grouping_partitions_by_primitive_container() {
        let first = share(SlotContainer::new(2));
        let second = share(SlotContainer::new(3));
        let mut tree = LensTreeBuilder::new();
        let root = tree.grid(0, 2, 1);
        let left = tree.build(root).adapter(first.clone());
        let mut tree = LensTreeBuilder::new();
        let root = tree.grid(0, 3, 1);
        let right = tree.build(root).adapter(second.clone());

        let joined = Adapter::concat(&[&left, &right]);
        let groups = joined.group_by_container();
        assert_eq!(groups.len(), 2);
        assert_eq!(fabric_id(&groups[0].container), fabric_id(&first));
        assert_eq!(groups[0].slots.len(), 2);
        assert_eq!(fabric_id(&groups[1].container), fabric_id(&second));
        assert_eq!(groups[1].slots.len(), 3);
    }

    #[test]
    fn invalidate_rebuilds_memoized_children_and_groups() {
        let first = share(SlotContainer::new(2));
        let second = share(SlotContainer::new(3));
        let mut tree = LensTreeBuilder::new();
        let root = tree.grid(0, 2, 1);
        let left = tree.build(root).adapter(first.clone());
        let mut tree = LensTreeBuilder::new();
        let root = tree.grid(0, 3, 1);
        let right = tree.build(root).adapter(second.clone());
        let mut joined = Adapter::concat(&[&left, &right]);

        let summary = |adapter: &Adapter| {
            let children: Vec<Vec<usize>> = adapter
                .children()
                .iter()
                .map(|child| child.root_lens().leaf_indices())
                .collect();
            let groups: Vec<(*const (), Vec<usize>)> = adapter
                .group_by_container()
                .iter()
                .map(|group| {
                    let indices = group.slots.iter().filter_map(Lens::fabric_index).collect();
                    (fabric_id(&group.container), indices)
                })
                .collect();
            (children, groups)
        };

        let before = summary(&joined);
        assert_eq!(before.0, vec![vec![0, 1], vec![2, 3, 4]]);
        assert_eq!(before.1.len(), 2);

        joined.invalidate();
        assert!(joined.children.get().is_none());
        assert!(joined.groups.get().is_none());

        let after = summary(&joined);
        assert!(joined.children.get().is_some());
        assert!(joined.groups.get().is_some());
        assert_eq!(after, before);
        assert_eq!(after.1[0].0, fabric_id(&first));
        assert_eq!(after.1[1].0, fabric_id(&second));
    }

    #[test]
    fn empty_adapter_is_valid() {
        let adapter = Adapter::empty();
        assert_eq!(adapter.size(), 0);
        assert!(adapter.contents().unwrap().is_empty());
        assert!(adapter.group_by_container().is_empty());
    }
}
