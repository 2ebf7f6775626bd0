//! Lens trees: immutable recipes mapping view positions onto fabric slots.
//!
//! Every node of a composed view lives in one [`LensTree`] arena and refers to
//! its children by [`LensId`]. A [`Lens`] is a cheap handle into a shared tree
//! that also carries its *frame offset*: the sum of the bases of every
//! delegating ancestor between the tree root and the node. Only delegating
//! nodes rebase; a slot node at `index` addresses fabric index
//! `frame offset + index`.
//!
//! Children of every composite node tile the node's view positions
//! `0..size` in order, each child starting where the previous one ended.

use crate::adapter::Adapter;
use crate::error::{InventoryError, InventoryResult};
use crate::fabric::FabricRef;
use slotlens_core::{PropertyKey, PropertyValue};
use std::sync::Arc;

/// Index of a node inside its [`LensTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LensId(u32);

impl LensId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Shape of a lens node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LensShape {
    /// Leaf addressing exactly one slot.
    Slot {
        /// Slot index relative to the node's frame.
        index: usize,
    },
    /// `width * height` slot children in row-major order.
    Grid {
        /// Columns.
        width: usize,
        /// Rows.
        height: usize,
    },
    /// Flat concatenation of arbitrary children.
    Compound,
    /// Single child rebased by the node's `base`.
    Delegating,
}

/// One node of a lens tree.
#[derive(Debug, Clone)]
pub struct LensNode {
    base: usize,
    size: usize,
    shape: LensShape,
    children: Vec<LensId>,
    child_offsets: Vec<usize>,
    properties: Vec<(PropertyKey, PropertyValue)>,
}

impl LensNode {
    /// Starting index of the node. For delegating nodes this is the rebasing
    /// offset applied to everything beneath.
    pub fn base(&self) -> usize {
        self.base
    }

    /// Number of view positions covered.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Node shape.
    pub fn shape(&self) -> LensShape {
        self.shape
    }

    /// Immediate children.
    pub fn children(&self) -> &[LensId] {
        &self.children
    }

    /// Key/value data attached by the builder.
    pub fn properties(&self) -> &[(PropertyKey, PropertyValue)] {
        &self.properties
    }

    fn property(&self, key: &PropertyKey) -> Option<&PropertyValue> {
        self.properties
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, value)| value)
    }

    /// Child position containing view position `position`, and the position
    /// relative to that child.
    fn child_at(&self, position: usize) -> (usize, usize) {
        let child = self
            .child_offsets
            .partition_point(|&offset| offset <= position)
            - 1;
        (child, position - self.child_offsets[child])
    }
}

/// Arena holding every node of one composed view.
#[derive(Debug, Default)]
pub struct LensTree {
    nodes: Vec<LensNode>,
}

impl LensTree {
    /// Node by id.
    pub fn node(&self, id: LensId) -> &LensNode {
        &self.nodes[id.index()]
    }
}

/// Incrementally assembles a [`LensTree`].
#[derive(Debug, Default)]
pub struct LensTreeBuilder {
    nodes: Vec<LensNode>,
}

impl LensTreeBuilder {
    /// Start an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Node by id.
    pub fn node(&self, id: LensId) -> &LensNode {
        &self.nodes[id.index()]
    }

    fn push(&mut self, node: LensNode) -> LensId {
        debug_assert!(tiles(&node, &self.nodes), "lens children must tile 0..size");
        let id = LensId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Leaf lens addressing `index`.
    pub fn slot(&mut self, index: usize) -> LensId {
        self.push(LensNode {
            base: index,
            size: 1,
            shape: LensShape::Slot { index },
            children: Vec::new(),
            child_offsets: Vec::new(),
            properties: Vec::new(),
        })
    }

    /// Fresh slot lens at the absolute fabric index of `slot`, carrying its
    /// properties. Used to re-address existing slots in a new frame.
    pub fn absolute_slot(&mut self, slot: &Lens) -> LensId {
        let index = slot.fabric_index().unwrap_or_else(|| slot.absolute_base());
        let id = self.slot(index);
        self.nodes[id.index()].properties = slot.properties().to_vec();
        id
    }

    /// Grid of fresh slot lenses at `base + y * width + x`.
    pub fn grid(&mut self, base: usize, width: usize, height: usize) -> LensId {
        self.grid_with(base, width, height, |tree, index| tree.slot(index))
    }

    /// Grid whose slot for `(x, y)` comes from `provider(base + y * width + x)`.
    ///
    /// Children are created in row-major order and tagged with
    /// [`PropertyKey::SLOT_POSITION`].
    pub fn grid_with<P>(
        &mut self,
        base: usize,
        width: usize,
        height: usize,
        mut provider: P,
    ) -> LensId
    where
        P: FnMut(&mut Self, usize) -> LensId,
    {
        let mut children = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let child = provider(self, base + y * width + x);
                debug_assert!(
                    matches!(self.node(child).shape, LensShape::Slot { .. }),
                    "grid children must be slot lenses"
                );
                self.set_property(
                    child,
                    PropertyKey::SLOT_POSITION,
                    PropertyValue::Position {
                        x: x as u32,
                        y: y as u32,
                    },
                );
                children.push(child);
            }
        }
        self.push(LensNode {
            base,
            size: width * height,
            shape: LensShape::Grid { width, height },
            child_offsets: (0..children.len()).collect(),
            children,
            properties: Vec::new(),
        })
    }

    fn compound(&mut self, children: Vec<LensId>) -> LensId {
        let mut child_offsets = Vec::with_capacity(children.len());
        let mut size = 0;
        for &child in &children {
            child_offsets.push(size);
            size += self.node(child).size;
        }
        let base = children.first().map_or(0, |&first| self.node(first).base);
        self.push(LensNode {
            base,
            size,
            shape: LensShape::Compound,
            children,
            child_offsets,
            properties: Vec::new(),
        })
    }

    /// Mount `child` rebased by `base`.
    pub fn delegating(&mut self, base: usize, child: LensId) -> LensId {
        let size = self.node(child).size;
        self.push(LensNode {
            base,
            size,
            shape: LensShape::Delegating,
            children: vec![child],
            child_offsets: vec![0],
            properties: Vec::new(),
        })
    }

    /// Attach (or replace) a property on a node.
    pub fn set_property(&mut self, id: LensId, key: PropertyKey, value: PropertyValue) {
        let properties = &mut self.nodes[id.index()].properties;
        match properties.iter_mut().find(|(candidate, _)| *candidate == key) {
            Some(entry) => entry.1 = value,
            None => properties.push((key, value)),
        }
    }

    /// Copy the subtree under `lens` into this arena.
    ///
    /// The copy is expressed relative to `lens`'s frame; mount it with
    /// [`LensTreeBuilder::delegating`] at `lens.offset()` to address the same
    /// slots.
    pub fn graft(&mut self, lens: &Lens) -> LensId {
        self.graft_node(&lens.tree, lens.id)
    }

    fn graft_node(&mut self, tree: &LensTree, id: LensId) -> LensId {
        let node = tree.node(id);
        let children = node
            .children
            .iter()
            .map(|&child| self.graft_node(tree, child))
            .collect();
        let id = LensId(self.nodes.len() as u32);
        self.nodes.push(LensNode {
            children,
            ..node.clone()
        });
        id
    }

    /// Freeze the arena and hand out a handle to `root`.
    pub fn build(self, root: LensId) -> Lens {
        Lens {
            tree: Arc::new(LensTree { nodes: self.nodes }),
            id: root,
            offset: 0,
        }
    }
}

fn tiles(node: &LensNode, nodes: &[LensNode]) -> bool {
    let mut expected = 0;
    for (child, &offset) in node.children.iter().zip(&node.child_offsets) {
        if offset != expected {
            return false;
        }
        expected += nodes[child.index()].size;
    }
    node.children.len() == node.child_offsets.len()
        && (node.children.is_empty() || expected == node.size)
}

/// Builds a compound lens from already-built children.
///
/// Each child's view offset is the running total of the sizes added before
/// it; the compound's size is the sum of all children.
#[derive(Debug, Default)]
pub struct CompoundLensBuilder {
    children: Vec<LensId>,
}

impl CompoundLensBuilder {
    /// Start an empty compound.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a child.
    pub fn add(mut self, child: LensId) -> Self {
        self.children.push(child);
        self
    }

    /// Append every child from an iterator.
    pub fn extend(mut self, children: impl IntoIterator<Item = LensId>) -> Self {
        self.children.extend(children);
        self
    }

    /// Create the compound node in `tree`.
    pub fn build(self, tree: &mut LensTreeBuilder) -> LensId {
        tree.compound(self.children)
    }
}

/// Handle to a node in a shared lens tree.
#[derive(Debug, Clone)]
pub struct Lens {
    tree: Arc<LensTree>,
    id: LensId,
    offset: usize,
}

impl Lens {
    /// Zero-slot lens.
    pub fn empty() -> Self {
        let mut tree = LensTreeBuilder::new();
        let root = CompoundLensBuilder::new().build(&mut tree);
        tree.build(root)
    }

    fn node(&self) -> &LensNode {
        self.tree.node(self.id)
    }

    /// Arena this handle points into.
    pub fn tree(&self) -> &Arc<LensTree> {
        &self.tree
    }

    /// Node id inside [`Lens::tree`].
    pub fn id(&self) -> LensId {
        self.id
    }

    /// Sum of delegating bases above this node.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The node's own base (the rebasing offset for delegating nodes).
    pub fn base(&self) -> usize {
        self.node().base
    }

    /// Absolute fabric index at which this lens starts.
    pub fn absolute_base(&self) -> usize {
        match self.node().shape {
            LensShape::Delegating => self
                .children()
                .first()
                .map_or(self.offset + self.node().base, Lens::absolute_base),
            _ => self.offset + self.node().base,
        }
    }

    /// Number of view positions.
    pub fn size(&self) -> usize {
        self.node().size
    }

    /// Node shape.
    pub fn shape(&self) -> LensShape {
        self.node().shape
    }

    /// Whether this is a leaf slot lens.
    pub fn is_slot(&self) -> bool {
        matches!(self.node().shape, LensShape::Slot { .. })
    }

    /// Key/value data attached to this node.
    pub fn properties(&self) -> &[(PropertyKey, PropertyValue)] {
        self.node().properties()
    }

    /// Value attached under `key`.
    pub fn property(&self, key: &PropertyKey) -> Option<&PropertyValue> {
        self.node().property(key)
    }

    fn child_frame(&self) -> usize {
        match self.node().shape {
            LensShape::Delegating => self.offset + self.node().base,
            _ => self.offset,
        }
    }

    fn child(&self, position: usize) -> Lens {
        Lens {
            tree: Arc::clone(&self.tree),
            id: self.node().children[position],
            offset: self.child_frame(),
        }
    }

    /// Immediate children, empty for slot lenses.
    pub fn children(&self) -> Vec<Lens> {
        (0..self.node().children.len())
            .map(|position| self.child(position))
            .collect()
    }

    /// Absolute fabric index addressed by a slot lens.
    pub fn fabric_index(&self) -> Option<usize> {
        match self.node().shape {
            LensShape::Slot { index } => Some(self.offset + index),
            _ => None,
        }
    }

    /// Resolve view position `index` to its leaf slot lens.
    pub fn slot_lens(&self, index: usize) -> InventoryResult<Lens> {
        let size = self.size();
        if index >= size {
            return Err(InventoryError::NoSuchSlot { index, size });
        }
        let mut current = self.clone();
        let mut position = index;
        while !current.is_slot() {
            let (child, local) = current.node().child_at(position);
            current = current.child(child);
            position = local;
        }
        Ok(current)
    }

    /// Grid dimensions, looking through delegating wrappers.
    pub fn grid_dimensions(&self) -> Option<(usize, usize)> {
        match self.node().shape {
            LensShape::Grid { width, height } => Some((width, height)),
            LensShape::Delegating => self.child(0).grid_dimensions(),
            LensShape::Slot { .. } | LensShape::Compound => None,
        }
    }

    /// Resolve grid coordinate `(x, y)` to its slot lens.
    pub fn grid_slot(&self, x: usize, y: usize) -> InventoryResult<Lens> {
        let (width, height) = self.grid_dimensions().unwrap_or((0, 0));
        if x >= width || y >= height {
            return Err(InventoryError::OutOfBounds {
                x,
                y,
                width,
                height,
            });
        }
        self.slot_lens(y * width + x)
    }

    /// Every leaf slot lens in view order.
    pub fn slots(&self) -> Vec<Lens> {
        let mut slots = Vec::with_capacity(self.size());
        self.collect_slots(&mut slots);
        slots
    }

    fn collect_slots(&self, out: &mut Vec<Lens>) {
        if self.is_slot() {
            out.push(self.clone());
            return;
        }
        for child in self.children() {
            child.collect_slots(out);
        }
    }

    /// Absolute fabric indices of every leaf, in view order.
    pub fn leaf_indices(&self) -> Vec<usize> {
        self.slots()
            .iter()
            .filter_map(Lens::fabric_index)
            .collect()
    }

    /// Whether the leaves cover `absolute_base()..absolute_base() + size()`
    /// exactly once.
    pub fn tiles_contiguously(&self) -> bool {
        let mut indices = self.leaf_indices();
        indices.sort_unstable();
        let start = self.absolute_base();
        indices.len() == self.size()
            && indices
                .iter()
                .enumerate()
                .all(|(position, &index)| index == start + position)
    }

    /// Bind this lens to `fabric`.
    pub fn adapter(&self, fabric: FabricRef) -> Adapter {
        Adapter::new(self.clone(), fabric)
    }
}
