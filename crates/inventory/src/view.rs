//! Public-facing inventory views.

use crate::adapter::Adapter;
use crate::error::{InventoryError, InventoryResult};
use crate::fabric::FabricRef;
use crate::lens::Lens;
use crate::query::{AppendQuery, GridQuery, KeyValueMatcherQuery, Query, ReverseQuery, UnionQuery};
use slotlens_core::{ItemStack, KeyValueMatcher};
use std::borrow::Cow;

/// A view over one or more containers.
///
/// Always valid: failed or empty queries produce a zero-slot view rather than
/// an error, so query chains compose without checks at every step.
#[derive(Debug, Clone)]
pub struct Inventory {
    repr: Repr,
}

#[derive(Debug, Clone)]
enum Repr {
    Bound(Adapter),
    Appended(Vec<Inventory>),
}

impl Inventory {
    /// The zero-slot view.
    pub fn empty() -> Self {
        Self::appended(Vec::new())
    }

    /// View backed by a single adapter.
    pub fn from_adapter(adapter: Adapter) -> Self {
        Self {
            repr: Repr::Bound(adapter),
        }
    }

    /// Bind `lens` to `fabric`.
    pub fn bind(lens: &Lens, fabric: FabricRef) -> Self {
        Self::from_adapter(lens.adapter(fabric))
    }

    /// Independently resolved views presented one after another.
    pub fn appended(parts: Vec<Inventory>) -> Self {
        Self {
            repr: Repr::Appended(parts),
        }
    }

    /// Number of slots.
    pub fn size(&self) -> usize {
        match &self.repr {
            Repr::Bound(adapter) => adapter.size(),
            Repr::Appended(parts) => parts.iter().map(Inventory::size).sum(),
        }
    }

    /// Whether the view has no slots.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// The backing adapter when the view is bound to a single one.
    pub fn as_adapter(&self) -> Option<&Adapter> {
        match &self.repr {
            Repr::Bound(adapter) => Some(adapter),
            Repr::Appended(_) => None,
        }
    }

    /// Sub-views: child adapters of a bound view, or the parts of an
    /// appended one.
    pub fn children(&self) -> Vec<Inventory> {
        match &self.repr {
            Repr::Bound(adapter) => adapter
                .children()
                .iter()
                .cloned()
                .map(Inventory::from_adapter)
                .collect(),
            Repr::Appended(parts) => parts.clone(),
        }
    }

    /// A single adapter for the whole view. Appended views are flattened into
    /// a composite fabric with a compound lens mounting each part.
    pub fn adapter(&self) -> Cow<'_, Adapter> {
        match &self.repr {
            Repr::Bound(adapter) => Cow::Borrowed(adapter),
            Repr::Appended(parts) => match parts.as_slice() {
                [] => Cow::Owned(Adapter::empty()),
                [only] => Cow::Owned(only.adapter().into_owned()),
                parts => {
                    let adapters: Vec<Cow<'_, Adapter>> =
                        parts.iter().map(Inventory::adapter).collect();
                    let refs: Vec<&Adapter> =
                        adapters.iter().map(|adapter| adapter.as_ref()).collect();
                    Cow::Owned(Adapter::concat(&refs))
                }
            },
        }
    }

    fn locate(&self, index: usize) -> InventoryResult<(&Adapter, usize)> {
        match &self.repr {
            Repr::Bound(adapter) => Ok((adapter, index)),
            Repr::Appended(parts) => {
                let mut position = index;
                for part in parts {
                    let size = part.size();
                    if position < size {
                        return part.locate(position);
                    }
                    position -= size;
                }
                Err(InventoryError::NoSuchSlot {
                    index,
                    size: self.size(),
                })
            }
        }
    }

    /// Read the stack at `index`.
    pub fn peek(&self, index: usize) -> InventoryResult<Option<ItemStack>> {
        let (adapter, position) = self.locate(index)?;
        adapter.peek(position)
    }

    /// Take the stack at `index`, leaving the slot empty.
    pub fn poll(&self, index: usize) -> InventoryResult<Option<ItemStack>> {
        let (adapter, position) = self.locate(index)?;
        adapter.poll(position)
    }

    /// Replace the stack at `index`.
    pub fn set(&self, index: usize, stack: Option<ItemStack>) -> InventoryResult<()> {
        let (adapter, position) = self.locate(index)?;
        adapter.set(position, stack)
    }

    /// Snapshot of every slot in view order.
    pub fn contents(&self) -> InventoryResult<Vec<Option<ItemStack>>> {
        match &self.repr {
            Repr::Bound(adapter) => adapter.contents(),
            Repr::Appended(parts) => {
                let mut contents = Vec::with_capacity(self.size());
                for part in parts {
                    contents.extend(part.contents()?);
                }
                Ok(contents)
            }
        }
    }

    /// Empty every slot of the view.
    pub fn clear(&self) -> InventoryResult<()> {
        match &self.repr {
            Repr::Bound(adapter) => adapter.clear(),
            Repr::Appended(parts) => parts.iter().try_for_each(Inventory::clear),
        }
    }

    /// Run `query` against this view.
    pub fn query(&self, query: &dyn Query) -> Inventory {
        let adapter = self.adapter();
        query.execute(self, &adapter)
    }

    /// Results of several queries over this view, one after another.
    pub fn append(&self, queries: Vec<Box<dyn Query>>) -> Inventory {
        self.query(&AppendQuery::new(queries))
    }

    /// Rectangle of a grid-shaped view.
    pub fn grid(&self, offset_x: usize, offset_y: usize, width: usize, height: usize) -> Inventory {
        self.query(&GridQuery::new(offset_x, offset_y, width, height))
    }

    /// The view's slots in reverse order.
    pub fn reverse(&self) -> Inventory {
        self.query(&ReverseQuery)
    }

    /// This view followed by `other`, as one view.
    pub fn union(&self, other: &Inventory) -> Inventory {
        self.query(&UnionQuery::new(other.clone()))
    }

    /// Slots, containers or sub-views matching `matcher`.
    pub fn matching<M: KeyValueMatcher>(&self, matcher: M) -> Inventory {
        self.query(&KeyValueMatcherQuery::new(matcher))
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Adapter> for Inventory {
    fn from(adapter: Adapter) -> Self {
        Self::from_adapter(adapter)
    }
}
