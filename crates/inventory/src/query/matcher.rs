use super::Query;
use crate::adapter::Adapter;
use crate::lens::{CompoundLensBuilder, Lens, LensTreeBuilder};
use crate::view::Inventory;
use slotlens_core::KeyValueMatcher;
use std::rc::Rc;
use tracing::{debug, trace};

/// Searches a view for slots, containers or sub-views whose properties
/// satisfy a key/value matcher.
///
/// Precedence, first non-empty result wins:
///
/// 1. On primitive storage, leaf slots whose slot-level property matches.
/// 2. Every slot of each primitive container whose container-level property
///    matches.
/// 3. Lens nodes whose attached property matches, searched one sibling group
///    at a time, descending depth first into children in order.
///
/// Matches are mounted in a new compound lens over the source fabric, each
/// rebased by the frame offset it was found at.
pub struct KeyValueMatcherQuery<M> {
    matcher: M,
}

impl<M: KeyValueMatcher> KeyValueMatcherQuery<M> {
    /// Search with `matcher`.
    pub fn new(matcher: M) -> Self {
        Self { matcher }
    }

    /// Matching lens handles in traversal order. Each handle's
    /// [`Lens::offset`] is the rebasing accumulated from the root down to it.
    pub fn find(&self, adapter: &Adapter) -> Vec<Lens> {
        let key = self.matcher.key();

        if !adapter.fabric().borrow().is_composite() {
            let fabric = adapter.fabric().borrow();
            let slots: Vec<Lens> = adapter
                .slots()
                .into_iter()
                .filter(|slot| {
                    slot.fabric_index().is_some_and(|index| {
                        self.matcher
                            .matches(fabric.slot_property(index, key).as_ref())
                    })
                })
                .collect();
            if !slots.is_empty() {
                trace!(%key, matches = slots.len(), "matched slot properties");
                return slots;
            }
        }

        let grouped: Vec<Lens> = adapter
            .group_by_container()
            .iter()
            .filter(|group| self.matcher.matches(group.property(key).as_ref()))
            .flat_map(|group| group.slots.iter().cloned())
            .collect();
        if !grouped.is_empty() {
            trace!(%key, matches = grouped.len(), "matched container properties");
            return grouped;
        }

        let found = self.search(adapter.root_lens());
        trace!(%key, matches = found.len(), "searched lens tree");
        found
    }

    fn search(&self, lens: &Lens) -> Vec<Lens> {
        let key = self.matcher.key();
        let children = lens.children();
        let matched: Vec<Lens> = children
            .iter()
            .filter(|child| self.matcher.matches(child.property(key)))
            .cloned()
            .collect();
        if !matched.is_empty() {
            return matched;
        }
        children
            .iter()
            .filter(|child| !child.children().is_empty())
            .map(|child| self.search(child))
            .find(|found| !found.is_empty())
            .unwrap_or_default()
    }
}

impl<M: KeyValueMatcher> Query for KeyValueMatcherQuery<M> {
    fn execute(&self, _inventory: &Inventory, adapter: &Adapter) -> Inventory {
        let found = self.find(adapter);
        if found.is_empty() {
            debug!(key = %self.matcher.key(), "no matches");
            return Inventory::empty();
        }

        let mut tree = LensTreeBuilder::new();
        let mut compound = CompoundLensBuilder::new();
        for lens in &found {
            let copy = tree.graft(lens);
            compound = compound.add(tree.delegating(lens.offset(), copy));
        }
        let root = compound.build(&mut tree);
        Inventory::bind(&tree.build(root), Rc::clone(adapter.fabric()))
    }
}
