use super::Query;
use crate::adapter::Adapter;
use crate::error::InventoryResult;
use crate::lens::{Lens, LensTreeBuilder};
use crate::view::Inventory;
use std::rc::Rc;
use tracing::debug;

/// Rectangle `(offset_x, offset_y, width, height)` of a grid-shaped view.
///
/// A source that is not grid shaped, or a rectangle that does not fit inside
/// the source grid, yields the empty view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridQuery {
    offset_x: usize,
    offset_y: usize,
    width: usize,
    height: usize,
}

impl GridQuery {
    /// Rectangle of `width` x `height` slots starting at `(offset_x, offset_y)`.
    pub fn new(offset_x: usize, offset_y: usize, width: usize, height: usize) -> Self {
        Self {
            offset_x,
            offset_y,
            width,
            height,
        }
    }

    fn source_slots(&self, lens: &Lens) -> InventoryResult<Vec<Lens>> {
        (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| (x, y)))
            .map(|(x, y)| lens.grid_slot(self.offset_x + x, self.offset_y + y))
            .collect()
    }
}

impl Query for GridQuery {
    fn execute(&self, _inventory: &Inventory, adapter: &Adapter) -> Inventory {
        let lens = adapter.root_lens();
        let Some((source_width, source_height)) = lens.grid_dimensions() else {
            debug!(shape = ?lens.shape(), "grid query on a view that is not grid shaped");
            return Inventory::empty();
        };
        let exceeds = |offset: usize, extent: usize, limit: usize| {
            offset.checked_add(extent).map_or(true, |end| end > limit)
        };
        if exceeds(self.offset_x, self.width, source_width)
            || exceeds(self.offset_y, self.height, source_height)
        {
            debug!(
                query = ?self,
                source_width,
                source_height,
                "grid query rectangle exceeds the source grid"
            );
            return Inventory::empty();
        }
        let sources = match self.source_slots(lens) {
            Ok(sources) => sources,
            Err(err) => {
                debug!(%err, "grid query could not resolve a source slot");
                return Inventory::empty();
            }
        };

        let mut tree = LensTreeBuilder::new();
        let root = tree.grid_with(0, self.width, self.height, |tree, index| {
            tree.absolute_slot(&sources[index])
        });
        Inventory::bind(&tree.build(root), Rc::clone(adapter.fabric()))
    }
}
