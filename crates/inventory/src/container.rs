//! Concrete slot containers and their canonical lenses.

use crate::error::InventoryResult;
use crate::fabric::{check_index, Fabric};
use crate::lens::{CompoundLensBuilder, Lens, LensTreeBuilder};
use serde::{Deserialize, Serialize};
use slotlens_core::{ItemStack, PropertyKey, PropertyValue};
use std::collections::BTreeMap;

/// Maximum stack size for most containers.
pub const DEFAULT_STACK_SIZE: u32 = 64;

/// Number of slots in a single chest inventory (3 rows × 9 columns).
pub const CHEST_SLOT_COUNT: usize = 27;

/// Number of slots in a hopper inventory.
pub const HOPPER_SLOT_COUNT: usize = 5;

/// Number of slots in a dispenser/dropper inventory.
pub const DISPENSER_SLOT_COUNT: usize = 9;

/// Number of slots in a furnace (input, fuel, output).
pub const FURNACE_SLOT_COUNT: usize = 3;

/// Number of slots in a 3x3 crafting grid.
pub const CRAFTING_SLOT_COUNT: usize = 9;

/// Number of slots in player inventory (hotbar first, then the main grid).
pub const PLAYER_SLOT_COUNT: usize = 36;

/// Number of hotbar slots at the start of the player inventory.
pub const HOTBAR_SLOT_COUNT: usize = 9;

/// Vec-backed primitive fabric.
#[derive(Debug, Clone)]
pub struct SlotContainer {
    slots: Vec<Option<ItemStack>>,
    max_stack_size: u32,
    dirty: bool,
    properties: BTreeMap<PropertyKey, PropertyValue>,
    slot_properties: BTreeMap<(usize, PropertyKey), PropertyValue>,
}

impl SlotContainer {
    /// Create a container with `size` empty slots.
    pub fn new(size: usize) -> Self {
        Self {
            slots: vec![None; size],
            max_stack_size: DEFAULT_STACK_SIZE,
            dirty: false,
            properties: BTreeMap::new(),
            slot_properties: BTreeMap::new(),
        }
    }

    /// Override the stack-size ceiling.
    pub fn with_max_stack_size(mut self, max_stack_size: u32) -> Self {
        self.max_stack_size = max_stack_size;
        self
    }

    /// Attach a container-level property.
    pub fn with_property(mut self, key: PropertyKey, value: PropertyValue) -> Self {
        self.properties.insert(key, value);
        self
    }

    /// Attach a property to one slot.
    pub fn with_slot_property(
        mut self,
        index: usize,
        key: PropertyKey,
        value: PropertyValue,
    ) -> Self {
        self.slot_properties.insert((index, key), value);
        self
    }

    /// Raw slot contents.
    pub fn slots(&self) -> &[Option<ItemStack>] {
        &self.slots
    }

    /// Whether [`Fabric::mark_dirty`] has been called.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

impl Fabric for SlotContainer {
    fn size(&self) -> usize {
        self.slots.len()
    }

    fn max_stack_size(&self) -> u32 {
        self.max_stack_size
    }

    fn get(&self, index: usize) -> InventoryResult<Option<ItemStack>> {
        check_index(index, self.slots.len())?;
        Ok(self.slots[index].clone())
    }

    fn set(&mut self, index: usize, stack: Option<ItemStack>) -> InventoryResult<()> {
        check_index(index, self.slots.len())?;
        self.slots[index] = stack;
        Ok(())
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
    }

    fn property(&self, key: &PropertyKey) -> Option<PropertyValue> {
        self.properties.get(key).cloned()
    }

    fn slot_property(&self, index: usize, key: &PropertyKey) -> Option<PropertyValue> {
        if *key == PropertyKey::ITEM {
            return self
                .slots
                .get(index)?
                .as_ref()
                .map(|stack| PropertyValue::Item(stack.item_type));
        }
        self.slot_properties.get(&(index, key.clone())).cloned()
    }
}

/// Standard container layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    /// 9x3 chest.
    Chest,
    /// 5x1 hopper.
    Hopper,
    /// Input, fuel and output slots.
    Furnace,
    /// 3x3 dispenser.
    Dispenser,
    /// 3x3 crafting grid.
    CraftingGrid,
    /// 9-slot hotbar followed by a 9x3 main grid.
    Player,
}

const FURNACE_ROLES: [&str; FURNACE_SLOT_COUNT] = ["input", "fuel", "output"];

impl ContainerKind {
    /// Machine-readable name, also used as the `container_kind` property.
    pub fn name(self) -> &'static str {
        match self {
            ContainerKind::Chest => "chest",
            ContainerKind::Hopper => "hopper",
            ContainerKind::Furnace => "furnace",
            ContainerKind::Dispenser => "dispenser",
            ContainerKind::CraftingGrid => "crafting_grid",
            ContainerKind::Player => "player",
        }
    }

    /// Default display title.
    pub fn title(self) -> &'static str {
        match self {
            ContainerKind::Chest => "Chest",
            ContainerKind::Hopper => "Hopper",
            ContainerKind::Furnace => "Furnace",
            ContainerKind::Dispenser => "Dispenser",
            ContainerKind::CraftingGrid => "Crafting",
            ContainerKind::Player => "Inventory",
        }
    }

    /// Number of slots.
    pub fn slot_count(self) -> usize {
        match self {
            ContainerKind::Chest => CHEST_SLOT_COUNT,
            ContainerKind::Hopper => HOPPER_SLOT_COUNT,
            ContainerKind::Furnace => FURNACE_SLOT_COUNT,
            ContainerKind::Dispenser => DISPENSER_SLOT_COUNT,
            ContainerKind::CraftingGrid => CRAFTING_SLOT_COUNT,
            ContainerKind::Player => PLAYER_SLOT_COUNT,
        }
    }

    /// Grid dimensions for kinds presented as a single grid.
    pub fn grid_dimensions(self) -> Option<(usize, usize)> {
        match self {
            ContainerKind::Chest => Some((9, 3)),
            ContainerKind::Hopper => Some((5, 1)),
            ContainerKind::Dispenser | ContainerKind::CraftingGrid => Some((3, 3)),
            ContainerKind::Furnace | ContainerKind::Player => None,
        }
    }

    /// Empty container of this kind, tagged with its title and kind.
    pub fn create(self) -> SlotContainer {
        self.create_titled(self.title())
    }

    /// Empty container of this kind with a custom title.
    pub fn create_titled(self, title: &str) -> SlotContainer {
        let mut container = SlotContainer::new(self.slot_count())
            .with_property(PropertyKey::TITLE, PropertyValue::text(title))
            .with_property(PropertyKey::CONTAINER_KIND, PropertyValue::text(self.name()));
        if self == ContainerKind::Furnace {
            for (slot, role) in FURNACE_ROLES.iter().enumerate() {
                container = container.with_slot_property(
                    slot,
                    PropertyKey::SLOT_ROLE,
                    PropertyValue::text(*role),
                );
            }
        }
        container
    }

    /// Canonical lens for a container of this kind, rooted at fabric index 0.
    pub fn standard_lens(self) -> Lens {
        let mut tree = LensTreeBuilder::new();
        let root = match self {
            ContainerKind::Furnace => {
                let mut compound = CompoundLensBuilder::new();
                for (slot, role) in FURNACE_ROLES.iter().enumerate() {
                    let id = tree.slot(slot);
                    tree.set_property(id, PropertyKey::SLOT_ROLE, PropertyValue::text(*role));
                    compound = compound.add(id);
                }
                compound.build(&mut tree)
            }
            ContainerKind::Player => {
                let hotbar = tree.grid(0, HOTBAR_SLOT_COUNT, 1);
                tree.set_property(hotbar, PropertyKey::SLOT_ROLE, PropertyValue::text("hotbar"));
                let main = tree.grid(0, 9, 3);
                let main = tree.delegating(HOTBAR_SLOT_COUNT, main);
                tree.set_property(main, PropertyKey::SLOT_ROLE, PropertyValue::text("main"));
                CompoundLensBuilder::new().add(hotbar).add(main).build(&mut tree)
            }
            ContainerKind::Chest
            | ContainerKind::Hopper
            | ContainerKind::Dispenser
            | ContainerKind::CraftingGrid => {
                let (width, height) = self.grid_dimensions().unwrap_or((self.slot_count(), 1));
                tree.grid(0, width, height)
            }
        };
        tree.build(root)
    }
}
