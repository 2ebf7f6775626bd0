//! Item primitives stored in inventory slots.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Item type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    /// A tool (pickaxe, axe, etc.)
    Tool(ToolType, ToolMaterial),
    /// A placeable block
    Block(u16), // BlockId
    /// Food item
    Food(FoodType),
    /// Generic item
    Item(u16),
}

/// Tool types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolType {
    /// Pickaxe
    Pickaxe,
    /// Axe
    Axe,
    /// Shovel
    Shovel,
    /// Sword
    Sword,
    /// Hoe
    Hoe,
}

/// Tool material tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ToolMaterial {
    /// Wooden tools (tier 0)
    Wood = 0,
    /// Stone tools (tier 1)
    Stone = 1,
    /// Iron tools (tier 2)
    Iron = 2,
    /// Diamond tools (tier 3)
    Diamond = 3,
    /// Gold tools
    Gold = 4,
}

/// Food types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FoodType {
    /// Apple
    Apple,
    /// Bread
    Bread,
    /// Raw meat
    RawMeat,
    /// Cooked meat
    CookedMeat,
}

impl ToolMaterial {
    /// Get the maximum durability for tools of this material
    pub fn durability(self, tool_type: ToolType) -> u32 {
        let base = match self {
            ToolMaterial::Wood => 59,
            ToolMaterial::Stone => 131,
            ToolMaterial::Iron => 250,
            ToolMaterial::Diamond => 1561,
            ToolMaterial::Gold => 32,
        };

        // Swords have different durability
        if tool_type == ToolType::Sword {
            base + 1
        } else {
            base
        }
    }

    fn name(self) -> &'static str {
        match self {
            ToolMaterial::Wood => "wood",
            ToolMaterial::Stone => "stone",
            ToolMaterial::Iron => "iron",
            ToolMaterial::Diamond => "diamond",
            ToolMaterial::Gold => "gold",
        }
    }
}

impl ToolType {
    fn name(self) -> &'static str {
        match self {
            ToolType::Pickaxe => "pickaxe",
            ToolType::Axe => "axe",
            ToolType::Shovel => "shovel",
            ToolType::Sword => "sword",
            ToolType::Hoe => "hoe",
        }
    }
}

impl FoodType {
    fn name(self) -> &'static str {
        match self {
            FoodType::Apple => "apple",
            FoodType::Bread => "bread",
            FoodType::RawMeat => "raw_meat",
            FoodType::CookedMeat => "cooked_meat",
        }
    }
}

impl ItemType {
    /// Numeric identifier for block and generic items; `None` for tools and food.
    pub fn numeric_id(self) -> Option<u16> {
        match self {
            ItemType::Block(id) | ItemType::Item(id) => Some(id),
            ItemType::Tool(_, _) | ItemType::Food(_) => None,
        }
    }
}

/// Failure to parse an item descriptor such as `block:4` or `tool:iron_pickaxe`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid item descriptor `{0}` (expected block:<id>, item:<id>, food:<name> or tool:<material>_<tool>)")]
pub struct ParseItemError(pub String);

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemType::Tool(tool, material) => write!(f, "tool:{}_{}", material.name(), tool.name()),
            ItemType::Block(id) => write!(f, "block:{id}"),
            ItemType::Food(food) => write!(f, "food:{}", food.name()),
            ItemType::Item(id) => write!(f, "item:{id}"),
        }
    }
}

impl FromStr for ItemType {
    type Err = ParseItemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseItemError(s.to_string());
        let (kind, rest) = s.split_once(':').ok_or_else(err)?;
        match kind {
            "block" => rest.parse().map(ItemType::Block).map_err(|_| err()),
            "item" => rest.parse().map(ItemType::Item).map_err(|_| err()),
            "food" => {
                let food = [
                    FoodType::Apple,
                    FoodType::Bread,
                    FoodType::RawMeat,
                    FoodType::CookedMeat,
                ]
                .into_iter()
                .find(|food| food.name() == rest)
                .ok_or_else(err)?;
                Ok(ItemType::Food(food))
            }
            "tool" => {
                let (material, tool) = rest.split_once('_').ok_or_else(err)?;
                let material = [
                    ToolMaterial::Wood,
                    ToolMaterial::Stone,
                    ToolMaterial::Iron,
                    ToolMaterial::Diamond,
                    ToolMaterial::Gold,
                ]
                .into_iter()
                .find(|m| m.name() == material)
                .ok_or_else(err)?;
                let tool = [
                    ToolType::Pickaxe,
                    ToolType::Axe,
                    ToolType::Shovel,
                    ToolType::Sword,
                    ToolType::Hoe,
                ]
                .into_iter()
                .find(|t| t.name() == tool)
                .ok_or_else(err)?;
                Ok(ItemType::Tool(tool, material))
            }
            _ => Err(err()),
        }
    }
}

/// An item stack in inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// Type of item
    pub item_type: ItemType,
    /// Quantity in stack
    pub count: u32,
    /// Durability for tools (None for non-tools)
    pub durability: Option<u32>,
}

impl ItemStack {
    /// Create a new item stack
    pub fn new(item_type: ItemType, count: u32) -> Self {
        let durability = match item_type {
            ItemType::Tool(tool_type, material) => Some(material.durability(tool_type)),
            _ => None,
        };

        Self {
            item_type,
            count,
            durability,
        }
    }

    /// Maximum stack size for this item type
    pub fn max_stack_size(&self) -> u32 {
        match self.item_type {
            ItemType::Tool(_, _) => 1, // Tools don't stack
            ItemType::Block(_) => 64,
            ItemType::Food(_) => 64,
            ItemType::Item(_) => 64,
        }
    }
}
