//! Key/value properties attached to containers, slots and lens nodes, and the
//! matcher contract used to search them.

use crate::item::ItemType;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Name of a property.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyKey(Cow<'static, str>);

impl PropertyKey {
    /// Display title of a container.
    pub const TITLE: Self = Self::from_static("title");
    /// Kind of a container (chest, furnace, ...).
    pub const CONTAINER_KIND: Self = Self::from_static("container_kind");
    /// Grid coordinate of a slot inside its grid.
    pub const SLOT_POSITION: Self = Self::from_static("slot_position");
    /// Role of a slot inside its container (input, fuel, hotbar, ...).
    pub const SLOT_ROLE: Self = Self::from_static("slot_role");
    /// Item type currently held by a slot.
    pub const ITEM: Self = Self::from_static("item");

    /// Key backed by a static name.
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Key backed by an owned name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    /// Key name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Value of a property.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyValue {
    /// Free-form text.
    Text(String),
    /// Signed integer.
    Int(i64),
    /// Boolean flag.
    Flag(bool),
    /// Grid coordinate.
    Position {
        /// Column.
        x: u32,
        /// Row.
        y: u32,
    },
    /// Item type.
    Item(ItemType),
}

impl PropertyValue {
    /// Convenience constructor for text values.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Text(text) => f.write_str(text),
            PropertyValue::Int(value) => write!(f, "{value}"),
            PropertyValue::Flag(value) => write!(f, "{value}"),
            PropertyValue::Position { x, y } => write!(f, "({x}, {y})"),
            PropertyValue::Item(item) => write!(f, "{item}"),
        }
    }
}

/// Predicate over the value stored under one key.
///
/// The inventory engine treats matchers as opaque: it looks up the value for
/// [`KeyValueMatcher::key`] and hands it (or `None` when absent) to
/// [`KeyValueMatcher::matches`].
pub trait KeyValueMatcher {
    /// Key whose value is tested.
    fn key(&self) -> &PropertyKey;

    /// Test a looked-up value.
    fn matches(&self, value: Option<&PropertyValue>) -> bool;
}

/// Comparison applied by [`ValueMatcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOperator {
    /// Value present and equal.
    Equal,
    /// Value present and different.
    NotEqual,
    /// Any value present.
    Present,
    /// No value present.
    Absent,
}

/// Stock matcher comparing against a fixed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueMatcher {
    key: PropertyKey,
    value: Option<PropertyValue>,
    operator: MatchOperator,
}

impl ValueMatcher {
    /// Match when the value under `key` equals `value`.
    pub fn equal(key: PropertyKey, value: PropertyValue) -> Self {
        Self {
            key,
            value: Some(value),
            operator: MatchOperator::Equal,
        }
    }

    /// Match when the value under `key` is present and differs from `value`.
    pub fn not_equal(key: PropertyKey, value: PropertyValue) -> Self {
        Self {
            key,
            value: Some(value),
            operator: MatchOperator::NotEqual,
        }
    }

    /// Match when any value is stored under `key`.
    pub fn present(key: PropertyKey) -> Self {
        Self {
            key,
            value: None,
            operator: MatchOperator::Present,
        }
    }

    /// Match when nothing is stored under `key`.
    pub fn absent(key: PropertyKey) -> Self {
        Self {
            key,
            value: None,
            operator: MatchOperator::Absent,
        }
    }

    /// Build from an explicit operator; `value` is ignored by `Present`/`Absent`.
    pub fn with_operator(
        key: PropertyKey,
        operator: MatchOperator,
        value: Option<PropertyValue>,
    ) -> Self {
        Self {
            key,
            value,
            operator,
        }
    }
}

impl KeyValueMatcher for ValueMatcher {
    fn key(&self) -> &PropertyKey {
        &self.key
    }

    fn matches(&self, value: Option<&PropertyValue>) -> bool {
        match self.operator {
            MatchOperator::Equal => value.is_some() && value == self.value.as_ref(),
            MatchOperator::NotEqual => value.is_some() && value != self.value.as_ref(),
            MatchOperator::Present => value.is_some(),
            MatchOperator::Absent => value.is_none(),
        }
    }
}
