//! Scenario files: containers to create and views to derive from them.
//!
//! ```toml
//! [[containers]]
//! name = "chest"
//! kind = "chest"
//! items = [{ slot = 0, item = "block:4", count = 12 }]
//!
//! [[views]]
//! name = "corner"
//! source = "chest"
//! steps = [{ op = "grid", x = 0, y = 0, width = 2, height = 2 }, { op = "reverse" }]
//! ```

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use slotlens_core::{ItemStack, ItemType, MatchOperator, PropertyKey, PropertyValue, ValueMatcher};
use slotlens_inventory::{
    share, AppendQuery, ContainerKind, Fabric, GridQuery, Inventory, KeyValueMatcherQuery, Query,
    ReverseQuery, UnionQuery,
};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    #[serde(default)]
    pub containers: Vec<ContainerSpec>,
    #[serde(default)]
    pub views: Vec<ViewSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContainerSpec {
    pub name: String,
    pub kind: ContainerKind,
    pub title: Option<String>,
    #[serde(default)]
    pub items: Vec<ItemSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemSpec {
    pub slot: usize,
    /// Item descriptor such as `block:4` or `tool:iron_pickaxe`.
    pub item: String,
    #[serde(default = "default_count")]
    pub count: u32,
}

fn default_count() -> u32 {
    1
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewSpec {
    pub name: String,
    /// Container or earlier view the pipeline starts from.
    pub source: String,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// One query in a view pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Reverse,
    Grid {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    Union {
        with: String,
    },
    Match {
        key: String,
        /// Defaults to `equal` with a value and `present` without one.
        operator: Option<MatchOperator>,
        value: Option<String>,
    },
    Append {
        steps: Vec<Step>,
    },
}

/// Contents of one resolved view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewReport {
    pub name: String,
    pub size: usize,
    pub slots: Vec<Option<SlotReport>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotReport {
    pub item: String,
    pub count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub durability: Option<u32>,
}

impl From<&ItemStack> for SlotReport {
    fn from(stack: &ItemStack) -> Self {
        Self {
            item: stack.item_type.to_string(),
            count: stack.count,
            durability: stack.durability,
        }
    }
}

impl ViewReport {
    fn capture(name: &str, view: &Inventory) -> Result<Self> {
        let slots = view
            .contents()
            .with_context(|| format!("Failed to read view `{name}`"))?
            .iter()
            .map(|slot| slot.as_ref().map(SlotReport::from))
            .collect();
        Ok(Self {
            name: name.to_string(),
            size: view.size(),
            slots,
        })
    }
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to load scenario {}", path.display()))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Invalid scenario")
    }

    /// Create every container, resolve every view in declaration order and
    /// report the views' contents.
    pub fn run(&self) -> Result<Vec<ViewReport>> {
        let mut named: HashMap<&str, Inventory> = HashMap::new();

        for spec in &self.containers {
            let view = spec.build()?;
            if named.insert(&spec.name, view).is_some() {
                bail!("Duplicate name `{}`", spec.name);
            }
        }

        let mut reports = Vec::with_capacity(self.views.len());
        for spec in &self.views {
            let mut view = named
                .get(spec.source.as_str())
                .cloned()
                .with_context(|| {
                    format!("View `{}` has unknown source `{}`", spec.name, spec.source)
                })?;
            for step in &spec.steps {
                let query = step
                    .to_query(&named)
                    .with_context(|| format!("Invalid step in view `{}`", spec.name))?;
                view = view.query(query.as_ref());
            }
            debug!(view = %spec.name, size = view.size(), "resolved view");
            reports.push(ViewReport::capture(&spec.name, &view)?);
            if named.insert(&spec.name, view).is_some() {
                bail!("Duplicate name `{}`", spec.name);
            }
        }

        info!(
            containers = self.containers.len(),
            views = reports.len(),
            "scenario complete"
        );
        Ok(reports)
    }
}

impl ContainerSpec {
    fn build(&self) -> Result<Inventory> {
        let mut container = match &self.title {
            Some(title) => self.kind.create_titled(title),
            None => self.kind.create(),
        };
        for spec in &self.items {
            let item_type: ItemType = spec
                .item
                .parse()
                .with_context(|| format!("Container `{}`", self.name))?;
            container
                .set(spec.slot, Some(ItemStack::new(item_type, spec.count)))
                .with_context(|| format!("Container `{}`", self.name))?;
        }
        Ok(Inventory::bind(&self.kind.standard_lens(), share(container)))
    }
}

impl Step {
    fn to_query(&self, named: &HashMap<&str, Inventory>) -> Result<Box<dyn Query>> {
        let query: Box<dyn Query> = match self {
            Step::Reverse => Box::new(ReverseQuery),
            Step::Grid {
                x,
                y,
                width,
                height,
            } => Box::new(GridQuery::new(*x, *y, *width, *height)),
            Step::Union { with } => {
                let other = named
                    .get(with.as_str())
                    .cloned()
                    .with_context(|| format!("Unknown union target `{with}`"))?;
                Box::new(UnionQuery::new(other))
            }
            Step::Match {
                key,
                operator,
                value,
            } => {
                let key = PropertyKey::new(key.as_str());
                let value = value
                    .as_deref()
                    .map(|raw| parse_value(&key, raw))
                    .transpose()?;
                let operator = operator.unwrap_or(if value.is_some() {
                    MatchOperator::Equal
                } else {
                    MatchOperator::Present
                });
                let needs_value =
                    matches!(operator, MatchOperator::Equal | MatchOperator::NotEqual);
                if needs_value && value.is_none() {
                    bail!("Match on `{key}` needs a value");
                }
                Box::new(KeyValueMatcherQuery::new(ValueMatcher::with_operator(
                    key, operator, value,
                )))
            }
            Step::Append { steps } => Box::new(AppendQuery::new(
                steps
                    .iter()
                    .map(|step| step.to_query(named))
                    .collect::<Result<_>>()?,
            )),
        };
        Ok(query)
    }
}

fn parse_value(key: &PropertyKey, raw: &str) -> Result<PropertyValue> {
    if *key == PropertyKey::ITEM {
        return Ok(PropertyValue::Item(raw.parse()?));
    }
    if *key == PropertyKey::SLOT_POSITION {
        let (x, y) = raw
            .split_once(',')
            .with_context(|| format!("Expected `x,y` for {key}, got `{raw}`"))?;
        return Ok(PropertyValue::Position {
            x: x.trim().parse()?,
            y: y.trim().parse()?,
        });
    }
    Ok(PropertyValue::text(raw))
}

/// One table per view: position, then item and count or `-` for empty slots.
pub fn render_text(reports: &[ViewReport]) -> String {
    let mut out = String::new();
    for report in reports {
        let _ = writeln!(out, "{} ({} slots)", report.name, report.size);
        for (position, slot) in report.slots.iter().enumerate() {
            let _ = match slot {
                Some(slot) => writeln!(out, "  {position:>3}  {} x{}", slot.item, slot.count),
                None => writeln!(out, "  {position:>3}  -"),
            };
        }
    }
    out
}
