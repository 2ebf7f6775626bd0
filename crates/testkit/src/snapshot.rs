//! Golden-file snapshots of inventory views.
//!
//! A view is captured as a [`ViewSnapshot`] and compared as canonical pretty
//! JSON (object keys sorted, trailing newline) against a file on disk. Rerun
//! with `SLOTLENS_UPDATE_SNAPSHOTS=1` to rewrite the goldens.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use slotlens_inventory::Inventory;
use std::fs;
use std::path::Path;

/// Environment variable that enables snapshot updates.
pub const UPDATE_SNAPSHOTS_ENV: &str = "SLOTLENS_UPDATE_SNAPSHOTS";

/// Serializable picture of a view's contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewSnapshot {
    /// Number of slots.
    pub size: usize,
    /// `"<item> x<count>"` per occupied slot, `null` for empty ones.
    pub slots: Vec<Option<String>>,
}

impl ViewSnapshot {
    /// Read every slot of `view`.
    pub fn capture(view: &Inventory) -> Result<Self> {
        let slots = view
            .contents()
            .context("Failed to read view contents")?
            .into_iter()
            .map(|slot| slot.map(|stack| format!("{} x{}", stack.item_type, stack.count)))
            .collect();
        Ok(Self {
            size: view.size(),
            slots,
        })
    }
}

/// Assert that `view` matches the snapshot stored at `path`.
pub fn assert_view_snapshot<P: AsRef<Path>>(path: P, view: &Inventory) -> Result<()> {
    assert_json_snapshot(path, &ViewSnapshot::capture(view)?)
}

/// Assert that `value` matches the JSON snapshot stored at `path`, or write it
/// when updates are enabled.
pub fn assert_json_snapshot<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> Result<()> {
    let path = path.as_ref();
    let actual = canonical_json(value)?;

    if updates_enabled() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        return fs::write(path, &actual)
            .with_context(|| format!("Failed to write snapshot {}", path.display()));
    }

    let expected = fs::read_to_string(path).with_context(|| {
        format!(
            "Snapshot missing at {} (run with {}=1 to create it)",
            path.display(),
            UPDATE_SNAPSHOTS_ENV
        )
    })?;
    if expected != actual {
        bail!(
            "Snapshot mismatch at {} (run with {}=1 to update)\n--- expected\n{expected}--- actual\n{actual}",
            path.display(),
            UPDATE_SNAPSHOTS_ENV
        );
    }
    Ok(())
}

fn updates_enabled() -> bool {
    std::env::var(UPDATE_SNAPSHOTS_ENV)
        .map(|value| matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

fn canonical_json<T: Serialize>(value: &T) -> Result<String> {
    let value = serde_json::to_value(value).context("Failed to serialize snapshot value")?;
    let mut text =
        serde_json::to_string_pretty(&sort_keys(value)).context("Failed to format snapshot JSON")?;
    text.push('\n');
    Ok(text)
}

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, sort_keys(value)))
                    .collect::<Map<String, Value>>(),
            )
        }
        Value::Array(values) => Value::Array(values.into_iter().map(sort_keys).collect()),
        other => other,
    }
}
