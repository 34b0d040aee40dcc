//! Golden-file snapshot helper.
//!
//! Snapshots are canonical pretty JSON with object keys sorted, so field order in
//! the serialized type never causes a diff. Rerun with `MDS_UPDATE_SNAPSHOTS=1` to
//! write the goldens instead of comparing.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Environment variable that enables snapshot updates.
pub const UPDATE_SNAPSHOTS_ENV: &str = "MDS_UPDATE_SNAPSHOTS";

/// Assert that `value` matches the JSON snapshot stored at `path`.
///
/// With `MDS_UPDATE_SNAPSHOTS=1` the file is written instead.
pub fn assert_json_snapshot<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> Result<()> {
    check_json_snapshot(path, value, should_update_snapshots())
}

/// [`assert_json_snapshot`] with the update decision made by the caller.
pub fn check_json_snapshot<P: AsRef<Path>, T: Serialize>(
    path: P,
    value: &T,
    update: bool,
) -> Result<()> {
    let path = path.as_ref();
    let actual = canonical_json(value)?;

    if update {
        return write_snapshot(path, &actual);
    }

    let expected = fs::read_to_string(path).with_context(|| {
        format!(
            "Snapshot missing at {} (run with {}=1 to create/update)",
            path.display(),
            UPDATE_SNAPSHOTS_ENV
        )
    })?;

    if expected != actual {
        anyhow::bail!(
            "Snapshot mismatch at {} (run with {}=1 to update)",
            path.display(),
            UPDATE_SNAPSHOTS_ENV
        );
    }

    Ok(())
}

/// Canonical snapshot text for `value`: sorted keys, pretty printed, trailing newline.
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String> {
    let value = serde_json::to_value(value).context("Failed to serialize snapshot value")?;
    let value = canonicalize_value(value);
    let mut s = serde_json::to_string_pretty(&value).context("Failed to format snapshot JSON")?;
    s.push('\n');
    Ok(s)
}

pub(crate) fn should_update_snapshots() -> bool {
    matches!(
        std::env::var(UPDATE_SNAPSHOTS_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("TRUE") | Ok("yes") | Ok("YES")
    )
}

fn write_snapshot(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create snapshot directory {}", parent.display()))?;
    }
    fs::write(path, contents)
        .with_context(|| format!("Failed to write snapshot {}", path.display()))
}

fn canonicalize_value(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut out = serde_json::Map::with_capacity(entries.len());
            for (k, v) in entries {
                out.insert(k, canonicalize_value(v));
            }
            Value::Object(out)
        }
        Value::Array(values) => Value::Array(values.into_iter().map(canonicalize_value).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keys_are_sorted_recursively() {
        let text = canonical_json(&json!({"b": 1, "a": {"z": 0, "y": [ {"d": 1, "c": 2} ]}})).unwrap();
        let a = text.find("\"a\"").unwrap();
        let b = text.find("\"b\"").unwrap();
        let y = text.find("\"y\"").unwrap();
        let z = text.find("\"z\"").unwrap();
        let c = text.find("\"c\"").unwrap();
        let d = text.find("\"d\"").unwrap();
        assert!(a < b && y < z && c < d);
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn update_then_compare() {
        let path = std::env::temp_dir()
            .join(format!("mds-snapshot-{}", std::process::id()))
            .join("value.json");
        let value = json!({"tick": 3, "blocks": [1, 2]});

        check_json_snapshot(&path, &value, true).unwrap();
        check_json_snapshot(&path, &value, false).unwrap();
        assert!(check_json_snapshot(&path, &json!({"tick": 4}), false).is_err());

        fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn missing_snapshot_is_an_error() {
        let path = std::env::temp_dir().join("mds-snapshot-does-not-exist.json");
        let err = check_json_snapshot(&path, &1, false).unwrap_err();
        assert!(err.to_string().contains(UPDATE_SNAPSHOTS_ENV));
    }
}
