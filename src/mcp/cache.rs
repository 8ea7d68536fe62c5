//! On-disk cache of discovered MCP tool descriptors.
//!
//! The cache is a single JSON file written wholesale after each discovery run.
//! Freshness is time-based: entries older than the configured threshold (24
//! hours by default) are considered stale and trigger rediscovery. Reads never
//! fail hard; any missing, corrupt, or unparsable cache is treated as stale.
//!
//! Concurrent writers are not coordinated. The file is owned by whichever
//! process wrote it last (last write wins), a documented limitation of the
//! single-operator usage pattern.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// Default cache freshness threshold.
pub const DEFAULT_MAX_AGE_HOURS: i64 = 24;

/// Parameter schema of a cached tool, used only for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ToolParameters {
    /// Names of required parameters.
    pub required: Vec<String>,
}

/// Metadata record describing one externally invocable tool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolDescriptor {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parameters: ToolParameters,
}

/// One cache file: a fetch timestamp plus the discovered tools in
/// discovery order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCacheEntry {
    /// RFC 3339 timestamp of the discovery run that produced this file.
    pub fetched_at: String,
    #[serde(default)]
    pub tools: Vec<ToolDescriptor>,
}

/// Result of a prefix-filtered cache load.
///
/// An empty filter match most often means the discovery step used different
/// naming conventions than expected; silently returning zero tools would break
/// the dependent agent entirely, so the caller is told to fall back to the
/// unfiltered set instead.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOutcome {
    /// At least one descriptor matched; use only these.
    Matched(Vec<ToolDescriptor>),
    /// File missing/corrupt or no matches; load the unfiltered full set.
    FallBackToAll,
}

/// Check whether the cache at `path` is stale.
///
/// Returns `true` if the file does not exist, is not valid JSON, lacks a
/// parsable `fetched_at`, or is older than `max_age`. Never errors.
pub fn is_stale(path: &Path, max_age: Duration) -> bool {
    let entry = match read_entry(path) {
        Some(e) => e,
        None => return true,
    };

    let fetched_at = match DateTime::parse_from_rfc3339(&entry.fetched_at) {
        Ok(t) => t.with_timezone(&Utc),
        Err(e) => {
            warn!("Unparsable fetched_at in tool cache: {}", e);
            return true;
        }
    };

    Utc::now() - fetched_at > max_age
}

/// Load cached descriptors whose lower-cased name starts with at least one of
/// `prefixes`, preserving file order.
///
/// Returns [`FilterOutcome::FallBackToAll`] when the file is missing or
/// corrupt, or when no descriptor matches.
pub fn load_filtered(path: &Path, prefixes: &[String]) -> FilterOutcome {
    let entry = match read_entry(path) {
        Some(e) => e,
        None => return FilterOutcome::FallBackToAll,
    };

    let matched: Vec<ToolDescriptor> = entry
        .tools
        .into_iter()
        .filter(|t| {
            let name = t.name.to_lowercase();
            prefixes.iter().any(|p| name.starts_with(&p.to_lowercase()))
        })
        .collect();

    if matched.is_empty() {
        debug!("No cached tools matched prefixes {:?}, falling back to full set", prefixes);
        FilterOutcome::FallBackToAll
    } else {
        FilterOutcome::Matched(matched)
    }
}

/// Load the unfiltered tool set, or `None` when the file is missing or corrupt.
pub fn load_all(path: &Path) -> Option<Vec<ToolDescriptor>> {
    read_entry(path).map(|e| e.tools)
}

/// Overwrite the cache at `path` with `tools`, stamped with the current time.
pub fn write(path: &Path, tools: &[ToolDescriptor]) -> crate::error::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let entry = ToolCacheEntry {
        fetched_at: Utc::now().to_rfc3339(),
        tools: tools.to_vec(),
    };

    std::fs::write(path, serde_json::to_string_pretty(&entry)?)?;
    debug!("Wrote {} tools to cache at {:?}", tools.len(), path);
    Ok(())
}

/// Age of the cache entry, when it exists and parses.
pub fn age(path: &Path) -> Option<Duration> {
    let entry = read_entry(path)?;
    let fetched_at = DateTime::parse_from_rfc3339(&entry.fetched_at)
        .ok()?
        .with_timezone(&Utc);
    Some(Utc::now() - fetched_at)
}

fn read_entry(path: &Path) -> Option<ToolCacheEntry> {
    let content = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(entry) => Some(entry),
        Err(e) => {
            warn!("Tool cache at {:?} is corrupt: {}", path, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn descriptor(name: &str) -> ToolDescriptor {
        ToolDescriptor {
            name: name.to_string(),
            description: None,
            parameters: ToolParameters::default(),
        }
    }

    fn write_with_timestamp(path: &Path, fetched_at: &str, names: &[&str]) {
        let entry = ToolCacheEntry {
            fetched_at: fetched_at.to_string(),
            tools: names.iter().map(|n| descriptor(n)).collect(),
        };
        std::fs::write(path, serde_json::to_string(&entry).unwrap()).unwrap();
    }

    #[test]
    fn test_missing_file_is_stale() {
        let path = PathBuf::from("/nonexistent/tools_cache.json");
        assert!(is_stale(&path, Duration::hours(24)));
        assert_eq!(load_filtered(&path, &["get_".to_string()]), FilterOutcome::FallBackToAll);
        assert!(load_all(&path).is_none());
    }

    #[test]
    fn test_invalid_json_is_stale() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tools_cache.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(is_stale(&path, Duration::hours(24)));
        assert_eq!(load_filtered(&path, &["get_".to_string()]), FilterOutcome::FallBackToAll);
    }

    #[test]
    fn test_unparsable_timestamp_is_stale() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tools_cache.json");
        write_with_timestamp(&path, "yesterday-ish", &["get_pods"]);

        assert!(is_stale(&path, Duration::hours(24)));
        // The tool list itself is still readable
        assert_eq!(load_all(&path).unwrap().len(), 1);
    }

    #[test]
    fn test_fresh_cache_is_not_stale() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tools_cache.json");
        let one_hour_ago = (Utc::now() - Duration::hours(1)).to_rfc3339();
        write_with_timestamp(&path, &one_hour_ago, &["get_pods", "set_config"]);

        assert!(!is_stale(&path, Duration::hours(24)));
    }

    #[test]
    fn test_old_cache_is_stale() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tools_cache.json");
        let two_days_ago = (Utc::now() - Duration::hours(48)).to_rfc3339();
        write_with_timestamp(&path, &two_days_ago, &["get_pods"]);

        assert!(is_stale(&path, Duration::hours(24)));
    }

    #[test]
    fn test_write_then_check_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tools_cache.json");
        write(&path, &[descriptor("list_namespaces")]).unwrap();

        assert!(!is_stale(&path, Duration::hours(24)));
        assert_eq!(load_all(&path).unwrap(), vec![descriptor("list_namespaces")]);
    }

    #[test]
    fn test_filter_preserves_order_and_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tools_cache.json");
        let now = Utc::now().to_rfc3339();
        write_with_timestamp(&path, &now, &["List_Pods", "set_config", "get_nodes", "GET_events"]);

        let outcome = load_filtered(&path, &["list_".to_string(), "get_".to_string()]);
        match outcome {
            FilterOutcome::Matched(tools) => {
                let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
                assert_eq!(names, vec!["List_Pods", "get_nodes", "GET_events"]);
            }
            FilterOutcome::FallBackToAll => panic!("expected matches"),
        }
    }

    #[test]
    fn test_empty_filter_match_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tools_cache.json");
        let now = Utc::now().to_rfc3339();
        write_with_timestamp(&path, &now, &["set_config", "delete_pod"]);

        assert_eq!(
            load_filtered(&path, &["get_".to_string()]),
            FilterOutcome::FallBackToAll
        );
    }

    #[test]
    fn test_end_to_end_one_hour_old_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tools_cache.json");
        let one_hour_ago = (Utc::now() - Duration::hours(1)).to_rfc3339();
        write_with_timestamp(&path, &one_hour_ago, &["get_pods", "set_config"]);

        assert!(!is_stale(&path, Duration::hours(24)));
        assert_eq!(
            load_filtered(&path, &["get_".to_string()]),
            FilterOutcome::Matched(vec![descriptor("get_pods")])
        );
    }
}
