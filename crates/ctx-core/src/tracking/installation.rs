//! Tracking file data model

use crate::scope::Scope;
use chrono::{DateTime, SubsecRound, Utc};
use ctx_fs::{Digest, NormalizedPath};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::path::PathBuf;

/// One installed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Slash-separated path relative to the installation's base path
    pub path: NormalizedPath,
    /// Content fingerprint as last installed
    #[serde(rename = "md5")]
    pub digest: Digest,
    /// Byte length at install time; diagnostic only
    #[serde(default)]
    pub size: u64,
    /// Where the file came from; provenance only
    #[serde(default)]
    pub source: String,
}

/// Records keyed by path, with O(1) lookup, upsert and removal.
///
/// Serialized as a plain JSON array. Removal swaps the last record into the
/// freed slot, so order is stable between mutations but not insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileRecords {
    records: Vec<FileRecord>,
    index: HashMap<NormalizedPath, usize>,
}

impl FileRecords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `record`, replacing any record with the same path in place.
    ///
    /// Returns the replaced record.
    pub fn upsert(&mut self, record: FileRecord) -> Option<FileRecord> {
        match self.index.get(&record.path) {
            Some(&idx) => Some(std::mem::replace(&mut self.records[idx], record)),
            None => {
                self.index.insert(record.path.clone(), self.records.len());
                self.records.push(record);
                None
            }
        }
    }

    /// Remove the record for `path`, if any.
    pub fn remove(&mut self, path: &NormalizedPath) -> Option<FileRecord> {
        let idx = self.index.remove(path)?;
        let removed = self.records.swap_remove(idx);
        if let Some(moved) = self.records.get(idx) {
            self.index.insert(moved.path.clone(), idx);
        }
        Some(removed)
    }

    pub fn get(&self, path: &NormalizedPath) -> Option<&FileRecord> {
        self.index.get(path).map(|&idx| &self.records[idx])
    }

    pub fn contains(&self, path: &NormalizedPath) -> bool {
        self.index.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FileRecord> {
        self.records.iter()
    }
}

impl FromIterator<FileRecord> for FileRecords {
    fn from_iter<I: IntoIterator<Item = FileRecord>>(iter: I) -> Self {
        let mut records = Self::new();
        for record in iter {
            records.upsert(record);
        }
        records
    }
}

impl<'a> IntoIterator for &'a FileRecords {
    type Item = &'a FileRecord;
    type IntoIter = std::slice::Iter<'a, FileRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for FileRecords {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.records.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FileRecords {
    /// Accepts `null` as empty; duplicate paths collapse onto the last one.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let records = Option::<Vec<FileRecord>>::deserialize(deserializer)?;
        Ok(records.unwrap_or_default().into_iter().collect())
    }
}

/// Everything persisted for one destination root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installation {
    /// When this installation was first created
    #[serde(rename = "timestamp", default = "now", with = "rfc3339")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub scope: Scope,
    /// Destination root every record path is relative to
    pub base_path: PathBuf,
    #[serde(default)]
    pub files: FileRecords,
}

impl Installation {
    pub fn new(scope: Scope, base_path: impl Into<PathBuf>) -> Self {
        Self {
            created_at: now(),
            scope,
            base_path: base_path.into(),
            files: FileRecords::new(),
        }
    }
}

fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

/// RFC 3339 at whole-second precision, accepting any offset on input.
mod rfc3339 {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|parsed| parsed.with_timezone(&Utc))
            .map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(path: &str, content: &[u8]) -> FileRecord {
        FileRecord {
            path: NormalizedPath::new(path),
            digest: Digest::of_bytes(content),
            size: content.len() as u64,
            source: "test".to_string(),
        }
    }

    #[test]
    fn upsert_replaces_in_place() {
        let mut records = FileRecords::new();
        assert!(records.upsert(record("a.md", b"v1")).is_none());
        records.upsert(record("b.md", b"x"));

        let replaced = records.upsert(record("a.md", b"v2")).unwrap();
        assert_eq!(replaced.digest, Digest::of_bytes(b"v1"));
        assert_eq!(records.len(), 2);
        assert_eq!(
            records.get(&NormalizedPath::new("a.md")).unwrap().digest,
            Digest::of_bytes(b"v2")
        );
    }

    #[test]
    fn remove_keeps_index_consistent() {
        let mut records: FileRecords = ["a", "b", "c"]
            .into_iter()
            .map(|p| record(p, p.as_bytes()))
            .collect();

        records.remove(&NormalizedPath::new("a")).unwrap();
        assert!(records.remove(&NormalizedPath::new("a")).is_none());
        assert!(records.contains(&NormalizedPath::new("c")));
        assert_eq!(records.get(&NormalizedPath::new("c")).unwrap().path.as_str(), "c");
        assert_eq!(records.len(), 2);

        records.remove(&NormalizedPath::new("c")).unwrap();
        records.remove(&NormalizedPath::new("b")).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn null_files_deserialize_as_empty() {
        let installation: Installation = serde_json::from_str(
            r#"{"timestamp":"2025-01-02T15:04:05+08:00","scope":"global","base_path":"/h/.claude","files":null}"#,
        )
        .unwrap();
        assert!(installation.files.is_empty());
        assert_eq!(installation.scope, Scope::Global);
        assert_eq!(installation.created_at.to_rfc3339(), "2025-01-02T07:04:05+00:00");
    }

    #[test]
    fn duplicate_paths_collapse_on_load() {
        let installation: Installation = serde_json::from_str(
            r#"{"base_path":".","files":[
                {"path":"a.md","md5":"00"},
                {"path":"a.md","md5":"11"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(installation.files.len(), 1);
        assert_eq!(installation.files.iter().next().unwrap().digest.as_str(), "11");
    }
}
