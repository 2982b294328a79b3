//! Snapshot metadata

use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether a snapshot covers every CLI of its project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotType {
    Full,
    Partial,
}

/// What created a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SnapshotSource {
    AutoApplyBackup,
    ManualBackup,
    PreImportBackup,
}

/// Contents of a snapshot's `meta.json`. Immutable once committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMeta {
    /// 17-digit UTC+8 timestamp; identifier and sort key
    pub timestamp: String,
    pub snapshot_type: SnapshotType,
    #[serde(rename = "includedCLIs")]
    pub included_clis: Vec<String>,
    pub source: SnapshotSource,
    pub created_time: String,
    #[serde(default)]
    pub notes: String,
}

impl fmt::Display for SnapshotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "full"),
            Self::Partial => write!(f, "partial"),
        }
    }
}

impl fmt::Display for SnapshotSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AutoApplyBackup => write!(f, "auto-apply-backup"),
            Self::ManualBackup => write!(f, "manual-backup"),
            Self::PreImportBackup => write!(f, "pre-import-backup"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_existing_meta_json() {
        let raw = r#"{
            "timestamp": "20250101120000123",
            "snapshotType": "partial",
            "includedCLIs": ["Claude"],
            "source": "auto-apply-backup",
            "createdTime": "2025-01-01T12:00:00.123+08:00"
        }"#;

        let meta: SnapshotMeta = serde_json::from_str(raw).unwrap();

        assert_eq!(meta.snapshot_type, SnapshotType::Partial);
        assert_eq!(meta.source, SnapshotSource::AutoApplyBackup);
        assert_eq!(meta.included_clis, vec!["Claude".to_string()]);
        assert_eq!(meta.notes, "");
    }

    #[test]
    fn serializes_wire_names() {
        let meta = SnapshotMeta {
            timestamp: "20250101120000123".into(),
            snapshot_type: SnapshotType::Full,
            included_clis: vec!["Codex".into()],
            source: SnapshotSource::ManualBackup,
            created_time: "2025-01-01T12:00:00.123+08:00".into(),
            notes: "before upgrade".into(),
        };

        let value = serde_json::to_value(&meta).unwrap();

        assert_eq!(value["snapshotType"], "full");
        assert_eq!(value["source"], "manual-backup");
        assert_eq!(value["includedCLIs"][0], "Codex");
        assert_eq!(value["createdTime"], "2025-01-01T12:00:00.123+08:00");
        assert_eq!(SnapshotSource::PreImportBackup.to_string(), "pre-import-backup");
    }
}
