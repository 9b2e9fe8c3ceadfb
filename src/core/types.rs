//! Baseline entries and integrity-check report types.

use serde::Serialize;

/// One row of the baseline: the recorded state of a single monitored file.
///
/// Keyed by absolute path; writing an entry for an existing path replaces
/// it entirely. The baseline is a snapshot, not a log.
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineEntry {
    /// Absolute filesystem path (primary key).
    pub path: String,

    /// Lower-case hex digest of the file contents.
    pub digest: String,

    /// Byte length at capture time.
    pub size: u64,

    /// Modification time, seconds since epoch (fractional).
    pub modified_at: f64,

    /// Inode change time, seconds since epoch (fractional).
    pub created_at: f64,

    /// Permission bits (mode & 0o777).
    pub permission_bits: u32,

    /// Wall-clock time the entry was written. Stamped by the store on put.
    pub recorded_at: f64,
}

/// A file that appeared or vanished relative to the baseline.
#[derive(Debug, Clone, Serialize)]
pub struct Change {
    pub path: String,
    pub reason: String,
}

/// A baselined file whose live state diverged from its recorded state.
#[derive(Debug, Clone, Serialize)]
pub struct Modification {
    pub path: String,
    #[serde(flatten)]
    pub kind: ModificationKind,
}

/// The first differing field found by the ordered comparison, with the
/// recorded (old) and live (new) values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModificationKind {
    SizeMismatch { old: u64, new: u64 },
    MtimeMismatch { old: f64, new: f64 },
    PermissionsMismatch { old: u32, new: u32 },
    HashMismatch { old: String, new: String },
}

impl ModificationKind {
    /// The wire/display tag for this mismatch kind.
    pub fn tag(&self) -> &'static str {
        match self {
            ModificationKind::SizeMismatch { .. } => "size_mismatch",
            ModificationKind::MtimeMismatch { .. } => "mtime_mismatch",
            ModificationKind::PermissionsMismatch { .. } => "permissions_mismatch",
            ModificationKind::HashMismatch { .. } => "hash_mismatch",
        }
    }
}

/// The structured output of one integrity check. Never persisted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChangeReport {
    pub added: Vec<Change>,
    pub modified: Vec<Modification>,
    pub deleted: Vec<Change>,
}

impl ChangeReport {
    /// True when no drift was detected.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.deleted.is_empty()
    }

    /// Total number of findings across all three categories.
    pub fn len(&self) -> usize {
        self.added.len() + self.modified.len() + self.deleted.len()
    }
}
