//! Baseline creation and integrity checking.

use super::config::MonitorConfig;
use super::error::Result;
use super::hasher::{self, HashAlgorithm};
use super::matcher::{absolutize, PathMatcher};
use super::store::BaselineStore;
use super::types::{BaselineEntry, Change, ChangeReport, Modification, ModificationKind};
use std::collections::BTreeSet;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Live metadata captured for a single file.
struct FileState {
    size: u64,
    modified_at: f64,
    created_at: f64,
    permission_bits: u32,
}

/// Drives the walk, applies the matcher, and either populates the store
/// (baseline creation) or compares live state against it (integrity
/// check).
///
/// Stateless across calls: everything durable lives in the store, and the
/// engine never caches entries between invocations.
#[derive(Debug)]
pub struct DiffEngine {
    include: Vec<PathBuf>,
    matcher: PathMatcher,
    algorithm: HashAlgorithm,
    store: BaselineStore,
}

impl DiffEngine {
    /// Build an engine from a loaded config and an open store. Fails only
    /// when the configured algorithm name is unsupported.
    pub fn new(config: &MonitorConfig, store: BaselineStore) -> Result<Self> {
        let algorithm = HashAlgorithm::parse(&config.hash_algorithm)?;
        Ok(DiffEngine {
            include: config.include.iter().map(|p| absolutize(p)).collect(),
            matcher: PathMatcher::new(&config.include, &config.exclude),
            algorithm,
            store,
        })
    }

    /// Scan all include roots and record every accepted file in the
    /// baseline. Per-file failures are logged and skipped; only storage
    /// failures abort the scan. Returns the number of files baselined.
    pub fn create_baseline(&self) -> Result<usize> {
        info!(algorithm = %self.algorithm, "creating baseline");
        let mut count = 0usize;

        for path in self.walk_monitored() {
            let state = match file_state(&path) {
                Some(state) => state,
                None => {
                    warn!(path = %path.display(), "cannot stat file, skipping");
                    continue;
                }
            };
            let digest = match hasher::digest_file(&path, self.algorithm) {
                Ok(digest) => digest,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "cannot hash file, skipping");
                    continue;
                }
            };

            self.store.put(&BaselineEntry {
                path: path.to_string_lossy().into_owned(),
                digest,
                size: state.size,
                modified_at: state.modified_at,
                created_at: state.created_at,
                permission_bits: state.permission_bits,
                recorded_at: 0.0, // stamped by the store
            })?;
            count += 1;
        }

        info!(files = count, "baseline created");
        Ok(count)
    }

    /// Re-walk the monitored set and classify drift against the baseline.
    ///
    /// Comparison for surviving paths is ordered and short-circuits on the
    /// first mismatch: size, then mtime, then permission bits, then
    /// digest. The digest is recomputed only when the first three all
    /// match, so a metadata-only change is reported without re-hashing.
    /// Files whose metadata cannot be read are skipped without a report
    /// entry (known limitation, logged at debug level).
    pub fn check_integrity(&self) -> Result<ChangeReport> {
        info!("checking integrity against baseline");
        let mut report = ChangeReport::default();

        let baseline_paths = self.store.all_paths()?;
        let current_paths: BTreeSet<String> = self
            .walk_monitored()
            .into_iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect();

        for path in current_paths.difference(&baseline_paths) {
            debug!(path = %path, "added file");
            report.added.push(Change {
                path: path.clone(),
                reason: "new file not in baseline".to_string(),
            });
        }

        for path in baseline_paths.difference(&current_paths) {
            warn!(path = %path, "deleted file");
            report.deleted.push(Change {
                path: path.clone(),
                reason: "file deleted from monitored path".to_string(),
            });
        }

        for path in baseline_paths.intersection(&current_paths) {
            let state = match file_state(Path::new(path)) {
                Some(state) => state,
                None => {
                    debug!(path = %path, "metadata unreadable, skipping comparison");
                    continue;
                }
            };
            let entry = match self.store.get(path)? {
                Some(entry) => entry,
                None => {
                    // Should not occur: the path came from all_paths().
                    report.added.push(Change {
                        path: path.clone(),
                        reason: "file exists but is not in baseline".to_string(),
                    });
                    continue;
                }
            };

            match self.compare(path, &entry, &state) {
                Ok(Some(kind)) => {
                    warn!(path = %path, kind = kind.tag(), "modified file");
                    report.modified.push(Modification {
                        path: path.clone(),
                        kind,
                    });
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(path = %path, error = %e, "comparison failed, skipping");
                }
            }
        }

        info!(findings = report.len(), "integrity check complete");
        Ok(report)
    }

    /// Ordered comparison of live state against the stored entry.
    /// Returns the first differing field, or None when nothing changed.
    fn compare(
        &self,
        path: &str,
        entry: &BaselineEntry,
        state: &FileState,
    ) -> Result<Option<ModificationKind>> {
        if state.size != entry.size {
            return Ok(Some(ModificationKind::SizeMismatch {
                old: entry.size,
                new: state.size,
            }));
        }
        if state.modified_at != entry.modified_at {
            return Ok(Some(ModificationKind::MtimeMismatch {
                old: entry.modified_at,
                new: state.modified_at,
            }));
        }
        if state.permission_bits != entry.permission_bits {
            return Ok(Some(ModificationKind::PermissionsMismatch {
                old: entry.permission_bits,
                new: state.permission_bits,
            }));
        }

        // Metadata is stable; only now is the content re-hashed.
        let digest = hasher::digest_file(Path::new(path), self.algorithm)?;
        if digest != entry.digest {
            return Ok(Some(ModificationKind::HashMismatch {
                old: entry.digest.clone(),
                new: digest,
            }));
        }
        Ok(None)
    }

    /// Walk every include root and collect the files accepted by the
    /// matcher. Missing roots are logged and skipped; symlinks are not
    /// followed.
    fn walk_monitored(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for root in &self.include {
            if !root.exists() {
                warn!(root = %root.display(), "include path does not exist, skipping");
                continue;
            }
            for entry in WalkDir::new(root).follow_links(false) {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        warn!(root = %root.display(), error = %e, "walk error, skipping entry");
                        continue;
                    }
                };
                if !entry.file_type().is_file() {
                    continue;
                }
                if self.matcher.is_monitored(entry.path()) {
                    files.push(entry.path().to_path_buf());
                }
            }
        }
        files
    }
}

/// Capture size, timestamps, and permission bits for a file. None when
/// the file vanished or cannot be statted.
fn file_state(path: &Path) -> Option<FileState> {
    let meta = std::fs::metadata(path).ok()?;
    Some(FileState {
        size: meta.len(),
        modified_at: timestamp(meta.mtime(), meta.mtime_nsec()),
        created_at: timestamp(meta.ctime(), meta.ctime_nsec()),
        permission_bits: meta.mode() & 0o777,
    })
}

#[allow(clippy::cast_precision_loss)]
fn timestamp(secs: i64, nsec: i64) -> f64 {
    secs as f64 + nsec as f64 / 1e9
}
