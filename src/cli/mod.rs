//! CLI subcommands — init, check, status.

use crate::core::config;
use crate::core::engine::DiffEngine;
use crate::core::store::BaselineStore;
use crate::core::types::ChangeReport;
use clap::Subcommand;
use std::path::{Path, PathBuf};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the baseline by scanning the configured paths
    Init {
        /// Path to the monitor configuration YAML file
        #[arg(short, long, default_value = "vigil.yaml")]
        config: PathBuf,

        /// Path to the SQLite baseline database
        #[arg(short, long, default_value = "vigil.db")]
        database: PathBuf,

        /// Overwrite an existing baseline database
        #[arg(short, long)]
        force: bool,
    },

    /// Check file integrity against the established baseline
    Check {
        /// Path to the monitor configuration YAML file
        #[arg(short, long, default_value = "vigil.yaml")]
        config: PathBuf,

        /// Path to the SQLite baseline database
        #[arg(short, long, default_value = "vigil.db")]
        database: PathBuf,

        /// Emit the change report as JSON
        #[arg(long)]
        json: bool,

        /// Exit non-zero when any drift is found (for CI/cron)
        #[arg(long)]
        strict: bool,
    },

    /// Show the status of the baseline database
    Status {
        /// Path to the SQLite baseline database
        #[arg(short, long, default_value = "vigil.db")]
        database: PathBuf,
    },
}

/// Dispatch a CLI command.
pub fn dispatch(cmd: Commands) -> Result<(), String> {
    match cmd {
        Commands::Init {
            config,
            database,
            force,
        } => cmd_init(&config, &database, force),
        Commands::Check {
            config,
            database,
            json,
            strict,
        } => cmd_check(&config, &database, json, strict),
        Commands::Status { database } => cmd_status(&database),
    }
}

fn cmd_init(config_path: &Path, database: &Path, force: bool) -> Result<(), String> {
    if database.exists() {
        if !force {
            return Err(format!(
                "baseline database {} already exists (use --force to overwrite)",
                database.display()
            ));
        }
        std::fs::remove_file(database)
            .map_err(|e| format!("cannot remove {}: {}", database.display(), e))?;
    }

    let config = config::load_or_default(config_path);
    let store = BaselineStore::open(database).map_err(|e| e.to_string())?;
    let engine = DiffEngine::new(&config, store).map_err(|e| e.to_string())?;

    let count = engine.create_baseline().map_err(|e| e.to_string())?;
    println!("Baseline created: {} file(s) recorded in {}", count, database.display());
    Ok(())
}

fn cmd_check(config_path: &Path, database: &Path, json: bool, strict: bool) -> Result<(), String> {
    if !database.exists() {
        return Err(format!(
            "baseline database not found at {} — run `vigil init` first",
            database.display()
        ));
    }

    let config = config::load_or_default(config_path);
    let store = BaselineStore::open(database).map_err(|e| e.to_string())?;
    let engine = DiffEngine::new(&config, store).map_err(|e| e.to_string())?;

    let report = engine.check_integrity().map_err(|e| e.to_string())?;

    if json {
        let rendered = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("cannot serialize report: {}", e))?;
        println!("{}", rendered);
    } else {
        print_report(&report);
    }

    if strict && !report.is_empty() {
        return Err(format!("{} integrity finding(s)", report.len()));
    }
    Ok(())
}

fn cmd_status(database: &Path) -> Result<(), String> {
    if !database.exists() {
        println!(
            "No baseline database at {}. Run `vigil init` to establish one.",
            database.display()
        );
        return Ok(());
    }

    let store = BaselineStore::open(database).map_err(|e| e.to_string())?;
    let count = store.len().map_err(|e| e.to_string())?;
    println!("Baseline database: {}", database.display());
    println!("Monitored files in baseline: {}", count);
    Ok(())
}

/// Render a change report as plain text.
fn print_report(report: &ChangeReport) {
    if report.is_empty() {
        println!("No integrity violations detected. All monitored files are unchanged.");
        return;
    }

    if !report.added.is_empty() {
        println!("Added files:");
        for change in &report.added {
            println!("  + {} ({})", change.path, change.reason);
        }
    }
    if !report.modified.is_empty() {
        println!("Modified files:");
        for m in &report.modified {
            println!("  ~ {} ({})", m.path, m.kind.tag());
        }
    }
    if !report.deleted.is_empty() {
        println!("Deleted files:");
        for change in &report.deleted {
            println!("  - {} ({})", change.path, change.reason);
        }
    }

    println!();
    println!(
        "Drift: {} added, {} modified, {} deleted.",
        report.added.len(),
        report.modified.len(),
        report.deleted.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(dir: &tempfile::TempDir, root: &Path) -> PathBuf {
        let config = dir.path().join("vigil.yaml");
        std::fs::write(
            &config,
            format!("include:\n  - {}\n", root.display()),
        )
        .unwrap();
        config
    }

    #[test]
    fn init_creates_database_and_records_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("watched");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(root.join("a.txt"), "content").unwrap();
        let config = write_config(&dir, &root);
        let db = dir.path().join("vigil.db");

        cmd_init(&config, &db, false).unwrap();
        assert!(db.exists());

        let store = BaselineStore::open(&db).unwrap();
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(&dir, dir.path());
        let db = dir.path().join("vigil.db");
        std::fs::write(&db, "stale").unwrap();

        let err = cmd_init(&config, &db, false).unwrap_err();
        assert!(err.contains("--force"));
    }

    #[test]
    fn init_force_replaces_existing_database() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("watched");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(root.join("a.txt"), "content").unwrap();
        let config = write_config(&dir, &root);
        let db = dir.path().join("vigil.db");

        cmd_init(&config, &db, false).unwrap();
        cmd_init(&config, &db, true).unwrap();
        let store = BaselineStore::open(&db).unwrap();
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn check_without_database_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(&dir, dir.path());
        let err = cmd_check(&config, &dir.path().join("missing.db"), false, false).unwrap_err();
        assert!(err.contains("vigil init"));
    }

    #[test]
    fn check_clean_tree_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("watched");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(root.join("a.txt"), "content").unwrap();
        let config = write_config(&dir, &root);
        let db = dir.path().join("vigil.db");

        cmd_init(&config, &db, false).unwrap();
        cmd_check(&config, &db, false, true).unwrap();
    }

    #[test]
    fn strict_check_fails_on_drift() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("watched");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(root.join("a.txt"), "content").unwrap();
        let config = write_config(&dir, &root);
        let db = dir.path().join("vigil.db");

        cmd_init(&config, &db, false).unwrap();
        std::fs::write(root.join("b.txt"), "intruder").unwrap();

        // Non-strict reports but succeeds; strict exits non-zero.
        cmd_check(&config, &db, false, false).unwrap();
        let err = cmd_check(&config, &db, true, true).unwrap_err();
        assert!(err.contains("finding"));
    }

    #[test]
    fn status_without_database_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        cmd_status(&dir.path().join("missing.db")).unwrap();
    }

    #[test]
    fn status_reports_count() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("watched");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(root.join("a.txt"), "x").unwrap();
        std::fs::write(root.join("b.txt"), "y").unwrap();
        let config = write_config(&dir, &root);
        let db = dir.path().join("vigil.db");
        cmd_init(&config, &db, false).unwrap();

        cmd_status(&db).unwrap();
        let store = BaselineStore::open(&db).unwrap();
        assert_eq!(store.len().unwrap(), 2);
    }
}
