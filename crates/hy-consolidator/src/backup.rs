//! Pre-write snapshots of files, grouped into timestamped batches.
//!
//! Layout under the state directory:
//!
//! ```text
//! backups/
//!   <project>/
//!     2026-03-01_14-05-09.372/
//!       manifest.json        backup file name -> original absolute path
//!       files/
//!         src_pages_Home.tsx
//! ```
//!
//! One batch is created per run (named after the run's start time, UTC,
//! to the millisecond). A batch holds at most one copy per file: the bytes
//! the file had before the batch first touched it.
//! Batches older than [`BACKUP_RETENTION_DAYS`] are swept at the start of
//! the next run, and the newest batch of a project can be restored with
//! [`BackupStore::revert_latest`].

use std::collections::BTreeMap;
use std::fs;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use hy_core::fs::{ensure_dir, write_atomic};
use tracing::{debug, info};

use crate::error::ConsolidateError;

/// How long a batch is kept.
pub const BACKUP_RETENTION_DAYS: i64 = 7;

/// Batch directory name format.
pub const BATCH_FORMAT: &str = "%Y-%m-%d_%H-%M-%S%.3f";

const MANIFEST_FILE: &str = "manifest.json";
const FILES_DIR: &str = "files";

type Manifest = BTreeMap<String, Utf8PathBuf>;

/// Backup batches for one project.
#[derive(Debug, Clone)]
pub struct BackupStore {
    /// The `backups/` directory.
    root: Utf8PathBuf,
    /// Project name, the last component of `cwd`.
    project: String,
    /// Directory that relative file paths are resolved against.
    cwd: Utf8PathBuf,
    /// Name of this run's batch directory.
    batch: String,
}

impl BackupStore {
    /// Creates a store whose batch is named after `started`.
    #[must_use]
    pub fn new(root: impl Into<Utf8PathBuf>, cwd: impl Into<Utf8PathBuf>, started: DateTime<Utc>) -> Self {
        let cwd = cwd.into();
        Self {
            root: root.into(),
            project: project_name(&cwd),
            cwd,
            batch: started.format(BATCH_FORMAT).to_string(),
        }
    }

    /// Returns the project name.
    #[must_use]
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Returns this run's batch directory.
    #[must_use]
    pub fn batch_dir(&self) -> Utf8PathBuf {
        self.project_dir().join(&self.batch)
    }

    fn project_dir(&self) -> Utf8PathBuf {
        self.root.join(&self.project)
    }

    /// Stores `contents` as the backup of `file` and records it in the
    /// batch manifest. Returns the path of the backup copy.
    ///
    /// If the batch already holds a copy of `file`, that copy is kept and
    /// its path returned.
    ///
    /// # Errors
    ///
    /// Returns [`ConsolidateError::Backup`] if the copy or the manifest
    /// cannot be written.
    pub fn snapshot(&self, file: &Utf8Path, contents: &[u8]) -> Result<Utf8PathBuf, ConsolidateError> {
        let batch_dir = self.batch_dir();
        let files_dir = batch_dir.join(FILES_DIR);
        ensure_dir(&files_dir).map_err(|e| ConsolidateError::backup(file, e))?;

        let name = self.flattened_name(file);
        let backup_path = files_dir.join(&name);
        let manifest_path = batch_dir.join(MANIFEST_FILE);
        let mut manifest = read_manifest(&manifest_path).unwrap_or_default();
        if manifest.contains_key(&name) && backup_path.is_file() {
            debug!(path = %file, backup = %backup_path, "Batch already holds a backup");
            return Ok(backup_path);
        }

        fs::write(&backup_path, contents).map_err(|e| ConsolidateError::backup(file, e))?;
        manifest.insert(name, self.absolute(file));
        let json = serde_json::to_string_pretty(&manifest)
            .map_err(|e| ConsolidateError::backup(file, io::Error::other(e)))?;
        write_atomic(&manifest_path, json.as_bytes()).map_err(|e| ConsolidateError::backup(file, e))?;

        debug!(path = %file, backup = %backup_path, "Backed up file");
        Ok(backup_path)
    }

    /// Removes every batch, of any project, older than the retention window.
    ///
    /// Directories whose names are not batch timestamps are left alone.
    /// Returns the failures; the sweep itself always runs to the end.
    pub fn sweep_expired(&self, now: DateTime<Utc>) -> Vec<ConsolidateError> {
        let cutoff = now - Duration::days(BACKUP_RETENTION_DAYS);
        let mut failures = Vec::new();

        let projects = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return failures,
            Err(e) => {
                failures.push(ConsolidateError::state(&self.root, e));
                return failures;
            }
        };

        for project in projects.filter_map(Result::ok) {
            let Ok(project_path) = Utf8PathBuf::from_path_buf(project.path()) else {
                continue;
            };
            if !project_path.is_dir() {
                continue;
            }
            let batches = match fs::read_dir(&project_path) {
                Ok(entries) => entries,
                Err(e) => {
                    failures.push(ConsolidateError::state(&project_path, e));
                    continue;
                }
            };
            for batch in batches.filter_map(Result::ok) {
                let file_name = batch.file_name();
                let Some(name) = file_name.to_str() else {
                    continue;
                };
                let Some(taken) = parse_batch_name(name) else {
                    continue;
                };
                if taken >= cutoff {
                    continue;
                }
                let batch_path = project_path.join(name);
                match fs::remove_dir_all(&batch_path) {
                    Ok(()) => debug!(path = %batch_path, "Removed expired backup"),
                    Err(e) => failures.push(ConsolidateError::state(batch_path, e)),
                }
            }
        }

        failures
    }

    /// Restores every file recorded in the newest batch of this project.
    ///
    /// # Errors
    ///
    /// Returns [`ConsolidateError::NoBackup`] if the project has no batch with
    /// a manifest, and [`ConsolidateError::Write`] if a file cannot be
    /// restored.
    pub fn revert_latest(&self) -> Result<Vec<Utf8PathBuf>, ConsolidateError> {
        let batch_dir = self.latest_batch().ok_or_else(|| ConsolidateError::NoBackup {
            project: self.project.clone(),
        })?;
        let manifest_path = batch_dir.join(MANIFEST_FILE);
        let manifest = read_manifest(&manifest_path)?;

        let mut restored = Vec::with_capacity(manifest.len());
        for (name, original) in manifest {
            let backup = batch_dir.join(FILES_DIR).join(&name);
            let contents = fs::read(&backup).map_err(|e| ConsolidateError::read(&backup, e))?;
            write_atomic(&original, &contents).map_err(|e| ConsolidateError::write(&original, e))?;
            debug!(path = %original, backup = %backup, "Restored file");
            restored.push(original);
        }

        info!(batch = %batch_dir, files = restored.len(), "Reverted latest backup");
        Ok(restored)
    }

    fn latest_batch(&self) -> Option<Utf8PathBuf> {
        let project_dir = self.project_dir();
        fs::read_dir(&project_dir)
            .ok()?
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let name = entry.file_name().into_string().ok()?;
                let taken = parse_batch_name(&name)?;
                project_dir
                    .join(&name)
                    .join(MANIFEST_FILE)
                    .is_file()
                    .then_some((taken, name))
            })
            .max()
            .map(|(_, name)| project_dir.join(name))
    }

    /// `src/pages/Home.tsx` relative to the working directory becomes
    /// `src_pages_Home.tsx`.
    fn flattened_name(&self, file: &Utf8Path) -> String {
        let relative = if file.is_absolute() {
            file.strip_prefix(&self.cwd).unwrap_or(file)
        } else {
            file
        };
        relative
            .as_str()
            .trim_start_matches(['/', '\\'])
            .replace(['/', '\\'], "_")
    }

    fn absolute(&self, file: &Utf8Path) -> Utf8PathBuf {
        if file.is_absolute() {
            file.to_owned()
        } else {
            self.cwd.join(file)
        }
    }
}

/// Parses a batch directory name back into its UTC timestamp.
#[must_use]
pub fn parse_batch_name(name: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(name, BATCH_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Returns the last component of `cwd`, used to group backups by project.
#[must_use]
pub fn project_name(cwd: &Utf8Path) -> String {
    cwd.file_name().unwrap_or("project").to_owned()
}

fn read_manifest(path: &Utf8Path) -> Result<Manifest, ConsolidateError> {
    let contents = fs::read_to_string(path).map_err(|e| ConsolidateError::state(path, e))?;
    serde_json::from_str(&contents).map_err(|e| ConsolidateError::json(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Utf8PathBuf, Utf8PathBuf) {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let root =
            Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("temp dir should be UTF-8");
        let cwd = root.join("web-app");
        fs::create_dir_all(cwd.join("src/pages")).expect("create project");
        (temp, root.join("backups"), cwd)
    }

    fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 12, 0, 0)
            .single()
            .expect("valid date")
    }

    #[test]
    fn test_batch_name_round_trip() {
        let started = at(2026, 3, 1);
        let store = BackupStore::new("/state/backups", "/work/web-app", started);
        assert_eq!(store.project(), "web-app");
        assert_eq!(
            store.batch_dir(),
            "/state/backups/web-app/2026-03-01_12-00-00.000"
        );
        assert_eq!(parse_batch_name("2026-03-01_12-00-00.000"), Some(started));
        assert_eq!(parse_batch_name("not-a-batch"), None);
    }

    #[test]
    fn test_snapshot_flattens_relative_path() {
        let (_temp, backups, cwd) = setup();
        let file = cwd.join("src/pages/Home.tsx");
        fs::write(&file, "new").expect("write");

        let store = BackupStore::new(&backups, &cwd, at(2026, 3, 1));
        let backup = store.snapshot(&file, b"old").expect("snapshot should succeed");

        assert_eq!(backup.file_name(), Some("src_pages_Home.tsx"));
        assert_eq!(fs::read_to_string(&backup).expect("read backup"), "old");
        assert!(store.batch_dir().join(MANIFEST_FILE).is_file());
    }

    #[test]
    fn test_revert_latest_restores_newest_batch() {
        let (_temp, backups, cwd) = setup();
        let file = cwd.join("src/pages/Home.tsx");

        let older = BackupStore::new(&backups, &cwd, at(2026, 3, 1));
        older.snapshot(&file, b"first").expect("snapshot");
        let newer = BackupStore::new(&backups, &cwd, at(2026, 3, 2));
        newer.snapshot(&file, b"second").expect("snapshot");
        fs::write(&file, "rewritten").expect("write");

        let restored = newer.revert_latest().expect("revert should succeed");
        assert_eq!(restored, vec![file.clone()]);
        assert_eq!(fs::read_to_string(&file).expect("read"), "second");
    }

    #[test]
    fn test_batches_within_one_second_stay_apart() {
        let started = at(2026, 3, 1);
        let first = BackupStore::new("/state/backups", "/work/web-app", started);
        let second = BackupStore::new(
            "/state/backups",
            "/work/web-app",
            started + Duration::milliseconds(250),
        );
        assert_ne!(first.batch_dir(), second.batch_dir());
        assert_eq!(
            parse_batch_name("2026-03-01_12-00-00.250"),
            Some(started + Duration::milliseconds(250))
        );
    }

    #[test]
    fn test_snapshot_keeps_first_copy_in_batch() {
        let (_temp, backups, cwd) = setup();
        let file = cwd.join("src/pages/Home.tsx");
        let store = BackupStore::new(&backups, &cwd, at(2026, 3, 1));

        let first = store.snapshot(&file, b"pristine").expect("first snapshot");
        let second = store.snapshot(&file, b"rewritten").expect("second snapshot");

        assert_eq!(first, second);
        assert_eq!(fs::read_to_string(&first).expect("read backup"), "pristine");
    }

    #[test]
    fn test_revert_without_backups() {
        let (_temp, backups, cwd) = setup();
        let store = BackupStore::new(&backups, &cwd, at(2026, 3, 1));
        let err = store.revert_latest().expect_err("nothing to revert");
        assert!(matches!(err, ConsolidateError::NoBackup { ref project } if project == "web-app"));
    }

    #[test]
    fn test_sweep_removes_only_expired_batches() {
        let (_temp, backups, cwd) = setup();
        let file = cwd.join("src/pages/Home.tsx");
        let stale = BackupStore::new(&backups, &cwd, at(2026, 3, 1));
        stale.snapshot(&file, b"a").expect("snapshot");
        let fresh = BackupStore::new(&backups, &cwd, at(2026, 3, 9));
        fresh.snapshot(&file, b"b").expect("snapshot");
        let stray = backups.join("web-app/notes");
        fs::create_dir_all(&stray).expect("create stray dir");

        let failures = fresh.sweep_expired(at(2026, 3, 10));

        assert!(failures.is_empty());
        assert!(!stale.batch_dir().exists());
        assert!(fresh.batch_dir().exists());
        assert!(stray.exists());
    }

    #[test]
    fn test_sweep_without_backups_dir() {
        let (_temp, backups, cwd) = setup();
        let store = BackupStore::new(&backups, &cwd, at(2026, 3, 1));
        assert!(store.sweep_expired(at(2026, 3, 10)).is_empty());
    }
}
