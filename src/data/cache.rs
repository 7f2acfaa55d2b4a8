use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use super::loader::load_file;
use super::model::Roster;
use crate::error::LoadError;

/// Caller-owned cache of a loaded roster.
///
/// Invalidation rule: the roster is reloaded when the source file's
/// modification time differs from the one recorded at the last load.
#[derive(Debug)]
pub struct RosterCache {
    path: PathBuf,
    roster: Arc<Roster>,
    modified: Option<SystemTime>,
}

impl RosterCache {
    /// Load `path` once and start tracking it.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LoadError> {
        let path = path.into();
        let modified = modified_time(&path)?;
        let roster = Arc::new(load_file(&path)?);
        Ok(RosterCache {
            path,
            roster,
            modified,
        })
    }

    /// The cached roster, reloaded first if the file changed on disk.
    pub fn get(&mut self) -> Result<Arc<Roster>, LoadError> {
        let current = modified_time(&self.path)?;
        if current.is_none() || current != self.modified {
            log::info!("{} changed on disk, reloading", self.path.display());
            return self.reload();
        }
        Ok(Arc::clone(&self.roster))
    }

    /// Unconditionally reload from disk.
    pub fn reload(&mut self) -> Result<Arc<Roster>, LoadError> {
        let modified = modified_time(&self.path)?;
        self.roster = Arc::new(load_file(&self.path)?);
        self.modified = modified;
        Ok(Arc::clone(&self.roster))
    }

    /// Last successfully loaded roster, without checking the file.
    pub fn roster(&self) -> Arc<Roster> {
        Arc::clone(&self.roster)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// `None` when the platform does not report modification times; such files
/// are reloaded on every `get`.
fn modified_time(path: &Path) -> Result<Option<SystemTime>, LoadError> {
    let metadata = std::fs::metadata(path).map_err(|e| LoadError::unavailable(path, e))?;
    Ok(metadata.modified().ok())
}

#[cfg(test)]
mod tests {
    use std::fs::File;
    use std::time::Duration;

    use super::*;

    const HEADER: &str = "student_id,name,grade,class,region\n";

    fn bump_mtime(path: &Path) {
        let later = SystemTime::now() + Duration::from_secs(60);
        File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(later)
            .unwrap();
    }

    #[test]
    fn unchanged_file_returns_the_same_roster() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.csv");
        std::fs::write(&path, format!("{HEADER}S1,Alice,8,A,North\n")).unwrap();

        let mut cache = RosterCache::open(&path).unwrap();
        let first = cache.get().unwrap();
        let second = cache.get().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 1);
        assert_eq!(cache.path(), path.as_path());
    }

    #[test]
    fn modified_file_is_reloaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.csv");
        std::fs::write(&path, format!("{HEADER}S1,Alice,8,A,North\n")).unwrap();

        let mut cache = RosterCache::open(&path).unwrap();
        let before = cache.get().unwrap();

        std::fs::write(&path, format!("{HEADER}S1,Alice,8,A,North\nS2,Bob,8,A,North\n")).unwrap();
        bump_mtime(&path);

        let after = cache.get().unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(after.len(), 2);
        assert_eq!(before.len(), 1);
    }

    #[test]
    fn reload_ignores_an_unchanged_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.csv");
        std::fs::write(&path, format!("{HEADER}S1,Alice,8,A,North\n")).unwrap();
        let original = std::fs::metadata(&path).unwrap().modified().unwrap();

        let mut cache = RosterCache::open(&path).unwrap();
        let before = cache.get().unwrap();

        std::fs::write(&path, format!("{HEADER}S1,Alice,8,A,North\nS2,Bob,8,A,North\n")).unwrap();
        File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(original)
            .unwrap();

        let stale = cache.get().unwrap();
        assert!(Arc::ptr_eq(&before, &stale));
        assert_eq!(stale.len(), 1);

        let fresh = cache.reload().unwrap();
        assert!(!Arc::ptr_eq(&before, &fresh));
        assert_eq!(fresh.len(), 2);
    }

    #[test]
    fn deleted_file_is_unavailable_but_last_roster_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.csv");
        std::fs::write(&path, format!("{HEADER}S1,Alice,8,A,North\n")).unwrap();

        let mut cache = RosterCache::open(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(cache.get(), Err(LoadError::SourceUnavailable { .. })));
        assert_eq!(cache.roster().len(), 1);
    }

    #[test]
    fn open_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = RosterCache::open(dir.path().join("missing.csv")).unwrap_err();
        assert!(matches!(err, LoadError::SourceUnavailable { .. }));
    }
}
