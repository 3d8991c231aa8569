//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use crudforge_core::application::ports::{Filesystem, FsError};

/// In-memory filesystem for tests and dry environments. Cloning shares the
/// underlying state, so a test can hold a handle while the service owns
/// another.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
}

impl MemoryFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: impl AsRef<Path>) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path.as_ref()).cloned()
    }

    /// All file paths currently stored.
    pub fn file_paths(&self) -> Vec<PathBuf> {
        let inner = self.inner.read().expect("filesystem lock");
        inner.files.keys().cloned().collect()
    }

    /// Number of files whose path starts with `prefix`.
    pub fn count_under(&self, prefix: impl AsRef<Path>) -> usize {
        let inner = self.inner.read().expect("filesystem lock");
        inner
            .files
            .keys()
            .filter(|p| p.starts_with(prefix.as_ref()))
            .count()
    }
}

fn lock_err(path: &Path) -> FsError {
    FsError::Io {
        op: "lock",
        path: path.to_path_buf(),
        reason: "filesystem lock poisoned".into(),
    }
}

impl Filesystem for MemoryFilesystem {
    fn exists(&self, path: &Path) -> bool {
        let inner = self.inner.read().expect("filesystem lock");
        inner.files.contains_key(path) || inner.directories.contains(path)
    }

    fn read(&self, path: &Path) -> Result<String, FsError> {
        let inner = self.inner.read().map_err(|_| lock_err(path))?;
        inner.files.get(path).cloned().ok_or_else(|| FsError::NotFound {
            path: path.to_path_buf(),
        })
    }

    fn write(&self, path: &Path, content: &str) -> Result<(), FsError> {
        let mut inner = self.inner.write().map_err(|_| lock_err(path))?;
        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn write_new(&self, path: &Path, content: &str) -> Result<(), FsError> {
        let mut inner = self.inner.write().map_err(|_| lock_err(path))?;
        if inner.files.contains_key(path) {
            return Err(FsError::AlreadyExists {
                path: path.to_path_buf(),
            });
        }
        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn append(&self, path: &Path, content: &str) -> Result<(), FsError> {
        let mut inner = self.inner.write().map_err(|_| lock_err(path))?;
        inner
            .files
            .entry(path.to_path_buf())
            .or_default()
            .push_str(content);
        Ok(())
    }

    fn move_file(&self, from: &Path, to: &Path) -> Result<(), FsError> {
        let mut inner = self.inner.write().map_err(|_| lock_err(from))?;
        let content = inner.files.remove(from).ok_or_else(|| FsError::NotFound {
            path: from.to_path_buf(),
        })?;
        inner.files.insert(to.to_path_buf(), content);
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<(), FsError> {
        let mut inner = self.inner.write().map_err(|_| lock_err(path))?;
        inner.files.remove(path).ok_or_else(|| FsError::NotFound {
            path: path.to_path_buf(),
        })?;
        Ok(())
    }

    fn make_dir(&self, path: &Path) -> Result<(), FsError> {
        let mut inner = self.inner.write().map_err(|_| lock_err(path))?;
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            inner.directories.insert(current.clone());
        }
        Ok(())
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<PathBuf>, FsError> {
        let inner = self.inner.read().map_err(|_| lock_err(path))?;
        Ok(inner
            .files
            .keys()
            .filter(|p| p.parent() == Some(path))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_new_signals_already_exists() {
        let fs = MemoryFilesystem::new();
        fs.write_new(Path::new("/a.txt"), "one").unwrap();
        let err = fs.write_new(Path::new("/a.txt"), "two").unwrap_err();
        assert!(err.is_already_exists());
    }

    #[test]
    fn move_file_preserves_content() {
        let fs = MemoryFilesystem::new();
        fs.write(Path::new("/a.txt"), "payload").unwrap();
        fs.move_file(Path::new("/a.txt"), Path::new("/b.txt")).unwrap();
        assert!(!fs.exists(Path::new("/a.txt")));
        assert_eq!(fs.read_file("/b.txt").unwrap(), "payload");
    }

    #[test]
    fn list_dir_returns_direct_children_only() {
        let fs = MemoryFilesystem::new();
        fs.write(Path::new("/m/one.php"), "").unwrap();
        fs.write(Path::new("/m/sub/two.php"), "").unwrap();
        let listed = fs.list_dir(Path::new("/m")).unwrap();
        assert_eq!(listed, vec![PathBuf::from("/m/one.php")]);
    }

    #[test]
    fn append_creates_missing_files() {
        let fs = MemoryFilesystem::new();
        fs.append(Path::new("/log.txt"), "a").unwrap();
        fs.append(Path::new("/log.txt"), "b").unwrap();
        assert_eq!(fs.read_file("/log.txt").unwrap(), "ab");
    }
}
