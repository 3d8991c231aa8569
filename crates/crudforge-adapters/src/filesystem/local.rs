//! Local filesystem adapter using std::fs.

use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

use crudforge_core::application::ports::{Filesystem, FsError};
use walkdir::WalkDir;

/// Production filesystem implementation backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    pub fn new() -> Self {
        Self
    }
}

impl Filesystem for LocalFilesystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read(&self, path: &Path) -> Result<String, FsError> {
        std::fs::read_to_string(path).map_err(|e| map_io_error("read", path, e))
    }

    fn write(&self, path: &Path, content: &str) -> Result<(), FsError> {
        std::fs::write(path, content).map_err(|e| map_io_error("write", path, e))
    }

    fn write_new(&self, path: &Path, content: &str) -> Result<(), FsError> {
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| map_io_error("create", path, e))?;
        file.write_all(content.as_bytes())
            .map_err(|e| map_io_error("write", path, e))
    }

    fn append(&self, path: &Path, content: &str) -> Result<(), FsError> {
        let mut file = std::fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)
            .map_err(|e| map_io_error("open", path, e))?;
        file.write_all(content.as_bytes())
            .map_err(|e| map_io_error("append", path, e))
    }

    fn move_file(&self, from: &Path, to: &Path) -> Result<(), FsError> {
        std::fs::rename(from, to).map_err(|e| map_io_error("move", from, e))
    }

    fn remove_file(&self, path: &Path) -> Result<(), FsError> {
        std::fs::remove_file(path).map_err(|e| map_io_error("remove", path, e))
    }

    fn make_dir(&self, path: &Path) -> Result<(), FsError> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error("create directory", path, e))
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<PathBuf>, FsError> {
        let mut entries = Vec::new();
        for entry in WalkDir::new(path).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| FsError::Io {
                op: "list",
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
            if entry.file_type().is_file() {
                entries.push(entry.into_path());
            }
        }
        entries.sort();
        Ok(entries)
    }
}

fn map_io_error(op: &'static str, path: &Path, e: io::Error) -> FsError {
    match e.kind() {
        io::ErrorKind::AlreadyExists => FsError::AlreadyExists {
            path: path.to_path_buf(),
        },
        io::ErrorKind::NotFound => FsError::NotFound {
            path: path.to_path_buf(),
        },
        _ => FsError::Io {
            op,
            path: path.to_path_buf(),
            reason: e.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_new_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let fs = LocalFilesystem::new();
        let path = dir.path().join("a.txt");

        fs.write_new(&path, "one").unwrap();
        let err = fs.write_new(&path, "two").unwrap_err();
        assert!(err.is_already_exists());
        assert_eq!(fs.read(&path).unwrap(), "one");
    }

    #[test]
    fn move_and_list_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let fs = LocalFilesystem::new();
        let sub = dir.path().join("migrations");
        fs.make_dir(&sub).unwrap();

        let a = sub.join("one.php");
        fs.write(&a, "x").unwrap();
        let b = sub.join("two.php");
        fs.move_file(&a, &b).unwrap();

        assert!(!fs.exists(&a));
        assert_eq!(fs.list_dir(&sub).unwrap(), vec![b]);
    }
}
