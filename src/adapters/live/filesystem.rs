//! Live filesystem adapter using `std::fs`.

use std::path::Path;

use crate::ports::filesystem::FileSystem;
use crate::ports::PortError;

/// Live filesystem adapter backed by real disk I/O.
pub struct LiveFileSystem;

impl FileSystem for LiveFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String, PortError> {
        Ok(std::fs::read_to_string(path)?)
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), PortError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Ok(std::fs::write(path, contents)?)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<String>, PortError> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            if let Some(name) = entry.file_name().to_str() {
                entries.push(name.to_string());
            }
        }
        entries.sort();
        Ok(entries)
    }

    fn copy_into(&self, file: &Path, dest_dir: &Path) -> Result<(), PortError> {
        let name = file.file_name().ok_or_else(|| PortError::Io {
            message: format!("{} has no file name", file.display()),
        })?;
        std::fs::create_dir_all(dest_dir)?;
        std::fs::copy(file, dest_dir.join(name))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_creates_parents_and_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b.txt");

        LiveFileSystem.write(&path, "hello").unwrap();
        assert!(LiveFileSystem.exists(&path));
        assert_eq!(LiveFileSystem.read_to_string(&path).unwrap(), "hello");
    }

    #[test]
    fn list_dir_is_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["c.spec", "a.spec", "b.spec"] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }
        assert_eq!(LiveFileSystem.list_dir(dir.path()).unwrap(), vec!["a.spec", "b.spec", "c.spec"]);
    }

    #[test]
    fn copy_into_keeps_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("pkg-1.0.tar.gz");
        std::fs::write(&src, "tarball").unwrap();
        let dest = dir.path().join("repo");

        LiveFileSystem.copy_into(&src, &dest).unwrap();
        assert_eq!(std::fs::read_to_string(dest.join("pkg-1.0.tar.gz")).unwrap(), "tarball");
    }

    #[test]
    fn reading_missing_file_is_io_error() {
        let err = LiveFileSystem.read_to_string(Path::new("/nonexistent/file")).unwrap_err();
        assert!(matches!(err, PortError::Io { .. }));
    }
}
