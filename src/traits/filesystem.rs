use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::sync::{Arc, RwLock};

/// Filesystem access used by the commands, mockable in tests
pub trait FileSystem: Send + Sync {
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Write string contents, creating parent directories
    fn write(&self, path: &Path, contents: &str) -> Result<()>;

    fn create_dir_all(&self, path: &Path) -> Result<()>;

    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    fn is_file(&self, path: &Path) -> bool;

    /// Every path under `path` up to `max_depth` levels, the root included
    fn walk_dir(&self, path: &Path, max_depth: usize) -> Result<Vec<PathBuf>>;
}

pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create parent directory: {:?}", parent))?;
        }

        std::fs::write(path, contents).with_context(|| format!("Failed to write file: {:?}", path))
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {:?}", path))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn walk_dir(&self, path: &Path, max_depth: usize) -> Result<Vec<PathBuf>> {
        use walkdir::WalkDir;

        let mut paths = Vec::new();
        for entry in WalkDir::new(path).max_depth(max_depth) {
            let entry = entry.with_context(|| format!("Failed to walk directory: {:?}", path))?;
            paths.push(entry.path().to_path_buf());
        }

        Ok(paths)
    }
}

/// In-memory filesystem for tests
#[cfg(test)]
pub struct MockFileSystem {
    files: Arc<RwLock<HashMap<PathBuf, String>>>,
    directories: Arc<RwLock<HashMap<PathBuf, ()>>>,
}

#[cfg(test)]
impl MockFileSystem {
    pub fn new() -> Self {
        Self {
            files: Arc::new(RwLock::new(HashMap::new())),
            directories: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn get_file_contents(&self, path: &Path) -> Option<String> {
        self.files.read().unwrap().get(path).cloned()
    }

    pub fn list_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = self.files.read().unwrap().keys().cloned().collect();
        files.sort();
        files
    }
}

#[cfg(test)]
impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.files
            .read()
            .unwrap()
            .get(path)
            .cloned()
            .with_context(|| format!("File not found in mock filesystem: {:?}", path))
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            self.create_dir_all(parent)?;
        }

        self.files
            .write()
            .unwrap()
            .insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        let mut directories = self.directories.write().unwrap();

        let mut current = Some(path);
        while let Some(dir) = current {
            directories.insert(dir.to_path_buf(), ());
            current = dir.parent();
        }

        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.is_file(path) || self.is_dir(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.directories.read().unwrap().contains_key(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.read().unwrap().contains_key(path)
    }

    fn walk_dir(&self, path: &Path, max_depth: usize) -> Result<Vec<PathBuf>> {
        let files = self.files.read().unwrap();
        let directories = self.directories.read().unwrap();

        let mut entries = Vec::new();

        if directories.contains_key(path) {
            entries.push(path.to_path_buf());
        }

        for candidate in files.keys().chain(directories.keys()) {
            if let Ok(relative) = candidate.strip_prefix(path) {
                let depth = relative.components().count();
                if depth > 0 && depth <= max_depth {
                    entries.push(candidate.clone());
                }
            }
        }

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_write_creates_parents() {
        let fs = MockFileSystem::new();

        fs.write(Path::new("/out/tf/role.tf"), "resource").unwrap();

        assert!(fs.is_dir(Path::new("/out/tf")));
        assert!(fs.is_dir(Path::new("/out")));
        assert!(fs.exists(Path::new("/out/tf/role.tf")));
        assert_eq!(
            fs.get_file_contents(Path::new("/out/tf/role.tf")).as_deref(),
            Some("resource")
        );
    }

    #[test]
    fn test_mock_walk_dir_depth() {
        let fs = MockFileSystem::new();
        fs.write(Path::new("/in/role.jsonl"), "").unwrap();
        fs.write(Path::new("/in/nested/user.jsonl"), "").unwrap();

        let mut shallow = fs.walk_dir(Path::new("/in"), 1).unwrap();
        shallow.sort();

        assert_eq!(
            shallow,
            vec![
                PathBuf::from("/in"),
                PathBuf::from("/in/nested"),
                PathBuf::from("/in/role.jsonl"),
            ]
        );
    }

    #[test]
    fn test_real_walk_dir() {
        let dir = tempfile::tempdir().unwrap();
        let fs = RealFileSystem;
        fs.write(&dir.path().join("role.jsonl"), "{}").unwrap();

        let paths = fs.walk_dir(dir.path(), 1).unwrap();

        assert!(paths.contains(&dir.path().join("role.jsonl")));
        assert_eq!(fs.read_to_string(&dir.path().join("role.jsonl")).unwrap(), "{}");
    }
}
