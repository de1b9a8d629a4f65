use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

use crate::traits::FileSystem;

/// Exported rows laid out as `<stem>.jsonl` files in one directory
pub struct RowSource<'a> {
    fs: &'a dyn FileSystem,
    input_dir: PathBuf,
}

impl<'a> RowSource<'a> {
    pub fn new(fs: &'a dyn FileSystem, input_dir: &Path) -> Self {
        Self {
            fs,
            input_dir: input_dir.to_path_buf(),
        }
    }

    fn path_for(&self, stem: &str) -> PathBuf {
        self.input_dir.join(format!("{}.jsonl", stem))
    }

    /// Read every row of `<stem>.jsonl`. A missing file yields no rows.
    pub fn read<T: DeserializeOwned>(&self, stem: &str) -> Result<Vec<T>> {
        let path = self.path_for(stem);

        if !self.fs.is_file(&path) {
            return Ok(Vec::new());
        }

        let content = self.fs.read_to_string(&path)?;
        parse_json_lines(&content).with_context(|| format!("Failed to read rows from {:?}", path))
    }

    /// Stems of every `.jsonl` file directly inside the input directory
    pub fn stems(&self) -> Result<Vec<String>> {
        let mut stems: Vec<String> = self
            .fs
            .walk_dir(&self.input_dir, 1)?
            .into_iter()
            .filter(|p| self.fs.is_file(p) && p.extension().is_some_and(|ext| ext == "jsonl"))
            .filter_map(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .collect();
        stems.sort();

        Ok(stems)
    }
}

/// Parse one JSON value per non-empty line
pub fn parse_json_lines<T: DeserializeOwned>(content: &str) -> Result<Vec<T>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line).with_context(|| format!("Invalid JSON on line {}", idx + 1))
        })
        .collect()
}
