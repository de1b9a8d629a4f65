use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::catalog::{Catalog, parse_resources_jsonl};
use crate::traits::FileSystem;

pub const LOCAL_CONFIG_FILE: &str = "rtrack.yaml";

/// Settings read from `rtrack.yaml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Terraform provider prefix for resource types
    pub provider: String,

    /// Types to render; every imported catalog type when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_types: Option<Vec<String>>,

    /// Object names skipped per resource type
    pub exclude: HashMap<String, Vec<String>>,

    /// Import id attribute overrides per resource type
    pub id_attributes: HashMap<String, Vec<String>>,

    /// Provider documentation export merged into the built-in catalog
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_file: Option<PathBuf>,

    /// File name of the generated import script
    pub import_script: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            provider: "snowflake".to_string(),
            resource_types: None,
            exclude: HashMap::from([("file_format".to_string(), vec!["MYPARQUET".to_string()])]),
            id_attributes: HashMap::new(),
            schema_file: None,
            import_script: "import.sh".to_string(),
        }
    }
}

impl TrackerConfig {
    pub fn from_file(fs: &dyn FileSystem, path: &Path) -> Result<Self> {
        let content = fs
            .read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Load the first config found, returning where it came from
    ///
    /// An explicit path must exist. Otherwise `./rtrack.yaml`, then the user
    /// config directory, then built-in defaults.
    pub fn load(fs: &dyn FileSystem, explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            if !fs.is_file(path) {
                anyhow::bail!("Config file not found: {:?}", path);
            }
            return Ok((Self::from_file(fs, path)?, Some(path.to_path_buf())));
        }

        for path in Self::search_paths() {
            if fs.is_file(&path) {
                return Ok((Self::from_file(fs, &path)?, Some(path)));
            }
        }

        Ok((Self::default(), None))
    }

    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("rtrack").join("config.yaml"));
        }

        paths
    }

    /// Built-in catalog with the configured documentation and id overrides applied
    pub fn build_catalog(&self, fs: &dyn FileSystem) -> Result<Catalog> {
        let mut catalog = Catalog::builtin()?;

        if let Some(schema_file) = &self.schema_file {
            let content = fs
                .read_to_string(schema_file)
                .with_context(|| format!("Failed to read schema file: {:?}", schema_file))?;
            let docs = parse_resources_jsonl(&content)
                .with_context(|| format!("Failed to parse schema file: {:?}", schema_file))?;
            catalog.merge_docs(&docs)?;
        }

        for (type_name, attributes) in &self.id_attributes {
            catalog
                .set_id_attributes(type_name, attributes.clone())
                .with_context(|| format!("Invalid id_attributes for '{}'", type_name))?;
        }

        Ok(catalog)
    }

    /// Resource types to render, in order
    pub fn selected_types(&self, catalog: &Catalog) -> Result<Vec<String>> {
        match &self.resource_types {
            Some(types) => {
                for type_name in types {
                    if catalog.get(type_name).is_none() {
                        anyhow::bail!("Unknown resource type '{}' in resource_types", type_name);
                    }
                }
                Ok(types.clone())
            }
            None => Ok(catalog
                .imported_types()
                .into_iter()
                .map(str::to_string)
                .collect()),
        }
    }
}
