use crate::catalog::{CatalogEntry, parse_resources_jsonl};
use crate::collect::{ROLE_GRANTS, is_grant_type};
use crate::config::TrackerConfig;
use anyhow::{Context, Result};
use std::path::Path;

/// Handles the 'schema' commands - inspect the resource catalog and build
/// catalog entries from provider documentation
pub struct SchemaCommand;

impl SchemaCommand {
    /// List every resource type with its import id attributes
    pub fn list(ctx: &crate::context::Context, config_path: Option<&str>) -> Result<()> {
        let (config, _) = TrackerConfig::load(&*ctx.fs, config_path.map(Path::new))?;
        let catalog = config.build_catalog(&*ctx.fs)?;

        ctx.output.section("Resource Types");

        for definition in catalog.definitions() {
            let mut details = format!("id: {}", definition.id_attributes.join("|"));
            if definition.type_name() == ROLE_GRANTS {
                details.push_str(", consolidated by roles and users");
            } else if is_grant_type(definition.type_name()) {
                details.push_str(", consolidated by roles");
            }
            if definition.anonymous {
                details.push_str(", generated names");
            }
            if !definition.imported {
                details.push_str(", not imported");
            }

            ctx.output.key_value(definition.type_name(), &details);
        }

        ctx.output.blank();
        ctx.output.info(&format!(
            "{} resource types, {} imported by default",
            catalog.definitions().len(),
            catalog.imported_types().len()
        ));

        Ok(())
    }

    /// Turn a provider documentation export into catalog YAML
    ///
    /// Writes to `output_file` when given, otherwise prints the YAML.
    pub fn generate(
        ctx: &crate::context::Context,
        docs_file: &str,
        output_file: Option<&str>,
    ) -> Result<usize> {
        let content = ctx.fs.read_to_string(Path::new(docs_file))?;
        let docs = parse_resources_jsonl(&content)
            .with_context(|| format!("Failed to parse documentation export {}", docs_file))?;

        let entries = docs
            .iter()
            .map(|doc| {
                CatalogEntry::from_doc(doc)
                    .with_context(|| format!("Failed to build catalog entry for '{}'", doc.name))
            })
            .collect::<Result<Vec<_>>>()?;

        let yaml = serde_yaml::to_string(&entries).context("Failed to serialize catalog entries")?;

        match output_file {
            Some(path) => {
                ctx.fs.write(Path::new(path), &yaml)?;
                ctx.output.success(&format!(
                    "Wrote {} catalog entries to {}",
                    entries.len(),
                    path
                ));
            }
            None => {
                for line in yaml.lines() {
                    ctx.output.plain(line);
                }
            }
        }

        Ok(entries.len())
    }
}
