use crate::collect::parse_json_lines;
use crate::config::TrackerConfig;
use crate::consolidate::{Aggregate, consolidate_by};
use crate::record::Record;
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;

/// Handles the 'consolidate' command - merges the records of one JSONL file
/// and prints them back as JSONL
pub struct ConsolidateCommand;

impl ConsolidateCommand {
    pub fn execute(
        ctx: &crate::context::Context,
        file: &str,
        resource_type: &str,
        by: &Aggregate,
        config_path: Option<&str>,
    ) -> Result<usize> {
        let (config, _) = TrackerConfig::load(&*ctx.fs, config_path.map(Path::new))?;
        let catalog = config.build_catalog(&*ctx.fs)?;
        let schema = catalog
            .schema(resource_type)
            .with_context(|| format!("Unknown resource type '{}'", resource_type))?;

        let aggregate_fields = schema.aggregate_fields();
        if schema.has_field(by.field_name()) && !aggregate_fields.contains(&by.field_name()) {
            anyhow::bail!(
                "{} cannot be consolidated by '{}', aggregate attributes are: {}",
                resource_type,
                by,
                aggregate_fields.join(", ")
            );
        }

        let path = Path::new(file);
        let content = ctx.fs.read_to_string(path)?;
        let rows: Vec<Value> =
            parse_json_lines(&content).with_context(|| format!("Failed to parse {}", file))?;

        let records = rows
            .iter()
            .enumerate()
            .map(|(idx, row)| {
                Record::from_json(schema, row)
                    .with_context(|| format!("Invalid {} record on line {}", resource_type, idx + 1))
            })
            .collect::<Result<Vec<_>>>()?;

        let merged = consolidate_by(records, by)
            .with_context(|| format!("Failed to consolidate {} by {}", resource_type, by))?;

        for record in &merged {
            ctx.output.plain(&record.to_json().to_string());
        }

        Ok(merged.len())
    }
}
