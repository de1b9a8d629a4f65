//! Provider documentation export
//!
//! The documentation collector writes one JSON object per resource type to
//! `resources.jsonl`, listing every attribute with its documented type and
//! whether it is required, optional or read-only.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::record::{FieldKind, FieldSpec, ResourceSchema};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocAttribute {
    pub name: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub sensitive: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub optional: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub read_only: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub deprecated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<u64>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl DocAttribute {
    /// Field spec for a writable attribute; `None` for read-only ones
    pub fn to_field_spec(&self) -> Result<Option<FieldSpec>> {
        let kind = FieldKind::from_doc_type(&self.doc_type)
            .with_context(|| format!("Unknown type '{}' for attribute '{}'", self.doc_type, self.name))?;

        Ok(if self.required {
            Some(FieldSpec::required(&self.name, kind))
        } else if self.optional {
            Some(FieldSpec::optional(&self.name, kind))
        } else {
            None
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocResource {
    pub name: String,
    pub attributes: Vec<DocAttribute>,
}

impl DocResource {
    pub fn to_schema(&self) -> Result<ResourceSchema> {
        let mut fields = Vec::new();

        for attribute in &self.attributes {
            let spec = attribute
                .to_field_spec()
                .with_context(|| format!("Invalid attribute in resource '{}'", self.name))?;

            if let Some(spec) = spec {
                fields.push(spec);
            }
        }

        Ok(ResourceSchema::new(&self.name, fields))
    }
}

/// Parse a `resources.jsonl` export, one resource per non-empty line
pub fn parse_resources_jsonl(content: &str) -> Result<Vec<DocResource>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str::<DocResource>(line)
                .with_context(|| format!("Failed to parse resource documentation on line {}", idx + 1))
        })
        .collect()
}
