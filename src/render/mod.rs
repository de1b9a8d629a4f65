//! Terraform output for consolidated records
//!
//! Every record becomes a `resource` block and a `terraform import` line that
//! share one resource name.

pub mod hcl;
pub mod import;
pub mod naming;

use anyhow::Result;
use std::collections::HashSet;

use crate::catalog::ResourceDefinition;
use crate::record::Record;
pub use hcl::HclRenderer;
pub use import::{import_id, import_line};
pub use naming::{claim_name, resource_name};

/// Rendered output of one resource type
#[derive(Debug, Default)]
pub struct RenderedType {
    /// Contents of `<type>.tf`
    pub hcl: String,
    pub import_lines: Vec<String>,
}

pub struct ResourceRenderer {
    provider: String,
    hcl: HclRenderer,
}

impl ResourceRenderer {
    pub fn new(provider: &str) -> Result<Self> {
        Ok(Self {
            provider: provider.to_string(),
            hcl: HclRenderer::new()?,
        })
    }

    pub fn terraform_type(&self, type_name: &str) -> String {
        format!("{}_{}", self.provider, type_name)
    }

    pub fn render(&self, definition: &ResourceDefinition, records: &[Record]) -> Result<RenderedType> {
        let terraform_type = self.terraform_type(definition.type_name());
        let mut blocks = Vec::with_capacity(records.len());
        let mut import_lines = Vec::with_capacity(records.len());
        let mut used_names = HashSet::with_capacity(records.len());

        for record in records {
            let name = claim_name(resource_name(definition, record), &mut used_names);

            blocks.push(self.hcl.render(&terraform_type, &name, record)?);
            import_lines.push(import_line(
                &terraform_type,
                &name,
                &import_id(definition, record),
            ));
        }

        Ok(RenderedType {
            hcl: blocks.join("\n"),
            import_lines,
        })
    }
}
