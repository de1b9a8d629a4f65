use anyhow::{Context, Result};
use handlebars::{Handlebars, Helper, HelperResult, Output, RenderContext};
use serde::Serialize;
use serde_json::Value;

use crate::record::{AttrValue, Record};

const RESOURCE_TEMPLATE_NAME: &str = "resource";

const RESOURCE_TEMPLATE: &str = r#"resource "{{terraform_type}}" "{{name}}" {
{{#each attributes}}
  {{name}} = {{to_json value}}
{{/each}}
{{#each blocks}}

  {{name}} {
{{#each attributes}}
    {{name}} = {{to_json value}}
{{/each}}
  }
{{/each}}
}
"#;

#[derive(Debug, Serialize)]
struct AttributeView {
    name: String,
    value: Value,
}

#[derive(Debug, Serialize)]
struct BlockView {
    name: String,
    attributes: Vec<AttributeView>,
}

#[derive(Debug, Serialize)]
struct ResourceView<'a> {
    terraform_type: &'a str,
    name: &'a str,
    attributes: Vec<AttributeView>,
    blocks: Vec<BlockView>,
}

/// Renders records as Terraform `resource` blocks
pub struct HclRenderer {
    handlebars: Handlebars<'static>,
}

impl HclRenderer {
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();

        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.register_helper("to_json", Box::new(to_json_helper));
        handlebars
            .register_template_string(RESOURCE_TEMPLATE_NAME, RESOURCE_TEMPLATE)
            .context("Failed to register resource template")?;

        Ok(Self { handlebars })
    }

    pub fn render(&self, terraform_type: &str, name: &str, record: &Record) -> Result<String> {
        let mut attributes = Vec::new();
        let mut blocks = Vec::new();

        for (spec, value) in record.fields() {
            if value.is_null() {
                continue;
            }

            if spec.kind.is_block() {
                blocks.extend(block_views(&spec.name, value));
            } else {
                attributes.push(AttributeView {
                    name: spec.name.clone(),
                    value: value.to_json(),
                });
            }
        }

        let view = ResourceView {
            terraform_type,
            name,
            attributes,
            blocks,
        };

        self.handlebars
            .render(RESOURCE_TEMPLATE_NAME, &view)
            .with_context(|| format!("Failed to render {}.{}", terraform_type, name))
    }
}

/// One nested block per block value; a block list repeats the block
fn block_views(name: &str, value: &AttrValue) -> Vec<BlockView> {
    let view = |entries: &[(String, AttrValue)]| BlockView {
        name: name.to_string(),
        attributes: entries
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| AttributeView {
                name: k.clone(),
                value: v.to_json(),
            })
            .collect(),
    };

    match value {
        AttrValue::Block(entries) => vec![view(entries)],
        AttrValue::List(items) | AttrValue::Set(items) => items
            .iter()
            .filter_map(|item| match item {
                AttrValue::Block(entries) => Some(view(entries)),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Write the first parameter as a JSON literal
fn to_json_helper(
    h: &Helper,
    _: &Handlebars,
    _: &handlebars::Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    if let Some(param) = h.param(0) {
        out.write(&param.value().to_string())?;
    }

    Ok(())
}
