use crate::catalog::Catalog;
use crate::collect::{Collector, RowSource};
use crate::config::TrackerConfig;
use crate::render::{RenderedType, ResourceRenderer};
use anyhow::{Context, Result};
use std::path::Path;

/// Handles the 'render' command - turns exported rows into Terraform files
pub struct RenderCommand;

/// What a render run produced
#[derive(Debug, Default, PartialEq)]
pub struct RenderSummary {
    pub resource_types: usize,
    pub resources: usize,
}

impl RenderCommand {
    pub fn execute(
        ctx: &crate::context::Context,
        input_dir: &str,
        output_dir: &str,
        config_path: Option<&str>,
        verbose: bool,
    ) -> Result<RenderSummary> {
        ctx.output.section("Render Terraform Resources");

        let (config, config_source) = TrackerConfig::load(&*ctx.fs, config_path.map(Path::new))?;
        match &config_source {
            Some(path) => ctx.output.key_value("Config", &path.display().to_string()),
            None => ctx.output.dimmed("Using default configuration"),
        }

        let catalog = config.build_catalog(&*ctx.fs)?;
        let types = config.selected_types(&catalog)?;

        let input_dir = Path::new(input_dir);
        let output_dir = Path::new(output_dir);
        if !ctx.fs.is_dir(input_dir) {
            anyhow::bail!("Input directory not found: {}", input_dir.display());
        }

        ctx.output.key_value("Input", &input_dir.display().to_string());
        ctx.output.key_value("Output", &output_dir.display().to_string());

        let collector = Collector::new(
            &catalog,
            RowSource::new(&*ctx.fs, input_dir),
            config.exclude.clone(),
        )?;

        for unused in collector.unused_inputs()? {
            ctx.output
                .warning(&format!("No resource type reads {}.jsonl, skipping it", unused));
        }

        ctx.fs.create_dir_all(output_dir)?;

        let renderer = ResourceRenderer::new(&config.provider)?;
        let mut summary = RenderSummary::default();
        let mut import_lines = Vec::new();
        let mut failed = 0;

        for type_name in &types {
            match Self::render_type(&collector, &renderer, &catalog, type_name) {
                Ok(None) => {
                    if verbose {
                        ctx.output.dimmed(&format!("  {}: no rows", type_name));
                    }
                }
                Ok(Some((raw_rows, rendered, resources))) => {
                    let tf_path = output_dir.join(format!("{}.tf", type_name));
                    ctx.fs.write(&tf_path, &rendered.hcl)?;
                    import_lines.extend(rendered.import_lines);

                    if verbose {
                        ctx.output.dimmed(&format!(
                            "  {}: {} rows -> {} resources",
                            type_name, raw_rows, resources
                        ));
                    }

                    summary.resource_types += 1;
                    summary.resources += resources;
                }
                Err(e) => {
                    ctx.output.error(&format!("{}: {:#}", type_name, e));
                    failed += 1;
                }
            }
        }

        if failed > 0 {
            anyhow::bail!(
                "{} resource type(s) failed to render, no import script written",
                failed
            );
        }

        let script_path = output_dir.join(&config.import_script);
        ctx.fs.write(&script_path, &import_script(&import_lines))?;

        ctx.output.blank();
        ctx.output.success(&format!(
            "Rendered {} resources of {} types",
            summary.resources, summary.resource_types
        ));
        ctx.output
            .key_value("Import script", &script_path.display().to_string());

        Ok(summary)
    }

    /// Collect and render one type. `None` when it has no rows.
    fn render_type(
        collector: &Collector,
        renderer: &ResourceRenderer,
        catalog: &Catalog,
        type_name: &str,
    ) -> Result<Option<(usize, RenderedType, usize)>> {
        let collected = collector
            .collect(type_name)
            .with_context(|| format!("Failed to collect {} resources", type_name))?;

        if collected.records.is_empty() {
            return Ok(None);
        }

        let definition = Self::definition(catalog, type_name)?;
        let rendered = renderer.render(definition, &collected.records)?;

        Ok(Some((collected.raw_rows, rendered, collected.records.len())))
    }

    fn definition<'a>(
        catalog: &'a Catalog,
        type_name: &str,
    ) -> Result<&'a crate::catalog::ResourceDefinition> {
        catalog
            .get(type_name)
            .with_context(|| format!("Unknown resource type '{}'", type_name))
    }
}

fn import_script(lines: &[String]) -> String {
    let mut script = String::from("#!/bin/sh\nset -e\n\n");

    for line in lines {
        script.push_str(line);
        script.push('\n');
    }

    script
}
