//! Catalog of importable resource types
//!
//! Each definition pairs a resource schema with the attributes that make up
//! its Terraform import id and with naming rules for rendered blocks.

pub mod docs;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::record::ResourceSchema;
pub use docs::{DocAttribute, DocResource, parse_resources_jsonl};

const BUILTIN_CATALOG: &str = include_str!("snowflake.yaml");

/// One catalog entry as written in YAML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    /// Render under a generated name even when the resource has a `name` attribute
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub anonymous: bool,
    /// Part of the default import run
    #[serde(default = "default_imported")]
    pub imported: bool,
    #[serde(default)]
    pub id_attributes: Vec<String>,
    pub attributes: Vec<DocAttribute>,
}

fn default_imported() -> bool {
    true
}

impl CatalogEntry {
    /// Entry for a documented resource, guessing its import id attributes
    pub fn from_doc(doc: &DocResource) -> Result<Self> {
        let schema = doc.to_schema()?;
        let id_attributes = default_id_attributes(&schema);
        let attributes = doc
            .attributes
            .iter()
            .filter(|a| a.required || a.optional)
            .cloned()
            .collect();

        Ok(Self {
            name: doc.name.clone(),
            anonymous: false,
            imported: false,
            id_attributes,
            attributes,
        })
    }
}

/// `name` when the schema has one, otherwise every required attribute
fn default_id_attributes(schema: &ResourceSchema) -> Vec<String> {
    if schema.has_field("name") {
        return vec!["name".to_string()];
    }

    schema
        .fields()
        .iter()
        .filter(|f| f.is_required())
        .map(|f| f.name.clone())
        .collect()
}

#[derive(Debug, Clone)]
pub struct ResourceDefinition {
    pub schema: Arc<ResourceSchema>,
    pub id_attributes: Vec<String>,
    pub anonymous: bool,
    pub imported: bool,
}

impl ResourceDefinition {
    pub fn type_name(&self) -> &str {
        self.schema.type_name()
    }

    fn validate_id_attributes(&self, id_attributes: &[String]) -> Result<()> {
        for attribute in id_attributes {
            if !self.schema.has_field(attribute) {
                anyhow::bail!(
                    "Import id attribute '{}' is not an attribute of '{}'",
                    attribute,
                    self.type_name()
                );
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    definitions: Vec<ResourceDefinition>,
}

impl Catalog {
    /// The embedded Snowflake catalog
    pub fn builtin() -> Result<Self> {
        Self::from_yaml(BUILTIN_CATALOG).context("Failed to load built-in resource catalog")
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let entries: Vec<CatalogEntry> =
            serde_yaml::from_str(content).context("Failed to parse resource catalog")?;

        Self::from_entries(entries)
    }

    pub fn from_entries(entries: Vec<CatalogEntry>) -> Result<Self> {
        let mut catalog = Catalog::default();

        for entry in entries {
            let doc = DocResource {
                name: entry.name.clone(),
                attributes: entry.attributes,
            };
            let schema = doc
                .to_schema()
                .with_context(|| format!("Invalid catalog entry '{}'", entry.name))?;
            let definition = ResourceDefinition {
                schema: Arc::new(schema),
                id_attributes: Vec::new(),
                anonymous: entry.anonymous,
                imported: entry.imported,
            };
            definition.validate_id_attributes(&entry.id_attributes)?;

            if catalog.get(&entry.name).is_some() {
                anyhow::bail!("Duplicate catalog entry '{}'", entry.name);
            }

            catalog.definitions.push(ResourceDefinition {
                id_attributes: entry.id_attributes,
                ..definition
            });
        }

        Ok(catalog)
    }

    pub fn get(&self, type_name: &str) -> Option<&ResourceDefinition> {
        self.definitions.iter().find(|d| d.type_name() == type_name)
    }

    pub fn schema(&self, type_name: &str) -> Option<&Arc<ResourceSchema>> {
        self.get(type_name).map(|d| &d.schema)
    }

    pub fn definitions(&self) -> &[ResourceDefinition] {
        &self.definitions
    }

    /// Types imported by default, in catalog order
    pub fn imported_types(&self) -> Vec<&str> {
        self.definitions
            .iter()
            .filter(|d| d.imported)
            .map(|d| d.type_name())
            .collect()
    }

    /// Replace or add schemas from a documentation export
    ///
    /// Known types keep their import id attributes, which must still exist in
    /// the new schema. New types are not imported by default. Returns the
    /// number of types added.
    pub fn merge_docs(&mut self, docs: &[DocResource]) -> Result<usize> {
        let mut added = 0;

        for doc in docs {
            let schema = Arc::new(doc.to_schema()?);

            match self.definitions.iter_mut().find(|d| d.type_name() == doc.name) {
                Some(existing) => {
                    let replaced = ResourceDefinition {
                        schema,
                        ..existing.clone()
                    };
                    replaced
                        .validate_id_attributes(&existing.id_attributes)
                        .with_context(|| format!("Documentation for '{}' drops an id attribute", doc.name))?;
                    *existing = replaced;
                }
                None => {
                    let id_attributes = default_id_attributes(&schema);
                    self.definitions.push(ResourceDefinition {
                        schema,
                        id_attributes,
                        anonymous: false,
                        imported: false,
                    });
                    added += 1;
                }
            }
        }

        Ok(added)
    }

    pub fn set_id_attributes(&mut self, type_name: &str, id_attributes: Vec<String>) -> Result<()> {
        let definition = self
            .definitions
            .iter_mut()
            .find(|d| d.type_name() == type_name)
            .with_context(|| format!("Unknown resource type '{}'", type_name))?;

        definition.validate_id_attributes(&id_attributes)?;
        definition.id_attributes = id_attributes;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldKind;

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = Catalog::builtin().unwrap();

        assert_eq!(catalog.imported_types().len(), 21);
        assert_eq!(catalog.imported_types()[0], "database");
        assert!(!catalog.get("table_grant").unwrap().imported);
    }

    #[test]
    fn test_builtin_id_attributes_exist() {
        let catalog = Catalog::builtin().unwrap();

        for definition in catalog.definitions() {
            assert!(
                !definition.id_attributes.is_empty(),
                "{} has no id attributes",
                definition.type_name()
            );
            for attribute in &definition.id_attributes {
                assert!(definition.schema.has_field(attribute));
            }
        }
    }

    #[test]
    fn test_grant_types_aggregate_on_roles() {
        let catalog = Catalog::builtin().unwrap();

        for type_name in ["database_grant", "schema_grant", "warehouse_grant", "role_grants"] {
            let schema = catalog.schema(type_name).unwrap();
            assert_eq!(schema.field("roles").unwrap().kind, FieldKind::StringSet);
        }

        let role_grants = catalog.schema("role_grants").unwrap();
        assert_eq!(role_grants.field("users").unwrap().kind, FieldKind::StringSet);
    }

    #[test]
    fn test_anonymous_types() {
        let catalog = Catalog::builtin().unwrap();
        let anonymous: Vec<_> = catalog
            .definitions()
            .iter()
            .filter(|d| d.anonymous)
            .map(|d| d.type_name())
            .collect();

        assert_eq!(anonymous, vec!["file_format", "schema", "stage"]);
    }

    #[test]
    fn test_rejects_unknown_id_attribute() {
        let yaml = r#"
- name: role
  id_attributes: [name, owner]
  attributes:
    - { name: name, type: String, required: true }
"#;

        let err = Catalog::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("owner"));
    }

    #[test]
    fn test_rejects_duplicate_entries() {
        let yaml = r#"
- name: role
  id_attributes: [name]
  attributes: [{ name: name, type: String, required: true }]
- name: role
  id_attributes: [name]
  attributes: [{ name: name, type: String, required: true }]
"#;

        assert!(Catalog::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_merge_docs_adds_new_types() {
        let mut catalog = Catalog::builtin().unwrap();
        let docs = parse_resources_jsonl(
            r#"{"name": "sequence", "attributes": [{"name": "database", "type": "String", "required": true}, {"name": "name", "type": "String", "required": true}]}"#,
        )
        .unwrap();

        let added = catalog.merge_docs(&docs).unwrap();

        assert_eq!(added, 1);
        let sequence = catalog.get("sequence").unwrap();
        assert_eq!(sequence.id_attributes, vec!["name".to_string()]);
        assert!(!sequence.imported);
    }

    #[test]
    fn test_merge_docs_keeps_id_attributes_of_known_types() {
        let mut catalog = Catalog::builtin().unwrap();
        let docs = parse_resources_jsonl(
            r#"{"name": "role", "attributes": [{"name": "name", "type": "String", "required": true}, {"name": "comment", "type": "String", "optional": true}]}"#,
        )
        .unwrap();

        assert_eq!(catalog.merge_docs(&docs).unwrap(), 0);
        let role = catalog.get("role").unwrap();
        assert_eq!(role.id_attributes, vec!["name".to_string()]);
        assert!(!role.schema.has_field("tag"));
    }

    #[test]
    fn test_set_id_attributes() {
        let mut catalog = Catalog::builtin().unwrap();

        catalog
            .set_id_attributes("warehouse_grant", vec!["warehouse_name".to_string()])
            .unwrap();
        assert_eq!(
            catalog.get("warehouse_grant").unwrap().id_attributes,
            vec!["warehouse_name".to_string()]
        );

        assert!(catalog.set_id_attributes("warehouse_grant", vec!["nope".to_string()]).is_err());
        assert!(catalog.set_id_attributes("nope", Vec::new()).is_err());
    }

    #[test]
    fn test_entry_from_doc() {
        let docs = parse_resources_jsonl(
            r#"{"name": "tag_association", "attributes": [{"name": "object_type", "type": "String", "required": true}, {"name": "tag_id", "type": "String", "required": true}, {"name": "id", "type": "String", "read_only": true}]}"#,
        )
        .unwrap();

        let entry = CatalogEntry::from_doc(&docs[0]).unwrap();

        assert_eq!(
            entry.id_attributes,
            vec!["object_type".to_string(), "tag_id".to_string()]
        );
        assert_eq!(entry.attributes.len(), 2);
    }
}
