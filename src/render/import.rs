use crate::catalog::ResourceDefinition;
use crate::record::{AttrValue, Record};

/// `terraform import` command for one rendered resource
pub fn import_line(terraform_type: &str, resource_name: &str, import_id: &str) -> String {
    format!(
        "terraform import '{}.{}' '{}'",
        terraform_type, resource_name, import_id
    )
}

/// Pipe-separated import id built from the definition's id attributes
pub fn import_id(definition: &ResourceDefinition, record: &Record) -> String {
    definition
        .id_attributes
        .iter()
        .map(|attribute| id_part(record.get(attribute).unwrap_or(&AttrValue::Null)))
        .collect::<Vec<_>>()
        .join("|")
}

fn id_part(value: &AttrValue) -> String {
    match value {
        AttrValue::Null => "false".to_string(),
        AttrValue::String(s) => s.clone(),
        AttrValue::List(items) | AttrValue::Set(items) => {
            items.iter().map(id_part).collect::<Vec<_>>().join(",")
        }
        other => other.to_json().to_string(),
    }
}
