//! Test helpers for building schemas, records and exported rows
//!
//! The schemas here are written out by hand so that engine tests do not
//! depend on the embedded catalog.

#![cfg(test)]

use crate::record::{AttrValue, FieldKind, FieldSpec, Record, ResourceSchema};
use crate::traits::{FileSystem, MockFileSystem};
use std::path::Path;
use std::sync::Arc;

pub fn grant_schema() -> Arc<ResourceSchema> {
    Arc::new(ResourceSchema::new(
        "database_grant",
        vec![
            FieldSpec::required("database_name", FieldKind::String),
            FieldSpec::optional("enable_multiple_grants", FieldKind::Boolean),
            FieldSpec::optional("privilege", FieldKind::String),
            FieldSpec::optional("revert_ownership_to_role_name", FieldKind::String),
            FieldSpec::optional("roles", FieldKind::StringSet),
            FieldSpec::optional("shares", FieldKind::StringSet),
            FieldSpec::optional("with_grant_option", FieldKind::Boolean),
        ],
    ))
}

pub fn warehouse_grant_schema() -> Arc<ResourceSchema> {
    Arc::new(ResourceSchema::new(
        "warehouse_grant",
        vec![
            FieldSpec::required("warehouse_name", FieldKind::String),
            FieldSpec::optional("privilege", FieldKind::String),
            FieldSpec::optional("roles", FieldKind::StringSet),
            FieldSpec::optional("with_grant_option", FieldKind::Boolean),
        ],
    ))
}

pub fn role_schema() -> Arc<ResourceSchema> {
    Arc::new(ResourceSchema::new(
        "role",
        vec![
            FieldSpec::required("name", FieldKind::String),
            FieldSpec::optional("comment", FieldKind::String),
        ],
    ))
}

pub fn role_grants_schema() -> Arc<ResourceSchema> {
    Arc::new(ResourceSchema::new(
        "role_grants",
        vec![
            FieldSpec::required("role_name", FieldKind::String),
            FieldSpec::optional("enable_multiple_grants", FieldKind::Boolean),
            FieldSpec::optional("roles", FieldKind::StringSet),
            FieldSpec::optional("users", FieldKind::StringSet),
        ],
    ))
}

fn names(items: &[&str]) -> AttrValue {
    if items.is_empty() {
        AttrValue::Null
    } else {
        AttrValue::string_set(items.iter().copied())
    }
}

/// A `database_grant` row for `database` with the given grantee roles
pub fn grant(database: &str, privilege: &str, roles: &[&str]) -> Record {
    Record::builder(&grant_schema())
        .set("database_name", database)
        .unwrap()
        .set("privilege", privilege)
        .unwrap()
        .set("roles", names(roles))
        .unwrap()
        .set("with_grant_option", false)
        .unwrap()
        .build()
        .unwrap()
}

pub fn warehouse_grant(warehouse: &str, roles: &[&str]) -> Record {
    Record::builder(&warehouse_grant_schema())
        .set("warehouse_name", warehouse)
        .unwrap()
        .set("privilege", "USAGE")
        .unwrap()
        .set("roles", names(roles))
        .unwrap()
        .build()
        .unwrap()
}

pub fn role(name: &str) -> Record {
    Record::builder(&role_schema())
        .set("name", name)
        .unwrap()
        .build()
        .unwrap()
}

pub fn role_grants(role_name: &str, roles: &[&str], users: &[&str]) -> Record {
    Record::builder(&role_grants_schema())
        .set("role_name", role_name)
        .unwrap()
        .set("enable_multiple_grants", true)
        .unwrap()
        .set("roles", names(roles))
        .unwrap()
        .set("users", names(users))
        .unwrap()
        .build()
        .unwrap()
}

/// Write JSON lines to an exported-rows file in the mock filesystem
pub fn write_rows(fs: &MockFileSystem, path: &Path, rows: &[serde_json::Value]) {
    let content = rows
        .iter()
        .map(|row| row.to_string())
        .collect::<Vec<_>>()
        .join("\n");

    fs.write(path, &content).unwrap();
}

/// A `grants_to_roles` view row
pub fn grant_row(
    granted_on: &str,
    name: &str,
    privilege: &str,
    grantee: &str,
) -> serde_json::Value {
    serde_json::json!({
        "GRANTED_ON": granted_on,
        "GRANTED_TO": "ROLE",
        "NAME": name,
        "PRIVILEGE": privilege,
        "GRANTEE_NAME": grantee,
        "GRANT_OPTION": "False",
        "TABLE_CATALOG": null,
        "TABLE_SCHEMA": null,
        "DELETED_ON": null,
    })
}
