//! Grant rows to grant records
//!
//! Each grant resource type reads the `grants_to_roles` rows whose
//! `GRANTED_ON` matches its object kind. Every row yields one record with a
//! single grantee role; the batch is then consolidated by roles.

use anyhow::{Context, Result};
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::sync::Arc;

use super::rows::{RoleGrantRow, UserGrantRow};
use crate::consolidate::{consolidate_by_roles, consolidate_by_users};
use crate::record::{AttrValue, Record, RecordResult, ResourceSchema};

/// Where the granted object's identity lands in the record
#[derive(Debug, Clone, Copy)]
enum GrantTarget {
    /// `NAME` is the object itself
    Account(&'static str),
    /// `TABLE_CATALOG` / `TABLE_SCHEMA` locate a schema
    Schema,
    /// A schema object: catalog and schema plus `NAME`
    SchemaObject(&'static str),
}

#[derive(Debug, Clone, Copy)]
struct GrantMapping {
    granted_on: &'static str,
    target: GrantTarget,
}

lazy_static! {
    static ref GRANT_MAPPINGS: HashMap<&'static str, GrantMapping> = {
        let mut m = HashMap::new();

        m.insert(
            "database_grant",
            GrantMapping { granted_on: "DATABASE", target: GrantTarget::Account("database_name") },
        );
        m.insert(
            "integration_grant",
            GrantMapping { granted_on: "INTEGRATION", target: GrantTarget::Account("integration_name") },
        );
        m.insert(
            "resource_monitor_grant",
            GrantMapping { granted_on: "RESOURCE MONITOR", target: GrantTarget::Account("monitor_name") },
        );
        m.insert(
            "warehouse_grant",
            GrantMapping { granted_on: "WAREHOUSE", target: GrantTarget::Account("warehouse_name") },
        );
        m.insert(
            "user_grant",
            GrantMapping { granted_on: "USER", target: GrantTarget::Account("user_name") },
        );
        m.insert(
            "schema_grant",
            GrantMapping { granted_on: "SCHEMA", target: GrantTarget::Schema },
        );
        m.insert(
            "file_format_grant",
            GrantMapping { granted_on: "FILE FORMAT", target: GrantTarget::SchemaObject("file_format_name") },
        );
        m.insert(
            "stage_grant",
            GrantMapping { granted_on: "STAGE", target: GrantTarget::SchemaObject("stage_name") },
        );
        m.insert(
            "task_grant",
            GrantMapping { granted_on: "TASK", target: GrantTarget::SchemaObject("task_name") },
        );
        m.insert(
            "table_grant",
            GrantMapping { granted_on: "TABLE", target: GrantTarget::SchemaObject("table_name") },
        );

        m
    };
}

/// Resource type built from both grant views
pub const ROLE_GRANTS: &str = "role_grants";

/// Whether the type is built from grant views rather than object rows
pub fn is_grant_type(type_name: &str) -> bool {
    type_name == ROLE_GRANTS || GRANT_MAPPINGS.contains_key(type_name)
}

/// Build and consolidate the grant records of one grant resource type
///
/// Returns the merged records and the number of raw rows used.
pub fn collect_grants(
    schema: &Arc<ResourceSchema>,
    role_rows: &[RoleGrantRow],
    user_rows: &[UserGrantRow],
) -> Result<(Vec<Record>, usize)> {
    let type_name = schema.type_name();

    if type_name == ROLE_GRANTS {
        return collect_role_grants(schema, role_rows, user_rows);
    }

    let mapping = GRANT_MAPPINGS
        .get(type_name)
        .with_context(|| format!("'{}' is not a grant resource type", type_name))?;

    let records = role_rows
        .iter()
        .filter(|row| row.is_live() && row.is_granted_to_role() && row.granted_on == mapping.granted_on)
        .map(|row| grant_record(schema, mapping, row))
        .collect::<RecordResult<Vec<_>>>()
        .with_context(|| format!("Failed to build {} records", type_name))?;
    let raw_rows = records.len();

    let merged = consolidate_by_roles(records)
        .with_context(|| format!("Failed to consolidate {} records", type_name))?;

    Ok((merged, raw_rows))
}

fn grant_record(
    schema: &Arc<ResourceSchema>,
    mapping: &GrantMapping,
    row: &RoleGrantRow,
) -> RecordResult<Record> {
    let mut builder = Record::builder(schema)
        .set("privilege", row.privilege.clone())?
        .set("roles", AttrValue::string_set([row.grantee_name.as_str()]))?
        .set("with_grant_option", row.with_grant_option())?;

    builder = match mapping.target {
        GrantTarget::Account(attribute) => builder.set(attribute, row.name.as_str())?,
        GrantTarget::Schema => builder
            .set("database_name", row.table_catalog.clone())?
            .set("schema_name", row.table_schema.clone())?,
        GrantTarget::SchemaObject(attribute) => builder
            .set("database_name", row.table_catalog.clone())?
            .set("schema_name", row.table_schema.clone())?
            .set(attribute, row.name.as_str())?,
    };

    builder.build()
}

/// Role grants come from two views: roles granted to roles, then roles
/// granted to users. Each half is consolidated on its own grantee field.
fn collect_role_grants(
    schema: &Arc<ResourceSchema>,
    role_rows: &[RoleGrantRow],
    user_rows: &[UserGrantRow],
) -> Result<(Vec<Record>, usize)> {
    let to_roles = role_rows
        .iter()
        .filter(|row| {
            row.is_live()
                && row.is_granted_to_role()
                && row.granted_on == "ROLE"
                && row.privilege.as_deref() == Some("USAGE")
        })
        .map(|row| {
            Record::builder(schema)
                .set("role_name", row.name.as_str())?
                .set("roles", AttrValue::string_set([row.grantee_name.as_str()]))?
                .set("enable_multiple_grants", true)?
                .build()
        })
        .collect::<RecordResult<Vec<_>>>()
        .context("Failed to build role grants to roles")?;

    let to_users = user_rows
        .iter()
        .filter(|row| row.is_live())
        .map(|row| {
            Record::builder(schema)
                .set("role_name", row.role.as_str())?
                .set("users", AttrValue::string_set([row.grantee_name.as_str()]))?
                .set("enable_multiple_grants", true)?
                .build()
        })
        .collect::<RecordResult<Vec<_>>>()
        .context("Failed to build role grants to users")?;

    let raw_rows = to_roles.len() + to_users.len();

    let mut merged = consolidate_by_roles(to_roles).context("Failed to consolidate role grants to roles")?;
    merged.extend(consolidate_by_users(to_users).context("Failed to consolidate role grants to users")?);

    Ok((merged, raw_rows))
}
