//! Exported rows to records
//!
//! Object resources come from `<type>.jsonl` files, one object per row.
//! Grant resources come from the two account-usage grant views and are
//! consolidated so that each granted object yields one record.

pub mod grants;
pub mod objects;
pub mod rows;
pub mod source;

use anyhow::{Context, Result};
use std::collections::HashMap;

use crate::catalog::Catalog;
use crate::record::Record;
pub use grants::{ROLE_GRANTS, collect_grants, is_grant_type};
pub use objects::collect_objects;
pub use rows::{RoleGrantRow, UserGrantRow};
pub use source::{RowSource, parse_json_lines};

pub const GRANTS_TO_ROLES: &str = "grants_to_roles";
pub const GRANTS_TO_USERS: &str = "grants_to_users";

/// Records of one resource type, with the number of rows they came from
#[derive(Debug)]
pub struct Collected {
    pub records: Vec<Record>,
    pub raw_rows: usize,
}

pub struct Collector<'a> {
    catalog: &'a Catalog,
    source: RowSource<'a>,
    exclude: HashMap<String, Vec<String>>,
    role_rows: Vec<RoleGrantRow>,
    user_rows: Vec<UserGrantRow>,
}

impl<'a> Collector<'a> {
    /// Load both grant views up front; they are shared by every grant type
    pub fn new(
        catalog: &'a Catalog,
        source: RowSource<'a>,
        exclude: HashMap<String, Vec<String>>,
    ) -> Result<Self> {
        let role_rows = source
            .read(GRANTS_TO_ROLES)
            .context("Failed to load role grants")?;
        let user_rows = source
            .read(GRANTS_TO_USERS)
            .context("Failed to load user grants")?;

        Ok(Self {
            catalog,
            source,
            exclude,
            role_rows,
            user_rows,
        })
    }

    pub fn collect(&self, type_name: &str) -> Result<Collected> {
        let schema = self
            .catalog
            .schema(type_name)
            .with_context(|| format!("Unknown resource type '{}'", type_name))?;

        if is_grant_type(type_name) {
            let (records, raw_rows) = collect_grants(schema, &self.role_rows, &self.user_rows)?;
            return Ok(Collected { records, raw_rows });
        }

        let rows: Vec<serde_json::Value> = self.source.read(type_name)?;
        let raw_rows = rows.len();
        let excluded = self
            .exclude
            .get(type_name)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let records = collect_objects(schema, rows, excluded)?;

        Ok(Collected { records, raw_rows })
    }

    /// Row files present in the input that no catalog type reads
    pub fn unused_inputs(&self) -> Result<Vec<String>> {
        Ok(self
            .source
            .stems()?
            .into_iter()
            .filter(|stem| {
                stem != GRANTS_TO_ROLES
                    && stem != GRANTS_TO_USERS
                    && self.catalog.get(stem).is_none()
            })
            .collect())
    }
}
