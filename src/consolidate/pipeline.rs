use std::fmt;
use std::str::FromStr;

use crate::record::Record;

use super::error::ConsolidationResult;
use super::merge::{fold_group, resolve_strategy};
use super::partition::partition;

/// The multi-valued attribute that varies across raw rows of one object
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Aggregate {
    /// Grantee roles, from `grants_to_roles`
    Roles,
    /// Grantee users, from `grants_to_users`
    Users,
    /// Grantee shares
    Shares,
    /// Any other set- or list-kinded attribute
    Field(String),
}

impl Aggregate {
    pub fn field_name(&self) -> &str {
        match self {
            Aggregate::Roles => "roles",
            Aggregate::Users => "users",
            Aggregate::Shares => "shares",
            Aggregate::Field(name) => name,
        }
    }
}

impl FromStr for Aggregate {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "roles" => Aggregate::Roles,
            "users" => Aggregate::Users,
            "shares" => Aggregate::Shares,
            other => Aggregate::Field(other.to_string()),
        })
    }
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.field_name())
    }
}

/// Collapse records into one per distinct signature, merging `aggregate_field`
///
/// Output order is the order in which each signature first appears. The
/// aggregate field is checked up front, so a field without a merge operator
/// fails whether or not any two records share a signature.
pub fn consolidate(records: Vec<Record>, aggregate_field: &str) -> ConsolidationResult<Vec<Record>> {
    if let Some(first) = records.first() {
        resolve_strategy(first, aggregate_field)?;
    }

    partition(records, aggregate_field)?
        .into_iter()
        .map(|group| fold_group(group, aggregate_field))
        .collect()
}

pub fn consolidate_by(records: Vec<Record>, aggregate: &Aggregate) -> ConsolidationResult<Vec<Record>> {
    consolidate(records, aggregate.field_name())
}

/// Consolidate rows that differ only in grantee roles
pub fn consolidate_by_roles(records: Vec<Record>) -> ConsolidationResult<Vec<Record>> {
    consolidate_by(records, &Aggregate::Roles)
}

/// Consolidate rows that differ only in grantee users
pub fn consolidate_by_users(records: Vec<Record>) -> ConsolidationResult<Vec<Record>> {
    consolidate_by(records, &Aggregate::Users)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consolidate::ConsolidationError;
    use crate::record::AttrValue;
    use crate::test_helpers::{grant, role_grants};

    #[test]
    fn test_consolidate_grants_by_roles() {
        let records = vec![
            grant("A", "USAGE", &["X"]),
            grant("A", "USAGE", &["Y"]),
            grant("B", "USAGE", &["Z"]),
        ];

        let merged = consolidate_by_roles(records).unwrap();

        assert_eq!(
            merged,
            vec![grant("A", "USAGE", &["X", "Y"]), grant("B", "USAGE", &["Z"])]
        );
    }

    #[test]
    fn test_consolidate_empty() {
        assert!(consolidate_by_roles(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn test_consolidate_is_idempotent() {
        let distinct = vec![
            grant("A", "USAGE", &["X", "Y"]),
            grant("A", "OWNERSHIP", &["X"]),
            grant("B", "USAGE", &["Z"]),
        ];

        let once = consolidate_by_roles(distinct.clone()).unwrap();
        let twice = consolidate_by_roles(once.clone()).unwrap();

        assert_eq!(once, distinct);
        assert_eq!(twice, once);
    }

    #[test]
    fn test_consolidate_preserves_first_appearance_order() {
        let records = vec![
            grant("B", "USAGE", &["1"]),
            grant("A", "USAGE", &["2"]),
            grant("B", "USAGE", &["3"]),
        ];

        let merged = consolidate_by_roles(records).unwrap();

        assert_eq!(
            merged,
            vec![grant("B", "USAGE", &["1", "3"]), grant("A", "USAGE", &["2"])]
        );
    }

    #[test]
    fn test_merged_aggregate_collects_every_member() {
        let records = vec![
            grant("A", "USAGE", &["X"]),
            grant("A", "USAGE", &["Y"]),
            grant("A", "USAGE", &["X"]),
            grant("A", "USAGE", &["W"]),
        ];

        let merged = consolidate_by_roles(records).unwrap();

        assert_eq!(merged.len(), 1);
        assert_eq!(
            merged[0].get("roles"),
            Some(&AttrValue::string_set(["X", "Y", "W"]))
        );
        assert_eq!(
            merged[0].get("database_name"),
            Some(&AttrValue::string("A"))
        );
    }

    #[test]
    fn test_consolidate_by_users() {
        let records = vec![
            role_grants("ANALYST", &[], &["alice"]),
            role_grants("LOADER", &[], &["carol"]),
            role_grants("ANALYST", &[], &["bob"]),
        ];

        let merged = consolidate_by_users(records).unwrap();

        assert_eq!(
            merged,
            vec![
                role_grants("ANALYST", &[], &["alice", "bob"]),
                role_grants("LOADER", &[], &["carol"]),
            ]
        );
    }

    #[test]
    fn test_wrong_entry_point_leaves_rows_apart() {
        // Rows that differ in roles are distinct signatures when merged on users
        let records = vec![
            role_grants("ANALYST", &["SYSADMIN"], &[]),
            role_grants("ANALYST", &["SECURITYADMIN"], &[]),
        ];

        let merged = consolidate_by_users(records).unwrap();

        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_consolidate_on_scalar_field_fails() {
        let records = vec![grant("A", "USAGE", &["X"]), grant("A", "USAGE", &["X"])];

        let err = consolidate(records, "privilege").unwrap_err();

        assert!(matches!(err, ConsolidationError::NotAggregatable { .. }));
    }

    #[test]
    fn test_consolidate_on_scalar_field_fails_without_duplicates() {
        let records = vec![grant("A", "USAGE", &["X"]), grant("B", "USAGE", &["X"])];

        let err = consolidate(records, "privilege").unwrap_err();

        assert!(matches!(
            err,
            ConsolidationError::NotAggregatable { ref field, .. } if field == "privilege"
        ));
    }

    #[test]
    fn test_aggregate_from_str() {
        assert_eq!("roles".parse::<Aggregate>().unwrap(), Aggregate::Roles);
        assert_eq!(
            "notify_users".parse::<Aggregate>().unwrap(),
            Aggregate::Field("notify_users".to_string())
        );
        assert_eq!(Aggregate::Users.to_string(), "users");
    }
}
