//! Resource consolidation
//!
//! Raw grant queries return one row per (object, grantee) pair. Terraform
//! wants one resource per object with every grantee listed in a single
//! attribute. This module partitions a batch of records into groups that
//! agree on everything except the aggregate attribute, then folds each group
//! into one record.

pub mod error;
pub mod merge;
pub mod partition;
pub mod pipeline;

pub use error::{ConsolidationError, ConsolidationResult};
pub use merge::{fold_group, merge_field, merge_field_with};
pub use partition::partition;
pub use pipeline::{Aggregate, consolidate, consolidate_by, consolidate_by_roles, consolidate_by_users};
