use crate::record::{AttrValue, Record};

use super::error::{ConsolidationError, ConsolidationResult};

/// Merge `field` of two records using the merge operator of the field's kind
///
/// Set-kinded fields are unioned and sequence-kinded fields concatenated.
/// Both records must share a schema and agree on every other field.
pub fn merge_field(r0: &Record, r1: &Record, field: &str) -> ConsolidationResult<Record> {
    let (idx, strategy) = resolve_strategy(r0, field)?;

    merge_at(r0, r1, field, idx, |a, b| strategy.apply(a, b))
}

/// Merge `field` of two records with a caller-supplied operator
pub fn merge_field_with<F>(
    r0: &Record,
    r1: &Record,
    field: &str,
    op: F,
) -> ConsolidationResult<Record>
where
    F: Fn(&AttrValue, &AttrValue) -> AttrValue,
{
    let idx = r0
        .schema()
        .index_of(field)
        .ok_or_else(|| ConsolidationError::UnknownField {
            resource_type: r0.type_name().to_string(),
            field: field.to_string(),
        })?;

    merge_at(r0, r1, field, idx, |a, b| Some(op(a, b)))
}

/// Left-fold a group into one record, starting from its first member
///
/// The aggregate field must have a merge operator even when the group has a
/// single member.
pub fn fold_group(group: Vec<Record>, field: &str) -> ConsolidationResult<Record> {
    let mut members = group.into_iter();
    let first = members.next().ok_or_else(|| ConsolidationError::EmptyGroup {
        field: field.to_string(),
    })?;
    resolve_strategy(&first, field)?;

    members.try_fold(first, |acc, next| merge_field(&acc, &next, field))
}

pub(super) fn resolve_strategy(
    record: &Record,
    field: &str,
) -> ConsolidationResult<(usize, crate::record::MergeStrategy)> {
    let schema = record.schema();
    let idx = schema
        .index_of(field)
        .ok_or_else(|| ConsolidationError::UnknownField {
            resource_type: record.type_name().to_string(),
            field: field.to_string(),
        })?;
    let kind = schema.fields()[idx].kind;
    let strategy = kind
        .merge_strategy()
        .ok_or_else(|| ConsolidationError::NotAggregatable {
            resource_type: record.type_name().to_string(),
            field: field.to_string(),
            kind,
        })?;

    Ok((idx, strategy))
}

fn merge_at<F>(
    r0: &Record,
    r1: &Record,
    field: &str,
    idx: usize,
    op: F,
) -> ConsolidationResult<Record>
where
    F: Fn(&AttrValue, &AttrValue) -> Option<AttrValue>,
{
    if !r0.same_schema(r1) {
        return Err(ConsolidationError::SchemaMismatch {
            expected: r0.type_name().to_string(),
            found: r1.type_name().to_string(),
            position: 1,
        });
    }

    let differing_fields = r0.differing_fields(r1, idx);
    if !differing_fields.is_empty() {
        return Err(ConsolidationError::Consistency {
            resource_type: r0.type_name().to_string(),
            aggregate_field: field.to_string(),
            differing_fields,
        });
    }

    let kind = r0.schema().fields()[idx].kind;
    let merged = op(r0.value_at(idx), r1.value_at(idx))
        .filter(|value| kind.accepts(value))
        .ok_or_else(|| ConsolidationError::NotAggregatable {
            resource_type: r0.type_name().to_string(),
            field: field.to_string(),
            kind,
        })?;

    Ok(r0.with_value(idx, merged))
}
