use crate::record::Record;

use super::error::{ConsolidationError, ConsolidationResult};

/// Group records that are equal on every field except `aggregate_field`
///
/// The first remaining record is taken as pivot and every later record that
/// matches it joins its group. Matched records leave the pool and the scan
/// repeats until the pool is empty. Groups come out in order of first
/// appearance and members keep their input order.
pub fn partition(
    records: Vec<Record>,
    aggregate_field: &str,
) -> ConsolidationResult<Vec<Vec<Record>>> {
    let Some(aggregate_idx) = aggregate_index(&records, aggregate_field)? else {
        return Ok(Vec::new());
    };

    let mut groups: Vec<Vec<Record>> = Vec::new();
    let mut pool = records;

    while !pool.is_empty() {
        let mut remaining = pool.into_iter();
        let Some(pivot) = remaining.next() else {
            break;
        };

        let mut group = vec![pivot];
        let mut rest = Vec::new();

        for candidate in remaining {
            if group[0].equals_except(&candidate, aggregate_idx) {
                group.push(candidate);
            } else {
                rest.push(candidate);
            }
        }

        groups.push(group);
        pool = rest;
    }

    Ok(groups)
}

/// Validate a batch and resolve the aggregate field index.
/// Returns `None` for an empty batch.
pub(crate) fn aggregate_index(
    records: &[Record],
    aggregate_field: &str,
) -> ConsolidationResult<Option<usize>> {
    let Some(first) = records.first() else {
        return Ok(None);
    };

    for (position, record) in records.iter().enumerate().skip(1) {
        if !record.same_schema(first) {
            return Err(ConsolidationError::SchemaMismatch {
                expected: first.type_name().to_string(),
                found: record.type_name().to_string(),
                position,
            });
        }
    }

    first
        .schema()
        .index_of(aggregate_field)
        .map(Some)
        .ok_or_else(|| ConsolidationError::UnknownField {
            resource_type: first.type_name().to_string(),
            field: aggregate_field.to_string(),
        })
}
