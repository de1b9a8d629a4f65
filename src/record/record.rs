use serde_json::{Map as JsonMap, Value};
use std::sync::Arc;

use super::error::{RecordError, RecordResult};
use super::schema::{FieldKind, FieldSpec, ResourceSchema};
use super::value::AttrValue;

/// One resource instance: a schema plus a value per schema field, in field order
#[derive(Debug, Clone)]
pub struct Record {
    schema: Arc<ResourceSchema>,
    values: Vec<AttrValue>,
}

impl Record {
    pub fn builder(schema: &Arc<ResourceSchema>) -> RecordBuilder {
        RecordBuilder::new(schema)
    }

    /// Build a record from an attribute-shaped JSON object
    pub fn from_json(schema: &Arc<ResourceSchema>, row: &Value) -> RecordResult<Self> {
        let object = row.as_object().ok_or_else(|| RecordError::NotAnObject {
            resource_type: schema.type_name().to_string(),
        })?;

        Self::from_json_object(schema, object)
    }

    pub fn from_json_object(
        schema: &Arc<ResourceSchema>,
        object: &JsonMap<String, Value>,
    ) -> RecordResult<Self> {
        let mut builder = Self::builder(schema);

        for (name, raw) in object {
            let spec = schema
                .field(name)
                .ok_or_else(|| RecordError::UnknownAttribute {
                    resource_type: schema.type_name().to_string(),
                    attribute: name.clone(),
                })?;
            let value = value_from_json(schema.type_name(), spec, raw)?;
            builder = builder.set(name, value)?;
        }

        builder.build()
    }

    pub fn schema(&self) -> &Arc<ResourceSchema> {
        &self.schema
    }

    pub fn type_name(&self) -> &str {
        self.schema.type_name()
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.schema.index_of(name).map(|idx| &self.values[idx])
    }

    pub(crate) fn value_at(&self, index: usize) -> &AttrValue {
        &self.values[index]
    }

    /// Iterate over `(field, value)` pairs in schema order
    pub fn fields(&self) -> impl Iterator<Item = (&FieldSpec, &AttrValue)> {
        self.schema.fields().iter().zip(self.values.iter())
    }

    pub fn same_schema(&self, other: &Record) -> bool {
        Arc::ptr_eq(&self.schema, &other.schema) || self.schema == other.schema
    }

    /// Value equality on every field except the one at `except`
    pub fn equals_except(&self, other: &Record, except: usize) -> bool {
        self.same_schema(other)
            && self
                .values
                .iter()
                .zip(other.values.iter())
                .enumerate()
                .all(|(idx, (a, b))| idx == except || a == b)
    }

    /// Names of fields, other than the one at `except`, whose values differ
    pub fn differing_fields(&self, other: &Record, except: usize) -> Vec<String> {
        self.schema
            .fields()
            .iter()
            .zip(self.values.iter().zip(other.values.iter()))
            .enumerate()
            .filter(|(idx, (_, (a, b)))| *idx != except && a != b)
            .map(|(_, (spec, _))| spec.name.clone())
            .collect()
    }

    /// Copy of this record with one field replaced
    pub(crate) fn with_value(&self, index: usize, value: AttrValue) -> Record {
        let mut values = self.values.clone();
        values[index] = value;

        Record {
            schema: Arc::clone(&self.schema),
            values,
        }
    }

    /// Attribute object with null attributes left out
    pub fn to_json(&self) -> Value {
        let object = self
            .fields()
            .filter(|(_, value)| !value.is_null())
            .map(|(spec, value)| (spec.name.clone(), value.to_json()))
            .collect::<JsonMap<_, _>>();

        Value::Object(object)
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.same_schema(other) && self.values == other.values
    }
}

/// Incrementally assigns attribute values, validating names and kinds
pub struct RecordBuilder {
    schema: Arc<ResourceSchema>,
    values: Vec<AttrValue>,
}

impl RecordBuilder {
    fn new(schema: &Arc<ResourceSchema>) -> Self {
        Self {
            schema: Arc::clone(schema),
            values: vec![AttrValue::Null; schema.fields().len()],
        }
    }

    pub fn set(mut self, name: &str, value: impl Into<AttrValue>) -> RecordResult<Self> {
        let value = value.into();
        let idx = self
            .schema
            .index_of(name)
            .ok_or_else(|| RecordError::UnknownAttribute {
                resource_type: self.schema.type_name().to_string(),
                attribute: name.to_string(),
            })?;
        let kind = self.schema.fields()[idx].kind;

        if !kind.accepts(&value) {
            return Err(RecordError::KindMismatch {
                resource_type: self.schema.type_name().to_string(),
                attribute: name.to_string(),
                expected: kind,
                found: value.variant_name().to_string(),
            });
        }

        self.values[idx] = value;
        Ok(self)
    }

    pub fn build(self) -> RecordResult<Record> {
        for (spec, value) in self.schema.fields().iter().zip(self.values.iter()) {
            if spec.is_required() && value.is_null() {
                return Err(RecordError::MissingRequired {
                    resource_type: self.schema.type_name().to_string(),
                    attribute: spec.name.clone(),
                });
            }
        }

        Ok(Record {
            schema: self.schema,
            values: self.values,
        })
    }
}

/// Convert an exported JSON value into the shape `spec.kind` expects
///
/// Collectors often export every column as text, so booleans and numbers are
/// also accepted as strings, and string collections as comma-separated text.
pub fn value_from_json(
    resource_type: &str,
    spec: &FieldSpec,
    raw: &Value,
) -> RecordResult<AttrValue> {
    let mismatch = || RecordError::KindMismatch {
        resource_type: resource_type.to_string(),
        attribute: spec.name.clone(),
        expected: spec.kind,
        found: json_type_name(raw).to_string(),
    };

    if raw.is_null() {
        return Ok(AttrValue::Null);
    }

    match spec.kind {
        FieldKind::String => match raw {
            Value::String(s) => Ok(AttrValue::String(s.clone())),
            _ => Err(mismatch()),
        },
        FieldKind::Number => match raw {
            Value::Number(n) => Ok(AttrValue::Number(n.clone())),
            Value::String(s) if s.trim().is_empty() => Ok(AttrValue::Null),
            Value::String(s) => serde_json::from_str::<serde_json::Number>(s.trim())
                .map(AttrValue::Number)
                .map_err(|_| mismatch()),
            _ => Err(mismatch()),
        },
        FieldKind::Boolean => match raw {
            Value::Bool(b) => Ok(AttrValue::Bool(*b)),
            Value::String(s) => match s.to_ascii_lowercase().as_str() {
                "true" => Ok(AttrValue::Bool(true)),
                "false" => Ok(AttrValue::Bool(false)),
                "" => Ok(AttrValue::Null),
                _ => Err(mismatch()),
            },
            _ => Err(mismatch()),
        },
        FieldKind::StringList | FieldKind::StringSet => {
            let items = string_items(raw).ok_or_else(mismatch)?;

            Ok(match (spec.kind, items) {
                (_, None) => AttrValue::Null,
                (FieldKind::StringSet, Some(items)) => AttrValue::string_set(items),
                (_, Some(items)) => AttrValue::string_list(items),
            })
        }
        FieldKind::NumberSet => match raw {
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::Number(n) => Ok(AttrValue::Number(n.clone())),
                    _ => Err(mismatch()),
                })
                .collect::<RecordResult<Vec<_>>>()
                .map(AttrValue::set),
            _ => Err(mismatch()),
        },
        FieldKind::StringMap => match raw {
            Value::Object(entries) => entries
                .iter()
                .map(|(k, v)| match v {
                    Value::String(s) => Ok((k.clone(), s.clone())),
                    _ => Err(mismatch()),
                })
                .collect::<RecordResult<Vec<_>>>()
                .map(AttrValue::Map),
            _ => Err(mismatch()),
        },
        FieldKind::Block => match raw {
            Value::Object(entries) => Ok(block_from_object(entries)),
            _ => Err(mismatch()),
        },
        FieldKind::BlockList | FieldKind::BlockSet => match raw {
            Value::Array(items) => {
                let blocks = items
                    .iter()
                    .map(|item| match item {
                        Value::Object(entries) => Ok(block_from_object(entries)),
                        _ => Err(mismatch()),
                    })
                    .collect::<RecordResult<Vec<_>>>()?;

                Ok(if spec.kind == FieldKind::BlockSet {
                    AttrValue::set(blocks)
                } else {
                    AttrValue::List(blocks)
                })
            }
            _ => Err(mismatch()),
        },
    }
}

/// Strings of an array, or of comma-separated text. `Some(None)` for text
/// with no non-blank pieces.
fn string_items(raw: &Value) -> Option<Option<Vec<String>>> {
    match raw {
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .map(Some),
        Value::String(s) => {
            let pieces: Vec<String> = s
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect();
            Some((!pieces.is_empty()).then_some(pieces))
        }
        _ => None,
    }
}

fn block_from_object(entries: &JsonMap<String, Value>) -> AttrValue {
    AttrValue::Block(
        entries
            .iter()
            .map(|(k, v)| (k.clone(), untyped_from_json(v)))
            .collect(),
    )
}

fn untyped_from_json(raw: &Value) -> AttrValue {
    match raw {
        Value::Null => AttrValue::Null,
        Value::Bool(b) => AttrValue::Bool(*b),
        Value::Number(n) => AttrValue::Number(n.clone()),
        Value::String(s) => AttrValue::String(s.clone()),
        Value::Array(items) => AttrValue::List(items.iter().map(untyped_from_json).collect()),
        Value::Object(entries) => block_from_object(entries),
    }
}

fn json_type_name(raw: &Value) -> &'static str {
    match raw {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::grant_schema;
    use serde_json::json;

    #[test]
    fn test_builder_rejects_unknown_attribute() {
        let schema = grant_schema();
        let result = Record::builder(&schema).set("owner", "X");

        assert!(matches!(
            result,
            Err(RecordError::UnknownAttribute { ref attribute, .. }) if attribute == "owner"
        ));
    }

    #[test]
    fn test_builder_rejects_wrong_kind() {
        let schema = grant_schema();
        let result = Record::builder(&schema).set("roles", "X");

        assert!(matches!(result, Err(RecordError::KindMismatch { .. })));
    }

    #[test]
    fn test_build_requires_required_fields() {
        let schema = grant_schema();
        let result = Record::builder(&schema)
            .set("privilege", "USAGE")
            .unwrap()
            .build();

        assert_eq!(
            result,
            Err(RecordError::MissingRequired {
                resource_type: "database_grant".to_string(),
                attribute: "database_name".to_string(),
            })
        );
    }

    #[test]
    fn test_from_json_converts_text_columns() {
        let schema = grant_schema();
        let record = Record::from_json(
            &schema,
            &json!({
                "database_name": "ANALYTICS",
                "privilege": "USAGE",
                "with_grant_option": "False",
                "roles": "ANALYST, LOADER",
            }),
        )
        .unwrap();

        assert_eq!(record.get("with_grant_option"), Some(&AttrValue::Bool(false)));
        assert_eq!(
            record.get("roles"),
            Some(&AttrValue::string_set(["ANALYST", "LOADER"]))
        );
        assert_eq!(record.get("shares"), Some(&AttrValue::Null));
    }

    #[test]
    fn test_from_json_drops_blank_text_pieces() {
        let schema = grant_schema();
        let row = |roles: &str| {
            Record::from_json(
                &schema,
                &json!({"database_name": "ANALYTICS", "roles": roles}),
            )
            .unwrap()
        };

        assert_eq!(
            row("X, ").get("roles"),
            Some(&AttrValue::string_set(["X"]))
        );
        assert_eq!(
            row(",ANALYST,,LOADER").get("roles"),
            Some(&AttrValue::string_set(["ANALYST", "LOADER"]))
        );
        assert_eq!(row(" , ").get("roles"), Some(&AttrValue::Null));
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        let schema = grant_schema();
        let result = Record::from_json(&schema, &json!(["ANALYTICS"]));

        assert!(matches!(result, Err(RecordError::NotAnObject { .. })));
    }

    #[test]
    fn test_to_json_omits_nulls() {
        let schema = grant_schema();
        let record = Record::builder(&schema)
            .set("database_name", "ANALYTICS")
            .unwrap()
            .set("roles", AttrValue::string_set(["ANALYST"]))
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(
            record.to_json(),
            json!({"database_name": "ANALYTICS", "roles": ["ANALYST"]})
        );
    }

    #[test]
    fn test_differing_fields_skips_excluded() {
        let schema = grant_schema();
        let roles = schema.index_of("roles").unwrap();
        let a = crate::test_helpers::grant("ANALYTICS", "SELECT", &["X"]);
        let b = crate::test_helpers::grant("ANALYTICS", "INSERT", &["Y"]);

        assert_eq!(a.differing_fields(&b, roles), vec!["privilege".to_string()]);
        assert!(!a.equals_except(&b, roles));
    }
}
