use serde_json::{Map as JsonMap, Number, Value};

/// A single attribute value held by a [`Record`](super::Record)
///
/// `Set` keeps first-insertion order and never holds duplicates. Two sets are
/// equal when they hold the same elements, whatever their order. Every other
/// variant compares structurally.
#[derive(Debug, Clone)]
pub enum AttrValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    List(Vec<AttrValue>),
    Set(Vec<AttrValue>),
    Map(Vec<(String, String)>),
    Block(Vec<(String, AttrValue)>),
}

impl AttrValue {
    pub fn string(value: impl Into<String>) -> Self {
        AttrValue::String(value.into())
    }

    /// Build a set, dropping repeated elements but keeping first occurrences in order
    pub fn set<I>(items: I) -> Self
    where
        I: IntoIterator<Item = AttrValue>,
    {
        let mut elements: Vec<AttrValue> = Vec::new();

        for item in items {
            if !elements.contains(&item) {
                elements.push(item);
            }
        }

        AttrValue::Set(elements)
    }

    pub fn string_set<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::set(items.into_iter().map(|s| AttrValue::String(s.into())))
    }

    pub fn string_list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AttrValue::List(items.into_iter().map(|s| AttrValue::String(s.into())).collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttrValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Elements of a collection value; `Null` counts as the empty collection
    pub fn elements(&self) -> Option<&[AttrValue]> {
        match self {
            AttrValue::Null => Some(&[]),
            AttrValue::List(items) | AttrValue::Set(items) => Some(items),
            _ => None,
        }
    }

    /// Short name of the variant, used in error messages
    pub fn variant_name(&self) -> &'static str {
        match self {
            AttrValue::Null => "null",
            AttrValue::Bool(_) => "boolean",
            AttrValue::Number(_) => "number",
            AttrValue::String(_) => "string",
            AttrValue::List(_) => "list",
            AttrValue::Set(_) => "set",
            AttrValue::Map(_) => "map",
            AttrValue::Block(_) => "block",
        }
    }

    /// Convert to JSON. Sets and lists become arrays, maps and blocks become objects.
    pub fn to_json(&self) -> Value {
        match self {
            AttrValue::Null => Value::Null,
            AttrValue::Bool(b) => Value::Bool(*b),
            AttrValue::Number(n) => Value::Number(n.clone()),
            AttrValue::String(s) => Value::String(s.clone()),
            AttrValue::List(items) | AttrValue::Set(items) => {
                Value::Array(items.iter().map(AttrValue::to_json).collect())
            }
            AttrValue::Map(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                    .collect::<JsonMap<_, _>>(),
            ),
            AttrValue::Block(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect::<JsonMap<_, _>>(),
            ),
        }
    }
}

impl PartialEq for AttrValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (AttrValue::Null, AttrValue::Null) => true,
            (AttrValue::Bool(a), AttrValue::Bool(b)) => a == b,
            (AttrValue::Number(a), AttrValue::Number(b)) => a == b,
            (AttrValue::String(a), AttrValue::String(b)) => a == b,
            (AttrValue::List(a), AttrValue::List(b)) => a == b,
            (AttrValue::Set(a), AttrValue::Set(b)) => {
                a.len() == b.len() && a.iter().all(|item| b.contains(item))
            }
            (AttrValue::Map(a), AttrValue::Map(b)) => a == b,
            (AttrValue::Block(a), AttrValue::Block(b)) => a == b,
            _ => false,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::String(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::String(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Number(Number::from(value))
    }
}

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(AttrValue::Null, Into::into)
    }
}
