use serde::{Deserialize, Serialize};
use std::fmt;

use super::value::AttrValue;

/// Attribute kind as named by the provider documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    #[serde(rename = "String")]
    String,
    #[serde(rename = "Number")]
    Number,
    #[serde(rename = "Boolean")]
    Boolean,
    #[serde(rename = "List of String")]
    StringList,
    #[serde(rename = "Set of String")]
    StringSet,
    #[serde(rename = "Set of Number")]
    NumberSet,
    #[serde(rename = "Map of String")]
    StringMap,
    #[serde(rename = "Block")]
    Block,
    #[serde(rename = "Block List")]
    BlockList,
    #[serde(rename = "Block Set")]
    BlockSet,
}

impl FieldKind {
    /// Parse a documentation type string such as `Set of String`
    pub fn from_doc_type(doc_type: &str) -> Option<Self> {
        match doc_type.trim() {
            "String" => Some(FieldKind::String),
            "Number" => Some(FieldKind::Number),
            "Boolean" => Some(FieldKind::Boolean),
            "List of String" => Some(FieldKind::StringList),
            "Set of String" => Some(FieldKind::StringSet),
            "Set of Number" => Some(FieldKind::NumberSet),
            "Map of String" => Some(FieldKind::StringMap),
            "Block" => Some(FieldKind::Block),
            "Block List" => Some(FieldKind::BlockList),
            "Block Set" => Some(FieldKind::BlockSet),
            _ => None,
        }
    }

    pub fn doc_type(&self) -> &'static str {
        match self {
            FieldKind::String => "String",
            FieldKind::Number => "Number",
            FieldKind::Boolean => "Boolean",
            FieldKind::StringList => "List of String",
            FieldKind::StringSet => "Set of String",
            FieldKind::NumberSet => "Set of Number",
            FieldKind::StringMap => "Map of String",
            FieldKind::Block => "Block",
            FieldKind::BlockList => "Block List",
            FieldKind::BlockSet => "Block Set",
        }
    }

    /// Default merge operator for an aggregate field of this kind
    pub fn merge_strategy(&self) -> Option<MergeStrategy> {
        match self {
            FieldKind::StringSet | FieldKind::NumberSet | FieldKind::BlockSet => {
                Some(MergeStrategy::Union)
            }
            FieldKind::StringList | FieldKind::BlockList => Some(MergeStrategy::Concat),
            _ => None,
        }
    }

    /// Whether the kind renders as nested blocks rather than an assignment
    pub fn is_block(&self) -> bool {
        matches!(
            self,
            FieldKind::Block | FieldKind::BlockList | FieldKind::BlockSet
        )
    }

    /// Check that a value has the shape this kind expects. `Null` always conforms.
    pub fn accepts(&self, value: &AttrValue) -> bool {
        match (self, value) {
            (_, AttrValue::Null) => true,
            (FieldKind::String, AttrValue::String(_)) => true,
            (FieldKind::Number, AttrValue::Number(_)) => true,
            (FieldKind::Boolean, AttrValue::Bool(_)) => true,
            (FieldKind::StringList, AttrValue::List(items)) => {
                items.iter().all(|v| matches!(v, AttrValue::String(_)))
            }
            (FieldKind::StringSet, AttrValue::Set(items)) => {
                items.iter().all(|v| matches!(v, AttrValue::String(_)))
            }
            (FieldKind::NumberSet, AttrValue::Set(items)) => {
                items.iter().all(|v| matches!(v, AttrValue::Number(_)))
            }
            (FieldKind::StringMap, AttrValue::Map(_)) => true,
            (FieldKind::Block, AttrValue::Block(_)) => true,
            (FieldKind::BlockList, AttrValue::List(items)) => {
                items.iter().all(|v| matches!(v, AttrValue::Block(_)))
            }
            (FieldKind::BlockSet, AttrValue::Set(items)) => {
                items.iter().all(|v| matches!(v, AttrValue::Block(_)))
            }
            _ => false,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.doc_type())
    }
}

/// How two aggregate values are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStrategy {
    /// Set union, keeping the left operand's order then new elements from the right
    Union,
    /// Sequence concatenation, duplicates preserved
    Concat,
}

impl MergeStrategy {
    /// Combine two values. Returns `None` when either side is not a collection.
    pub fn apply(&self, left: &AttrValue, right: &AttrValue) -> Option<AttrValue> {
        if left.is_null() && right.is_null() {
            return Some(AttrValue::Null);
        }

        let left_items = left.elements()?;
        let right_items = right.elements()?;
        let combined = left_items.iter().chain(right_items.iter()).cloned();

        match self {
            MergeStrategy::Union => Some(AttrValue::set(combined)),
            MergeStrategy::Concat => Some(AttrValue::List(combined.collect())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    Required,
    Optional,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    pub presence: Presence,
}

impl FieldSpec {
    pub fn required(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            presence: Presence::Required,
        }
    }

    pub fn optional(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            presence: Presence::Optional,
        }
    }

    pub fn is_required(&self) -> bool {
        self.presence == Presence::Required
    }
}

/// The fixed attribute layout of one resource type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSchema {
    type_name: String,
    fields: Vec<FieldSpec>,
}

impl ResourceSchema {
    pub fn new(type_name: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        Self {
            type_name: type_name.into(),
            fields,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Names of the fields that can serve as an aggregate field
    pub fn aggregate_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.kind.merge_strategy().is_some())
            .map(|f| f.name.as_str())
            .collect()
    }
}
