use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

use crate::catalog::ResourceDefinition;
use crate::record::{AttrValue, Record};

lazy_static! {
    static ref NON_IDENTIFIER_CHARS: Regex = Regex::new(r"[^A-Za-z0-9_-]+").unwrap();
}

/// Terraform resource name for a record
///
/// Named, non-anonymous resources use their `name` attribute. Everything
/// else gets a generated `a_<uuid>` name.
pub fn resource_name(definition: &ResourceDefinition, record: &Record) -> String {
    if definition.anonymous {
        return generated_name();
    }

    match record.get("name") {
        Some(AttrValue::String(name)) if !name.is_empty() => to_identifier(name),
        _ => generated_name(),
    }
}

pub fn generated_name() -> String {
    format!("a_{}", uuid::Uuid::new_v4().to_string().replace('-', "_"))
}

/// Claim `name` in `used`, suffixing `_2`, `_3`, ... when it is already taken
///
/// Different objects can clean up to the same identifier (`jane.doe` and
/// `jane_doe`), and same-named objects can live in different schemas.
pub fn claim_name(name: String, used: &mut HashSet<String>) -> String {
    if used.insert(name.clone()) {
        return name;
    }

    let mut suffix = 2;
    loop {
        let candidate = format!("{}_{}", name, suffix);
        if used.insert(candidate.clone()) {
            return candidate;
        }
        suffix += 1;
    }
}

/// Replace characters Terraform rejects in resource names
fn to_identifier(name: &str) -> String {
    let cleaned = NON_IDENTIFIER_CHARS.replace_all(name, "_");

    if cleaned.starts_with(|c: char| c.is_ascii_digit() || c == '-') {
        format!("_{}", cleaned)
    } else {
        cleaned.into_owned()
    }
}
