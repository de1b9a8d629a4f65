use serde::Deserialize;
use serde_json::Value;

/// A row of `snowflake.account_usage.grants_to_roles`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct RoleGrantRow {
    pub granted_on: String,
    #[serde(default)]
    pub granted_to: Option<String>,
    pub name: String,
    #[serde(default)]
    pub privilege: Option<String>,
    pub grantee_name: String,
    #[serde(default)]
    pub grant_option: Value,
    #[serde(default)]
    pub table_catalog: Option<String>,
    #[serde(default)]
    pub table_schema: Option<String>,
    #[serde(default)]
    pub deleted_on: Value,
}

impl RoleGrantRow {
    pub fn is_live(&self) -> bool {
        self.deleted_on.is_null()
    }

    pub fn is_granted_to_role(&self) -> bool {
        self.granted_to.as_deref() == Some("ROLE")
    }

    pub fn with_grant_option(&self) -> Option<bool> {
        to_bool(&self.grant_option)
    }
}

/// A row of `snowflake.account_usage.grants_to_users`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct UserGrantRow {
    pub role: String,
    pub grantee_name: String,
    #[serde(default)]
    pub deleted_on: Value,
}

impl UserGrantRow {
    pub fn is_live(&self) -> bool {
        self.deleted_on.is_null()
    }
}

/// Interpret an exported flag. Unrecognised text is treated as unknown.
pub fn to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.as_str() {
            "True" | "true" => Some(true),
            "False" | "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}
