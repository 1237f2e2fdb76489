use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Setting {
    pub setting_key: String,
    pub setting_value: String,
    pub setting_type: String,
    pub description: String,
}

/// Value shape used in the keyed map returned by the bulk get operation.
#[derive(Debug, Serialize)]
pub struct SettingView {
    pub value: String,
    #[serde(rename = "type")]
    pub setting_type: String,
    pub description: String,
}

impl From<Setting> for SettingView {
    fn from(s: Setting) -> Self {
        SettingView {
            value: s.setting_value,
            setting_type: s.setting_type,
            description: s.description,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateSettingRequest {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct BulkUpdateSettingsRequest {
    #[serde(default)]
    pub settings: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Settings arrive as arbitrary JSON scalars; they are stored as text.
pub fn value_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalar_values_stringify_without_quotes() {
        assert_eq!(value_to_string(&json!("hello")), "hello");
        assert_eq!(value_to_string(&json!(42)), "42");
        assert_eq!(value_to_string(&json!(true)), "true");
    }
}
