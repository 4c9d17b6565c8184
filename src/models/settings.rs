use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// SettingType
///
/// Tag telling clients how to interpret a setting's text value.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS, ToSchema, sqlx::Type,
)]
#[sqlx(type_name = "setting_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum SettingType {
    #[default]
    String,
    Number,
    Boolean,
    Json,
}

impl SettingType {
    /// Checks that `value` is readable as this type.
    pub fn check(self, value: &str) -> AppResult<()> {
        let ok = match self {
            SettingType::String => true,
            SettingType::Number => value.trim().parse::<f64>().is_ok_and(f64::is_finite),
            SettingType::Boolean => matches!(value.trim(), "true" | "false"),
            SettingType::Json => serde_json::from_str::<serde_json::Value>(value).is_ok(),
        };
        if ok {
            Ok(())
        } else {
            Err(AppError::validation(format!(
                "value is not a valid {}",
                self.label()
            )))
        }
    }

    fn label(self) -> &'static str {
        match self {
            SettingType::String => "string",
            SettingType::Number => "number",
            SettingType::Boolean => "boolean",
            SettingType::Json => "json",
        }
    }
}

/// SiteSetting
///
/// Key-value entry of `site_settings`; `key` is unique.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, PartialEq)]
#[ts(export)]
pub struct SiteSetting {
    pub id: Uuid,
    pub key: String,
    pub value: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub value_type: SettingType,
    pub description: Option<String>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// UpsertSettingRequest
///
/// Body of PUT /api/settings/{key}. A missing `type` keeps the stored one (or `string`
/// for a new key); a missing `description` keeps the stored one.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct UpsertSettingRequest {
    pub value: String,
    #[serde(default, rename = "type")]
    pub value_type: Option<SettingType>,
    #[serde(default)]
    pub description: Option<String>,
}

pub(crate) fn require_setting_key(key: &str) -> AppResult<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(AppError::validation(
            "key must contain only letters, digits, '_', '-' or '.'",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_values_are_checked() {
        assert!(SettingType::Number.check("42.5").is_ok());
        assert!(SettingType::Number.check("forty").is_err());
        assert!(SettingType::Number.check("NaN").is_err());
        assert!(SettingType::Number.check("inf").is_err());
        assert!(SettingType::Number.check("-infinity").is_err());
        assert!(SettingType::Boolean.check("true").is_ok());
        assert!(SettingType::Boolean.check("yes").is_err());
        assert!(SettingType::Json.check(r#"{"a":[1,2]}"#).is_ok());
        assert!(SettingType::Json.check("{oops").is_err());
        assert!(SettingType::String.check("").is_ok());
    }

    #[test]
    fn keys_are_restricted() {
        assert!(require_setting_key("site.title").is_ok());
        assert!(require_setting_key("bad key").is_err());
        assert!(require_setting_key("").is_err());
    }
}
