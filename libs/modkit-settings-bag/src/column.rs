//! Translation between the stored JSON text and the in-memory settings mapping.

use sea_orm::ActiveValue;
use serde::Serialize;
use serde_json::Value;

use crate::error::SettingsError;

/// In-memory settings: string keys to arbitrary JSON values.
pub type SettingsMap = serde_json::Map<String, Value>;

/// Stored form of a settings attribute: nullable JSON text.
///
/// Records keep their settings in a nullable text column. This type is the
/// single place where that text is produced and parsed.
///
/// ```rust
/// use modkit_settings_bag::{SettingsColumn, SettingsMap};
/// use serde_json::json;
///
/// let column = SettingsColumn::encode(&json!({"theme": "dark"})).unwrap();
/// assert_eq!(column.as_deref(), Some(r#"{"theme":"dark"}"#));
///
/// let decoded: Option<SettingsMap> = column.to_map();
/// assert_eq!(decoded.unwrap()["theme"], "dark");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsColumn(Option<String>);

impl SettingsColumn {
    /// Column holding no settings.
    #[must_use]
    pub const fn null() -> Self {
        Self(None)
    }

    /// Wraps text already in stored form.
    #[must_use]
    pub const fn from_raw(raw: Option<String>) -> Self {
        Self(raw)
    }

    /// Serializes `value` into stored form.
    ///
    /// The value is expected to be a mapping but this is not enforced; a
    /// non-object value is stored as-is and later reads back as no settings.
    ///
    /// # Errors
    /// Returns [`SettingsError::Serialization`] when `value` cannot be
    /// represented as JSON (for example a map with non-string keys).
    pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Self, SettingsError> {
        Ok(Self(Some(serde_json::to_string(value)?)))
    }

    /// Serializes a settings mapping into stored form.
    ///
    /// # Errors
    /// Returns [`SettingsError::Serialization`] if serialization fails.
    pub fn from_map(map: &SettingsMap) -> Result<Self, SettingsError> {
        Self::encode(map)
    }

    /// Parses stored text into a mapping.
    ///
    /// Absent or blank text and the JSON literal `null` mean "no settings".
    /// Text that is not a JSON object also yields `None`; that case is logged
    /// because it points at corrupted or foreign data in the column.
    #[must_use]
    pub fn decode(raw: Option<&str>) -> Option<SettingsMap> {
        let raw = raw?;
        if raw.trim().is_empty() {
            return None;
        }
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => Some(map),
            Ok(Value::Null) => None,
            Ok(other) => {
                tracing::warn!(
                    kind = json_kind(&other),
                    "Stored settings are not a JSON object; treating as empty"
                );
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to decode stored settings; treating as empty");
                None
            }
        }
    }

    /// Decodes this column. See [`SettingsColumn::decode`].
    #[must_use]
    pub fn to_map(&self) -> Option<SettingsMap> {
        Self::decode(self.as_deref())
    }

    #[must_use]
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        self.0.is_none()
    }

    #[must_use]
    pub fn into_inner(self) -> Option<String> {
        self.0
    }

    /// Reads the stored text out of an active model field.
    ///
    /// `NotSet` reads as no settings.
    #[must_use]
    pub fn read_active(value: &ActiveValue<Option<String>>) -> Option<&str> {
        match value {
            ActiveValue::Set(raw) | ActiveValue::Unchanged(raw) => raw.as_deref(),
            ActiveValue::NotSet => None,
        }
    }

    /// Writes this column into an active model field, marking it as changed.
    pub fn write_active(self, target: &mut ActiveValue<Option<String>>) {
        *target = ActiveValue::Set(self.0);
    }
}

impl From<SettingsColumn> for Option<String> {
    fn from(column: SettingsColumn) -> Self {
        column.0
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
