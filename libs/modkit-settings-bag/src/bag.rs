use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::column::{SettingsColumn, SettingsMap};
use crate::error::SettingsError;
use crate::record::HasSettings;

enum Slot<'a, R> {
    Borrowed(&'a mut R),
    Linked(R),
    Unsaved(R),
}

/// View over one record's settings.
///
/// Every read decodes the record's column and every write re-encodes it; the
/// bag keeps no copy of the data. A bag obtained from
/// [`HasSettings::settings`] borrows the record. A bag obtained by resolving a
/// settings relation holds the related record, which is handed back by
/// [`SettingsBag::into_record`] so the caller can persist it.
pub struct SettingsBag<'a, R> {
    slot: Slot<'a, R>,
}

impl<'a, R: HasSettings> SettingsBag<'a, R> {
    pub(crate) fn borrowed(record: &'a mut R) -> Self {
        Self {
            slot: Slot::Borrowed(record),
        }
    }
}

impl<R: HasSettings> SettingsBag<'static, R> {
    pub(crate) fn linked(record: R) -> Self {
        Self {
            slot: Slot::Linked(record),
        }
    }

    pub(crate) fn unsaved(record: R) -> Self {
        Self {
            slot: Slot::Unsaved(record),
        }
    }
}

impl<R: HasSettings> SettingsBag<'_, R> {
    #[must_use]
    pub fn record(&self) -> &R {
        match &self.slot {
            Slot::Borrowed(r) => &**r,
            Slot::Linked(r) | Slot::Unsaved(r) => r,
        }
    }

    pub fn record_mut(&mut self) -> &mut R {
        match &mut self.slot {
            Slot::Borrowed(r) => &mut **r,
            Slot::Linked(r) | Slot::Unsaved(r) => r,
        }
    }

    /// True when the bag wraps a related record built during resolution that
    /// has not been persisted yet.
    #[must_use]
    pub fn is_unsaved(&self) -> bool {
        matches!(self.slot, Slot::Unsaved(_))
    }

    /// Takes back a related record held by the bag.
    ///
    /// Returns `None` for a bag that borrows its record.
    #[must_use]
    pub fn into_record(self) -> Option<R> {
        match self.slot {
            Slot::Borrowed(_) => None,
            Slot::Linked(r) | Slot::Unsaved(r) => Some(r),
        }
    }

    /// All settings; empty when none are stored.
    #[must_use]
    pub fn all(&self) -> SettingsMap {
        self.record().get_settings().unwrap_or_default()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.record().get_settings()?.remove(key)
    }

    #[must_use]
    pub fn get_or(&self, key: &str, default: Value) -> Value {
        self.get(key).unwrap_or(default)
    }

    /// Looks up a dot-separated path into nested objects, e.g. `"mail.digest"`.
    #[must_use]
    pub fn get_path(&self, path: &str) -> Option<Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.get(first)?;
        for segment in segments {
            current = match current {
                Value::Object(mut map) => map.remove(segment)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Deserializes one setting into `T`.
    ///
    /// # Errors
    /// Returns [`SettingsError::Serialization`] if the stored value does not
    /// match `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, SettingsError> {
        self.get(key)
            .map(serde_json::from_value)
            .transpose()
            .map_err(SettingsError::from)
    }

    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.record()
            .get_settings()
            .is_some_and(|s| s.contains_key(key))
    }

    /// Writes one setting.
    ///
    /// # Errors
    /// Returns [`SettingsError::Serialization`] if `value` cannot be encoded.
    pub fn set<T: Serialize>(&mut self, key: &str, value: T) -> Result<(), SettingsError> {
        let value = serde_json::to_value(value)?;
        let mut settings = self.all();
        settings.insert(key.to_owned(), value);
        self.store(&settings)
    }

    /// Shallow-merges `values` over the current settings; incoming keys win.
    ///
    /// # Errors
    /// Returns [`SettingsError::Serialization`] if the merged map cannot be encoded.
    pub fn merge(&mut self, values: SettingsMap) -> Result<(), SettingsError> {
        let mut settings = self.all();
        settings.extend(values);
        self.store(&settings)
    }

    /// Overwrites all settings with `value`.
    ///
    /// # Errors
    /// Returns [`SettingsError::Serialization`] if `value` cannot be encoded.
    pub fn replace<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), SettingsError> {
        self.record_mut().store_settings(SettingsColumn::encode(value)?);
        Ok(())
    }

    /// Removes one setting, returning its previous value.
    ///
    /// # Errors
    /// Returns [`SettingsError::Serialization`] if the remaining map cannot be encoded.
    pub fn forget(&mut self, key: &str) -> Result<Option<Value>, SettingsError> {
        let mut settings = self.all();
        let old = settings.remove(key);
        if old.is_some() {
            self.store(&settings)?;
        }
        Ok(old)
    }

    /// Removes all settings, leaving the column null.
    pub fn clear(&mut self) {
        self.record_mut().store_settings(SettingsColumn::null());
    }

    /// Restores the record's default settings, or null when it has none.
    ///
    /// # Errors
    /// Returns [`SettingsError::Serialization`] if the defaults cannot be encoded.
    pub fn reset(&mut self) -> Result<(), SettingsError> {
        let defaults = self.record().default_settings();
        if defaults.is_empty() {
            self.clear();
            return Ok(());
        }
        self.store(&defaults)
    }

    fn store(&mut self, settings: &SettingsMap) -> Result<(), SettingsError> {
        let column = SettingsColumn::from_map(settings)?;
        self.record_mut().store_settings(column);
        Ok(())
    }
}

impl<R> std::fmt::Debug for SettingsBag<'_, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let binding = match self.slot {
            Slot::Borrowed(_) => "borrowed",
            Slot::Linked(_) => "linked",
            Slot::Unsaved(_) => "unsaved",
        };
        f.debug_struct("SettingsBag")
            .field("record", &std::any::type_name::<R>())
            .field("binding", &binding)
            .finish_non_exhaustive()
    }
}
