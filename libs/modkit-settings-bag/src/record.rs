use std::collections::{BTreeSet, HashSet};
use std::hash::BuildHasher;

use serde::Serialize;

use crate::bag::SettingsBag;
use crate::column::{SettingsColumn, SettingsMap};
use crate::error::SettingsError;

/// Set of keys permitted to survive a save.
pub trait SettingsWhitelist {
    fn permits(&self, key: &str) -> bool;
}

impl<const N: usize> SettingsWhitelist for [&str; N] {
    fn permits(&self, key: &str) -> bool {
        self.contains(&key)
    }
}

impl SettingsWhitelist for Vec<&str> {
    fn permits(&self, key: &str) -> bool {
        self.contains(&key)
    }
}

impl SettingsWhitelist for Vec<String> {
    fn permits(&self, key: &str) -> bool {
        self.iter().any(|k| k == key)
    }
}

impl SettingsWhitelist for BTreeSet<String> {
    fn permits(&self, key: &str) -> bool {
        self.contains(key)
    }
}

impl<S: BuildHasher> SettingsWhitelist for HashSet<String, S> {
    fn permits(&self, key: &str) -> bool {
        self.contains(key)
    }
}

/// Capability of a record that owns a JSON settings attribute.
///
/// Implemented by the record type the application mutates and saves,
/// normally a `SeaORM` `ActiveModel`. Only the column accessors are required;
/// defaults and the whitelist are opt-in.
///
/// # Example
/// ```rust,ignore
/// impl HasSettings for user::ActiveModel {
///     fn raw_settings(&self) -> Option<&str> {
///         SettingsColumn::read_active(&self.settings)
///     }
///
///     fn store_settings(&mut self, column: SettingsColumn) {
///         column.write_active(&mut self.settings);
///     }
///
///     fn default_settings(&self) -> SettingsMap {
///         SettingsMap::from_iter([("theme".to_owned(), json!("light"))])
///     }
///
///     fn allowed_settings(&self) -> Option<&dyn SettingsWhitelist> {
///         Some(&["theme", "language"])
///     }
/// }
///
/// #[async_trait::async_trait]
/// impl ActiveModelBehavior for user::ActiveModel {
///     async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
///     where
///         C: ConnectionTrait,
///     {
///         self.apply_settings_hooks(insert)?;
///         Ok(self)
///     }
/// }
/// ```
pub trait HasSettings {
    /// Stored JSON text, `None` when the column is null or not loaded.
    fn raw_settings(&self) -> Option<&str>;

    /// Replaces the stored JSON text.
    fn store_settings(&mut self, column: SettingsColumn);

    /// Settings applied at creation when none were supplied.
    fn default_settings(&self) -> SettingsMap {
        SettingsMap::new()
    }

    /// Keys permitted to survive a save. `None` disables filtering.
    fn allowed_settings(&self) -> Option<&dyn SettingsWhitelist> {
        None
    }

    /// Decoded settings, `None` when absent or undecodable.
    fn get_settings(&self) -> Option<SettingsMap> {
        SettingsColumn::decode(self.raw_settings())
    }

    /// Serializes `value` into the settings column.
    ///
    /// # Errors
    /// Returns [`SettingsError::Serialization`] if `value` cannot be encoded.
    fn put_settings<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), SettingsError>
    where
        Self: Sized,
    {
        self.store_settings(SettingsColumn::encode(value)?);
        Ok(())
    }

    /// Bag bound to this record.
    fn settings(&mut self) -> SettingsBag<'_, Self>
    where
        Self: Sized,
    {
        SettingsBag::borrowed(self)
    }

    /// Populates defaults when the record is created without settings.
    ///
    /// # Errors
    /// Returns [`SettingsError::Serialization`] if the defaults cannot be encoded.
    fn on_creating(&mut self) -> Result<(), SettingsError> {
        if has_any(self.get_settings().as_ref()) {
            return Ok(());
        }

        let defaults = self.default_settings();
        let column = if defaults.is_empty() {
            SettingsColumn::null()
        } else {
            tracing::debug!(keys = defaults.len(), "Applying default settings");
            SettingsColumn::from_map(&defaults)?
        };
        self.store_settings(column);
        Ok(())
    }

    /// Drops settings keys outside the whitelist.
    ///
    /// The column is only rewritten when something was dropped.
    ///
    /// # Errors
    /// Returns [`SettingsError::Serialization`] if the filtered map cannot be encoded.
    fn on_saving(&mut self) -> Result<(), SettingsError> {
        let filtered = {
            let Some(whitelist) = self.allowed_settings() else {
                return Ok(());
            };
            let Some(settings) = self.get_settings().filter(|s| !s.is_empty()) else {
                return Ok(());
            };
            let before = settings.len();
            let kept = retain_allowed(settings, whitelist);
            if kept.len() == before {
                return Ok(());
            }
            tracing::debug!(
                dropped = before - kept.len(),
                "Dropping settings outside the whitelist"
            );
            kept
        };
        self.store_settings(SettingsColumn::from_map(&filtered)?);
        Ok(())
    }

    /// Runs the lifecycle hooks for one persist.
    ///
    /// Call from `ActiveModelBehavior::before_save`. Filtering runs first and
    /// defaults are applied afterwards on insert, so defaults are never
    /// filtered.
    ///
    /// # Errors
    /// Propagates serialization failures from either hook.
    fn apply_settings_hooks(&mut self, insert: bool) -> Result<(), SettingsError> {
        self.on_saving()?;
        if insert {
            self.on_creating()?;
        }
        Ok(())
    }
}

fn has_any(settings: Option<&SettingsMap>) -> bool {
    settings.is_some_and(|s| !s.is_empty())
}

fn retain_allowed(settings: SettingsMap, whitelist: &dyn SettingsWhitelist) -> SettingsMap {
    settings
        .into_iter()
        .filter(|(key, _)| whitelist.permits(key))
        .collect()
}

#[cfg(test)]
#[path = "record_test.rs"]
mod record_test;
