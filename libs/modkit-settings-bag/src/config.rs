//! Settings declarations loaded from configuration.

use std::collections::{BTreeSet, HashMap};

use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::column::SettingsMap;
use crate::error::SettingsError;
use crate::record::SettingsWhitelist;

/// Defaults and whitelist of one record type.
///
/// A record type can return these from [`HasSettings::default_settings`] and
/// [`HasSettings::allowed_settings`] instead of hard-coding them.
///
/// [`HasSettings::default_settings`]: crate::HasSettings::default_settings
/// [`HasSettings::allowed_settings`]: crate::HasSettings::allowed_settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsPolicy {
    /// Settings applied at creation when none are supplied.
    pub defaults: SettingsMap,
    /// Keys permitted to survive a save; absent means unrestricted.
    pub allowed: Option<BTreeSet<String>>,
}

impl SettingsPolicy {
    #[must_use]
    pub fn whitelist(&self) -> Option<&dyn SettingsWhitelist> {
        self.allowed.as_ref().map(|a| a as &dyn SettingsWhitelist)
    }

    /// Default keys the whitelist would drop on the next save.
    #[must_use]
    pub fn unreachable_defaults(&self) -> Vec<&str> {
        let Some(allowed) = &self.allowed else {
            return Vec::new();
        };
        self.defaults
            .keys()
            .filter(|k| !allowed.contains(k.as_str()))
            .map(String::as_str)
            .collect()
    }
}

/// Settings policies keyed by model name.
///
/// ```yaml
/// settings_bag:
///   models:
///     users:
///       defaults: { theme: light }
///     profiles:
///       allowed: [bio, avatar, visibility]
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsBagConfig {
    pub models: HashMap<String, SettingsPolicy>,
}

impl SettingsBagConfig {
    /// Configuration section the policies are read from.
    pub const SECTION: &'static str = "settings_bag";

    /// Extracts the [`Self::SECTION`] section; a missing section yields the
    /// empty configuration.
    ///
    /// # Errors
    /// Returns [`SettingsError::Config`] if the section is malformed.
    pub fn from_figment(figment: &Figment) -> Result<Self, SettingsError> {
        if !figment.contains(Self::SECTION) {
            tracing::debug!(section = Self::SECTION, "No settings bag configuration");
            return Ok(Self::default());
        }

        let config: Self = figment.extract_inner(Self::SECTION)?;
        for (model, policy) in &config.models {
            let unreachable = policy.unreachable_defaults();
            if !unreachable.is_empty() {
                tracing::warn!(
                    model = %model,
                    keys = ?unreachable,
                    "Default settings outside the whitelist will be dropped on update"
                );
            }
        }
        Ok(config)
    }

    #[must_use]
    pub fn policy(&self, model: &str) -> Option<&SettingsPolicy> {
        self.models.get(model)
    }

    /// Policy for `model`, or an unrestricted policy without defaults.
    #[must_use]
    pub fn policy_or_default(&self, model: &str) -> SettingsPolicy {
        self.policy(model).cloned().unwrap_or_default()
    }
}
