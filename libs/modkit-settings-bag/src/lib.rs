#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! `ModKit` settings bag.
//!
//! Attaches a JSON `settings` attribute to `SeaORM` records:
//!
//! - [`HasSettings`] marks a record (normally an `ActiveModel`) as owning a
//!   nullable JSON text column, with optional defaults and key whitelist.
//! - [`HasSettings::apply_settings_hooks`] is called from
//!   `ActiveModelBehavior::before_save` to apply defaults on insert and drop
//!   non-whitelisted keys on every save.
//! - [`SettingsBag`] is the read/write view returned by
//!   [`HasSettings::settings`].
//! - [`HasSettingsRelations`] exposes named settings groups stored on related
//!   records, resolved through [`SettingsRelations`] and [`HasOne`].
//! - [`SettingsColumn`] converts between the stored text and [`SettingsMap`].
//! - [`SettingsBagConfig`] loads per-model [`SettingsPolicy`] declarations
//!   from `figment`.
//!
//! # Example
//! ```rust
//! use modkit_settings_bag::{HasSettings, SettingsColumn, SettingsMap, SettingsWhitelist};
//! use serde_json::json;
//!
//! #[derive(Default)]
//! struct Record {
//!     settings: Option<String>,
//! }
//!
//! impl HasSettings for Record {
//!     fn raw_settings(&self) -> Option<&str> {
//!         self.settings.as_deref()
//!     }
//!
//!     fn store_settings(&mut self, column: SettingsColumn) {
//!         self.settings = column.into_inner();
//!     }
//!
//!     fn default_settings(&self) -> SettingsMap {
//!         SettingsMap::from_iter([("theme".to_owned(), json!("light"))])
//!     }
//!
//!     fn allowed_settings(&self) -> Option<&dyn SettingsWhitelist> {
//!         Some(&["theme", "language"])
//!     }
//! }
//!
//! let mut record = Record::default();
//! record.apply_settings_hooks(true).unwrap();
//! assert_eq!(record.settings().get("theme"), Some(json!("light")));
//!
//! record.settings().set("beta", true).unwrap();
//! record.apply_settings_hooks(false).unwrap();
//! assert!(!record.settings().has("beta"));
//! ```

mod alias;
pub mod bag;
pub mod column;
pub mod config;
pub mod error;
pub mod record;
pub mod relation;

pub use bag::SettingsBag;
pub use column::{SettingsColumn, SettingsMap};
pub use config::{SettingsBagConfig, SettingsPolicy};
pub use error::SettingsError;
pub use record::{HasSettings, SettingsWhitelist};
pub use relation::{HasOne, HasSettingsRelations, SettingsRelation, SettingsRelations, settings_via};

#[doc(hidden)]
pub mod __private {
    pub use sea_orm::DatabaseConnection;
}
