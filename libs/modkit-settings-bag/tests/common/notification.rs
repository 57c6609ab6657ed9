use std::sync::LazyLock;

use figment::Figment;
use figment::providers::Serialized;
use modkit_settings_bag::{
    HasSettings, SettingsBagConfig, SettingsColumn, SettingsMap, SettingsPolicy,
    SettingsWhitelist,
};
use sea_orm::ConnectionTrait;
use sea_orm::entity::prelude::*;
use serde_json::json;

/// Policy for this table, as it would be read from the application config.
pub static POLICY: LazyLock<SettingsPolicy> = LazyLock::new(|| {
    let figment = Figment::new().merge(Serialized::defaults(json!({
        "settings_bag": {
            "models": {
                "notification_prefs": {
                    "defaults": { "email": true, "digest": "weekly" },
                    "allowed": ["email", "push", "digest"]
                }
            }
        }
    })));
    SettingsBagConfig::from_figment(&figment)
        .expect("notification settings policy")
        .policy_or_default("notification_prefs")
});

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "notification_prefs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: Uuid,
    #[sea_orm(column_type = "Text", nullable)]
    pub settings: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        self.apply_settings_hooks(insert)?;
        Ok(self)
    }
}

impl HasSettings for ActiveModel {
    fn raw_settings(&self) -> Option<&str> {
        SettingsColumn::read_active(&self.settings)
    }

    fn store_settings(&mut self, column: SettingsColumn) {
        column.write_active(&mut self.settings);
    }

    fn default_settings(&self) -> SettingsMap {
        POLICY.defaults.clone()
    }

    fn allowed_settings(&self) -> Option<&dyn SettingsWhitelist> {
        POLICY.whitelist()
    }
}
