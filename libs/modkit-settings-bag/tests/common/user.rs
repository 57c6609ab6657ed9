use modkit_settings_bag::{
    HasOne, HasSettings, HasSettingsRelations, SettingsColumn, SettingsMap, SettingsRelations,
    settings_alias,
};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, ConnectionTrait};
use serde_json::json;

use super::{notification, profile};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub email: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub settings: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            id: ActiveValue::Set(Uuid::new_v4()),
            ..<Self as ActiveModelTrait>::default()
        }
    }

    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        self.apply_settings_hooks(insert)?;
        Ok(self)
    }
}

/// Users get a light theme by default and may store any key.
impl HasSettings for ActiveModel {
    fn raw_settings(&self) -> Option<&str> {
        SettingsColumn::read_active(&self.settings)
    }

    fn store_settings(&mut self, column: SettingsColumn) {
        column.write_active(&mut self.settings);
    }

    fn default_settings(&self) -> SettingsMap {
        SettingsMap::from_iter([("theme".to_owned(), json!("light"))])
    }
}

impl HasSettingsRelations for ActiveModel {
    fn settings_relations() -> SettingsRelations<Self> {
        SettingsRelations::new()
            .with(HasOne::<Self, profile::ActiveModel>::new(
                "profile",
                Column::Id,
                profile::Column::UserId,
            ))
            .with(HasOne::<Self, notification::ActiveModel>::new(
                "notifications",
                Column::Id,
                notification::Column::UserId,
            ))
    }
}

settings_alias!(ActiveModel, pub fn preferences, named = preferences_of);
