use modkit_settings_bag::{HasSettings, SettingsColumn, SettingsWhitelist};
use sea_orm::ConnectionTrait;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
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

/// Profiles keep only public-facing keys.
impl HasSettings for ActiveModel {
    fn raw_settings(&self) -> Option<&str> {
        SettingsColumn::read_active(&self.settings)
    }

    fn store_settings(&mut self, column: SettingsColumn) {
        column.write_active(&mut self.settings);
    }

    fn allowed_settings(&self) -> Option<&dyn SettingsWhitelist> {
        Some(&["bio", "avatar", "visibility"])
    }
}
