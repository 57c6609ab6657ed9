//! Named settings groups stored on related records.
//!
//! A parent record declares its settings relations once, in
//! [`HasSettingsRelations::settings_relations`]. Each relation targets a record
//! type that is itself [`HasSettings`], so a relation to a record without
//! settings cannot be registered at all.
//!
//! ```rust,ignore
//! impl HasSettingsRelations for user::ActiveModel {
//!     fn settings_relations() -> SettingsRelations<Self> {
//!         SettingsRelations::new().with(HasOne::<Self, profile::ActiveModel>::new(
//!             "profile",
//!             user::Column::Id,
//!             profile::Column::UserId,
//!         ))
//!     }
//! }
//!
//! let bag = user.settings_named::<profile::ActiveModel>("profile", &db).await?;
//! ```

use std::any::{Any, TypeId};

use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr,
    EntityTrait, IntoActiveModel, QueryFilter, Value,
};

use crate::bag::SettingsBag;
use crate::error::SettingsError;
use crate::record::HasSettings;

/// One-to-one link from a parent record to a record holding a settings group.
#[async_trait]
pub trait SettingsRelation<P>: Send + Sync
where
    P: HasSettings + Sync,
{
    type Target: HasSettings + Send + 'static;

    /// Name the settings group is requested by.
    fn name(&self) -> &'static str;

    /// Loads the record currently linked to `parent`, if any.
    async fn find_linked(
        &self,
        parent: &P,
        db: &DatabaseConnection,
    ) -> Result<Option<Self::Target>, DbErr>;

    /// Builds a new, unsaved record whose foreign key points at `parent`.
    ///
    /// # Errors
    /// Returns a configuration error when the parent's key cannot be stored
    /// in the target's foreign key.
    fn new_linked(&self, parent: &P) -> Result<Self::Target, SettingsError>;
}

/// Resolves `relation` for `parent` into a bag.
///
/// The bag wraps the linked record, or a new unsaved one when nothing is
/// linked yet. Persisting a new record is left to the caller.
///
/// # Errors
/// Returns [`SettingsError::Db`] if loading the linked record fails, or the
/// error of [`SettingsRelation::new_linked`].
pub async fn settings_via<P, R>(
    relation: &R,
    parent: &P,
    db: &DatabaseConnection,
) -> Result<SettingsBag<'static, R::Target>, SettingsError>
where
    P: HasSettings + Sync,
    R: SettingsRelation<P> + ?Sized,
{
    match relation.find_linked(parent, db).await? {
        Some(record) => Ok(SettingsBag::linked(record)),
        None => {
            tracing::debug!(
                relation = relation.name(),
                "No linked settings record; building an unsaved one"
            );
            Ok(SettingsBag::unsaved(relation.new_linked(parent)?))
        }
    }
}

#[async_trait]
trait ErasedRelation<P>: Send + Sync {
    fn name(&self) -> &'static str;

    fn target(&self) -> (TypeId, &'static str);

    async fn resolve_any(
        &self,
        parent: &P,
        db: &DatabaseConnection,
    ) -> Result<Box<dyn Any + Send>, SettingsError>;
}

#[async_trait]
impl<P, R> ErasedRelation<P> for R
where
    P: HasSettings + Sync,
    R: SettingsRelation<P>,
{
    fn name(&self) -> &'static str {
        SettingsRelation::name(self)
    }

    fn target(&self) -> (TypeId, &'static str) {
        (
            TypeId::of::<R::Target>(),
            std::any::type_name::<R::Target>(),
        )
    }

    async fn resolve_any(
        &self,
        parent: &P,
        db: &DatabaseConnection,
    ) -> Result<Box<dyn Any + Send>, SettingsError> {
        let bag = settings_via(self, parent, db).await?;
        Ok(Box::new(bag))
    }
}

/// Settings relations declared by one parent record type, looked up by name.
pub struct SettingsRelations<P> {
    relations: Vec<Box<dyn ErasedRelation<P>>>,
}

impl<P> Default for SettingsRelations<P> {
    fn default() -> Self {
        Self {
            relations: Vec::new(),
        }
    }
}

impl<P: HasSettings + Sync + 'static> SettingsRelations<P> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `relation` under its name. A later registration with the
    /// same name shadows the earlier one.
    #[must_use]
    pub fn with<R>(mut self, relation: R) -> Self
    where
        R: SettingsRelation<P> + 'static,
    {
        self.relations.insert(0, Box::new(relation));
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.relations.iter().map(|r| r.name())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    fn find(&self, name: &str) -> Option<&dyn ErasedRelation<P>> {
        self.relations
            .iter()
            .find(|r| r.name() == name)
            .map(AsRef::as_ref)
    }

    /// Resolves the relation registered under `name` into a bag over `C`.
    ///
    /// The relation must exist and target `C`; both are checked before any
    /// database access.
    ///
    /// # Errors
    /// - [`SettingsError::NotAvailable`] if no relation is registered under `name`
    /// - [`SettingsError::TargetMismatch`] if the relation targets another type
    /// - [`SettingsError::Db`] if loading the linked record fails
    pub async fn resolve<C>(
        &self,
        parent: &P,
        name: &str,
        db: &DatabaseConnection,
    ) -> Result<SettingsBag<'static, C>, SettingsError>
    where
        C: HasSettings + Send + 'static,
    {
        let Some(relation) = self.find(name) else {
            return Err(SettingsError::not_available::<P>(name));
        };

        let (target, registered) = relation.target();
        if target != TypeId::of::<C>() {
            return Err(SettingsError::TargetMismatch {
                setting: name.to_owned(),
                model: std::any::type_name::<P>(),
                registered,
                requested: std::any::type_name::<C>(),
            });
        }

        let resolved = relation.resolve_any(parent, db).await?;
        match resolved.downcast::<SettingsBag<'static, C>>() {
            Ok(bag) => Ok(*bag),
            // TypeId matched above, so the bag always has type C
            Err(_) => Err(SettingsError::TargetMismatch {
                setting: name.to_owned(),
                model: std::any::type_name::<P>(),
                registered,
                requested: std::any::type_name::<C>(),
            }),
        }
    }
}

impl<P> std::fmt::Debug for SettingsRelations<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.relations.iter().map(|r| r.name()))
            .finish()
    }
}

/// Parent records that expose named settings groups.
#[async_trait]
pub trait HasSettingsRelations: HasSettings + Sized + Send + Sync + 'static {
    /// Declares the settings relations of this record type.
    fn settings_relations() -> SettingsRelations<Self>;

    /// Bag over the settings group `name`, stored on a related record.
    ///
    /// # Errors
    /// See [`SettingsRelations::resolve`].
    async fn settings_named<C>(
        &self,
        name: &str,
        db: &DatabaseConnection,
    ) -> Result<SettingsBag<'static, C>, SettingsError>
    where
        C: HasSettings + Send + 'static,
    {
        Self::settings_relations().resolve(self, name, db).await
    }
}

/// `SeaORM` one-to-one settings relation keyed by a foreign key column.
///
/// The linked record is the first `C` row whose `foreign_key` equals the
/// parent's `owner_key`. New records come from `ActiveModelBehavior::new`
/// with the foreign key set.
///
/// A parent whose `owner_key` is `NotSet` (not inserted yet, auto-increment
/// key) has no linked record, and the new record's foreign key is left
/// `NotSet` for the caller to fill in.
pub struct HasOne<P, C>
where
    P: ActiveModelTrait,
    C: ActiveModelTrait,
{
    name: &'static str,
    owner_key: <P::Entity as EntityTrait>::Column,
    foreign_key: <C::Entity as EntityTrait>::Column,
}

impl<P, C> HasOne<P, C>
where
    P: ActiveModelTrait,
    C: ActiveModelTrait,
{
    #[must_use]
    pub fn new(
        name: &'static str,
        owner_key: <P::Entity as EntityTrait>::Column,
        foreign_key: <C::Entity as EntityTrait>::Column,
    ) -> Self {
        Self {
            name,
            owner_key,
            foreign_key,
        }
    }

    fn owner_key_value(&self, parent: &P) -> Option<Value> {
        match parent.get(self.owner_key) {
            ActiveValue::Set(v) | ActiveValue::Unchanged(v) => Some(v),
            ActiveValue::NotSet => None,
        }
    }
}

#[async_trait]
impl<P, C> SettingsRelation<P> for HasOne<P, C>
where
    P: ActiveModelTrait + HasSettings + Send + Sync,
    C: ActiveModelTrait + ActiveModelBehavior + HasSettings + Send + 'static,
    <C::Entity as EntityTrait>::Model: IntoActiveModel<C>,
{
    type Target = C;

    fn name(&self) -> &'static str {
        self.name
    }

    async fn find_linked(&self, parent: &P, db: &DatabaseConnection) -> Result<Option<C>, DbErr> {
        let Some(key) = self.owner_key_value(parent) else {
            tracing::debug!(relation = self.name, "Parent key not set; no linked record");
            return Ok(None);
        };
        let linked = <C::Entity as EntityTrait>::find()
            .filter(self.foreign_key.eq(key))
            .one(db)
            .await?;
        Ok(linked.map(IntoActiveModel::into_active_model))
    }

    fn new_linked(&self, parent: &P) -> Result<C, SettingsError> {
        let mut record = <C as ActiveModelBehavior>::new();
        let Some(key) = self.owner_key_value(parent) else {
            tracing::debug!(
                relation = self.name,
                "Parent key not set; new linked record has no foreign key"
            );
            return Ok(record);
        };
        record
            .try_set(self.foreign_key, key)
            .map_err(|source| SettingsError::ForeignKey {
                setting: self.name.to_owned(),
                model: std::any::type_name::<P>(),
                source,
            })?;
        Ok(record)
    }
}
