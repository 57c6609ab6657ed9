//! Alternative accessor names for a record's settings.

/// Generate an alias for a record's settings accessors.
///
/// The first form adds an inherent method returning the record's own bag.
/// Adding `named = ...` also generates an async method that forwards to
/// [`HasSettingsRelations::settings_named`](crate::HasSettingsRelations::settings_named).
/// Invoke it in the crate that defines the record type.
///
/// # Example
/// ```rust,ignore
/// use modkit_settings_bag::settings_alias;
///
/// settings_alias!(user::ActiveModel, pub fn preferences);
/// settings_alias!(account::ActiveModel, pub fn options, named = options_of);
///
/// user.preferences().set("theme", "dark")?;
/// let bag = account.options_of::<billing::ActiveModel>("billing", &db).await?;
/// ```
#[macro_export]
macro_rules! settings_alias {
    ($ty:ty, $vis:vis fn $alias:ident) => {
        impl $ty {
            /// Alias for the record's settings bag.
            $vis fn $alias(&mut self) -> $crate::SettingsBag<'_, Self> {
                <Self as $crate::HasSettings>::settings(self)
            }
        }
    };
    ($ty:ty, $vis:vis fn $alias:ident, named = $named:ident) => {
        $crate::settings_alias!($ty, $vis fn $alias);

        impl $ty {
            /// Alias for the record's named settings groups.
            ///
            /// # Errors
            /// Fails like `HasSettingsRelations::settings_named`.
            $vis async fn $named<C>(
                &self,
                name: &str,
                db: &$crate::__private::DatabaseConnection,
            ) -> ::core::result::Result<$crate::SettingsBag<'static, C>, $crate::SettingsError>
            where
                C: $crate::HasSettings + ::core::marker::Send + 'static,
            {
                <Self as $crate::HasSettingsRelations>::settings_named::<C>(self, name, db).await
            }
        }
    };
}
