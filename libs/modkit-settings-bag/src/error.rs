use sea_orm::DbErr;

/// Errors raised by settings bag operations.
#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    /// No settings relation is registered under the requested name.
    #[error("{setting} setting not available on {model} model")]
    NotAvailable { setting: String, model: &'static str },

    /// The relation exists but holds a different record type than requested.
    #[error("{setting} setting on {model} model holds {registered}, not {requested}")]
    TargetMismatch {
        setting: String,
        model: &'static str,
        registered: &'static str,
        requested: &'static str,
    },

    /// The relation's foreign key cannot hold the parent's key value.
    #[error("{setting} setting on {model} model has an incompatible foreign key: {source}")]
    ForeignKey {
        setting: String,
        model: &'static str,
        #[source]
        source: DbErr,
    },

    /// Settings value could not be converted to or from JSON.
    #[error("settings serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Database error while resolving a related record.
    #[error("database error: {0}")]
    Db(#[from] DbErr),

    /// Settings policy configuration could not be loaded.
    #[error("invalid settings configuration: {0}")]
    Config(#[from] figment::Error),
}

impl SettingsError {
    pub(crate) fn not_available<P: ?Sized>(setting: &str) -> Self {
        Self::NotAvailable {
            setting: setting.to_owned(),
            model: std::any::type_name::<P>(),
        }
    }

    /// True for errors caused by a wrong relation declaration or lookup,
    /// as opposed to data or I/O failures.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::NotAvailable { .. } | Self::TargetMismatch { .. } | Self::ForeignKey { .. }
        )
    }
}

impl From<SettingsError> for DbErr {
    fn from(err: SettingsError) -> Self {
        match err {
            SettingsError::Db(db) => db,
            other => DbErr::Custom(other.to_string()),
        }
    }
}
