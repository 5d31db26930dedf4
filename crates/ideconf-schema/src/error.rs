use thiserror::Error;

/// Problems with a catalog entry. Each one excludes that entry from the
/// generated schema; generation carries on with the others.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("identifier '{identifier}' is empty once its suffixes are removed")]
    EmptyIdentifier { identifier: String },

    #[error("identifier '{identifier}' contains unsafe character {character:?}")]
    UnsafeIdentifier { identifier: String, character: char },

    #[error("configuration type '{type_id}' has no factories")]
    NoFactories { type_id: String },

    #[error("'{identifier}' maps to '{name}', which is already defined")]
    DuplicateName { identifier: String, name: String },
}

pub type Result<T> = std::result::Result<T, SchemaError>;
