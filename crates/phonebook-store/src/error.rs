use phonebook_core::{ContactField, ContactId, CoreError, PhoneError};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("sqlite error: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid data path: {0}")]
    InvalidDataPath(PathBuf),
    #[error("migration error: {0}")]
    Migration(String),
    #[error("missing required field: {0}")]
    MissingField(ContactField),
    #[error("invalid phone: {0}")]
    InvalidPhone(PhoneError),
    #[error("no valid fields to update")]
    NoValidFields,
    #[error("contact not found: {0}")]
    NotFound(ContactId),
    #[error("contact already exists: {0}")]
    Duplicate(String),
}

impl From<CoreError> for StoreError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::MissingField(field) => StoreError::MissingField(field),
            CoreError::InvalidPhone(err) => StoreError::InvalidPhone(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    Io,
    Sql,
    MissingHomeDir,
    InvalidDataPath,
    Migration,
    MissingField,
    InvalidPhone,
    NoValidFields,
    NotFound,
    Duplicate,
}

impl StoreError {
    pub fn kind(&self) -> StoreErrorKind {
        match self {
            StoreError::Io(_) => StoreErrorKind::Io,
            StoreError::Sql(_) => StoreErrorKind::Sql,
            StoreError::MissingHomeDir => StoreErrorKind::MissingHomeDir,
            StoreError::InvalidDataPath(_) => StoreErrorKind::InvalidDataPath,
            StoreError::Migration(_) => StoreErrorKind::Migration,
            StoreError::MissingField(_) => StoreErrorKind::MissingField,
            StoreError::InvalidPhone(_) => StoreErrorKind::InvalidPhone,
            StoreError::NoValidFields => StoreErrorKind::NoValidFields,
            StoreError::NotFound(_) => StoreErrorKind::NotFound,
            StoreError::Duplicate(_) => StoreErrorKind::Duplicate,
        }
    }
}
