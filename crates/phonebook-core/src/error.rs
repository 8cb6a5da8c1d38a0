use crate::domain::{ContactField, PhoneError};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("missing required field: {0}")]
    MissingField(ContactField),
    #[error(transparent)]
    InvalidPhone(#[from] PhoneError),
}
