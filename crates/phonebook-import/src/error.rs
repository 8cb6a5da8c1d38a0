use phonebook_core::ContactField;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing required columns: {}", join_fields(.0))]
    MissingColumns(Vec<ContactField>),
}

pub type Result<T> = std::result::Result<T, ImportError>;

pub(crate) fn join_fields(fields: &[ContactField]) -> String {
    fields
        .iter()
        .map(|field| field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
