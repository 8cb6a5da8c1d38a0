use anyhow::Error;
use phonebook_config::ConfigError;
use phonebook_core::{CoreError, PhoneError};
use phonebook_import::ImportError;
use phonebook_store::error::{StoreError, StoreErrorKind};
use std::process::ExitCode;
use thiserror::Error as ThisError;

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_NOT_FOUND: u8 = 2;
pub const EXIT_INVALID_INPUT: u8 = 3;
pub const EXIT_PERMISSION_DENIED: u8 = 4;

#[derive(Debug, ThisError)]
pub enum CliError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("permission denied: {0}")]
    PermissionDenied(String),
}

pub fn invalid_input(message: impl Into<String>) -> Error {
    CliError::InvalidInput(message.into()).into()
}

pub fn not_found(message: impl Into<String>) -> Error {
    CliError::NotFound(message.into()).into()
}

pub fn permission_denied(message: impl Into<String>) -> Error {
    CliError::PermissionDenied(message.into()).into()
}

pub fn report_error(err: &Error, verbose: bool) {
    if verbose {
        eprintln!("error: {:#}", err);
    } else {
        eprintln!("error: {}", err);
    }
}

pub fn exit_code_for(err: &Error) -> ExitCode {
    ExitCode::from(exit_code(err))
}

fn exit_code(err: &Error) -> u8 {
    for cause in err.chain() {
        if let Some(cli_err) = cause.downcast_ref::<CliError>() {
            return match cli_err {
                CliError::InvalidInput(_) => EXIT_INVALID_INPUT,
                CliError::NotFound(_) => EXIT_NOT_FOUND,
                CliError::PermissionDenied(_) => EXIT_PERMISSION_DENIED,
            };
        }
        if let Some(store_err) = cause.downcast_ref::<StoreError>() {
            return store_exit_code(store_err);
        }
        if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
            return config_exit_code(config_err);
        }
        if let Some(import_err) = cause.downcast_ref::<ImportError>() {
            return import_exit_code(import_err);
        }
        if cause.downcast_ref::<CoreError>().is_some() || cause.downcast_ref::<PhoneError>().is_some()
        {
            return EXIT_INVALID_INPUT;
        }
    }
    EXIT_FAILURE
}

fn store_exit_code(err: &StoreError) -> u8 {
    match err.kind() {
        StoreErrorKind::NotFound => EXIT_NOT_FOUND,
        StoreErrorKind::InvalidDataPath
        | StoreErrorKind::MissingField
        | StoreErrorKind::InvalidPhone
        | StoreErrorKind::NoValidFields
        | StoreErrorKind::Duplicate => EXIT_INVALID_INPUT,
        StoreErrorKind::MissingHomeDir
        | StoreErrorKind::Migration
        | StoreErrorKind::Sql
        | StoreErrorKind::Io => EXIT_FAILURE,
    }
}

fn config_exit_code(err: &ConfigError) -> u8 {
    match err {
        ConfigError::MissingHomeDir => EXIT_FAILURE,
        ConfigError::InvalidConfigPath(_)
        | ConfigError::MissingConfigFile(_)
        | ConfigError::InvalidPhotosDir(_)
        | ConfigError::InvalidPreviewRejections(_)
        | ConfigError::Read { .. }
        | ConfigError::Parse { .. } => EXIT_INVALID_INPUT,
    }
}

fn import_exit_code(err: &ImportError) -> u8 {
    match err {
        ImportError::Io(_) => EXIT_FAILURE,
        ImportError::Csv(_) | ImportError::MissingColumns(_) => EXIT_INVALID_INPUT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context as _;
    use phonebook_core::domain::ContactId;

    #[test]
    fn exit_codes_follow_the_first_recognised_cause() {
        let err: Error = StoreError::NotFound(ContactId(7)).into();
        assert_eq!(exit_code(&err), EXIT_NOT_FOUND);

        let wrapped = Err::<(), _>(StoreError::Duplicate("Ali Ahmadi".into()))
            .context("add contact")
            .unwrap_err();
        assert_eq!(exit_code(&wrapped), EXIT_INVALID_INPUT);

        assert_eq!(
            exit_code(&permission_denied("delete requires the admin role")),
            EXIT_PERMISSION_DENIED
        );
        assert_eq!(exit_code(&anyhow::anyhow!("boom")), EXIT_FAILURE);
    }
}
