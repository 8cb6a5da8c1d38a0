use anyhow::Result;
use phonebook_config::AppConfig;
use phonebook_core::Role;
use phonebook_store::Store;
use serde::Serialize;
use std::io::{self, Write};

use crate::error::permission_denied;
use crate::photos::PhotoStore;

pub mod completions;
pub mod contacts;
pub mod import;

pub struct Context<'a> {
    pub store: &'a Store,
    pub json: bool,
    pub config: &'a AppConfig,
    pub role: Role,
    pub photos: &'a dyn PhotoStore,
}

impl Context<'_> {
    /// Fails unless the session role may change the phonebook.
    pub fn require_admin(&self, action: &str) -> Result<()> {
        if self.role.can_mutate() {
            Ok(())
        } else {
            Err(permission_denied(format!(
                "{action} requires the admin role (run with --admin)"
            )))
        }
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
