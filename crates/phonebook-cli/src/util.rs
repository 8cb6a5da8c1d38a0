use anyhow::Result;
use phonebook_core::domain::{Contact, ContactId};
use std::str::FromStr;

use crate::error::invalid_input;

pub fn parse_contact_id(raw: &str) -> Result<ContactId> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(invalid_input("contact id cannot be empty"));
    }
    ContactId::from_str(trimmed).map_err(|_| invalid_input(format!("invalid contact id: {trimmed}")))
}

/// Parses a `field=value` assignment. The value may be empty.
pub fn parse_assignment(raw: &str) -> Result<(String, String)> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| invalid_input(format!("expected field=value, got {raw}")))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(invalid_input(format!("field name cannot be empty in {raw}")));
    }
    Ok((name.to_string(), value.to_string()))
}

pub fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

pub fn contact_line(contact: &Contact) -> String {
    format!(
        "{}  {}  [{}]  {}",
        contact.id,
        contact.full_name(),
        contact.group_name,
        contact.phone
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_assignment_splits_on_first_equals() {
        assert_eq!(
            parse_assignment("email=a=b@example.com").expect("parse"),
            ("email".to_string(), "a=b@example.com".to_string())
        );
        assert_eq!(
            parse_assignment(" position =").expect("parse"),
            ("position".to_string(), String::new())
        );
        assert!(parse_assignment("email").is_err());
        assert!(parse_assignment("=value").is_err());
    }

    #[test]
    fn parse_contact_id_rejects_garbage() {
        assert_eq!(parse_contact_id(" 12 ").expect("id"), ContactId(12));
        assert!(parse_contact_id("").is_err());
        assert!(parse_contact_id("abc").is_err());
    }
}
