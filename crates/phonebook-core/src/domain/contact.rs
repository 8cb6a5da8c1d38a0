use crate::domain::ids::ContactId;
use crate::domain::phone::validate_phone;
use crate::error::CoreError;
use crate::rules::missing_required_fields;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A phonebook entry. Optional text fields are stored as empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub first_name: String,
    pub last_name: String,
    pub group_name: String,
    pub position: String,
    pub email: String,
    pub phone: String,
    pub photo_path: String,
}

impl Contact {
    pub fn value(&self, field: ContactField) -> &str {
        match field {
            ContactField::FirstName => &self.first_name,
            ContactField::LastName => &self.last_name,
            ContactField::GroupName => &self.group_name,
            ContactField::Position => &self.position,
            ContactField::Email => &self.email,
            ContactField::Phone => &self.phone,
            ContactField::PhotoPath => &self.photo_path,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    fn value_mut(&mut self, field: ContactField) -> &mut String {
        match field {
            ContactField::FirstName => &mut self.first_name,
            ContactField::LastName => &mut self.last_name,
            ContactField::GroupName => &mut self.group_name,
            ContactField::Position => &mut self.position,
            ContactField::Email => &mut self.email,
            ContactField::Phone => &mut self.phone,
            ContactField::PhotoPath => &mut self.photo_path,
        }
    }

    /// Trims every text field, rejects blank required fields and rewrites the
    /// phone into its canonical form.
    pub fn normalize(&mut self) -> Result<(), CoreError> {
        self.normalize_fields(&ContactField::ALL)
    }

    /// Same checks as [`Contact::normalize`], limited to `fields`. Everything
    /// else is left exactly as stored.
    pub fn normalize_fields(&mut self, fields: &[ContactField]) -> Result<(), CoreError> {
        for field in fields {
            let value = self.value_mut(*field);
            let trimmed = value.trim();
            if trimmed.len() != value.len() {
                *value = trimmed.to_string();
            }
        }

        if let Some(field) = missing_required_fields(|field| Some(self.value(field)))
            .into_iter()
            .find(|field| fields.contains(field))
        {
            return Err(CoreError::MissingField(field));
        }

        if fields.contains(&ContactField::Phone) {
            self.phone = validate_phone(&self.phone)?;
        }
        Ok(())
    }
}

/// The seven writable contact columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactField {
    FirstName,
    LastName,
    GroupName,
    Position,
    Email,
    Phone,
    PhotoPath,
}

impl ContactField {
    pub const ALL: [ContactField; 7] = [
        ContactField::FirstName,
        ContactField::LastName,
        ContactField::GroupName,
        ContactField::Position,
        ContactField::Email,
        ContactField::Phone,
        ContactField::PhotoPath,
    ];

    pub const REQUIRED: [ContactField; 4] = [
        ContactField::FirstName,
        ContactField::LastName,
        ContactField::GroupName,
        ContactField::Phone,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ContactField::FirstName => "first_name",
            ContactField::LastName => "last_name",
            ContactField::GroupName => "group_name",
            ContactField::Position => "position",
            ContactField::Email => "email",
            ContactField::Phone => "phone",
            ContactField::PhotoPath => "photo_path",
        }
    }

    /// Looks up a field by its column name. Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|field| field.as_str() == name)
    }

    pub fn is_required(self) -> bool {
        Self::REQUIRED.contains(&self)
    }
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column used to order full listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    Id,
    FirstName,
    #[default]
    LastName,
    GroupName,
    Position,
    Email,
    Phone,
}

impl SortColumn {
    pub const ALL: [SortColumn; 7] = [
        SortColumn::Id,
        SortColumn::FirstName,
        SortColumn::LastName,
        SortColumn::GroupName,
        SortColumn::Position,
        SortColumn::Email,
        SortColumn::Phone,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortColumn::Id => "id",
            SortColumn::FirstName => "first_name",
            SortColumn::LastName => "last_name",
            SortColumn::GroupName => "group_name",
            SortColumn::Position => "position",
            SortColumn::Email => "email",
            SortColumn::Phone => "phone",
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|column| column.as_str() == name)
            .ok_or_else(|| format!("unknown sort column: {name}"))
    }
}
