use crate::error::{Result, StoreError};
use crate::query::{list_sql, ContactSearch, CONTACT_COLUMNS};
use crate::Store;
use phonebook_core::{Contact, ContactField, ContactId, SortColumn};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

/// Payload for a new contact. Required text fields are empty when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactNew {
    pub first_name: String,
    pub last_name: String,
    pub group_name: String,
    pub position: Option<String>,
    pub email: Option<String>,
    pub phone: String,
    pub photo_path: Option<String>,
}

/// Partial update. `None` leaves a column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub group_name: Option<String>,
    pub position: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub photo_path: Option<String>,
}

impl ContactUpdate {
    /// Builds an update from `(column, value)` pairs. Names that are not
    /// contact columns are dropped.
    pub fn from_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut update = ContactUpdate::default();
        for (name, value) in fields {
            if let Some(field) = ContactField::parse(name.as_ref()) {
                update.set(field, value.into());
            }
        }
        update
    }

    pub fn set(&mut self, field: ContactField, value: String) {
        let slot = match field {
            ContactField::FirstName => &mut self.first_name,
            ContactField::LastName => &mut self.last_name,
            ContactField::GroupName => &mut self.group_name,
            ContactField::Position => &mut self.position,
            ContactField::Email => &mut self.email,
            ContactField::Phone => &mut self.phone,
            ContactField::PhotoPath => &mut self.photo_path,
        };
        *slot = Some(value);
    }

    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.group_name.is_none()
            && self.position.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.photo_path.is_none()
    }

    /// Writes the present values into `contact` and returns the fields that
    /// were touched.
    fn apply_to(self, contact: &mut Contact) -> Vec<ContactField> {
        let values = [
            (ContactField::FirstName, self.first_name),
            (ContactField::LastName, self.last_name),
            (ContactField::GroupName, self.group_name),
            (ContactField::Position, self.position),
            (ContactField::Email, self.email),
            (ContactField::Phone, self.phone),
            (ContactField::PhotoPath, self.photo_path),
        ];
        let mut touched = Vec::new();
        for (field, value) in values {
            if let Some(value) = value {
                set_field(contact, field, value);
                touched.push(field);
            }
        }
        touched
    }
}

fn set_field(contact: &mut Contact, field: ContactField, value: String) {
    let slot = match field {
        ContactField::FirstName => &mut contact.first_name,
        ContactField::LastName => &mut contact.last_name,
        ContactField::GroupName => &mut contact.group_name,
        ContactField::Position => &mut contact.position,
        ContactField::Email => &mut contact.email,
        ContactField::Phone => &mut contact.phone,
        ContactField::PhotoPath => &mut contact.photo_path,
    };
    *slot = value;
}

pub struct ContactsRepo<'a> {
    store: &'a Store,
}

impl<'a> ContactsRepo<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Validates and inserts a contact, returning it with its new id.
    pub fn create(&self, input: ContactNew) -> Result<Contact> {
        let mut contact = Contact {
            id: ContactId(0),
            first_name: input.first_name,
            last_name: input.last_name,
            group_name: input.group_name,
            position: input.position.unwrap_or_default(),
            email: input.email.unwrap_or_default(),
            phone: input.phone,
            photo_path: input.photo_path.unwrap_or_default(),
        };
        contact.normalize()?;

        let mut conn = self.store.connect()?;
        let tx = conn.transaction()?;
        ensure_unique(&tx, &contact)?;
        tx.execute(
            "INSERT INTO contacts (first_name, last_name, group_name, position, email, phone, photo_path)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                contact.first_name,
                contact.last_name,
                contact.group_name,
                contact.position,
                contact.email,
                contact.phone,
                contact.photo_path,
            ],
        )?;
        contact.id = ContactId(tx.last_insert_rowid());
        tx.commit()?;
        Ok(contact)
    }

    pub fn get(&self, id: ContactId) -> Result<Option<Contact>> {
        let conn = self.store.connect()?;
        get_inner(&conn, id)
    }

    pub fn list_all(&self, sort: SortColumn) -> Result<Vec<Contact>> {
        let conn = self.store.connect()?;
        let mut stmt = conn.prepare(&list_sql(sort))?;
        let mut rows = stmt.query([])?;
        let mut contacts = Vec::new();
        while let Some(row) = rows.next()? {
            contacts.push(contact_from_row(row)?);
        }
        Ok(contacts)
    }

    pub fn search(&self, search: &ContactSearch) -> Result<Vec<Contact>> {
        let compiled = search.to_sql();
        let conn = self.store.connect()?;
        let mut stmt = conn.prepare(&compiled.sql)?;
        let mut rows = stmt.query(params_from_iter(compiled.params))?;
        let mut contacts = Vec::new();
        while let Some(row) = rows.next()? {
            contacts.push(contact_from_row(row)?);
        }
        Ok(contacts)
    }

    pub fn count(&self) -> Result<i64> {
        let conn = self.store.connect()?;
        let count = conn.query_row("SELECT COUNT(*) FROM contacts;", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Applies a partial update and returns the stored contact.
    pub fn update(&self, id: ContactId, update: ContactUpdate) -> Result<Contact> {
        if update.is_empty() {
            return Err(StoreError::NoValidFields);
        }

        let mut conn = self.store.connect()?;
        let tx = conn.transaction()?;
        let mut contact = get_inner(&tx, id)?.ok_or(StoreError::NotFound(id))?;
        let before = identity(&contact);
        let touched = update.apply_to(&mut contact);
        contact.normalize_fields(&touched)?;
        if identity(&contact) != before {
            ensure_unique(&tx, &contact)?;
        }

        let changed = tx
            .execute(
                "UPDATE contacts
                 SET first_name = ?2, last_name = ?3, group_name = ?4, position = ?5, email = ?6, phone = ?7, photo_path = ?8
                 WHERE id = ?1;",
                params![
                    contact.id.as_i64(),
                    contact.first_name,
                    contact.last_name,
                    contact.group_name,
                    contact.position,
                    contact.email,
                    contact.phone,
                    contact.photo_path,
                ],
            )?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        tx.commit()?;
        Ok(contact)
    }

    /// Removes a contact and returns the deleted row.
    pub fn delete(&self, id: ContactId) -> Result<Contact> {
        let mut conn = self.store.connect()?;
        let tx = conn.transaction()?;
        let contact = get_inner(&tx, id)?.ok_or(StoreError::NotFound(id))?;
        let deleted = tx.execute("DELETE FROM contacts WHERE id = ?1;", [id.as_i64()])?;
        if deleted == 0 {
            return Err(StoreError::NotFound(id));
        }
        tx.commit()?;
        Ok(contact)
    }
}

fn get_inner(conn: &Connection, id: ContactId) -> Result<Option<Contact>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = ?1;"
    ))?;
    let mut rows = stmt.query([id.as_i64()])?;
    if let Some(row) = rows.next()? {
        Ok(Some(contact_from_row(row)?))
    } else {
        Ok(None)
    }
}

fn identity(contact: &Contact) -> (String, String, String) {
    (
        contact.first_name.clone(),
        contact.last_name.clone(),
        contact.phone.clone(),
    )
}

// Older databases may already hold duplicates, so identity is checked here
// rather than by a unique index.
fn ensure_unique(conn: &Connection, contact: &Contact) -> Result<()> {
    let existing: Option<i64> = conn
        .query_row(
            "SELECT id FROM contacts
             WHERE first_name = ?1 AND last_name = ?2 AND phone = ?3 AND id != ?4
             LIMIT 1;",
            params![
                contact.first_name,
                contact.last_name,
                contact.phone,
                contact.id.as_i64(),
            ],
            |row| row.get(0),
        )
        .optional()?;
    match existing {
        Some(_) => Err(StoreError::Duplicate(format!(
            "{} ({})",
            contact.full_name(),
            contact.phone
        ))),
        None => Ok(()),
    }
}

// Rows written by older versions may carry NULL in the optional columns.
fn contact_from_row(row: &rusqlite::Row<'_>) -> Result<Contact> {
    let optional = |index: usize| -> rusqlite::Result<String> {
        Ok(row.get::<_, Option<String>>(index)?.unwrap_or_default())
    };
    Ok(Contact {
        id: ContactId(row.get(0)?),
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        group_name: row.get(3)?,
        position: optional(4)?,
        email: optional(5)?,
        phone: row.get(6)?,
        photo_path: optional(7)?,
    })
}
