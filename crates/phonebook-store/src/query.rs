use phonebook_core::{ContactField, SortColumn};
use rusqlite::types::Value;

pub(crate) const CONTACT_COLUMNS: &str =
    "id, first_name, last_name, group_name, position, email, phone, photo_path";

/// Substring filters for contact search. Every non-empty filter must match
/// (case-sensitive containment); `None` and empty strings are ignored.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ContactSearch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub group_name: Option<String>,
    pub position: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

pub struct SqlQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

impl ContactSearch {
    pub fn terms(&self) -> Vec<(ContactField, &str)> {
        [
            (ContactField::FirstName, &self.first_name),
            (ContactField::LastName, &self.last_name),
            (ContactField::GroupName, &self.group_name),
            (ContactField::Position, &self.position),
            (ContactField::Email, &self.email),
            (ContactField::Phone, &self.phone),
        ]
        .into_iter()
        .filter_map(|(field, value)| match value.as_deref() {
            Some(value) if !value.is_empty() => Some((field, value)),
            _ => None,
        })
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.terms().is_empty()
    }

    pub fn to_sql(&self) -> SqlQuery {
        let mut clauses: Vec<String> = Vec::new();
        let mut params: Vec<Value> = Vec::new();

        for (field, value) in self.terms() {
            clauses.push(format!("instr({}, ?) > 0", field.as_str()));
            params.push(Value::from(value.to_string()));
        }

        let mut sql = format!("SELECT {CONTACT_COLUMNS} FROM contacts");
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(&order_by(SortColumn::LastName));

        SqlQuery { sql, params }
    }
}

pub fn list_sql(sort: SortColumn) -> String {
    format!("SELECT {CONTACT_COLUMNS} FROM contacts{}", order_by(sort))
}

fn order_by(sort: SortColumn) -> String {
    match sort {
        SortColumn::Id => " ORDER BY id ASC;".to_string(),
        column => format!(" ORDER BY {} ASC, id ASC;", column.as_str()),
    }
}
