//! CSV bulk-import validation.
//!
//! The header names the columns; only the required ones must be present and
//! their order is free. Every data row is either accepted as a contact payload
//! (with a canonical phone) or rejected with a reason. Rejections never stop
//! the remaining rows from being checked.

use crate::error::{join_fields, ImportError, Result};
use csv::{ReaderBuilder, StringRecord};
use phonebook_core::{missing_required_fields, validate_phone, ContactField};
use phonebook_store::repo::ContactNew;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

const IMPORT_COLUMNS: [ContactField; 6] = [
    ContactField::FirstName,
    ContactField::LastName,
    ContactField::GroupName,
    ContactField::Position,
    ContactField::Email,
    ContactField::Phone,
];

#[derive(Debug, Clone, Default)]
pub struct ParsedCsv {
    pub accepted: Vec<ContactNew>,
    pub rejections: Vec<RowError>,
}

/// A rejected data row. Rows are numbered from 1, header excluded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowError {
    pub row: usize,
    pub reason: RowRejection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum RowRejection {
    EmptyFields(Vec<ContactField>),
    InvalidPhone(String),
    Malformed(String),
}

impl fmt::Display for RowRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowRejection::EmptyFields(fields) => write!(f, "empty: {}", join_fields(fields)),
            RowRejection::InvalidPhone(raw) => write!(f, "invalid phone: {raw}"),
            RowRejection::Malformed(message) => write!(f, "malformed: {message}"),
        }
    }
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}: {}", self.row, self.reason)
    }
}

pub fn parse_csv_file(path: &Path) -> Result<ParsedCsv> {
    let data = fs::read(path)?;
    parse_csv_bytes(&data)
}

pub fn parse_csv(text: &str) -> Result<ParsedCsv> {
    parse_csv_bytes(text.as_bytes())
}

/// Like [`parse_csv`] for raw bytes. A row that is not valid UTF-8 is
/// rejected as malformed; the rest of the file is still read.
pub fn parse_csv_bytes(data: &[u8]) -> Result<ParsedCsv> {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data);
    let mut records = reader.records();

    let header = match records.next() {
        Some(header) => header?,
        None => return Err(ImportError::MissingColumns(ContactField::REQUIRED.to_vec())),
    };
    let columns = column_positions(&header);

    let missing: Vec<ContactField> = ContactField::REQUIRED
        .into_iter()
        .filter(|field| !columns.contains_key(field))
        .collect();
    if !missing.is_empty() {
        return Err(ImportError::MissingColumns(missing));
    }

    let mut parsed = ParsedCsv::default();
    for (index, record) in records.enumerate() {
        let row = index + 1;
        let outcome = match record {
            Ok(record) => validate_row(&columns, &record),
            Err(err) => Err(RowRejection::Malformed(err.to_string())),
        };
        match outcome {
            Ok(contact) => parsed.accepted.push(contact),
            Err(reason) => parsed.rejections.push(RowError { row, reason }),
        }
    }
    Ok(parsed)
}

fn column_positions(header: &StringRecord) -> HashMap<ContactField, usize> {
    let mut columns = HashMap::new();
    for (index, name) in header.iter().enumerate() {
        if let Some(field) = ContactField::parse(name) {
            if IMPORT_COLUMNS.contains(&field) {
                columns.entry(field).or_insert(index);
            }
        }
    }
    columns
}

fn validate_row(
    columns: &HashMap<ContactField, usize>,
    record: &StringRecord,
) -> std::result::Result<ContactNew, RowRejection> {
    let lookup = |field: ContactField| -> Option<&str> {
        columns.get(&field).and_then(|index| record.get(*index))
    };
    let value = |field: ContactField| lookup(field).unwrap_or_default().trim().to_string();

    let missing = missing_required_fields(&lookup);
    if !missing.is_empty() {
        return Err(RowRejection::EmptyFields(missing));
    }

    let raw_phone = value(ContactField::Phone);
    let phone =
        validate_phone(&raw_phone).map_err(|_| RowRejection::InvalidPhone(raw_phone.clone()))?;

    Ok(ContactNew {
        first_name: value(ContactField::FirstName),
        last_name: value(ContactField::LastName),
        group_name: value(ContactField::GroupName),
        position: Some(value(ContactField::Position)),
        email: Some(value(ContactField::Email)),
        phone,
        photo_path: None,
    })
}

#[cfg(test)]
mod tests {
    use super::{parse_csv, parse_csv_bytes, RowError, RowRejection};
    use crate::error::ImportError;
    use phonebook_core::ContactField;

    const HEADER: &str = "first_name,last_name,group_name,position,email,phone\n";

    #[test]
    fn accepts_valid_rows_with_canonical_phone() {
        let text = format!("{HEADER}Ali,Ahmadi,IT,Developer,ali@x.com,+989121234567\n");
        let parsed = parse_csv(&text).expect("parse");
        assert!(parsed.rejections.is_empty());
        assert_eq!(parsed.accepted.len(), 1);
        let contact = &parsed.accepted[0];
        assert_eq!(contact.first_name, "Ali");
        assert_eq!(contact.phone, "09121234567");
        assert_eq!(contact.email.as_deref(), Some("ali@x.com"));
    }

    #[test]
    fn missing_required_columns_abort() {
        let err = parse_csv("first_name,last_name,email\nAli,Ahmadi,a@x.com\n").unwrap_err();
        match err {
            ImportError::MissingColumns(missing) => {
                assert_eq!(missing, vec![ContactField::GroupName, ContactField::Phone]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_input_reports_all_required_columns() {
        let err = parse_csv("").unwrap_err();
        assert!(matches!(err, ImportError::MissingColumns(missing) if missing.len() == 4));
    }

    #[test]
    fn header_order_and_optional_columns_are_free() {
        let text = " phone , group_name,last_name,first_name\n09121234567,IT,Ahmadi,Ali\n";
        let parsed = parse_csv(text).expect("parse");
        assert_eq!(parsed.accepted.len(), 1);
        assert_eq!(parsed.accepted[0].group_name, "IT");
        assert_eq!(parsed.accepted[0].position.as_deref(), Some(""));
    }

    #[test]
    fn bad_rows_are_reported_without_stopping() {
        let text = format!(
            "{HEADER}Ali,Ahmadi,IT,Developer,ali@x.com,09121234567\n\
             Sarah,Khosh,Software,Manager,s@x.com,\n\
             Hesam,Mohammadi,IT,Lead,h@x.com,123\n\
             Reza,Karimi,Chemistry,,,9127778899\n"
        );
        let parsed = parse_csv(&text).expect("parse");
        let names: Vec<&str> = parsed
            .accepted
            .iter()
            .map(|contact| contact.first_name.as_str())
            .collect();
        assert_eq!(names, ["Ali", "Reza"]);
        assert_eq!(parsed.accepted[1].phone, "09127778899");
        assert_eq!(
            parsed.rejections,
            vec![
                RowError {
                    row: 2,
                    reason: RowRejection::EmptyFields(vec![ContactField::Phone]),
                },
                RowError {
                    row: 3,
                    reason: RowRejection::InvalidPhone("123".to_string()),
                },
            ]
        );
        assert_eq!(parsed.rejections[0].to_string(), "row 2: empty: phone");
        assert_eq!(parsed.rejections[1].to_string(), "row 3: invalid phone: 123");
    }

    #[test]
    fn short_rows_leave_columns_empty() {
        let text = format!("{HEADER}Ali,Ahmadi\n");
        let parsed = parse_csv(&text).expect("parse");
        assert_eq!(
            parsed.rejections[0].reason,
            RowRejection::EmptyFields(vec![ContactField::GroupName, ContactField::Phone])
        );
    }

    #[test]
    fn fields_are_trimmed() {
        let text = format!("{HEADER} Ali , Ahmadi ,IT, Dev ,, 0912 123 4567 \n");
        let parsed = parse_csv(&text).expect("parse");
        let contact = &parsed.accepted[0];
        assert_eq!(contact.first_name, "Ali");
        assert_eq!(contact.last_name, "Ahmadi");
        assert_eq!(contact.position.as_deref(), Some("Dev"));
        assert_eq!(contact.phone, "09121234567");
    }

    #[test]
    fn bom_crlf_and_blank_lines_are_handled() {
        let text = "\u{feff}first_name,last_name,group_name,phone\r\n\r\nAli,Ahmadi,IT,09121234567\r\n\r\nSarah,Khosh,,09129876543\r\n";
        let parsed = parse_csv(text).expect("parse");
        assert_eq!(parsed.accepted.len(), 1);
        assert_eq!(parsed.rejections.len(), 1);
        assert_eq!(parsed.rejections[0].row, 2);
    }

    #[test]
    fn quoted_fields_keep_commas_quotes_and_newlines() {
        let text = format!(
            "{HEADER}Ali,\"Ahmadi, Jr.\",IT,\"say \"\"hi\"\"\",\"multi\nline\",09121234567\n"
        );
        let parsed = parse_csv(&text).expect("parse");
        let contact = &parsed.accepted[0];
        assert_eq!(contact.last_name, "Ahmadi, Jr.");
        assert_eq!(contact.position.as_deref(), Some("say \"hi\""));
        assert_eq!(contact.email.as_deref(), Some("multi\nline"));
    }

    #[test]
    fn invalid_utf8_row_is_malformed() {
        let mut data = HEADER.as_bytes().to_vec();
        data.extend_from_slice(b"Ali,Ahm\xFFadi,IT,,,09121234567\n");
        data.extend_from_slice(b"Sarah,Khosh,HR,,,09129876543\n");
        let parsed = parse_csv_bytes(&data).expect("parse");
        assert_eq!(parsed.accepted.len(), 1);
        assert_eq!(parsed.accepted[0].first_name, "Sarah");
        assert_eq!(parsed.rejections[0].row, 1);
        assert!(matches!(
            parsed.rejections[0].reason,
            RowRejection::Malformed(_)
        ));
    }

    #[test]
    fn last_line_without_newline_is_read() {
        let text = format!("{HEADER}Ali,Ahmadi,IT,,,09121234567");
        let parsed = parse_csv(&text).expect("parse");
        assert_eq!(parsed.accepted.len(), 1);
    }
}
