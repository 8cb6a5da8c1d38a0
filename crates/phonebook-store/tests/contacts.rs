use phonebook_core::{ContactField, ContactId, PhoneError, SortColumn};
use phonebook_store::error::{StoreError, StoreErrorKind};
use phonebook_store::repo::{ContactNew, ContactUpdate};
use phonebook_store::Store;
use tempfile::TempDir;

fn contact(first: &str, last: &str, group: &str, phone: &str) -> ContactNew {
    ContactNew {
        first_name: first.to_string(),
        last_name: last.to_string(),
        group_name: group.to_string(),
        phone: phone.to_string(),
        ..Default::default()
    }
}

fn seeded_store() -> Store {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    store
}

#[test]
fn contact_crud_roundtrip() {
    let store = seeded_store();

    let created = store
        .contacts()
        .create(ContactNew {
            position: Some("Developer".to_string()),
            ..contact("Ali", "Ahmadi", "IT", "+98 912 123 4567")
        })
        .expect("create contact");
    assert!(created.id.as_i64() > 0);
    assert_eq!(created.phone, "09121234567");
    assert_eq!(created.email, "");
    assert_eq!(created.photo_path, "");

    let fetched = store
        .contacts()
        .get(created.id)
        .expect("get contact")
        .expect("contact exists");
    assert_eq!(fetched, created);

    let updated = store
        .contacts()
        .update(
            created.id,
            ContactUpdate {
                position: Some("Senior".to_string()),
                email: Some("Ali@email.com".to_string()),
                ..Default::default()
            },
        )
        .expect("update contact");
    assert_eq!(updated.position, "Senior");
    assert_eq!(updated.email, "Ali@email.com");
    assert_eq!(updated.first_name, "Ali");

    let deleted = store.contacts().delete(created.id).expect("delete contact");
    assert_eq!(deleted.position, "Senior");
    assert!(store.contacts().get(created.id).expect("get").is_none());
}

#[test]
fn create_with_missing_required_field_writes_nothing() {
    let store = seeded_store();
    store
        .contacts()
        .create(contact("Ali", "Ahmadi", "IT", "09121234567"))
        .expect("create");

    for (input, field) in [
        (contact("", "Khosh", "Software", "09129876543"), ContactField::FirstName),
        (contact("Sarah", "  ", "Software", "09129876543"), ContactField::LastName),
        (contact("Sarah", "Khosh", "", "09129876543"), ContactField::GroupName),
        (contact("Sarah", "Khosh", "Software", ""), ContactField::Phone),
    ] {
        let err = store.contacts().create(input).unwrap_err();
        assert_eq!(err.kind(), StoreErrorKind::MissingField);
        assert!(matches!(err, StoreError::MissingField(missing) if missing == field));
    }

    assert_eq!(store.contacts().count().expect("count"), 1);
}

#[test]
fn create_rejects_unrecognized_phone() {
    let store = seeded_store();
    let err = store
        .contacts()
        .create(contact("Ali", "Ahmadi", "IT", "123"))
        .unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::InvalidPhone);
    assert!(matches!(
        err,
        StoreError::InvalidPhone(PhoneError::UnrecognizedFormat(_))
    ));
    assert_eq!(store.contacts().count().expect("count"), 0);
}

#[test]
fn exact_duplicates_are_reported_as_duplicate() {
    let store = seeded_store();
    store
        .contacts()
        .create(contact("Ali", "Ahmadi", "IT", "09121234567"))
        .expect("create");

    let err = store
        .contacts()
        .create(contact("Ali", "Ahmadi", "Software", "+989121234567"))
        .unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::Duplicate);

    store
        .contacts()
        .create(contact("Ali", "Rezaei", "IT", "09121234567"))
        .expect("same phone, different person");
    assert_eq!(store.contacts().count().expect("count"), 2);
}

#[test]
fn update_into_an_existing_identity_is_a_duplicate() {
    let store = seeded_store();
    store
        .contacts()
        .create(contact("Ali", "Ahmadi", "IT", "09121234567"))
        .expect("create");
    let reza = store
        .contacts()
        .create(contact("Reza", "Ahmadi", "IT", "09121234567"))
        .expect("create");

    let err = store
        .contacts()
        .update(reza.id, ContactUpdate::from_fields([("first_name", "Ali")]))
        .unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::Duplicate);

    let renamed = store
        .contacts()
        .update(reza.id, ContactUpdate::from_fields([("first_name", "Reza"), ("position", "Lead")]))
        .expect("identity unchanged");
    assert_eq!(renamed.position, "Lead");
}

#[test]
fn update_leaves_untouched_legacy_values_alone() {
    let store = seeded_store();
    let conn = store.connect().expect("connect");
    conn.execute(
        "INSERT INTO contacts (first_name, last_name, group_name, phone)
         VALUES ('Ali', 'Ahmadi', '', '12345');",
        [],
    )
    .expect("legacy row");
    let id = ContactId(conn.last_insert_rowid());
    drop(conn);

    let updated = store
        .contacts()
        .update(id, ContactUpdate::from_fields([("position", " Manager ")]))
        .expect("update position");
    assert_eq!(updated.position, "Manager");
    assert_eq!(updated.phone, "12345");
    assert_eq!(updated.group_name, "");

    let err = store
        .contacts()
        .update(id, ContactUpdate::from_fields([("phone", "12345")]))
        .unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::InvalidPhone);
}

#[test]
fn update_without_valid_fields_is_rejected() {
    let store = seeded_store();
    let created = store
        .contacts()
        .create(contact("Ali", "Ahmadi", "IT", "09121234567"))
        .expect("create");

    let update = ContactUpdate::from_fields([("nickname", "Al")]);
    let err = store.contacts().update(created.id, update).unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::NoValidFields);

    let unchanged = store.contacts().get(created.id).expect("get").expect("exists");
    assert_eq!(unchanged, created);
}

#[test]
fn update_of_missing_contact_reports_not_found() {
    let store = seeded_store();
    let created = store
        .contacts()
        .create(contact("Ali", "Ahmadi", "IT", "09121234567"))
        .expect("create");

    let err = store
        .contacts()
        .update(
            ContactId(999),
            ContactUpdate::from_fields([("group_name", "Computer")]),
        )
        .unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::NotFound);

    let all = store.contacts().list_all(SortColumn::LastName).expect("list");
    assert_eq!(all, vec![created]);
}

#[test]
fn update_normalizes_phone_and_keeps_required_fields() {
    let store = seeded_store();
    let created = store
        .contacts()
        .create(contact("Hesam", "Mohammadi", "IT", "09127778899"))
        .expect("create");

    let updated = store
        .contacts()
        .update(
            created.id,
            ContactUpdate::from_fields([("group_name", "Computer"), ("phone", "9129998877")]),
        )
        .expect("update");
    assert_eq!(updated.group_name, "Computer");
    assert_eq!(updated.phone, "09129998877");

    let err = store
        .contacts()
        .update(created.id, ContactUpdate::from_fields([("first_name", " ")]))
        .unwrap_err();
    assert!(matches!(err, StoreError::MissingField(ContactField::FirstName)));

    let err = store
        .contacts()
        .update(created.id, ContactUpdate::from_fields([("phone", "12")]))
        .unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::InvalidPhone);

    let stored = store.contacts().get(created.id).expect("get").expect("exists");
    assert_eq!(stored, updated);
}

#[test]
fn delete_twice_reports_not_found_the_second_time() {
    let store = seeded_store();
    let ali = store
        .contacts()
        .create(contact("Ali", "Ahmadi", "IT", "09121234567"))
        .expect("create");
    store
        .contacts()
        .create(contact("Sarah", "Khosh", "Software", "09129876543"))
        .expect("create");

    store.contacts().delete(ali.id).expect("first delete");
    let err = store.contacts().delete(ali.id).unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::NotFound);
    assert_eq!(store.contacts().count().expect("count"), 1);
}

#[test]
fn ids_are_not_reused_after_delete() {
    let store = seeded_store();
    let first = store
        .contacts()
        .create(contact("Ali", "Ahmadi", "IT", "09121234567"))
        .expect("create");
    let second = store
        .contacts()
        .create(contact("Sarah", "Khosh", "Software", "09129876543"))
        .expect("create");
    store.contacts().delete(second.id).expect("delete");

    let third = store
        .contacts()
        .create(contact("Hesam", "Mohammadi", "IT", "09127778899"))
        .expect("create");
    assert!(second.id > first.id);
    assert!(third.id > second.id);
}

#[test]
fn list_all_orders_by_requested_column() {
    let store = seeded_store();
    for (first, last, group, phone) in [
        ("Sarah", "Khosh", "Software", "09129876543"),
        ("Hesam", "Mohammadi", "IT", "09127778899"),
        ("Ali", "Ahmadi", "IT", "09121234567"),
    ] {
        store
            .contacts()
            .create(contact(first, last, group, phone))
            .expect("create");
    }

    let by_last: Vec<String> = store
        .contacts()
        .list_all(SortColumn::LastName)
        .expect("list")
        .into_iter()
        .map(|contact| contact.last_name)
        .collect();
    assert_eq!(by_last, ["Ahmadi", "Khosh", "Mohammadi"]);

    let by_first: Vec<String> = store
        .contacts()
        .list_all(SortColumn::FirstName)
        .expect("list")
        .into_iter()
        .map(|contact| contact.first_name)
        .collect();
    assert_eq!(by_first, ["Ali", "Hesam", "Sarah"]);

    let by_id: Vec<String> = store
        .contacts()
        .list_all(SortColumn::Id)
        .expect("list")
        .into_iter()
        .map(|contact| contact.first_name)
        .collect();
    assert_eq!(by_id, ["Sarah", "Hesam", "Ali"]);
}

#[test]
fn file_store_persists_across_handles() {
    let temp = TempDir::new().expect("temp dir");
    let path = temp.path().join("phonebook.sqlite3");

    let store = Store::open(&path).expect("open");
    store.migrate().expect("migrate");
    let created = store
        .contacts()
        .create(contact("Ali", "Ahmadi", "IT", "09121234567"))
        .expect("create");
    drop(store);

    let reopened = Store::open(&path).expect("reopen");
    reopened.migrate().expect("migrate again");
    let fetched = reopened
        .contacts()
        .get(created.id)
        .expect("get")
        .expect("exists");
    assert_eq!(fetched.last_name, "Ahmadi");
    assert_eq!(reopened.path(), Some(path.as_path()));
}
