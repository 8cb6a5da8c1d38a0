use phonebook_store::error::StoreErrorKind;
use phonebook_store::repo::ContactNew;
use phonebook_store::Store;
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub created: usize,
    pub duplicates: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

impl ImportReport {
    pub fn total(&self) -> usize {
        self.created + self.duplicates + self.failed
    }
}

/// Creates each accepted payload in turn. A failing payload is tallied and
/// the batch carries on.
pub fn import_batch(store: &Store, accepted: Vec<ContactNew>) -> ImportReport {
    let contacts = store.contacts();
    let mut report = ImportReport::default();

    for payload in accepted {
        match contacts.create(payload) {
            Ok(contact) => {
                debug!(id = %contact.id, name = %contact.full_name(), "contact imported");
                report.created += 1;
            }
            Err(err) if err.kind() == StoreErrorKind::Duplicate => {
                debug!(error = %err, "duplicate contact skipped");
                report.duplicates += 1;
            }
            Err(err) => {
                warn!(error = %err, "contact import failed");
                report.failed += 1;
                report.errors.push(err.to_string());
            }
        }
    }

    debug!(
        created = report.created,
        duplicates = report.duplicates,
        failed = report.failed,
        "import batch finished"
    );
    report
}
