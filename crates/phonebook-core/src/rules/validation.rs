use crate::domain::ContactField;

/// Returns the required fields whose value is absent or blank, in declaration
/// order. `lookup` yields the raw value for a field, if one was supplied.
pub fn missing_required_fields<'a, F>(lookup: F) -> Vec<ContactField>
where
    F: Fn(ContactField) -> Option<&'a str>,
{
    ContactField::REQUIRED
        .into_iter()
        .filter(|field| lookup(*field).map_or(true, |value| value.trim().is_empty()))
        .collect()
}
