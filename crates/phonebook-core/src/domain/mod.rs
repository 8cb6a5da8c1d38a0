pub mod contact;
pub mod ids;
pub mod phone;
pub mod role;

pub use contact::{Contact, ContactField, SortColumn};
pub use ids::ContactId;
pub use phone::{classify_phone, clean_phone, is_mobile, validate_phone, PhoneError, PhoneShape};
pub use role::Role;
