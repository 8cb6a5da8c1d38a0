pub mod validation;

pub use validation::missing_required_fields;
