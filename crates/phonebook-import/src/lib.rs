pub mod batch;
pub mod csv;
pub mod error;

pub use batch::{import_batch, ImportReport};
pub use self::csv::{
    parse_csv, parse_csv_bytes, parse_csv_file, ParsedCsv, RowError, RowRejection,
};
pub use error::{ImportError, Result};
