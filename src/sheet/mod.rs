//! The offline side of serving a sheet: locating it, reading its values
//! payload, and reporting failures as error documents.

pub mod error;
pub mod locator;
pub mod values;

pub use error::{ErrorBody, SheetError, SheetResult};
pub use locator::{ResolvedSheet, SheetLocator, SheetRef, SpreadsheetMetadata};
pub use values::{ApiError, Table, ValuesPayload, ValuesResponse};
