//! # Sheetnest - Nested JSON from Spreadsheet Rows
//!
//! Turns a header row plus data rows into JSON. Header text carries a small
//! path notation that decides where each cell ends up.
//!
//! ## Modules
//!
//! - **nest**: the transformation engine (header paths, row assembly, pruning)
//! - **sheet**: locating a sheet, reading values payloads, error documents
//!
//! ## Quick Start
//!
//! ### Flat sheets
//!
//! ```rust
//! use serde_json::json;
//!
//! let output = sheetnest::transform(&["name", "email"], &[vec!["Alice", "a@example.com"]]);
//! assert_eq!(output, vec![json!({"name": "Alice", "email": "a@example.com"})]);
//! ```
//!
//! ### Structured sheets
//!
//! ```rust
//! use serde_json::json;
//!
//! let headers = ["site.title", "links[label]", "links[href]"];
//! let rows = [
//!     vec!["Home", "Docs", "/docs"],
//!     vec!["", "Blog", "/blog"],
//! ];
//!
//! let output = sheetnest::transform(&headers, &rows);
//! assert_eq!(output, vec![json!({
//!     "site": {"title": "Home"},
//!     "links": [
//!         {"label": "Docs", "href": "/docs"},
//!         {"label": "Blog", "href": "/blog"}
//!     ]
//! })]);
//! ```

use anyhow::{Context, Result};
use serde_json::Value;
use std::io::Read;

pub mod nest;
pub mod sheet;

// Re-export commonly used types for convenience
pub use nest::{DocumentWriter, HeaderPath, Layout, NestConfig, OutputFormat, SheetNester};
pub use sheet::{ErrorBody, SheetError, SheetLocator, Table};

/// Kind of document read by [`nest_reader`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// A values response (`{"values": [[...]]}`) or a bare grid of cells
    Json,
    /// CSV text whose first record is the header row
    Csv,
}

/// Transform a sheet with the default configuration
pub fn transform<H, R, C>(headers: &[H], rows: &[R]) -> Vec<Value>
where
    H: AsRef<str>,
    R: AsRef<[C]>,
    C: AsRef<str>,
{
    SheetNester::default().transform(headers, rows)
}

/// Main entry point: read a sheet from `reader` and nest it.
///
/// Sheet failures (such as an error reported in the payload) surface as a
/// [`SheetError`] inside the returned error.
pub fn nest_reader<R: Read>(mut reader: R, input: InputFormat, config: NestConfig) -> Result<Vec<Value>> {
    let table = match input {
        InputFormat::Json => {
            let mut content = Vec::new();
            reader
                .read_to_end(&mut content)
                .context("Failed to read input")?;
            Table::from_json_slice(&content)?
        }
        InputFormat::Csv => Table::from_csv_reader(reader)?,
    };

    log::debug!("read {} headers and {} rows", table.headers.len(), table.rows.len());

    let nester = SheetNester::new(config);
    Ok(table.nest(&nester))
}
