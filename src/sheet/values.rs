//! Sheet values payloads and the header/rows table handed to the engine

use crate::nest::SheetNester;
use crate::sheet::error::{SheetError, SheetResult};
use serde::Deserialize;
use serde_json::Value;
use std::io::Read;

/// Error object reported by the data source
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: Option<u16>,

    pub message: String,
}

/// Values response as returned for a sheet range
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuesResponse {
    #[serde(default)]
    pub range: Option<String>,

    /// `ROWS` (default) or `COLUMNS`
    #[serde(default)]
    pub major_dimension: Option<String>,

    /// Absent when the sheet is empty
    #[serde(default)]
    pub values: Option<Vec<Vec<Value>>>,

    #[serde(default)]
    pub error: Option<ApiError>,
}

/// Accepted input documents: a full values response or a bare grid
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ValuesPayload {
    Grid(Vec<Vec<Value>>),
    Response(ValuesResponse),
}

impl ValuesPayload {
    /// Parse a JSON payload, trying simd-json first
    pub fn from_slice(bytes: &[u8]) -> SheetResult<Self> {
        // simd-json parses in place; the fallback needs untouched bytes
        let mut scratch = bytes.to_vec();
        match simd_json::serde::from_slice::<ValuesPayload>(&mut scratch) {
            Ok(payload) => Ok(payload),
            Err(e) => {
                log::debug!("simd-json rejected payload ({}), retrying with serde_json", e);
                serde_json::from_slice(bytes).map_err(|e| SheetError::MalformedPayload(e.to_string()))
            }
        }
    }

    /// Turn the payload into rows of cell text. A reported error becomes
    /// [`SheetError::Upstream`].
    pub fn into_table(self) -> SheetResult<Table> {
        let grid = match self {
            ValuesPayload::Grid(grid) => grid,
            ValuesPayload::Response(response) => {
                if let Some(error) = response.error {
                    log::debug!("values request failed with code {:?}", error.code);
                    return Err(SheetError::Upstream(error.message));
                }

                let values = response.values.unwrap_or_default();
                match response.major_dimension.as_deref() {
                    Some("COLUMNS") => transpose(values),
                    _ => values,
                }
            }
        };

        let grid: Vec<Vec<String>> = grid
            .into_iter()
            .map(|row| row.iter().map(cell_text).collect())
            .collect();

        Ok(Table::from_grid(grid))
    }
}

/// A header row plus data rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// The first row of the grid is the header row
    pub fn from_grid(grid: Vec<Vec<String>>) -> Self {
        let mut rows = grid.into_iter();
        let headers = rows.next().unwrap_or_default();
        Table {
            headers,
            rows: rows.collect(),
        }
    }

    /// Read a JSON values payload
    pub fn from_json_slice(bytes: &[u8]) -> SheetResult<Self> {
        ValuesPayload::from_slice(bytes)?.into_table()
    }

    /// Read CSV text; rows may have differing lengths
    pub fn from_csv_reader<R: Read>(reader: R) -> SheetResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut grid: Vec<Vec<String>> = Vec::new();
        for result in rdr.records() {
            let record = result?;
            grid.push(record.iter().map(str::to_string).collect());
        }

        Ok(Table::from_grid(grid))
    }

    /// Run the nesting engine over this table
    pub fn nest(&self, nester: &SheetNester) -> Vec<Value> {
        nester.transform(self.headers.as_slice(), self.rows.as_slice())
    }
}

/// Text of a single cell; null cells are empty
fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn transpose(columns: Vec<Vec<Value>>) -> Vec<Vec<Value>> {
    let height = columns.iter().map(Vec::len).max().unwrap_or(0);
    (0..height)
        .map(|row| {
            columns
                .iter()
                .map(|column| column.get(row).cloned().unwrap_or(Value::Null))
                .collect()
        })
        .collect()
}
