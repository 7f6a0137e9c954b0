//! Locating a sheet from a `/spreadsheet_id/sheet` request path
//!
//! The sheet part is either a sheet title or a 1-based sheet number. Numbers
//! are resolved to titles through the spreadsheet's metadata document.

use crate::sheet::error::{SheetError, SheetResult};
use crate::sheet::values::ApiError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static SHEET_NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d+)\s*$").unwrap()
});

/// Which sheet of a spreadsheet is requested
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetRef {
    /// Sheet title, already decoded
    Name(String),
    /// 1-based position of the sheet
    Number(usize),
}

impl SheetRef {
    /// Interpret decoded sheet text. All-digit text is a sheet number.
    pub fn parse(text: &str) -> SheetResult<Self> {
        let Some(caps) = SHEET_NUMBER_REGEX.captures(text) else {
            return Ok(SheetRef::Name(text.to_string()));
        };

        let digits = &caps[1];
        match digits.parse::<usize>() {
            Ok(0) => Err(SheetError::ZeroSheetIndex),
            Ok(number) => Ok(SheetRef::Number(number)),
            // too large to be a position in any spreadsheet
            Err(_) => Err(SheetError::NoSuchSheet(digits.to_string())),
        }
    }
}

/// A parsed request for one sheet of one spreadsheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetLocator {
    pub spreadsheet_id: String,
    pub sheet: SheetRef,
}

impl SheetLocator {
    /// Parse a request path of the form `/spreadsheet_id/sheet`.
    ///
    /// Empty path parts are ignored. In the sheet part `+` stands for a
    /// space and percent-escapes are decoded.
    pub fn parse_path(path: &str) -> SheetResult<Self> {
        let parts: Vec<&str> = path.split('/').filter(|part| !part.is_empty()).collect();
        let [id, sheet] = parts.as_slice() else {
            return Err(SheetError::MalformedRequest);
        };

        let sheet = decode_sheet(sheet)?;
        log::debug!("locating sheet {:?} in spreadsheet {}", sheet, id);

        Ok(SheetLocator {
            spreadsheet_id: id.to_string(),
            sheet: SheetRef::parse(&sheet)?,
        })
    }

    /// Resolve the sheet title. Sheet numbers need the spreadsheet metadata;
    /// titles are used as given.
    pub fn resolve(&self, metadata: Option<&SpreadsheetMetadata>) -> SheetResult<ResolvedSheet> {
        let title = match &self.sheet {
            SheetRef::Name(name) => name.clone(),
            SheetRef::Number(number) => {
                let metadata = metadata.ok_or_else(|| {
                    SheetError::MalformedPayload(format!(
                        "spreadsheet metadata is required to resolve sheet number {}",
                        number
                    ))
                })?;
                metadata.title_at(*number)?
            }
        };

        Ok(ResolvedSheet {
            values_path: values_path(&self.spreadsheet_id, &title),
            spreadsheet_id: self.spreadsheet_id.clone(),
            title,
        })
    }
}

/// A sheet whose title is known
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSheet {
    pub spreadsheet_id: String,
    pub title: String,
    /// `{spreadsheet_id}/values/{title}` with the title percent-encoded
    pub values_path: String,
}

/// Spreadsheet metadata document, reduced to what sheet lookup needs
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpreadsheetMetadata {
    #[serde(default)]
    pub sheets: Vec<SheetEntry>,

    #[serde(default)]
    pub error: Option<ApiError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SheetEntry {
    pub properties: SheetProperties,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SheetProperties {
    pub title: String,
}

impl SpreadsheetMetadata {
    pub fn from_slice(bytes: &[u8]) -> SheetResult<Self> {
        serde_json::from_slice(bytes).map_err(|e| SheetError::MalformedPayload(e.to_string()))
    }

    /// Title of the sheet at 1-based position `number`
    pub fn title_at(&self, number: usize) -> SheetResult<String> {
        if let Some(error) = &self.error {
            log::debug!("metadata request failed with code {:?}", error.code);
            return Err(SheetError::Upstream(error.message.clone()));
        }

        number
            .checked_sub(1)
            .and_then(|idx| self.sheets.get(idx))
            .map(|entry| entry.properties.title.clone())
            .ok_or_else(|| SheetError::NoSuchSheet(number.to_string()))
    }
}

fn decode_sheet(raw: &str) -> SheetResult<String> {
    let text = raw.replace('+', " ");
    urlencoding::decode(&text)
        .map(|decoded| decoded.into_owned())
        .map_err(|e| SheetError::InvalidEncoding(e.to_string()))
}

fn values_path(spreadsheet_id: &str, title: &str) -> String {
    format!("{}/values/{}", spreadsheet_id, urlencoding::encode(title))
}
