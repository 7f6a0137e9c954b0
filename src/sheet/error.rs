use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Convenience result type for sheet handling.
pub type SheetResult<T> = Result<T, SheetError>;

/// Failures around the nesting engine: locating a sheet and reading its
/// values. The engine itself never fails.
#[derive(Debug, Error)]
pub enum SheetError {
    /// The request path is not `/spreadsheet_id/sheet`.
    #[error("URL format is /spreadsheet_id/sheet_name")]
    MalformedRequest,

    /// Sheet numbers are 1-based.
    #[error("For this API, sheet numbers start at 1")]
    ZeroSheetIndex,

    /// The spreadsheet has fewer sheets than the requested number.
    #[error("There is no sheet number {0}")]
    NoSuchSheet(String),

    /// The sheet name is not valid percent-encoded UTF-8.
    #[error("invalid sheet name encoding: {0}")]
    InvalidEncoding(String),

    /// The data source reported an error; its message is passed through.
    #[error("{0}")]
    Upstream(String),

    /// A values or metadata payload could not be parsed.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// CSV input could not be read.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl SheetError {
    /// HTTP-style status for this error
    pub fn status(&self) -> u16 {
        match self {
            SheetError::MalformedRequest => 404,
            _ => 400,
        }
    }

    /// The error document reported in place of a result
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody::new(self.to_string())
    }
}

/// Error-shaped response document: `{"error": message}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        ErrorBody {
            error: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_codes() {
        assert_eq!(SheetError::MalformedRequest.status(), 404);
        assert_eq!(SheetError::ZeroSheetIndex.status(), 400);
        assert_eq!(SheetError::NoSuchSheet("4".to_string()).status(), 400);
        assert_eq!(SheetError::Upstream("Requested entity was not found.".to_string()).status(), 400);
    }

    #[test]
    fn test_upstream_message_passes_through() {
        let err = SheetError::Upstream("The caller does not have permission".to_string());
        assert_eq!(err.to_body(), ErrorBody::new("The caller does not have permission"));
    }

    #[test]
    fn test_error_body_shape() {
        let body = SheetError::NoSuchSheet("7".to_string()).to_body();
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"error": "There is no sheet number 7"})
        );
    }
}
