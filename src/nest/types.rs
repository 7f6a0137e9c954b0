/// How a sheet's header row is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Headers are plain column names; every row becomes its own object
    Flat,
    /// Headers carry path notation; all rows build one nested document
    Structured,
}

impl Layout {
    /// Classify a header row. One dotted or bracketed header makes the
    /// whole sheet structured.
    pub fn detect<H: AsRef<str>>(headers: &[H], separator: char) -> Self {
        let structured = headers.iter().any(|h| {
            let h = h.as_ref();
            h.contains(separator) || h.contains('[')
        });

        if structured {
            Layout::Structured
        } else {
            Layout::Flat
        }
    }
}

/// Configuration for the nesting process
#[derive(Debug, Clone)]
pub struct NestConfig {
    /// Separator between path segments in a header
    pub separator: char,

    /// Forced layout; `None` detects it from the headers
    pub layout: Option<Layout>,
}

impl Default for NestConfig {
    fn default() -> Self {
        NestConfig {
            separator: '.',
            layout: None,
        }
    }
}
