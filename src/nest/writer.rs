use crate::sheet::ErrorBody;
use anyhow::{Context, Result};
use serde_json::Value;
use std::io::Write;

/// How documents are laid out in the output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One indented JSON array
    #[default]
    Pretty,
    /// One JSON array on a single line
    Compact,
    /// One document per line (JSON Lines)
    Lines,
}

/// Writes nested documents to any output
pub struct DocumentWriter<W: Write> {
    writer: W,
    format: OutputFormat,
}

impl<W: Write> DocumentWriter<W> {
    pub fn new(writer: W, format: OutputFormat) -> Self {
        DocumentWriter { writer, format }
    }

    /// Write the result of one transform
    pub fn write_documents(&mut self, documents: &[Value]) -> Result<()> {
        match self.format {
            OutputFormat::Pretty => {
                let json = serde_json::to_string_pretty(documents)
                    .context("Failed to serialize documents")?;
                writeln!(self.writer, "{}", json).context("Failed to write documents")?;
            }
            OutputFormat::Compact => {
                let json = serde_json::to_string(documents)
                    .context("Failed to serialize documents")?;
                writeln!(self.writer, "{}", json).context("Failed to write documents")?;
            }
            OutputFormat::Lines => {
                for document in documents {
                    let json = serde_json::to_string(document)
                        .context("Failed to serialize document")?;
                    writeln!(self.writer, "{}", json).context("Failed to write document")?;
                }
            }
        }
        Ok(())
    }

    /// Write an error document in place of a result
    pub fn write_error(&mut self, body: &ErrorBody) -> Result<()> {
        let json = serde_json::to_string(body).context("Failed to serialize error")?;
        writeln!(self.writer, "{}", json).context("Failed to write error")
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush writer")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(format: OutputFormat, documents: &[Value]) -> String {
        let mut buffer = Vec::new();
        let mut writer = DocumentWriter::new(&mut buffer, format);
        writer.write_documents(documents).unwrap();
        writer.flush().unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_compact_writer() {
        let output = render(OutputFormat::Compact, &[json!({"name": "Alice"})]);
        assert_eq!(output, "[{\"name\":\"Alice\"}]\n");
    }

    #[test]
    fn test_pretty_writer() {
        let output = render(OutputFormat::Pretty, &[json!({"a": {"b": "1"}})]);
        let parsed: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed, json!([{"a": {"b": "1"}}]));
        assert!(output.contains('\n'));
    }

    #[test]
    fn test_lines_writer() {
        let output = render(OutputFormat::Lines, &[json!({"n": "1"}), json!({"n": "2"})]);
        assert_eq!(output, "{\"n\":\"1\"}\n{\"n\":\"2\"}\n");
    }

    #[test]
    fn test_empty_lines_writer() {
        assert_eq!(render(OutputFormat::Lines, &[]), "");
        assert_eq!(render(OutputFormat::Compact, &[]), "[]\n");
    }

    #[test]
    fn test_error_writer() {
        let mut buffer = Vec::new();
        let mut writer = DocumentWriter::new(&mut buffer, OutputFormat::Pretty);
        writer.write_error(&ErrorBody::new("There is no sheet number 3")).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        assert_eq!(output, "{\"error\":\"There is no sheet number 3\"}\n");
    }
}
