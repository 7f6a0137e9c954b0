//! sheetnest: Turn spreadsheet rows into nested JSON
//!
//! Usage:
//!   # Nest a values payload from a file, pretty-printed to stdout
//!   sheetnest convert values.json
//!
//!   # Read CSV from stdin, one document per line
//!   cat sheet.csv | sheetnest convert --csv --format lines
//!
//!   # Resolve a request path against spreadsheet metadata
//!   sheetnest locate /1abc/2 --metadata spreadsheet.json
//!
//! Set RUST_LOG=debug to see layout decisions and group merges on stderr.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use sheetnest::sheet::{SheetError, SheetLocator, SpreadsheetMetadata};
use sheetnest::{nest_reader, DocumentWriter, InputFormat, Layout, NestConfig, OutputFormat};
use std::fs::File;
use std::io::{BufReader, Read};

#[derive(Parser, Debug)]
#[command(name = "sheetnest")]
#[command(about = "Turn spreadsheet rows into nested JSON", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Nest a sheet's values into JSON documents
    Convert {
        /// Input file (use stdin if omitted)
        #[arg(value_name = "FILE")]
        input: Option<String>,

        /// Input is CSV instead of a JSON values payload
        #[arg(long)]
        csv: bool,

        /// How headers are interpreted
        #[arg(long, value_enum, default_value_t = LayoutArg::Auto)]
        layout: LayoutArg,

        /// Separator between header path segments (default: ".")
        #[arg(long)]
        separator: Option<char>,

        /// Output layout
        #[arg(long, value_enum, default_value_t = FormatArg::Pretty)]
        format: FormatArg,
    },

    /// Resolve a /spreadsheet_id/sheet request path
    Locate {
        /// Request path, e.g. /1abc/Sheet1 or /1abc/2
        #[arg(value_name = "PATH")]
        path: String,

        /// Spreadsheet metadata document, needed for sheet numbers
        #[arg(long)]
        metadata: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LayoutArg {
    Auto,
    Flat,
    Structured,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Pretty,
    Compact,
    Lines,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Pretty => OutputFormat::Pretty,
            FormatArg::Compact => OutputFormat::Compact,
            FormatArg::Lines => OutputFormat::Lines,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let result = match args.command {
        Command::Convert {
            input,
            csv,
            layout,
            separator,
            format,
        } => {
            // Build config
            let mut config = NestConfig::default();
            config.layout = match layout {
                LayoutArg::Auto => None,
                LayoutArg::Flat => Some(Layout::Flat),
                LayoutArg::Structured => Some(Layout::Structured),
            };
            if let Some(sep) = separator {
                config.separator = sep;
            }

            let input_format = if csv { InputFormat::Csv } else { InputFormat::Json };
            convert(input, input_format, config, format.into())
        }
        Command::Locate { path, metadata } => locate(&path, metadata),
    };

    // Sheet failures are reported as an error document, not a crash
    if let Err(err) = result {
        if let Some(sheet_err) = err.downcast_ref::<SheetError>() {
            let mut writer = DocumentWriter::new(std::io::stdout(), OutputFormat::Compact);
            writer.write_error(&sheet_err.to_body())?;
            writer.flush()?;
            log::warn!("request failed with status {}", sheet_err.status());
            std::process::exit(1);
        }
        return Err(err);
    }

    Ok(())
}

fn open_input(input: &Option<String>) -> Result<Box<dyn Read>> {
    let reader = if let Some(file_path) = input {
        let file = File::open(file_path).with_context(|| format!("Failed to open file: {}", file_path))?;
        Box::new(BufReader::new(file)) as Box<dyn Read>
    } else {
        Box::new(std::io::stdin()) as Box<dyn Read>
    };
    Ok(reader)
}

/// Read one sheet, nest it and write the documents to stdout
fn convert(
    input: Option<String>,
    input_format: InputFormat,
    config: NestConfig,
    format: OutputFormat,
) -> Result<()> {
    let reader = open_input(&input)?;
    let documents = nest_reader(reader, input_format, config)?;

    let mut writer = DocumentWriter::new(std::io::stdout(), format);
    writer.write_documents(&documents)?;
    writer.flush()
}

/// Resolve a request path and print the sheet it refers to
fn locate(path: &str, metadata_file: Option<String>) -> Result<()> {
    let locator = SheetLocator::parse_path(path)?;

    let metadata = match metadata_file {
        Some(file_path) => {
            let bytes = std::fs::read(&file_path)
                .with_context(|| format!("Failed to read metadata: {}", file_path))?;
            Some(SpreadsheetMetadata::from_slice(&bytes)?)
        }
        None => None,
    };

    let resolved = locator.resolve(metadata.as_ref())?;
    println!("{}", serde_json::to_string_pretty(&resolved)?);
    Ok(())
}
