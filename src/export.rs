use crate::error::ExportError;
use crate::flatten::{CellValue, FlatAdRecord};
use csv::WriterBuilder;
use rust_xlsxwriter::{Format, Workbook};
use std::fs;
use std::io::{self, Write};

pub const SHEET_NAME: &str = "Meta Ads";
pub const XLSX_FILE_NAME: &str = "meta_ads_data.xlsx";
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const CSV_MIME: &str = "text/csv";

// Excel refuses longer cell strings.
const MAX_CELL_CHARS: usize = 32_767;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ExportFormat {
    #[default]
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub fn mime(self) -> &'static str {
        match self {
            ExportFormat::Xlsx => XLSX_MIME,
            ExportFormat::Csv => CSV_MIME,
        }
    }
}

/// A fully materialized export, ready to hand to whoever offers the download.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub bytes: Vec<u8>,
    pub format: ExportFormat,
    pub rows: usize,
}

impl ExportArtifact {
    pub fn build(records: &[FlatAdRecord], format: ExportFormat) -> Result<Self, ExportError> {
        let bytes = match format {
            ExportFormat::Xlsx => write_records_to_xlsx(records)?,
            ExportFormat::Csv => write_records_to_csv(records)?,
        };
        Ok(Self {
            bytes,
            format,
            rows: records.len(),
        })
    }

    pub fn mime(&self) -> &'static str {
        self.format.mime()
    }

    /// Write to `path`, or to stdout when `path` is `-`.
    pub fn save(&self, path: &str) -> Result<(), ExportError> {
        if path == "-" {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&self.bytes)?;
            stdout.flush()?;
        } else {
            fs::write(path, &self.bytes)?;
        }
        Ok(())
    }
}

/// Serialize records into an in-memory xlsx workbook with a single sheet.
pub fn write_records_to_xlsx(records: &[FlatAdRecord]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, header) in FlatAdRecord::HEADERS.iter().enumerate() {
        let col = col as u16;
        worksheet.write_string_with_format(0, col, *header, &header_format)?;
        worksheet.set_column_width(col, column_width(header))?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    for (index, record) in records.iter().enumerate() {
        let row = index as u32 + 1;
        for (col, cell) in record.cells().into_iter().enumerate() {
            let col = col as u16;
            match cell {
                Some(CellValue::Text(text)) => {
                    worksheet.write_string(row, col, truncate_cell(text))?;
                }
                Some(CellValue::Number(n)) => {
                    worksheet.write_number(row, col, n as f64)?;
                }
                None => {}
            }
        }
    }

    tracing::debug!(rows = records.len(), "Serialized xlsx workbook");
    Ok(workbook.save_to_buffer()?)
}

/// Serialize records as CSV with the same header labels and column order.
pub fn write_records_to_csv(records: &[FlatAdRecord]) -> Result<Vec<u8>, ExportError> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    wtr.write_record(FlatAdRecord::HEADERS)?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;

    wtr.into_inner().map_err(|e| ExportError::Io(e.into_error()))
}

fn column_width(header: &str) -> f64 {
    match header {
        "Body" | "Link URL" | "Image URL" | "Page URL" => 40.0,
        "Title" | "Page Name" | "Continuation Token" => 25.0,
        _ => 20.0,
    }
}

fn truncate_cell(text: &str) -> &str {
    match text.char_indices().nth(MAX_CELL_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
