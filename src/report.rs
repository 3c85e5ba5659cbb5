use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rust_xlsxwriter::Workbook;
use tracing::{error, info, warn};

use crate::config::CrawlerConfig;
use crate::error::CrawlError;
use crate::models::ProductSample;

/// Header plus one row per category. Rows may be shorter than the header when a
/// category had fewer best sellers than requested; they are never padded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTable {
    rows: Vec<Vec<String>>,
}

pub fn header_row(item_count: usize) -> Vec<String> {
    let mut header = vec!["Cat_Id".to_string(), "Cat_Name".to_string()];
    for rank in 1..=item_count {
        header.push(format!("No{rank}_Name"));
        header.push(format!("No{rank}_Price"));
    }
    header
}

impl ReportTable {
    pub fn new(item_count: usize) -> Self {
        Self {
            rows: vec![header_row(item_count)],
        }
    }

    pub fn push_category(&mut self, id: &str, name: &str, products: &[ProductSample]) {
        let mut row = Vec::with_capacity(2 + products.len() * 2);
        row.push(id.to_string());
        row.push(name.to_string());
        for p in products {
            row.push(p.name.clone());
            row.push(p.price.clone());
        }
        self.rows.push(row);
    }

    pub fn header(&self) -> &[String] {
        &self.rows[0]
    }

    /// All rows, header first.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn data_rows(&self) -> &[Vec<String>] {
        &self.rows[1..]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Spreadsheet,
    Both,
    Console,
}

impl OutputFormat {
    /// Maps the interactive menu answer; anything unrecognised prints to the console.
    pub fn from_choice(choice: &str) -> Self {
        match choice.trim() {
            "1" => Self::Csv,
            "2" => Self::Spreadsheet,
            "3" => Self::Both,
            _ => Self::Console,
        }
    }

    fn wants_csv(self) -> bool {
        matches!(self, Self::Csv | Self::Both)
    }

    fn wants_spreadsheet(self) -> bool {
        matches!(self, Self::Spreadsheet | Self::Both)
    }
}

pub fn write_csv(table: &ReportTable, path: &Path) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for row in table.rows() {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_spreadsheet(table: &ReportTable, sheet_name: &str, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(sheet_name)?;
    for (r, row) in table.rows().iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            sheet.write_string(u32::try_from(r)?, u16::try_from(c)?, value)?;
        }
    }
    workbook
        .save(path)
        .with_context(|| format!("saving {}", path.display()))?;
    Ok(())
}

pub fn print_table<W: Write>(table: &ReportTable, out: &mut W) -> Result<()> {
    for row in table.rows() {
        writeln!(out, "{}", row.join(", "))?;
    }
    Ok(())
}

/// Writes the report in the chosen format(s) and returns the files produced.
/// When both formats are requested, a failure in one does not stop the other.
pub fn write_report<W: Write>(
    table: &ReportTable,
    format: OutputFormat,
    config: &CrawlerConfig,
    console: &mut W,
) -> Result<Vec<PathBuf>> {
    if format == OutputFormat::Console {
        warn!("unrecognised output option, printing to console");
        print_table(table, console)?;
        return Ok(Vec::new());
    }

    let mut written = Vec::new();
    let mut failures = Vec::new();

    if format.wants_csv() {
        let path = config.csv_report_path();
        info!(path = %path.display(), "writing csv report");
        match write_csv(table, &path) {
            Ok(()) => written.push(path),
            Err(e) => {
                error!("csv report failed: {e:#}");
                failures.push(format!("{e:#}"));
            }
        }
    }

    if format.wants_spreadsheet() {
        let path = config.spreadsheet_report_path();
        info!(path = %path.display(), "writing spreadsheet report");
        match write_spreadsheet(table, &config.sheet_name(), &path) {
            Ok(()) => written.push(path),
            Err(e) => {
                error!("spreadsheet report failed: {e:#}");
                failures.push(format!("{e:#}"));
            }
        }
    }

    if !failures.is_empty() {
        return Err(CrawlError::ReportFailed(failures).into());
    }
    Ok(written)
}
