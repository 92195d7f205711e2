//! Spreadsheet report: sheet models are collected first and rendered into one workbook by
//! [`ReportBuilder::finish`].

mod sheet;

pub use sheet::{Cell, DIFFERENCE_HEADERS, LISTING_HEADERS, MAX_SHEET_ROWS, SheetModel};

use crate::error::ReportError;
use crate::service::RunContext;
use dbcompare_core::{ComparisonResult, DatabaseObject, DiffSide, MatchStrategy};
use rust_xlsxwriter::{Color, Format, Workbook, Worksheet};

pub const SUMMARY_SHEET: &str = "Summary";
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Debug, Default)]
pub struct ReportBuilder {
    sheets: Vec<SheetModel>,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listing(&mut self, name: &str, objects: &[DatabaseObject]) -> &mut Self {
        self.sheets.push(SheetModel::listing(name, objects));
        self
    }

    pub fn add_differences(&mut self, name: &str, result: &ComparisonResult) -> &mut Self {
        self.sheets.push(SheetModel::differences(name, result));
        self
    }

    /// Run identity followed by per-sheet difference counts.
    pub fn add_summary<'a, I>(
        &mut self,
        context: &RunContext,
        strategy: MatchStrategy,
        results: I,
    ) -> &mut Self
    where
        I: IntoIterator<Item = (&'a str, &'a ComparisonResult)>,
    {
        let mut sheet = SheetModel::new(SUMMARY_SHEET, &[]);
        let label = |s: &str| Cell::Label(s.to_string());

        sheet.rows.push(vec![label("Run ID"), Cell::from(context.run_id.to_string())]);
        sheet.rows.push(vec![
            label("Run Timestamp"),
            Cell::from(context.run_timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()),
        ]);
        sheet.rows.push(vec![label("Oracle Schema"), Cell::from(context.oracle_schema.as_str())]);
        sheet.rows.push(vec![
            label("PostgreSQL Schema"),
            Cell::from(context.postgres_schema.as_str()),
        ]);
        sheet.rows.push(vec![label("Match Strategy"), Cell::from(strategy.as_str())]);
        sheet.rows.push(vec![Cell::Empty]);
        sheet.rows.push(vec![
            label("Kind"),
            label(DiffSide::OnlyInA.status()),
            label(DiffSide::OnlyInB.status()),
        ]);

        for (name, result) in results {
            sheet.rows.push(vec![
                Cell::from(name),
                count(result.only_in_a.len()),
                count(result.only_in_b.len()),
            ]);
        }

        self.sheets.push(sheet);
        self
    }

    pub fn sheets(&self) -> &[SheetModel] {
        &self.sheets
    }

    pub fn sheet(&self, name: &str) -> Option<&SheetModel> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Renders every sheet, in insertion order, into xlsx bytes.
    pub fn finish(self) -> Result<Vec<u8>, ReportError> {
        let mut workbook = Workbook::new();
        let header_format = Format::new()
            .set_bold()
            .set_background_color(Color::RGB(0x00D9_D9D9));

        for model in &self.sheets {
            if model.total_rows() > MAX_SHEET_ROWS {
                return Err(ReportError::TooManyRows(model.name.clone()));
            }
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(&model.name)?;
            write_sheet(worksheet, model, &header_format)?;
        }

        Ok(workbook.save_to_buffer()?)
    }
}

#[allow(clippy::cast_precision_loss)]
fn count(n: usize) -> Cell {
    Cell::Number(n as f64)
}

fn write_sheet(
    worksheet: &mut Worksheet,
    model: &SheetModel,
    header: &Format,
) -> Result<(), ReportError> {
    let mut first_row = 0u32;
    if !model.headers.is_empty() {
        for (col, title) in (0u16..).zip(&model.headers) {
            worksheet.write_string_with_format(0, col, title, header)?;
        }
        worksheet.set_freeze_panes(1, 0)?;
        first_row = 1;
    }

    for (row, cells) in (first_row..).zip(&model.rows) {
        for (col, cell) in (0u16..).zip(cells) {
            match cell {
                Cell::Text(s) => {
                    worksheet.write_string(row, col, s)?;
                }
                Cell::Label(s) => {
                    worksheet.write_string_with_format(row, col, s, header)?;
                }
                Cell::Number(n) => {
                    worksheet.write_number(row, col, *n)?;
                }
                Cell::Empty => {}
            }
        }
    }

    worksheet.autofit();
    Ok(())
}
