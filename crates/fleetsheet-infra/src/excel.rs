//! XLSX serialization of an assembled report

use std::path::Path;

use fleetsheet_domain::model::report::HEADER_FILL;
use fleetsheet_domain::model::{CellValue, ReportDocument};
use fleetsheet_types::{Error, Result};
use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook, Worksheet};

/// Write the report to `output_path`
pub fn write_report(doc: &ReportDocument, output_path: &Path) -> Result<()> {
    let mut workbook = build_workbook(doc)?;
    workbook
        .save(output_path)
        .map_err(|e| Error::Excel(e.to_string()))?;
    Ok(())
}

fn build_workbook(doc: &ReportDocument) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    write_header(sheet, doc)?;
    write_rows(sheet, doc)?;
    Ok(workbook)
}

/// Hex color (no marker) to an XLSX color
fn hex_color(hex: &str) -> Result<Color> {
    u32::from_str_radix(hex, 16)
        .ok()
        .filter(|_| hex.len() == 6)
        .map(Color::RGB)
        .ok_or_else(|| Error::Format(format!("'{}' is not a hex color", hex)))
}

fn write_header(sheet: &mut Worksheet, doc: &ReportDocument) -> Result<()> {
    let header_format = Format::new()
        .set_bold()
        .set_background_color(hex_color(HEADER_FILL)?)
        .set_border(FormatBorder::Thin);

    for (col, column) in doc.columns.iter().enumerate() {
        let col = col as u16;
        sheet
            .write_string_with_format(0, col, &column.name, &header_format)
            .map_err(|e| Error::Excel(e.to_string()))?;
        sheet
            .set_column_width(col, column.width)
            .map_err(|e| Error::Excel(e.to_string()))?;
    }

    Ok(())
}

fn write_rows(sheet: &mut Worksheet, doc: &ReportDocument) -> Result<()> {
    for (row_idx, row) in doc.rows.iter().enumerate() {
        let xlsx_row = (row_idx + 1) as u32;

        let mut row_format = Format::new().set_border(FormatBorder::Thin);
        if let Some(fill) = row.fill_color() {
            row_format = row_format.set_background_color(hex_color(fill)?);
        }

        for (col, cell) in row.cells.iter().enumerate() {
            let col = col as u16;
            let format = match cell.font_color {
                Some(ref font) => row_format.clone().set_font_color(hex_color(font)?),
                None => row_format.clone(),
            };

            match &cell.value {
                CellValue::Blank => sheet.write_blank(xlsx_row, col, &format),
                CellValue::Text(s) => sheet.write_string_with_format(xlsx_row, col, s, &format),
                CellValue::Number(n) => sheet.write_number_with_format(xlsx_row, col, *n, &format),
                CellValue::Bool(b) => sheet.write_boolean_with_format(xlsx_row, col, *b, &format),
            }
            .map_err(|e| Error::Excel(e.to_string()))?;
        }
    }

    Ok(())
}
