//! Styled xlsx workbook writer.
//!
//! Every cell in a sheet's rectangular range is written explicitly, with an
//! empty-string placeholder where a row has no value for a column, so the
//! border and alignment styling covers the whole table.

use std::path::Path;

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook};

use crate::error::{Error, Result};
use crate::export::sheet::{CellValue, ExportSheet};

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xD3D3D3))
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
}

fn data_format() -> Format {
    Format::new()
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
}

/// Label columns carry the same shaded header styling as the header row.
fn cell_format<'a>(
    col: usize,
    sheet: &ExportSheet,
    header: &'a Format,
    data: &'a Format,
) -> &'a Format {
    if col == 0 && sheet.label_column {
        header
    } else {
        data
    }
}

/// Write the given sheets into a workbook at `path`.
///
/// Fails with [`Error::EmptyExport`] before touching the filesystem when no
/// sheet has any data rows.
pub fn write_workbook(sheets: &[ExportSheet], path: &Path) -> Result<()> {
    if sheets.iter().all(ExportSheet::is_empty) {
        return Err(Error::EmptyExport(
            "no data available for the selected period".to_string(),
        ));
    }

    let header = header_format();
    let data = data_format();

    let mut workbook = Workbook::new();
    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;

        for (col, title) in sheet.header.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, title, &header)?;
        }

        let width = sheet.header.len();
        for (i, row) in sheet.rows.iter().enumerate() {
            let r = (i + 1) as u32;
            for col in 0..width {
                let format = cell_format(col, sheet, &header, &data);
                match row.get(col) {
                    Some(CellValue::Text(s)) => {
                        worksheet.write_string_with_format(r, col as u16, s, format)?
                    }
                    Some(CellValue::Int(v)) => {
                        worksheet.write_number_with_format(r, col as u16, *v as f64, format)?
                    }
                    Some(CellValue::Float(v)) => {
                        worksheet.write_number_with_format(r, col as u16, *v, format)?
                    }
                    None => worksheet.write_string_with_format(r, col as u16, "", format)?,
                };
            }
        }

        for (col, w) in sheet.column_widths.iter().enumerate() {
            worksheet.set_column_width(col as u16, *w)?;
        }
    }

    workbook.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_sheet() -> ExportSheet {
        ExportSheet {
            name: "Sample".to_string(),
            header: vec!["A".to_string(), "B".to_string()],
            rows: vec![vec!["x".into(), 1i64.into()]],
            column_widths: vec![10.0, 10.0],
            label_column: true,
        }
    }

    #[test]
    fn test_label_cells_share_header_shading() {
        let header = header_format();
        let data = data_format();

        // First column of a label sheet gets the full header style, fill
        // included, not the plain data style
        let sheet = sample_sheet();
        assert_eq!(cell_format(0, &sheet, &header, &data), &header);
        assert_eq!(cell_format(1, &sheet, &header, &data), &data);

        let plain = ExportSheet {
            label_column: false,
            ..sample_sheet()
        };
        assert_eq!(cell_format(0, &plain, &header, &data), &data);
    }

    #[test]
    fn test_write_workbook_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        write_workbook(&[sample_sheet()], &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_empty_sheets_leave_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        let sheet = ExportSheet {
            rows: vec![],
            ..sample_sheet()
        };
        let err = write_workbook(&[sheet], &path).unwrap_err();
        assert!(matches!(err, Error::EmptyExport(_)));
        assert!(!path.exists());
    }

    #[test]
    fn test_short_rows_are_padded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        let sheet = ExportSheet {
            rows: vec![vec!["only".into()]],
            ..sample_sheet()
        };
        // The missing B cell gets an empty styled placeholder, not an error
        write_workbook(&[sheet], &path).unwrap();
        assert!(path.exists());
    }
}
