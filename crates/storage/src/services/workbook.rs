use rust_xlsxwriter::{Format, Workbook};

use crate::error::Result;

use super::results_export::{CellValue, ResultsExport};

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Renders the logical sheets as an `.xlsx` document. Row 0 is the header
/// and is written bold.
pub fn render_xlsx(export: &ResultsExport) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    for sheet in &export.sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;

        for cell in &sheet.cells {
            match &cell.value {
                CellValue::Text(text) if cell.row == 0 => {
                    worksheet.write_string_with_format(cell.row, cell.col, text, &header)?;
                }
                CellValue::Text(text) => {
                    worksheet.write_string(cell.row, cell.col, text)?;
                }
                CellValue::Number(number) => {
                    worksheet.write_number(cell.row, cell.col, f64::from(*number))?;
                }
                CellValue::Empty => {}
            }
        }
    }

    if export.sheets.is_empty() {
        workbook.add_worksheet().set_name("Results")?;
    }

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;
    use crate::services::results_export::{Cell, Sheet};

    fn sheet(name: &str) -> Sheet {
        Sheet {
            name: name.to_string(),
            category: "junior".to_string(),
            gender: Gender::H,
            cells: vec![
                Cell {
                    row: 0,
                    col: 0,
                    value: CellValue::Text("Position".to_string()),
                },
                Cell {
                    row: 1,
                    col: 0,
                    value: CellValue::Number(1),
                },
                Cell {
                    row: 1,
                    col: 1,
                    value: CellValue::Empty,
                },
            ],
        }
    }

    #[test]
    fn renders_a_zip_container() {
        let export = ResultsExport {
            filename: "x_results.xlsx".to_string(),
            sheets: vec![sheet("junior-H"), sheet("junior-F")],
        };
        let bytes = render_xlsx(&export).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn empty_export_still_produces_a_workbook() {
        let export = ResultsExport {
            filename: "x_results.xlsx".to_string(),
            sheets: Vec::new(),
        };
        assert!(render_xlsx(&export).unwrap().starts_with(b"PK"));
    }
}
