//! Bulk participant registration from an uploaded start list.
//!
//! Columns, in order: dossard, category, last name, first name, gender
//! (`H`/`F`), optional club. The first row is a header. A dossard that is
//! already registered is skipped; any other bad row stops the import, and
//! rows inserted before it stay in place.

use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{Result, StorageError};
use crate::models::{Gender, Participant};
use crate::store::Store;

const MIN_COLUMNS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Spreadsheet,
}

impl FileKind {
    pub fn from_filename(filename: &str) -> Result<Self> {
        let lower = filename.to_lowercase();
        if lower.ends_with(".csv") {
            Ok(Self::Csv)
        } else if lower.ends_with(".xlsx") || lower.ends_with(".xls") {
            Ok(Self::Spreadsheet)
        } else {
            Err(StorageError::InvalidInput(format!(
                "unsupported file format: {filename}. Only CSV and Excel files are supported"
            )))
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct ImportSummary {
    pub created: usize,
    pub skipped: usize,
}

/// One row of a start list with its 1-based line in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRow {
    pub line: usize,
    pub cells: Vec<String>,
}

impl FileRow {
    fn is_blank(&self) -> bool {
        self.cells.iter().all(|cell| cell.trim().is_empty())
    }
}

/// Reads every row of the file as strings. Blank rows are dropped; the
/// remaining rows keep the line number they had in the file.
pub fn read_rows(filename: &str, bytes: &[u8]) -> Result<Vec<FileRow>> {
    let rows = match FileKind::from_filename(filename)? {
        FileKind::Csv => read_csv(bytes)?,
        FileKind::Spreadsheet => read_spreadsheet(bytes)?,
    };

    Ok(rows.into_iter().filter(|row| !row.is_blank()).collect())
}

fn read_csv(bytes: &[u8]) -> Result<Vec<FileRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    reader
        .records()
        .enumerate()
        .map(|(index, record)| -> Result<FileRow> {
            let record = record
                .map_err(|e| StorageError::InvalidInput(format!("failed to read CSV file: {e}")))?;
            let line = record
                .position()
                .map(|pos| record_line(bytes, pos))
                .unwrap_or(index + 1);
            Ok(FileRow {
                line,
                cells: record.iter().map(str::to_string).collect(),
            })
        })
        .collect()
}

/// Line of the record starting at `pos`. The reader may report the position
/// before the empty lines it skipped, so those are counted from the input.
fn record_line(bytes: &[u8], pos: &csv::Position) -> usize {
    let start = usize::try_from(pos.byte())
        .unwrap_or(bytes.len())
        .min(bytes.len());
    let skipped = bytes[start..]
        .iter()
        .take_while(|b| matches!(b, b'\r' | b'\n'))
        .filter(|b| **b == b'\n')
        .count();
    usize::try_from(pos.line())
        .unwrap_or(usize::MAX)
        .saturating_add(skipped)
}

fn read_spreadsheet(bytes: &[u8]) -> Result<Vec<FileRow>> {
    let invalid = |e: calamine::Error| {
        StorageError::InvalidInput(format!("failed to read Excel file: {e}"))
    };

    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec())).map_err(invalid)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| StorageError::InvalidInput("Excel file has no sheet".to_string()))?
        .map_err(invalid)?;

    // The used range starts at the first non-empty row, not at row 0.
    let first_row = range
        .start()
        .and_then(|(row, _)| usize::try_from(row).ok())
        .unwrap_or(0);

    Ok(range
        .rows()
        .enumerate()
        .map(|(index, row)| FileRow {
            line: first_row + index + 1,
            cells: row.iter().map(cell_text).collect(),
        })
        .collect())
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Parses one data row. `line` is the 1-based row number in the file.
pub fn parse_row(competition_id: i32, line: usize, row: &[String]) -> Result<Participant> {
    if row.len() < MIN_COLUMNS {
        return Err(StorageError::Import {
            row: line,
            reason: "expected at least 5 columns (dossard number, category, last name, \
                     first name, gender, club)"
                .to_string(),
        });
    }

    let dossard = row[0].trim();
    let dossard_number = dossard.parse::<i32>().map_err(|e| StorageError::Import {
        row: line,
        reason: format!("invalid dossard number '{dossard}': {e}"),
    })?;
    let gender = row[4].parse::<Gender>().map_err(|_| StorageError::Import {
        row: line,
        reason: format!("invalid gender: expected 'H' or 'F', got '{}'", row[4].trim()),
    })?;
    let club = row
        .get(5)
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .map(str::to_string);

    Ok(Participant {
        competition_id,
        dossard_number,
        category: row[1].trim().to_string(),
        last_name: row[2].trim().to_string(),
        first_name: row[3].trim().to_string(),
        gender,
        club,
    })
}

pub async fn import_participants(
    store: &dyn Store,
    competition_id: i32,
    filename: &str,
    bytes: &[u8],
) -> Result<ImportSummary> {
    store.get_competition(competition_id).await?;

    let rows = read_rows(filename, bytes)?;
    if rows.len() < 2 {
        return Err(StorageError::InvalidInput(
            "expected a header row and at least one participant row".to_string(),
        ));
    }

    let mut summary = ImportSummary::default();
    for row in rows.iter().skip(1) {
        let line = row.line;
        let participant = parse_row(competition_id, line, &row.cells)?;

        match store.create_participant(&participant).await {
            Ok(_) => summary.created += 1,
            Err(e) if e.is_duplicate() => {
                tracing::warn!(
                    competition_id,
                    row = line,
                    dossard = participant.dossard_number,
                    "Skipping already registered dossard"
                );
                summary.skipped += 1;
            }
            Err(e) => {
                return Err(StorageError::Import {
                    row: line,
                    reason: e.to_string(),
                });
            }
        }
    }

    tracing::info!(
        competition_id,
        created = summary.created,
        skipped = summary.skipped,
        "Participants imported"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ParticipantStore;
    use crate::test_support::Fixture;
    use rstest::rstest;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[rstest]
    #[case("start.csv", FileKind::Csv)]
    #[case("START.XLSX", FileKind::Spreadsheet)]
    #[case("old.xls", FileKind::Spreadsheet)]
    fn detects_file_kind(#[case] filename: &str, #[case] expected: FileKind) {
        assert_eq!(FileKind::from_filename(filename).unwrap(), expected);
    }

    #[test]
    fn rejects_unknown_extension() {
        assert!(matches!(
            FileKind::from_filename("list.pdf"),
            Err(StorageError::InvalidInput(_))
        ));
    }

    #[test]
    fn parses_a_full_row() {
        let participant =
            parse_row(1, 2, &row(&[" 12 ", "junior", "Martin", "Zoe", "f", " ASM "])).unwrap();
        assert_eq!(participant.dossard_number, 12);
        assert_eq!(participant.gender, Gender::F);
        assert_eq!(participant.last_name, "Martin");
        assert_eq!(participant.club.as_deref(), Some("ASM"));
    }

    #[rstest]
    #[case(row(&["12", "junior", "Martin", "Zoe"]))]
    #[case(row(&["x12", "junior", "Martin", "Zoe", "F"]))]
    #[case(row(&["12", "junior", "Martin", "Zoe", "M"]))]
    fn bad_rows_report_their_line(#[case] cells: Vec<String>) {
        let err = parse_row(1, 4, &cells).unwrap_err();
        assert!(matches!(err, StorageError::Import { row: 4, .. }));
    }

    #[test]
    fn csv_rows_may_have_varying_lengths() {
        let csv = "dossard,category,last,first,gender,club\n1,junior,A,B,H\n2,junior,C,D,F,Club\n\n";
        let rows = read_rows("list.csv", csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].cells.len(), 5);
        assert_eq!(rows[2].cells.len(), 6);
    }

    #[tokio::test]
    async fn duplicate_dossards_are_skipped() {
        let fixture = Fixture::junior_zone_a().await;
        let csv = "dossard,category,last,first,gender,club\n\
                   1,junior,Petit,Ana,F,ASM\n\
                   2,senior,Grand,Leo,H,\n\
                   7,junior,Durand,Lea,H,ASM\n";

        let summary = import_participants(
            &fixture.store,
            fixture.competition_id,
            "start.csv",
            csv.as_bytes(),
        )
        .await
        .unwrap();
        assert_eq!(
            summary,
            ImportSummary {
                created: 2,
                skipped: 1
            }
        );

        let participants = fixture
            .store
            .list_participants(fixture.competition_id)
            .await
            .unwrap();
        let dossards: Vec<i32> = participants.iter().map(|p| p.dossard_number).collect();
        assert_eq!(dossards, vec![1, 2, 7]);
        assert_eq!(participants[1].club, None);
    }

    #[tokio::test]
    async fn bad_row_stops_but_keeps_earlier_rows() {
        let fixture = Fixture::junior_zone_a().await;
        let csv = "header\n1,junior,Petit,Ana,F\n2,junior,Grand,Leo,X\n3,junior,Roux,Max,H\n";

        let err = import_participants(
            &fixture.store,
            fixture.competition_id,
            "start.csv",
            csv.as_bytes(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, StorageError::Import { row: 3, .. }));

        let registered = fixture
            .store
            .list_participants(fixture.competition_id)
            .await
            .unwrap();
        assert_eq!(registered.len(), 2);
    }

    #[test]
    fn rows_keep_their_file_line_after_blank_rows() {
        let csv = "header\n1,junior,Petit,Ana,F\n\n,,,,\n2,junior,Grand,Leo,H\n";
        let rows = read_rows("list.csv", csv.as_bytes()).unwrap();
        let lines: Vec<usize> = rows.iter().map(|r| r.line).collect();
        assert_eq!(lines, vec![1, 2, 5]);
    }

    #[tokio::test]
    async fn bad_row_after_blank_rows_reports_its_file_line() {
        let fixture = Fixture::junior_zone_a().await;
        let csv = "header\n1,junior,Petit,Ana,F\n\n  ,,\n2,junior,Grand,Leo,X\n";

        let err = import_participants(
            &fixture.store,
            fixture.competition_id,
            "start.csv",
            csv.as_bytes(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, StorageError::Import { row: 5, .. }));
    }

    #[tokio::test]
    async fn spreadsheet_rows_keep_their_line_after_blank_rows() {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Dossard").unwrap();
        for (col, value) in ["3", "junior", "Blanc", "Ines", "Z"].into_iter().enumerate() {
            sheet.write_string(3, col as u16, value).unwrap();
        }
        let bytes = workbook.save_to_buffer().unwrap();

        let rows = read_rows("start.xlsx", &bytes).unwrap();
        let lines: Vec<usize> = rows.iter().map(|r| r.line).collect();
        assert_eq!(lines, vec![1, 4]);

        let fixture = Fixture::junior_zone_a().await;
        let err = import_participants(&fixture.store, fixture.competition_id, "start.xlsx", &bytes)
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Import { row: 4, .. }));
    }

    #[tokio::test]
    async fn header_only_file_is_rejected() {
        let fixture = Fixture::junior_zone_a().await;
        let err = import_participants(
            &fixture.store,
            fixture.competition_id,
            "start.csv",
            b"dossard,category,last,first,gender\n",
        )
        .await
        .unwrap_err();
        assert!(matches!(err, StorageError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn reads_participants_from_a_spreadsheet() {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        for (col, header) in ["Dossard", "Category", "Last", "First", "Gender"]
            .into_iter()
            .enumerate()
        {
            sheet.write_string(0, col as u16, header).unwrap();
        }
        sheet.write_number(1, 0, 21.0).unwrap();
        sheet.write_string(1, 1, "junior").unwrap();
        sheet.write_string(1, 2, "Noir").unwrap();
        sheet.write_string(1, 3, "Eva").unwrap();
        sheet.write_string(1, 4, "F").unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let fixture = Fixture::junior_zone_a().await;
        let summary =
            import_participants(&fixture.store, fixture.competition_id, "list.xlsx", &bytes)
                .await
                .unwrap();
        assert_eq!(summary.created, 1);

        let participant = fixture
            .store
            .get_participant(fixture.competition_id, 21)
            .await
            .unwrap();
        assert_eq!(participant.first_name, "Eva");
        assert_eq!(participant.club, None);
    }
}
