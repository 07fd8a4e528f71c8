//! Spreadsheet report: one sheet per page, one row per detected text line.
//!
//! ## Layout
//!
//! | A | B | C | … | I | J |
//! |---|---|---|---|---|---|
//! | `text` | `x1` | `y1` | … | `y4` | `confidence_score` |
//! | `Hello` | 10 | 20 | … | 60 | 0.93 |
//!
//! Sheets are named by the decimal page number. Column order and header text
//! are consumed by downstream spreadsheets and must not change.
//!
//! Sheet contents are built as plain [`Sheet`] values first and only then
//! written to the workbook, which keeps the row layout testable without
//! reading XLSX back.

use crate::error::PdfOcrError;
use crate::types::Detection;
use rust_xlsxwriter::{Workbook, XlsxError};
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, info};

/// Header row written at the top of every sheet.
pub const HEADER: [&str; 10] = [
    "text",
    "x1",
    "y1",
    "x2",
    "y2",
    "x3",
    "y3",
    "x4",
    "y4",
    "confidence_score",
];

/// One spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

/// The full content of one page's sheet, header row included.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    /// Build the sheet for page `index`: the header, then one row per
    /// detection in input order.
    pub fn for_page(index: u32, detections: &[Detection]) -> Self {
        let mut rows = Vec::with_capacity(detections.len() + 1);
        rows.push(HEADER.iter().map(|&h| Cell::from(h)).collect());
        rows.extend(detections.iter().map(detection_row));
        Self {
            name: index.to_string(),
            rows,
        }
    }
}

/// `[text, x1, y1, x2, y2, x3, y3, x4, y4, confidence]`
pub fn detection_row(d: &Detection) -> Vec<Cell> {
    let mut row = Vec::with_capacity(HEADER.len());
    row.push(Cell::Text(d.text.clone()));
    row.extend(d.flat_coords().into_iter().map(Cell::Number));
    row.push(Cell::Number(d.confidence));
    row
}

/// Accumulates page sheets into one XLSX file.
///
/// `open` → `add_page`* → `close`. `close` consumes the builder, so it cannot
/// be used after the file is written. Each page may be added once; a second
/// `add_page` for the same index fails immediately.
pub struct ReportBuilder {
    path: PathBuf,
    workbook: Workbook,
    text_column_width: f64,
    pages: HashSet<u32>,
}

impl ReportBuilder {
    /// Start a new report at `path`, truncating any existing file.
    pub fn open(path: impl Into<PathBuf>, text_column_width: f64) -> Result<Self, PdfOcrError> {
        let path = path.into();
        let create_err = |source| PdfOcrError::ReportCreate {
            path: path.clone(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(create_err)?;
        }
        std::fs::File::create(&path).map_err(create_err)?;

        debug!("Opened report {}", path.display());
        Ok(Self {
            path,
            workbook: Workbook::new(),
            text_column_width,
            pages: HashSet::new(),
        })
    }

    /// Add the sheet for page `index`.
    ///
    /// # Errors
    /// [`PdfOcrError::DuplicatePage`] if `index` was already added.
    pub fn add_page(&mut self, index: u32, detections: &[Detection]) -> Result<(), PdfOcrError> {
        if !self.pages.insert(index) {
            return Err(PdfOcrError::DuplicatePage {
                path: self.path.clone(),
                index,
            });
        }
        let sheet = Sheet::for_page(index, detections);
        write_sheet(&mut self.workbook, &sheet, self.text_column_width).map_err(|source| {
            PdfOcrError::ReportWrite {
                path: self.path.clone(),
                source,
            }
        })?;
        debug!("Report sheet '{}': {} rows", sheet.name, sheet.rows.len());
        Ok(())
    }

    /// Write the workbook to disk and return its path.
    pub fn close(mut self) -> Result<PathBuf, PdfOcrError> {
        self.workbook
            .save(&self.path)
            .map_err(|source| PdfOcrError::ReportWrite {
                path: self.path.clone(),
                source,
            })?;
        info!("Wrote report {} ({} sheets)", self.path.display(), self.pages.len());
        Ok(self.path)
    }
}

fn write_sheet(workbook: &mut Workbook, sheet: &Sheet, text_width: f64) -> Result<(), XlsxError> {
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&sheet.name)?;
    worksheet.set_column_width(0, text_width)?;

    for (r, row) in sheet.rows.iter().enumerate() {
        let r = r as u32;
        for (c, cell) in row.iter().enumerate() {
            let c = c as u16;
            match cell {
                Cell::Text(s) => worksheet.write_string(r, c, s)?,
                Cell::Number(n) => worksheet.write_number(r, c, *n)?,
            };
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Point;
    use calamine::{open_workbook, Data, Reader, Xlsx};
    use std::path::Path;

    /// Every sheet of the workbook at `path`, in workbook order.
    fn read_back(path: &Path) -> Vec<(String, Vec<Vec<Data>>)> {
        let mut wb: Xlsx<_> = open_workbook(path).unwrap();
        wb.sheet_names()
            .into_iter()
            .map(|name| {
                let range = wb.worksheet_range(&name).unwrap();
                let rows = range.rows().map(|r| r.to_vec()).collect();
                (name, rows)
            })
            .collect()
    }

    fn as_data(row: &[Cell]) -> Vec<Data> {
        row.iter()
            .map(|c| match c {
                Cell::Text(s) => Data::String(s.clone()),
                Cell::Number(n) => Data::Float(*n),
            })
            .collect()
    }

    fn hello() -> Detection {
        Detection::new(
            [
                Point::new(10.0, 20.0),
                Point::new(50.0, 20.0),
                Point::new(50.0, 60.0),
                Point::new(10.0, 60.0),
            ],
            "Hello",
            0.93,
        )
    }

    #[test]
    fn row_is_text_coords_confidence() {
        let row = detection_row(&hello());
        let expected: Vec<Cell> = vec![
            "Hello".into(),
            10.0.into(),
            20.0.into(),
            50.0.into(),
            20.0.into(),
            50.0.into(),
            60.0.into(),
            10.0.into(),
            60.0.into(),
            0.93.into(),
        ];
        assert_eq!(row, expected);
    }

    #[test]
    fn empty_page_has_only_header() {
        let sheet = Sheet::for_page(3, &[]);
        assert_eq!(sheet.name, "3");
        assert_eq!(sheet.rows.len(), 1);
        let header: Vec<Cell> = HEADER.iter().map(|&h| h.into()).collect();
        assert_eq!(sheet.rows[0], header);
    }

    #[test]
    fn n_detections_give_n_plus_one_rows_of_ten_columns() {
        let dets = vec![hello(); 4];
        let sheet = Sheet::for_page(12, &dets);
        assert_eq!(sheet.name, "12");
        assert_eq!(sheet.rows.len(), 5);
        assert!(sheet.rows.iter().all(|r| r.len() == 10));
    }

    #[test]
    fn preserves_detection_order() {
        let mut second = hello();
        second.text = "World".into();
        let sheet = Sheet::for_page(1, &[hello(), second]);
        assert_eq!(sheet.rows[1][0], Cell::Text("Hello".into()));
        assert_eq!(sheet.rows[2][0], Cell::Text("World".into()));
    }

    #[test]
    fn header_text_is_exact() {
        assert_eq!(
            HEADER.join(","),
            "text,x1,y1,x2,y2,x3,y3,x4,y4,confidence_score"
        );
    }

    #[test]
    fn writes_xlsx_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.xlsx");
        let mut report = ReportBuilder::open(&path, 60.0).unwrap();
        report.add_page(1, &[hello()]).unwrap();
        report.add_page(2, &[]).unwrap();
        let written = report.close().unwrap();

        assert_eq!(written, path);
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"PK"), "XLSX must be a zip container");
    }

    #[test]
    fn written_cells_match_sheet_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.xlsx");
        let mut world = hello();
        world.text = "World".into();
        world.confidence = 0.5;

        let mut report = ReportBuilder::open(&path, 60.0).unwrap();
        report.add_page(2, &[hello(), world.clone()]).unwrap();
        report.add_page(10, &[]).unwrap();
        report.close().unwrap();

        let sheets = read_back(&path);
        let names: Vec<&str> = sheets.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["2", "10"]);

        let (_, page2) = &sheets[0];
        assert_eq!(page2.len(), 3);
        assert!(page2.iter().all(|r| r.len() == 10));
        assert_eq!(page2[0], as_data(&Sheet::for_page(2, &[]).rows[0]));
        assert_eq!(page2[1], as_data(&detection_row(&hello())));
        assert_eq!(page2[2], as_data(&detection_row(&world)));
        assert_eq!(
            page2[1],
            vec![
                Data::String("Hello".into()),
                Data::Float(10.0),
                Data::Float(20.0),
                Data::Float(50.0),
                Data::Float(20.0),
                Data::Float(50.0),
                Data::Float(60.0),
                Data::Float(10.0),
                Data::Float(60.0),
                Data::Float(0.93),
            ]
        );

        let (_, page10) = &sheets[1];
        assert_eq!(page10.len(), 1, "header only");
        let header: Vec<Data> = HEADER.iter().map(|h| Data::String(h.to_string())).collect();
        assert_eq!(page10[0], header);
    }

    #[test]
    fn open_truncates_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.xlsx");
        std::fs::write(&path, b"stale content from a previous run").unwrap();
        let _report = ReportBuilder::open(&path, 60.0).unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);
    }

    #[test]
    fn duplicate_page_is_rejected_when_added() {
        let dir = tempfile::tempdir().unwrap();
        let mut report = ReportBuilder::open(dir.path().join("dup.xlsx"), 60.0).unwrap();
        report.add_page(1, &[]).unwrap();
        assert!(matches!(
            report.add_page(1, &[hello()]),
            Err(PdfOcrError::DuplicatePage { index: 1, .. })
        ));
        // the first sheet is still intact and the workbook still saves
        report.add_page(2, &[]).unwrap();
        assert!(report.close().is_ok());
    }
}
