use crate::file::is_supported_workbook;
use calamine::{open_workbook_auto, Data, Range, Reader, SheetType, SheetVisible, Sheets};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use orderbook_core::{IngestError, RawGrid, Result, SheetInfo, SheetVisibility, WorkbookSource};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Convert an Excel serial date to a timestamp
fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    // Excel day zero is 1899-12-30 once the 1900 leap year bug is accounted for
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let days = serial.trunc() as i64;
    let seconds = ((serial - serial.trunc()) * SECONDS_PER_DAY).round() as i64;
    epoch
        .checked_add_signed(Duration::try_days(days)?)?
        .checked_add_signed(Duration::try_seconds(seconds)?)
}

/// Convert calamine Data to the text form used by the raw grid
fn data_to_text(data: &Data) -> Option<String> {
    match data {
        Data::Empty => None,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(f.to_string()),
        Data::Bool(b) => Some(if *b { "True" } else { "False" }.to_string()),
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            Some(match serial_to_datetime(serial) {
                Some(ts) => ts.format("%Y-%m-%d %H:%M:%S").to_string(),
                None => serial.to_string(),
            })
        }
        Data::Error(e) => Some(e.to_string()),
    }
}

/// Convert a used range to a grid anchored at A1
fn range_to_grid(range: &Range<Data>) -> RawGrid {
    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    let mut rows: Vec<Vec<Option<String>>> = vec![Vec::new(); start_row as usize];
    for row in range.rows() {
        let mut cells = vec![None; start_col as usize];
        cells.extend(row.iter().map(data_to_text));
        rows.push(cells);
    }
    RawGrid::new(rows)
}

fn visibility(visible: &SheetVisible) -> SheetVisibility {
    match visible {
        SheetVisible::Visible => SheetVisibility::Visible,
        SheetVisible::Hidden => SheetVisibility::Hidden,
        SheetVisible::VeryHidden => SheetVisibility::VeryHidden,
    }
}

/// An opened Excel workbook (`.xlsx`, `.xlsm`, `.xls`, `.xlsb`)
pub struct ExcelWorkbook {
    name: String,
    workbook: Sheets<BufReader<File>>,
}

impl ExcelWorkbook {
    /// Open a workbook from disk
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedFormat` for unknown extensions and `WorkbookOpen`
    /// if the file cannot be opened or parsed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let name = path.display().to_string();
        if !is_supported_workbook(path) {
            return Err(IngestError::UnsupportedFormat { name });
        }

        let workbook = open_workbook_auto(path).map_err(|e| IngestError::WorkbookOpen {
            name: name.clone(),
            reason: e.to_string(),
        })?;

        Ok(ExcelWorkbook { name, workbook })
    }

    /// Display name (the path the workbook was opened from)
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl WorkbookSource for ExcelWorkbook {
    fn sheets(&mut self) -> Result<Vec<SheetInfo>> {
        Ok(self
            .workbook
            .sheets_metadata()
            .iter()
            .filter(|s| {
                let is_worksheet = matches!(s.typ, SheetType::WorkSheet);
                if !is_worksheet {
                    debug!(
                        workbook = %self.name,
                        sheet = %s.name,
                        kind = ?s.typ,
                        "ignoring non-worksheet"
                    );
                }
                is_worksheet
            })
            .map(|s| SheetInfo {
                name: s.name.clone(),
                visibility: visibility(&s.visible),
            })
            .collect())
    }

    fn read_grid(&mut self, sheet: &str) -> Result<RawGrid> {
        let range = self
            .workbook
            .worksheet_range(sheet)
            .map_err(|e| IngestError::SheetRead {
                sheet: sheet.to_string(),
                reason: e.to_string(),
            })?;
        Ok(range_to_grid(&range))
    }
}
