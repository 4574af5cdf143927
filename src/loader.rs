//! Loads the raw results sheet into normalized records.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::info;

use crate::error::LoadError;
use crate::record::{District, GradeCounts, SchoolRecord};

/// Columns the source sheet must carry, in canonical order.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "DistrictName",
    "CentreName",
    "As",
    "Bs",
    "Cs",
    "Ds",
    "Es",
    "Absent",
];

/// Reads every record from a CSV file on disk, in file order.
///
/// # Errors
///
/// Returns [`LoadError`] when the file cannot be opened or any row fails
/// validation. The whole load fails rather than returning a partial sheet.
pub fn load_records(path: &Path) -> Result<Vec<SchoolRecord>, LoadError> {
    let file = File::open(path)?;
    let records = load_records_from_reader(file)?;
    info!(
        path = %path.display(),
        count = records.len(),
        "loaded results sheet"
    );
    Ok(records)
}

/// Reads records from any CSV byte stream. Embedded fixtures come in this way.
pub fn load_records_from_reader<R: Read>(input: R) -> Result<Vec<SchoolRecord>, LoadError> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(input);

    let headers = reader.headers()?.clone();
    let columns = ColumnIndex::resolve(&headers)?;

    let mut records = Vec::new();
    // The header is row 1, so the first data row reports as row 2.
    for (offset, row) in reader.records().enumerate() {
        let row = row?;
        records.push(columns.record_from_row(&row, offset + 2)?);
    }
    Ok(records)
}

/// Positions of the required columns within one sheet's header row.
struct ColumnIndex {
    district: usize,
    centre: usize,
    grades: [usize; 5],
    absent: usize,
}

impl ColumnIndex {
    /// Resolves each required column by name, in canonical order, so the
    /// error for a broken sheet always names the first missing column.
    fn resolve(headers: &StringRecord) -> Result<ColumnIndex, LoadError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| LoadError::MissingColumn {
                    column: name.to_string(),
                })
        };
        let [district, centre, a, b, c, d, e, absent] = REQUIRED_COLUMNS;
        Ok(ColumnIndex {
            district: find(district)?,
            centre: find(centre)?,
            grades: [find(a)?, find(b)?, find(c)?, find(d)?, find(e)?],
            absent: find(absent)?,
        })
    }

    fn record_from_row(
        &self,
        row: &StringRecord,
        row_number: usize,
    ) -> Result<SchoolRecord, LoadError> {
        let cell = |index: usize| row.get(index).unwrap_or("");

        let raw_district = cell(self.district);
        let district = District::parse(raw_district).ok_or_else(|| LoadError::UnknownDistrict {
            row: row_number,
            value: raw_district.to_string(),
        })?;
        let centre_name = cell(self.centre).to_string();

        let count = |index: usize, column: &str| -> Result<u32, LoadError> {
            let value = cell(index);
            value
                .parse::<u32>()
                .ok()
                .filter(|parsed| *parsed <= GradeCounts::MAX_CELL)
                .ok_or_else(|| LoadError::InvalidCount {
                    row: row_number,
                    column: column.to_string(),
                    value: value.to_string(),
                })
        };
        let grades = GradeCounts::new(
            count(self.grades[0], "As")?,
            count(self.grades[1], "Bs")?,
            count(self.grades[2], "Cs")?,
            count(self.grades[3], "Ds")?,
            count(self.grades[4], "Es")?,
        );
        let absent = count(self.absent, "Absent")?;

        Ok(SchoolRecord::derive(centre_name, district, grades, absent))
    }
}
