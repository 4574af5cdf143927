//! Output formatting and persistence for analytical results.
//!
//! Supports stdout JSON, JSON documents on disk, and the flat per-school
//! CSV table.

use std::fs::{self, File};
use std::path::Path;

use anyhow::Result;
use csv::WriterBuilder;
use serde::Serialize;
use tracing::{debug, info};

use crate::analyzers::types::{CorrelationDoc, PerformanceDoc, TierDoc};
use crate::record::SchoolRecord;

/// File names of the exported artefacts.
pub const EXPORT_FILES: [&str; 4] = [
    "records.csv",
    "performance.json",
    "tiers.json",
    "correlation.json",
];

/// Flat per-school row for the `records.csv` export. The CSV writer cannot
/// serialize nested structs, so the record is spread into plain columns.
#[derive(Serialize)]
struct RecordRow<'a> {
    district: &'a str,
    centre_name: &'a str,
    grade_a: u32,
    grade_b: u32,
    grade_c: u32,
    grade_d: u32,
    grade_e: u32,
    absent: u32,
    total_students: u32,
    examined: u32,
    pass_rate: Option<f64>,
    excellent_rate: Option<f64>,
    failure_rate: Option<f64>,
    tier: Option<&'static str>,
}

impl<'a> RecordRow<'a> {
    fn from_record(record: &'a SchoolRecord) -> RecordRow<'a> {
        RecordRow {
            district: record.district.name(),
            centre_name: &record.centre_name,
            grade_a: record.grades.a,
            grade_b: record.grades.b,
            grade_c: record.grades.c,
            grade_d: record.grades.d,
            grade_e: record.grades.e,
            absent: record.absent,
            total_students: record.total_students,
            examined: record.examined,
            pass_rate: record.rates.map(|r| r.pass_rate),
            excellent_rate: record.rates.map(|r| r.excellent_rate),
            failure_rate: record.rates.map(|r| r.failure_rate),
            tier: record.tier.map(|t| t.label()),
        }
    }
}

/// Writes the flat per-school table with a single header row. Undefined
/// rates serialize as empty cells, never zeros.
pub fn write_records_csv(path: &Path, records: &[SchoolRecord]) -> Result<()> {
    debug!(path = %path.display(), rows = records.len(), "writing records CSV");

    let mut writer = WriterBuilder::new().from_path(path)?;
    for record in records {
        writer.serialize(RecordRow::from_record(record))?;
    }
    writer.flush()?;

    Ok(())
}

/// Writes a document as pretty-printed JSON.
pub fn write_json<T: Serialize>(path: &Path, document: &T) -> Result<()> {
    debug!(path = %path.display(), "writing JSON document");

    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, document)?;

    Ok(())
}

/// Prints a document as pretty-printed JSON on stdout.
pub fn print_json<T: Serialize>(document: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(document)?);
    Ok(())
}

/// Writes the full export set into `out_dir`, creating the directory first.
///
/// # Errors
///
/// Fails when the directory cannot be created, when a write fails, or when
/// the sheet is too thin for the correlation document.
pub fn export_all(out_dir: &Path, records: &[SchoolRecord]) -> Result<()> {
    fs::create_dir_all(out_dir)?;

    write_records_csv(&out_dir.join("records.csv"), records)?;
    write_json(&out_dir.join("performance.json"), &PerformanceDoc::build(records))?;
    write_json(&out_dir.join("tiers.json"), &TierDoc::build(records))?;
    write_json(&out_dir.join("correlation.json"), &CorrelationDoc::build(records)?)?;

    info!(
        dir = %out_dir.display(),
        files = EXPORT_FILES.len(),
        "export complete"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{District, GradeCounts};
    use std::env;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(format!("uneb_results_{}_{}", std::process::id(), name))
    }

    fn sample_records() -> Vec<SchoolRecord> {
        vec![
            SchoolRecord::derive(
                "ALPHA SS".to_string(),
                District::Moyo,
                GradeCounts::new(5, 4, 3, 2, 1),
                2,
            ),
            SchoolRecord::derive(
                "BETA SS".to_string(),
                District::Adjumani,
                GradeCounts::new(1, 2, 3, 4, 5),
                0,
            ),
            SchoolRecord::derive(
                "GHOST SS".to_string(),
                District::Adjumani,
                GradeCounts::default(),
                12,
            ),
        ]
    }

    #[test]
    fn test_records_csv_has_one_header_and_all_rows() {
        let path = temp_path("records.csv");
        let records = sample_records();

        write_records_csv(&path, &records).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 1 + records.len());
        assert!(lines[0].contains("pass_rate"));
        assert!(lines[1].starts_with("MOYO,ALPHA SS"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_records_csv_leaves_undefined_rates_empty() {
        let path = temp_path("records_ghost.csv");

        write_records_csv(&path, &sample_records()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let ghost = content.lines().find(|l| l.contains("GHOST SS")).unwrap();
        // pass_rate, excellent_rate, failure_rate and tier are all blank.
        assert!(ghost.ends_with(",,,"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_json_produces_parseable_document() {
        let path = temp_path("performance.json");
        let records = sample_records();

        write_json(&path, &PerformanceDoc::build(&records)).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["schema_version"], 1);
        assert_eq!(value["overall"]["school_count"], 3);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_export_all_writes_every_artefact() {
        let dir = temp_path("export_dir");
        let _ = fs::remove_dir_all(&dir);

        export_all(&dir, &sample_records()).unwrap();

        for name in EXPORT_FILES {
            assert!(dir.join(name).exists(), "missing export {name}");
        }

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&PerformanceDoc::build(&sample_records())).unwrap();
    }
}
