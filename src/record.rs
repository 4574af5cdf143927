//! Per-school result records and the metrics derived from raw grade counts.

use std::fmt;

use serde::Serialize;

use crate::analyzers::tier::Tier;
use crate::analyzers::utility::pct;
use crate::error::UndefinedRateError;

/// The two districts of the Madi sub-region covered by the sheet.
///
/// A closed enumeration: a new district is a compile-time-visible extension
/// point, not another magic string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum District {
    Moyo,
    Adjumani,
}

impl District {
    pub const ALL: [District; 2] = [District::Moyo, District::Adjumani];

    /// Canonical uppercase name as it appears in the source sheet.
    pub fn name(self) -> &'static str {
        match self {
            District::Moyo => "MOYO",
            District::Adjumani => "ADJUMANI",
        }
    }

    /// Parses a raw district cell, ignoring case and surrounding whitespace.
    pub fn parse(raw: &str) -> Option<District> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "MOYO" => Some(District::Moyo),
            "ADJUMANI" => Some(District::Adjumani),
            _ => None,
        }
    }
}

impl fmt::Display for District {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Grade letters awarded to examined candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    E,
}

impl Grade {
    pub const ALL: [Grade; 5] = [Grade::A, Grade::B, Grade::C, Grade::D, Grade::E];

    pub fn letter(self) -> char {
        match self {
            Grade::A => 'A',
            Grade::B => 'B',
            Grade::C => 'C',
            Grade::D => 'D',
            Grade::E => 'E',
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Raw per-grade candidate counts for one centre.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GradeCounts {
    pub a: u32,
    pub b: u32,
    pub c: u32,
    pub d: u32,
    pub e: u32,
}

impl GradeCounts {
    /// Largest value the loader accepts for a single count cell. Cells
    /// within this bound keep every per-record sum inside `u32`.
    pub const MAX_CELL: u32 = 1_000_000;

    pub fn new(a: u32, b: u32, c: u32, d: u32, e: u32) -> Self {
        Self { a, b, c, d, e }
    }

    pub fn count(self, grade: Grade) -> u32 {
        match grade {
            Grade::A => self.a,
            Grade::B => self.b,
            Grade::C => self.c,
            Grade::D => self.d,
            Grade::E => self.e,
        }
    }

    /// Candidates holding any grade. Every examined candidate holds exactly
    /// one grade, so this equals the examined count.
    pub fn graded(self) -> u32 {
        self.a + self.b + self.c + self.d + self.e
    }

    /// Grades A-C.
    pub fn passing(self) -> u32 {
        self.a + self.b + self.c
    }

    /// Grades A-B.
    pub fn excellent(self) -> u32 {
        self.a + self.b
    }

    /// Grades D-E.
    pub fn failing(self) -> u32 {
        self.d + self.e
    }
}

/// Percentage metrics over examined candidates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RateMetrics {
    pub pass_rate: f64,
    pub excellent_rate: f64,
    pub failure_rate: f64,
}

impl RateMetrics {
    /// Computes the rate metrics for a centre's counts.
    ///
    /// # Errors
    ///
    /// Returns [`UndefinedRateError`] when no candidate was examined, which
    /// leaves every rate without a denominator. Callers that keep such
    /// records recover by storing no rates at all, never a fake zero.
    pub fn compute(grades: GradeCounts, absent: u32) -> Result<RateMetrics, UndefinedRateError> {
        let examined = grades.graded();
        if examined == 0 {
            return Err(UndefinedRateError { total: absent });
        }
        Ok(RateMetrics {
            pass_rate: pct(grades.passing() as u64, examined as u64),
            excellent_rate: pct(grades.excellent() as u64, examined as u64),
            failure_rate: pct(grades.failing() as u64, examined as u64),
        })
    }
}

/// One examination centre's results with every derived metric computed at
/// construction. Records are immutable after that; consumers build new
/// tables instead of editing these in place.
#[derive(Debug, Clone, Serialize)]
pub struct SchoolRecord {
    pub centre_name: String,
    pub district: District,
    pub grades: GradeCounts,
    pub absent: u32,
    pub total_students: u32,
    pub examined: u32,
    /// `None` when every candidate was absent (`examined == 0`).
    pub rates: Option<RateMetrics>,
    /// Performance tier for the pass rate; `None` exactly when `rates` is.
    pub tier: Option<Tier>,
}

impl SchoolRecord {
    /// Derives a full record from raw counts. Pure: same inputs, same record.
    pub fn derive(
        centre_name: String,
        district: District,
        grades: GradeCounts,
        absent: u32,
    ) -> SchoolRecord {
        let total_students = grades.graded() + absent;
        let examined = total_students - absent;
        let rates = RateMetrics::compute(grades, absent).ok();
        let tier = rates.map(|r| Tier::from_pass_rate(r.pass_rate));
        SchoolRecord {
            centre_name,
            district,
            grades,
            absent,
            total_students,
            examined,
            rates,
            tier,
        }
    }
}

/// Numeric per-record quantities the analyzers can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    TotalStudents,
    GradeA,
    GradeB,
    GradeC,
    GradeD,
    GradeE,
    Absent,
    PassRate,
    ExcellentRate,
    FailureRate,
}

impl Field {
    pub const ALL: [Field; 10] = [
        Field::TotalStudents,
        Field::GradeA,
        Field::GradeB,
        Field::GradeC,
        Field::GradeD,
        Field::GradeE,
        Field::Absent,
        Field::PassRate,
        Field::ExcellentRate,
        Field::FailureRate,
    ];

    /// Field list of the correlation matrix, in display order.
    pub const CORRELATION_SET: [Field; 9] = [
        Field::TotalStudents,
        Field::GradeA,
        Field::GradeB,
        Field::GradeC,
        Field::GradeD,
        Field::GradeE,
        Field::Absent,
        Field::PassRate,
        Field::FailureRate,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::TotalStudents => "total_students",
            Field::GradeA => "grade_a",
            Field::GradeB => "grade_b",
            Field::GradeC => "grade_c",
            Field::GradeD => "grade_d",
            Field::GradeE => "grade_e",
            Field::Absent => "absent",
            Field::PassRate => "pass_rate",
            Field::ExcellentRate => "excellent_rate",
            Field::FailureRate => "failure_rate",
        }
    }

    pub fn from_label(label: &str) -> Option<Field> {
        let wanted = label.trim();
        Field::ALL.into_iter().find(|f| f.label() == wanted)
    }

    /// The record's value for this field.
    ///
    /// Rate fields are `None` for records with an undefined denominator;
    /// every mean built on this accessor therefore excludes those records,
    /// while count fields still report them.
    pub fn value(self, record: &SchoolRecord) -> Option<f64> {
        match self {
            Field::TotalStudents => Some(record.total_students as f64),
            Field::GradeA => Some(record.grades.a as f64),
            Field::GradeB => Some(record.grades.b as f64),
            Field::GradeC => Some(record.grades.c as f64),
            Field::GradeD => Some(record.grades.d as f64),
            Field::GradeE => Some(record.grades.e as f64),
            Field::Absent => Some(record.absent as f64),
            Field::PassRate => record.rates.map(|r| r.pass_rate),
            Field::ExcellentRate => record.rates.map(|r| r.excellent_rate),
            Field::FailureRate => record.rates.map(|r| r.failure_rate),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals_include_every_outcome() {
        let record = sample_record(5, 4, 3, 2, 1, 5);

        assert_eq!(record.total_students, 20);
        assert_eq!(record.examined, 15);
        assert_eq!(record.grades.graded() + record.absent, record.total_students);
    }

    #[test]
    fn test_rates_match_hand_computed_values() {
        // 12 of 15 examined passed, 9 were excellent, 3 failed.
        let record = sample_record(5, 4, 3, 2, 1, 5);
        let rates = record.rates.unwrap();

        assert!((rates.pass_rate - 80.0).abs() < 1e-6);
        assert!((rates.excellent_rate - 60.0).abs() < 1e-6);
        assert!((rates.failure_rate - 20.0).abs() < 1e-6);
    }

    #[test]
    fn test_pass_and_failure_rates_are_complementary() {
        let record = sample_record(7, 11, 23, 9, 3, 4);
        let rates = record.rates.unwrap();

        assert!((rates.pass_rate + rates.failure_rate - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_examined_leaves_rates_undefined() {
        let record = sample_record(0, 0, 0, 0, 0, 37);

        assert_eq!(record.total_students, 37);
        assert_eq!(record.examined, 0);
        assert!(record.rates.is_none());
        assert!(record.tier.is_none());
    }

    #[test]
    fn test_rate_metrics_compute_rejects_zero_examined() {
        let err = RateMetrics::compute(GradeCounts::default(), 12).unwrap_err();
        assert_eq!(err, UndefinedRateError { total: 12 });
    }

    #[test]
    fn test_district_parse_normalizes_case_and_whitespace() {
        assert_eq!(District::parse("  moyo "), Some(District::Moyo));
        assert_eq!(District::parse("ADJUMANI"), Some(District::Adjumani));
        assert_eq!(District::parse("Adjumani\t"), Some(District::Adjumani));
        assert_eq!(District::parse("ARUA"), None);
    }

    #[test]
    fn test_field_value_is_none_for_undefined_rates() {
        let record = sample_record(0, 0, 0, 0, 0, 10);

        assert_eq!(Field::PassRate.value(&record), None);
        assert_eq!(Field::FailureRate.value(&record), None);
        // Count fields still report the school.
        assert_eq!(Field::TotalStudents.value(&record), Some(10.0));
        assert_eq!(Field::Absent.value(&record), Some(10.0));
    }

    #[test]
    fn test_field_labels_round_trip() {
        assert_eq!(Field::from_label("pass_rate"), Some(Field::PassRate));
        assert_eq!(Field::from_label(" grade_a "), Some(Field::GradeA));
        assert_eq!(Field::from_label("examined"), None);
    }

    #[test]
    fn test_grade_counts_lookup_matches_fields() {
        let grades = GradeCounts::new(1, 2, 3, 4, 5);
        for (grade, expected) in Grade::ALL.into_iter().zip([1, 2, 3, 4, 5]) {
            assert_eq!(grades.count(grade), expected);
        }
    }

    #[test]
    fn test_sums_at_the_cell_limit_stay_exact() {
        let limit = GradeCounts::MAX_CELL;
        let record = sample_record(limit, limit, limit, limit, limit, limit);

        assert_eq!(record.total_students, 6 * limit);
        assert_eq!(record.examined, 5 * limit);
        assert!((record.rates.unwrap().pass_rate - 60.0).abs() < 1e-6);
    }

    fn sample_record(a: u32, b: u32, c: u32, d: u32, e: u32, absent: u32) -> SchoolRecord {
        SchoolRecord::derive(
            "SAMPLE SECONDARY SCHOOL".to_string(),
            District::Moyo,
            GradeCounts::new(a, b, c, d, e),
            absent,
        )
    }
}
