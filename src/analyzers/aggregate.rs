//! Aggregations over record sets: district means, grade totals, key figures
//! and rate histograms.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::analyzers::utility::{mean, pct, stddev};
use crate::record::{District, Field, Grade, SchoolRecord};

/// Mean of `field` over the records where it is defined; `None` when no
/// record qualifies.
pub fn mean_of(records: &[SchoolRecord], field: Field) -> Option<f64> {
    let values: Vec<f64> = records.iter().filter_map(|r| field.value(r)).collect();
    if values.is_empty() {
        return None;
    }
    Some(mean(&values))
}

/// Per-district mean of `field`. Both districts are always present; a
/// district with no qualifying record maps to `None`.
pub fn by_district(records: &[SchoolRecord], field: Field) -> BTreeMap<District, Option<f64>> {
    District::ALL
        .into_iter()
        .map(|district| {
            let values: Vec<f64> = records
                .iter()
                .filter(|r| r.district == district)
                .filter_map(|r| field.value(r))
                .collect();
            let mean_value = if values.is_empty() {
                None
            } else {
                Some(mean(&values))
            };
            (district, mean_value)
        })
        .collect()
}

/// Total candidates per grade letter, all five grades present.
pub fn grade_totals(records: &[SchoolRecord]) -> BTreeMap<Grade, u64> {
    Grade::ALL
        .into_iter()
        .map(|grade| {
            let total = records.iter().map(|r| r.grades.count(grade) as u64).sum();
            (grade, total)
        })
        .collect()
}

/// Share of registered candidates who never sat the exam. 0.0 for an empty
/// record set.
pub fn absenteeism_rate(records: &[SchoolRecord]) -> f64 {
    let absent: u64 = records.iter().map(|r| r.absent as u64).sum();
    let total: u64 = records.iter().map(|r| r.total_students as u64).sum();
    pct(absent, total)
}

/// Aggregate view of one district's schools.
#[derive(Debug, Clone, Serialize)]
pub struct DistrictAggregate {
    pub district: District,
    pub school_count: usize,
    pub total_students: u64,
    pub mean_pass_rate: Option<f64>,
    pub mean_failure_rate: Option<f64>,
    pub grade_totals: BTreeMap<Grade, u64>,
    pub absenteeism_rate: f64,
}

impl DistrictAggregate {
    pub fn for_district(records: &[SchoolRecord], district: District) -> DistrictAggregate {
        let subset: Vec<SchoolRecord> = records
            .iter()
            .filter(|r| r.district == district)
            .cloned()
            .collect();
        DistrictAggregate {
            district,
            school_count: subset.len(),
            total_students: subset.iter().map(|r| r.total_students as u64).sum(),
            mean_pass_rate: mean_of(&subset, Field::PassRate),
            mean_failure_rate: mean_of(&subset, Field::FailureRate),
            grade_totals: grade_totals(&subset),
            absenteeism_rate: absenteeism_rate(&subset),
        }
    }
}

/// Sheet-wide key figures for the overview.
///
/// Mean rates exclude schools with undefined rates; the student counts
/// still include them, since absent candidates are real registrations.
#[derive(Debug, Clone, Serialize)]
pub struct OverallMetrics {
    pub school_count: usize,
    pub unrated_schools: usize,
    pub total_students: u64,
    pub examined: u64,
    pub absent: u64,
    pub mean_pass_rate: Option<f64>,
    pub pass_rate_stddev: Option<f64>,
    pub mean_excellent_rate: Option<f64>,
    pub mean_failure_rate: Option<f64>,
    pub absenteeism_rate: f64,
}

impl OverallMetrics {
    pub fn compute(records: &[SchoolRecord]) -> OverallMetrics {
        let pass_rates: Vec<f64> = records
            .iter()
            .filter_map(|r| Field::PassRate.value(r))
            .collect();
        let (mean_pass_rate, pass_rate_stddev) = if pass_rates.is_empty() {
            (None, None)
        } else {
            let m = mean(&pass_rates);
            (Some(m), Some(stddev(&pass_rates, m)))
        };

        OverallMetrics {
            school_count: records.len(),
            unrated_schools: records.iter().filter(|r| r.rates.is_none()).count(),
            total_students: records.iter().map(|r| r.total_students as u64).sum(),
            examined: records.iter().map(|r| r.examined as u64).sum(),
            absent: records.iter().map(|r| r.absent as u64).sum(),
            mean_pass_rate,
            pass_rate_stddev,
            mean_excellent_rate: mean_of(records, Field::ExcellentRate),
            mean_failure_rate: mean_of(records, Field::FailureRate),
            absenteeism_rate: absenteeism_rate(records),
        }
    }
}

/// One histogram bin over a rate field.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Distribution of a rate field over the fixed [0, 100] span.
///
/// Bins are half-open `[lower, upper)`; the final bin also admits 100.0 so
/// a perfect score is kept. Records where the field is undefined are
/// skipped. `bin_width` is clamped to at least 1.
pub fn rate_histogram(records: &[SchoolRecord], field: Field, bin_width: u8) -> Vec<HistogramBin> {
    let width = f64::from(bin_width.max(1));
    let bin_count = (100.0 / width).ceil() as usize;

    let mut bins: Vec<HistogramBin> = (0..bin_count)
        .map(|i| HistogramBin {
            lower: i as f64 * width,
            upper: ((i + 1) as f64 * width).min(100.0),
            count: 0,
        })
        .collect();

    for value in records.iter().filter_map(|r| field.value(r)) {
        let index = ((value / width) as usize).min(bin_count - 1);
        bins[index].count += 1;
    }
    bins
}
