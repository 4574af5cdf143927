//! Document types for the exported JSON artefacts.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analyzers::aggregate::{DistrictAggregate, OverallMetrics, grade_totals};
use crate::analyzers::correlation::{CorrelationInsight, CorrelationMatrix, key_insights};
use crate::analyzers::rank::{TierCountTable, group_counts};
use crate::error::InsufficientDataError;
use crate::record::{District, Grade, SchoolRecord};

/// Version stamped into every exported document.
pub const SCHEMA_VERSION: u8 = 1;

/// Sheet-wide and per-district performance aggregates, written out as
/// `performance.json`.
#[derive(Serialize)]
pub struct PerformanceDoc {
    pub schema_version: u8,
    pub generated_at: DateTime<Utc>,
    pub overall: OverallMetrics,
    pub grade_totals: BTreeMap<Grade, u64>,
    pub districts: Vec<DistrictAggregate>,
}

impl PerformanceDoc {
    pub fn build(records: &[SchoolRecord]) -> PerformanceDoc {
        PerformanceDoc {
            schema_version: SCHEMA_VERSION,
            generated_at: Utc::now(),
            overall: OverallMetrics::compute(records),
            grade_totals: grade_totals(records),
            districts: District::ALL
                .into_iter()
                .map(|d| DistrictAggregate::for_district(records, d))
                .collect(),
        }
    }
}

/// Tier membership counts, written out as `tiers.json`.
#[derive(Serialize)]
pub struct TierDoc {
    pub schema_version: u8,
    pub generated_at: DateTime<Utc>,
    pub table: TierCountTable,
}

impl TierDoc {
    pub fn build(records: &[SchoolRecord]) -> TierDoc {
        TierDoc {
            schema_version: SCHEMA_VERSION,
            generated_at: Utc::now(),
            table: group_counts(records),
        }
    }
}

/// Correlation matrix plus headline insights, written out as
/// `correlation.json`.
#[derive(Serialize)]
pub struct CorrelationDoc {
    pub schema_version: u8,
    pub generated_at: DateTime<Utc>,
    pub matrix: CorrelationMatrix,
    pub insights: Vec<CorrelationInsight>,
}

impl CorrelationDoc {
    /// # Errors
    ///
    /// Returns [`InsufficientDataError`] when the sheet is too thin for a
    /// coefficient matrix.
    pub fn build(records: &[SchoolRecord]) -> Result<CorrelationDoc, InsufficientDataError> {
        let matrix = CorrelationMatrix::compute(records)?;
        let insights = key_insights(&matrix);
        Ok(CorrelationDoc {
            schema_version: SCHEMA_VERSION,
            generated_at: Utc::now(),
            matrix,
            insights,
        })
    }
}
