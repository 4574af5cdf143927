//! Pearson correlation matrix over record fields, plus the named insights
//! the reporting views highlight.

use serde::Serialize;

use crate::analyzers::utility::pearson;
use crate::error::InsufficientDataError;
use crate::record::{Field, SchoolRecord};

/// Fewest records (and fewest joint observations per pair) a coefficient
/// can be computed from.
pub const MIN_RECORDS: usize = 2;

/// Symmetric Pearson coefficient matrix with diagonal exactly 1.0.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    pub fields: Vec<Field>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Matrix over the standard field list, [`Field::CORRELATION_SET`].
    ///
    /// # Errors
    ///
    /// Returns [`InsufficientDataError`] when fewer than [`MIN_RECORDS`]
    /// records exist, or when some field pair has fewer than [`MIN_RECORDS`]
    /// records with both sides defined. A thin sheet fails loudly instead of
    /// reporting a coefficient that means nothing.
    pub fn compute(records: &[SchoolRecord]) -> Result<CorrelationMatrix, InsufficientDataError> {
        Self::compute_for(records, &Field::CORRELATION_SET)
    }

    /// Matrix over an explicit field list.
    pub fn compute_for(
        records: &[SchoolRecord],
        fields: &[Field],
    ) -> Result<CorrelationMatrix, InsufficientDataError> {
        if records.len() < MIN_RECORDS {
            return Err(InsufficientDataError {
                required: MIN_RECORDS,
                found: records.len(),
            });
        }

        let n = fields.len();
        let mut values = vec![vec![0.0; n]; n];
        for i in 0..n {
            values[i][i] = 1.0;
            for j in (i + 1)..n {
                let r = pairwise_coefficient(records, fields[i], fields[j])?;
                values[i][j] = r;
                values[j][i] = r;
            }
        }
        Ok(CorrelationMatrix {
            fields: fields.to_vec(),
            values,
        })
    }

    /// Coefficient for a field pair; `None` when either field is not part
    /// of this matrix.
    pub fn get(&self, a: Field, b: Field) -> Option<f64> {
        let i = self.fields.iter().position(|f| *f == a)?;
        let j = self.fields.iter().position(|f| *f == b)?;
        Some(self.values[i][j])
    }
}

/// Pearson coefficient over the records where both fields are defined.
/// Records missing either side are dropped pairwise, not zero-filled.
fn pairwise_coefficient(
    records: &[SchoolRecord],
    a: Field,
    b: Field,
) -> Result<f64, InsufficientDataError> {
    let mut xs = Vec::with_capacity(records.len());
    let mut ys = Vec::with_capacity(records.len());
    for record in records {
        if let (Some(x), Some(y)) = (a.value(record), b.value(record)) {
            xs.push(x);
            ys.push(y);
        }
    }
    if xs.len() < MIN_RECORDS {
        return Err(InsufficientDataError {
            required: MIN_RECORDS,
            found: xs.len(),
        });
    }
    Ok(pearson(&xs, &ys))
}

/// Strength bucket for a coefficient's magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    Strong,
    Moderate,
    Weak,
    Negligible,
}

impl Strength {
    pub fn classify(r: f64) -> Strength {
        let magnitude = r.abs();
        if magnitude >= 0.7 {
            Strength::Strong
        } else if magnitude >= 0.5 {
            Strength::Moderate
        } else if magnitude >= 0.3 {
            Strength::Weak
        } else {
            Strength::Negligible
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Strength::Strong => "strong",
            Strength::Moderate => "moderate",
            Strength::Weak => "weak",
            Strength::Negligible => "negligible",
        }
    }
}

/// A headline relationship pulled out of the matrix for the insights view.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationInsight {
    pub label: String,
    pub coefficient: f64,
    pub strength: Strength,
    pub note: String,
}

impl CorrelationInsight {
    fn new(label: &str, coefficient: f64, note: String) -> CorrelationInsight {
        CorrelationInsight {
            label: label.to_string(),
            coefficient,
            strength: Strength::classify(coefficient),
            note,
        }
    }
}

/// The four relationships the insights view reports, in display order.
pub fn key_insights(matrix: &CorrelationMatrix) -> Vec<CorrelationInsight> {
    let mut insights = Vec::new();

    if let Some(r) = matrix.get(Field::PassRate, Field::FailureRate) {
        insights.push(CorrelationInsight::new(
            "pass rate vs failure rate",
            r,
            "pass and failure rates are complements; every point lost by one \
             is gained by the other"
                .to_string(),
        ));
    }
    if let Some(r) = matrix.get(Field::PassRate, Field::TotalStudents) {
        insights.push(CorrelationInsight::new(
            "pass rate vs school size",
            r,
            directional_note("school size", r),
        ));
    }
    if let Some(r) = matrix.get(Field::PassRate, Field::Absent) {
        insights.push(CorrelationInsight::new(
            "pass rate vs absenteeism",
            r,
            directional_note("the absentee count", r),
        ));
    }
    if let (Some(a), Some(b)) = (
        matrix.get(Field::PassRate, Field::GradeA),
        matrix.get(Field::PassRate, Field::GradeB),
    ) {
        // Mean of the A and B coefficients stands in for a combined
        // "excellent grades" series.
        let r = (a + b) / 2.0;
        insights.push(CorrelationInsight::new(
            "pass rate vs excellent grades",
            r,
            directional_note("the A and B counts", r),
        ));
    }
    insights
}

fn directional_note(subject: &str, r: f64) -> String {
    let strength = Strength::classify(r);
    if strength == Strength::Negligible {
        format!("{subject} shows no meaningful linear relationship with the pass rate")
    } else {
        let direction = if r > 0.0 { "rises" } else { "falls" };
        format!(
            "the pass rate {direction} with {subject} ({} relationship)",
            strength.label()
        )
    }
}
