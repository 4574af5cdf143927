//! Ranking, filtering and tier grouping over record sets.

use serde::Serialize;

use crate::analyzers::tier::Tier;
use crate::record::{District, Field, SchoolRecord};

/// Sort direction for rankings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Top or bottom `n` records ordered by one field.
///
/// Records for which the field is undefined are skipped entirely rather than
/// ranked as zero. The sort is stable, so ties keep their load order.
pub fn rank<'a>(
    records: &'a [SchoolRecord],
    by: Field,
    n: usize,
    direction: Direction,
) -> Vec<&'a SchoolRecord> {
    let mut scored: Vec<(&SchoolRecord, f64)> = records
        .iter()
        .filter_map(|r| by.value(r).map(|v| (r, v)))
        .collect();
    scored.sort_by(|(_, a), (_, b)| match direction {
        Direction::Ascending => a.total_cmp(b),
        Direction::Descending => b.total_cmp(a),
    });
    scored.into_iter().take(n).map(|(r, _)| r).collect()
}

/// Records matching every supplied constraint; `None` means unconstrained.
pub fn filter<'a>(
    records: &'a [SchoolRecord],
    district: Option<District>,
    tier: Option<Tier>,
) -> Vec<&'a SchoolRecord> {
    records
        .iter()
        .filter(|r| district.is_none_or(|d| r.district == d))
        .filter(|r| tier.is_none_or(|t| r.tier == Some(t)))
        .collect()
}

/// Count of schools in one district and tier.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TierCell {
    pub district: District,
    pub tier: Tier,
    pub count: usize,
}

/// Per-district school total, counting unrated schools too.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DistrictTotal {
    pub district: District,
    pub schools: usize,
}

/// District-by-tier counts with every combination present even when zero,
/// so stacked charts always render the same bar segments.
#[derive(Debug, Clone, Serialize)]
pub struct TierCountTable {
    pub cells: Vec<TierCell>,
    pub district_totals: Vec<DistrictTotal>,
}

impl TierCountTable {
    pub fn count(&self, district: District, tier: Tier) -> usize {
        self.cells
            .iter()
            .find(|c| c.district == district && c.tier == tier)
            .map_or(0, |c| c.count)
    }

    pub fn district_total(&self, district: District) -> usize {
        self.district_totals
            .iter()
            .find(|t| t.district == district)
            .map_or(0, |t| t.schools)
    }
}

/// Builds the district-by-tier count table. Schools without a defined pass
/// rate appear in their district total but in no tier cell.
pub fn group_counts(records: &[SchoolRecord]) -> TierCountTable {
    let mut cells: Vec<TierCell> = District::ALL
        .into_iter()
        .flat_map(|district| {
            Tier::ALL.into_iter().map(move |tier| TierCell {
                district,
                tier,
                count: 0,
            })
        })
        .collect();
    let mut district_totals: Vec<DistrictTotal> = District::ALL
        .into_iter()
        .map(|district| DistrictTotal {
            district,
            schools: 0,
        })
        .collect();

    for record in records {
        if let Some(total) = district_totals
            .iter_mut()
            .find(|t| t.district == record.district)
        {
            total.schools += 1;
        }
        if let Some(tier) = record.tier {
            if let Some(cell) = cells
                .iter_mut()
                .find(|c| c.district == record.district && c.tier == tier)
            {
                cell.count += 1;
            }
        }
    }

    TierCountTable {
        cells,
        district_totals,
    }
}
