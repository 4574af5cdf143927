//! The loaded record set and its district partitions.

use std::collections::BTreeMap;

use crate::record::{District, SchoolRecord};

/// The full normalized record set for one results sheet, in file order.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<SchoolRecord>,
}

impl Dataset {
    pub fn new(records: Vec<SchoolRecord>) -> Dataset {
        Dataset { records }
    }

    pub fn records(&self) -> &[SchoolRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Splits the records by district, preserving file order inside each
    /// partition. Both districts are always present, holding an empty
    /// partition when a sheet covers only one of them.
    pub fn partition(&self) -> BTreeMap<District, Vec<SchoolRecord>> {
        let mut partitions: BTreeMap<District, Vec<SchoolRecord>> =
            District::ALL.into_iter().map(|d| (d, Vec::new())).collect();
        for record in &self.records {
            partitions.entry(record.district).or_default().push(record.clone());
        }
        partitions
    }

    /// Records for one district, in file order.
    pub fn district(&self, district: District) -> Vec<&SchoolRecord> {
        self.records.iter().filter(|r| r.district == district).collect()
    }

    /// First centre whose name contains the query, case-insensitively.
    /// An empty query matches nothing rather than everything.
    pub fn find_centre(&self, query: &str) -> Option<&SchoolRecord> {
        let needle = query.trim().to_ascii_uppercase();
        if needle.is_empty() {
            return None;
        }
        self.records
            .iter()
            .find(|r| r.centre_name.to_ascii_uppercase().contains(&needle))
    }

    pub fn total_students(&self) -> u64 {
        self.records.iter().map(|r| r.total_students as u64).sum()
    }
}
