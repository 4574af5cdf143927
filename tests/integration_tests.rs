use std::fs;
use std::sync::Arc;

use uneb_results_analyzer::analyzers::aggregate::by_district;
use uneb_results_analyzer::analyzers::correlation::CorrelationMatrix;
use uneb_results_analyzer::analyzers::rank::{Direction, group_counts, rank};
use uneb_results_analyzer::analyzers::tier::Tier;
use uneb_results_analyzer::cache::DatasetCache;
use uneb_results_analyzer::dataset::Dataset;
use uneb_results_analyzer::loader::load_records_from_reader;
use uneb_results_analyzer::output::{EXPORT_FILES, export_all};
use uneb_results_analyzer::record::{District, Field, SchoolRecord};

const FIXTURE: &[u8] = include_bytes!("fixtures/district_results.csv");

fn fixture_records() -> Vec<SchoolRecord> {
    load_records_from_reader(FIXTURE).expect("fixture sheet must load")
}

#[test]
fn test_sheet_to_district_means_and_tiers() {
    let records = fixture_records();
    assert_eq!(records.len(), 6);

    let means = by_district(&records, Field::PassRate);
    assert!((means[&District::Moyo].unwrap() - 70.0).abs() < 1e-9);
    assert!((means[&District::Adjumani].unwrap() - 25.0).abs() < 1e-9);

    let dataset = Dataset::new(records);
    let moyo_tiers: Vec<Option<Tier>> = dataset
        .district(District::Moyo)
        .iter()
        .map(|r| r.tier)
        .collect();
    let adjumani_tiers: Vec<Option<Tier>> = dataset
        .district(District::Adjumani)
        .iter()
        .map(|r| r.tier)
        .collect();

    assert_eq!(moyo_tiers, [Some(Tier::Excellent), Some(Tier::Good), Some(Tier::Fair)]);
    assert_eq!(adjumani_tiers, [Some(Tier::Poor), Some(Tier::Poor), None]);
}

#[test]
fn test_all_absent_school_is_counted_but_never_rated() {
    let records = fixture_records();
    let table = group_counts(&records);

    // OBONGI RIVERSIDE SS has every candidate absent: it belongs to the
    // district total but to no tier cell, and it leaves the mean alone.
    assert_eq!(table.district_total(District::Adjumani), 3);
    let tiered: usize = Tier::ALL
        .into_iter()
        .map(|t| table.count(District::Adjumani, t))
        .sum();
    assert_eq!(tiered, 2);

    let means = by_district(&records, Field::PassRate);
    assert!((means[&District::Adjumani].unwrap() - 25.0).abs() < 1e-9);
}

#[test]
fn test_top_and_bottom_ranks_partition_ten_schools() {
    let mut sheet = String::from("DistrictName,CentreName,As,Bs,Cs,Ds,Es,Absent\n");
    // Pass rates 5%, 15%, ..., 95% over twenty graded candidates each.
    for (i, passing) in (1..=19).step_by(2).enumerate() {
        let district = if i % 2 == 0 { "MOYO" } else { "ADJUMANI" };
        sheet.push_str(&format!(
            "{district},SCHOOL {i} SS,{passing},0,0,{},0,0\n",
            20 - passing
        ));
    }
    let records = load_records_from_reader(sheet.as_bytes()).unwrap();
    assert_eq!(records.len(), 10);

    let top: Vec<&str> = rank(&records, Field::PassRate, 5, Direction::Descending)
        .iter()
        .map(|r| r.centre_name.as_str())
        .collect();
    let bottom: Vec<&str> = rank(&records, Field::PassRate, 5, Direction::Ascending)
        .iter()
        .map(|r| r.centre_name.as_str())
        .collect();

    assert_eq!(top.len(), 5);
    assert_eq!(bottom.len(), 5);
    assert!(top.iter().all(|name| !bottom.contains(name)));

    let mut all: Vec<&str> = top.iter().chain(bottom.iter()).copied().collect();
    all.sort_unstable();
    let mut expected: Vec<String> = (0..10).map(|i| format!("SCHOOL {i} SS")).collect();
    expected.sort_unstable();
    assert_eq!(all, expected);
}

#[test]
fn test_correlation_matrix_holds_its_invariants_on_the_fixture() {
    let records = fixture_records();
    let matrix = CorrelationMatrix::compute(&records).unwrap();

    let n = matrix.fields.len();
    for i in 0..n {
        assert_eq!(matrix.values[i][i], 1.0);
        for j in 0..n {
            assert_eq!(matrix.values[i][j], matrix.values[j][i]);
        }
    }

    let r = matrix.get(Field::PassRate, Field::FailureRate).unwrap();
    assert!((r + 1.0).abs() < 1e-6);
}

#[test]
fn test_export_writes_consistent_artefacts() {
    let dir = std::env::temp_dir().join(format!("uneb_results_it_{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);

    let records = fixture_records();
    export_all(&dir, &records).unwrap();

    for name in EXPORT_FILES {
        assert!(dir.join(name).exists(), "missing export {name}");
    }

    let csv = fs::read_to_string(dir.join("records.csv")).unwrap();
    assert_eq!(csv.lines().count(), 1 + records.len());

    let performance: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.join("performance.json")).unwrap()).unwrap();
    assert_eq!(performance["schema_version"], 1);
    assert_eq!(performance["overall"]["school_count"], 6);
    assert_eq!(performance["districts"].as_array().unwrap().len(), 2);

    let tiers: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.join("tiers.json")).unwrap()).unwrap();
    assert_eq!(tiers["table"]["cells"].as_array().unwrap().len(), 8);

    let correlation: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.join("correlation.json")).unwrap()).unwrap();
    assert_eq!(correlation["insights"].as_array().unwrap().len(), 4);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_cache_reuses_one_parse_across_queries() {
    let path = std::env::temp_dir().join(format!("uneb_results_it_{}.csv", std::process::id()));
    fs::write(&path, FIXTURE).unwrap();

    let cache = DatasetCache::new();
    let first = cache.load(&path).unwrap();
    let second = cache.load(&path).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.len(), 6);

    fs::remove_file(&path).unwrap();
}
