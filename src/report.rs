//! Plain-text rendering of the analytical views.
//!
//! Every section takes the loaded dataset and prints to stdout; the engine
//! crate stays unaware of presentation.

use anyhow::{Result, anyhow};

use uneb_results_analyzer::analyzers::aggregate::{
    DistrictAggregate, OverallMetrics, absenteeism_rate, by_district, grade_totals, mean_of,
    rate_histogram,
};
use uneb_results_analyzer::analyzers::correlation::{CorrelationMatrix, key_insights};
use uneb_results_analyzer::analyzers::rank::{Direction, filter, group_counts, rank};
use uneb_results_analyzer::analyzers::tier::Tier;
use uneb_results_analyzer::analyzers::utility::pct;
use uneb_results_analyzer::dataset::Dataset;
use uneb_results_analyzer::record::{District, Field, Grade, SchoolRecord};

/// Filters and ordering for the ranking view, parsed from CLI flags.
pub struct RankingOptions {
    pub district: Option<District>,
    pub tier: Option<Tier>,
    pub by: Field,
    pub top: Option<usize>,
}

pub fn parse_district(raw: &str) -> Result<District> {
    District::parse(raw)
        .ok_or_else(|| anyhow!("unknown district {raw:?} (expected MOYO or ADJUMANI)"))
}

pub fn parse_tier(raw: &str) -> Result<Tier> {
    Tier::from_label(raw)
        .ok_or_else(|| anyhow!("unknown tier {raw:?} (expected Excellent, Good, Fair or Poor)"))
}

pub fn parse_field(raw: &str) -> Result<Field> {
    Field::from_label(raw)
        .ok_or_else(|| anyhow!("unknown field {raw:?} (for example pass_rate or total_students)"))
}

/// Key figures over the whole sheet and the district gap.
pub fn overview(dataset: &Dataset) -> Result<()> {
    let records = dataset.records();
    let overall = OverallMetrics::compute(records);

    println!("== Overview ==");
    println!("Schools:           {}", overall.school_count);
    if overall.unrated_schools > 0 {
        println!("  without results: {}", overall.unrated_schools);
    }
    println!("Students:          {}", overall.total_students);
    println!("Examined:          {}", overall.examined);
    println!("Absent:            {} ({:.1}%)", overall.absent, overall.absenteeism_rate);
    println!("Mean pass rate:    {}", fmt_rate(overall.mean_pass_rate));
    println!("Mean failure rate: {}", fmt_rate(overall.mean_failure_rate));

    let means = by_district(records, Field::PassRate);
    for district in District::ALL {
        println!("{:<9} mean pass rate: {}", district.name(), fmt_rate(means[&district]));
    }
    if let (Some(moyo), Some(adjumani)) = (means[&District::Moyo], means[&District::Adjumani]) {
        println!("District gap (MOYO - ADJUMANI): {:+.1} points", moyo - adjumani);
    }
    Ok(())
}

/// Per-district performance means, school shares and sizes.
pub fn performance(dataset: &Dataset) -> Result<()> {
    let records = dataset.records();
    let excellent_means = by_district(records, Field::ExcellentRate);

    println!("== Overall performance ==");
    for district in District::ALL {
        let agg = DistrictAggregate::for_district(records, district);
        let share = pct(agg.school_count as u64, records.len() as u64);
        let avg_size = if agg.school_count == 0 {
            0.0
        } else {
            agg.total_students as f64 / agg.school_count as f64
        };

        println!("{}:", district.name());
        println!("  Schools:             {} ({:.1}% of sheet)", agg.school_count, share);
        println!("  Students:            {}", agg.total_students);
        println!("  Average school size: {avg_size:.1}");
        println!("  Mean pass rate:      {}", fmt_rate(agg.mean_pass_rate));
        println!("  Mean excellent rate: {}", fmt_rate(excellent_means[&district]));
        println!("  Mean failure rate:   {}", fmt_rate(agg.mean_failure_rate));
    }
    Ok(())
}

/// Grade totals and shares per district, plus absenteeism.
pub fn grades(dataset: &Dataset) -> Result<()> {
    println!("== Grade distribution ==");
    for (district, subset) in dataset.partition() {
        let totals = grade_totals(&subset);
        let graded: u64 = totals.values().sum();
        let absent: u64 = subset.iter().map(|r| r.absent as u64).sum();

        println!("{}:", district.name());
        for grade in Grade::ALL {
            println!(
                "  {}: {:>6} ({:.1}% of graded)",
                grade.letter(),
                totals[&grade],
                pct(totals[&grade], graded)
            );
        }
        println!("  Absent: {:>5} ({:.1}% of registered)", absent, absenteeism_rate(&subset));
    }
    Ok(())
}

/// Pass and failure rate histograms per district, plus the top schools.
pub fn distribution(dataset: &Dataset, bin_width: u8) -> Result<()> {
    println!("== Performance distribution ==");
    for (district, subset) in dataset.partition() {
        println!("{}:", district.name());
        for field in [Field::PassRate, Field::FailureRate] {
            println!("  {}:", field.label());
            for bin in rate_histogram(&subset, field, bin_width) {
                if bin.count == 0 {
                    continue;
                }
                println!(
                    "    [{:>3.0}-{:>3.0}) {:<3} {}",
                    bin.lower,
                    bin.upper,
                    bin.count,
                    "#".repeat(bin.count.min(60))
                );
            }
        }
    }

    println!("Top 10 schools by pass rate:");
    print_ranked(&rank(dataset.records(), Field::PassRate, 10, Direction::Descending));
    Ok(())
}

/// Tier counts and the filtered, ranked school table.
pub fn ranking(dataset: &Dataset, options: &RankingOptions) -> Result<()> {
    let records = dataset.records();
    let table = group_counts(records);

    println!("== School ranking ==");
    println!(
        "{:<9} {:>9} {:>6} {:>6} {:>6} {:>8}",
        "", "Excellent", "Good", "Fair", "Poor", "Schools"
    );
    for district in District::ALL {
        println!(
            "{:<9} {:>9} {:>6} {:>6} {:>6} {:>8}",
            district.name(),
            table.count(district, Tier::Excellent),
            table.count(district, Tier::Good),
            table.count(district, Tier::Fair),
            table.count(district, Tier::Poor),
            table.district_total(district)
        );
    }

    let subset: Vec<SchoolRecord> = filter(records, options.district, options.tier)
        .into_iter()
        .cloned()
        .collect();
    let n = options.top.unwrap_or(subset.len());
    let ranked = rank(&subset, options.by, n, Direction::Descending);

    println!("Ranked by {} ({} school(s) after filters):", options.by.label(), subset.len());
    print_ranked(&ranked);
    Ok(())
}

/// The correlation matrix and its headline insights.
pub fn correlation(dataset: &Dataset) -> Result<()> {
    let matrix = CorrelationMatrix::compute(dataset.records())?;

    println!("== Correlation matrix ==");
    let labels: Vec<&str> = matrix.fields.iter().map(|f| f.label()).collect();
    println!("Fields: {}", labels.join(", "));
    for (field, row) in matrix.fields.iter().zip(&matrix.values) {
        let cells: Vec<String> = row.iter().map(|v| format!("{v:>6.2}")).collect();
        println!("{:<15}{}", field.label(), cells.join(" "));
    }

    println!("Insights:");
    for insight in key_insights(&matrix) {
        println!(
            "  {} [r = {:+.2}, {}]: {}",
            insight.label,
            insight.coefficient,
            insight.strength.label(),
            insight.note
        );
    }
    Ok(())
}

/// The comprehensive dashboard: KPIs, gap, extremes, absenteeism, shares.
pub fn insights(dataset: &Dataset) -> Result<()> {
    let records = dataset.records();
    let overall = OverallMetrics::compute(records);

    println!("== Insights ==");
    println!(
        "{} schools, {} students, mean pass rate {}",
        overall.school_count,
        overall.total_students,
        fmt_rate(overall.mean_pass_rate)
    );

    let means = by_district(records, Field::PassRate);
    match (means[&District::Moyo], means[&District::Adjumani]) {
        (Some(moyo), Some(adjumani)) => {
            let leader = if moyo >= adjumani { "MOYO" } else { "ADJUMANI" };
            println!(
                "District comparison: MOYO {moyo:.1}% vs ADJUMANI {adjumani:.1}% \
                 ({leader} leads by {:.1} points)",
                (moyo - adjumani).abs()
            );
        }
        _ => println!("District comparison needs rated schools in both districts"),
    }

    println!("Top 5 schools by pass rate:");
    print_ranked(&rank(records, Field::PassRate, 5, Direction::Descending));
    println!("Bottom 5 schools by pass rate:");
    print_ranked(&rank(records, Field::PassRate, 5, Direction::Ascending));

    println!(
        "Absenteeism: {} students ({:.1}% overall)",
        overall.absent, overall.absenteeism_rate
    );
    for (district, subset) in dataset.partition() {
        println!("  {:<9} {:.1}%", district.name(), absenteeism_rate(&subset));
    }

    let totals = grade_totals(records);
    let graded: u64 = totals.values().sum();
    println!("Grade shares over all graded candidates:");
    for grade in Grade::ALL {
        println!("  {}: {:.1}%", grade.letter(), pct(totals[&grade], graded));
    }
    Ok(())
}

/// Side-by-side profile of two schools found by name substring.
pub fn compare(dataset: &Dataset, query_a: &str, query_b: &str) -> Result<()> {
    let a = dataset
        .find_centre(query_a)
        .ok_or_else(|| anyhow!("no school matches {query_a:?}"))?;
    let b = dataset
        .find_centre(query_b)
        .ok_or_else(|| anyhow!("no school matches {query_b:?}"))?;

    println!("== School comparison ==");
    let width = a.centre_name.len().max(b.centre_name.len()).max(12);
    let row = |label: &str, left: String, right: String| {
        println!("{label:<22} {left:>width$} {right:>width$}");
    };

    row("", a.centre_name.clone(), b.centre_name.clone());
    row("District", a.district.name().to_string(), b.district.name().to_string());
    row("Students", a.total_students.to_string(), b.total_students.to_string());
    row("Examined", a.examined.to_string(), b.examined.to_string());
    row(
        "Absent",
        format!("{} ({:.1}%)", a.absent, pct(a.absent as u64, a.total_students as u64)),
        format!("{} ({:.1}%)", b.absent, pct(b.absent as u64, b.total_students as u64)),
    );
    for grade in Grade::ALL {
        row(
            &format!("Grade {}", grade.letter()),
            a.grades.count(grade).to_string(),
            b.grades.count(grade).to_string(),
        );
    }
    row(
        "Pass rate",
        fmt_rate(a.rates.map(|r| r.pass_rate)),
        fmt_rate(b.rates.map(|r| r.pass_rate)),
    );
    row(
        "Excellent rate",
        fmt_rate(a.rates.map(|r| r.excellent_rate)),
        fmt_rate(b.rates.map(|r| r.excellent_rate)),
    );
    row(
        "Failure rate",
        fmt_rate(a.rates.map(|r| r.failure_rate)),
        fmt_rate(b.rates.map(|r| r.failure_rate)),
    );
    row(
        "Tier",
        a.tier.map_or("n/a".to_string(), |t| t.band().to_string()),
        b.tier.map_or("n/a".to_string(), |t| t.band().to_string()),
    );
    row("Vs district mean", vs_district(dataset.records(), a), vs_district(dataset.records(), b));

    println!("Improvement opportunities (students to lift one band):");
    for school in [a, b] {
        println!(
            "  {}: {} at D/E to reach C, {} at C to reach B, {} at B to reach A",
            school.centre_name,
            school.grades.failing(),
            school.grades.c,
            school.grades.b
        );
    }
    Ok(())
}

/// How far a school's pass rate sits from its own district's mean.
fn vs_district(records: &[SchoolRecord], school: &SchoolRecord) -> String {
    let district_records: Vec<SchoolRecord> = records
        .iter()
        .filter(|r| r.district == school.district)
        .cloned()
        .collect();
    match (school.rates.map(|r| r.pass_rate), mean_of(&district_records, Field::PassRate)) {
        (Some(rate), Some(mean)) => format!("{:+.1} points", rate - mean),
        _ => "n/a".to_string(),
    }
}

fn print_ranked(ranked: &[&SchoolRecord]) {
    for (position, record) in ranked.iter().enumerate() {
        println!(
            "  {:>2}. {} ({}) pass rate {} [{}]",
            position + 1,
            record.centre_name,
            record.district.name(),
            fmt_rate(record.rates.map(|r| r.pass_rate)),
            record.tier.map_or("n/a", |t| t.label())
        );
    }
}

fn fmt_rate(rate: Option<f64>) -> String {
    match rate {
        Some(value) => format!("{value:.1}%"),
        None => "n/a".to_string(),
    }
}
