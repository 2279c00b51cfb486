use pretty_assertions::assert_eq;
use tally_engine::{format_percent, recalculate, summarize};
use tally_model::{CapKind, Line, ProjectMetadata, Section};

fn line(id: &str, section: &str, parent: Option<&str>, unit_cost: f64) -> Line {
    let mut l = Line::new(id.to_string(), section.to_string());
    l.parent_id = parent.map(str::to_string);
    l.unit_cost = unit_cost;
    l
}

fn section(id: &str, name: &str) -> Section {
    Section::new(id.to_string(), name)
}

#[test]
fn grand_total_counts_top_level_lines_only() {
    let lines = recalculate(&[
        line("parent", "s1", None, 0.0),
        line("child", "s1", Some("parent"), 100.0),
        line("solo", "s2", None, 50.0),
    ]);
    let sections = vec![section("s1", "Personnel"), section("s2", "Travel")];
    let summary = summarize(&lines, &sections, &ProjectMetadata::default());

    assert_eq!(summary.grand_total, 150.0);
    // Summing every line would double count the child.
    let naive: f64 = lines.iter().map(|l| l.total).sum();
    assert_eq!(naive, 250.0);
    assert_ne!(summary.grand_total, naive);

    assert_eq!(summary.sections[0].subtotal, 100.0);
    assert_eq!(summary.sections[1].subtotal, 50.0);
}

#[test]
fn shares_sum_from_subtotals() {
    let lines = recalculate(&[
        line("a", "s1", None, 60.0),
        line("b", "s2", None, 40.0),
    ]);
    let sections = vec![section("s1", "Personnel"), section("s2", "Travel")];
    let summary = summarize(&lines, &sections, &ProjectMetadata::default());
    assert_eq!(summary.sections[0].share, 0.6);
    assert_eq!(summary.sections[1].share, 0.4);
    assert_eq!(format_percent(summary.sections[0].share), "60.0%");
}

#[test]
fn empty_document_has_zero_shares() {
    let sections = vec![section("s1", "Personnel")];
    let summary = summarize(&[], &sections, &ProjectMetadata::default());
    assert_eq!(summary.grand_total, 0.0);
    assert_eq!(summary.sections[0].subtotal, 0.0);
    assert_eq!(summary.sections[0].share, 0.0);
    assert!(!summary.sections[0].over_cap);
}

#[test]
fn percent_cap_flags_over_cap_section() {
    // Grand total 10_000; the capped section holds 6_000; 50% cap → 5_000.
    let lines = recalculate(&[
        line("a", "s1", None, 6000.0),
        line("b", "s2", None, 4000.0),
    ]);
    let mut capped = section("s1", "Personnel");
    capped.cap_kind = CapKind::PercentOfTotal;
    capped.cap_value = 50.0;
    let sections = vec![capped, section("s2", "Travel")];

    let summary = summarize(&lines, &sections, &ProjectMetadata::default());
    assert_eq!(summary.sections[0].cap_limit, Some(5000.0));
    assert!(summary.sections[0].over_cap);
    assert_eq!(summary.sections[1].cap_limit, None);
    assert!(!summary.sections[1].over_cap);
}

#[test]
fn fixed_cap_compares_against_stored_value() {
    let lines = recalculate(&[line("a", "s1", None, 900.0)]);
    let mut capped = section("s1", "Personnel");
    capped.cap_kind = CapKind::FixedAmount;
    capped.cap_value = 1000.0;
    let summary = summarize(&lines, &[capped.clone()], &ProjectMetadata::default());
    assert_eq!(summary.sections[0].cap_limit, Some(1000.0));
    assert!(!summary.sections[0].over_cap);

    let lines = recalculate(&[line("a", "s1", None, 1100.0)]);
    let summary = summarize(&lines, &[capped], &ProjectMetadata::default());
    assert!(summary.sections[0].over_cap);
}

#[test]
fn currency_label_passes_through() {
    let metadata = ProjectMetadata {
        base_currency: "EUR".to_string(),
        ..ProjectMetadata::default()
    };
    let summary = summarize(&[], &[], &metadata);
    assert_eq!(summary.currency, "EUR");
}

#[test]
fn orphaned_line_counts_toward_its_section_subtotal() {
    // Dangling parent → treated as top-level for aggregation too.
    let lines = recalculate(&[line("a", "s1", Some("ghost"), 25.0)]);
    let summary = summarize(&lines, &[section("s1", "Personnel")], &ProjectMetadata::default());
    assert_eq!(summary.grand_total, 25.0);
    assert_eq!(summary.sections[0].subtotal, 25.0);
}
