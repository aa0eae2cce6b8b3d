// Tests for report generation functionality

use tourscout_core::data::{ContentFilter, Database};
use tourscout_core::report::{
    ReportFormat, gather_content_report, generate_json_report, generate_report,
    generate_text_report,
};
use tourscout_scanner::{Category, ExtractedRecord};

fn seeded_db() -> Database {
    let db = Database::open_in_memory().unwrap();
    let id = db
        .add_source("Jharkhand Tourism", "https://portal.test", "official", true)
        .unwrap();

    db.upsert_content(
        &id,
        &[
            ExtractedRecord::new(
                "Hundru Falls".to_string(),
                Category::Attraction,
                "https://portal.test/hundru".to_string(),
            )
            .with_description("Information about Hundru Falls".to_string())
            .with_district("Ranchi"),
            ExtractedRecord::new(
                "Welcome".to_string(),
                Category::General,
                "https://portal.test/".to_string(),
            )
            .with_images(vec!["https://portal.test/a.jpg".to_string()]),
        ],
        "2026-01-01T00:00:00+00:00",
    )
    .unwrap();

    db
}

// ============================================================================
// Report Format Tests
// ============================================================================

#[test]
fn test_report_format_from_str() {
    assert!(matches!(ReportFormat::from_str("text"), Some(ReportFormat::Text)));
    assert!(matches!(ReportFormat::from_str("JSON"), Some(ReportFormat::Json)));
}

#[test]
fn test_report_format_from_str_invalid() {
    assert!(ReportFormat::from_str("csv").is_none());
    assert!(ReportFormat::from_str("").is_none());
}

// ============================================================================
// Report Data Tests
// ============================================================================

#[test]
fn test_gather_content_report() {
    let db = seeded_db();
    let data = gather_content_report(&db, &ContentFilter::default(), 50).unwrap();

    assert_eq!(data.total_items, 2);
    assert_eq!(data.items.len(), 2);
    assert_eq!(data.category_counts.len(), 2);
    assert!(data.category_filter.is_none());
}

#[test]
fn test_gather_content_report_with_category() {
    let db = seeded_db();
    let data = gather_content_report(
        &db,
        &ContentFilter::default().category(Category::Attraction),
        50,
    )
    .unwrap();

    assert_eq!(data.total_items, 2);
    assert_eq!(data.items.len(), 1);
    assert_eq!(data.items[0].title, "Hundru Falls");
    assert_eq!(data.category_filter.as_deref(), Some("attraction"));
}

// ============================================================================
// Rendering Tests
// ============================================================================

#[test]
fn test_text_report_lists_items() {
    let db = seeded_db();
    let data = gather_content_report(&db, &ContentFilter::default(), 50).unwrap();
    let report = generate_text_report(&data);

    assert!(report.contains("TOURISM CONTENT REPORT"));
    assert!(report.contains("Stored items: 2"));
    assert!(report.contains("[attraction] Hundru Falls"));
    assert!(report.contains("District: Ranchi"));
    assert!(report.contains("Source:  Jharkhand Tourism (official)"));
    assert!(report.contains("Images:  1"));
}

#[test]
fn test_search_filter_is_reported() {
    let db = seeded_db();
    let data =
        gather_content_report(&db, &ContentFilter::default().search("HUNDRU"), 50).unwrap();

    assert_eq!(data.items.len(), 1);
    assert_eq!(data.search_filter.as_deref(), Some("HUNDRU"));

    let report = generate_text_report(&data);
    assert!(report.contains("Search:       HUNDRU"));
    assert!(report.contains("[attraction] Hundru Falls"));
}

#[test]
fn test_text_report_no_matches() {
    let db = seeded_db();
    let data =
        gather_content_report(&db, &ContentFilter::default().search("nowhere"), 50).unwrap();
    let report = generate_text_report(&data);

    assert!(report.contains("Stored items: 2"));
    assert!(report.contains("No content matches the given filters."));
}

#[test]
fn test_text_report_empty_database() {
    let db = Database::open_in_memory().unwrap();
    let data = gather_content_report(&db, &ContentFilter::default(), 50).unwrap();
    let report = generate_text_report(&data);

    assert!(report.contains("Stored items: 0"));
    assert!(report.contains("No content has been scraped yet."));
}

#[test]
fn test_json_report_is_valid_json() {
    let db = seeded_db();
    let data = gather_content_report(
        &db,
        &ContentFilter::default().category(Category::General),
        10,
    )
    .unwrap();
    let report = generate_json_report(&data);

    let parsed: serde_json::Value = serde_json::from_str(&report).unwrap();
    assert_eq!(parsed["total_items"], 2);
    assert_eq!(parsed["category_filter"], "general");
    assert_eq!(parsed["items"][0]["title"], "Welcome");
    assert_eq!(parsed["items"][0]["images"][0], "https://portal.test/a.jpg");
}

#[test]
fn test_generate_report_dispatches_on_format() {
    let db = seeded_db();
    let data = gather_content_report(&db, &ContentFilter::default(), 50).unwrap();

    assert!(generate_report(&data, ReportFormat::Text).contains("RECENT CONTENT"));
    assert!(generate_report(&data, ReportFormat::Json).trim_start().starts_with('{'));
}
