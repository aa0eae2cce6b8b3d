// Tests for database functionality

use tempfile::TempDir;
use tourscout_core::data::{ContentFilter, Database};
use tourscout_scanner::{Category, ExtractedRecord, Source};

fn create_test_db() -> (TempDir, Database) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let db = Database::new(&db_path).unwrap();
    (temp_dir, db)
}

fn record(title: &str, url: &str, category: Category) -> ExtractedRecord {
    ExtractedRecord::new(title.to_string(), category, url.to_string())
        .with_description(format!("About {}", title))
        .with_content(format!("{} content", title))
        .with_images(vec!["https://portal.test/a.jpg".to_string()])
        .with_meta("source_type", "official")
}

// ============================================================================
// Database Creation Tests
// ============================================================================

#[test]
fn test_database_creation() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");

    let db = Database::new(&db_path);
    assert!(db.is_ok());
    assert!(db_path.exists());
}

#[test]
fn test_database_exists_and_drop() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");

    assert!(!Database::exists(&db_path));

    let db = Database::new(&db_path).unwrap();
    assert!(Database::exists(&db_path));
    drop(db);

    Database::drop(&db_path).unwrap();
    assert!(!Database::exists(&db_path));
}

#[test]
fn test_reopen_keeps_schema_and_rows() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");

    {
        let db = Database::new(&db_path).unwrap();
        db.add_source("Portal", "https://portal.test", "official", true)
            .unwrap();
    }

    let db = Database::new(&db_path).unwrap();
    assert_eq!(db.all_sources().unwrap().len(), 1);
}

// ============================================================================
// Source Registry Tests
// ============================================================================

#[test]
fn test_add_and_get_source() {
    let (_temp_dir, db) = create_test_db();

    let id = db
        .add_source("Jharkhand Tourism", "https://tourism.jharkhand.gov.in", "official", true)
        .unwrap();
    assert!(!id.is_empty());

    let source = db.get_source(&id).unwrap().unwrap();
    assert_eq!(source.name, "Jharkhand Tourism");
    assert_eq!(source.url, "https://tourism.jharkhand.gov.in");
    assert_eq!(source.site_type_tag, "official");
    assert!(source.is_active);
    assert!(source.last_scraped_at.is_none());
}

#[test]
fn test_get_missing_source() {
    let (_temp_dir, db) = create_test_db();
    assert!(db.get_source("nope").unwrap().is_none());
}

#[test]
fn test_active_sources_filter_and_order() {
    let (_temp_dir, db) = create_test_db();

    db.add_source("First", "https://one.test", "official", true)
        .unwrap();
    db.add_source("Hidden", "https://two.test", "heritage", false)
        .unwrap();
    db.add_source("Third", "https://three.test", "registration", true)
        .unwrap();

    let names: Vec<_> = db
        .active_sources()
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["First", "Third"]);
    assert_eq!(db.all_sources().unwrap().len(), 3);
}

#[test]
fn test_set_source_active() {
    let (_temp_dir, db) = create_test_db();

    let id = db
        .add_source("Portal", "https://portal.test", "official", true)
        .unwrap();

    assert!(db.set_source_active(&id, false).unwrap());
    assert!(db.active_sources().unwrap().is_empty());

    assert!(db.set_source_active(&id, true).unwrap());
    assert_eq!(db.active_sources().unwrap().len(), 1);

    assert!(!db.set_source_active("missing", true).unwrap());
}

#[test]
fn test_duplicate_source_id_rejected() {
    let (_temp_dir, db) = create_test_db();

    let source = Source::new("fixed-id", "Portal", "https://portal.test", "official");
    db.insert_source(&source).unwrap();
    assert!(db.insert_source(&source).is_err());
}

// ============================================================================
// Content Upsert Tests
// ============================================================================

#[test]
fn test_upsert_content_stores_record_and_stamps_source() {
    let (_temp_dir, db) = create_test_db();
    let id = db
        .add_source("Portal", "https://portal.test", "official", true)
        .unwrap();

    let count = db
        .upsert_content(
            &id,
            &[record("Hundru Falls", "https://portal.test", Category::Attraction)],
            "2026-01-01T00:00:00+00:00",
        )
        .unwrap();
    assert_eq!(count, 1);

    let stored = db.content_by_url("https://portal.test").unwrap().unwrap();
    assert_eq!(stored.title, "Hundru Falls");
    assert_eq!(stored.category, "attraction");
    assert_eq!(stored.site_id, id);
    assert_eq!(stored.site_name, "Portal");
    assert_eq!(stored.images, vec!["https://portal.test/a.jpg".to_string()]);
    assert_eq!(stored.metadata["source_type"], "official");
    assert_eq!(stored.scraped_at, "2026-01-01T00:00:00+00:00");

    let source = db.get_source(&id).unwrap().unwrap();
    assert_eq!(
        source.last_scraped_at.as_deref(),
        Some("2026-01-01T00:00:00+00:00")
    );
}

#[test]
fn test_upsert_twice_keeps_one_row_with_latest_content() {
    let (_temp_dir, db) = create_test_db();
    let id = db
        .add_source("Portal", "https://portal.test", "official", true)
        .unwrap();

    db.upsert_content(
        &id,
        &[record("First run", "https://portal.test", Category::General)],
        "2026-01-01T00:00:00+00:00",
    )
    .unwrap();
    db.upsert_content(
        &id,
        &[record("Second run", "https://portal.test", Category::TourismInfo)],
        "2026-01-02T00:00:00+00:00",
    )
    .unwrap();

    assert_eq!(db.content_count().unwrap(), 1);
    let stored = db.content_by_url("https://portal.test").unwrap().unwrap();
    assert_eq!(stored.title, "Second run");
    assert_eq!(stored.category, "tourism_info");
    assert_eq!(stored.scraped_at, "2026-01-02T00:00:00+00:00");
}

#[test]
fn test_batch_with_shared_url_keeps_last_record() {
    let (_temp_dir, db) = create_test_db();
    let id = db
        .add_source("Portal", "https://portal.test", "official", true)
        .unwrap();

    let batch = vec![
        record("Tourism Content 1 from Portal", "https://portal.test", Category::TourismInfo),
        record("Hundru Falls near Ranchi", "https://portal.test", Category::Attraction),
        record("Welcome", "https://portal.test", Category::General),
    ];
    let count = db
        .upsert_content(&id, &batch, "2026-01-01T00:00:00+00:00")
        .unwrap();

    assert_eq!(count, 1);
    assert_eq!(db.content_count().unwrap(), 1);
    let stored = db.content_by_url("https://portal.test").unwrap().unwrap();
    assert_eq!(stored.title, "Welcome");
}

#[test]
fn test_upsert_count_is_distinct_urls() {
    let (_temp_dir, db) = create_test_db();
    let id = db
        .add_source("Portal", "https://portal.test", "official", true)
        .unwrap();

    let batch = vec![
        record("First A", "https://portal.test/a", Category::TourismInfo),
        record("Only B", "https://portal.test/b", Category::Attraction),
        record("Second A", "https://portal.test/a", Category::General),
    ];
    let count = db
        .upsert_content(&id, &batch, "2026-01-01T00:00:00+00:00")
        .unwrap();

    assert_eq!(count, 2);
    assert_eq!(db.content_count().unwrap(), count as i64);
    let a = db.content_by_url("https://portal.test/a").unwrap().unwrap();
    assert_eq!(a.title, "Second A");
    assert_eq!(a.category, "general");
}

#[test]
fn test_distinct_urls_are_separate_rows() {
    let (_temp_dir, db) = create_test_db();
    let id = db
        .add_source("Portal", "https://portal.test", "official", true)
        .unwrap();

    db.upsert_content(
        &id,
        &[
            record("Page A", "https://portal.test/a", Category::General),
            record("Page B", "https://portal.test/b", Category::Heritage),
        ],
        "2026-01-01T00:00:00+00:00",
    )
    .unwrap();

    assert_eq!(db.content_count().unwrap(), 2);
}

#[test]
fn test_upsert_unknown_source_fails_and_rolls_back() {
    let (_temp_dir, db) = create_test_db();

    let result = db.upsert_content(
        "no-such-source",
        &[record("Orphan", "https://portal.test", Category::General)],
        "2026-01-01T00:00:00+00:00",
    );

    assert!(result.is_err());
    assert_eq!(db.content_count().unwrap(), 0);
}

// ============================================================================
// Query Tests
// ============================================================================

#[test]
fn test_recent_content_order_filter_and_limit() {
    let (_temp_dir, db) = create_test_db();
    let id = db
        .add_source("Portal", "https://portal.test", "official", true)
        .unwrap();

    db.upsert_content(
        &id,
        &[record("Old", "https://portal.test/old", Category::General)],
        "2026-01-01T00:00:00+00:00",
    )
    .unwrap();
    db.upsert_content(
        &id,
        &[record("New", "https://portal.test/new", Category::Attraction)],
        "2026-02-01T00:00:00+00:00",
    )
    .unwrap();
    db.upsert_content(
        &id,
        &[record("Newest", "https://portal.test/newest", Category::Attraction)],
        "2026-03-01T00:00:00+00:00",
    )
    .unwrap();

    let titles: Vec<_> = db
        .recent_content(&ContentFilter::default(), 50)
        .unwrap()
        .into_iter()
        .map(|c| c.title)
        .collect();
    assert_eq!(titles, vec!["Newest", "New", "Old"]);

    let attractions = db
        .recent_content(&ContentFilter::default().category(Category::Attraction), 50)
        .unwrap();
    assert_eq!(attractions.len(), 2);

    let limited = db.recent_content(&ContentFilter::default(), 1).unwrap();
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].title, "Newest");
}

#[test]
fn test_recent_content_search_is_case_insensitive() {
    let (_temp_dir, db) = create_test_db();
    let id = db
        .add_source("Portal", "https://portal.test", "official", true)
        .unwrap();

    db.upsert_content(
        &id,
        &[
            record("Hundru Falls", "https://portal.test/hundru", Category::Attraction),
            record("Betla Park", "https://portal.test/betla", Category::Environmental),
            ExtractedRecord::new(
                "Tourism Content 1 from Portal".to_string(),
                Category::TourismInfo,
                "https://portal.test/info".to_string(),
            )
            .with_description("Boating near the FALLS at dawn".to_string()),
        ],
        "2026-01-01T00:00:00+00:00",
    )
    .unwrap();

    let titles = |filter: ContentFilter| -> Vec<String> {
        let mut titles: Vec<_> = db
            .recent_content(&filter, 50)
            .unwrap()
            .into_iter()
            .map(|c| c.title)
            .collect();
        titles.sort();
        titles
    };

    assert_eq!(
        titles(ContentFilter::default().search("falls")),
        vec!["Hundru Falls", "Tourism Content 1 from Portal"]
    );
    assert_eq!(
        titles(
            ContentFilter::default()
                .search("FALLS")
                .category(Category::Attraction)
        ),
        vec!["Hundru Falls"]
    );
    assert!(titles(ContentFilter::default().search("waterpark")).is_empty());
    assert_eq!(titles(ContentFilter::default().search("   ")).len(), 3);
}

#[test]
fn test_category_counts() {
    let (_temp_dir, db) = create_test_db();
    let id = db
        .add_source("Portal", "https://portal.test", "official", true)
        .unwrap();

    db.upsert_content(
        &id,
        &[
            record("A", "https://portal.test/a", Category::Attraction),
            record("B", "https://portal.test/b", Category::Attraction),
            record("C", "https://portal.test/c", Category::Facility),
        ],
        "2026-01-01T00:00:00+00:00",
    )
    .unwrap();

    let counts = db.category_counts().unwrap();
    assert_eq!(
        counts,
        vec![("attraction".to_string(), 2), ("facility".to_string(), 1)]
    );
}

#[test]
fn test_in_memory_database() {
    let db = Database::open_in_memory().unwrap();
    db.add_source("Portal", "https://portal.test", "official", true)
        .unwrap();
    assert_eq!(db.active_sources().unwrap().len(), 1);
}
