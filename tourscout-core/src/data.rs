use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;
use tourscout_scanner::{Category, ExtractedRecord, Source};

pub struct Database {
    conn: Connection,
}

/// A content row as stored, joined with the name and type of its source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredContent {
    pub id: i64,
    pub site_id: String,
    pub site_name: String,
    pub site_type: String,
    pub title: String,
    pub description: Option<String>,
    pub content: Option<String>,
    pub images: Vec<String>,
    pub location: Option<String>,
    pub district: Option<String>,
    pub category: String,
    pub metadata: serde_json::Value,
    pub source_url: String,
    pub scraped_at: String,
}

/// Narrows `recent_content`. Empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentFilter {
    pub category: Option<Category>,
    /// Case-insensitive substring of the title or description.
    pub search: Option<String>,
}

impl ContentFilter {
    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn search(mut self, term: &str) -> Self {
        let term = term.trim();
        self.search = (!term.is_empty()).then(|| term.to_string());
        self
    }
}

/// Keep only the last record for each `source_url`, in the order those last
/// records appear.
fn last_per_url(records: &[ExtractedRecord]) -> Vec<&ExtractedRecord> {
    let mut seen = HashSet::new();
    let mut kept = Vec::new();
    for record in records.iter().rev() {
        if seen.insert(record.source_url.as_str()) {
            kept.push(record);
        }
    }
    kept.reverse();
    kept
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

fn source_from_row(row: &Row<'_>) -> Result<Source> {
    Ok(Source {
        id: row.get(0)?,
        name: row.get(1)?,
        url: row.get(2)?,
        site_type_tag: row.get(3)?,
        is_active: row.get(4)?,
        last_scraped_at: row.get(5)?,
    })
}

fn content_from_row(row: &Row<'_>) -> Result<StoredContent> {
    let images: String = row.get(7)?;
    let metadata: String = row.get(11)?;
    Ok(StoredContent {
        id: row.get(0)?,
        site_id: row.get(1)?,
        site_name: row.get(2)?,
        site_type: row.get(3)?,
        title: row.get(4)?,
        description: row.get(5)?,
        content: row.get(6)?,
        images: serde_json::from_str(&images).unwrap_or_default(),
        location: row.get(8)?,
        district: row.get(9)?,
        category: row.get(10)?,
        metadata: serde_json::from_str(&metadata).unwrap_or(serde_json::Value::Null),
        source_url: row.get(12)?,
        scraped_at: row.get(13)?,
    })
}

const SOURCE_COLUMNS: &str = "id, name, url, site_type, is_active, last_scraped_at";

const CONTENT_SELECT: &str = "
    SELECT c.id, c.site_id, s.name, s.site_type, c.title, c.description, c.content,
           c.images, c.location, c.district, c.category, c.metadata, c.source_url, c.scraped_at
    FROM tourism_content c
    JOIN sources s ON c.site_id = s.id";

impl Database {
    pub fn drop(path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }
    pub fn exists(path: &Path) -> bool {
        path.exists()
    }
    pub fn new(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            ",
        )?;

        let db = Database { conn };
        db.init_schema()?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let db = Database { conn };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            -- Registry of scrapable sites
            CREATE TABLE IF NOT EXISTS sources (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    url TEXT NOT NULL,
    site_type TEXT NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT 1,
    last_scraped_at TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_sources_active ON sources(is_active);

-- Extracted content, one row per source URL
CREATE TABLE IF NOT EXISTS tourism_content (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    site_id TEXT NOT NULL,
    title TEXT NOT NULL CHECK(length(title) > 0),
    description TEXT,
    content TEXT,
    images TEXT NOT NULL DEFAULT '[]',   -- JSON array
    location TEXT,
    district TEXT,
    category TEXT NOT NULL CHECK(category IN (
        'tourism_info',
        'facility',
        'attraction',
        'general',
        'registered_service',
        'heritage',
        'environmental'
    )),
    contact_info TEXT,                   -- JSON object
    metadata TEXT NOT NULL DEFAULT '{}', -- JSON object
    source_url TEXT NOT NULL UNIQUE,
    scraped_at TEXT NOT NULL,

    FOREIGN KEY(site_id) REFERENCES sources(id)
);

CREATE INDEX IF NOT EXISTS idx_content_site ON tourism_content(site_id);
CREATE INDEX IF NOT EXISTS idx_content_category ON tourism_content(category);
CREATE INDEX IF NOT EXISTS idx_content_scraped_at ON tourism_content(scraped_at);
            ",
        )?;
        Ok(())
    }

    // Source registry
    pub fn add_source(
        &self,
        name: &str,
        url: &str,
        site_type: &str,
        is_active: bool,
    ) -> Result<String> {
        let mut source = Source::new(uuid::Uuid::new_v4().to_string(), name, url, site_type);
        source.is_active = is_active;
        self.insert_source(&source)?;
        Ok(source.id)
    }

    pub fn insert_source(&self, source: &Source) -> Result<()> {
        self.conn.execute(
            "INSERT INTO sources (id, name, url, site_type, is_active, last_scraped_at, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                &source.id,
                &source.name,
                &source.url,
                &source.site_type_tag,
                source.is_active,
                &source.last_scraped_at,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Returns false when no source has the given id.
    pub fn set_source_active(&self, id: &str, is_active: bool) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE sources SET is_active = ?1 WHERE id = ?2",
            params![is_active, id],
        )?;
        Ok(changed > 0)
    }

    pub fn get_source(&self, id: &str) -> Result<Option<Source>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM sources WHERE id = ?1", SOURCE_COLUMNS))?;

        stmt.query_row(params![id], source_from_row).optional()
    }

    pub fn all_sources(&self) -> Result<Vec<Source>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM sources ORDER BY rowid", SOURCE_COLUMNS))?;

        let sources = stmt
            .query_map([], source_from_row)?
            .collect::<Result<Vec<_>>>()?;
        Ok(sources)
    }

    /// Active sources in registry (insertion) order.
    pub fn active_sources(&self) -> Result<Vec<Source>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM sources WHERE is_active = 1 ORDER BY rowid",
            SOURCE_COLUMNS
        ))?;

        let sources = stmt
            .query_map([], source_from_row)?
            .collect::<Result<Vec<_>>>()?;
        Ok(sources)
    }

    // Content persistence

    /// Upsert a batch keyed on `source_url` and stamp the owning source's
    /// `last_scraped_at`, all in one transaction. Within a batch only the last
    /// record for each URL is written. Returns the number of rows written.
    pub fn upsert_content(
        &self,
        source_id: &str,
        records: &[ExtractedRecord],
        scraped_at: &str,
    ) -> Result<usize> {
        let rows = last_per_url(records);

        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO tourism_content (
                    site_id, title, description, content, images, location, district,
                    category, metadata, source_url, scraped_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                ON CONFLICT(source_url) DO UPDATE SET
                    site_id = excluded.site_id,
                    title = excluded.title,
                    description = excluded.description,
                    content = excluded.content,
                    images = excluded.images,
                    location = excluded.location,
                    district = excluded.district,
                    category = excluded.category,
                    metadata = excluded.metadata,
                    scraped_at = excluded.scraped_at",
            )?;

            for record in &rows {
                stmt.execute(params![
                    source_id,
                    &record.title,
                    &record.description,
                    &record.content,
                    to_json(&record.images)?,
                    &record.location,
                    &record.district,
                    record.category.as_str(),
                    to_json(&record.metadata)?,
                    &record.source_url,
                    scraped_at,
                ])?;
            }
        }

        tx.execute(
            "UPDATE sources SET last_scraped_at = ?1 WHERE id = ?2",
            params![scraped_at, source_id],
        )?;
        tx.commit()?;

        Ok(rows.len())
    }

    // Query methods
    pub fn content_count(&self) -> Result<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM tourism_content", [], |row| row.get(0))
    }

    pub fn content_by_url(&self, source_url: &str) -> Result<Option<StoredContent>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} WHERE c.source_url = ?1", CONTENT_SELECT))?;

        stmt.query_row(params![source_url], content_from_row)
            .optional()
    }

    /// Most recently scraped content first.
    pub fn recent_content(
        &self,
        filter: &ContentFilter,
        limit: usize,
    ) -> Result<Vec<StoredContent>> {
        let mut stmt = self.conn.prepare(&format!(
            "{} WHERE (?1 IS NULL OR c.category = ?1)
               AND (?2 IS NULL
                    OR instr(lower(c.title), lower(?2)) > 0
                    OR instr(lower(coalesce(c.description, '')), lower(?2)) > 0)
             ORDER BY c.scraped_at DESC, c.id DESC
             LIMIT ?3",
            CONTENT_SELECT
        ))?;

        let category = filter.category.map(|c| c.as_str());
        let content = stmt
            .query_map(
                params![category, filter.search, limit as i64],
                content_from_row,
            )?
            .collect::<Result<Vec<_>>>()?;
        Ok(content)
    }

    pub fn category_counts(&self) -> Result<Vec<(String, i64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT category, COUNT(*) FROM tourism_content
             GROUP BY category ORDER BY COUNT(*) DESC, category",
        )?;

        let counts = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>>>()?;
        Ok(counts)
    }

    pub fn get_connection(&self) -> &Connection {
        &self.conn
    }
}
