// Content reports from the database

use crate::data::{ContentFilter, Database, StoredContent};
use rusqlite::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentReport {
    pub total_items: i64,
    pub category_counts: Vec<CategoryCount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_filter: Option<String>,
    pub items: Vec<StoredContent>,
}

pub fn gather_content_report(
    db: &Database,
    filter: &ContentFilter,
    limit: usize,
) -> Result<ContentReport> {
    let total_items = db.content_count()?;
    let category_counts = db
        .category_counts()?
        .into_iter()
        .map(|(category, count)| CategoryCount { category, count })
        .collect();
    let items = db.recent_content(filter, limit)?;

    Ok(ContentReport {
        total_items,
        category_counts,
        category_filter: filter.category.map(|c| c.as_str().to_string()),
        search_filter: filter.search.clone(),
        items,
    })
}

pub fn generate_report(data: &ContentReport, format: ReportFormat) -> String {
    match format {
        ReportFormat::Text => generate_text_report(data),
        ReportFormat::Json => generate_json_report(data),
    }
}

pub fn generate_json_report(data: &ContentReport) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
}

pub fn generate_text_report(data: &ContentReport) -> String {
    let mut report = String::new();

    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    report.push_str("                          TOURISM CONTENT REPORT\n");
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    report.push_str(&format!("Stored items: {}\n", data.total_items));
    if let Some(ref category) = data.category_filter {
        report.push_str(&format!("Category:     {}\n", category));
    }
    if let Some(ref term) = data.search_filter {
        report.push_str(&format!("Search:       {}\n", term));
    }
    report.push('\n');

    if !data.category_counts.is_empty() {
        report.push_str("By category:\n");
        for entry in &data.category_counts {
            report.push_str(&format!("  {:<20} {}\n", entry.category, entry.count));
        }
        report.push('\n');
    }

    if data.items.is_empty() {
        if data.total_items > 0 {
            report.push_str("No content matches the given filters.\n");
        } else {
            report.push_str("No content has been scraped yet.\n");
        }
        return report;
    }

    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    report.push_str("RECENT CONTENT\n");
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    for item in &data.items {
        report.push_str(&format!("[{}] {}\n", item.category, item.title));
        report.push_str(&format!("  Source:  {} ({})\n", item.site_name, item.site_type));
        if let Some(ref district) = item.district {
            report.push_str(&format!("  District: {}\n", district));
        }
        if let Some(ref description) = item.description {
            report.push_str(&format!("  {}\n", description));
        }
        if !item.images.is_empty() {
            report.push_str(&format!("  Images:  {}\n", item.images.len()));
        }
        report.push_str(&format!("  URL:     {}\n", item.source_url));
        report.push_str(&format!("  Scraped: {}\n\n", item.scraped_at));
    }

    report
}
