//! Heuristic content extraction.
//!
//! This is pattern matching over raw markup, not a DOM parse. Tags are found
//! with case-insensitive regular expressions, attributes are ignored and any
//! markup nested inside a match is stripped.

use crate::error::{Result, ScanError};
use crate::result::{Category, ExtractedRecord};
use crate::rules::{self, Rule, TextSource};
use crate::source::Source;
use chrono::Utc;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

pub const MAX_IMAGES: usize = 5;
const DESCRIPTION_CHARS: usize = 200;
const HEADING_MIN_CHARS: usize = 10;
const HEADING_MAX_CHARS: usize = 100;
const SUMMARY_PARAGRAPHS: usize = 3;

static RE_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title\b[^>]*>(.*?)</title\s*>").unwrap());
static RE_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h([1-6])\b[^>]*>(.*?)</h[1-6]\s*>").unwrap());
static RE_PARAGRAPH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<p\b[^>]*>(.*?)</p\s*>").unwrap());
static RE_LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<li\b[^>]*>(.*?)</li\s*>").unwrap());
static RE_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<img\b[^>]*?\ssrc\s*=\s*["']([^"']*)["'][^>]*>"#).unwrap()
});
static RE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Cleaned text pulled out of one page.
#[derive(Debug, Default, Clone)]
pub struct ScannedPage {
    pub title: Option<String>,
    pub headings: Vec<(u8, String)>,
    pub paragraphs: Vec<String>,
    /// The first few `<p>` matches, cleaned. Empty ones still use up a slot.
    pub lead_paragraphs: Vec<String>,
    pub list_items: Vec<String>,
    pub images: Vec<String>,
}

impl ScannedPage {
    pub fn scan(html: &str, base: &Url) -> Self {
        let title = RE_TITLE
            .captures_iter(html)
            .filter_map(|cap| cap.get(1).map(|m| clean_text(m.as_str())))
            .find(|text| !text.is_empty());

        let headings = RE_HEADING
            .captures_iter(html)
            .filter_map(|cap| {
                let level = cap.get(1)?.as_str().parse::<u8>().ok()?;
                let text = clean_text(cap.get(2)?.as_str());
                (!text.is_empty()).then_some((level, text))
            })
            .collect();

        let images = RE_IMAGE
            .captures_iter(html)
            .filter_map(|cap| cap.get(1))
            .map(|m| m.as_str().trim())
            .filter(|src| !src.is_empty())
            .take(MAX_IMAGES)
            .map(|src| resolve_image_url(src, base))
            .collect();

        let lead_paragraphs = RE_PARAGRAPH
            .captures_iter(html)
            .take(SUMMARY_PARAGRAPHS)
            .filter_map(|cap| cap.get(1).map(|m| clean_text(m.as_str())))
            .filter(|text| !text.is_empty())
            .collect();

        Self {
            title,
            headings,
            paragraphs: collect_text(&RE_PARAGRAPH, html),
            lead_paragraphs,
            list_items: collect_text(&RE_LIST_ITEM, html),
            images,
        }
    }

    fn texts(&self, source: TextSource) -> &[String] {
        match source {
            TextSource::Paragraphs => &self.paragraphs,
            TextSource::ListItems => &self.list_items,
        }
    }
}

fn collect_text(pattern: &Regex, html: &str) -> Vec<String> {
    pattern
        .captures_iter(html)
        .filter_map(|cap| cap.get(1).map(|m| clean_text(m.as_str())))
        .filter(|text| !text.is_empty())
        .collect()
}

/// Strip every tag from a fragment and trim the result.
pub fn clean_text(fragment: &str) -> String {
    RE_TAG.replace_all(fragment, "").trim().to_string()
}

/// Rewrite root-relative image sources against the page origin. Anything
/// else is returned unchanged.
pub fn resolve_image_url(src: &str, base: &Url) -> String {
    if src.starts_with("//") {
        format!("{}:{}", base.scheme(), src)
    } else if src.starts_with('/') {
        format!("{}{}", base.origin().ascii_serialization(), src)
    } else {
        src.to_string()
    }
}

fn summarize(text: &str) -> String {
    if text.chars().count() > DESCRIPTION_CHARS {
        let head: String = text.chars().take(DESCRIPTION_CHARS).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

/// Extract candidate records from a fetched page.
///
/// Fails only when the source URL cannot be parsed; malformed markup just
/// yields fewer records.
pub fn extract(html: &str, source: &Source) -> Result<Vec<ExtractedRecord>> {
    let base = Url::parse(&source.url)
        .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", source.url, e)))?;

    let page = ScannedPage::scan(html, &base);
    let extracted_at = Utc::now().to_rfc3339();
    let mut records = Vec::new();

    for rule in rules::rules_for(source.site_type()) {
        records.extend(apply_rule(rule, &page, source, &extracted_at));
    }

    for (level, heading) in &page.headings {
        let length = heading.chars().count();
        if length <= HEADING_MIN_CHARS || length >= HEADING_MAX_CHARS {
            continue;
        }
        records.push(
            ExtractedRecord::new(heading.clone(), Category::Attraction, source.url.clone())
                .with_description(format!("Information about {} from {}", heading, source.name))
                .with_meta("source_type", source.site_type_tag.as_str())
                .with_meta("extraction_method", "heading")
                .with_meta("extracted_at", extracted_at.as_str())
                .with_meta("heading_level", *level),
        );
    }

    if let Some(ref title) = page.title {
        let mut record =
            ExtractedRecord::new(title.clone(), Category::General, source.url.clone())
                .with_description(format!("Official information from {}", source.name))
                .with_images(page.images.clone())
                .with_meta("source_type", source.site_type_tag.as_str())
                .with_meta("extraction_method", "page_title")
                .with_meta("extracted_at", extracted_at.as_str())
                .with_meta("is_main_content", true);

        let summary = page.lead_paragraphs.join(" ");
        if !summary.is_empty() {
            record = record.with_content(summary);
        }
        records.push(record);
    }

    records.retain(|record| !record.title.trim().is_empty());

    debug!(
        source = %source.name,
        records = records.len(),
        paragraphs = page.paragraphs.len(),
        headings = page.headings.len(),
        "Extracted page content"
    );

    Ok(records)
}

fn apply_rule(
    rule: &Rule,
    page: &ScannedPage,
    source: &Source,
    extracted_at: &str,
) -> Vec<ExtractedRecord> {
    let category = rule.category_for(source.site_type());

    page.texts(rule.source)
        .iter()
        .filter(|text| text.chars().count() >= rule.min_chars)
        .filter_map(|text| rule.matched_keyword(text).map(|keyword| (text, keyword)))
        .take(rule.cap)
        .enumerate()
        .map(|(index, (text, keyword))| {
            let title = format!("{} {} from {}", rule.title_prefix, index + 1, source.name);
            let mut record = ExtractedRecord::new(title, category, source.url.clone())
                .with_description(summarize(text))
                .with_content(text.clone())
                .with_images(page.images.clone())
                .with_meta("source_type", source.site_type_tag.as_str())
                .with_meta("extraction_method", "html_parsing")
                .with_meta("extracted_at", extracted_at)
                .with_meta("matched_keyword", keyword);

            if rule.tag_location
                && let Some(district) = rules::detect_district(text)
            {
                record = record.with_district(district);
            }
            record
        })
        .collect()
}
