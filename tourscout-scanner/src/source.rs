use serde::{Deserialize, Serialize};

/// Classification tag of a registered site. Unknown tags collapse into
/// `Generic`, which only receives the heading and page-title passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteType {
    Official,
    Government,
    Registration,
    Environmental,
    Heritage,
    Generic,
}

impl SiteType {
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "official" => SiteType::Official,
            "government" => SiteType::Government,
            "registration" => SiteType::Registration,
            "environmental" => SiteType::Environmental,
            "heritage" => SiteType::Heritage,
            _ => SiteType::Generic,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SiteType::Official => "official",
            SiteType::Government => "government",
            SiteType::Registration => "registration",
            SiteType::Environmental => "environmental",
            SiteType::Heritage => "heritage",
            SiteType::Generic => "generic",
        }
    }
}

impl std::fmt::Display for SiteType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub id: String,
    pub name: String,
    pub url: String,
    /// Tag as stored in the registry; kept verbatim for provenance metadata.
    pub site_type_tag: String,
    pub is_active: bool,
    pub last_scraped_at: Option<String>,
}

impl Source {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        url: impl Into<String>,
        site_type_tag: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            url: url.into(),
            site_type_tag: site_type_tag.into(),
            is_active: true,
            last_scraped_at: None,
        }
    }

    pub fn site_type(&self) -> SiteType {
        SiteType::from_tag(&self.site_type_tag)
    }
}
