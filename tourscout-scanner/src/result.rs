use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    TourismInfo,
    Facility,
    Attraction,
    General,
    RegisteredService,
    Heritage,
    Environmental,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::TourismInfo => "tourism_info",
            Category::Facility => "facility",
            Category::Attraction => "attraction",
            Category::General => "general",
            Category::RegisteredService => "registered_service",
            Category::Heritage => "heritage",
            Category::Environmental => "environmental",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "tourism_info" => Some(Category::TourismInfo),
            "facility" => Some(Category::Facility),
            "attraction" => Some(Category::Attraction),
            "general" => Some(Category::General),
            "registered_service" => Some(Category::RegisteredService),
            "heritage" => Some(Category::Heritage),
            "environmental" => Some(Category::Environmental),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    pub title: String,
    pub description: Option<String>,
    pub content: Option<String>,
    pub images: Vec<String>,
    pub location: Option<String>,
    pub district: Option<String>,
    pub category: Category,
    pub metadata: Map<String, Value>,
    pub source_url: String,
}

impl ExtractedRecord {
    pub fn new(title: String, category: Category, source_url: String) -> Self {
        Self {
            title,
            description: None,
            content: None,
            images: Vec::new(),
            location: None,
            district: None,
            category,
            metadata: Map::new(),
            source_url,
        }
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }

    pub fn with_content(mut self, content: String) -> Self {
        self.content = Some(content);
        self
    }

    pub fn with_images(mut self, images: Vec<String>) -> Self {
        self.images = images;
        self
    }

    pub fn with_district(mut self, district: &str) -> Self {
        self.location = Some(district.to_string());
        self.district = Some(district.to_string());
        self
    }

    pub fn with_meta(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }
}
