//! Per-site-type classification table.
//!
//! Each site type maps to a list of [`Rule`]s. The extractor evaluates every
//! rule the same way: take the cleaned text of the rule's element kind, keep
//! entries that are long enough and contain one of the rule's keywords, stop
//! at the cap, and emit records in the rule's category.

use crate::result::Category;
use crate::source::SiteType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSource {
    Paragraphs,
    ListItems,
}

/// Category of a rule's output. `SiteTag` reuses the source's own type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleCategory {
    Fixed(Category),
    SiteTag,
}

#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub source: TextSource,
    pub keywords: &'static [&'static [&'static str]],
    pub min_chars: usize,
    pub cap: usize,
    pub category: RuleCategory,
    pub title_prefix: &'static str,
    pub tag_location: bool,
}

impl Rule {
    pub fn category_for(&self, site_type: SiteType) -> Category {
        match self.category {
            RuleCategory::Fixed(category) => category,
            RuleCategory::SiteTag => match site_type {
                SiteType::Environmental => Category::Environmental,
                SiteType::Heritage => Category::Heritage,
                _ => Category::General,
            },
        }
    }

    /// First keyword of the rule found in `text`, compared case-insensitively.
    pub fn matched_keyword(&self, text: &str) -> Option<&'static str> {
        let lowered = text.to_lowercase();
        self.keywords
            .iter()
            .flat_map(|set| set.iter())
            .find(|keyword| lowered.contains(&keyword.to_lowercase()))
            .copied()
    }
}

pub const TOURISM_KEYWORDS: &[&str] = &[
    "tourism",
    "tourist",
    "attraction",
    "destination",
    "visit",
    "travel",
    "heritage",
    "temple",
    "waterfall",
    "falls",
    "hill station",
    "wildlife",
    "sanctuary",
    "national park",
    "lake",
];

/// Districts of Jharkhand, in the order used for location tagging.
pub const DISTRICTS: &[&str] = &[
    "Ranchi",
    "Dhanbad",
    "Bokaro",
    "Deoghar",
    "Hazaribagh",
    "Giridih",
    "Dumka",
    "Palamu",
    "Ramgarh",
    "Gumla",
    "Lohardaga",
    "Simdega",
    "Khunti",
    "Latehar",
    "Garhwa",
    "Chatra",
    "Koderma",
    "Godda",
    "Sahebganj",
    "Pakur",
    "Jamtara",
    "Saraikela Kharsawan",
    "East Singhbhum",
    "West Singhbhum",
];

pub const ACCOMMODATION_KEYWORDS: &[&str] = &[
    "hotel",
    "resort",
    "accommodation",
    "lodge",
    "guest house",
    "homestay",
    "dharamshala",
    "travel agent",
    "tour operator",
    "agency",
    "registered",
    "registration",
    "licence",
    "license",
];

pub const CONSERVATION_KEYWORDS: &[&str] = &[
    "conservation",
    "heritage",
    "forest",
    "wildlife",
    "sanctuary",
    "national park",
    "biodiversity",
    "ecotourism",
    "environment",
    "protected",
    "monument",
    "archaeological",
    "temple",
    "fortress",
    "ancient",
    "tribal",
];

const OFFICIAL_RULES: &[Rule] = &[
    Rule {
        source: TextSource::Paragraphs,
        keywords: &[TOURISM_KEYWORDS, DISTRICTS],
        min_chars: 50,
        cap: 15,
        category: RuleCategory::Fixed(Category::TourismInfo),
        title_prefix: "Tourism Content",
        tag_location: true,
    },
    Rule {
        source: TextSource::ListItems,
        keywords: &[TOURISM_KEYWORDS],
        min_chars: 20,
        cap: 10,
        category: RuleCategory::Fixed(Category::Facility),
        title_prefix: "Facility",
        tag_location: false,
    },
];

const REGISTRATION_RULES: &[Rule] = &[Rule {
    source: TextSource::Paragraphs,
    keywords: &[ACCOMMODATION_KEYWORDS],
    min_chars: 30,
    cap: 8,
    category: RuleCategory::Fixed(Category::RegisteredService),
    title_prefix: "Registered Service",
    tag_location: false,
}];

const CONSERVATION_RULES: &[Rule] = &[Rule {
    source: TextSource::Paragraphs,
    keywords: &[CONSERVATION_KEYWORDS],
    min_chars: 40,
    cap: 12,
    category: RuleCategory::SiteTag,
    title_prefix: "Conservation Content",
    tag_location: false,
}];

pub fn rules_for(site_type: SiteType) -> &'static [Rule] {
    match site_type {
        SiteType::Official | SiteType::Government => OFFICIAL_RULES,
        SiteType::Registration => REGISTRATION_RULES,
        SiteType::Environmental | SiteType::Heritage => CONSERVATION_RULES,
        SiteType::Generic => &[],
    }
}

/// First known district mentioned in `text`.
pub fn detect_district(text: &str) -> Option<&'static str> {
    let lowered = text.to_lowercase();
    DISTRICTS
        .iter()
        .find(|district| lowered.contains(&district.to_lowercase()))
        .copied()
}
