pub mod error;
pub mod extract;
pub mod fetcher;
pub mod result;
pub mod rules;
pub mod source;

pub use error::ScanError;
pub use extract::extract;
pub use fetcher::Fetcher;
pub use result::{Category, ExtractedRecord};
pub use source::{SiteType, Source};
