pub mod handlers;
pub mod server;

/// Directory holding the database when `--db` is not given.
pub const DEFAULT_DB_DIR: &str = "~/.config/tourscout/";

// Re-export commonly used handler helpers for convenience
pub use handlers::{
    format_source_row, open_database, parse_site_type, register_source, resolve_db_path,
    validate_source_url,
};
pub use server::{AppState, build_router};
