pub mod environment;
pub mod terminal;
pub mod timestamps;

pub use environment::{get_codex_home, get_sessions_root};
pub use terminal::{sanitize, sanitize_line};
pub use timestamps::{
    PathDate, Timestamp, format_timestamp, parse_date_from_path, parse_timestamp,
};
