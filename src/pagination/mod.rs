pub mod config;
pub mod cursor;
pub mod urls;

pub use config::PaginationConfig;
pub use cursor::MessageCursor;
pub use urls::build_history_url;
