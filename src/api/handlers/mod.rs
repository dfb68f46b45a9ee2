use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::config::settings::AppConfig;

pub mod admin;
pub mod wrapped;

pub struct AppState {
    pub pool: Pool<SqliteConnectionManager>,
    pub config: AppConfig,
}
