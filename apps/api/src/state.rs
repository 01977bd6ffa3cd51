use sea_orm::DatabaseConnection;

use crate::config::Config;

/// Shared application state handed to routers.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: DatabaseConnection,
}
