use std::sync::Arc;

mod domain;
mod infrastructure;
mod interfaces;
pub mod background_task;
pub mod constants;
pub mod errors;
pub mod graceful_shutdown;
pub mod settings;
pub mod shared_repos;

pub use domain::{entities, use_cases};
pub use infrastructure::{auth, db, notify, storage, utils};
pub use interfaces::{handlers, middlewares, repositories, routes};

use auth::password::{Argon2Hasher, PasswordHasher};
use notify::ContactNotifier;
use repositories::activity::ActivityLogger;
use shared_repos::SharedRepositories;

pub struct AppState {
    pub repos: SharedRepositories,
    pub hasher: Arc<dyn PasswordHasher>,
    pub activity: ActivityLogger,
    pub notifier: ContactNotifier,
    pub config: settings::AppConfig,
}

impl AppState {
    pub fn new(config: settings::AppConfig, pool: sqlx::PgPool) -> Self {
        AppState {
            repos: SharedRepositories::new(pool.clone()),
            hasher: Arc::new(Argon2Hasher),
            activity: ActivityLogger::new(pool),
            notifier: ContactNotifier::new(config.contact_webhook_url.clone()),
            config,
        }
    }
}
