use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::store::Store;

/// Single store shared by all handlers; the lock serializes mutations so
/// each request finishes its store work before the next one starts.
pub type SharedStore = Arc<Mutex<Store>>;

#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub config: Config,
}

impl AppState {
    pub fn new(store: Store, config: Config) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            config,
        }
    }
}
