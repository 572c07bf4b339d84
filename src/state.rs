use std::sync::Arc;

use tokio::sync::Mutex;

use crate::db::WriteupStore;

#[derive(Clone)]
pub struct AppState {
    pub store: WriteupStore,
    /// Serialises store access; the store itself assumes a single caller.
    pub lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(store: WriteupStore) -> Self {
        Self {
            store,
            lock: Arc::new(Mutex::new(())),
        }
    }
}
