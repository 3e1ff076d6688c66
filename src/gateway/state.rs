use std::sync::Arc;

use crate::account::AccountService;
use crate::db::Database;
use crate::movement::MovementService;
use crate::transfer::TransferSaga;

/// Shared gateway state
#[derive(Clone)]
pub struct AppState {
    pub saga: Arc<TransferSaga>,
    pub movements: Arc<MovementService>,
    pub accounts: Arc<AccountService>,
    /// PostgreSQL pool for health checks; `None` in tests
    pub db: Option<Arc<Database>>,
}

impl AppState {
    pub fn new(
        saga: Arc<TransferSaga>,
        movements: Arc<MovementService>,
        accounts: Arc<AccountService>,
    ) -> Self {
        Self {
            saga,
            movements,
            accounts,
            db: None,
        }
    }

    pub fn with_database(mut self, db: Arc<Database>) -> Self {
        self.db = Some(db);
        self
    }
}
