//! Application state shared across handlers
//!
//! Holds the record store, the authentication service, and the ledger
//! services built over the same store.

use spendwise_auth::AuthService;
use spendwise_ledger::{AdmissionController, FundsReporter, Store};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Record store (Postgres or in-memory)
    pub store: Arc<dyn Store>,
    /// Authentication service
    pub auth: Arc<AuthService>,
    /// Expense admission; owns the per-period lock table
    pub admission: Arc<AdmissionController>,
    /// Read-only funds views
    pub reporter: FundsReporter,
}

impl AppState {
    /// Create a new application state
    pub fn new(store: Arc<dyn Store>, auth: Arc<AuthService>) -> Self {
        Self {
            admission: Arc::new(AdmissionController::new(store.clone())),
            reporter: FundsReporter::new(store.clone()),
            store,
            auth,
        }
    }

    /// State over an empty in-memory store, for tests and the `memory` backend demo
    pub fn in_memory(auth: Arc<AuthService>) -> Self {
        Self::new(Arc::new(spendwise_ledger::MemoryStore::new()), auth)
    }
}
