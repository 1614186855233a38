/*
 * Responsibility
 * - Shared context attached to the Router (AppState)
 *   - store: the document store handle, auth: token service
 * - Cloned per request; everything inside is behind an Arc
 */
use std::sync::Arc;

use crate::repos::Store;
use crate::services::auth::AuthService;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, auth: Arc<AuthService>) -> Self {
        Self { store, auth }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("store", &self.store.backend_name())
            .field("auth", &self.auth)
            .finish()
    }
}
