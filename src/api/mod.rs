//! Salon API access: client, login, response cache.

pub mod auth;
pub mod cache;
pub mod client;

pub use auth::login;
pub use client::{ApiClient, BookingQuery, CustomerQuery};

use crate::config::AppConfig;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Memoizes one [`ApiClient`] per session token.
///
/// Repeated lookups with the same token return the same instance, so
/// page renders share a single client and its response cache. Cleared
/// on logout via [`ClientRegistry::evict`].
pub struct ClientRegistry {
    config: AppConfig,
    clients: Mutex<HashMap<String, Arc<ApiClient>>>,
}

impl ClientRegistry {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Get or create the client for a token.
    pub fn client_for(&self, token: &str) -> Arc<ApiClient> {
        let mut clients = self.clients.lock().expect("registry mutex poisoned");
        clients
            .entry(token.to_string())
            .or_insert_with(|| Arc::new(ApiClient::new(&self.config, token)))
            .clone()
    }

    /// Drop the client (and its cache) for a token.
    pub fn evict(&self, token: &str) {
        let mut clients = self.clients.lock().expect("registry mutex poisoned");
        clients.remove(token);
    }
}
