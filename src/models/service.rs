//! Service catalog records.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A salon service as returned by `/services`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    pub name: String,
}

/// Build the id -> name lookup used by the UI.
pub fn service_map(services: Vec<Service>) -> HashMap<i64, String> {
    services.into_iter().map(|s| (s.id, s.name)).collect()
}
