//! Salon REST API client.
//!
//! Translates typed method calls into HTTP requests against the
//! configured base URL, classifies responses by status code, and caches
//! read results for a bounded time window keyed by call arguments.

use crate::config::AppConfig;
use crate::error::{ApiError, Result};
use crate::models::booking::{Booking, BookingStats, UpdateBooking};
use crate::models::customer::Customer;
use crate::models::service::{Service, service_map};
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;

use super::cache::ResponseCache;

/// Header carrying the access token obtained from `/login`.
pub const ACCESS_TOKEN_HEADER: &str = "Access-Token";

/// Query parameters for `/customers`.
#[derive(Debug, Clone)]
pub struct CustomerQuery {
    pub search: String,
    pub search_type: String,
    pub search_field: String,
    pub orderby: String,
    pub order: String,
    pub per_page: i32,
    pub page: i32,
}

impl Default for CustomerQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            search_type: "contains".to_string(),
            search_field: "all".to_string(),
            orderby: "first_name_last_name".to_string(),
            order: "asc".to_string(),
            per_page: -1,
            page: -1,
        }
    }
}

impl CustomerQuery {
    /// Server-side search with the default filters.
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: term.into(),
            ..Self::default()
        }
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("search", self.search.clone()),
            ("search_type", self.search_type.clone()),
            ("search_field", self.search_field.clone()),
            ("orderby", self.orderby.clone()),
            ("order", self.order.clone()),
            ("per_page", self.per_page.to_string()),
            ("page", self.page.to_string()),
        ]
    }
}

/// Query parameters for `/bookings`.
#[derive(Debug, Clone)]
pub struct BookingQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub shop: Option<i64>,
    pub services: Vec<i64>,
    pub customers: Vec<i64>,
    pub orderby: String,
    pub order: String,
    pub per_page: i32,
    pub page: i32,
}

impl BookingQuery {
    /// Bookings in a date range, newest first.
    pub fn range(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            shop: None,
            services: Vec::new(),
            customers: Vec::new(),
            orderby: "date_time".to_string(),
            order: "desc".to_string(),
            per_page: -1,
            page: -1,
        }
    }

    /// Restrict to a single customer's bookings.
    pub fn for_customer(mut self, customer_id: i64) -> Self {
        self.customers = vec![customer_id];
        self
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("start_date", self.start_date.format("%Y-%m-%d").to_string()),
            ("end_date", self.end_date.format("%Y-%m-%d").to_string()),
        ];
        if let Some(shop) = self.shop {
            params.push(("shop", shop.to_string()));
        }
        if !self.services.is_empty() {
            params.push(("services", join_ids(&self.services)));
        }
        if !self.customers.is_empty() {
            params.push(("customers", join_ids(&self.customers)));
        }
        params.push(("orderby", self.orderby.clone()));
        params.push(("order", self.order.clone()));
        params.push(("per_page", self.per_page.to_string()));
        params.push(("page", self.page.to_string()));
        params
    }
}

fn join_ids(ids: &[i64]) -> String {
    ids.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(",")
}

/// List payload envelope used by the salon API.
#[derive(Deserialize)]
struct Items<T> {
    items: Vec<T>,
}

/// Client for one session token. Holds its own response cache, so
/// reusing the instance across renders (see [`super::ClientRegistry`])
/// reuses the cache too.
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: String,
    health_timeout: Duration,
    ttl: TtlSet,
    cache: ResponseCache,
}

/// Per-endpoint cache TTLs resolved from config.
struct TtlSet {
    customers: Duration,
    bookings: Duration,
    upcoming: Duration,
    stats: Duration,
    services: Duration,
    health: Duration,
}

impl ApiClient {
    /// Create a client for the given access token.
    pub fn new(config: &AppConfig, token: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.api.timeout_secs))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            token: token.into(),
            health_timeout: Duration::from_secs(config.api.health_timeout_secs),
            ttl: TtlSet {
                customers: Duration::from_secs(config.cache.customers_ttl_secs),
                bookings: Duration::from_secs(config.cache.bookings_ttl_secs),
                upcoming: Duration::from_secs(config.cache.upcoming_ttl_secs),
                stats: Duration::from_secs(config.cache.stats_ttl_secs),
                services: Duration::from_secs(config.cache.services_ttl_secs),
                health: Duration::from_secs(config.cache.health_ttl_secs),
            },
            cache: ResponseCache::new(),
        }
    }

    /// Fetch customers matching the query.
    pub async fn get_customers(&self, query: &CustomerQuery) -> Result<Vec<Customer>> {
        let params = query.params();
        self.cached_list("customers", "/customers", &params, self.ttl.customers)
            .await
    }

    /// Fetch bookings in a date range, with optional shop/service/customer
    /// filters.
    pub async fn get_bookings(&self, query: &BookingQuery) -> Result<Vec<Booking>> {
        let params = query.params();
        self.cached_list("bookings", "/bookings", &params, self.ttl.bookings).await
    }

    /// Fetch bookings starting within the next `hours` hours.
    pub async fn get_upcoming_bookings(&self, hours: u32) -> Result<Vec<Booking>> {
        let params = vec![("hours", hours.to_string())];
        self.cached_list("upcoming", "/bookings/upcoming", &params, self.ttl.upcoming)
            .await
    }

    /// Fetch aggregate booking figures for a date range.
    pub async fn get_booking_stats(&self, start_date: NaiveDate, end_date: NaiveDate) -> Result<BookingStats> {
        let params = vec![
            ("start_date", start_date.format("%Y-%m-%d").to_string()),
            ("end_date", end_date.format("%Y-%m-%d").to_string()),
        ];
        let args = canonical_args(&params);

        if let Some(stats) = self.cache.get("stats", &args) {
            tracing::debug!("Cache hit: stats [{args}]");
            return Ok(stats);
        }

        let stats: BookingStats = self.get_json("/bookings/stats", &params).await?;
        self.cache.insert("stats", &args, &stats, self.ttl.stats);
        Ok(stats)
    }

    /// Fetch the service catalog as an id -> name map.
    pub async fn get_services(&self) -> Result<HashMap<i64, String>> {
        if let Some(map) = self.cache.get("services", "") {
            tracing::debug!("Cache hit: services");
            return Ok(map);
        }

        let items: Items<Service> = self.get_json("/services", &[]).await?;
        let map = service_map(items.items);
        self.cache.insert("services", "", &map, self.ttl.services);
        Ok(map)
    }

    /// Update a booking (admin note, status).
    ///
    /// Returns `Ok(true)` only when the PUT comes back exactly HTTP 200.
    /// On success the bookings, upcoming, and stats caches are dropped so
    /// the next read reflects the change.
    pub async fn update_booking(&self, id: i64, data: &UpdateBooking) -> Result<bool> {
        let url = format!("{base}/bookings/{id}", base = self.base_url);
        let response = self
            .client
            .put(&url)
            .header(ACCESS_TOKEN_HEADER, &self.token)
            .json(data)
            .send()
            .await?;

        classify_status(&response)?;
        let updated = response.status().as_u16() == 200;

        if updated {
            self.cache.invalidate("bookings");
            self.cache.invalidate("upcoming");
            self.cache.invalidate("stats");
        }

        Ok(updated)
    }

    /// Lightweight health check. Never errors: any failure becomes
    /// `(false, message)`.
    pub async fn get_api_health(&self) -> (bool, String) {
        if let Some(cached) = self.cache.get::<(bool, String)>("health", "") {
            return cached;
        }

        let url = format!("{base}/health", base = self.base_url);
        let result = match self.client.get(&url).timeout(self.health_timeout).send().await {
            Ok(response) if response.status().is_success() => {
                let message = response
                    .json::<HealthResponse>()
                    .await
                    .map(|h| h.message)
                    .unwrap_or_else(|_| "OK".to_string());
                (true, message)
            }
            Ok(response) => (false, format!("HTTP {}", response.status().as_u16())),
            Err(e) => (false, e.to_string()),
        };

        self.cache.insert("health", "", &result, self.ttl.health);
        result
    }

    /// Fetch an `{"items": [...]}` list endpoint through the cache.
    async fn cached_list<T>(
        &self,
        method: &'static str,
        path: &str,
        params: &[(&'static str, String)],
        ttl: Duration,
    ) -> Result<Vec<T>>
    where
        T: DeserializeOwned + serde::Serialize,
    {
        let args = canonical_args(params);

        if let Some(items) = self.cache.get(method, &args) {
            tracing::debug!("Cache hit: {method} [{args}]");
            return Ok(items);
        }

        let envelope: Items<T> = self.get_json(path, params).await?;
        self.cache.insert(method, &args, &envelope.items, ttl);
        Ok(envelope.items)
    }

    /// Issue an authenticated GET and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, path: &str, params: &[(&'static str, String)]) -> Result<T> {
        let url = format!("{base}{path}", base = self.base_url);
        let response = self
            .client
            .get(&url)
            .header(ACCESS_TOKEN_HEADER, &self.token)
            .query(params)
            .send()
            .await?;

        classify_status(&response)?;

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::decode(format!("{path}: {e}")))
    }
}

#[derive(Deserialize)]
struct HealthResponse {
    #[serde(default = "default_health_message")]
    message: String,
}

fn default_health_message() -> String {
    "OK".to_string()
}

/// Map a non-success status to its error class.
///
/// 2xx passes; 401 authentication, 404 not found, 429 rate limit (with
/// the `Retry-After` hint when present), 5xx server, anything else a
/// generic API error.
fn classify_status(response: &reqwest::Response) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }

    Err(match status.as_u16() {
        401 => ApiError::Authentication,
        404 => ApiError::NotFound,
        429 => {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok());
            ApiError::RateLimited { retry_after }
        }
        s if (500..600).contains(&s) => ApiError::Server { status: s },
        s => ApiError::Api { status: s },
    })
}

/// Canonical cache-key string for a parameter list.
fn canonical_args(params: &[(&'static str, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_query_defaults() {
        let query = CustomerQuery::default();
        let params = query.params();
        assert!(params.contains(&("search_type", "contains".to_string())));
        assert!(params.contains(&("orderby", "first_name_last_name".to_string())));
        assert!(params.contains(&("per_page", "-1".to_string())));
    }

    #[test]
    fn test_booking_query_omits_empty_filters() {
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
        let params = BookingQuery::range(start, end).params();

        assert!(params.iter().all(|(k, _)| *k != "shop"));
        assert!(params.iter().all(|(k, _)| *k != "customers"));
        assert!(params.contains(&("start_date", "2026-01-01".to_string())));
        assert!(params.contains(&("order", "desc".to_string())));
    }

    #[test]
    fn test_booking_query_joins_customer_ids() {
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
        let mut query = BookingQuery::range(start, end).for_customer(7);
        query.customers.push(9);

        let params = query.params();
        assert!(params.contains(&("customers", "7,9".to_string())));
    }

    #[test]
    fn test_canonical_args_is_order_stable() {
        let params = vec![("a", "1".to_string()), ("b", "2".to_string())];
        assert_eq!(canonical_args(&params), "a=1&b=2");
        assert_eq!(canonical_args(&[]), "");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let mut config = AppConfig::default();
        config.api.base_url = "http://localhost:9999/api/".to_string();
        let client = ApiClient::new(&config, "tok");
        assert_eq!(client.base_url, "http://localhost:9999/api");
    }
}
