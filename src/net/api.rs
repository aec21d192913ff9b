//! Typed backend endpoints.
//!
//! One submodule per controller. Each function is a thin wrapper over
//! [`HttpClient`]: it fixes the path, method and payload shape, and decodes
//! `data` into the matching DTO. Endpoints whose `data` carries nothing
//! useful return `()`.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use serde::Serialize;
use serde_json::Value;

use super::request::{ApiError, HttpClient, RequestOptions};
use crate::platform::HttpMethod;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// `currentPage` / `size` pair shared by every paged query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub current_page: u32,
    pub size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { current_page: DEFAULT_PAGE, size: DEFAULT_PAGE_SIZE }
    }
}

impl PageRequest {
    #[must_use]
    pub fn new(current_page: u32, size: u32) -> Self {
        Self { current_page, size }
    }
}

/// Filters for the lost/found item listings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemQuery {
    #[serde(flatten)]
    pub page: PageRequest,
    pub title: Option<String>,
    pub category_id: Option<i64>,
    pub status: Option<i64>,
    /// Honoured by the lost-item listing only.
    pub user_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryQuery {
    #[serde(flatten)]
    pub page: PageRequest,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimQuery {
    #[serde(flatten)]
    pub page: PageRequest,
    pub status: Option<i64>,
    pub item_type: Option<i64>,
    pub item_title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationQuery {
    #[serde(flatten)]
    pub page: PageRequest,
    pub r#type: Option<i64>,
}

async fn discard(result: impl Future<Output = Result<Value, ApiError>>) -> Result<(), ApiError> {
    result.await.map(|_| ())
}

async fn put_empty(http: &HttpClient, path: &str) -> Result<(), ApiError> {
    discard(http.request_value(path, HttpMethod::Put, None, &RequestOptions::default())).await
}

// =============================================================================
// AUTH
// =============================================================================

pub mod auth {
    use super::*;
    use crate::net::types::LoginForm;

    /// Raw login payload: `{ token, userInfo? , ... }`.
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the request.
    pub async fn login(http: &HttpClient, form: &LoginForm) -> Result<Value, ApiError> {
        http.post("/user/login", form, &RequestOptions::default()).await
    }
}

// =============================================================================
// LOST ITEMS
// =============================================================================

pub mod lost {
    use super::*;
    use crate::net::types::{LostItem, LostItemStatistics, Page};

    /// # Errors
    ///
    /// Propagates [`ApiError`] from the request.
    pub async fn page(http: &HttpClient, query: &ItemQuery) -> Result<Page<LostItem>, ApiError> {
        http.get("/lost-item/page", query, &RequestOptions::default()).await
    }

    /// # Errors
    ///
    /// Propagates [`ApiError`] from the request.
    pub async fn get(http: &HttpClient, id: i64) -> Result<LostItem, ApiError> {
        http.get(&format!("/lost-item/{id}"), &(), &RequestOptions::default()).await
    }

    /// # Errors
    ///
    /// Propagates [`ApiError`] from the request.
    pub async fn create(http: &HttpClient, item: &LostItem) -> Result<(), ApiError> {
        discard(http.post("/lost-item", item, &RequestOptions::default())).await
    }

    /// # Errors
    ///
    /// Propagates [`ApiError`] from the request.
    pub async fn update(http: &HttpClient, id: i64, item: &LostItem) -> Result<(), ApiError> {
        discard(http.put(&format!("/lost-item/{id}"), item, &RequestOptions::default())).await
    }

    /// # Errors
    ///
    /// Propagates [`ApiError`] from the request.
    pub async fn update_status(http: &HttpClient, id: i64, status: i64) -> Result<(), ApiError> {
        let body = serde_json::json!({ "status": status });
        discard(http.put(&format!("/lost-item/{id}/status"), &body, &RequestOptions::default())).await
    }

    /// # Errors
    ///
    /// Propagates [`ApiError`] from the request.
    pub async fn delete(http: &HttpClient, id: i64) -> Result<(), ApiError> {
        discard(http.delete(&format!("/lost-item/{id}"), &RequestOptions::default())).await
    }

    /// # Errors
    ///
    /// Propagates [`ApiError`] from the request.
    pub async fn statistics(http: &HttpClient) -> Result<LostItemStatistics, ApiError> {
        http.get("/lost-item/statistics", &(), &RequestOptions::default()).await
    }
}

// =============================================================================
// FOUND ITEMS
// =============================================================================

pub mod found {
    use super::*;
    use crate::net::types::{FoundItem, Page};

    /// # Errors
    ///
    /// Propagates [`ApiError`] from the request.
    pub async fn page(http: &HttpClient, query: &ItemQuery) -> Result<Page<FoundItem>, ApiError> {
        http.get("/found-item/page", query, &RequestOptions::default()).await
    }

    /// Items published by the logged-in user.
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the request.
    pub async fn mine(http: &HttpClient) -> Result<Vec<FoundItem>, ApiError> {
        http.get("/found-item/my", &(), &RequestOptions::default()).await
    }

    /// # Errors
    ///
    /// Propagates [`ApiError`] from the request.
    pub async fn get(http: &HttpClient, id: i64) -> Result<FoundItem, ApiError> {
        http.get(&format!("/found-item/{id}"), &(), &RequestOptions::default()).await
    }

    /// # Errors
    ///
    /// Propagates [`ApiError`] from the request.
    pub async fn create(http: &HttpClient, item: &FoundItem) -> Result<(), ApiError> {
        discard(http.post("/found-item", item, &RequestOptions::default())).await
    }

    /// The item's `id` selects the record.
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the request.
    pub async fn update(http: &HttpClient, item: &FoundItem) -> Result<(), ApiError> {
        discard(http.put("/found-item", item, &RequestOptions::default())).await
    }

    /// # Errors
    ///
    /// Propagates [`ApiError`] from the request.
    pub async fn update_status(http: &HttpClient, id: i64, status: i64) -> Result<(), ApiError> {
        put_empty(http, &format!("/found-item/status/{id}/{status}")).await
    }

    /// # Errors
    ///
    /// Propagates [`ApiError`] from the request.
    pub async fn delete(http: &HttpClient, id: i64) -> Result<(), ApiError> {
        discard(http.delete(&format!("/found-item/{id}"), &RequestOptions::default())).await
    }
}

// =============================================================================
// CATEGORIES
// =============================================================================

pub mod category {
    use super::*;
    use crate::net::types::{ItemCategory, Page};

    /// # Errors
    ///
    /// Propagates [`ApiError`] from the request.
    pub async fn list(http: &HttpClient) -> Result<Vec<ItemCategory>, ApiError> {
        http.get("/category/list", &(), &RequestOptions::default()).await
    }

    /// # Errors
    ///
    /// Propagates [`ApiError`] from the request.
    pub async fn page(http: &HttpClient, query: &CategoryQuery) -> Result<Page<ItemCategory>, ApiError> {
        http.get("/category/page", query, &RequestOptions::default()).await
    }

    /// # Errors
    ///
    /// Propagates [`ApiError`] from the request.
    pub async fn get(http: &HttpClient, id: i64) -> Result<ItemCategory, ApiError> {
        http.get(&format!("/category/{id}"), &(), &RequestOptions::default()).await
    }
}

// =============================================================================
// CLAIMS
// =============================================================================

pub mod claim {
    use super::*;
    use crate::net::types::{ClaimApplication, ClaimAudit, Page};

    /// # Errors
    ///
    /// Propagates [`ApiError`] from the request.
    pub async fn create(http: &HttpClient, claim: &ClaimApplication) -> Result<(), ApiError> {
        discard(http.post("/claim", claim, &RequestOptions::default())).await
    }

    /// Every claim; admin only.
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the request.
    pub async fn page(http: &HttpClient, query: &ClaimQuery) -> Result<Page<ClaimApplication>, ApiError> {
        http.get("/claim/page", query, &RequestOptions::default()).await
    }

    /// # Errors
    ///
    /// Propagates [`ApiError`] from the request.
    pub async fn mine(http: &HttpClient, page: PageRequest, status: Option<i64>) -> Result<Page<ClaimApplication>, ApiError> {
        let query = ClaimQuery { page, status, ..ClaimQuery::default() };
        http.get("/claim/my", &query, &RequestOptions::default()).await
    }

    /// Claims against items the current user published.
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the request.
    pub async fn pending_audit(
        http: &HttpClient,
        page: PageRequest,
        status: Option<i64>,
    ) -> Result<Page<ClaimApplication>, ApiError> {
        let query = ClaimQuery { page, status, ..ClaimQuery::default() };
        http.get("/claim/audit", &query, &RequestOptions::default()).await
    }

    /// # Errors
    ///
    /// Propagates [`ApiError`] from the request.
    pub async fn audit(http: &HttpClient, audit: &ClaimAudit) -> Result<(), ApiError> {
        discard(http.put("/claim/audit", audit, &RequestOptions::default())).await
    }

    /// # Errors
    ///
    /// Propagates [`ApiError`] from the request.
    pub async fn cancel(http: &HttpClient, id: i64) -> Result<(), ApiError> {
        put_empty(http, &format!("/claim/cancel/{id}")).await
    }
}

// =============================================================================
// NOTIFICATIONS
// =============================================================================

pub mod notification {
    use super::*;
    use crate::net::types::{Notification, Page};

    /// # Errors
    ///
    /// Propagates [`ApiError`] from the request.
    pub async fn list(http: &HttpClient, query: &NotificationQuery) -> Result<Page<Notification>, ApiError> {
        http.get("/notification/list", query, &RequestOptions::default()).await
    }

    /// Polled in the background, so failures stay silent.
    ///
    /// # Errors
    ///
    /// Propagates [`ApiError`] from the request.
    pub async fn unread_count(http: &HttpClient) -> Result<u64, ApiError> {
        http.get("/notification/unread-count", &(), &RequestOptions::quiet()).await
    }

    /// # Errors
    ///
    /// Propagates [`ApiError`] from the request.
    pub async fn mark_read(http: &HttpClient, id: i64) -> Result<(), ApiError> {
        put_empty(http, &format!("/notification/{id}/read")).await
    }

    /// # Errors
    ///
    /// Propagates [`ApiError`] from the request.
    pub async fn mark_all_read(http: &HttpClient) -> Result<(), ApiError> {
        put_empty(http, "/notification/read-all").await
    }

    /// # Errors
    ///
    /// Propagates [`ApiError`] from the request.
    pub async fn delete(http: &HttpClient, id: i64) -> Result<(), ApiError> {
        discard(http.delete(&format!("/notification/{id}"), &RequestOptions::default())).await
    }
}
