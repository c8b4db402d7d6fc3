//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope; paginated
//! listings add a `pagination` block with the unified
//! `{total, limit, offset, next_offset}` shape.

use ghostmonk_core::pagination::Pagination;
use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Paginated listing envelope: `{ "data": [...], "pagination": {...} }`.
///
/// `pagination.next_offset` is `-1` when there is no further page.
#[derive(Debug, Serialize)]
pub struct PageResponse<T: Serialize> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}
