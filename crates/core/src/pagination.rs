//! Pagination helpers shared by every list endpoint.
//!
//! All listings use one envelope: `{total, limit, offset, next_offset}`
//! with `next_offset = -1` meaning no further pages.

use serde::Serialize;

/// Default page size for log listings.
pub const DEFAULT_PAGE_LIMIT: i64 = 10;

/// Maximum page size for log listings.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Sentinel `next_offset` value meaning "no further pages".
pub const NO_MORE_PAGES: i64 = -1;

/// Pagination metadata returned with every list response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub next_offset: i64,
}

impl Pagination {
    pub fn new(total: i64, limit: i64, offset: i64) -> Self {
        Self {
            total,
            limit,
            offset,
            next_offset: next_offset(total, limit, offset),
        }
    }
}

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// The offset of the next page, or [`NO_MORE_PAGES`].
pub fn next_offset(total: i64, limit: i64, offset: i64) -> i64 {
    let next = offset + limit;
    if next >= total {
        NO_MORE_PAGES
    } else {
        next
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
