//! Page arithmetic for listing endpoints.
//!
//! Follows the usual web pagination contract: pages are 1-based, a page
//! below 1 is not found, and so is a page past the end unless it is the
//! first page of an empty listing.

use serde::Serialize;

use crate::error::{AppError, Result};

/// Resolved page bounds for one listing query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
}

impl PageWindow {
    /// Validate `page` against a listing of `total` items.
    pub fn resolve(page: i64, per_page: i64, total: i64) -> Result<Self> {
        if page < 1 || per_page < 1 {
            return Err(AppError::NotFound("Page not found".to_string()));
        }

        let window = Self {
            page,
            per_page,
            total: total.max(0),
        };
        if page > window.pages() && page != 1 {
            return Err(AppError::NotFound("Page not found".to_string()));
        }
        Ok(window)
    }

    /// Parse a raw `?page=` value. Anything that is not an integer means page 1.
    pub fn parse_page(raw: Option<&str>) -> i64 {
        raw.and_then(|p| p.trim().parse().ok()).unwrap_or(1)
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }

    pub fn pages(&self) -> i64 {
        (self.total + self.per_page - 1) / self.per_page
    }

    pub fn into_page<T>(self, items: Vec<T>) -> Page<T> {
        let pages = self.pages();
        Page {
            items,
            page: self.page,
            per_page: self.per_page,
            total: self.total,
            pages,
            has_prev: self.page > 1,
            has_next: self.page < pages,
        }
    }
}

/// One page of a listing
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub pages: i64,
    pub has_prev: bool,
    pub has_next: bool,
}
