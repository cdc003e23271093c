//! Verse of the day.
//!
//! A reference is picked from a fixed catalog by calendar date, resolved to
//! text through an external lookup service and cached until the date changes.

mod cache;
mod catalog;
mod client;
mod provider;

pub use cache::DailyVerseCache;
pub use catalog::VerseCatalog;
pub use client::{BibleApiClient, VersePayload, VerseSource};
pub use provider::DailyVerseProvider;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

/// Failure to obtain verse text from the lookup service
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContentFetchError {
    #[error("verse service unreachable: {0}")]
    Transport(String),

    #[error("verse service returned HTTP {0}")]
    Status(u16),

    #[error("verse service returned malformed JSON: {0}")]
    Malformed(String),

    #[error("verse service response is missing `{0}`")]
    MissingField(&'static str),
}

/// A verse resolved for one calendar date
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyVerse {
    pub text: String,
    pub reference: String,
    /// Date the value was computed on
    pub cached_for: NaiveDate,
}

impl DailyVerse {
    /// `"{text} - {reference}"`
    pub fn formatted(&self) -> String {
        format!("{} - {}", self.text, self.reference)
    }
}
