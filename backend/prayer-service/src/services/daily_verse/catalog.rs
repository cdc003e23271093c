use chrono::{Datelike, NaiveDate};

use crate::error::{AppError, Result};

/// References cycled through one per day.
const DEFAULT_REFERENCES: &[&str] = &[
    "John 3:16",
    "Psalm 23:1",
    "Philippians 4:13",
    "Jeremiah 29:11",
    "Romans 8:28",
    "Proverbs 3:5-6",
    "Isaiah 41:10",
    "Matthew 11:28",
    "Joshua 1:9",
    "Psalm 46:1",
    "2 Corinthians 5:7",
    "Romans 12:12",
    "Philippians 4:6-7",
    "1 Peter 5:7",
    "Psalm 55:22",
    "Matthew 6:33",
    "Isaiah 40:31",
    "Lamentations 3:22-23",
    "Hebrews 11:1",
    "James 5:16",
    "1 Thessalonians 5:16-18",
    "Psalm 34:18",
    "Romans 15:13",
    "Galatians 6:2",
    "Colossians 3:23",
    "Psalm 121:1-2",
    "Micah 6:8",
    "Ephesians 2:8",
    "2 Timothy 1:7",
    "Psalm 119:105",
    "1 John 4:19",
];

/// Ordered, non-empty list of verse references
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseCatalog {
    references: Vec<String>,
}

impl VerseCatalog {
    pub fn new<I, S>(references: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let references: Vec<String> = references.into_iter().map(Into::into).collect();
        if references.is_empty() {
            return Err(AppError::Internal("verse catalog must not be empty".to_string()));
        }
        Ok(Self { references })
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    /// Index of the reference shown on `date`.
    ///
    /// Uses the proleptic Gregorian ordinal (0001-01-01 is day 1), so
    /// consecutive days walk the catalog in order and wrap with period `len`.
    pub fn index_for(&self, date: NaiveDate) -> usize {
        let ordinal = i64::from(date.num_days_from_ce());
        ordinal.rem_euclid(self.references.len() as i64) as usize
    }

    pub fn select(&self, date: NaiveDate) -> &str {
        &self.references[self.index_for(date)]
    }
}

impl Default for VerseCatalog {
    fn default() -> Self {
        Self {
            references: DEFAULT_REFERENCES.iter().map(|r| r.to_string()).collect(),
        }
    }
}
