use std::ops::RangeInclusive;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tourbook_catalog::{TargetIds, TargetRef};

pub const RATING_RANGE: RangeInclusive<i32> = 1..=5;

pub fn validate_rating(rating: i32) -> tourbook::Result<()> {
    if RATING_RANGE.contains(&rating) {
        Ok(())
    } else {
        Err(tourbook::Error::validation(format!(
            "rating must be between {} and {}, got {rating}",
            RATING_RANGE.start(),
            RATING_RANGE.end()
        )))
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ReviewRow {
    pub id: i64,
    pub rating: i32,
    pub comment: String,
    pub is_active: bool,
    #[sqlx(flatten)]
    pub targets: TargetIds,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: i64,
    pub rating: i32,
    pub comment: String,
    pub is_active: bool,
    /// Set once at creation, never reassigned. Legacy rows may have none.
    pub target: Option<TargetRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: row.id,
            rating: row.rating,
            comment: row.comment,
            is_active: row.is_active,
            // the table constraint allows at most one
            target: row.targets.populated().first().copied(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Which rows a listing sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewScope {
    Active,
    All,
}

impl ReviewScope {
    pub fn admits(self, review: &Review) -> bool {
        match self {
            ReviewScope::Active => review.is_active,
            ReviewScope::All => true,
        }
    }
}
