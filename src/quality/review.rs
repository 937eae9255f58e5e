use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::product::ProductId;
use crate::error::{BakeryError, Result};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// Customer feedback attached to a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub product_id: ProductId,
    pub author: String,
    pub comment: String,
    pub rating: u8,
    pub created_at: DateTime<Utc>,
}

impl Review {
    /// Rejects ratings outside 1..=5.
    pub fn new(
        product_id: ProductId,
        author: impl Into<String>,
        comment: impl Into<String>,
        rating: i64,
        created_at: DateTime<Utc>,
    ) -> Result<Self> {
        let rating = u8::try_from(rating)
            .ok()
            .filter(|r| (MIN_RATING..=MAX_RATING).contains(r))
            .ok_or(BakeryError::InvalidReviewRating(rating))?;
        Ok(Self {
            product_id,
            author: author.into(),
            comment: comment.into(),
            rating,
            created_at,
        })
    }
}
