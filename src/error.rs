use thiserror::Error;

use crate::quality::{Criterion, ProductId};

#[derive(Debug, Error)]
pub enum BakeryError {
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    #[error("Invalid product id: {0:?}")]
    InvalidProductId(String),

    #[error("Unknown quality standard: {0}")]
    UnknownStandard(String),

    #[error("Product does not meet the standard, failed criteria: {}", join_criteria(.failed))]
    QualityCheckFailed { failed: Vec<Criterion> },

    #[error("Product {product} already holds a valid certificate for stage {stage}")]
    CertificateAlreadyExists { product: ProductId, stage: String },

    #[error("Production of {0} is already complete")]
    ProductionComplete(ProductId),

    #[error("Rating must be between 1 and 5, got {0}")]
    InvalidReviewRating(i64),

    #[error("Attribute {0:?} does not exist")]
    InvalidAttribute(String),

    #[error("Level {value:?} is not valid for {criterion}")]
    InvalidLevel { criterion: Criterion, value: String },

    #[error("Invalid date {0:?}, expected DD.MM.YYYY or YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Last visit cannot be earlier than the birth date")]
    VisitBeforeBirth,

    #[error("Attribute {0} is missing")]
    MissingAttribute(Criterion),

    #[error("Product id {0} appears more than once")]
    DuplicateProductId(ProductId),

    #[error("No product ids left after {}", ProductId(u32::MAX))]
    ProductIdsExhausted,
}

pub type Result<T, E = BakeryError> = std::result::Result<T, E>;

fn join_criteria(criteria: &[Criterion]) -> String {
    criteria
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
