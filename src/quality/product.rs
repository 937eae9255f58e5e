use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::attribute::{Criterion, Level};
use super::certificate::Certificate;
use super::review::Review;
use super::stage::{STAGE_COUNT, Stage};
use crate::error::{BakeryError, Result};

/// Name reported for a product whose stage index ran past the last stage.
pub const COMPLETED: &str = "completed";

/// Sequential product identity, displayed as `P001`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u32);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{:03}", self.0)
    }
}

impl FromStr for ProductId {
    type Err = BakeryError;

    /// Accepts `P001`, `p1` or a bare number.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix('P')
            .or_else(|| trimmed.strip_prefix('p'))
            .unwrap_or(trimmed);
        digits
            .parse::<u32>()
            .map(ProductId)
            .map_err(|_| BakeryError::InvalidProductId(s.to_string()))
    }
}

/// Descriptive lifecycle label. Transitions are not enforced by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    Production,
    QualityCheck,
    Approved,
    Rejected,
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductStatus::Production => write!(f, "production"),
            ProductStatus::QualityCheck => write!(f, "quality_check"),
            ProductStatus::Approved => write!(f, "approved"),
            ProductStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Outcome stored in a product's check log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub passed: bool,
    pub note: String,
}

/// One timestamped entry of the quality-check log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityCheck {
    pub stage: Stage,
    pub result: CheckResult,
    pub timestamp: DateTime<Utc>,
}

/// A bakery product moving through the production stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    attributes: BTreeMap<Criterion, Level>,
    pub status: ProductStatus,
    stage_index: usize,
    #[serde(default)]
    pub quality_checks: Vec<QualityCheck>,
    #[serde(default)]
    pub certificates: Vec<Certificate>,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

impl Product {
    /// A fresh product starts at the dough stage with every attribute at the
    /// worst level of its scale.
    pub fn new(id: ProductId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            attributes: Criterion::ALL.iter().map(|c| (*c, c.worst())).collect(),
            status: ProductStatus::Production,
            stage_index: 0,
            quality_checks: Vec::new(),
            certificates: Vec::new(),
            reviews: Vec::new(),
        }
    }

    /// Zero-based index into [`Stage::ALL`]; `STAGE_COUNT` means completed.
    pub fn stage_index(&self) -> usize {
        self.stage_index
    }

    pub fn current_stage(&self) -> Option<Stage> {
        Stage::ALL.get(self.stage_index).copied()
    }

    pub fn current_stage_name(&self) -> &'static str {
        self.current_stage().map(Stage::name).unwrap_or(COMPLETED)
    }

    pub fn is_complete(&self) -> bool {
        self.stage_index >= STAGE_COUNT
    }

    pub fn attribute(&self, criterion: Criterion) -> Level {
        self.attributes
            .get(&criterion)
            .copied()
            .unwrap_or_else(|| criterion.worst())
    }

    /// All four attributes in criterion order.
    pub fn attributes(&self) -> impl Iterator<Item = (Criterion, Level)> + '_ {
        self.attributes.iter().map(|(c, l)| (*c, *l))
    }

    /// Every criterion must be present with a level from its own scale.
    pub(crate) fn check_attributes(&self) -> Result<()> {
        for criterion in Criterion::ALL {
            match self.attributes.get(&criterion) {
                Some(level) if criterion.accepts(*level) => {}
                Some(level) => {
                    return Err(BakeryError::InvalidLevel {
                        criterion,
                        value: level.to_string(),
                    });
                }
                None => return Err(BakeryError::MissingAttribute(criterion)),
            }
        }
        Ok(())
    }

    /// Overwrites one attribute. The key must name a criterion and the value
    /// must sit on that criterion's scale.
    pub fn update_attribute(&mut self, key: &str, value: &str) -> Result<()> {
        let criterion: Criterion = key.parse()?;
        let level = criterion.level(value)?;
        self.set_attribute(criterion, level);
        Ok(())
    }

    pub(crate) fn set_attribute(&mut self, criterion: Criterion, level: Level) {
        self.attributes.insert(criterion, level);
    }

    pub fn add_review(&mut self, review: Review) {
        self.reviews.push(review);
    }

    pub(crate) fn set_stage_index(&mut self, index: usize) {
        self.stage_index = index.min(STAGE_COUNT);
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{}] stage={} certificates={}",
            self.id,
            self.name,
            self.status,
            self.current_stage_name(),
            self.certificates.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_product_defaults() {
        let product = Product::new(ProductId(1), "Bread");
        assert_eq!(product.name, "Bread");
        assert_eq!(product.stage_index(), 0);
        assert_eq!(product.current_stage_name(), "dough");
        assert_eq!(product.current_stage(), Some(Stage::Dough));
        assert_eq!(product.status, ProductStatus::Production);
        assert_eq!(product.attribute(Criterion::Defects), Level::Have);
        assert_eq!(product.attribute(Criterion::Texture), Level::Poor);
        assert_eq!(product.attribute(Criterion::Smell), Level::Bad);
        assert_eq!(product.attribute(Criterion::Taste), Level::Poor);
        assert!(product.quality_checks.is_empty());
        assert!(product.certificates.is_empty());
        assert!(product.reviews.is_empty());
    }

    #[test]
    fn update_attribute_is_visible_on_next_read() {
        let mut product = Product::new(ProductId(1), "Bread");
        product.update_attribute("defects", "none").unwrap();
        assert_eq!(product.attribute(Criterion::Defects), Level::None);
    }

    #[test]
    fn update_attribute_rejects_unknown_key() {
        let mut product = Product::new(ProductId(1), "Bread");
        let err = product.update_attribute("invalid_attribute", "value").unwrap_err();
        assert!(matches!(err, BakeryError::InvalidAttribute(_)));
    }

    #[test]
    fn update_attribute_rejects_off_scale_level() {
        let mut product = Product::new(ProductId(1), "Bread");
        let err = product.update_attribute("smell", "poor").unwrap_err();
        assert!(matches!(err, BakeryError::InvalidLevel { .. }));
        assert_eq!(product.attribute(Criterion::Smell), Level::Bad);
    }

    #[test]
    fn check_attributes_rejects_stored_off_scale_level() {
        let mut product = Product::new(ProductId(1), "Bread");
        assert!(product.check_attributes().is_ok());

        product.attributes.insert(Criterion::Texture, Level::None);
        assert!(matches!(
            product.check_attributes(),
            Err(BakeryError::InvalidLevel { criterion: Criterion::Texture, .. })
        ));

        product.attributes.remove(&Criterion::Texture);
        assert!(matches!(
            product.check_attributes(),
            Err(BakeryError::MissingAttribute(Criterion::Texture))
        ));
    }

    #[test]
    fn attributes_iterate_in_criterion_order() {
        let product = Product::new(ProductId(1), "Bread");
        let criteria: Vec<_> = product.attributes().map(|(c, _)| c).collect();
        assert_eq!(criteria, Criterion::ALL.to_vec());
    }

    #[test]
    fn stage_name_is_completed_past_last_stage() {
        let mut product = Product::new(ProductId(1), "Bread");
        product.set_stage_index(STAGE_COUNT);
        assert!(product.is_complete());
        assert_eq!(product.current_stage(), None);
        assert_eq!(product.current_stage_name(), COMPLETED);
    }

    #[test]
    fn stage_index_is_clamped() {
        let mut product = Product::new(ProductId(1), "Bread");
        product.set_stage_index(42);
        assert_eq!(product.stage_index(), STAGE_COUNT);
    }

    #[test]
    fn product_id_display_and_parse() {
        assert_eq!(ProductId(3).to_string(), "P003");
        assert_eq!("P003".parse::<ProductId>().unwrap(), ProductId(3));
        assert_eq!("p12".parse::<ProductId>().unwrap(), ProductId(12));
        assert_eq!("7".parse::<ProductId>().unwrap(), ProductId(7));
        assert!("bread".parse::<ProductId>().is_err());
    }

    #[test]
    fn product_serialization_roundtrip() {
        let mut product = Product::new(ProductId(4), "Baguette");
        product.update_attribute("texture", "excellent").unwrap();
        let json = serde_json::to_string(&product).unwrap();
        let restored: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.id, ProductId(4));
        assert_eq!(restored.attribute(Criterion::Texture), Level::Excellent);
        assert_eq!(restored.current_stage_name(), "dough");
    }
}
