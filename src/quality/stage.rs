use std::fmt;

use serde::{Deserialize, Serialize};

use super::attribute::{Criterion, Level};
use super::product::Product;

pub const STAGE_COUNT: usize = Stage::ALL.len();

/// The four production stages, in the order a product passes through them.
///
/// Each product flows through: DOUGH → BAKING → COOLING → PACKAGING
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Dough,
    Baking,
    Cooling,
    Packaging,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Dough, Stage::Baking, Stage::Cooling, Stage::Packaging];

    pub fn name(self) -> &'static str {
        match self {
            Stage::Dough => "dough",
            Stage::Baking => "baking",
            Stage::Cooling => "cooling",
            Stage::Packaging => "packaging",
        }
    }

    /// The single attribute this stage inspects.
    pub fn criterion(self) -> Criterion {
        match self {
            Stage::Dough => Criterion::Defects,
            Stage::Baking => Criterion::Texture,
            Stage::Cooling => Criterion::Smell,
            Stage::Packaging => Criterion::Taste,
        }
    }

    /// Dough passes only without defects; the later stages pass on good or
    /// excellent.
    pub fn passes(self, level: Level) -> bool {
        match self {
            Stage::Dough => level == Level::None,
            Stage::Baking | Stage::Cooling | Stage::Packaging => {
                matches!(level, Level::Good | Level::Excellent)
            }
        }
    }

    /// Evaluates the product without touching it.
    pub fn check(self, product: &Product) -> StageVerdict {
        let criterion = self.criterion();
        let observed = product.attribute(criterion);
        StageVerdict {
            stage: self,
            criterion,
            observed,
            passed: self.passes(observed),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of running one stage check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageVerdict {
    pub stage: Stage,
    pub criterion: Criterion,
    pub observed: Level,
    pub passed: bool,
}

impl fmt::Display for StageVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = if self.passed { "passed" } else { "not passed" };
        write!(
            f,
            "{} stage {outcome} ({} is {})",
            self.stage, self.criterion, self.observed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::ProductId;

    fn bread() -> Product {
        Product::new(ProductId(1), "Bread")
    }

    #[test]
    fn dough_requires_no_defects() {
        let mut product = bread();
        assert!(!Stage::Dough.check(&product).passed);

        product.update_attribute("defects", "few").unwrap();
        assert!(!Stage::Dough.check(&product).passed);

        product.update_attribute("defects", "none").unwrap();
        assert!(Stage::Dough.check(&product).passed);
    }

    #[test]
    fn baking_checks_texture() {
        let mut product = bread();
        assert!(!Stage::Baking.check(&product).passed);
        product.update_attribute("texture", "good").unwrap();
        assert!(Stage::Baking.check(&product).passed);
    }

    #[test]
    fn cooling_checks_smell() {
        let mut product = bread();
        assert!(!Stage::Cooling.check(&product).passed);
        product.update_attribute("smell", "excellent").unwrap();
        assert!(Stage::Cooling.check(&product).passed);
    }

    #[test]
    fn packaging_checks_taste() {
        let mut product = bread();
        assert!(!Stage::Packaging.check(&product).passed);
        product.update_attribute("taste", "good").unwrap();
        assert!(Stage::Packaging.check(&product).passed);
    }

    #[test]
    fn check_does_not_mutate_product() {
        let product = bread();
        let _ = Stage::Dough.check(&product);
        assert_eq!(product.stage_index(), 0);
        assert_eq!(product.attribute(Criterion::Defects), Level::Have);
    }

    #[test]
    fn verdict_display() {
        let verdict = Stage::Baking.check(&bread());
        assert_eq!(verdict.to_string(), "baking stage not passed (texture is poor)");
    }

    #[test]
    fn stage_order() {
        let names: Vec<_> = Stage::ALL.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["dough", "baking", "cooling", "packaging"]);
        assert_eq!(STAGE_COUNT, 4);
    }
}
