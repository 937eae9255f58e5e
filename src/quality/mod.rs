//! Bakery quality control: products, standards, production stages,
//! certificates, reviews and the controller that ties them together.

mod attribute;
mod certificate;
mod clock;
mod controller;
mod product;
mod review;
mod stage;
mod standard;

pub use attribute::{Criterion, Level};
pub use certificate::{Certificate, DEFAULT_VALIDITY_DAYS};
pub use clock::{Clock, SystemClock};
pub use controller::{
    ComplianceMode, ComplianceReport, LOW_RATING_RECOMMENDATION, ProductionStep, QualityController,
    ReviewAnalysis,
};
pub use product::{COMPLETED, CheckResult, Product, ProductId, ProductStatus, QualityCheck};
pub use review::Review;
pub use stage::{STAGE_COUNT, Stage, StageVerdict};
pub use standard::{QualityStandard, StandardCatalog, StandardKind};
