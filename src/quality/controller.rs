use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::attribute::Criterion;
use super::certificate::{Certificate, DEFAULT_VALIDITY_DAYS};
use super::clock::{Clock, SystemClock};
use super::product::{CheckResult, Product, ProductId, ProductStatus, QualityCheck};
use super::review::Review;
use super::stage::{STAGE_COUNT, Stage, StageVerdict};
use super::standard::{QualityStandard, StandardCatalog, StandardKind};
use crate::error::{BakeryError, Result};

pub const LOW_RATING_THRESHOLD: f64 = 4.0;
pub const LOW_RATING_RECOMMENDATION: &str = "Product needs improvement: average rating below 4";

/// How compliance and certification report a rejection.
///
/// `Strict` surfaces `QualityCheckFailed`, `CertificateAlreadyExists` and
/// `ProductionComplete` as errors; `Lenient` logs them and answers with a
/// negative report or `false`. A missing product is an error in both modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplianceMode {
    #[default]
    Strict,
    Lenient,
}

impl ComplianceMode {
    fn reject(self, err: BakeryError) -> Result<bool> {
        match self {
            ComplianceMode::Strict => Err(err),
            ComplianceMode::Lenient => {
                warn!(%err, "certification refused");
                Ok(false)
            }
        }
    }
}

/// Outcome of comparing a product against a standard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplianceReport {
    pub standard: StandardKind,
    pub compliant: bool,
    /// Mismatching criteria in criterion order.
    pub failed_criteria: Vec<Criterion>,
}

/// What a call to [`QualityController::run_production`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProductionStep {
    /// The current stage was certified and the product moved on.
    Advanced { from: Stage, to: Stage },
    /// The current stage has no valid certificate yet.
    CertificationRequired(Stage),
    /// The certified last stage was closed out; production is complete.
    Completed,
    /// Nothing left to run.
    AlreadyComplete,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewAnalysis {
    pub average: Option<f64>,
    pub recommendations: Vec<String>,
}

/// Sole owner of the products and entry point for every business operation.
pub struct QualityController<C: Clock = SystemClock> {
    products: Vec<Product>,
    /// `None` once `u32::MAX` has been handed out.
    next_id: Option<u32>,
    catalog: StandardCatalog,
    mode: ComplianceMode,
    validity_days: u64,
    clock: C,
}

impl QualityController<SystemClock> {
    pub fn new(mode: ComplianceMode) -> Self {
        Self::with_clock(mode, SystemClock)
    }
}

impl Default for QualityController<SystemClock> {
    fn default() -> Self {
        Self::new(ComplianceMode::default())
    }
}

fn find(products: &[Product], id: ProductId) -> Result<&Product> {
    products
        .iter()
        .find(|p| p.id == id)
        .ok_or(BakeryError::ProductNotFound(id))
}

fn find_mut(products: &mut [Product], id: ProductId) -> Result<&mut Product> {
    products
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or(BakeryError::ProductNotFound(id))
}

fn evaluate(product: &Product, standard: &QualityStandard) -> ComplianceReport {
    let mut failed_criteria = Vec::new();
    for (criterion, required) in &standard.criteria {
        let actual = product.attribute(*criterion);
        debug!(
            product = %product.id,
            %criterion,
            %actual,
            %required,
            "checking criterion"
        );
        if actual != *required {
            failed_criteria.push(*criterion);
        }
    }
    ComplianceReport {
        standard: standard.kind,
        compliant: failed_criteria.is_empty(),
        failed_criteria,
    }
}

fn holds_valid_certificate(product: &Product, today: chrono::NaiveDate) -> bool {
    product
        .current_stage()
        .is_some_and(|stage| product.certificates.iter().any(|c| c.covers(stage, today)))
}

impl<C: Clock> QualityController<C> {
    pub fn with_clock(mode: ComplianceMode, clock: C) -> Self {
        Self {
            products: Vec::new(),
            next_id: Some(1),
            catalog: StandardCatalog::default(),
            mode,
            validity_days: DEFAULT_VALIDITY_DAYS,
            clock,
        }
    }

    pub fn with_validity_days(mut self, days: u64) -> Self {
        self.validity_days = days;
        self
    }

    /// Replaces the product list with a persisted snapshot. The id counter
    /// resumes after the highest restored id.
    ///
    /// Rejects snapshots with repeated ids or with attributes that are missing
    /// or off their criterion's scale.
    pub fn restore(mut self, mut products: Vec<Product>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for product in &mut products {
            if !seen.insert(product.id) {
                return Err(BakeryError::DuplicateProductId(product.id));
            }
            product.check_attributes()?;
            let index = product.stage_index();
            product.set_stage_index(index);
        }
        self.next_id = match seen.last() {
            Some(last) => last.0.checked_add(1),
            None => Some(1),
        };
        debug!(count = products.len(), next_id = ?self.next_id, "products restored");
        self.products = products;
        Ok(self)
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn catalog(&self) -> &StandardCatalog {
        &self.catalog
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn into_products(self) -> Vec<Product> {
        self.products
    }

    pub fn add_product(&mut self, name: impl Into<String>) -> Result<&Product> {
        let raw = self.next_id.ok_or(BakeryError::ProductIdsExhausted)?;
        self.next_id = raw.checked_add(1);
        let id = ProductId(raw);
        let product = Product::new(id, name);
        info!(product = %id, name = %product.name, "product added");
        self.products.push(product);
        Ok(&self.products[self.products.len() - 1])
    }

    pub fn show_products(&self) -> Vec<(ProductId, String)> {
        self.products.iter().map(|p| (p.id, p.name.clone())).collect()
    }

    pub fn get_product(&self, id: ProductId) -> Result<&Product> {
        find(&self.products, id)
    }

    pub fn get_product_mut(&mut self, id: ProductId) -> Result<&mut Product> {
        find_mut(&mut self.products, id)
    }

    /// Compares every criterion of `standard` against the product.
    pub fn check_compliance(&self, id: ProductId, standard: StandardKind) -> Result<ComplianceReport> {
        let product = self.get_product(id)?;
        let report = evaluate(product, self.catalog.by_kind(standard));
        if !report.compliant && self.mode == ComplianceMode::Strict {
            return Err(BakeryError::QualityCheckFailed {
                failed: report.failed_criteria,
            });
        }
        Ok(report)
    }

    pub fn has_certificate_for_current_stage(&self, id: ProductId) -> bool {
        let today = self.clock.today();
        self.get_product(id)
            .is_ok_and(|product| holds_valid_certificate(product, today))
    }

    /// Moves to the next stage when the current one holds a valid certificate
    /// and is not the last stage.
    pub fn advance_stage(&mut self, id: ProductId) -> bool {
        let today = self.clock.today();
        let product = match self.get_product_mut(id) {
            Ok(product) => product,
            Err(err) => {
                warn!(%err, "stage not advanced");
                return false;
            }
        };
        let index = product.stage_index();
        if !holds_valid_certificate(product, today) || index + 1 >= STAGE_COUNT {
            return false;
        }
        product.set_stage_index(index + 1);
        info!(product = %id, stage = product.current_stage_name(), "stage advanced");
        true
    }

    /// A product that cannot be found counts as complete.
    pub fn is_production_complete(&self, id: ProductId) -> bool {
        self.get_product(id).map_or(true, Product::is_complete)
    }

    pub fn add_quality_check(&mut self, id: ProductId, stage: Stage, result: CheckResult) {
        let timestamp = self.clock.now();
        match self.get_product_mut(id) {
            Ok(product) => product.quality_checks.push(QualityCheck {
                stage,
                result,
                timestamp,
            }),
            Err(err) => warn!(%err, "quality check dropped"),
        }
    }

    /// Appends `certificate` to the product it was issued for.
    pub fn add_certificate(&mut self, id: ProductId, certificate: Certificate) -> bool {
        if certificate.product_id() != id {
            warn!(product = %id, issued_for = %certificate.product_id(), "certificate dropped");
            return false;
        }
        match self.get_product_mut(id) {
            Ok(product) => {
                product.certificates.push(certificate);
                true
            }
            Err(err) => {
                warn!(%err, "certificate dropped");
                false
            }
        }
    }

    /// Issues a certificate for the current stage if the product complies and
    /// the stage is not already covered by a valid certificate.
    pub fn certify_product(&mut self, id: ProductId, standard: StandardKind) -> Result<bool> {
        let today = self.clock.today();
        let standard = self.catalog.by_kind(standard);
        let product = find_mut(&mut self.products, id)?;

        let Some(stage) = product.current_stage() else {
            return self.mode.reject(BakeryError::ProductionComplete(id));
        };

        let report = evaluate(product, standard);
        if !report.compliant {
            return self.mode.reject(BakeryError::QualityCheckFailed {
                failed: report.failed_criteria,
            });
        }

        if product.certificates.iter().any(|c| c.covers(stage, today)) {
            return self.mode.reject(BakeryError::CertificateAlreadyExists {
                product: id,
                stage: stage.name().to_string(),
            });
        }

        let certificate = Certificate::issue(id, standard.kind, stage, today, self.validity_days);
        info!(
            product = %id,
            %stage,
            standard = standard.name(),
            expires = %certificate.expiration_date(),
            "certificate issued"
        );
        product.certificates.push(certificate);
        Ok(true)
    }

    /// Raises every mismatching attribute to the level `standard` requires and
    /// returns the criteria that changed. A compliant product is left alone.
    pub fn improve_product(&mut self, id: ProductId, standard: StandardKind) -> Result<Vec<Criterion>> {
        let standard = self.catalog.by_kind(standard);
        let product = find_mut(&mut self.products, id)?;

        let report = evaluate(product, standard);
        for criterion in &report.failed_criteria {
            let old = product.attribute(*criterion);
            let new = standard.required(*criterion);
            product.set_attribute(*criterion, new);
            debug!(product = %id, %criterion, %old, %new, "criterion improved");
        }
        Ok(report.failed_criteria)
    }

    /// Runs the current stage's check and records the verdict in the log.
    pub fn inspect_current_stage(&mut self, id: ProductId) -> Result<StageVerdict> {
        let product = self.get_product(id)?;
        let stage = product
            .current_stage()
            .ok_or(BakeryError::ProductionComplete(id))?;
        let verdict = stage.check(product);
        self.add_quality_check(
            id,
            stage,
            CheckResult {
                passed: verdict.passed,
                note: verdict.to_string(),
            },
        );
        Ok(verdict)
    }

    /// One production step: certify → run → certify → run ... until the
    /// packaging stage is certified and closed out.
    pub fn run_production(&mut self, id: ProductId) -> Result<ProductionStep> {
        let product = self.get_product(id)?;
        let Some(stage) = product.current_stage() else {
            return Ok(ProductionStep::AlreadyComplete);
        };
        let index = product.stage_index();
        info!(product = %id, %stage, "running production");

        if !self.has_certificate_for_current_stage(id) {
            return Ok(ProductionStep::CertificationRequired(stage));
        }

        if self.advance_stage(id) {
            return Ok(ProductionStep::Advanced {
                from: stage,
                to: Stage::ALL[index + 1],
            });
        }

        let product = self.get_product_mut(id)?;
        product.set_stage_index(STAGE_COUNT);
        product.status = ProductStatus::Approved;
        info!(product = %id, "production complete");
        Ok(ProductionStep::Completed)
    }

    /// Returns `false` when the product is missing or the rating is invalid.
    pub fn add_review(&mut self, id: ProductId, author: &str, comment: &str, rating: i64) -> bool {
        let now = self.clock.now();
        let review = Review::new(id, author, comment, rating, now);
        let outcome = self
            .get_product_mut(id)
            .and_then(|product| review.map(|review| product.add_review(review)));
        match outcome {
            Ok(()) => true,
            Err(err) => {
                warn!(%err, "review not added");
                false
            }
        }
    }

    pub fn analyze_reviews(&self, id: ProductId) -> Result<ReviewAnalysis> {
        let product = self.get_product(id)?;
        if product.reviews.is_empty() {
            return Ok(ReviewAnalysis {
                average: None,
                recommendations: Vec::new(),
            });
        }

        let total: u32 = product.reviews.iter().map(|r| u32::from(r.rating)).sum();
        let average = f64::from(total) / product.reviews.len() as f64;

        let mut recommendations = Vec::new();
        if average < LOW_RATING_THRESHOLD {
            recommendations.push(LOW_RATING_RECOMMENDATION.to_string());
        }

        Ok(ReviewAnalysis {
            average: Some(average),
            recommendations,
        })
    }
}
