//! Terminal output with colored styles.
//!
//! [`Printer`] renders controller and registry results using `console`
//! styles: green for success, red for failure, yellow for pending work.

use console::Style;

use crate::clinic::{Pet, PetRegistry};
use crate::quality::{
    ComplianceReport, Criterion, Product, ProductId, ProductionStep, ReviewAnalysis, StageVerdict,
    StandardKind,
};

pub struct Printer {
    green: Style,
    red: Style,
    yellow: Style,
    dim: Style,
}

impl Default for Printer {
    fn default() -> Self {
        Self {
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            yellow: Style::new().yellow(),
            dim: Style::new().dim(),
        }
    }
}

impl Printer {
    fn ok(&self, message: impl std::fmt::Display) {
        println!("  {} {message}", self.green.apply_to("✓"));
    }

    fn fail(&self, message: impl std::fmt::Display) {
        println!("  {} {message}", self.red.apply_to("✗"));
    }

    fn pending(&self, message: impl std::fmt::Display) {
        println!("  {} {message}", self.yellow.apply_to("↻"));
    }

    pub fn product_added(&self, product: &Product) {
        self.ok(format!("Product {} added ({})", product.id, product.name));
    }

    pub fn product_list(&self, products: &[Product]) {
        if products.is_empty() {
            println!("{}", self.dim.apply_to("No products yet."));
            return;
        }
        for product in products {
            println!(
                "{}  {:<24} stage: {}",
                product.id,
                product.name,
                product.current_stage_name()
            );
        }
    }

    pub fn product_detail(&self, product: &Product) {
        println!("{product}");
        for (criterion, level) in product.attributes() {
            println!("  {criterion:<8} {level}");
        }
        for cert in &product.certificates {
            println!(
                "  certificate {} [{}] {} issued {} valid until {}",
                self.dim.apply_to(cert.id()),
                cert.stage(),
                cert.standard(),
                cert.issue_date(),
                cert.expiration_date()
            );
        }
        for check in &product.quality_checks {
            println!(
                "  check {} {}: {}",
                check.timestamp.format("%Y-%m-%d %H:%M"),
                check.stage,
                check.result.note
            );
        }
        for review in &product.reviews {
            println!("  review {}/5 by {}: {}", review.rating, review.author, review.comment);
        }
    }

    pub fn attribute_set(&self, id: ProductId, attribute: &str, level: &str) {
        self.ok(format!("{id}: {attribute} set to {level}"));
    }

    pub fn compliance(&self, id: ProductId, stage: &str, report: &ComplianceReport) {
        if report.compliant {
            self.ok(format!("{id} meets {} at stage {stage}", report.standard));
        } else {
            self.fail(format!(
                "{id} does not meet {} at stage {stage}, failed: {}",
                report.standard,
                join(&report.failed_criteria)
            ));
        }
    }

    pub fn verdict(&self, id: ProductId, verdict: &StageVerdict) {
        if verdict.passed {
            self.ok(format!("{id}: {verdict}"));
        } else {
            self.fail(format!("{id}: {verdict}"));
        }
    }

    pub fn improved(&self, id: ProductId, standard: StandardKind, criteria: &[Criterion]) {
        if criteria.is_empty() {
            self.ok(format!("{id} already meets {standard}"));
        } else {
            self.ok(format!("{id} improved to {standard}: {}", join(criteria)));
        }
    }

    pub fn certified(&self, id: ProductId, stage: &str, issued: bool) {
        if issued {
            self.ok(format!("Certificate issued for {id} at stage {stage}"));
        } else {
            self.fail(format!("Could not certify {id} at stage {stage}"));
        }
    }

    pub fn advanced(&self, id: ProductId, stage: &str, moved: bool) {
        if moved {
            self.ok(format!("{id} moved to stage {stage}"));
        } else {
            self.pending(format!("{id} stays at stage {stage}"));
        }
    }

    pub fn production_step(&self, id: ProductId, step: ProductionStep) {
        match step {
            ProductionStep::Advanced { from, to } => {
                self.ok(format!("{id}: stage {from} passed, now at {to}"))
            }
            ProductionStep::CertificationRequired(stage) => self.pending(format!(
                "{id}: stage {stage} needs a certificate before production can continue"
            )),
            ProductionStep::Completed => self.ok(format!("{id}: production completed")),
            ProductionStep::AlreadyComplete => {
                println!("{}", self.dim.apply_to(format!("{id}: production already complete")))
            }
        }
    }

    pub fn review_added(&self, id: ProductId, added: bool) {
        if added {
            self.ok(format!("Review added to {id}"));
        } else {
            self.fail(format!("Could not add review to {id}"));
        }
    }

    pub fn analysis(&self, id: ProductId, analysis: &ReviewAnalysis) {
        match analysis.average {
            None => println!("{id}: no reviews"),
            Some(average) => {
                println!("{id}: average rating {average:.2}");
                if analysis.recommendations.is_empty() {
                    self.ok("meets quality expectations");
                }
                for recommendation in &analysis.recommendations {
                    self.pending(recommendation);
                }
            }
        }
    }

    pub fn pet_page(&self, registry: &PetRegistry, page: usize) {
        let pets = registry.page(page);
        self.pets(pets);
        println!(
            "{}",
            self.dim.apply_to(format!(
                "page {page} / {}, {} records",
                registry.total_pages(),
                registry.len()
            ))
        );
    }

    pub fn pets<'a>(&self, pets: impl IntoIterator<Item = &'a Pet>) {
        let mut any = false;
        for pet in pets {
            any = true;
            println!(
                "{:<12} born {}  last visit {}  {:<20} {}",
                pet.name,
                pet.birth_date.format("%d.%m.%Y"),
                pet.last_visit.format("%d.%m.%Y"),
                pet.vet_name,
                pet.diagnosis
            );
        }
        if !any {
            println!("{}", self.dim.apply_to("No records."));
        }
    }

    pub fn pet_added(&self, pet: &Pet) {
        self.ok(format!("Pet {} added", pet.name));
    }

    pub fn pets_deleted(&self, count: usize) {
        if count == 0 {
            self.pending("No matching records");
        } else {
            self.ok(format!("Deleted {count} record(s)"));
        }
    }

    pub fn error(&self, err: impl std::fmt::Display) {
        eprintln!("  {} {err}", self.red.apply_to("✗"));
    }
}

fn join(criteria: &[Criterion]) -> String {
    criteria
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
