//! Command dispatch: loads state through the store, runs one operation,
//! renders it and writes the state back when it changed.

use anyhow::{Context, Result};
use tracing::debug;

use crate::cli::{Cli, Command, PetCommand, PetQueryArgs, ProductCommand, ReviewCommand};
use crate::clinic::{Pet, PetQuery, PetRegistry, parse_date};
use crate::config::BakeqcConfig;
use crate::quality::{Clock, Product, ProductId, QualityController, StandardKind};
use crate::store;
use crate::ui::Printer;

/// Resolved settings for one invocation: config file, then env, then flags.
pub struct App {
    config: BakeqcConfig,
    printer: Printer,
}

impl App {
    pub fn new(cli: &Cli) -> Result<Self> {
        let mut config = BakeqcConfig::load(cli.config.as_deref())?;
        if let Some(data) = &cli.data {
            config.data_file = data.clone();
        }
        if let Some(mode) = cli.mode {
            config.compliance_mode = mode.into();
        }
        debug!(?config, "configuration resolved");
        Ok(Self {
            config,
            printer: Printer::default(),
        })
    }

    pub fn run(&self, command: Command) -> Result<()> {
        match command {
            Command::Product(cmd) => self.product(cmd),
            Command::Check { id, standard } => {
                let qc = self.load_controller()?;
                let id = parse_id(&id)?;
                let kind = standard_kind(&qc, &standard)?;
                let report = qc.check_compliance(id, kind)?;
                let stage = qc.get_product(id)?.current_stage_name();
                self.printer.compliance(id, stage, &report);
                Ok(())
            }
            Command::Inspect { id } => self.with_controller(|qc, p| {
                let id = parse_id(&id)?;
                p.verdict(id, &qc.inspect_current_stage(id)?);
                Ok(())
            }),
            Command::Improve { id, standard } => self.with_controller(|qc, p| {
                let id = parse_id(&id)?;
                let kind = standard_kind(qc, &standard)?;
                p.improved(id, kind, &qc.improve_product(id, kind)?);
                Ok(())
            }),
            Command::Certify { id, standard } => self.with_controller(|qc, p| {
                let id = parse_id(&id)?;
                let kind = standard_kind(qc, &standard)?;
                let stage = qc.get_product(id)?.current_stage_name();
                p.certified(id, stage, qc.certify_product(id, kind)?);
                Ok(())
            }),
            Command::Advance { id } => self.with_controller(|qc, p| {
                let id = parse_id(&id)?;
                let moved = qc.advance_stage(id);
                p.advanced(id, qc.get_product(id)?.current_stage_name(), moved);
                Ok(())
            }),
            Command::Run { id } => self.with_controller(|qc, p| {
                let id = parse_id(&id)?;
                p.production_step(id, qc.run_production(id)?);
                Ok(())
            }),
            Command::Review(cmd) => self.review(cmd),
            Command::Pet(cmd) => self.pet(cmd),
            Command::Demo => self.demo(),
        }
    }

    fn product(&self, cmd: ProductCommand) -> Result<()> {
        match cmd {
            ProductCommand::Add { name } => self.with_controller(|qc, p| {
                p.product_added(qc.add_product(name)?);
                Ok(())
            }),
            ProductCommand::List => {
                self.printer.product_list(self.load_controller()?.products());
                Ok(())
            }
            ProductCommand::Show { id } => {
                let qc = self.load_controller()?;
                self.printer.product_detail(qc.get_product(parse_id(&id)?)?);
                Ok(())
            }
            ProductCommand::Set { id, attribute, level } => self.with_controller(|qc, p| {
                let id = parse_id(&id)?;
                qc.get_product_mut(id)?.update_attribute(&attribute, &level)?;
                p.attribute_set(id, &attribute, &level);
                Ok(())
            }),
        }
    }

    fn review(&self, cmd: ReviewCommand) -> Result<()> {
        match cmd {
            ReviewCommand::Add { id, author, comment, rating } => self.with_controller(|qc, p| {
                let id = parse_id(&id)?;
                p.review_added(id, qc.add_review(id, &author, &comment, rating));
                Ok(())
            }),
            ReviewCommand::Analyze { id } => {
                let qc = self.load_controller()?;
                let id = parse_id(&id)?;
                self.printer.analysis(id, &qc.analyze_reviews(id)?);
                Ok(())
            }
        }
    }

    fn pet(&self, cmd: PetCommand) -> Result<()> {
        let mut registry = self.load_registry()?;
        match cmd {
            PetCommand::Add { name, birth_date, last_visit, vet_name, diagnosis } => {
                let pet = Pet::new(
                    name,
                    parse_date(&birth_date)?,
                    parse_date(&last_visit)?,
                    vet_name,
                    diagnosis,
                )?;
                self.printer.pet_added(&pet);
                registry.add(pet);
                self.save_registry(registry)
            }
            PetCommand::List { page, page_size } => {
                if let Some(size) = page_size {
                    registry.set_page_size(size);
                }
                if !registry.set_current_page(page) {
                    anyhow::bail!("page {page} is out of range (1..={})", registry.total_pages().max(1));
                }
                self.printer.pet_page(&registry, registry.current_page());
                Ok(())
            }
            PetCommand::Search(args) => {
                let query = pet_query(args)?;
                self.printer.pets(registry.find(&query));
                Ok(())
            }
            PetCommand::Delete(args) => {
                let query = pet_query(args)?;
                self.printer.pets_deleted(registry.delete(&query));
                self.save_registry(registry)
            }
        }
    }

    /// In-memory walkthrough; nothing is written to disk.
    fn demo(&self) -> Result<()> {
        let mut qc = QualityController::new(self.config.compliance_mode)
            .with_validity_days(self.config.certificate_validity_days);
        let p = &self.printer;
        let id = qc.add_product("Bread")?.id;
        p.product_added(qc.get_product(id)?);

        let standard = standard_kind(&qc, "GOST ST-1")?;
        while !qc.is_production_complete(id) {
            p.verdict(id, &qc.inspect_current_stage(id)?);
            p.improved(id, standard, &qc.improve_product(id, standard)?);
            let stage = qc.get_product(id)?.current_stage_name();
            p.certified(id, stage, qc.certify_product(id, standard)?);
            p.production_step(id, qc.run_production(id)?);
        }

        for (author, comment, rating) in [("Ivan", "Good bread", 4), ("Maria", "Tasty", 5), ("Sergey", "Dry crust", 2)] {
            p.review_added(id, qc.add_review(id, author, comment, rating));
        }
        p.analysis(id, &qc.analyze_reviews(id)?);
        p.product_detail(qc.get_product(id)?);
        Ok(())
    }

    fn load_controller(&self) -> Result<QualityController> {
        let path = &self.config.data_file;
        let products: Vec<Product> = store::load(path)?;
        QualityController::new(self.config.compliance_mode)
            .with_validity_days(self.config.certificate_validity_days)
            .restore(products)
            .with_context(|| format!("invalid product data in {}", path.display()))
    }

    /// Runs `op` against the stored products and saves them afterwards.
    fn with_controller<F>(&self, op: F) -> Result<()>
    where
        F: FnOnce(&mut QualityController, &Printer) -> Result<()>,
    {
        let mut qc = self.load_controller()?;
        op(&mut qc, &self.printer)?;
        store::save(qc.products(), &self.config.data_file)
    }

    fn load_registry(&self) -> Result<PetRegistry> {
        let pets: Vec<Pet> = store::load(&self.config.clinic_file)?;
        Ok(PetRegistry::new(self.config.page_size).with_pets(pets))
    }

    fn save_registry(&self, registry: PetRegistry) -> Result<()> {
        store::save(&registry.into_pets(), &self.config.clinic_file)
    }
}

fn standard_kind<C: Clock>(qc: &QualityController<C>, raw: &str) -> Result<StandardKind> {
    Ok(qc.catalog().lookup(raw)?.kind)
}

fn parse_id(raw: &str) -> Result<ProductId> {
    Ok(raw.parse()?)
}

fn pet_query(args: PetQueryArgs) -> Result<PetQuery> {
    Ok(match args {
        PetQueryArgs::ByName { name, birth_date } => PetQuery::NameAndBirth {
            name,
            birth_date: parse_date(&birth_date)?,
        },
        PetQueryArgs::ByVisit { last_visit, vet_name } => PetQuery::VisitAndVet {
            last_visit: parse_date(&last_visit)?,
            vet_name,
        },
        PetQueryArgs::ByDiagnosis { phrase } => PetQuery::DiagnosisPhrase(phrase),
    })
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use clap::Parser;

    fn app_in(dir: &Path, extra: &[&str]) -> (App, Cli) {
        let data = dir.join("products.json");
        let mut args = vec![
            "bakeqc".to_string(),
            "--config".to_string(),
            dir.join("none.toml").display().to_string(),
            "--data".to_string(),
            data.display().to_string(),
        ];
        args.extend(extra.iter().map(|s| s.to_string()));
        let cli = Cli::parse_from(args);
        (App::new(&cli).unwrap(), cli)
    }

    fn run(dir: &Path, extra: &[&str]) -> Result<()> {
        let (app, cli) = app_in(dir, extra);
        app.run(cli.command)
    }

    #[test]
    fn commands_persist_between_invocations() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path(), &["product", "add", "Bread"]).unwrap();
        run(dir.path(), &["improve", "P001", "--standard", "gost"]).unwrap();
        run(dir.path(), &["certify", "P001", "--standard", "gost"]).unwrap();
        run(dir.path(), &["run", "P001"]).unwrap();

        let products: Vec<Product> = store::load(&dir.path().join("products.json")).unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].current_stage_name(), "baking");
        assert_eq!(products[0].certificates.len(), 1);
    }

    #[test]
    fn strict_mode_surfaces_duplicate_certificate() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path(), &["product", "add", "Bread"]).unwrap();
        run(dir.path(), &["improve", "1", "-s", "gost"]).unwrap();
        run(dir.path(), &["certify", "1", "-s", "gost"]).unwrap();
        assert!(run(dir.path(), &["certify", "1", "-s", "gost"]).is_err());
        assert!(run(dir.path(), &["--mode", "lenient", "certify", "1", "-s", "gost"]).is_ok());
    }

    #[test]
    fn standard_accepts_key_or_display_name() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path(), &["product", "add", "Bread"]).unwrap();
        run(dir.path(), &["improve", "1", "-s", "GOST ST-1"]).unwrap();
        run(dir.path(), &["check", "1", "-s", "gost"]).unwrap();
        assert!(run(dir.path(), &["check", "1", "-s", "ISO 22000"]).is_err());

        let products: Vec<Product> = store::load(&dir.path().join("products.json")).unwrap();
        let report = QualityController::default()
            .restore(products)
            .unwrap()
            .check_compliance(ProductId(1), StandardKind::Gost)
            .unwrap();
        assert!(report.compliant);
    }

    #[test]
    fn invalid_product_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("products.json"),
            r#"[{"id":1,"name":"A","status":"production","stage_index":0,
                "attributes":{"defects":"none","texture":"good","smell":"good","taste":"good"}},
               {"id":1,"name":"B","status":"production","stage_index":0,
                "attributes":{"defects":"none","texture":"good","smell":"good","taste":"good"}}]"#,
        )
        .unwrap();
        let err = run(dir.path(), &["product", "list"]).unwrap_err();
        assert!(format!("{err:#}").contains("appears more than once"));
    }

    #[test]
    fn unknown_product_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(run(dir.path(), &["product", "show", "P404"]).is_err());
        assert!(run(dir.path(), &["product", "show", "bread"]).is_err());
    }

    #[test]
    fn pet_commands_use_clinic_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("bakeqc.toml");
        let clinic = dir.path().join("pets.json");
        std::fs::write(&config, format!("clinic_file = {:?}\n", clinic.display().to_string())).unwrap();
        let base = ["bakeqc", "--config", config.to_str().unwrap()];

        let exec = |extra: &[&str]| {
            let cli = Cli::parse_from(base.iter().chain(extra.iter()));
            App::new(&cli).unwrap().run(cli.command)
        };

        exec(&["pet", "add", "Rex", "01.02.2020", "2024-05-06", "Anna", "Ear infection"]).unwrap();
        exec(&["pet", "add", "Murka", "2021-03-03", "2024-05-06", "Petr", "Healthy"]).unwrap();
        assert!(exec(&["pet", "add", "Bad", "2024-01-01", "2023-01-01", "Anna", "x"]).is_err());
        exec(&["pet", "delete", "by-diagnosis", "ear"]).unwrap();

        let pets: Vec<Pet> = store::load(&clinic).unwrap();
        assert_eq!(pets.len(), 1);
        assert_eq!(pets[0].name, "Murka");
        assert!(exec(&["pet", "list", "--page", "5"]).is_err());
    }

    #[test]
    fn demo_runs_to_completion() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path(), &["demo"]).unwrap();
        assert!(!dir.path().join("products.json").exists());
    }
}
