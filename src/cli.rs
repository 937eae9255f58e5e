//! Command line interface built on clap.
//!
//! Defines [`Cli`] with its [`Command`] tree and the global flags
//! (--config, --data, --mode, --verbose).

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::quality::ComplianceMode;

/// bakeqc: bakery quality control and clinic records.
#[derive(Debug, Parser)]
#[command(name = "bakeqc", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (defaults to ./bakeqc.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Product store file, overriding the configuration.
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Compliance mode for this session.
    #[arg(long, global = true)]
    pub mode: Option<ModeArg>,

    /// Enable debug logging.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    /// Rejections are reported as errors.
    Strict,
    /// Rejections are reported as a negative answer.
    Lenient,
}

impl From<ModeArg> for ComplianceMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Strict => ComplianceMode::Strict,
            ModeArg::Lenient => ComplianceMode::Lenient,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage products.
    #[command(subcommand)]
    Product(ProductCommand),

    /// Check a product against a standard.
    Check {
        id: String,
        /// Standard key (gost, bakery-enterprise, organic) or display name.
        #[arg(long, short)]
        standard: String,
    },

    /// Run the current stage's check and log the verdict.
    Inspect { id: String },

    /// Raise a product's attributes to what a standard requires.
    Improve {
        id: String,
        /// Standard key (gost, bakery-enterprise, organic) or display name.
        #[arg(long, short)]
        standard: String,
    },

    /// Certify the current stage against a standard.
    Certify {
        id: String,
        /// Standard key (gost, bakery-enterprise, organic) or display name.
        #[arg(long, short)]
        standard: String,
    },

    /// Advance to the next stage if the current one is certified.
    Advance { id: String },

    /// Run one production step.
    Run { id: String },

    /// Manage reviews.
    #[command(subcommand)]
    Review(ReviewCommand),

    /// Manage clinic pet records.
    #[command(subcommand)]
    Pet(PetCommand),

    /// Walk a sample product through every stage in memory.
    Demo,
}

#[derive(Debug, Subcommand)]
pub enum ProductCommand {
    /// Register a new product.
    Add { name: String },
    /// List products with their current stage.
    List,
    /// Show one product in detail.
    Show { id: String },
    /// Set one quality attribute.
    Set {
        id: String,
        attribute: String,
        level: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum ReviewCommand {
    /// Attach a review to a product.
    Add {
        id: String,
        #[arg(long)]
        author: String,
        #[arg(long, default_value = "")]
        comment: String,
        #[arg(long, allow_negative_numbers = true)]
        rating: i64,
    },
    /// Average the ratings and list recommendations.
    Analyze { id: String },
}

#[derive(Debug, Subcommand)]
pub enum PetCommand {
    /// Add a pet record. Dates take DD.MM.YYYY or YYYY-MM-DD.
    Add {
        name: String,
        birth_date: String,
        last_visit: String,
        vet_name: String,
        diagnosis: String,
    },
    /// Show one page of records.
    List {
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long)]
        page_size: Option<usize>,
    },
    /// Find records.
    #[command(subcommand)]
    Search(PetQueryArgs),
    /// Delete matching records.
    #[command(subcommand)]
    Delete(PetQueryArgs),
}

#[derive(Debug, Subcommand)]
pub enum PetQueryArgs {
    /// By pet name and birth date.
    ByName { name: String, birth_date: String },
    /// By last visit date and vet name.
    ByVisit { last_visit: String, vet_name: String },
    /// By a phrase from the diagnosis.
    ByDiagnosis { phrase: String },
}
