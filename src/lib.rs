//! Bakery quality control.
//!
//! Products walk through four production stages (dough, baking, cooling,
//! packaging). Each stage must be certified against one of the fixed quality
//! standards before the product may advance. The [`quality`] module holds the
//! domain and its [`QualityController`](quality::QualityController); the
//! [`clinic`] module holds the veterinary record registry; [`store`] persists
//! either as JSON.

pub mod app;
pub mod cli;
pub mod clinic;
pub mod config;
pub mod error;
pub mod quality;
pub mod store;
pub mod ui;

pub use error::{BakeryError, Result};
