//! JSON file persistence for record lists.
//!
//! A store file holds one JSON array. Saving rewrites the whole file; a file
//! that does not exist yet loads as an empty list.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

pub fn load<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        debug!(path = %path.display(), "store file missing, starting empty");
        return Ok(Vec::new());
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    if contents.trim().is_empty() {
        return Ok(Vec::new());
    }
    let records: Vec<T> = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    debug!(path = %path.display(), count = records.len(), "records loaded");
    Ok(records)
}

pub fn save<T: Serialize>(records: &[T], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(records).context("failed to serialize records")?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    debug!(path = %path.display(), count = records.len(), "records saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::{ComplianceMode, Product, ProductId, QualityController, StandardKind};

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let records: Vec<Product> = load(&dir.path().join("absent.json")).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn products_survive_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("products.json");

        let mut qc = QualityController::new(ComplianceMode::Strict);
        let id = qc.add_product("Bread").unwrap().id;
        qc.improve_product(id, StandardKind::Gost).unwrap();
        qc.certify_product(id, StandardKind::Gost).unwrap();
        assert!(qc.add_review(id, "Ivan", "Good bread", 5));
        save(qc.products(), &path).unwrap();

        let loaded: Vec<Product> = load(&path).unwrap();
        let restored = QualityController::new(ComplianceMode::Strict).restore(loaded).unwrap();
        let product = restored.get_product(ProductId(1)).unwrap();
        assert_eq!(product.name, "Bread");
        assert_eq!(product.certificates.len(), 1);
        assert_eq!(product.reviews.len(), 1);
        assert!(restored.has_certificate_for_current_stage(id));
    }

    #[test]
    fn corrupt_file_is_a_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        let err = load::<Product>(&path).unwrap_err();
        assert!(err.downcast_ref::<serde_json::Error>().is_some());
        assert!(err.to_string().contains("broken.json"));
    }
}
