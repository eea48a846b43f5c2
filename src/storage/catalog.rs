//! Catalog repository
//!
//! Loads the catalog from catalog.json, or from a YAML file when one is
//! given explicitly, and saves it back as JSON.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::BudgetError;
use crate::models::Catalog;

use super::file_io::{read_json_required, read_yaml_required, write_json_atomic, write_yaml_atomic};
use super::init::default_catalog;

/// Repository for catalog persistence
pub struct CatalogRepository {
    path: PathBuf,
}

impl CatalogRepository {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the catalog, falling back to the built-in one if none is saved
    pub fn load(&self) -> Result<Catalog, BudgetError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no saved catalog, using defaults");
            return Ok(default_catalog());
        }
        load_catalog_file(&self.path)
    }

    /// Validate and save the catalog
    pub fn save(&self, catalog: &Catalog) -> Result<(), BudgetError> {
        catalog
            .validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;
        write_json_atomic(&self.path, catalog)
    }

    /// Replace the saved catalog with one read from another file
    pub fn import(&self, source: &Path) -> Result<Catalog, BudgetError> {
        let catalog = load_catalog_file(source)?;
        self.save(&catalog)?;
        Ok(catalog)
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// Read and validate a catalog file; YAML is chosen by extension
pub fn load_catalog_file(path: &Path) -> Result<Catalog, BudgetError> {
    let catalog: Catalog = if is_yaml(path) {
        read_yaml_required(path)?
    } else {
        read_json_required(path)?
    };
    catalog
        .validate()
        .map_err(|e| BudgetError::Validation(format!("{}: {}", path.display(), e)))?;
    Ok(catalog)
}

/// Write a catalog as YAML, for hand editing
pub fn write_catalog_yaml(path: &Path, catalog: &Catalog) -> Result<(), BudgetError> {
    write_yaml_atomic(path, catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Department;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_loads_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let repo = CatalogRepository::new(temp_dir.path().join("catalog.json"));

        let catalog = repo.load().unwrap();
        assert_eq!(catalog, default_catalog());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let repo = CatalogRepository::new(temp_dir.path().join("catalog.json"));

        let mut catalog = default_catalog();
        catalog.companies.push("Initech".into());
        repo.save(&catalog).unwrap();

        assert_eq!(repo.load().unwrap(), catalog);
    }

    #[test]
    fn test_yaml_import() {
        let temp_dir = TempDir::new().unwrap();
        let yaml_path = temp_dir.path().join("catalog.yaml");
        write_catalog_yaml(&yaml_path, &default_catalog()).unwrap();

        let repo = CatalogRepository::new(temp_dir.path().join("catalog.json"));
        let imported = repo.import(&yaml_path).unwrap();
        assert_eq!(imported.services(Department::Legal).len(), 4);
        assert!(repo.path().exists());
        assert_eq!(repo.load().unwrap(), imported);
    }

    #[test]
    fn test_invalid_catalog_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let repo = CatalogRepository::new(temp_dir.path().join("catalog.json"));

        let mut catalog = default_catalog();
        let duplicate = catalog.services(Department::It)[0].clone();
        catalog
            .services
            .entry(Department::It)
            .or_default()
            .push(duplicate);

        assert!(repo.save(&catalog).unwrap_err().is_validation());
        assert!(!repo.path().exists());
    }
}
