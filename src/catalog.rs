//! Role Catalog — the static mapping of role name → profile, loaded once at
//! startup. The core never mutates it; iteration order is significant (it is
//! the tie-break order for category detection).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Embedded catalog data, shared across all deployments.
const ROLES_JSON: &str = include_str!("../data/roles.json");

/// A single role profile: expected skills, salary band, experience band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
    pub category: String,
    pub skills: Vec<String>,
    pub salary_range: String,
    pub experience: String,
}

/// Order-preserving collection of role profiles.
#[derive(Debug, Clone)]
pub struct Catalog {
    roles: Vec<Role>,
}

impl Catalog {
    /// Parses the embedded role catalog. Called once at startup.
    pub fn builtin() -> Result<Self> {
        let roles: Vec<Role> =
            serde_json::from_str(ROLES_JSON).context("Embedded role catalog is invalid JSON")?;
        Ok(Catalog { roles })
    }

    pub fn get(&self, name: &str) -> Option<&Role> {
        self.roles.iter().find(|r| r.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Role> {
        self.roles.iter()
    }

    /// Distinct category names, sorted alphabetically.
    pub fn categories(&self) -> Vec<String> {
        let mut cats: Vec<String> = self.roles.iter().map(|r| r.category.clone()).collect();
        cats.sort();
        cats.dedup();
        cats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_parses() {
        let catalog = Catalog::builtin().unwrap();
        assert!(catalog.iter().count() > 30);
    }

    #[test]
    fn test_get_known_role() {
        let catalog = Catalog::builtin().unwrap();
        let role = catalog.get("Frontend Developer").unwrap();
        assert_eq!(role.category, "IT & Software");
        assert!(role.skills.iter().any(|s| s == "React"));
    }

    #[test]
    fn test_get_unknown_role_is_none() {
        let catalog = Catalog::builtin().unwrap();
        assert!(catalog.get("Wizard").is_none());
    }

    #[test]
    fn test_categories_sorted_and_deduped() {
        let catalog = Catalog::builtin().unwrap();
        let cats = catalog.categories();
        let mut sorted = cats.clone();
        sorted.sort();
        assert_eq!(cats, sorted);
        let before = cats.len();
        let mut deduped = cats.clone();
        deduped.dedup();
        assert_eq!(before, deduped.len());
        assert!(cats.contains(&"IT & Software".to_string()));
    }
}
