//! State and LGA reference data
//!
//! The intake form offers states from a fixed list and LGAs dependent on the
//! chosen state. The mapping ships embedded; deployments may point
//! `reference_data` at a replacement JSON file of the same shape.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::{Error, Result};

const EMBEDDED_REFERENCE: &str = include_str!("../data/nigeria.json");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateEntry {
    pub name: String,
    pub lgas: Vec<String>,
}

/// Fixed state → LGA mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceData {
    pub states: Vec<StateEntry>,
}

impl ReferenceData {
    /// Mapping compiled into the binary
    pub fn embedded() -> Result<Self> {
        Self::from_json(EMBEDDED_REFERENCE)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let data: ReferenceData = serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("Invalid reference data: {}", e)))?;
        if data.states.is_empty() {
            return Err(Error::Config("Reference data lists no states".to_string()));
        }
        Ok(data)
    }

    /// Load from `path`, or the embedded mapping when no path is configured
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|e| {
                    Error::Config(format!(
                        "Failed to read reference data {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                let data = Self::from_json(&json)?;
                info!(
                    "Loaded reference data from {} ({} states)",
                    path.display(),
                    data.states.len()
                );
                Ok(data)
            }
            None => Self::embedded(),
        }
    }

    pub fn state_names(&self) -> impl Iterator<Item = &str> {
        self.states.iter().map(|s| s.name.as_str())
    }

    pub fn has_state(&self, state: &str) -> bool {
        self.states.iter().any(|s| s.name == state)
    }

    /// LGAs for `state`; empty when the state is unknown
    pub fn lgas_for(&self, state: &str) -> &[String] {
        self.states
            .iter()
            .find(|s| s.name == state)
            .map(|s| s.lgas.as_slice())
            .unwrap_or(&[])
    }

    pub fn lga_in_state(&self, state: &str, lga: &str) -> bool {
        self.lgas_for(state).iter().any(|l| l == lga)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_reference_loads() {
        let data = ReferenceData::embedded().unwrap();
        assert!(data.has_state("Osun"));
        assert_eq!(data.lgas_for("Osun").len(), 30);
        assert!(data.lga_in_state("Osun", "Osogbo"));
        assert!(!data.lga_in_state("Lagos", "Osogbo"));
    }

    #[test]
    fn test_unknown_state_has_no_lgas() {
        let data = ReferenceData::embedded().unwrap();
        assert!(data.lgas_for("Atlantis").is_empty());
    }

    #[test]
    fn test_empty_reference_rejected() {
        let result = ReferenceData::from_json(r#"{"states":[]}"#);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("states.json");
        std::fs::write(&path, r#"{"states":[{"name":"Kwara","lgas":["Ilorin West"]}]}"#).unwrap();

        let data = ReferenceData::load(Some(&path)).unwrap();
        assert_eq!(data.state_names().collect::<Vec<_>>(), vec!["Kwara"]);
        assert!(data.lga_in_state("Kwara", "Ilorin West"));
    }
}
