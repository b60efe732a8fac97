//! Read-only property directory. Properties are owned and mutated by an
//! external admin system; this service only needs their metadata, so the
//! store is loaded once at startup from a JSON file and carried in
//! `AppState` — an explicit store, not a process-wide singleton.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub is_admin_owned: bool,
    #[serde(default)]
    pub owner: Option<String>,
}

#[derive(Debug, Default)]
pub struct PropertyStore {
    by_id: HashMap<i64, Property>,
}

#[derive(Debug, thiserror::Error)]
pub enum PropertyStoreError {
    #[error("cannot read properties file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("cannot parse properties file {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

impl PropertyStore {
    pub fn from_properties(properties: Vec<Property>) -> Self {
        let by_id = properties
            .into_iter()
            .map(|property| (property.id, property))
            .collect();
        Self { by_id }
    }

    /// Load the directory from a JSON array of properties.
    pub fn from_file(path: &Path) -> Result<Self, PropertyStoreError> {
        let raw = std::fs::read_to_string(path).map_err(|source| PropertyStoreError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let properties: Vec<Property> =
            serde_json::from_str(&raw).map_err(|source| PropertyStoreError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        Ok(Self::from_properties(properties))
    }

    pub fn get(&self, id: i64) -> Option<&Property> {
        self.by_id.get(&id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looks_up_properties_by_id() {
        let store = PropertyStore::from_properties(vec![
            Property {
                id: 7,
                name: "Casa Azul".to_string(),
                is_admin_owned: false,
                owner: Some("owner-7".to_string()),
            },
            Property {
                id: 9,
                name: "Loft Ribeira".to_string(),
                is_admin_owned: true,
                owner: None,
            },
        ]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(7).map(|p| p.name.as_str()), Some("Casa Azul"));
        assert!(store.get(9).is_some_and(|p| p.is_admin_owned));
        assert!(store.get(1).is_none());
    }

    #[test]
    fn deserializes_with_defaults() {
        let raw = r#"[{"id": 3, "name": "Vista Alegre"}]"#;
        let properties: Vec<Property> = serde_json::from_str(raw).unwrap();
        let store = PropertyStore::from_properties(properties);
        let property = store.get(3).unwrap();
        assert!(!property.is_admin_owned);
        assert!(property.owner.is_none());
    }
}
