//! Catalog records
//!
//! An [`AppRecord`] is one entry of the API directory. Records are immutable
//! once fetched and shared read-only between the session and the UI.

use crate::error::{AppxError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Identifier of a catalog entry. The backend sends either numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AppId {
    Number(i64),
    Text(String),
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppId::Number(n) => write!(f, "{}", n),
            AppId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for AppId {
    fn from(n: i64) -> Self {
        AppId::Number(n)
    }
}

impl From<&str> for AppId {
    fn from(s: &str) -> Self {
        AppId::Text(s.to_string())
    }
}

/// One catalog entry: an app name and its API endpoint URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppRecord {
    pub id: AppId,
    pub name: String,
    pub api: String,
}

impl AppRecord {
    pub fn new(id: impl Into<AppId>, name: impl Into<String>, api: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            api: api.into(),
        }
    }
}

/// Load a catalog from a JSON file holding `[{id, name, api}, ...]`
pub fn load_catalog(path: &Path) -> Result<Vec<AppRecord>> {
    let shown = path.display().to_string();
    let raw = std::fs::read_to_string(path)
        .map_err(|e| AppxError::CatalogFile(shown.clone(), e.to_string()))?;
    let records: Vec<AppRecord> = serde_json::from_str(&raw)
        .map_err(|e| AppxError::CatalogFile(shown.clone(), e.to_string()))?;
    tracing::info!(path = %shown, count = records.len(), "loaded catalog");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn id_accepts_numbers_and_strings() {
        let raw = r#"[
            {"id": 7, "name": "Weather", "api": "https://weather.example/api"},
            {"id": "a-1", "name": "Academy App", "api": "https://academy.example/v1"}
        ]"#;
        let records: Vec<AppRecord> = serde_json::from_str(raw).unwrap();
        assert_eq!(records[0].id, AppId::Number(7));
        assert_eq!(records[1].id, AppId::Text("a-1".to_string()));
        assert_eq!(records[1].id.to_string(), "a-1");
    }

    #[test]
    fn load_catalog_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": 1, "name": "Agriculture API", "api": "https://agri.example"}}]"#
        )
        .unwrap();

        let records = load_catalog(file.path()).unwrap();
        assert_eq!(records, vec![AppRecord::new(1, "Agriculture API", "https://agri.example")]);
    }

    #[test]
    fn load_catalog_reports_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = load_catalog(file.path()).unwrap_err();
        assert!(matches!(err, AppxError::CatalogFile(_, _)));
    }
}
