use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading lookup tables
#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to read lookup tables: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse lookup tables: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Static lookup tables for the filter resolver
///
/// Loaded once at startup and shared read-only. City keys are matched
/// case-insensitively; source labels are matched exactly after trimming.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LookupTables {
    /// City -> the geo filter terms for that city (the city itself included)
    #[serde(default)]
    pub geo: HashMap<String, Vec<String>>,
    /// Source preference label -> allowed domains
    #[serde(default)]
    pub sources: HashMap<String, Vec<String>>,
}

impl LookupTables {
    /// Built-in tables used when no file is configured
    pub fn builtin() -> Self {
        let geo: [(&str, &[&str]); 8] = [
            ("Ahmedabad", &["Ahmedabad", "Gujarat", "Gandhinagar"]),
            ("Mumbai", &["Mumbai", "Maharashtra", "Thane", "Navi Mumbai"]),
            ("Delhi", &["Delhi", "NCR", "Gurugram", "Noida"]),
            ("Bangalore", &["Bangalore", "Bengaluru", "Karnataka"]),
            ("Pune", &["Pune", "Maharashtra", "Pimpri-Chinchwad"]),
            ("Chennai", &["Chennai", "Tamil Nadu"]),
            ("Hyderabad", &["Hyderabad", "Telangana", "Secunderabad"]),
            ("Kolkata", &["Kolkata", "West Bengal", "Howrah"]),
        ];
        let sources: [(&str, &[&str]); 6] = [
            ("Mainstream Media", &["timesofindia.indiatimes.com", "hindustantimes.com", "ndtv.com"]),
            ("Business", &["economictimes.indiatimes.com", "livemint.com", "business-standard.com"]),
            ("Technology", &["techcrunch.com", "theverge.com", "wired.com"]),
            ("International", &["bbc.com", "reuters.com", "aljazeera.com"]),
            ("Independent", &["thewire.in", "scroll.in", "theprint.in"]),
            ("Regional", &["divyabhaskar.co.in", "lokmat.com", "deshgujarat.com"]),
        ];

        Self {
            geo: to_table(&geo),
            sources: to_table(&sources),
        }
    }

    /// Load tables from a TOML file with `[geo]` and `[sources]` sections
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, TableError> {
        Ok(toml::from_str(raw)?)
    }

    /// Geo terms for a city, if the city is known
    pub fn regions_for(&self, city: &str) -> Option<&[String]> {
        let city = city.trim();
        self.geo
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(city))
            .map(|(_, regions)| regions.as_slice())
    }

    /// Domains for a source preference label (empty when unknown)
    pub fn domains_for(&self, label: &str) -> &[String] {
        self.sources.get(label.trim()).map(Vec::as_slice).unwrap_or(&[])
    }
}

fn to_table(rows: &[(&str, &[&str])]) -> HashMap<String, Vec<String>> {
    rows.iter()
        .map(|(key, values)| (key.to_string(), values.iter().map(|v| v.to_string()).collect()))
        .collect()
}
