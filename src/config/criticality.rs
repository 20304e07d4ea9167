//! Component criticality table.
//!
//! Maps a component-name fragment to a weight in [0, 1]. The table is an
//! ordered list: when a component matches several fragments by substring, the
//! first entry wins.

use serde::{Deserialize, Serialize};

/// Weight returned for components that match nothing in the table.
pub const DEFAULT_CRITICALITY: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalityEntry {
    pub fragment: String,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalityTable {
    #[serde(default = "default_entries")]
    entries: Vec<CriticalityEntry>,

    #[serde(default = "default_criticality")]
    default_weight: f64,
}

impl Default for CriticalityTable {
    fn default() -> Self {
        Self {
            entries: default_entries(),
            default_weight: DEFAULT_CRITICALITY,
        }
    }
}

impl CriticalityTable {
    /// Build a table from `(fragment, weight)` pairs. Fragments are lowercased
    /// and weights clamped to [0, 1].
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(fragment, weight)| CriticalityEntry {
                    fragment: fragment.into().to_lowercase(),
                    weight: weight.clamp(0.0, 1.0),
                })
                .collect(),
            default_weight: DEFAULT_CRITICALITY,
        }
    }

    pub fn with_default_weight(mut self, weight: f64) -> Self {
        self.default_weight = weight.clamp(0.0, 1.0);
        self
    }

    pub fn entries(&self) -> &[CriticalityEntry] {
        &self.entries
    }

    pub fn default_weight(&self) -> f64 {
        self.default_weight
    }

    /// Exact case-insensitive match, then first substring match, then the
    /// default weight.
    pub fn lookup(&self, component: &str) -> f64 {
        let component = component.to_lowercase();

        self.entries
            .iter()
            .find(|entry| entry.fragment.to_lowercase() == component)
            .or_else(|| {
                self.entries
                    .iter()
                    .find(|entry| component.contains(&entry.fragment.to_lowercase()))
            })
            .map(|entry| entry.weight)
            .unwrap_or(self.default_weight)
    }

    pub fn validate(&self) -> Result<(), String> {
        let invalid = self
            .entries
            .iter()
            .find(|entry| !(0.0..=1.0).contains(&entry.weight));
        if let Some(entry) = invalid {
            return Err(format!(
                "Criticality for '{}' must be between 0.0 and 1.0",
                entry.fragment
            ));
        }
        if !(0.0..=1.0).contains(&self.default_weight) {
            return Err("Default criticality must be between 0.0 and 1.0".to_string());
        }
        Ok(())
    }
}

fn default_criticality() -> f64 {
    DEFAULT_CRITICALITY
}

fn default_entries() -> Vec<CriticalityEntry> {
    [
        ("login", 1.0),
        ("authentication", 1.0),
        ("auth", 1.0),
        ("checkout", 0.95),
        ("payment", 0.95),
        ("cart", 0.9),
        ("profile", 0.7),
        ("dashboard", 0.6),
        ("settings", 0.5),
        ("search", 0.7),
        ("navigation", 0.5),
        ("footer", 0.2),
        ("header", 0.4),
        ("sidebar", 0.4),
        ("homepage", 0.3),
    ]
    .into_iter()
    .map(|(fragment, weight)| CriticalityEntry {
        fragment: fragment.to_string(),
        weight,
    })
    .collect()
}
