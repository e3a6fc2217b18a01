//! # Source Weights
//!
//! Maps news outlets to a reputation multiplier used by the impact score.
//!
//! - Loads from JSON config (`default_weight`, `weights`, `aliases`).
//! - Case-insensitive lookup; whitespace is collapsed before matching.
//! - Aliases map alternative spellings (domains, short names) to a canonical outlet.
//! - Lookup order: alias → exact match → default.
//! - Built-in `default_seed()`: the reputable Indonesian outlets and
//!   regulators weigh 1.2, everything else 1.0.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{collections::HashMap, fs, path::Path};

pub const REPUTABLE_WEIGHT: f64 = 1.2;

/// Configuration for source weights, loaded from JSON or defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceWeights {
    /// Weight if no match is found.
    #[serde(default = "default_default_weight")]
    pub default_weight: f64,
    /// Explicit weights for canonical outlet names.
    #[serde(default)]
    pub weights: HashMap<String, f64>,
    /// Aliases mapping non-canonical names → canonical names.
    #[serde(default)]
    pub aliases: HashMap<String, String>,
}

fn default_default_weight() -> f64 {
    1.0
}

impl Default for SourceWeights {
    fn default() -> Self {
        Self::default_seed()
    }
}

impl SourceWeights {
    /// Load configuration from a JSON file. Keys are normalized on load.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let s = fs::read_to_string(path)
            .with_context(|| format!("reading source weights from {}", path.display()))?;
        let raw: Self = serde_json::from_str(&s)
            .with_context(|| format!("parsing source weights {}", path.display()))?;
        Ok(raw.normalized())
    }

    fn normalized(self) -> Self {
        Self {
            default_weight: self.default_weight,
            weights: self
                .weights
                .into_iter()
                .map(|(k, v)| (normalize(&k), v))
                .collect(),
            aliases: self
                .aliases
                .into_iter()
                .map(|(k, v)| (normalize(&k), normalize(&v)))
                .collect(),
        }
    }

    /// Weight for an outlet; `None` (unknown source) gets the default.
    pub fn weight_for(&self, source: Option<&str>) -> f64 {
        let Some(source) = source else {
            return self.default_weight;
        };
        let s = normalize(source);

        // 1) Alias resolution.
        if let Some(canon) = self.aliases.get(&s) {
            if let Some(&w) = self.weights.get(canon) {
                return w;
            }
        }

        // 2) Exact match.
        if let Some(&w) = self.weights.get(&s) {
            return w;
        }

        // 3) Default.
        self.default_weight
    }

    /// Built-in seed of reputable outlets.
    pub fn default_seed() -> Self {
        let mut weights = HashMap::new();
        for k in [
            "Kompas",
            "Tempo",
            "CNBC Indonesia",
            "Detik",
            "CNN Indonesia",
            "Kontan",
            "Bisnis",
            "IDX",
            "SindoNews",
            "Viva",
            "BPOM",
            "MOH",
        ] {
            weights.insert(normalize(k), REPUTABLE_WEIGHT);
        }

        Self {
            default_weight: 1.0,
            weights,
            aliases: HashMap::new(),
        }
    }
}

/// Lowercase, trim, collapse inner whitespace.
fn normalize(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> SourceWeights {
        SourceWeights::default_seed()
    }

    #[test]
    fn exact_match() {
        assert!((cfg().weight_for(Some("Kompas")) - 1.2).abs() < 1e-9);
    }

    #[test]
    fn case_insensitive_lookup() {
        let c = cfg();
        let a = c.weight_for(Some("KOMPAS"));
        let b = c.weight_for(Some("kompas"));
        let c2 = c.weight_for(Some("  cnbc   indonesia "));
        assert!((a - 1.2).abs() < 1e-9 && (b - 1.2).abs() < 1e-9 && (c2 - 1.2).abs() < 1e-9);
    }

    #[test]
    fn no_substring_fallback() {
        assert!((cfg().weight_for(Some("Kompas TV Regional")) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn default_weight_used() {
        let c = cfg();
        assert!((c.weight_for(Some("TotallyUnknown")) - 1.0).abs() < 1e-9);
        assert!((c.weight_for(None) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn loads_aliases_from_json() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("source_weights.json");
        fs::write(
            &p,
            r#"{"default_weight": 0.9,
                "weights": {"Kompas": 1.5},
                "aliases": {"kompas.com": "KOMPAS"}}"#,
        )
        .unwrap();
        let c = SourceWeights::load_from_file(&p).unwrap();
        assert!((c.weight_for(Some("Kompas.com")) - 1.5).abs() < 1e-9);
        assert!((c.weight_for(Some("Tempo")) - 0.9).abs() < 1e-9);
    }
}
