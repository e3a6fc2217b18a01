//! # Keyword classifier
//!
//! Decides whether a tag is worth ranking. Two-tier policy:
//! - **allowlist** tokens match as *substrings* of the normalized tag and
//!   accept it unconditionally (regulatory/product terms are never dropped);
//! - otherwise short tags (< 3 chars), pure numbers and exact **stopwords**
//!   are rejected.
//!
//! The word lists are bilingual (Indonesian + English) and live in a
//! [`KeywordVocabulary`] value so they can be swapped or extended from a
//! TOML/JSON file without touching the ranking code.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::tags::normalize_keyword;

const SEED_STOPWORDS: &[&str] = &[
    "industri", "farmasi", "industri farmasi", "perusahaan", "pasar", "produk",
    "pemerintah", "indonesia", "nasional", "tahun", "harga", "kesehatan",
    "obat", "obatan", "pharma", "pharmaceutical", "industry", "market",
    "company", "companies", "produk obat", "obat generik", "obat baru",
    "pertumbuhan", "penjualan", "laba", "rugi", "saham", "investasi",
    "regulasi", "kebijakan", "kementerian", "otoritas", "program", "peluang",
    "riset", "penelitian", "kinerja", "target", "realisasi", "permintaan",
    "bpom", "kemenkes", "kementerian kesehatan", "kementerian kesehatan ri",
    "kementerian kesehatan republik indonesia", "bpjs", "bpjs kesehatan", "jkn",
    "asuransi", "asuransi kesehatan", "jaminan kesehatan", "izin edar",
    "gmp", "kosmetik", "cosmetic", "cosmetics", "traditional medicine",
    "kerjasama", "kolaborasi", "kerja sama", "kerja-sama",
    "ekspor", "impor", "bisnis", "investasi farmasi",
];

const SEED_ALLOWLIST: &[&str] = &[
    "izin edar", "izin", "registrasi", "registration", "approval", "approved",
    "authorization", "clearance", "tracking", "follow up",
    "new drug", "new medicine", "novel drug", "vaksin", "vaccine",
    "biosimilar", "biologic", "api", "bahan baku",
    "clinical", "clinical trial", "phase i", "phase ii", "phase iii",
    "produk", "product", "brand", "trade name",
];

/// Allowlist/stopword tables used by [`KeywordVocabulary::is_meaningful`].
#[derive(Debug, Clone)]
pub struct KeywordVocabulary {
    allowlist: Vec<String>,
    stopwords: HashSet<String>,
}

/// On-disk shape of a vocabulary file.
#[derive(Debug, Clone, Deserialize)]
struct VocabularyFile {
    #[serde(default)]
    allowlist: Vec<String>,
    #[serde(default)]
    stopwords: Vec<String>,
    /// `true` (default) adds to the built-in seed, `false` replaces it.
    #[serde(default = "default_extend")]
    extend: bool,
}

fn default_extend() -> bool {
    true
}

impl Default for KeywordVocabulary {
    fn default() -> Self {
        Self::default_seed()
    }
}

impl KeywordVocabulary {
    /// Build from explicit lists. Entries are stored in normalized form.
    pub fn new<A, S>(allowlist: A, stopwords: S) -> Self
    where
        A: IntoIterator,
        A::Item: AsRef<str>,
        S: IntoIterator,
        S::Item: AsRef<str>,
    {
        let mut allow: Vec<String> = Vec::new();
        for a in allowlist {
            let n = normalize_keyword(a.as_ref());
            if !n.is_empty() && !allow.contains(&n) {
                allow.push(n);
            }
        }
        let stop = stopwords
            .into_iter()
            .map(|s| normalize_keyword(s.as_ref()))
            .filter(|s| !s.is_empty())
            .collect();
        Self {
            allowlist: allow,
            stopwords: stop,
        }
    }

    /// Built-in pharma vocabulary.
    pub fn default_seed() -> Self {
        Self::new(SEED_ALLOWLIST.iter(), SEED_STOPWORDS.iter())
    }

    /// Load a vocabulary file (TOML or JSON, by extension; unknown extensions try both).
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading keyword vocabulary from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let file = parse_vocabulary(&content, &ext)
            .with_context(|| format!("parsing keyword vocabulary {}", path.display()))?;
        Ok(Self::from_file(file))
    }

    fn from_file(file: VocabularyFile) -> Self {
        if !file.extend {
            return Self::new(file.allowlist, file.stopwords);
        }
        let mut allow: Vec<String> = SEED_ALLOWLIST.iter().map(|s| s.to_string()).collect();
        allow.extend(file.allowlist);
        let mut stop: Vec<String> = SEED_STOPWORDS.iter().map(|s| s.to_string()).collect();
        stop.extend(file.stopwords);
        Self::new(allow, stop)
    }

    /// True if the tag should take part in ranking and mention extraction.
    pub fn is_meaningful(&self, tag: &str) -> bool {
        let normalized = normalize_keyword(tag);
        if normalized.is_empty() {
            return false;
        }
        if self.is_allowlisted(&normalized) {
            return true;
        }
        if normalized.chars().count() < 3 {
            return false;
        }
        if normalized.chars().all(|c| c.is_ascii_digit()) {
            return false;
        }
        !self.stopwords.contains(&normalized)
    }

    /// Substring match against the allowlist (expects a normalized tag).
    pub fn is_allowlisted(&self, normalized: &str) -> bool {
        self.allowlist.iter().any(|t| normalized.contains(t.as_str()))
    }

    pub fn allowlist(&self) -> &[String] {
        &self.allowlist
    }

    pub fn stopword_count(&self) -> usize {
        self.stopwords.len()
    }
}

fn parse_vocabulary(s: &str, hint_ext: &str) -> Result<VocabularyFile> {
    match hint_ext {
        "toml" => Ok(toml::from_str(s)?),
        "json" => Ok(serde_json::from_str(s)?),
        _ => {
            if let Ok(v) = toml::from_str::<VocabularyFile>(s) {
                return Ok(v);
            }
            serde_json::from_str(s).map_err(|_| anyhow!("unsupported vocabulary format"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> KeywordVocabulary {
        KeywordVocabulary::default_seed()
    }

    #[test]
    fn stopwords_are_rejected() {
        let v = vocab();
        assert!(!v.is_meaningful("Industri"));
        assert!(!v.is_meaningful("pasar"));
        assert!(!v.is_meaningful("Obat"));
        assert!(!v.is_meaningful("Kementerian Kesehatan RI"));
    }

    #[test]
    fn allowlist_overrides_every_rejection() {
        let v = vocab();
        assert!(v.is_meaningful("vaksin"));
        assert!(v.is_meaningful("Clinical Trial"));
        // stopword that contains an allowlisted token
        assert!(v.is_meaningful("izin edar"));
        assert!(v.is_meaningful("produk"));
        // short tag saved by the allowlist
        assert!(v.is_meaningful("API"));
        // substring, not whole word
        assert!(v.is_meaningful("terapi gen"));
    }

    #[test]
    fn short_numeric_and_blank_rejected() {
        let v = vocab();
        assert!(!v.is_meaningful("  "));
        assert!(!v.is_meaningful("--"));
        assert!(!v.is_meaningful("ab"));
        assert!(!v.is_meaningful("2024"));
        assert!(v.is_meaningful("Kalbe Farma"));
        assert!(v.is_meaningful("covid 19"));
    }

    #[test]
    fn custom_tables_are_injected() {
        let v = KeywordVocabulary::new(["sirup"], ["kalbe"]);
        assert!(!v.is_meaningful("Kalbe"));
        assert!(v.is_meaningful("sirup obat"));
        assert!(v.is_meaningful("obat"));
    }

    #[test]
    fn loads_toml_and_json_files() {
        let dir = tempfile::tempdir().unwrap();

        let toml_p = dir.path().join("vocab.toml");
        fs::write(&toml_p, "stopwords = [\"Kalbe\"]\nallowlist = [\"sirup\"]\n").unwrap();
        let v = KeywordVocabulary::load_from_file(&toml_p).unwrap();
        assert!(!v.is_meaningful("kalbe"));
        assert!(v.is_meaningful("vaksin"), "seed kept when extending");

        let json_p = dir.path().join("vocab.json");
        fs::write(&json_p, r#"{"allowlist": [], "stopwords": ["x1"], "extend": false}"#).unwrap();
        let v = KeywordVocabulary::load_from_file(&json_p).unwrap();
        assert!(v.allowlist().is_empty());
        assert!(v.is_meaningful("pasar"), "seed dropped when replacing");
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = KeywordVocabulary::load_from_file("/definitely/not/here.toml").unwrap_err();
        assert!(format!("{err:#}").contains("keyword vocabulary"));
    }
}
