//! Systematic-name → gene-name dictionary.
//!
//! Loaded from an SGD-style features table: tab-separated, column 4 holds the
//! systematic name (e.g. `YFL039C`) and column 5 the standard gene name
//! (e.g. `ACT1`). Lookups are case-insensitive on the systematic name.
//!
//! The dictionary is reference data: a missing or unreadable file yields an
//! empty mapping, never an error. A process-wide instance is available through
//! [`init_global`] / [`global`]; the first initialization wins.

use std::collections::HashMap;
use std::path::Path;

use once_cell::sync::OnceCell;

const SYSTEMATIC_COLUMN: usize = 3;
const GENE_COLUMN: usize = 4;

static GLOBAL: OnceCell<GeneDictionary> = OnceCell::new();

/// Immutable systematic → gene lookup table.
#[derive(Clone, Debug, Default)]
pub struct GeneDictionary {
    map: HashMap<String, String>,
}

impl GeneDictionary {
    /// A dictionary with no entries. Every lookup falls through.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse the content of a features table.
    ///
    /// Rows with fewer than five columns or an empty systematic name are
    /// skipped, as are header rows. A missing gene name falls back to the
    /// systematic name.
    pub fn parse(content: &str) -> Self {
        let mut map = HashMap::new();

        for line in content.lines() {
            if line.is_empty() {
                continue;
            }
            let parts: Vec<&str> = line.split('\t').collect();
            if parts.len() <= GENE_COLUMN {
                continue;
            }
            let sys_name = parts[SYSTEMATIC_COLUMN].trim();
            let gene_name = parts[GENE_COLUMN].trim();
            if sys_name.is_empty() {
                continue;
            }
            let lowered = sys_name.to_lowercase();
            if lowered == "systematic name" || lowered == "systematic_name" {
                continue;
            }
            let gene_name = if gene_name.is_empty() {
                sys_name
            } else {
                gene_name
            };
            map.insert(sys_name.to_uppercase(), gene_name.to_string());
        }

        Self { map }
    }

    /// Load a features table from disk.
    ///
    /// Returns an empty dictionary if the file doesn't exist or can't be read.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!("Gene dictionary not found at {}", path.display());
            return Self::empty();
        }
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let dict = Self::parse(&content);
                tracing::debug!(
                    "Loaded {} gene names from {}",
                    dict.len(),
                    path.display()
                );
                dict
            }
            Err(e) => {
                tracing::warn!("Failed to read gene dictionary {}: {}", path.display(), e);
                Self::empty()
            }
        }
    }

    /// Look up the gene name for a systematic name.
    pub fn lookup(&self, systematic: &str) -> Option<&str> {
        self.map.get(&systematic.to_uppercase()).map(String::as_str)
    }

    /// Map a token to its gene name, or return it unchanged.
    pub fn map_token<'a>(&'a self, token: &'a str) -> &'a str {
        self.lookup(token).unwrap_or(token)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Initialize the process-wide dictionary from `path`.
///
/// Only the first call reads the file; later calls return the cached
/// instance regardless of the path they pass.
pub fn init_global(path: &Path) -> &'static GeneDictionary {
    GLOBAL.get_or_init(|| GeneDictionary::load(path))
}

/// The process-wide dictionary, or an empty one if it was never initialized.
pub fn global() -> &'static GeneDictionary {
    GLOBAL.get_or_init(GeneDictionary::empty)
}
