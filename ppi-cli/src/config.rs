//! PPI configuration loading from `.ppirc.toml`.
//!
//! Configuration is optional; every setting has a default and command-line
//! flags override whatever the file says.
//!
//! # Example Configuration
//!
//! ```toml
//! [data]
//! directory = "data"
//! dictionary = "data/SGD_features.tab"
//!
//! [proteins]
//! default_page_size = 50
//! max_page_size = 500
//!
//! [layout]
//! scale = 1.0
//! iterations = 50
//! padding = 2.0
//! anti_overlap_iterations = 80
//! spread_target_coverage = 0.12
//!
//! [output]
//! format = "table"
//! color = true
//! ```

use std::path::{Path, PathBuf};

use ppi_core::layout::LayoutRequest;
use ppi_core::PageLimits;
use serde::Deserialize;

const CONFIG_FILE: &str = ".ppirc.toml";
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_DICTIONARY: &str = "SGD_features.tab";

/// Root configuration structure loaded from `.ppirc.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct PpiConfig {
    /// Where networks and the gene dictionary live.
    #[serde(default)]
    pub data: DataConfig,

    /// Protein listing page sizes.
    #[serde(default)]
    pub proteins: PageLimits,

    /// Default layout tuning.
    #[serde(default)]
    pub layout: LayoutConfig,

    #[serde(default)]
    pub output: OutputSettings,
}

#[derive(Debug, Deserialize, Default)]
pub struct DataConfig {
    /// Directory holding one sub-directory per network.
    ///
    /// Default: `data`
    #[serde(default)]
    pub directory: Option<String>,

    /// Tab-separated systematic → gene name table.
    ///
    /// Default: `SGD_features.tab` inside the data directory.
    #[serde(default)]
    pub dictionary: Option<String>,
}

/// Layout defaults applied before per-request overrides.
#[derive(Debug, Deserialize, Default)]
pub struct LayoutConfig {
    #[serde(default)]
    pub scale: Option<f64>,
    #[serde(default)]
    pub iterations: Option<usize>,
    #[serde(default)]
    pub padding: Option<f64>,
    #[serde(default)]
    pub anti_overlap_iterations: Option<usize>,
    #[serde(default)]
    pub spread_target_coverage: Option<f64>,
}

impl LayoutConfig {
    /// Fill request knobs that the config sets.
    pub fn apply(&self, request: &mut LayoutRequest) {
        if let Some(scale) = self.scale {
            request.scale = scale;
        }
        if let Some(iterations) = self.iterations {
            request.iterations = iterations;
        }
        if let Some(padding) = self.padding {
            request.padding = padding;
        }
        if let Some(passes) = self.anti_overlap_iterations {
            request.anti_overlap_iterations = passes;
        }
        if let Some(coverage) = self.spread_target_coverage {
            request.spread_target_coverage = coverage;
        }
    }
}

/// `[output]`: default format and color. `--format` wins over `format`.
#[derive(Debug, Deserialize, Default)]
pub struct OutputSettings {
    /// `table` or `json`
    #[serde(default)]
    pub format: Option<String>,

    /// Unset means color only on a terminal.
    #[serde(default)]
    pub color: Option<bool>,
}

impl PpiConfig {
    /// Read `.ppirc.toml` from `dir`.
    ///
    /// A missing file gives the defaults silently; an unreadable or invalid
    /// one gives the defaults with a warning.
    pub fn load(dir: &Path) -> Self {
        let path = dir.join(CONFIG_FILE);
        if !path.is_file() {
            return Self::default();
        }
        let parsed = std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|text| toml::from_str::<Self>(&text).map_err(|e| e.to_string()));
        parsed.unwrap_or_else(|e| {
            tracing::warn!("Ignoring {}: {}", CONFIG_FILE, e);
            Self::default()
        })
    }

    /// Data directory, with the flag taking precedence over the config.
    pub fn data_dir(&self, flag: Option<&Path>) -> PathBuf {
        flag.map(Path::to_path_buf).unwrap_or_else(|| {
            PathBuf::from(self.data.directory.as_deref().unwrap_or(DEFAULT_DATA_DIR))
        })
    }

    /// Gene dictionary path, with the flag taking precedence over the config.
    pub fn dictionary_path(&self, flag: Option<&Path>, data_dir: &Path) -> PathBuf {
        match (flag, self.data.dictionary.as_deref()) {
            (Some(path), _) => path.to_path_buf(),
            (None, Some(path)) => PathBuf::from(path),
            (None, None) => data_dir.join(DEFAULT_DICTIONARY),
        }
    }

    pub fn page_limits(&self) -> PageLimits {
        self.proteins
    }

    pub fn default_format(&self) -> Option<&str> {
        self.output.format.as_deref()
    }

    pub fn use_color(&self) -> Option<bool> {
        self.output.color
    }
}
