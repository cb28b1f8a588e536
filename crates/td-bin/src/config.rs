//! optional settings read from `td.toml`. anything given on the command line
//! takes precedence

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;


/// the file looked for in the working directory when `--config` isn't given
pub const DEFAULT_CONFIG: &str = "td.toml";

#[derive(Deserialize, Debug, Default, PartialEq)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    /// CI coefficient below which MO transitions are dropped
    ci_coeff: Option<f64>,

    /// minimum resonance Raman weight to report
    rr_thresh: Option<f64>,

    /// JSON or tab-separated file with human-readable MO names
    mo_names: Option<String>,

    /// start and end of the spectrum in nm. derived from the states if
    /// missing
    spectrum_range: Option<[f64; 2]>,

    /// scale the spectrum to a maximum of 1
    normalize: Option<bool>,

    /// print the table in chunks of this many states. 0 disables chunking
    chunks: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(from = "RawConfig")]
pub struct Config {
    pub ci_coeff: f64,
    pub rr_thresh: f64,
    pub mo_names: String,
    pub spectrum_range: Option<[f64; 2]>,
    pub normalize: bool,
    pub chunks: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self::from(RawConfig::default())
    }
}

impl From<RawConfig> for Config {
    fn from(rc: RawConfig) -> Self {
        Self {
            ci_coeff: rc.ci_coeff.unwrap_or(td::pipeline::DEFAULT_CI_THRESH),
            rr_thresh: rc.rr_thresh.unwrap_or(0.01),
            mo_names: rc.mo_names.unwrap_or_else(|| String::from("mos.json")),
            spectrum_range: rc.spectrum_range,
            normalize: rc.normalize.unwrap_or(true),
            chunks: rc.chunks.unwrap_or(0),
        }
    }
}

impl Config {
    pub fn load(filename: impl AsRef<Path>) -> anyhow::Result<Self> {
        let filename = filename.as_ref();
        let contents = std::fs::read_to_string(filename).with_context(|| {
            format!("failed to read config file {}", filename.display())
        })?;
        toml::from_str(&contents).with_context(|| {
            format!("failed to deserialize config file {}", filename.display())
        })
    }

    /// load `explicit` if given, otherwise [DEFAULT_CONFIG] if it exists in
    /// `dir`, otherwise fall back on the defaults
    pub fn find(
        explicit: Option<&str>,
        dir: impl AsRef<Path>,
    ) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let path = dir.as_ref().join(DEFAULT_CONFIG);
        if path.exists() {
            log::info!("loading settings from {}", path.display());
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}
