use std::fs;
use std::path::Path;

use serde::Deserialize;
use tradescrape_logging::scrape_info;

use crate::error::EngineError;

const DEFAULT_MAX_BYTES: u64 = 5 * 1024 * 1024;

/// Engine limits, loadable from a RON file. Missing fields take defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Pages larger than this are rejected before decoding.
    pub max_bytes: u64,
    /// Guess the encoding with chardetng when the declared label is unknown.
    pub detect_unknown_encoding: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            detect_unknown_encoding: true,
        }
    }
}

impl EngineSettings {
    pub fn from_ron_str(content: &str) -> Result<Self, EngineError> {
        parse(content, "<inline>")
    }
}

/// Read settings from a RON file.
pub fn load_settings(path: &Path) -> Result<EngineSettings, EngineError> {
    let content = fs::read_to_string(path).map_err(|err| EngineError::Settings {
        source_name: path.display().to_string(),
        message: err.to_string(),
    })?;
    let settings = parse(&content, &path.display().to_string())?;
    scrape_info!("Loaded engine settings from {:?}", path);
    Ok(settings)
}

fn parse(content: &str, source_name: &str) -> Result<EngineSettings, EngineError> {
    ron::from_str(content).map_err(|err| EngineError::Settings {
        source_name: source_name.to_string(),
        message: err.to_string(),
    })
}
