//! Derivation options, loadable from a JSON config file.
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeriveOptions {
    /// Nested schema positions deeper than this resolve to `Value`.
    pub max_depth: Option<usize>,
    /// Reuse derived types for structurally identical sub-schemas.
    pub memoize: bool,
}

impl Default for DeriveOptions {
    fn default() -> Self {
        Self { max_depth: None, memoize: true }
    }
}

impl DeriveOptions {
    pub fn from_json_str(src: &str, origin: &str) -> Result<Self> {
        crate::path_de::from_str_with_path(src).map_err(|source| Error::Config {
            origin: origin.to_string(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let src = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let options = Self::from_json_str(&src, &path.to_string_lossy())?;
        log::info!("loaded derive options from {}: {options:?}", path.display());
        Ok(options)
    }
}
