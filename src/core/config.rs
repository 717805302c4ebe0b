use crate::core::catalog::{Catalog, Sources};
use crate::core::fetch::DEFAULT_CHUNK_SIZE;
use crate::core::logging::LoggingOptions;
use crate::error::{ModelsError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "rvc-models.toml";
pub const ROOT_ENV_VAR: &str = "RVC_MODELS_DIR";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Directory holding `predictors/` and `embedders/`. Relative paths are
    /// resolved against the working directory.
    pub root: PathBuf,
    pub onnx: bool,
    pub atomic: bool,
    pub chunk_size: usize,
    pub sources: Sources,
    pub logging: LoggingOptions,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            root: PathBuf::from("rvc").join("models"),
            onnx: false,
            atomic: false,
            chunk_size: DEFAULT_CHUNK_SIZE,
            sources: Sources::default(),
            logging: LoggingOptions::default(),
        }
    }
}

impl Config {
    /// Loads configuration from `explicit`, or from the first config file
    /// found in the usual places, or falls back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match find_config_file() {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };

        if let Ok(root) = std::env::var(ROOT_ENV_VAR) {
            if !root.trim().is_empty() {
                config.root = PathBuf::from(root);
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ModelsError::config_error(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(ModelsError::config_error("chunk_size must be greater than zero"));
        }

        for (family, url) in [
            ("predictors", &self.sources.predictors),
            ("embedders", &self.sources.embedders),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ModelsError::config_error(format!(
                    "{family} source must be an http(s) URL, got '{url}'"
                )));
            }
            if !url.ends_with('/') {
                return Err(ModelsError::config_error(format!(
                    "{family} source must end with '/', got '{url}'"
                )));
            }
        }

        Ok(())
    }

    pub fn get_predictors_dir(&self) -> PathBuf {
        self.root.join("predictors")
    }

    pub fn get_embedders_dir(&self) -> PathBuf {
        self.root.join("embedders")
    }

    pub fn catalog(&self) -> Catalog {
        Catalog::rvc(&self.root, &self.sources, self.onnx)
    }
}

fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("rvc-models").join("config.toml"))
        .filter(|path| path.is_file())
}
