//! Configuration handling for Strata templates.
//! Every template may carry a `.strata.yml` document describing its parents,
//! the files to exclude from copying, the files to expand after copying and
//! the hooks to run around the copy.

use crate::constants::CONFIG_FILE;
use crate::error::{Error, Result};
use crate::hooks::Hook;
use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;
use std::path::Path;

/// Parsed `.strata.yml`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Templates applied before this one, in order.
    pub parents: Vec<String>,
    /// Patterns of source files that are never copied.
    pub exclude: Vec<String>,
    /// Patterns of destination files whose content is expanded after copying.
    pub parse: Vec<String>,
    #[serde(deserialize_with = "deserialize_hooks")]
    pub pre: Vec<Hook>,
    #[serde(deserialize_with = "deserialize_hooks")]
    pub post: Vec<Hook>,
}

/// Hooks are written as a sequence of `{shell: script}` mappings.
fn deserialize_hooks<'de, D>(deserializer: D) -> std::result::Result<Vec<Hook>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let entries: Option<Vec<IndexMap<String, String>>> = Option::deserialize(deserializer)?;
    Ok(entries
        .unwrap_or_default()
        .into_iter()
        .flatten()
        .map(|(shell, script)| Hook { shell, script })
        .collect())
}

/// Parses the configuration document content.
///
/// # Errors
/// * `Error::YamlError` if the document is not valid YAML of the expected shape
pub fn parse_config(content: &str, origin: &Path) -> Result<TemplateConfig> {
    if content.trim().is_empty() {
        return Ok(TemplateConfig::default());
    }
    serde_yaml::from_str::<Option<TemplateConfig>>(content)
        .map(Option::unwrap_or_default)
        .map_err(|source| Error::YamlError { path: origin.display().to_string(), source })
}

/// Loads the configuration of the template stored in `template_dir`.
/// A template without a configuration document gets the empty configuration.
pub fn load_config<P: AsRef<Path>>(template_dir: P) -> Result<TemplateConfig> {
    let config_path = template_dir.as_ref().join(CONFIG_FILE);
    if !config_path.is_file() {
        debug!("No configuration at {}", config_path.display());
        return Ok(TemplateConfig::default());
    }
    debug!("Loading configuration from {}", config_path.display());
    let content = std::fs::read_to_string(&config_path)?;
    parse_config(&content, &config_path)
}
