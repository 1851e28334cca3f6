// Client configuration properties and their loaders

use crate::{CloudError, Result, TypeRef};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Section of a configuration document holding the client properties
pub const PROPERTIES_PREFIX: &str = "feign.client";

/// Per-client property block.
///
/// Each field names an implementation type that is looked up or
/// instantiated when the block is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ClientProperties {
    pub http_options: Option<TypeRef>,
    pub retry_policy: Option<TypeRef>,
    pub status_handler: Option<TypeRef>,
    pub retry_handler: Option<TypeRef>,
    pub decode404: Option<bool>,
    pub contract: Option<TypeRef>,
    pub command_setter_factory: Option<TypeRef>,
    pub fallback_factory: Option<TypeRef>,
    pub fallback: Option<TypeRef>,
}

/// Properties bound from the `feign.client` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ReactiveFeignClientProperties {
    /// When true, property blocks override beans from the client context.
    pub default_to_properties: bool,
    /// Key of the block applied to every client.
    pub default_config: String,
    /// Property blocks keyed by client name.
    pub config: HashMap<String, ClientProperties>,
}

impl Default for ReactiveFeignClientProperties {
    fn default() -> Self {
        Self {
            default_to_properties: true,
            default_config: "default".to_string(),
            config: HashMap::new(),
        }
    }
}

impl ReactiveFeignClientProperties {
    pub fn client(&self, key: &str) -> Option<&ClientProperties> {
        self.config.get(key)
    }

    pub fn with_client(mut self, key: impl Into<String>, properties: ClientProperties) -> Self {
        self.config.insert(key.into(), properties);
        self
    }

    pub fn global_defaults(&self) -> GlobalDefaults {
        GlobalDefaults {
            apply_context_config_first: self.default_to_properties,
            default_config_key: self.default_config.clone(),
        }
    }
}

/// Process-wide settings read once per client build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalDefaults {
    /// Apply the context layer before the property layers.
    pub apply_context_config_first: bool,
    /// Key of the property block applied to every client.
    pub default_config_key: String,
}

impl Default for GlobalDefaults {
    fn default() -> Self {
        ReactiveFeignClientProperties::default().global_defaults()
    }
}

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FileFormat {
    Json,
    Toml,
}

impl FileFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(FileFormat::Json),
            "toml" => Some(FileFormat::Toml),
            _ => None,
        }
    }
}

/// Loads [`ReactiveFeignClientProperties`] from configuration documents
pub struct PropertiesLoader {
    format: FileFormat,
}

impl PropertiesLoader {
    pub fn new(format: FileFormat) -> Self {
        Self { format }
    }

    /// Auto-detect format from file extension
    pub fn auto(path: impl AsRef<Path>) -> Result<Self> {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| CloudError::Load("No file extension found".to_string()))?;

        let format = FileFormat::from_extension(ext)
            .ok_or_else(|| CloudError::Load(format!("Unsupported format: {}", ext)))?;

        Ok(Self::new(format))
    }

    /// Load properties from a file, detecting its format
    pub fn load_file(path: impl AsRef<Path>) -> Result<ReactiveFeignClientProperties> {
        let path = path.as_ref();
        let loader = Self::auto(path)?;
        let content = fs::read_to_string(path)
            .map_err(|e| CloudError::Load(format!("Failed to read file: {}", e)))?;

        let properties = loader.parse(&content)?;
        debug!(
            path = %path.display(),
            clients = properties.config.len(),
            "Loaded client properties"
        );
        Ok(properties)
    }

    /// Parse properties from a document; a missing section yields defaults
    pub fn parse(&self, content: &str) -> Result<ReactiveFeignClientProperties> {
        let document = match self.format {
            FileFormat::Json => self.parse_json(content)?,
            FileFormat::Toml => self.parse_toml(content)?,
        };

        let section = PROPERTIES_PREFIX
            .split('.')
            .try_fold(&document, |value, key| value.get(key));

        match section {
            Some(section) => serde_json::from_value(section.clone())
                .map_err(|e| CloudError::Parse(format!("{}: {}", PROPERTIES_PREFIX, e))),
            None => Ok(ReactiveFeignClientProperties::default()),
        }
    }

    fn parse_json(&self, content: &str) -> Result<Value> {
        serde_json::from_str(content)
            .map_err(|e| CloudError::Parse(format!("JSON parse error: {}", e)))
    }

    fn parse_toml(&self, content: &str) -> Result<Value> {
        let toml_value: toml::Value = toml::from_str(content)
            .map_err(|e| CloudError::Parse(format!("TOML parse error: {}", e)))?;

        serde_json::to_value(toml_value)
            .map_err(|e| CloudError::Parse(format!("TOML to JSON conversion error: {}", e)))
    }
}
