use anyhow::{Context, Result};
use appops_client_core::ClientConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

#[derive(Deserialize, Serialize, Debug, Default, Clone)]
pub struct AppConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_org: Option<String>,

    #[serde(default)]
    pub client: ClientConfig,

    /// The control-plane org
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hub: Option<OrgProfile>,

    /// Tenant orgs addressable with `--target-org <alias>`
    #[serde(default)]
    pub orgs: BTreeMap<String, OrgProfile>,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Stored credentials for one org
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct OrgProfile {
    #[serde(default)]
    pub instance_url: String,
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub org_id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default = "default_org_type")]
    pub org_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default = "default_login_url")]
    pub login_url: String,
}

impl OrgProfile {
    /// Names of required fields left empty, so partial profiles can be saved
    /// one key at a time
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("instance_url", &self.instance_url),
            ("access_token", &self.access_token),
            ("org_id", &self.org_id),
            ("username", &self.username),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    fn ensure_complete(&self, section: &str) -> Result<&Self> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(self)
        } else {
            anyhow::bail!(
                "Org profile '{}' is incomplete, missing: {}",
                section,
                missing.join(", ")
            )
        }
    }
}

fn default_org_type() -> String {
    "Sandbox".to_string()
}

fn default_login_url() -> String {
    "https://login.salesforce.com".to_string()
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OutputConfig {
    pub color_enabled: bool,
    pub progress_enabled: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color_enabled: true,
            progress_enabled: true,
        }
    }
}

impl AppConfig {
    /// The control-plane org profile, required by every remote command
    pub fn hub(&self) -> Result<&OrgProfile> {
        self.hub
            .as_ref()
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "No control org configured. Set hub.instance_url, hub.access_token, \
                     hub.org_id and hub.username with 'appops config set'"
                )
            })?
            .ensure_complete("hub")
    }

    /// Resolve a tenant org by alias, falling back to `default_org`
    pub fn org(&self, alias: Option<&str>) -> Result<Option<(&str, &OrgProfile)>> {
        let alias = match alias.or(self.default_org.as_deref()) {
            Some(alias) => alias,
            None => return Ok(None),
        };

        let (key, profile) = self
            .orgs
            .get_key_value(alias)
            .ok_or_else(|| anyhow::anyhow!("Org alias '{}' is not configured", alias))?;
        profile.ensure_complete(&format!("orgs.{key}"))?;
        Ok(Some((key.as_str(), profile)))
    }
}

/// Configuration manager that handles XDG-compliant paths and layered configuration
pub struct ConfigManager {
    config_path: PathBuf,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    /// Create a new ConfigManager with default XDG-compliant paths
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a ConfigManager with a specific path (for testing)
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    pub fn get_config_path(&self) -> PathBuf {
        self.config_path.clone()
    }

    fn default_config_path() -> PathBuf {
        #[cfg(not(target_os = "windows"))]
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg_config).join("appops/config.toml");
        }

        #[cfg(target_os = "linux")]
        {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config/appops/config.toml")
        }

        #[cfg(target_os = "macos")]
        {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("Library/Application Support/appops/config.toml")
        }

        #[cfg(target_os = "windows")]
        {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("appops\\config.toml")
        }
    }

    /// Load configuration with layered priority: ENV > File > Defaults
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        if self.config_path.exists() {
            figment = figment.merge(Toml::file(&self.config_path));
        }

        figment = figment.merge(Env::prefixed("APPOPS_").split("__"));

        figment.extract().context("Failed to load configuration")
    }

    /// Get a configuration value by key (dot notation)
    pub fn get(&self, key: &str) -> Result<String> {
        let value = self.load_as_toml()?;

        let mut current = &value;
        for part in key.split('.') {
            match current {
                toml::Value::Table(table) => {
                    current = table
                        .get(part)
                        .ok_or_else(|| anyhow::anyhow!("Key '{}' not found", key))?;
                }
                _ => anyhow::bail!("Invalid key path: {}", key),
            }
        }

        match current {
            toml::Value::String(s) => Ok(s.clone()),
            toml::Value::Integer(i) => Ok(i.to_string()),
            toml::Value::Float(f) => Ok(f.to_string()),
            toml::Value::Boolean(b) => Ok(b.to_string()),
            _ => anyhow::bail!("Value at '{}' is not a simple type", key),
        }
    }

    /// Set a configuration value by key (dot notation)
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_config_value(key, value)?;

        let mut config = if self.config_path.exists() {
            let content = fs::read_to_string(&self.config_path)?;
            toml::from_str(&content)?
        } else {
            toml::Value::Table(toml::map::Map::new())
        };

        let parts: Vec<&str> = key.split('.').collect();
        let (last, parents) = match parts.split_last() {
            Some((last, parents)) if !last.is_empty() => (*last, parents),
            _ => anyhow::bail!("Empty key"),
        };

        let mut current = &mut config;
        for part in parents {
            let toml::Value::Table(table) = current else {
                anyhow::bail!("Invalid key path: expected table at '{}'", part);
            };
            current = table
                .entry(part.to_string())
                .or_insert_with(|| toml::Value::Table(toml::map::Map::new()));
        }

        let toml::Value::Table(table) = current else {
            anyhow::bail!("Cannot set value on non-table");
        };
        table.insert(last.to_string(), parse_config_value(key, value)?);

        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.config_path, toml::to_string_pretty(&config)?)?;

        Ok(())
    }

    /// List all configuration values
    ///
    /// Access and refresh tokens are masked.
    pub fn list(&self) -> Result<Vec<(String, String)>> {
        let value = self.load_as_toml()?;

        let mut items = Vec::new();
        collect_values(&value, String::new(), &mut items);
        for (key, value) in items.iter_mut() {
            if is_secret(key) {
                *value = mask(value);
            }
        }
        items.sort_by(|a, b| a.0.cmp(&b.0));

        Ok(items)
    }

    fn load_as_toml(&self) -> Result<toml::Value> {
        let config = self.load()?;
        let toml_string = toml::to_string(&config)?;
        Ok(toml::from_str(&toml_string)?)
    }
}

fn collect_values(value: &toml::Value, prefix: String, items: &mut Vec<(String, String)>) {
    match value {
        toml::Value::Table(table) => {
            for (key, val) in table {
                let new_prefix = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                collect_values(val, new_prefix, items);
            }
        }
        toml::Value::String(s) => items.push((prefix, s.clone())),
        toml::Value::Integer(i) => items.push((prefix, i.to_string())),
        toml::Value::Float(f) => items.push((prefix, f.to_string())),
        toml::Value::Boolean(b) => items.push((prefix, b.to_string())),
        _ => {}
    }
}

fn is_secret(key: &str) -> bool {
    key.ends_with(".access_token") || key.ends_with(".refresh_token")
}

fn mask(value: &str) -> String {
    let visible: String = value.chars().take(4).collect();
    format!("{visible}****")
}

fn validate_config_value(key: &str, value: &str) -> Result<()> {
    match key {
        "client.request_timeout_seconds"
        | "client.manage_poll_interval_ms"
        | "client.job_poll_interval_ms" => {
            let n: u64 = value
                .parse()
                .with_context(|| format!("{key} must be a positive integer"))?;
            if n == 0 {
                anyhow::bail!("{key} must be greater than 0");
            }
        }
        "client.manage_poll_max_attempts" | "client.job_poll_max_attempts" => {
            let n: u32 = value
                .parse()
                .with_context(|| format!("{key} must be a positive integer"))?;
            if n == 0 {
                anyhow::bail!("{key} must be greater than 0");
            }
        }
        "client.api_base_path" => {
            if !value.starts_with('/') {
                anyhow::bail!("api_base_path must start with '/'");
            }
        }
        "output.color_enabled" | "output.progress_enabled" => {
            let _: bool = value.parse().context("Value must be 'true' or 'false'")?;
        }
        k if k.ends_with(".instance_url") || k.ends_with(".login_url") => {
            if !(value.starts_with("https://") || value.starts_with("http://")) {
                anyhow::bail!("{key} must be an http(s) URL");
            }
        }
        k if k.ends_with(".org_type") => {
            if value != "Sandbox" && value != "Production" {
                anyhow::bail!("org_type must be 'Sandbox' or 'Production'");
            }
        }
        _ => {}
    }
    Ok(())
}

fn parse_config_value(key: &str, value: &str) -> Result<toml::Value> {
    match key {
        k if k.ends_with("_ms") || k.ends_with("_attempts") || k.ends_with("_seconds") => {
            let num: i64 = value.parse().context("Expected integer value")?;
            Ok(toml::Value::Integer(num))
        }
        k if k.ends_with("_enabled") => {
            let bool_val: bool = value
                .parse()
                .context("Expected boolean value (true/false)")?;
            Ok(toml::Value::Boolean(bool_val))
        }
        // Org credentials, IDs and API versions are always strings
        k if k.starts_with("hub.")
            || k.starts_with("orgs.")
            || k.starts_with("client.")
            || k == "default_org" =>
        {
            Ok(toml::Value::String(value.to_string()))
        }
        _ => {
            if let Ok(b) = value.parse::<bool>() {
                Ok(toml::Value::Boolean(b))
            } else if let Ok(i) = value.parse::<i64>() {
                Ok(toml::Value::Integer(i))
            } else {
                Ok(toml::Value::String(value.to_string()))
            }
        }
    }
}

/// Get the default configuration
pub fn get_config() -> Result<AppConfig> {
    ConfigManager::new().load()
}
