use anyhow::{Context, Result};
use checksum_core::{ClientConfig, DEFAULT_CHUNK_SIZE, HashAlgorithm, StrategyKind};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the per-project configuration file
pub const PROJECT_CONFIG_FILE: &str = ".checksum.toml";

/// Environment variable holding a comma separated default algorithm list
pub const DEFAULT_ALGORITHMS_ENV: &str = "DEFAULT_ALGORITHMS";

const MIN_CHUNK_SIZE: usize = 1024;

const KNOWN_KEYS: [&str; 7] = [
    "hashing.default_algorithms",
    "hashing.chunk_size",
    "hashing.strategy",
    "output.color_enabled",
    "output.progress_enabled",
    "logging.level",
    "logging.file",
];

#[derive(Deserialize, Serialize, Debug, Default, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub hashing: HashingConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct HashingConfig {
    /// Algorithms used when `generate` is given none; empty means prompt
    pub default_algorithms: Vec<String>,
    pub chunk_size: usize,
    pub strategy: StrategyKind,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OutputConfig {
    pub color_enabled: bool,
    pub progress_enabled: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LoggingConfig {
    /// Level written to the log file
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            default_algorithms: Vec::new(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            strategy: StrategyKind::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color_enabled: true,
            progress_enabled: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl AppConfig {
    /// Apply CLI argument overrides to the configuration
    pub fn apply_cli_overrides(
        &mut self,
        chunk_size: Option<usize>,
        strategy: Option<StrategyKind>,
    ) -> Result<()> {
        if let Some(size) = chunk_size {
            check_chunk_size(size).context("Invalid --chunk-size")?;
            self.hashing.chunk_size = size;
        }
        if let Some(strategy) = strategy {
            self.hashing.strategy = strategy;
        }
        Ok(())
    }

    /// Settings handed to the core client
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            chunk_size: self.hashing.chunk_size,
            strategy: self.hashing.strategy,
        }
    }
}

/// Configuration manager that handles XDG-compliant paths and layered configuration
pub struct ConfigManager {
    config_path: PathBuf,
    project_path: Option<PathBuf>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    /// Create a new ConfigManager with default XDG-compliant paths
    pub fn new() -> Self {
        let project_path = std::env::current_dir()
            .ok()
            .and_then(|dir| find_project_config(&dir));

        Self {
            config_path: Self::default_config_path(),
            project_path,
        }
    }

    /// Create a ConfigManager with a specific user file and no project file
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            config_path: path,
            project_path: None,
        }
    }

    /// Use `path` as the project configuration layer
    pub fn with_project_path(mut self, path: PathBuf) -> Self {
        self.project_path = Some(path);
        self
    }

    /// Get the configuration file path
    pub fn get_config_path(&self) -> PathBuf {
        self.config_path.clone()
    }

    /// Project file found for the current directory, if any
    pub fn project_path(&self) -> Option<&Path> {
        self.project_path.as_deref()
    }

    /// Get the default XDG-compliant configuration path
    fn default_config_path() -> PathBuf {
        #[cfg(not(target_os = "windows"))]
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg_config).join("checksum/config.toml");
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("checksum")
            .join("config.toml")
    }

    /// Layered providers: Defaults < User file < Project file < ENV
    pub fn figment(&self) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        if self.config_path.exists() {
            figment = figment.merge(Toml::file(&self.config_path));
        }

        if let Some(project) = &self.project_path {
            figment = figment.merge(Toml::file(project));
        }

        figment = figment.merge(Env::prefixed("CHECKSUM_").split("__"));

        if let Ok(list) = std::env::var(DEFAULT_ALGORITHMS_ENV) {
            let algorithms = split_algorithm_list(&list);
            if !algorithms.is_empty() {
                figment = figment.merge(Serialized::default(
                    "hashing.default_algorithms",
                    algorithms,
                ));
            }
        }

        figment
    }

    /// Load configuration with layered priority
    pub fn load(&self) -> Result<AppConfig> {
        let config: AppConfig = self
            .figment()
            .extract()
            .context("Failed to load configuration")?;

        check_chunk_size(config.hashing.chunk_size).context("Invalid hashing.chunk_size")?;

        Ok(config)
    }

    /// Get a configuration value by key (dot notation)
    pub fn get(&self, key: &str) -> Result<String> {
        let config = self.load()?;
        let value = toml::Value::try_from(&config)?;

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

        render_value(current)
            .ok_or_else(|| anyhow::anyhow!("Value at '{}' is not a simple type", key))
    }

    /// Set a configuration value by key (dot notation) in the user file
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if !KNOWN_KEYS.contains(&key) {
            anyhow::bail!("Unknown configuration key: {}", key);
        }
        let parsed_value = parse_config_value(key, value)?;

        let mut config = if self.config_path.exists() {
            let content = fs::read_to_string(&self.config_path).with_context(|| {
                format!("Failed to read {}", self.config_path.display())
            })?;
            toml::from_str(&content)?
        } else {
            toml::Value::Table(toml::map::Map::new())
        };

        let (section, field) = key
            .split_once('.')
            .ok_or_else(|| anyhow::anyhow!("Invalid key path: {}", key))?;

        let toml::Value::Table(root) = &mut config else {
            anyhow::bail!("Configuration file is not a table");
        };
        let section_value = root
            .entry(section.to_string())
            .or_insert_with(|| toml::Value::Table(toml::map::Map::new()));
        let toml::Value::Table(table) = section_value else {
            anyhow::bail!("Invalid key path: expected table at '{}'", section);
        };
        table.insert(field.to_string(), parsed_value);

        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(&config)?;
        fs::write(&self.config_path, toml_string)
            .with_context(|| format!("Failed to write {}", self.config_path.display()))?;

        log::info!("Set {key} = {value} in {}", self.config_path.display());
        Ok(())
    }

    /// List all effective configuration values
    pub fn list(&self) -> Result<Vec<(String, String)>> {
        let config = self.load()?;
        let value = toml::Value::try_from(&config)?;

        let mut items = Vec::new();
        collect_values(&value, String::new(), &mut items);
        items.sort_by(|a, b| a.0.cmp(&b.0));

        Ok(items)
    }
}

/// Walk up from `start` looking for a project configuration file
pub fn find_project_config(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(PROJECT_CONFIG_FILE))
        .find(|candidate| candidate.is_file())
}

/// Split a comma separated algorithm list, dropping empty entries
pub fn split_algorithm_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Load the effective configuration
pub fn get_config() -> Result<AppConfig> {
    ConfigManager::new().load()
}

fn render_value(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Float(f) => Some(f.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        toml::Value::Array(items) => items
            .iter()
            .map(render_value)
            .collect::<Option<Vec<_>>>()
            .map(|items| items.join(",")),
        _ => None,
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
        other => {
            if let Some(rendered) = render_value(other) {
                items.push((prefix, rendered));
            }
        }
    }
}

fn check_chunk_size(size: usize) -> Result<()> {
    if size < MIN_CHUNK_SIZE {
        anyhow::bail!("chunk_size must be at least {MIN_CHUNK_SIZE} bytes");
    }
    Ok(())
}

/// Validate a value and convert it to the TOML type stored for `key`
fn parse_config_value(key: &str, value: &str) -> Result<toml::Value> {
    match key {
        "hashing.chunk_size" => {
            let size: usize = value
                .parse()
                .context("chunk_size must be a positive integer")?;
            check_chunk_size(size)?;
            let size = i64::try_from(size).context("chunk_size is too large")?;
            Ok(toml::Value::Integer(size))
        }
        "hashing.strategy" => {
            let strategy: StrategyKind = value.parse()?;
            Ok(toml::Value::String(strategy.name().to_string()))
        }
        "hashing.default_algorithms" => {
            let names = split_algorithm_list(value);
            let algorithms = HashAlgorithm::parse_list(&names)?;
            Ok(toml::Value::Array(
                algorithms
                    .into_iter()
                    .map(|algorithm| toml::Value::String(algorithm.id().to_string()))
                    .collect(),
            ))
        }
        "output.color_enabled" | "output.progress_enabled" => {
            let enabled: bool = value
                .parse()
                .context("Value must be 'true' or 'false'")?;
            Ok(toml::Value::Boolean(enabled))
        }
        "logging.level" => {
            let level: log::LevelFilter = value
                .parse()
                .context("level must be one of off, error, warn, info, debug, trace")?;
            Ok(toml::Value::String(level.to_string().to_lowercase()))
        }
        _ => Ok(toml::Value::String(value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manager(dir: &TempDir) -> ConfigManager {
        ConfigManager::with_path(dir.path().join("config.toml"))
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.hashing.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(config.hashing.strategy, StrategyKind::Sequential);
        assert!(config.output.progress_enabled);
        assert!(config.logging.file.is_none());
    }

    #[test]
    fn test_set_then_get_round_trips_through_file() {
        let dir = TempDir::new().unwrap();
        let mut manager = manager(&dir);

        manager.set("hashing.chunk_size", "4096").unwrap();
        manager.set("hashing.strategy", "PARALLEL").unwrap();

        assert_eq!(manager.get("hashing.chunk_size").unwrap(), "4096");
        assert_eq!(manager.get("hashing.strategy").unwrap(), "parallel");

        let written = fs::read_to_string(dir.path().join("config.toml")).unwrap();
        assert!(written.contains("[hashing]"));
    }

    #[test]
    fn test_set_algorithms_stores_normalized_array() {
        let dir = TempDir::new().unwrap();
        let mut manager = manager(&dir);

        manager
            .set("hashing.default_algorithms", "SHA256, md5")
            .unwrap();

        assert_eq!(
            manager.get("hashing.default_algorithms").unwrap(),
            "sha256,md5"
        );
    }

    #[test]
    fn test_set_rejects_invalid_values() {
        let dir = TempDir::new().unwrap();
        let mut manager = manager(&dir);

        assert!(manager.set("hashing.chunk_size", "512").is_err());
        assert!(manager.set("hashing.chunk_size", "big").is_err());
        assert!(manager.set("hashing.strategy", "hybrid").is_err());
        assert!(manager.set("hashing.default_algorithms", "md5,sha3").is_err());
        assert!(manager.set("output.color_enabled", "yes").is_err());
        assert!(manager.set("logging.level", "loud").is_err());
        assert!(manager.set("network.timeout", "5").is_err());
        assert!(!dir.path().join("config.toml").exists());
    }

    #[test]
    fn test_project_file_overrides_user_file() {
        let dir = TempDir::new().unwrap();
        let user = dir.path().join("config.toml");
        let project = dir.path().join(PROJECT_CONFIG_FILE);
        fs::write(&user, "[hashing]\nchunk_size = 2048\nstrategy = \"multiple\"\n").unwrap();
        fs::write(&project, "[hashing]\nchunk_size = 8192\n").unwrap();

        let config = ConfigManager::with_path(user)
            .with_project_path(project)
            .load()
            .unwrap();

        assert_eq!(config.hashing.chunk_size, 8192);
        assert_eq!(config.hashing.strategy, StrategyKind::Multiple);
    }

    #[test]
    fn test_find_project_config_walks_up() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join(PROJECT_CONFIG_FILE), "").unwrap();

        assert_eq!(
            find_project_config(&nested),
            Some(dir.path().join(PROJECT_CONFIG_FILE))
        );
    }

    #[test]
    fn test_list_includes_every_section() {
        let dir = TempDir::new().unwrap();
        let items = manager(&dir).list().unwrap();
        let keys: Vec<_> = items.iter().map(|(key, _)| key.as_str()).collect();

        assert!(keys.contains(&"hashing.chunk_size"));
        assert!(keys.contains(&"output.color_enabled"));
        assert!(keys.contains(&"logging.level"));
    }

    #[test]
    fn test_split_algorithm_list() {
        assert_eq!(split_algorithm_list(" sha1, ,md5 "), vec!["sha1", "md5"]);
        assert!(split_algorithm_list("").is_empty());
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = AppConfig::default();
        config
            .apply_cli_overrides(Some(4096), Some(StrategyKind::Parallel))
            .unwrap();

        let client = config.client_config();
        assert_eq!(client.chunk_size, 4096);
        assert_eq!(client.strategy, StrategyKind::Parallel);
    }

    #[test]
    fn test_small_chunk_size_rejected_from_every_source() {
        let mut config = AppConfig::default();
        assert!(config.apply_cli_overrides(Some(100), None).is_err());
        assert_eq!(config.hashing.chunk_size, DEFAULT_CHUNK_SIZE);

        let dir = TempDir::new().unwrap();
        let user = dir.path().join("config.toml");
        fs::write(&user, "[hashing]\nchunk_size = 512\n").unwrap();
        let error = ConfigManager::with_path(user).load().unwrap_err();
        assert!(format!("{error:#}").contains("at least 1024"));
    }
}
