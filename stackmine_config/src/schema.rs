use serde::{Deserialize, Serialize};
use stackmine_core::{BundleParams, MatchMode};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable that overrides `providers.openai.api_key`.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub mining: BundleParams,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub openai: ProviderConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProviderConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "ProviderConfig::default_base_url")]
    pub base_url: String,
    #[serde(default = "ProviderConfig::default_model")]
    pub model: String,
    /// Seconds to wait before each retry of a transient failure.
    #[serde(default = "ProviderConfig::default_retry_delays_secs")]
    pub retry_delays_secs: Vec<u64>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: Self::default_base_url(),
            model: Self::default_model(),
            retry_delays_secs: Self::default_retry_delays_secs(),
        }
    }
}

impl ProviderConfig {
    fn default_base_url() -> String {
        "https://api.openai.com/v1".to_string()
    }

    fn default_model() -> String {
        "gpt-4o-mini".to_string()
    }

    fn default_retry_delays_secs() -> Vec<u64> {
        vec![3, 6]
    }

    /// The key, unless it is empty or still the `init` placeholder.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        let key = self.api_key.trim();
        (!key.is_empty() && key != PLACEHOLDER_KEY).then_some(key)
    }
}

/// Keyword matching, used directly without an API key and as the fallback
/// of model extraction.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default)]
pub struct ExtractionConfig {
    #[serde(default)]
    pub match_mode: MatchMode,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SourcesConfig {
    #[serde(default = "SourcesConfig::default_reddit")]
    pub reddit: Vec<String>,
    #[serde(default = "SourcesConfig::default_so_tags")]
    pub so_tags: Vec<String>,
    #[serde(default = "SourcesConfig::default_limit")]
    pub limit: usize,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            reddit: Self::default_reddit(),
            so_tags: Self::default_so_tags(),
            limit: Self::default_limit(),
        }
    }
}

impl SourcesConfig {
    fn default_reddit() -> Vec<String> {
        vec!["r/devops".to_string()]
    }

    fn default_so_tags() -> Vec<String> {
        vec!["python".to_string()]
    }

    const fn default_limit() -> usize {
        20
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct OutputConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

const PLACEHOLDER_KEY: &str = "your-openai-api-key-here";

impl Config {
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join("stackmine"))
    }

    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Load `~/stackmine/config.json` (defaults if absent), then apply
    /// `OPENAI_API_KEY`.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env(std::env::var(API_KEY_ENV).ok());
        Ok(config)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            info!(
                "No config at {}, using defaults (run 'stackmine init' to create one)",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config {}: {e}", path.display()))?;
        config.mining.validate()?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Override the API key with a non-empty value from the environment.
    pub fn apply_env(&mut self, api_key: Option<String>) {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            debug!("Using API key from {API_KEY_ENV}");
            self.providers.openai.api_key = key;
        }
    }

    /// `output.dir`, or `~/stackmine/out`.
    pub fn output_dir(&self) -> anyhow::Result<PathBuf> {
        match &self.output.dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::config_dir()?.join("out")),
        }
    }

    pub fn create_config() -> anyhow::Result<()> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        let config_path = Self::write_template(&config_dir.join("config.json"))?;

        println!("✅ Created config file at: {}", config_path.display());
        println!();
        println!("📝 Next steps:");
        println!("   1. Add your OpenAI API key (or export {API_KEY_ENV})");
        println!("   2. Run 'stackmine full' to crawl, mine and summarize");
        println!();
        println!("🔧 Configuration options:");
        println!("   - mining.min_support / min_pair: support thresholds for bundles");
        println!("   - mining.top_k: maximum number of bundles");
        println!("   - extraction.match_mode: \"substring\" or \"token\" keyword matching");
        println!("   - sources.reddit / so_tags: default crawl targets");
        println!("   - output.dir: where artifacts are written (default ~/stackmine/out)");
        println!();
        Ok(())
    }

    /// Write the default template to `path`, refusing to overwrite.
    pub fn write_template(path: &Path) -> anyhow::Result<PathBuf> {
        if path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                path.display()
            );
        }

        let config_template = r#"{
  "providers": {
    "openai": {
      "api_key": "your-openai-api-key-here",
      "base_url": "https://api.openai.com/v1",
      "model": "gpt-4o-mini",
      "retry_delays_secs": [3, 6]
    }
  },
  "mining": {
    "min_support": 3,
    "min_pair": 3,
    "top_k": 50,
    "dedup_threshold": 0.8
  },
  "extraction": {
    "match_mode": "substring"
  },
  "sources": {
    "reddit": ["r/devops"],
    "so_tags": ["python"],
    "limit": 20
  }
}"#;

        std::fs::write(path, config_template)?;
        Ok(path.to_path_buf())
    }
}
