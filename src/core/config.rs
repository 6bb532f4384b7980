//! Configuration management for Tenderdoc.
//!
//! Handles loading and saving configuration from TOML files.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Document generation settings
    pub generation: GenerationConfig,

    /// Completion backend settings
    pub ai: AiConfig,
}

/// Document generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Generator used when neither the caller nor the request picks one
    /// (transformer, template, hybrid)
    pub default_generator: String,

    /// Directory of template files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templates_dir: Option<PathBuf>,

    /// Upper bound on the tokens any one AI-written section may use
    pub max_section_tokens: u32,

    /// Sections with more words than this are not enhanced by the hybrid generator
    pub enhance_word_threshold: usize,

    /// Token budget for one hybrid enhancement
    pub enhance_max_tokens: u32,
}

/// Completion backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Provider (auto, ollama, claude, openai)
    pub provider: String,

    /// Model override applied to whichever provider is used
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Ollama-specific settings
    pub ollama: OllamaConfig,

    /// Claude-specific settings
    pub claude: ClaudeConfig,

    /// OpenAI-specific settings
    pub openai: OpenAIConfig,
}

/// Ollama configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    /// Ollama server URL
    pub base_url: String,

    /// Model to use
    pub model: String,
}

/// Claude configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaudeConfig {
    /// Model to use
    pub model: String,
}

/// OpenAI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAIConfig {
    /// API base URL (Azure OpenAI or compatible servers)
    pub base_url: String,

    /// Model to use
    pub model: String,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Looks for config in:
    /// 1. `.tenderdoc.toml` in current directory
    /// 2. `~/.config/tenderdoc/config.toml`
    /// 3. Falls back to defaults
    ///
    /// Environment overrides are applied on top.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = Self::load_files()?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn load_files() -> anyhow::Result<Self> {
        // Try local config first
        let local_config = PathBuf::from(".tenderdoc.toml");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        // Try global config
        if let Some(config_dir) = Self::config_dir() {
            let global_config = config_dir.join("config.toml");
            if global_config.exists() {
                return Self::load_from_file(&global_config);
            }
        }

        // Return defaults
        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config {}: {e}", path.display()))?;
        Ok(config)
    }

    /// Apply `TENDERDOC_TEMPLATES_DIR`, `TENDERDOC_GENERATOR`, `OLLAMA_HOST` and `OLLAMA_MODEL`.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(dir) = std::env::var("TENDERDOC_TEMPLATES_DIR") {
            if !dir.is_empty() {
                self.generation.templates_dir = Some(PathBuf::from(dir));
            }
        }
        if let Ok(generator) = std::env::var("TENDERDOC_GENERATOR") {
            if !generator.is_empty() {
                self.generation.default_generator = generator;
            }
        }
        if let Ok(host) = std::env::var("OLLAMA_HOST") {
            if !host.is_empty() {
                self.ai.ollama.base_url = host;
            }
        }
        if let Ok(model) = std::env::var("OLLAMA_MODEL") {
            if !model.is_empty() {
                self.ai.ollama.model = model;
            }
        }
    }

    /// Save configuration to the global config file and return its path.
    pub fn save(&self) -> anyhow::Result<PathBuf> {
        let dir = Self::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        let path = dir.join("config.toml");
        self.save_to_file(&path)?;
        Ok(path)
    }

    /// Write configuration to a specific file, creating parent directories.
    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get the config directory path.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("tenderdoc"))
    }

    /// Template directory to load, `templates` when unset.
    pub fn templates_dir(&self) -> PathBuf {
        self.generation.templates_dir.clone().unwrap_or_else(|| PathBuf::from("templates"))
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            default_generator: "hybrid".to_string(),
            templates_dir: None,
            max_section_tokens: 2000,
            enhance_word_threshold: 20,
            enhance_max_tokens: 500,
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: "auto".to_string(),
            model: None,
            ollama: OllamaConfig::default(),
            claude: ClaudeConfig::default(),
            openai: OpenAIConfig::default(),
        }
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self { base_url: "http://localhost:11434".to_string(), model: "llama3.2".to_string() }
    }
}

impl Default for ClaudeConfig {
    fn default() -> Self {
        Self { model: "claude-sonnet-4-20250514".to_string() }
    }
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self { base_url: "https://api.openai.com/v1".to_string(), model: "gpt-4o".to_string() }
    }
}
