use anyhow::Result;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use config::builder::DefaultState;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

const CONFIG_FILE: &str = "bug-frame.toml";
const ENV_PREFIX: &str = "BUG_FRAME";

/// Set when the global configuration picked up a `.env` file
static ENV_FILE_LOADED: AtomicBool = AtomicBool::new(false);

/// `BUG_FRAME_<SECTION>__<KEY>` environment overrides
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

/// Main configuration structure for the bug report frame
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Frame presentation settings
    pub frame: FrameSettings,
    /// Submission backend settings
    pub submission: SubmissionConfig,
    /// Logging settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FrameSettings {
    /// Title shown at the top of the form card
    pub project_title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SubmissionConfig {
    /// Simulated submission latency in milliseconds
    pub delay_ms: u64,
    /// Who gets notified about new reports
    pub notify_handle: String,
    /// Team named on the success card
    pub team_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (an EnvFilter directive)
    pub log_level: String,
    /// Emit JSON log lines instead of plain text
    pub json_logs: bool,
}

impl Default for FrameSettings {
    fn default() -> Self {
        Self {
            project_title: "Vibes Bug Reporter".to_string(),
        }
    }
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            delay_ms: 1500,
            notify_handle: "@hellno.eth".to_string(),
            team_name: "Vibes Engineering".to_string(),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: true,
        }
    }
}

impl FrameConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration file (bug-frame.toml)
    /// 3. Environment variables (prefixed with BUG_FRAME_, sections split by `__`)
    pub fn load() -> Result<Self> {
        let mut builder = Config::builder();

        if Path::new(CONFIG_FILE).exists() {
            builder = builder.add_source(File::with_name(CONFIG_FILE));
        }

        Self::build(builder.add_source(environment()))
    }

    /// Parse configuration from TOML text, falling back to defaults for
    /// anything it leaves out.
    pub fn from_toml(contents: &str) -> Result<Self> {
        Self::build(Config::builder().add_source(File::from_str(contents, FileFormat::Toml)))
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Load .env file if it exists. Returns whether one was loaded.
    ///
    /// Runs before logging is set up, so it doesn't log; `init_config`
    /// reports it afterwards.
    pub fn load_env_file() -> Result<bool> {
        if !Path::new(".env").exists() {
            return Ok(false);
        }
        dotenvy::dotenv()?;
        Ok(true)
    }
}

/// Global configuration instance
static CONFIG: std::sync::LazyLock<Result<FrameConfig, anyhow::Error>> =
    std::sync::LazyLock::new(|| {
        // Load .env file first
        if let Ok(loaded) = FrameConfig::load_env_file() {
            ENV_FILE_LOADED.store(loaded, Ordering::Relaxed);
        }
        FrameConfig::load()
    });

/// Get the global configuration
pub fn config() -> Result<&'static FrameConfig> {
    CONFIG
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
}

/// Initialize configuration (called at startup, once logging is up)
pub fn init_config() -> Result<&'static FrameConfig> {
    let config = config()?;
    if ENV_FILE_LOADED.load(Ordering::Relaxed) {
        tracing::info!("Loaded environment variables from .env file");
    }
    tracing::info!("Configuration loaded successfully");
    Ok(config)
}
