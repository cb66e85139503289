use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub telegram: TelegramConfig,
    pub dialogue: DialogueConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TelegramConfig {
    pub token: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DialogueConfig {
    /// Turn count at which a session is finalized.
    pub length: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EngineConfig {
    #[serde(default = "EngineConfig::default_base_url")]
    pub base_url: String,
    #[serde(default = "EngineConfig::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            timeout_secs: Self::default_timeout_secs(),
        }
    }
}

impl EngineConfig {
    fn default_base_url() -> String {
        "http://127.0.0.1:5001".to_string()
    }

    const fn default_timeout_secs() -> u64 {
        30
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    #[serde(default = "HttpConfig::default_bind_addr")]
    pub bind_addr: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_addr: Self::default_bind_addr(),
        }
    }
}

impl HttpConfig {
    fn default_bind_addr() -> String {
        "0.0.0.0:5000".to_string()
    }
}

impl Config {
    /// Load and validate the configuration, failing before any session
    /// processing can begin.
    ///
    /// Reads `~/yubot/config.json` when present, otherwise falls back to the
    /// `TOKEN` and `DIALOGUE_LENGTH` environment variables.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_dir()?.join("config.json");

        let config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Self = serde_json::from_str(&content)
                .map_err(|e| anyhow::anyhow!("Invalid config at {}: {e}", config_path.display()))?;
            info!("Loaded config from {}", config_path.display());
            config
        } else {
            Self::from_env().map_err(|e| {
                anyhow::anyhow!(
                    "Config file not found at {} and environment fallback failed: {e}. \
                     Please run 'yubot init' to create config.",
                    config_path.display()
                )
            })?
        };

        config.validate()?;
        Ok(config)
    }

    /// Build a config from the `TOKEN` and `DIALOGUE_LENGTH` environment
    /// variables, the way the bot was originally deployed.
    pub fn from_env() -> anyhow::Result<Self> {
        let token =
            std::env::var("TOKEN").map_err(|_| anyhow::anyhow!("TOKEN is not set"))?;
        let length_raw = std::env::var("DIALOGUE_LENGTH")
            .map_err(|_| anyhow::anyhow!("DIALOGUE_LENGTH is not set"))?;
        let length = length_raw
            .parse::<u32>()
            .map_err(|_| anyhow::anyhow!("DIALOGUE_LENGTH must be a positive integer, got {length_raw:?}"))?;

        Ok(Self {
            telegram: TelegramConfig { token },
            dialogue: DialogueConfig { length },
            engine: EngineConfig::default(),
            http: HttpConfig::default(),
        })
    }

    /// Reject values that would let the process start in a broken state.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.telegram.token.trim().is_empty() {
            anyhow::bail!("telegram.token must be a non-empty string");
        }
        if self.dialogue.length == 0 {
            anyhow::bail!("dialogue.length must be a positive integer");
        }
        if self.engine.base_url.trim().is_empty() {
            anyhow::bail!("engine.base_url must be a non-empty string");
        }
        if self.engine.timeout_secs == 0 {
            anyhow::bail!("engine.timeout_secs must be a positive integer");
        }
        Ok(())
    }

    fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join("yubot"))
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    pub fn create_config() -> anyhow::Result<()> {
        let config_dir = Self::ensure_config_dir()?;
        let config_path = config_dir.join("config.json");

        if config_path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                config_path.display()
            );
        }

        let config_template = r#"{
  "telegram": {
    "token": "your-telegram-bot-token-here"
  },
  "dialogue": {
    "length": 15
  },
  "engine": {
    "base_url": "http://127.0.0.1:5001",
    "timeout_secs": 30
  },
  "http": {
    "bind_addr": "0.0.0.0:5000"
  }
}"#;

        std::fs::write(&config_path, config_template)?;

        println!("✅ Created config file at: {}", config_path.display());
        println!();
        println!("📝 Next steps:");
        println!("   1. Edit the config file and add your Telegram bot token");
        println!("   2. Ensure the retrieval service is reachable at engine.base_url");
        println!("   3. Run 'yubot telegram' or 'yubot serve' to start a transport");
        println!();
        Ok(())
    }
}
