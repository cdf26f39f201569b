use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;

use crate::store::{DEFAULT_FEED_LIMIT, DEFAULT_LEADERBOARD_LIMIT, DEFAULT_RECENT_CHECK_INS_LIMIT};

#[derive(Parser, Debug)]
#[command(name = "civicquest", about = "Civic engagement rewards server")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to
    #[arg(short, long)]
    pub port: Option<u16>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub limits: LimitsConfig,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Page sizes for list endpoints when the client does not ask for one.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct LimitsConfig {
    pub leaderboard: usize,
    pub recent_activity: usize,
    pub feed: usize,
    /// Upper bound on any client-supplied limit
    pub max: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            leaderboard: DEFAULT_LEADERBOARD_LIMIT,
            recent_activity: DEFAULT_RECENT_CHECK_INS_LIMIT,
            feed: DEFAULT_FEED_LIMIT,
            max: 100,
        }
    }
}

impl LimitsConfig {
    /// Missing or zero falls back to `default`; anything else is capped at `max`.
    pub fn resolve(&self, requested: Option<usize>, default: usize) -> usize {
        match requested {
            Some(n) if n > 0 => n.min(self.max),
            _ => default.min(self.max),
        }
    }
}

impl Config {
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let config_path = cli.config.clone().or_else(Self::default_path);

        let mut config = match config_path {
            Some(path) if path.exists() => {
                tracing::info!("Loading config from {}", path.display());
                let content = std::fs::read_to_string(&path)?;
                toml::from_str(&content)?
            }
            _ => Config::default(),
        };

        // CLI overrides
        if let Some(ref host) = cli.host {
            config.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            config.server.port = port;
        }

        Ok(config)
    }

    /// `~/.civicquest/config.toml`, if a home directory is known.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".civicquest").join("config.toml"))
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
