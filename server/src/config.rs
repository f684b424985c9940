use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;

const DEFAULT_PORT: u16 = 8787;
const DEFAULT_CONFIG_PATH: &str = "config/creator_hub.toml";

/// Command line options for the creator hub server.
#[derive(Parser, Debug, Default)]
#[command(author, version, about)]
pub struct Cli {
    /// Full bind address (host:port); wins over `--port`.
    #[arg(long)]
    pub bind: Option<String>,
    /// Port to listen on at 127.0.0.1.
    #[arg(long)]
    pub port: Option<u16>,
    /// Request logging at INFO (true) or WARN only (false).
    #[arg(long)]
    pub logging: Option<bool>,
    /// TOML config file.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Start with an empty marketplace.
    #[arg(long)]
    pub no_seed: bool,
}

/// Settings the server runs with.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind: String,
    pub logging_enabled: bool,
    /// Load the sample creators, services and conversations at startup.
    pub seed_sample_data: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: format!("127.0.0.1:{DEFAULT_PORT}"),
            logging_enabled: true,
            seed_sample_data: true,
        }
    }
}

/// One configuration source. Unset fields leave the lower layer alone.
#[derive(Debug, Default)]
struct Overrides {
    port: Option<u16>,
    logging: Option<bool>,
    seed: Option<bool>,
    bind: Option<String>,
}

impl Overrides {
    fn apply(self, onto: &mut Overrides) {
        onto.port = self.port.or(onto.port);
        onto.logging = self.logging.or(onto.logging);
        onto.seed = self.seed.or(onto.seed);
        onto.bind = self.bind.or(onto.bind.take());
    }
}

#[derive(Deserialize, Default)]
struct FileConfig {
    #[serde(default)]
    server: FileServer,
    #[serde(default)]
    logging: FileLogging,
    #[serde(default)]
    data: FileData,
}

#[derive(Deserialize, Default)]
struct FileServer {
    port: Option<u16>,
}

#[derive(Deserialize, Default)]
struct FileLogging {
    enabled: Option<bool>,
}

#[derive(Deserialize, Default)]
struct FileData {
    seed: Option<bool>,
}

fn from_file(path: &Path) -> Result<Overrides> {
    let Ok(bytes) = fs::read(path) else {
        return Ok(Overrides::default());
    };
    let file: FileConfig = toml::from_str(&String::from_utf8_lossy(&bytes))
        .with_context(|| format!("invalid config file {}", path.display()))?;
    Ok(Overrides {
        port: file.server.port,
        logging: file.logging.enabled,
        seed: file.data.seed,
        bind: None,
    })
}

/// Unparseable values are ignored.
fn env_value<T: FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok()?.parse().ok()
}

fn from_env() -> Overrides {
    Overrides {
        port: env_value("CREATOR_HUB_PORT"),
        logging: env_value("CREATOR_HUB_LOGGING"),
        seed: None,
        bind: std::env::var("BIND").ok(),
    }
}

fn from_cli(cli: &Cli) -> Overrides {
    Overrides {
        port: cli.port,
        logging: cli.logging,
        seed: cli.no_seed.then_some(false),
        bind: cli.bind.clone(),
    }
}

impl Config {
    /// Layer defaults, the config file, environment and CLI, later layers
    /// winning.
    pub fn load(cli: &Cli) -> Result<Self> {
        let path = cli
            .config
            .clone()
            .or_else(|| std::env::var("CREATOR_HUB_CONFIG").ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

        let mut merged = Overrides::default();
        for layer in [from_file(&path)?, from_env(), from_cli(cli)] {
            layer.apply(&mut merged);
        }

        let port = merged.port.unwrap_or(DEFAULT_PORT);
        if port < 1024 {
            anyhow::bail!("invalid_port: {port} is below 1024");
        }
        let defaults = Self::default();
        Ok(Self {
            bind: merged.bind.unwrap_or_else(|| format!("127.0.0.1:{port}")),
            logging_enabled: merged.logging.unwrap_or(defaults.logging_enabled),
            seed_sample_data: merged.seed.unwrap_or(defaults.seed_sample_data),
        })
    }
}
