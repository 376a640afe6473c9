use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
pub const DEFAULT_DATABASE: &str = "database.sqlite";
pub const PORT_ENV: &str = "PORT";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UserbaseConfig {
    pub database: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Fully resolved settings for `serve`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub host: IpAddr,
    pub port: u16,
    pub database: PathBuf,
}

/// Values supplied on the command line; `None` means not given
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub host: Option<IpAddr>,
    pub port: Option<u16>,
    pub database: Option<PathBuf>,
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("userbase.toml")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<UserbaseConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: UserbaseConfig = toml::from_str(&contents)?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &UserbaseConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Flag, then config file, then default
pub fn resolve_database(flag: Option<PathBuf>, config: Option<&UserbaseConfig>) -> PathBuf {
    flag.or_else(|| config.and_then(|c| c.database.as_ref()).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE))
}

/// Flag, then `PORT` value, then config file, then default
pub fn resolve_port(
    flag: Option<u16>,
    env: Option<&str>,
    config: Option<&UserbaseConfig>,
) -> anyhow::Result<u16> {
    if let Some(port) = flag {
        return Ok(port);
    }
    if let Some(raw) = env {
        return raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid {} value: {:?}", PORT_ENV, raw));
    }
    Ok(config.and_then(|c| c.port).unwrap_or(DEFAULT_PORT))
}

pub fn resolve_host(flag: Option<IpAddr>, config: Option<&UserbaseConfig>) -> anyhow::Result<IpAddr> {
    if let Some(host) = flag {
        return Ok(host);
    }
    match config.and_then(|c| c.host.as_deref()) {
        Some(raw) => raw
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid host in config: {:?}", raw)),
        None => Ok(DEFAULT_HOST),
    }
}

impl ServerSettings {
    /// Resolve settings from flags, the process environment and the config file
    pub fn resolve(overrides: Overrides, config: Option<&UserbaseConfig>) -> anyhow::Result<Self> {
        let env_port = std::env::var(PORT_ENV).ok();
        Ok(Self {
            host: resolve_host(overrides.host, config)?,
            port: resolve_port(overrides.port, env_port.as_deref(), config)?,
            database: resolve_database(overrides.database, config),
        })
    }
}
