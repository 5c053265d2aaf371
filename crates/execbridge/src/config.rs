use std::io;
use std::path::{Path, PathBuf};

/// Errors raised while loading the bridge configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing config file: {}", path.display())]
    Missing { path: PathBuf },

    #[error("failed reading {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("invalid config line: {line}")]
    InvalidLine { line: String },

    #[error("no ip address defined")]
    MissingAddress,

    #[error("no valid port")]
    InvalidPort,
}

/// Flat key=value bridge configuration.
///
/// Recognized keys: `IP=` (required), `PORT=` (required, 1-65535) and `ARG=`
/// (repeatable; entries keep file order and are sent ahead of any
/// command-line arguments). Blank lines and `#` comments are skipped; every
/// other line is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub address: String,
    pub port: u16,
    pub args: Vec<String>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ConfigError::Missing {
                    path: path.to_path_buf(),
                }
            } else {
                ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut address = None;
        let mut port = None;
        let mut args = Vec::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(value) = line.strip_prefix("IP=") {
                address = Some(value.to_string());
            } else if let Some(value) = line.strip_prefix("PORT=") {
                port = value.trim().parse::<u16>().ok().filter(|p| *p > 0);
                if port.is_none() {
                    return Err(ConfigError::InvalidPort);
                }
            } else if let Some(value) = line.strip_prefix("ARG=") {
                args.push(value.to_string());
            } else {
                return Err(ConfigError::InvalidLine {
                    line: line.to_string(),
                });
            }
        }

        let address = address
            .filter(|a| !a.is_empty())
            .ok_or(ConfigError::MissingAddress)?;
        let port = port.ok_or(ConfigError::InvalidPort)?;

        Ok(Self {
            address,
            port,
            args,
        })
    }
}

/// Default config path: the executable path with `.conf` appended.
pub fn default_path() -> io::Result<PathBuf> {
    let exe = std::env::current_exe()?;
    let mut os = exe.into_os_string();
    os.push(".conf");
    Ok(PathBuf::from(os))
}
