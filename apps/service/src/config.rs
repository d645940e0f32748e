use std::{env, fmt, fs, io, path};

use reachup::{DEFAULT_CHECK_INTERVAL_MS, DEFAULT_FAILURE_THRESHOLD, HostConfig, Protocol};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read config")]
    ReadFailed(#[source] io::Error),
    #[error("failed to write config")]
    WriteFailed(#[source] io::Error),
    #[error("failed to parse config")]
    ParseFailed(#[source] toml::de::Error),
    #[error("failed to serialize config")]
    SerializeFailed(#[source] toml::ser::Error),
    #[error("could not determine a config path")]
    ConfigPathUnavailable,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub monitor: Monitor,
    pub hosts: Vec<HostEntry>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Monitor {
    /// Publish and log only status changes instead of every completed check.
    pub changes_only: bool,
}

/// One monitored endpoint as written in the config file.
#[derive(Debug, Serialize, Deserialize)]
pub struct HostEntry {
    pub id: String,
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub protocol: Protocol,
    #[serde(default = "default_check_interval_ms")]
    pub check_interval_ms: u64,
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: u32,
}

fn default_check_interval_ms() -> u64 {
    DEFAULT_CHECK_INTERVAL_MS
}

fn default_failure_threshold() -> u32 {
    DEFAULT_FAILURE_THRESHOLD
}

impl HostEntry {
    pub fn to_config(&self) -> HostConfig {
        HostConfig {
            id: self.id.clone(),
            host: self.host.clone(),
            port: self.port,
            protocol: self.protocol,
            check_interval_ms: self.check_interval_ms,
            failure_threshold: self.failure_threshold,
        }
    }
}

/// Used to ensure we are actually reading a toml file
fn normalize_toml_path(path: &path::Path) -> path::PathBuf {
    let mut path = path.to_path_buf();
    if path.extension().map(|ext| ext != "toml").unwrap_or(true) {
        path.set_extension("toml");
    }
    path
}

/// Get default config path ($XDG_CONFIG_HOME/reachup/config.toml or
/// $HOME/.config/...)
fn default_config_path() -> Result<path::PathBuf, Error> {
    let path = if let Ok(config_home) = env::var("XDG_CONFIG_HOME") {
        path::PathBuf::from(config_home)
    } else if let Some(home_dir) = env::home_dir() {
        home_dir.join(".config")
    } else {
        return Err(Error::ConfigPathUnavailable);
    };

    Ok(path.join("reachup/config.toml"))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            monitor: Monitor::default(),
            hosts: vec![
                HostEntry {
                    id: "google-http".into(),
                    host: "google.com".into(),
                    port: 80,
                    protocol: Protocol::Tcp,
                    check_interval_ms: 10_000,
                    failure_threshold: 3,
                },
                HostEntry {
                    id: "google-dns".into(),
                    host: "8.8.8.8".into(),
                    port: 53,
                    protocol: Protocol::Udp,
                    check_interval_ms: 15_000,
                    failure_threshold: 3,
                },
            ],
        }
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let write_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str, value: &dyn fmt::Display| {
                writeln!(f, "  {:indent$}{}: {}", "", label, value, indent = level * 2)
            }
        };
        let write_title_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str| {
                writeln!(f, "{:indent$}{}", "", label, indent = level * 2)
            }
        };

        let write_title_1 = write_title_indented(1);
        let write_1 = write_indented(1);

        writeln!(f, "Current Internal Configuration State:")?;
        write_title_1(f, "Monitor")?;
        write_1(f, "Changes Only", &self.monitor.changes_only)?;

        write_title_1(f, "Hosts")?;
        for entry in &self.hosts {
            write_1(
                f,
                &entry.id,
                &format!(
                    "{}:{}/{} every {}ms, threshold {}",
                    entry.host,
                    entry.port,
                    entry.protocol,
                    entry.check_interval_ms,
                    entry.failure_threshold
                ),
            )?;
        }

        Ok(())
    }
}

impl Config {
    /// Generate Config structure from file
    ///
    /// Creates a default config in ~/.config/reachup/config.toml
    ///  or the specified path, with the name config.toml if one does not exist
    ///
    /// ```rust
    /// let cfg = config::Config::from_config(None::<&path::Path>)?;
    /// println!("{}", cfg);
    /// ```
    pub fn from_config(optional_path: Option<impl AsRef<path::Path>>) -> Result<Self, Error> {
        let config_path: path::PathBuf = if let Some(path) = optional_path {
            normalize_toml_path(path.as_ref())
        } else {
            default_config_path()?
        };

        if config_path.exists() {
            let raw_string = fs::read_to_string(&config_path).map_err(Error::ReadFailed)?;
            toml::from_str(raw_string.as_str()).map_err(Error::ParseFailed)
        } else {
            let config = Self::default();
            config.write_config(&config_path)?;
            Ok(config)
        }
    }

    /// Serialize and write a config to a file
    pub fn write_config(&self, path: &std::path::Path) -> Result<(), Error> {
        let config_str: String = toml::to_string_pretty(self).map_err(Error::SerializeFailed)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(Error::WriteFailed)?;
        }

        std::fs::write(path, config_str).map_err(Error::WriteFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = Config::from_config(Some(&path)).unwrap();

        assert!(path.exists());
        assert_eq!(config.hosts.len(), 2);
        assert!(!config.monitor.changes_only);

        // The written file parses back to the same defaults.
        let reread = Config::from_config(Some(&path)).unwrap();
        assert_eq!(reread.hosts.len(), config.hosts.len());
        assert_eq!(reread.hosts[0].id, "google-http");
    }

    #[test]
    fn test_partial_entries_get_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[[hosts]]
id = "db"
host = "db.internal"
port = 5432
"#,
        )
        .unwrap();

        let config = Config::from_config(Some(&path)).unwrap();

        assert_eq!(config.hosts.len(), 1);
        let entry = &config.hosts[0];
        assert_eq!(entry.protocol, Protocol::Tcp);
        assert_eq!(entry.check_interval_ms, DEFAULT_CHECK_INTERVAL_MS);
        assert_eq!(entry.failure_threshold, DEFAULT_FAILURE_THRESHOLD);

        let host_config = entry.to_config();
        assert_eq!(host_config.id, "db");
        assert_eq!(host_config.port, 5432);
    }

    #[test]
    fn test_invalid_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "hosts = 12").unwrap();

        let err = Config::from_config(Some(&path)).unwrap_err();
        assert!(matches!(err, Error::ParseFailed(_)));
    }

    #[test]
    fn test_non_toml_extension_is_normalized() {
        let normalized = normalize_toml_path(path::Path::new("/tmp/reachup/config.txt"));
        assert_eq!(normalized, path::PathBuf::from("/tmp/reachup/config.toml"));
    }
}
