use serde::Deserialize;
use std::time::Duration;

/// Client settings, loadable from an optional YAML file.
///
/// `RAWGET_CONFIG` names the file; without it (or if the file cannot be
/// read or parsed) the defaults below apply. Default timeouts: 5000 ms
/// receive, 1000 ms send.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory downloaded files are saved under.
    pub output_dir: String,
    /// Server port; plaintext HTTP only.
    pub port: u16,
    pub recv_timeout_ms: u64,
    pub send_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: ".".to_string(),
            port: 80,
            recv_timeout_ms: 5000,
            send_timeout_ms: 1000,
        }
    }
}

impl Config {
    pub fn load() -> Self {
        let Ok(path) = std::env::var("RAWGET_CONFIG") else {
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(text) => serde_yaml::from_str(&text).unwrap_or_else(|e| {
                tracing::warn!("Invalid config {}: {}, using defaults", path, e);
                Self::default()
            }),
            Err(e) => {
                tracing::warn!("Cannot read config {}: {}, using defaults", path, e);
                Self::default()
            }
        }
    }

    pub fn recv_timeout(&self) -> Duration {
        Duration::from_millis(self.recv_timeout_ms)
    }

    pub fn send_timeout(&self) -> Duration {
        Duration::from_millis(self.send_timeout_ms)
    }
}
