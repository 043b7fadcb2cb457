//! Runtime settings: CLI flags over environment (`.env` included) over defaults.

use std::path::PathBuf;

use crate::data::DEFAULT_BASE_URL;

pub const ENV_BASE_URL: &str = "COVID_DASH_BASE_URL";
pub const ENV_DATA_DIR: &str = "COVID_DASH_DATA_DIR";

/// Log file used while the TUI owns the terminal.
pub const LOG_FILE_NAME: &str = "covid-dash.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub data_dir: PathBuf,
}

impl Settings {
    /// Resolve settings from CLI overrides and the process environment.
    pub fn resolve(base_url: Option<String>, data_dir: Option<PathBuf>) -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(base_url, data_dir, |key| std::env::var(key).ok())
    }

    fn from_lookup(
        base_url: Option<String>,
        data_dir: Option<PathBuf>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let env = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let base_url = base_url
            .or_else(|| env(ENV_BASE_URL))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let data_dir = data_dir
            .or_else(|| env(ENV_DATA_DIR).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("."));

        Self { base_url, data_dir }
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_env_which_overrides_defaults() {
        let env = |key: &str| match key {
            ENV_BASE_URL => Some("http://localhost:3000".to_string()),
            ENV_DATA_DIR => Some("/var/covid".to_string()),
            _ => None,
        };

        let from_env = Settings::from_lookup(None, None, env);
        assert_eq!(from_env.base_url, "http://localhost:3000");
        assert_eq!(from_env.data_dir, PathBuf::from("/var/covid"));

        let from_flags = Settings::from_lookup(Some("http://x".to_string()), Some(PathBuf::from("data")), env);
        assert_eq!(from_flags.base_url, "http://x");
        assert_eq!(from_flags.log_path(), PathBuf::from("data").join(LOG_FILE_NAME));

        let defaults = Settings::from_lookup(None, None, |_| Some("  ".to_string()));
        assert_eq!(defaults.base_url, DEFAULT_BASE_URL);
        assert_eq!(defaults.data_dir, PathBuf::from("."));
    }
}
