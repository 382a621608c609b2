use std::{env, fs, io, path::PathBuf};

use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_CHANNEL_CAPACITY: usize = 32;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid api url {value:?}: {reason}")]
    InvalidUrl { value: String, reason: String },
    #[error("invalid {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

/// Who is ringing up the sale. Sent with every purchase; fixed for the
/// lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalIdentity {
    pub cashier_code: String,
    pub store_code: String,
    pub terminal_no: String,
}

impl Default for TerminalIdentity {
    fn default() -> Self {
        Self {
            cashier_code: "9999999999".to_string(),
            store_code: "30".to_string(),
            terminal_no: "90".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: Url,
    pub terminal: TerminalIdentity,
    pub channel_capacity: usize,
}

/// Optional TOML file named by `POS_CONFIG`. Environment variables win over
/// anything set here.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    api_base_url: Option<String>,
    cashier_code: Option<String>,
    store_code: Option<String>,
    terminal_no: Option<String>,
    channel_capacity: Option<usize>,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let file = match env::var_os("POS_CONFIG") {
            Some(path) => {
                let path = PathBuf::from(path);
                info!(path = %path.display(), "Reading config file");
                let text = fs::read_to_string(&path)
                    .map_err(|source| ConfigError::Read { path, source })?;
                Some(text)
            }
            None => None,
        };
        Self::from_sources(file.as_deref(), |key| env::var(key).ok())
    }

    /// Builds a config from defaults, an optional TOML document, and a
    /// variable lookup, in increasing order of precedence.
    pub fn from_sources(
        file: Option<&str>,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let file: FileConfig = match file {
            Some(text) => toml::from_str(text)?,
            None => FileConfig::default(),
        };
        let defaults = TerminalIdentity::default();

        let url = pick(&var, "POS_API_URL", file.api_base_url, DEFAULT_API_URL);
        let terminal = TerminalIdentity {
            cashier_code: pick(&var, "POS_CASHIER_CODE", file.cashier_code, &defaults.cashier_code),
            store_code: pick(&var, "POS_STORE_CODE", file.store_code, &defaults.store_code),
            terminal_no: pick(&var, "POS_TERMINAL_NO", file.terminal_no, &defaults.terminal_no),
        };
        let channel_capacity = match var("POS_CHANNEL_CAPACITY") {
            Some(raw) => raw.trim().parse::<usize>().map_err(|e| ConfigError::InvalidValue {
                key: "POS_CHANNEL_CAPACITY",
                reason: format!("{e}"),
            })?,
            None => file.channel_capacity.unwrap_or_else(|| {
                info!("POS_CHANNEL_CAPACITY not set, using default: {DEFAULT_CHANNEL_CAPACITY}");
                DEFAULT_CHANNEL_CAPACITY
            }),
        };

        let config = Self {
            api_base_url: parse_url(&url)?,
            terminal,
            channel_capacity,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        // Column widths of the transaction table.
        check_code("POS_CASHIER_CODE", &self.terminal.cashier_code, 10)?;
        check_code("POS_STORE_CODE", &self.terminal.store_code, 5)?;
        check_code("POS_TERMINAL_NO", &self.terminal.terminal_no, 3)?;
        if self.channel_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                key: "POS_CHANNEL_CAPACITY",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

fn pick(
    var: &impl Fn(&str) -> Option<String>,
    key: &str,
    from_file: Option<String>,
    default: &str,
) -> String {
    var(key).or(from_file).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    })
}

fn parse_url(value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value).map_err(|e| ConfigError::InvalidUrl {
        value: value.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl {
            value: value.to_string(),
            reason: "expected an http or https base url".to_string(),
        });
    }
    Ok(url)
}

fn check_code(key: &'static str, value: &str, max_len: usize) -> Result<(), ConfigError> {
    let len = value.chars().count();
    if value.trim().is_empty() {
        Err(ConfigError::InvalidValue {
            key,
            reason: "must not be empty".to_string(),
        })
    } else if len > max_len {
        Err(ConfigError::InvalidValue {
            key,
            reason: format!("at most {max_len} characters, got {len}"),
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io;
    use std::sync::{Arc, Mutex};

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_the_fixed_register_identity() {
        let config = Config::from_sources(None, vars(&[])).unwrap();
        assert_eq!(config.api_base_url.as_str(), "http://localhost:8000/");
        assert_eq!(config.terminal, TerminalIdentity::default());
        assert_eq!(config.terminal.cashier_code, "9999999999");
        assert_eq!(config.terminal.store_code, "30");
        assert_eq!(config.terminal.terminal_no, "90");
        assert_eq!(config.channel_capacity, DEFAULT_CHANNEL_CAPACITY);
    }

    #[test]
    fn environment_overrides_file() {
        let file = r#"
            api_base_url = "http://pos-backend:8000"
            store_code = "12"
            channel_capacity = 8
        "#;
        let config =
            Config::from_sources(Some(file), vars(&[("POS_STORE_CODE", "44")])).unwrap();
        assert_eq!(config.api_base_url.as_str(), "http://pos-backend:8000/");
        assert_eq!(config.terminal.store_code, "44");
        assert_eq!(config.terminal.terminal_no, "90");
        assert_eq!(config.channel_capacity, 8);
    }

    #[test]
    fn unknown_file_keys_are_rejected() {
        let err = Config::from_sources(Some("api_url = \"x\""), vars(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_non_http_urls() {
        for bad in ["localhost:8000", "ftp://example.com", "not a url"] {
            let err = Config::from_sources(None, vars(&[("POS_API_URL", bad)])).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidUrl { .. }), "{bad}");
        }
    }

    #[test]
    fn identity_codes_must_fit_their_columns() {
        let err = Config::from_sources(None, vars(&[("POS_TERMINAL_NO", "1234")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { key: "POS_TERMINAL_NO", .. }
        ));

        let err = Config::from_sources(None, vars(&[("POS_CASHIER_CODE", " ")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { key: "POS_CASHIER_CODE", .. }
        ));
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    fn load_logged(file: Option<&str>, pairs: &[(&str, &str)]) -> (Config, String) {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let config = tracing::subscriber::with_default(subscriber, || {
            Config::from_sources(file, vars(pairs)).unwrap()
        });
        (config, logs.text())
    }

    #[test]
    fn every_defaulted_key_is_logged() {
        let (_, logs) = load_logged(None, &[]);
        for key in [
            "POS_API_URL",
            "POS_CASHIER_CODE",
            "POS_STORE_CODE",
            "POS_TERMINAL_NO",
            "POS_CHANNEL_CAPACITY",
        ] {
            assert!(logs.contains(&format!("{key} not set")), "{key} missing in {logs}");
        }
    }

    #[test]
    fn configured_keys_are_not_reported_as_defaulted() {
        let (config, logs) = load_logged(
            Some("channel_capacity = 16"),
            &[("POS_API_URL", "http://pos-backend:8000")],
        );
        assert_eq!(config.channel_capacity, 16);
        assert!(!logs.contains("POS_CHANNEL_CAPACITY not set"), "{logs}");
        assert!(!logs.contains("POS_API_URL not set"), "{logs}");
        assert!(logs.contains("POS_STORE_CODE not set"), "{logs}");
    }

    #[test]
    fn channel_capacity_must_be_positive() {
        let err =
            Config::from_sources(None, vars(&[("POS_CHANNEL_CAPACITY", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let err =
            Config::from_sources(None, vars(&[("POS_CHANNEL_CAPACITY", "lots")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }
}
