use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use url::Url;

use crate::{
    error::ConfigError, BACKEND_HOST, BACKEND_NAME_ENV, BACKEND_PORT_ENV, DEFAULT_BACKEND_NAME,
    DEFAULT_BACKEND_PORT, LAUNCHER_CONFIG_FILE,
};

/// The backend's loopback HTTPS address. Only the port is configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    port: u16,
}

impl Endpoint {
    pub fn new(port: u16) -> Self {
        Self { port }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn url(&self) -> Url {
        // Scheme and host are constants, so this cannot fail for any u16.
        Url::parse(&format!("https://{BACKEND_HOST}:{}/", self.port))
            .expect("loopback endpoint url is always valid")
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::new(DEFAULT_BACKEND_PORT)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherConfig {
    pub backend_name: String,
    pub port: u16,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            backend_name: DEFAULT_BACKEND_NAME.to_string(),
            port: DEFAULT_BACKEND_PORT,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LauncherConfigFile {
    backend_name: Option<String>,
    port: Option<u16>,
}

pub fn launcher_config_path(root_dir: &Path) -> PathBuf {
    root_dir.join(LAUNCHER_CONFIG_FILE)
}

/// Environment first, then `launcher.json` under the root dir, then defaults.
/// Invalid values are logged and skipped; this never fails.
pub fn resolve_launcher_config<E, F>(
    root_dir: Option<&Path>,
    env_lookup: E,
    log: F,
) -> LauncherConfig
where
    E: Fn(&str) -> Option<String>,
    F: Fn(&str),
{
    let file_config = match root_dir {
        Some(root) => match read_config_file(&launcher_config_path(root)) {
            Ok(config) => config,
            Err(error) => {
                log(&format!("{error}; using defaults"));
                LauncherConfigFile::default()
            }
        },
        None => LauncherConfigFile::default(),
    };

    let env_name = env_lookup(BACKEND_NAME_ENV).and_then(|raw| match validate_backend_name(&raw) {
        Ok(name) => Some(name),
        Err(error) => {
            log(&format!("ignoring {BACKEND_NAME_ENV}: {error}"));
            None
        }
    });
    let file_name = file_config
        .backend_name
        .and_then(|raw| match validate_backend_name(&raw) {
            Ok(name) => Some(name),
            Err(error) => {
                log(&format!("ignoring backendName in {LAUNCHER_CONFIG_FILE}: {error}"));
                None
            }
        });

    let env_port = env_lookup(BACKEND_PORT_ENV).and_then(|raw| match parse_port(&raw) {
        Ok(port) => Some(port),
        Err(error) => {
            log(&format!("ignoring {BACKEND_PORT_ENV}: {error}"));
            None
        }
    });
    let file_port = file_config.port.and_then(|port| {
        if port == 0 {
            log(&format!(
                "ignoring port in {LAUNCHER_CONFIG_FILE}: {}",
                ConfigError::InvalidPort(port.to_string())
            ));
            return None;
        }
        Some(port)
    });

    let defaults = LauncherConfig::default();
    LauncherConfig {
        backend_name: env_name.or(file_name).unwrap_or(defaults.backend_name),
        port: env_port.or(file_port).unwrap_or(defaults.port),
    }
}

fn read_config_file(path: &Path) -> Result<LauncherConfigFile, ConfigError> {
    if !path.is_file() {
        return Ok(LauncherConfigFile::default());
    }

    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    match raw.trim().parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(ConfigError::InvalidPort(raw.to_string())),
    }
}

/// The name doubles as an on-disk file name and a kill-by-name target.
pub fn validate_backend_name(raw: &str) -> Result<String, ConfigError> {
    let name = raw.trim();
    let invalid = name.is_empty()
        || name.contains("..")
        || name.contains(['/', '\\'])
        || name.chars().any(char::is_whitespace);
    if invalid {
        return Err(ConfigError::InvalidBackendName(raw.to_string()));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, collections::HashMap};

    use super::*;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn endpoint_url_is_https_loopback() {
        assert_eq!(Endpoint::default().url().as_str(), "https://127.0.0.1:5050/");
    }

    #[test]
    fn parse_port_rejects_zero_and_garbage() {
        assert_eq!(parse_port(" 5051 ").unwrap(), 5051);
        assert!(matches!(parse_port("0"), Err(ConfigError::InvalidPort(_))));
        assert!(matches!(parse_port("70000"), Err(ConfigError::InvalidPort(_))));
        assert!(matches!(parse_port("abc"), Err(ConfigError::InvalidPort(_))));
    }

    #[test]
    fn validate_backend_name_rejects_paths() {
        assert_eq!(validate_backend_name(" plantgrower ").unwrap(), "plantgrower");
        for bad in ["", "../evil", "a/b", "a\\b", "two words"] {
            assert!(validate_backend_name(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn resolve_uses_defaults_without_sources() {
        let config = resolve_launcher_config(None, env_from(&[]), |_| {});
        assert_eq!(config, LauncherConfig::default());
    }

    #[test]
    fn resolve_env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            launcher_config_path(dir.path()),
            r#"{"backendName":"plantgrower","port":6000}"#,
        )
        .unwrap();

        let from_file = resolve_launcher_config(Some(dir.path()), env_from(&[]), |_| {});
        assert_eq!(from_file.backend_name, "plantgrower");
        assert_eq!(from_file.port, 6000);

        let from_env = resolve_launcher_config(
            Some(dir.path()),
            env_from(&[(BACKEND_PORT_ENV, "7000")]),
            |_| {},
        );
        assert_eq!(from_env.backend_name, "plantgrower");
        assert_eq!(from_env.port, 7000);
    }

    #[test]
    fn resolve_logs_and_skips_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(launcher_config_path(dir.path()), "{not json").unwrap();
        let lines = RefCell::new(Vec::new());

        let config = resolve_launcher_config(
            Some(dir.path()),
            env_from(&[(BACKEND_NAME_ENV, "../x"), (BACKEND_PORT_ENV, "0")]),
            |line| lines.borrow_mut().push(line.to_string()),
        );

        assert_eq!(config, LauncherConfig::default());
        let lines = lines.into_inner();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("failed to parse launcher config"));
        assert!(lines[1].contains(BACKEND_NAME_ENV));
        assert!(lines[2].contains(BACKEND_PORT_ENV));
    }
}
