use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub services: ServicesConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), worker_threads: Some(4) }
    }
}

/// Listening port of each service; all four share one host.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ServicesConfig {
    #[serde(default = "default_attendance_port")]
    pub attendance_port: u16,
    #[serde(default = "default_examination_port")]
    pub examination_port: u16,
    #[serde(default = "default_faculty_port")]
    pub faculty_port: u16,
    #[serde(default = "default_student_port")]
    pub student_port: u16,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            attendance_port: default_attendance_port(),
            examination_port: default_examination_port(),
            faculty_port: default_faculty_port(),
            student_port: default_student_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Reject updates whose read version is stale instead of last-writer-wins.
    #[serde(default)]
    pub optimistic_concurrency: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_dir: default_data_dir(), optimistic_concurrency: false }
    }
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_attendance_port() -> u16 { 5001 }
fn default_examination_port() -> u16 { 5000 }
fn default_faculty_port() -> u16 { 5002 }
fn default_student_port() -> u16 { 5003 }
fn default_data_dir() -> PathBuf { PathBuf::from("data") }

/// Load `CONFIG_PATH` (default `config.toml`); a missing file falls back to
/// the process environment.
pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    match std::fs::read_to_string(&path) {
        Ok(content) => parse(&content).with_context(|| format!("invalid config file {path}")),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => AppConfig::from_env(),
        Err(e) => Err(anyhow!("cannot read {path}: {e}")),
    }
}

fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Defaults overridden by `SERVER_HOST`, `TOKIO_WORKER_THREADS`,
    /// `<SERVICE>_PORT`, `DATA_DIR` and `OPTIMISTIC_CONCURRENCY`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = AppConfig::default();
        if let Some(host) = lookup("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Some(threads) = lookup("TOKIO_WORKER_THREADS") {
            cfg.server.worker_threads = Some(parse_var("TOKIO_WORKER_THREADS", &threads)?);
        }
        let ports = [
            ("ATTENDANCE_PORT", &mut cfg.services.attendance_port),
            ("EXAMINATION_PORT", &mut cfg.services.examination_port),
            ("FACULTY_PORT", &mut cfg.services.faculty_port),
            ("STUDENT_PORT", &mut cfg.services.student_port),
        ];
        for (name, slot) in ports {
            if let Some(raw) = lookup(name) {
                *slot = parse_var(name, &raw)?;
            }
        }
        if let Some(dir) = lookup("DATA_DIR") {
            cfg.storage.data_dir = PathBuf::from(dir);
        }
        if let Some(flag) = lookup("OPTIMISTIC_CONCURRENCY") {
            cfg.storage.optimistic_concurrency = parse_var("OPTIMISTIC_CONCURRENCY", &flag)?;
        }
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize();
        self.services.validate()?;
        self.storage.validate()?;
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| anyhow!("{name}={raw:?} is invalid: {e}"))
}

impl ServerConfig {
    fn normalize(&mut self) {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        match self.worker_threads {
            Some(w) if w > 0 => {}
            _ => self.worker_threads = Some(4),
        }
    }
}

impl ServicesConfig {
    fn validate(&self) -> Result<()> {
        let ports = [
            ("services.attendance_port", self.attendance_port),
            ("services.examination_port", self.examination_port),
            ("services.faculty_port", self.faculty_port),
            ("services.student_port", self.student_port),
        ];
        for (i, (name, port)) in ports.iter().enumerate() {
            if *port == 0 {
                return Err(anyhow!("{name} must be in 1..=65535"));
            }
            if let Some((other, _)) = ports[..i].iter().find(|(_, p)| p == port) {
                return Err(anyhow!("{name} and {other} both use port {port}"));
            }
        }
        Ok(())
    }
}

impl StorageConfig {
    fn validate(&self) -> Result<()> {
        if self.data_dir.as_os_str().to_string_lossy().trim().is_empty() {
            return Err(anyhow!("storage.data_dir is empty; set it in config.toml or DATA_DIR"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_match_the_published_ports() {
        let mut cfg = AppConfig::default();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.services.examination_port, 5000);
        assert_eq!(cfg.services.attendance_port, 5001);
        assert_eq!(cfg.services.faculty_port, 5002);
        assert_eq!(cfg.services.student_port, 5003);
        assert_eq!(cfg.storage.data_dir, PathBuf::from("data"));
        assert!(!cfg.storage.optimistic_concurrency);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let mut cfg = parse(
            r#"
            [server]
            host = "  "
            worker_threads = 0

            [services]
            student_port = 6003

            [storage]
            optimistic_concurrency = true
            "#,
        )
        .unwrap();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.worker_threads, Some(4));
        assert_eq!(cfg.services.student_port, 6003);
        assert_eq!(cfg.services.faculty_port, 5002);
        assert!(cfg.storage.optimistic_concurrency);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(parse("[services]\nstudent_port = \"abc\"").is_err());
    }

    #[test]
    fn duplicate_ports_are_rejected() {
        let mut cfg = AppConfig::default();
        cfg.services.faculty_port = cfg.services.student_port;
        let err = cfg.normalize_and_validate().unwrap_err().to_string();
        assert!(err.contains("services.student_port"), "{err}");
    }

    #[test]
    fn zero_port_is_rejected() {
        let mut cfg = AppConfig::default();
        cfg.services.attendance_port = 0;
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn blank_data_dir_is_rejected() {
        let mut cfg = AppConfig::default();
        cfg.storage.data_dir = PathBuf::from(" ");
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn environment_overrides_defaults() {
        let cfg = AppConfig::from_lookup(env(&[
            ("SERVER_HOST", "0.0.0.0"),
            ("TOKIO_WORKER_THREADS", "2"),
            ("FACULTY_PORT", "7002"),
            ("DATA_DIR", "/var/lib/campus"),
            ("OPTIMISTIC_CONCURRENCY", "true"),
        ]))
        .unwrap();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.worker_threads, Some(2));
        assert_eq!(cfg.services.faculty_port, 7002);
        assert_eq!(cfg.services.student_port, 5003);
        assert_eq!(cfg.storage.data_dir, PathBuf::from("/var/lib/campus"));
        assert!(cfg.storage.optimistic_concurrency);
    }

    #[test]
    fn unparsable_environment_value_is_an_error() {
        let err = AppConfig::from_lookup(env(&[("STUDENT_PORT", "lots")])).unwrap_err();
        assert!(err.to_string().contains("STUDENT_PORT"));
    }
}
