use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::time::Duration;

pub const PEXELS_API_BASE: &str = "https://api.pexels.com";
pub const SHOTSTACK_API_BASE: &str = "https://api.shotstack.io";

/// Which Shotstack environment renders are submitted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotstackEnv {
    Stage,
    Production,
}

impl ShotstackEnv {
    pub fn path(&self) -> &'static str {
        match self {
            ShotstackEnv::Stage => "stage",
            ShotstackEnv::Production => "v1",
        }
    }

    fn parse(value: &str) -> Self {
        match value.trim() {
            "v1" => ShotstackEnv::Production,
            _ => ShotstackEnv::Stage,
        }
    }
}

/// Everything the daemon reads from its environment, resolved once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub addr: SocketAddr,
    pub log_filter: String,
    pub pexels_api_key: Option<String>,
    pub pexels_base_url: String,
    pub search_timeout: Duration,
    pub shotstack_api_key: Option<String>,
    pub shotstack_env: ShotstackEnv,
    pub shotstack_base_url: String,
    pub render_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            addr: SocketAddr::from(([127, 0, 0, 1], 7777)),
            log_filter: "info".to_string(),
            pexels_api_key: None,
            pexels_base_url: PEXELS_API_BASE.to_string(),
            search_timeout: Duration::from_secs(10),
            shotstack_api_key: None,
            shotstack_env: ShotstackEnv::Stage,
            shotstack_base_url: SHOTSTACK_API_BASE.to_string(),
            render_timeout: Duration::from_secs(30),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Missing API keys are allowed here;
    /// requests that need them fail with a configuration error instead.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = AppConfig::default();

        if let Some(addr) = get("DAEMON_ADDR") {
            config.addr = addr
                .parse()
                .with_context(|| format!("DAEMON_ADDR is not a socket address: {addr}"))?;
        }
        if let Some(filter) = get("LOG_FILTER") {
            config.log_filter = filter;
        }
        config.pexels_api_key = get("PEXELS_API_KEY");
        if let Some(base) = get("PEXELS_BASE_URL") {
            config.pexels_base_url = base.trim_end_matches('/').to_string();
        }
        if let Some(secs) = get("SEARCH_TIMEOUT_SECS") {
            config.search_timeout = parse_secs("SEARCH_TIMEOUT_SECS", &secs)?;
        }
        config.shotstack_api_key = get("SHOTSTACK_API_KEY");
        if let Some(env) = get("SHOTSTACK_ENV") {
            config.shotstack_env = ShotstackEnv::parse(&env);
        }
        if let Some(base) = get("SHOTSTACK_BASE_URL") {
            config.shotstack_base_url = base.trim_end_matches('/').to_string();
        }
        if let Some(secs) = get("RENDER_TIMEOUT_SECS") {
            config.render_timeout = parse_secs("RENDER_TIMEOUT_SECS", &secs)?;
        }

        Ok(config)
    }

    pub fn shotstack_render_url(&self) -> String {
        format!("{}/{}/render", self.shotstack_base_url, self.shotstack_env.path())
    }
}

fn parse_secs(key: &str, value: &str) -> Result<Duration> {
    let secs: u64 = value
        .parse()
        .with_context(|| format!("{key} must be a whole number of seconds, got {value}"))?;
    Ok(Duration::from_secs(secs.max(1)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.addr.port(), 7777);
        assert!(config.pexels_api_key.is_none());
        assert_eq!(config.shotstack_render_url(), "https://api.shotstack.io/stage/render");
        assert_eq!(config.render_timeout, Duration::from_secs(30));
    }

    #[test]
    fn reads_keys_and_production_env() {
        let config = AppConfig::from_lookup(lookup(&[
            ("PEXELS_API_KEY", " px-key "),
            ("SHOTSTACK_API_KEY", "ss-key"),
            ("SHOTSTACK_ENV", "v1"),
            ("RENDER_TIMEOUT_SECS", "45"),
            ("SHOTSTACK_BASE_URL", "http://localhost:9000/"),
        ]))
        .unwrap();
        assert_eq!(config.pexels_api_key.as_deref(), Some("px-key"));
        assert_eq!(config.shotstack_render_url(), "http://localhost:9000/v1/render");
        assert_eq!(config.render_timeout, Duration::from_secs(45));
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let config = AppConfig::from_lookup(lookup(&[("SHOTSTACK_API_KEY", "  ")])).unwrap();
        assert!(config.shotstack_api_key.is_none());
    }

    #[test]
    fn bad_timeout_is_an_error() {
        assert!(AppConfig::from_lookup(lookup(&[("SEARCH_TIMEOUT_SECS", "soon")])).is_err());
    }
}
