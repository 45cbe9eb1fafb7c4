use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::lookup_host;

use crate::error::{GalleryError, GalleryResult};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DATA_FILE: &str = "data/graphs.json";
const DEFAULT_STATIC_DIR: &str = "public";
const DEFAULT_DESMOS_BASE_URL: &str = "https://www.desmos.com";

/// Server settings, read from the environment
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,

    /// JSON file holding the graph collection
    pub data_file: PathBuf,

    /// Directory served for every path no API route claims
    pub static_dir: PathBuf,

    /// Origin the widget scripts are fetched from
    pub desmos_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            desmos_base_url: DEFAULT_DESMOS_BASE_URL.to_string(),
        }
    }
}

impl Config {
    /// Build the configuration from the process environment
    ///
    /// # Variables
    /// * `HOST`, `PORT` - listen address
    /// * `GALLERY_DATA_FILE` - path of the JSON data file
    /// * `GALLERY_STATIC_DIR` - directory of static assets
    /// * `DESMOS_BASE_URL` - upstream for the widget scripts
    pub fn from_env() -> GalleryResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, with variables resolved through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> GalleryResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(host) = lookup("HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("PORT") {
            config.port = port
                .parse()
                .map_err(|_| GalleryError::Config(format!("PORT must be a port number, got '{}'", port)))?;
        }
        if let Some(path) = lookup("GALLERY_DATA_FILE") {
            config.data_file = PathBuf::from(path);
        }
        if let Some(dir) = lookup("GALLERY_STATIC_DIR") {
            config.static_dir = PathBuf::from(dir);
        }
        if let Some(url) = lookup("DESMOS_BASE_URL") {
            config.desmos_base_url = url.trim_end_matches('/').to_string();
        }

        Ok(config)
    }

    /// Resolve `host:port` to the address the server binds
    ///
    /// `host` may be an IP literal or a name such as `localhost`.
    ///
    /// # Returns
    /// * `GalleryResult<SocketAddr>` - The first resolved address, or a config error
    pub async fn socket_addr(&self) -> GalleryResult<SocketAddr> {
        let invalid = || GalleryError::Config(format!("invalid listen address {}:{}", self.host, self.port));

        let mut addrs = lookup_host((self.host.as_str(), self.port))
            .await
            .map_err(|_| invalid())?;
        addrs.next().ok_or_else(invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[tokio::test]
    async fn defaults_apply_when_nothing_is_set() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.socket_addr().await.unwrap().port(), 3000);
    }

    #[tokio::test]
    async fn variables_override_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("HOST", "0.0.0.0"),
            ("GALLERY_DATA_FILE", "/tmp/g.json"),
            ("DESMOS_BASE_URL", "http://localhost:9000/"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.data_file, PathBuf::from("/tmp/g.json"));
        assert_eq!(config.desmos_base_url, "http://localhost:9000");
        assert_eq!(config.socket_addr().await.unwrap().to_string(), "0.0.0.0:8080");
    }

    #[tokio::test]
    async fn host_names_resolve() {
        let config = Config::from_lookup(lookup_from(&[("HOST", "localhost"), ("PORT", "4000")])).unwrap();

        let addr = config.socket_addr().await.unwrap();
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), 4000);
    }

    #[test]
    fn bad_port_is_a_config_error() {
        let result = Config::from_lookup(lookup_from(&[("PORT", "http")]));
        assert!(matches!(result, Err(GalleryError::Config(_))));
    }
}
