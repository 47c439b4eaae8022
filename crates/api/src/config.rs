//! Application configuration loaded from environment variables.

use url::Url;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `3000`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `PUBLIC_BASE_URL`: base for pagination links (default: `"http://localhost:3000/"`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub public_base_url: String,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: std::env::var("RUST_LOG").unwrap_or(defaults.log_level),
            public_base_url: std::env::var("PUBLIC_BASE_URL").unwrap_or(defaults.public_base_url),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Parses the public base URL. A missing trailing slash is added so that
    /// relative resource paths are joined below it.
    pub fn base_url(&self) -> Result<Url, url::ParseError> {
        let mut raw = self.public_base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        Url::parse(&raw)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            public_base_url: "http://localhost:3000/".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.public_base_url, "http://localhost:3000/");
    }

    #[test]
    fn test_addr_formatting() {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            ..Config::default()
        };
        assert_eq!(config.addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let config = Config {
            public_base_url: "https://library.example/api".to_string(),
            ..Config::default()
        };
        let url = config.base_url().unwrap();
        assert_eq!(url.as_str(), "https://library.example/api/");
        assert_eq!(
            url.join("authors").unwrap().as_str(),
            "https://library.example/api/authors"
        );
    }

    #[test]
    fn test_base_url_rejects_garbage() {
        let config = Config {
            public_base_url: "not a url".to_string(),
            ..Config::default()
        };
        assert!(config.base_url().is_err());
    }
}
