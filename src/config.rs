use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Last.fm API key
    pub lastfm_api_key: String,

    /// Last.fm user whose recent tracks seed the recommendations
    pub lastfm_username: String,

    /// Last.fm API base URL
    #[serde(default = "default_lastfm_api_url")]
    pub lastfm_api_url: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Lookups in flight when a request does not say otherwise
    #[serde(default = "default_concurrency")]
    pub default_concurrency: usize,

    /// Minimum match score when a request does not say otherwise
    #[serde(default = "default_threshold")]
    pub default_threshold: f64,

    /// Number of recently played tracks pulled as seeds
    #[serde(default = "default_seed_limit")]
    pub seed_limit: u32,

    /// Number of similar tracks requested per seed
    #[serde(default = "default_similar_limit")]
    pub similar_limit: u32,

    /// Upper bound on one Last.fm call, in seconds
    #[serde(default = "default_lastfm_timeout_secs")]
    pub lastfm_timeout_secs: u64,
}

fn default_lastfm_api_url() -> String {
    "http://ws.audioscrobbler.com/2.0/".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_concurrency() -> usize {
    5
}

fn default_threshold() -> f64 {
    0.0
}

fn default_seed_limit() -> u32 {
    50
}

fn default_similar_limit() -> u32 {
    10
}

fn default_lastfm_timeout_secs() -> u64 {
    10
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

        if config.default_concurrency == 0 {
            anyhow::bail!("DEFAULT_CONCURRENCY must be at least 1");
        }
        if !(0.0..=1.0).contains(&config.default_threshold) {
            anyhow::bail!("DEFAULT_THRESHOLD must be within [0, 1]");
        }
        if config.lastfm_timeout_secs == 0 {
            anyhow::bail!("LASTFM_TIMEOUT_SECS must be at least 1");
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_vars(vars(&[
            ("LASTFM_API_KEY", "key"),
            ("LASTFM_USERNAME", "listener"),
        ]))
        .unwrap();

        assert_eq!(config.lastfm_api_url, "http://ws.audioscrobbler.com/2.0/");
        assert_eq!(config.port, 3000);
        assert_eq!(config.default_concurrency, 5);
        assert_eq!(config.default_threshold, 0.0);
        assert_eq!(config.seed_limit, 50);
        assert_eq!(config.similar_limit, 10);
        assert_eq!(config.lastfm_timeout_secs, 10);
    }

    #[test]
    fn test_timeout_override_and_zero_rejected() {
        let config = Config::from_vars(vars(&[
            ("LASTFM_API_KEY", "key"),
            ("LASTFM_USERNAME", "listener"),
            ("LASTFM_TIMEOUT_SECS", "3"),
        ]))
        .unwrap();
        assert_eq!(config.lastfm_timeout_secs, 3);

        let result = Config::from_vars(vars(&[
            ("LASTFM_API_KEY", "key"),
            ("LASTFM_USERNAME", "listener"),
            ("LASTFM_TIMEOUT_SECS", "0"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_credentials_rejected() {
        let result = Config::from_vars(vars(&[("LASTFM_USERNAME", "listener")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let result = Config::from_vars(vars(&[
            ("LASTFM_API_KEY", "key"),
            ("LASTFM_USERNAME", "listener"),
            ("DEFAULT_CONCURRENCY", "0"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_threshold_out_of_range_rejected() {
        let result = Config::from_vars(vars(&[
            ("LASTFM_API_KEY", "key"),
            ("LASTFM_USERNAME", "listener"),
            ("DEFAULT_THRESHOLD", "1.5"),
        ]));
        assert!(result.is_err());
    }
}
