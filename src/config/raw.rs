use duration_str::deserialize_option_duration;
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_CONFIG_FILE: &str = include_str!("study604.default.toml");

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub store: Option<Store>,
    pub explore: Option<Explore>,
}

impl Default for Config {
    fn default() -> Self {
        let cfg: Self = toml::from_str(DEFAULT_CONFIG_FILE).expect("Default configuration");
        cfg
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Store {
    pub url: Option<String>,
    pub api_key: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_duration")]
    pub timeout: Option<Duration>,
}

impl Default for Store {
    fn default() -> Self {
        Config::default().store.expect("Store configuration")
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Explore {
    pub near_limit: Option<usize>,
    pub popular_limit: Option<usize>,
}

impl Default for Explore {
    fn default() -> Self {
        Config::default().explore.expect("Explore configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_default_config_from_file() {
        let cfg: Config = toml::from_str(DEFAULT_CONFIG_FILE).unwrap();
        let store = cfg.store.unwrap();
        assert!(store.url.is_none());
        assert!(store.api_key.is_none());
        assert_eq!(Some(Duration::from_secs(15)), store.timeout);
        let explore = cfg.explore.unwrap();
        assert_eq!(Some(5), explore.near_limit);
        assert_eq!(Some(5), explore.popular_limit);
    }

    #[test]
    fn parse_partial_config() {
        let cfg: Config = toml::from_str(
            r#"
            [store]
            url = "https://db.example.org"
            api-key = "secret"
            timeout = "2m"
            "#,
        )
        .unwrap();
        let store = cfg.store.unwrap();
        assert_eq!(Some("secret"), store.api_key.as_deref());
        assert_eq!(Some(Duration::from_secs(120)), store.timeout);
        assert!(cfg.explore.is_none());
    }
}
