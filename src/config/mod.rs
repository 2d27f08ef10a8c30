use anyhow::{anyhow, Result};
use std::{env, fs, io::ErrorKind, path::Path, time::Duration};

mod raw;

const DEFAULT_CONFIG_FILE_NAME: &str = "study604.toml";

const ENV_NAME_STORE_URL: &str = "STUDY604_STORE_URL";
const ENV_NAME_API_KEY: &str = "STUDY604_API_KEY";

const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(15);
const DEFAULT_LIST_LIMIT: usize = 5;

#[derive(Debug)]
pub struct Config {
    pub store: Store,
    pub explore: Explore,
}

impl Config {
    pub fn try_load_from_file_or_default<P: AsRef<Path>>(file_path: Option<P>) -> Result<Self> {
        let file_path: &Path = file_path.as_ref().map(|p| p.as_ref()).unwrap_or_else(|| {
            log::debug!("No configuration file specified. load {DEFAULT_CONFIG_FILE_NAME}");
            Path::new(DEFAULT_CONFIG_FILE_NAME)
        });

        let raw_config = match fs::read_to_string(file_path) {
            Ok(cfg_string) => toml::from_str(&cfg_string)?,
            Err(err) => match err.kind() {
                ErrorKind::NotFound => {
                    log::debug!(
                        "{} not found => load default configuration.",
                        file_path.display()
                    );
                    Ok(raw::Config::default())
                }
                _ => Err(err),
            }?,
        };
        let mut cfg = Self::try_from(raw_config)?;
        cfg.apply_env_overrides(|name| env::var(name).ok());
        Ok(cfg)
    }

    fn apply_env_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = var(ENV_NAME_STORE_URL) {
            self.store.url = Some(url);
        }
        if let Some(api_key) = var(ENV_NAME_API_KEY) {
            self.store.api_key = Some(api_key);
        }
    }
}

pub struct Store {
    /// Base URL of the hosted store
    pub url: Option<String>,
    pub api_key: Option<String>,
    /// Upper bound of every single request
    pub timeout: Duration,
}

// Keeps the API key out of the logs
impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("url", &self.url)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug)]
pub struct Explore {
    pub near_limit: usize,
    pub popular_limit: usize,
}

impl TryFrom<raw::Config> for Config {
    type Error = anyhow::Error;
    fn try_from(from: raw::Config) -> Result<Self> {
        let raw::Config { store, explore } = from;

        let raw::Store {
            url,
            api_key,
            timeout,
        } = store.unwrap_or_default();
        if url.as_deref().is_some_and(|url| url.trim().is_empty()) {
            return Err(anyhow!("Empty store URL"));
        }
        let timeout = timeout.unwrap_or(DEFAULT_STORE_TIMEOUT);
        if timeout.is_zero() {
            return Err(anyhow!("The store timeout must be positive"));
        }
        let store = Store {
            url,
            api_key,
            timeout,
        };

        let raw::Explore {
            near_limit,
            popular_limit,
        } = explore.unwrap_or_default();
        let explore = Explore {
            near_limit: near_limit.unwrap_or(DEFAULT_LIST_LIMIT),
            popular_limit: popular_limit.unwrap_or(DEFAULT_LIST_LIMIT),
        };

        Ok(Self { store, explore })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> Result<Config> {
        let raw: raw::Config = toml::from_str(toml)?;
        Config::try_from(raw)
    }

    #[test]
    fn load_default_config() {
        let cfg = Config::try_from(raw::Config::default()).unwrap();
        assert!(cfg.store.url.is_none());
        assert_eq!(Duration::from_secs(15), cfg.store.timeout);
        assert_eq!(5, cfg.explore.near_limit);
        assert_eq!(5, cfg.explore.popular_limit);
    }

    #[test]
    fn fill_in_missing_values() {
        let cfg = parse(
            r#"
            [explore]
            near-limit = 3
            "#,
        )
        .unwrap();
        assert_eq!(3, cfg.explore.near_limit);
        assert_eq!(5, cfg.explore.popular_limit);
        assert_eq!(Duration::from_secs(15), cfg.store.timeout);
    }

    #[test]
    fn reject_invalid_values() {
        assert!(parse("[store]\nurl = \" \"").is_err());
        assert!(parse("[store]\ntimeout = \"0s\"").is_err());
    }

    #[test]
    fn override_from_environment() {
        let mut cfg = parse("[store]\nurl = \"https://a.example.org\"").unwrap();
        cfg.apply_env_overrides(|name| match name {
            ENV_NAME_API_KEY => Some("secret".into()),
            _ => None,
        });
        assert_eq!(Some("https://a.example.org"), cfg.store.url.as_deref());
        assert_eq!(Some("secret"), cfg.store.api_key.as_deref());
        assert!(!format!("{:?}", cfg.store).contains("secret"));
    }

    #[test]
    fn missing_config_file_falls_back_to_default() {
        let cfg = Config::try_load_from_file_or_default(Some("does-not-exist.toml")).unwrap();
        assert_eq!(5, cfg.explore.near_limit);
    }
}
