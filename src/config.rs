use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

#[derive(Debug, Clone, Deserialize)]
#[allow(unused)]
pub struct Config {
    pub server: ServerConfig,
    pub app: AppConfig,
    pub localization: LocalizationConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[allow(unused)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[allow(unused)]
pub struct AppConfig {
    pub name: String,
    pub environment: Environment,
    pub static_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
#[allow(unused)]
pub struct LocalizationConfig {
    pub default_culture: String,
    pub supported_cultures: Vec<String>,
    pub resources_dir: String,
    pub resource_basename: String,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Server configuration
        let host = env::var("SERVER_HOST")
            .unwrap_or_else(|_| "0.0.0.0".to_string())
            .parse::<IpAddr>()
            .context("Failed to parse SERVER_HOST")?;

        let port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()
            .context("Failed to parse SERVER_PORT")?;

        // App configuration
        let environment_str =
            env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        let environment = match environment_str.to_lowercase().as_str() {
            "production" => Environment::Production,
            "staging" => Environment::Staging,
            _ => Environment::Development,
        };

        let app_name = env::var("APP_NAME").unwrap_or_else(|_| "Polyglot Backend".to_string());
        let static_dir = env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string());

        // Localization configuration
        let default_culture = env::var("DEFAULT_CULTURE").unwrap_or_else(|_| "en-US".to_string());
        let supported_cultures = parse_culture_list(
            &env::var("SUPPORTED_CULTURES").unwrap_or_else(|_| "en-US,de-DE,tr-TR".to_string()),
        );
        let resources_dir = env::var("RESOURCES_DIR").unwrap_or_else(|_| "Resources".to_string());
        let resource_basename =
            env::var("RESOURCE_BASENAME").unwrap_or_else(|_| "strings".to_string());

        Ok(Config {
            server: ServerConfig { host, port },
            app: AppConfig {
                name: app_name,
                environment,
                static_dir,
            },
            localization: LocalizationConfig {
                default_culture,
                supported_cultures,
                resources_dir,
                resource_basename,
            },
        })
    }

    pub fn server_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server.host, self.server.port)
    }

    #[allow(unused)]
    pub fn is_production(&self) -> bool {
        self.app.environment == Environment::Production
    }

    #[allow(unused)]
    pub fn is_development(&self) -> bool {
        self.app.environment == Environment::Development
    }
}

fn parse_culture_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

impl Default for Environment {
    fn default() -> Self {
        Environment::Development
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Environment::Production),
            "staging" => Ok(Environment::Staging),
            "development" => Ok(Environment::Development),
            _ => Err(format!("Unknown environment: {}", s)),
        }
    }
}

// Use once_cell for a global config instance that's initialized once
use once_cell::sync::OnceCell;

static CONFIG: OnceCell<Config> = OnceCell::new();

pub fn init() -> Result<&'static Config> {
    CONFIG.get_or_try_init(Config::from_env)
}

#[allow(unused)]
pub fn get() -> &'static Config {
    CONFIG.get().expect("Config is not initialized")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_culture_lists_with_whitespace_and_gaps() {
        assert_eq!(
            parse_culture_list("en-US, de-DE ,tr-TR"),
            vec!["en-US", "de-DE", "tr-TR"]
        );
        assert_eq!(parse_culture_list("en-US,,"), vec!["en-US"]);
        assert!(parse_culture_list("").is_empty());
    }
}
