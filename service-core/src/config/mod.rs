use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_environment")]
    pub environment: String,
}

fn default_port() -> u16 {
    8080
}

fn default_environment() -> String {
    "development".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            environment: default_environment(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_load_defaults() {
        // SAFETY: serialized with every other env-mutating test
        unsafe {
            std::env::remove_var("APP__PORT");
            std::env::remove_var("APP__ENVIRONMENT");
        }

        let config = Config::load().unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.environment, "development");
        assert!(!config.is_production());
    }

    #[test]
    #[serial]
    fn test_load_from_environment() {
        unsafe {
            std::env::set_var("APP__PORT", "9090");
            std::env::set_var("APP__ENVIRONMENT", "Production");
        }

        let config = Config::load().unwrap();
        assert_eq!(config.port, 9090);
        assert!(config.is_production());

        unsafe {
            std::env::remove_var("APP__PORT");
            std::env::remove_var("APP__ENVIRONMENT");
        }
    }
}
