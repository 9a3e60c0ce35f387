use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Clone, Debug)]
pub struct DatabaseSettings {
    pub path: String,
    pub max_connections: u32,
    pub create_if_missing: bool,
}

impl ApplicationSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Defaults, then `configuration.toml` from the working directory (optional), then
/// `TRIVIA_` environment variables, e.g. `TRIVIA_APPLICATION__PORT=8080`.
pub fn get_configuration() -> Result<Settings, ConfigError> {
    dotenv::dotenv().ok();
    Config::builder()
        .set_default("application.host", "0.0.0.0")?
        .set_default("application.port", 5000)?
        .set_default("database.path", "trivia.db")?
        .set_default("database.max_connections", 5)?
        .set_default("database.create_if_missing", true)?
        .add_source(File::with_name("configuration").required(false))
        .add_source(
            Environment::with_prefix("TRIVIA")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_joins_host_and_port() {
        let app = ApplicationSettings {
            host: "127.0.0.1".to_owned(),
            port: 5000,
        };
        assert_eq!(app.address(), "127.0.0.1:5000");
    }

    #[test]
    fn defaults_fill_missing_keys() {
        let settings = get_configuration().unwrap();
        assert!(!settings.database.path.is_empty());
        assert!(settings.database.max_connections > 0);
    }
}
