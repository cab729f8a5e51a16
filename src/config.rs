use std::env;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://./data/kuaforum.db";
pub const DEFAULT_SALON_ID: &str = "tasarimhane";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// The single salon this deployment serves.
    pub salon_id: String,
    pub seed_defaults: bool,
    pub event_capacity: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let port = lookup("PORT")
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let salon_id = lookup("SALON_ID")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_SALON_ID.to_string());
        let seed_defaults = lookup("SEED_DEFAULTS")
            .map(|value| !matches!(value.trim(), "false" | "0" | "no"))
            .unwrap_or(true);
        let event_capacity = lookup("EVENT_CAPACITY")
            .and_then(|value| value.parse().ok())
            .filter(|capacity: &usize| *capacity > 0)
            .unwrap_or(DEFAULT_EVENT_CAPACITY);

        Self {
            database_url,
            port,
            salon_id,
            seed_defaults,
            event_capacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config_with(&[]);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.port, 8080);
        assert_eq!(config.salon_id, "tasarimhane");
        assert!(config.seed_defaults);
        assert_eq!(config.event_capacity, 64);
    }

    #[test]
    fn invalid_numbers_fall_back() {
        let config = config_with(&[
            ("PORT", "eighty"),
            ("EVENT_CAPACITY", "0"),
            ("SEED_DEFAULTS", "false"),
            ("SALON_ID", "  "),
        ]);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.event_capacity, DEFAULT_EVENT_CAPACITY);
        assert!(!config.seed_defaults);
        assert_eq!(config.salon_id, DEFAULT_SALON_ID);
    }
}
