use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// LightGBM dump of the fitness category classifier
    #[serde(default = "default_category_model_path")]
    pub category_model_path: String,

    /// LightGBM dump of the fitness goal classifier
    #[serde(default = "default_goal_model_path")]
    pub goal_model_path: String,

    /// Optional JSON file replacing the built-in reference cohort
    #[serde(default)]
    pub cohort_path: Option<String>,

    /// Allowed CORS origin; any origin is allowed when unset
    #[serde(default)]
    pub frontend_origin: Option<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_category_model_path() -> String {
    "models/lgb_model.json".to_string()
}

fn default_goal_model_path() -> String {
    "models/lgb_model_balanced.json".to_string()
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Address the HTTP listener binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_to_empty_environment() {
        let config: Config = envy::from_iter(Vec::<(String, String)>::new()).unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
        assert_eq!(config.category_model_path, "models/lgb_model.json");
        assert_eq!(config.goal_model_path, "models/lgb_model_balanced.json");
        assert!(config.cohort_path.is_none());
        assert!(config.frontend_origin.is_none());
    }

    #[test]
    fn test_overrides_from_variables() {
        let vars = vec![
            ("PORT".to_string(), "8080".to_string()),
            ("COHORT_PATH".to_string(), "data/cohort.json".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.cohort_path.as_deref(), Some("data/cohort.json"));
    }
}
