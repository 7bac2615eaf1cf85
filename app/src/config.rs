use std::path::Path;

use anyhow::{Context, Result};
use featsel::{SearchConfig, Strategy};
use serde::{Deserialize, Serialize};

/// Settings read from an optional JSON file. Command-line flags take
/// precedence over anything set here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Strategy to run; when absent the interactive menu is shown.
    pub strategy: Option<Strategy>,
    #[serde(flatten)]
    pub search: SearchConfig,
}

/// Load the application configuration from a JSON file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file {}", path.as_ref().display()))?;
    parse_config(&content)
        .with_context(|| format!("Invalid config file {}", path.as_ref().display()))
}

fn parse_config(content: &str) -> Result<AppConfig> {
    Ok(serde_json::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use featsel::MissBudget;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(r#"{ "strategy": "pruned-forward", "miss_budget": { "fixed": 4 } }"#)
            .unwrap();
        assert_eq!(config.strategy, Some(Strategy::PrunedForward));
        assert_eq!(config.search.miss_budget, MissBudget::Fixed(4));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = parse_config("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.search.miss_budget, MissBudget::RoundBest);
    }

    #[test]
    fn test_unit_budget_variants() {
        let config = parse_config(r#"{ "strategy": "backward", "miss_budget": "unlimited" }"#).unwrap();
        assert_eq!(config.strategy, Some(Strategy::Backward));
        assert_eq!(config.search.miss_budget, MissBudget::Unlimited);
    }

    #[test]
    fn test_unknown_strategy_is_rejected() {
        assert!(parse_config(r#"{ "strategy": "sideways" }"#).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = load_config("no/such/config.json").unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to read config file"));
    }
}
