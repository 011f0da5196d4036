use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::{anyhow, Context};
use serde::Deserialize;
use shader_processor::ResolverOptions;

/// Settings for the shader loading step, read from an optional JSON file
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the expanded shaders are mirrored for inspection
    pub processed_output_dir: PathBuf,
    pub write_processed_output: bool,
    pub max_include_depth: usize,
    pub log_level: String,
    pub watch_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            processed_output_dir: PathBuf::from("./tmp/processed_shaders"),
            write_processed_output: true,
            max_include_depth: ResolverOptions::default().max_include_depth,
            log_level: "warn".to_owned(),
            watch_interval_ms: 500,
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        Self::from_json(&contents).with_context(|| format!("Invalid config file {:?}", path))
    }

    pub fn from_json(contents: &str) -> anyhow::Result<Self> {
        let config: Config = serde_json::from_str(contents)?;
        config.log_level()?;
        Ok(config)
    }

    pub fn log_level(&self) -> anyhow::Result<log::Level> {
        log::Level::from_str(&self.log_level)
            .map_err(|_| anyhow!("Unknown log level \"{}\"", self.log_level))
    }

    pub fn resolver_options(&self) -> ResolverOptions {
        ResolverOptions {
            max_include_depth: self.max_include_depth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let config = Config::from_json(r#"{ "max_include_depth": 4 }"#).unwrap();

        assert_eq!(config.max_include_depth, 4);
        assert_eq!(
            config.processed_output_dir,
            Config::default().processed_output_dir
        );
        assert!(config.write_processed_output);
        assert_eq!(config.log_level().unwrap(), log::Level::Warn);
    }

    #[test]
    fn no_config_file_gives_defaults() {
        assert_eq!(Config::load(None).unwrap(), Config::default());
    }

    #[test]
    fn log_level_is_parsed_case_insensitively() {
        let config = Config::from_json(r#"{ "log_level": "Debug" }"#).unwrap();
        assert_eq!(config.log_level().unwrap(), log::Level::Debug);
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        assert!(Config::from_json(r#"{ "log_level": "loud" }"#).is_err());
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(Config::from_json("{ not json").is_err());
    }

    #[test]
    fn resolver_options_follow_config() {
        let config = Config {
            max_include_depth: 3,
            ..Default::default()
        };
        assert_eq!(config.resolver_options().max_include_depth, 3);
    }
}
