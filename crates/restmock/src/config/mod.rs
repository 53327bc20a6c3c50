//! Configuration document for restmock.
//!
//! A file is parsed as JSON when its extension is `.json` and as YAML
//! otherwise. `resources` is lowered into `ResourceDefinition`s and compiled
//! into the routing table.

mod listen;
mod lower;
mod resource;

use crate::rest::{ConfigurationError, RoutingTable};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use listen::{ListenConfig, MetricsConfig};
pub use lower::lower;
pub use resource::{
    IdSetting, MethodSetting, RequestSetting, ResourceSetting, ResponseSetting, SubResourceSetting,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub listen: ListenConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub resources: Vec<ResourceSetting>,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json(&contents)
        } else {
            Self::from_yaml(&contents)
        }
    }

    pub fn from_json(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(contents)?)
    }

    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Lower and compile the configured resources.
    pub fn compile(&self) -> Result<RoutingTable, ConfigError> {
        let definitions = lower(&self.resources)?;
        Ok(RoutingTable::compile(&definitions)?)
    }
}

/// Read a configuration file and compile its routing table.
pub fn load_table<P: AsRef<Path>>(path: P) -> Result<RoutingTable, ConfigError> {
    Config::from_file(path)?.compile()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    const YAML: &str = r#"
listen:
  port: 8080
resources:
  - name: targets
    get:
      - id: "1"
        response:
          json: { code: 1, message: foo }
    post:
      - response:
          status: 201
          headers:
            Location: /targets/123
"#;

    #[test]
    fn test_defaults() {
        let config = Config::from_yaml("resources: []").unwrap();
        assert_eq!(config.listen.port, 12306);
        assert_eq!(config.listen.host.to_string(), "127.0.0.1");
        assert!(!config.metrics.enabled);
        assert_eq!(config.metrics.port, 9090);
    }

    #[test]
    fn test_yaml_compiles() {
        let config = Config::from_yaml(YAML).unwrap();
        assert_eq!(config.listen.port, 8080);
        let table = config.compile().unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_from_file_by_extension() {
        let mut yaml = Builder::new().suffix(".yaml").tempfile().unwrap();
        yaml.write_all(YAML.as_bytes()).unwrap();
        assert_eq!(Config::from_file(yaml.path()).unwrap().resources.len(), 1);

        let mut json = Builder::new().suffix(".json").tempfile().unwrap();
        json.write_all(br#"{"resources": [{"name": "all-resources"}]}"#)
            .unwrap();
        let config = Config::from_file(json.path()).unwrap();
        assert_eq!(config.resources[0].name, "all-resources");
    }

    #[test]
    fn test_unknown_setting_keys_rejected() {
        let misspelled_request = r#"
resources:
  - name: targets
    patch:
      - id: "1"
        request: { txt: result }
        response: { text: patched }
"#;
        let err = Config::from_yaml(misspelled_request).unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
        assert!(err.to_string().contains("txt"));

        let misspelled_response =
            r#"{"resources": [{"name": "targets", "post": [{"response": {"stauts": 201}}]}]}"#;
        let err = Config::from_json(misspelled_response).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));

        let misspelled_method = r#"{"resources": [{"name": "t", "get": [{"idd": "1"}]}]}"#;
        assert!(Config::from_json(misspelled_method).is_err());
    }

    #[test]
    fn test_errors() {
        let err = Config::from_file("/nonexistent/restmock.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));

        let err = Config::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));

        let yaml = "resources:\n  - name: targets\n    get:\n      - id: \"1\"\n";
        let config = Config::from_yaml(yaml).unwrap();
        let err = config.compile().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Configuration(ConfigurationError::MissingResponse { .. })
        ));
    }
}
