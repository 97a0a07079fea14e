use crate::core::precision::PrecisionKind;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for '{name}': {reason}")]
    InvalidValue { name: &'static str, reason: String },

    #[error("Failed to read configuration file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// How the population-wide best is chosen from the per-group winners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GlobalMode {
    /// Apply the group tournament again over the group winners. Deterministic.
    #[default]
    TwoStage,
    /// Every candidate races on one shared cell without ordering between
    /// groups. The winner may vary from run to run when scores are close.
    BestEffort,
}

/// How the lanes of a group take their turns in the tournament.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Executor {
    /// One thread runs the turns in lane order.
    #[default]
    Serial,
    /// One thread per lane, separated into turns by a barrier.
    Lockstep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PrecisionConfig {
    #[serde(default)]
    pub storage: PrecisionKind,
    #[serde(default)]
    pub calculation: PrecisionKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    pub population_size: usize,
    pub seed: u64,
    pub temperature: f64,
    /// When set, candidates under this error are ranked by kinetic energy
    /// instead of by error.
    pub error_threshold: Option<f64>,
    pub precision: PrecisionConfig,
    pub global_mode: GlobalMode,
    pub executor: Executor,
    /// Number of best candidates to report, in ascending score order.
    pub top_k: usize,
    /// Whether the scored population is returned alongside the winners.
    pub retain_population: bool,
}

impl SearchConfig {
    pub fn builder() -> SearchConfigBuilder {
        SearchConfigBuilder::new()
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: SearchConfigFile = toml::from_str(content)?;
        file.into_builder().build()
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn num_groups(&self) -> usize {
        self.population_size.div_ceil(crate::engine::reduction::GROUP_SIZE)
    }
}

#[derive(Default)]
pub struct SearchConfigBuilder {
    population_size: Option<usize>,
    seed: Option<u64>,
    temperature: Option<f64>,
    error_threshold: Option<f64>,
    precision: Option<PrecisionConfig>,
    global_mode: Option<GlobalMode>,
    executor: Option<Executor>,
    top_k: Option<usize>,
    retain_population: Option<bool>,
}

impl SearchConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn population_size(mut self, size: usize) -> Self {
        self.population_size = Some(size);
        self
    }
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }
    pub fn error_threshold(mut self, threshold: f64) -> Self {
        self.error_threshold = Some(threshold);
        self
    }
    pub fn precision(mut self, storage: PrecisionKind, calculation: PrecisionKind) -> Self {
        self.precision = Some(PrecisionConfig {
            storage,
            calculation,
        });
        self
    }
    pub fn global_mode(mut self, mode: GlobalMode) -> Self {
        self.global_mode = Some(mode);
        self
    }
    pub fn executor(mut self, executor: Executor) -> Self {
        self.executor = Some(executor);
        self
    }
    pub fn top_k(mut self, k: usize) -> Self {
        self.top_k = Some(k);
        self
    }
    pub fn retain_population(mut self, retain: bool) -> Self {
        self.retain_population = Some(retain);
        self
    }

    pub fn build(self) -> Result<SearchConfig, ConfigError> {
        let population_size = self
            .population_size
            .ok_or(ConfigError::MissingParameter("population_size"))?;
        if population_size == 0 {
            return Err(ConfigError::InvalidValue {
                name: "population_size",
                reason: "must be at least 1".to_string(),
            });
        }

        let temperature = self
            .temperature
            .ok_or(ConfigError::MissingParameter("temperature"))?;
        if !(temperature.is_finite() && temperature >= 0.0) {
            return Err(ConfigError::InvalidValue {
                name: "temperature",
                reason: format!("must be finite and non-negative, got {temperature}"),
            });
        }

        if let Some(threshold) = self.error_threshold {
            if !(threshold.is_finite() && threshold > 0.0) {
                return Err(ConfigError::InvalidValue {
                    name: "error_threshold",
                    reason: format!("must be finite and positive, got {threshold}"),
                });
            }
        }

        let top_k = self.top_k.unwrap_or(0);
        if top_k > population_size {
            return Err(ConfigError::InvalidValue {
                name: "top_k",
                reason: format!("{top_k} exceeds the population size {population_size}"),
            });
        }

        Ok(SearchConfig {
            population_size,
            seed: self.seed.ok_or(ConfigError::MissingParameter("seed"))?,
            temperature,
            error_threshold: self.error_threshold,
            precision: self.precision.unwrap_or_default(),
            global_mode: self.global_mode.unwrap_or_default(),
            executor: self.executor.unwrap_or_default(),
            top_k,
            retain_population: self.retain_population.unwrap_or(true),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct SearchConfigFile {
    population_size: Option<usize>,
    seed: Option<u64>,
    temperature: Option<f64>,
    error_threshold: Option<f64>,
    precision: Option<PrecisionConfig>,
    global_mode: Option<GlobalMode>,
    executor: Option<Executor>,
    top_k: Option<usize>,
    retain_population: Option<bool>,
}

impl SearchConfigFile {
    fn into_builder(self) -> SearchConfigBuilder {
        SearchConfigBuilder {
            population_size: self.population_size,
            seed: self.seed,
            temperature: self.temperature,
            error_threshold: self.error_threshold,
            precision: self.precision,
            global_mode: self.global_mode,
            executor: self.executor,
            top_k: self.top_k,
            retain_population: self.retain_population,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn minimal_builder() -> SearchConfigBuilder {
        SearchConfig::builder()
            .population_size(512)
            .seed(7)
            .temperature(0.05)
    }

    #[test]
    fn builder_fills_defaults_for_optional_fields() {
        let config = minimal_builder().build().unwrap();
        assert_eq!(config.error_threshold, None);
        assert_eq!(config.precision.storage, PrecisionKind::Double);
        assert_eq!(config.precision.calculation, PrecisionKind::Double);
        assert_eq!(config.global_mode, GlobalMode::TwoStage);
        assert_eq!(config.executor, Executor::Serial);
        assert_eq!(config.top_k, 0);
        assert!(config.retain_population);
        assert_eq!(config.num_groups(), 2);
    }

    #[test]
    fn builder_reports_the_first_missing_parameter() {
        let err = SearchConfig::builder().seed(1).build().unwrap_err();
        assert!(matches!(err, ConfigError::MissingParameter("population_size")));

        let err = SearchConfig::builder()
            .population_size(4)
            .temperature(0.1)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingParameter("seed")));
    }

    #[test]
    fn builder_rejects_out_of_range_values() {
        let err = minimal_builder().population_size(0).build().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { name: "population_size", .. }));

        let err = minimal_builder().temperature(f64::NAN).build().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { name: "temperature", .. }));

        let err = minimal_builder().error_threshold(-1.0).build().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { name: "error_threshold", .. }));

        let err = minimal_builder().top_k(513).build().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { name: "top_k", .. }));
    }

    #[test]
    fn toml_round_trips_every_field() {
        let config = SearchConfig::from_toml_str(
            r#"
            population-size = 1000
            seed = 42
            temperature = 0.1
            error-threshold = 1e-6
            global-mode = "best-effort"
            executor = "lockstep"
            top-k = 5
            retain-population = false

            [precision]
            storage = "single"
            calculation = "double"
            "#,
        )
        .unwrap();
        assert_eq!(config.population_size, 1000);
        assert_eq!(config.seed, 42);
        assert_eq!(config.error_threshold, Some(1e-6));
        assert_eq!(config.global_mode, GlobalMode::BestEffort);
        assert_eq!(config.executor, Executor::Lockstep);
        assert_eq!(config.precision.storage, PrecisionKind::Single);
        assert_eq!(config.precision.calculation, PrecisionKind::Double);
        assert_eq!(config.top_k, 5);
        assert!(!config.retain_population);
        assert_eq!(config.num_groups(), 4);
    }

    #[test]
    fn toml_rejects_unknown_keys() {
        let err = SearchConfig::from_toml_str("population-size = 1\nseed = 1\ntemperature = 0.0\nbogus = 3")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn toml_missing_fields_surface_as_missing_parameters() {
        let err = SearchConfig::from_toml_str("seed = 3\ntemperature = 0.2").unwrap_err();
        assert!(matches!(err, ConfigError::MissingParameter("population_size")));
    }

    #[test]
    fn load_reads_a_file_from_disk() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "population-size = 256\nseed = 9\ntemperature = 0.0").unwrap();
        let config = SearchConfig::load(file.path()).unwrap();
        assert_eq!(config.population_size, 256);
        assert_eq!(config.temperature, 0.0);
    }

    #[test]
    fn load_reports_missing_files_with_their_path() {
        let err = SearchConfig::load(Path::new("/nonexistent/search.toml")).unwrap_err();
        match err {
            ConfigError::Io { path, .. } => assert_eq!(path, "/nonexistent/search.toml"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
