//! Runtime configuration loaded from `revingo.toml`

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::error::ConfigError;
use crate::eval::{Beam, CpuParams, Difficulty};
use crate::random::{RandomSource, RngSource};

/// Environment variable naming an alternative config file
pub const CONFIG_ENV: &str = "REVINGO_CONFIG";
/// Config file looked up in the working directory
pub const DEFAULT_CONFIG_PATH: &str = "revingo.toml";
/// Tracing filter used when neither `RUST_LOG` nor the config sets one
pub const DEFAULT_LOG_FILTER: &str = "revingo=info";

/// Per-field overrides applied on top of the difficulty preset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightOverrides {
    pub randomness: Option<f64>,
    pub danger_penalty: Option<f64>,
    pub corner_weight: Option<f64>,
    pub edge_weight: Option<f64>,
    pub flip_weight: Option<f64>,
    pub reach_block_weight: Option<f64>,
    pub bingo_bonus: Option<f64>,
    pub material_weight: Option<f64>,
    pub depth: Option<u8>,
    pub beam_width: Option<usize>,
    pub beam_threshold: Option<usize>,
    pub alpha_beta: Option<bool>,
}

impl WeightOverrides {
    pub fn apply(&self, mut params: CpuParams) -> CpuParams {
        macro_rules! take {
            ($($field:ident),*) => {
                $(if let Some(v) = self.$field {
                    params.$field = v;
                })*
            };
        }
        take!(
            randomness,
            danger_penalty,
            corner_weight,
            edge_weight,
            flip_weight,
            reach_block_weight,
            bingo_bonus,
            material_weight,
            depth,
            alpha_beta
        );

        match (self.beam_width, self.beam_threshold) {
            (None, None) => {}
            // A zero width turns the beam off
            (Some(0), _) => params.beam = None,
            (width, threshold) => {
                let base = params.beam.unwrap_or(Beam {
                    width: 8,
                    threshold: 10,
                });
                params.beam = Some(Beam {
                    width: width.unwrap_or(base.width),
                    threshold: threshold.unwrap_or(base.threshold),
                });
            }
        }
        params
    }
}

/// Application settings. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub difficulty: Difficulty,
    /// Play against the CPU (White); otherwise two humans share the board
    pub cpu_enabled: bool,
    /// Wall-clock budget for one CPU search
    pub cpu_time_limit_ms: Option<u64>,
    /// Fixed seed for reproducible CPU play and lightning targets
    pub seed: Option<u64>,
    pub log_filter: String,
    pub weights: WeightOverrides,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            cpu_enabled: true,
            cpu_time_limit_ms: None,
            seed: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            weights: WeightOverrides::default(),
        }
    }
}

impl Config {
    /// Path from `REVINGO_CONFIG`, else `revingo.toml`
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Load from [`default_path`](Self::default_path); a missing file gives
    /// the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_or_default(Self::default_path())
    }

    /// Load `path` if it exists, otherwise return the defaults
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if !path.as_ref().exists() {
            debug!("config file not found, using defaults");
            return Ok(Self::default());
        }
        Self::from_file(path)
    }

    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&content)?;
        info!(difficulty = %config.difficulty, cpu = config.cpu_enabled, "config loaded");
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Preset for the configured difficulty with overrides applied
    pub fn cpu_params(&self) -> CpuParams {
        self.weights.apply(self.difficulty.params())
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.cpu_time_limit_ms.map(Duration::from_millis)
    }

    /// Seeded generator when `seed` is set, entropy otherwise
    pub fn random_source(&self) -> Box<dyn RandomSource + Send> {
        match self.seed {
            Some(seed) => Box::new(RngSource::seeded(seed)),
            None => Box::new(RngSource::from_entropy()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.cpu_params(), CpuParams::NORMAL);
        assert_eq!(config.time_limit(), None);
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn test_partial_file() {
        let config = Config::from_toml_str(
            r#"
            difficulty = "hard"
            cpu_time_limit_ms = 250
            seed = 42

            [weights]
            corner_weight = 20.0
            depth = 2
            "#,
        )
        .unwrap();
        assert_eq!(config.difficulty, Difficulty::Hard);
        assert!(config.cpu_enabled);
        assert_eq!(config.time_limit(), Some(Duration::from_millis(250)));

        let params = config.cpu_params();
        assert_eq!(params.corner_weight, 20.0);
        assert_eq!(params.depth, 2);
        assert_eq!(params.edge_weight, CpuParams::HARD.edge_weight);
        assert!(params.alpha_beta);
    }

    #[test]
    fn test_beam_overrides() {
        let mut weights = WeightOverrides {
            beam_threshold: Some(4),
            ..WeightOverrides::default()
        };
        let normal = weights.apply(CpuParams::NORMAL);
        assert_eq!(
            normal.beam,
            Some(Beam {
                width: 8,
                threshold: 4
            })
        );

        weights.beam_width = Some(0);
        assert_eq!(weights.apply(CpuParams::HARD).beam, None);
    }

    #[test]
    fn test_written_config_reloads() {
        let config = Config {
            difficulty: Difficulty::Easy,
            cpu_enabled: false,
            cpu_time_limit_ms: Some(500),
            seed: Some(42),
            log_filter: "revingo=debug".to_string(),
            weights: WeightOverrides {
                corner_weight: Some(20.0),
                beam_width: Some(0),
                ..WeightOverrides::default()
            },
        };
        let text = toml::to_string(&config).unwrap();
        assert!(text.contains("difficulty = \"easy\""));
        assert_eq!(Config::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_seeded_source_is_reproducible() {
        let config = Config {
            seed: Some(9),
            ..Config::default()
        };
        let mut a = config.random_source();
        let mut b = config.random_source();
        assert_eq!(a.next_unit(), b.next_unit());
    }

    #[test]
    fn test_bad_input() {
        assert!(matches!(
            Config::from_toml_str("difficulty = \"expert\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            Config::from_file("/nonexistent/revingo.toml"),
            Err(ConfigError::Io(_))
        ));
        assert_eq!(
            Config::load_or_default("/nonexistent/revingo.toml").unwrap(),
            Config::default()
        );
    }
}
