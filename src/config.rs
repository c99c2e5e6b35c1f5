//! Defaults that can be put into a TOML file instead of passing them as flags.
//!
//! ```toml
//! learning_rate = 0.2
//! iterations = 15
//! start_b = -7.0
//! difficulty = "hard"
//!
//! [animation]
//! duration_ms = 300
//! step_count = 15
//! ```

use std::fs::File;
use std::io::{BufReader, Read};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::animator::AnimationParams;
use crate::practice::Difficulty;

/// Learning rates accepted from the user
pub const LEARNING_RATE_RANGE: RangeInclusive<f64> = 0.001..=1.0;

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub learning_rate: f64,
    pub iterations: usize,
    /// Random if not set
    pub start_b: Option<f64>,
    /// A practice dataset is generated if set and `data` is not
    pub difficulty: Option<Difficulty>,
    pub data: Option<PathBuf>,
    pub seed: Option<u64>,
    pub animation: AnimationConfig,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AnimationConfig {
    pub duration_ms: f64,
    pub step_count: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            iterations: 15,
            start_b: None,
            difficulty: None,
            data: None,
            seed: None,
            animation: AnimationConfig::default(),
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration_ms: AnimationParams::DEFAULT_DURATION_MS,
            step_count: AnimationParams::DEFAULT_STEP_COUNT,
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Config, ConfigLoadError> {
        let mut s = String::new();
        BufReader::new(File::open(path)?).read_to_string(&mut s)?;
        Self::from_toml_str(&s)
    }

    pub fn from_toml_str(s: &str) -> Result<Config, ConfigLoadError> {
        Ok(toml::from_str(s)?)
    }

    /// Learning rate as the UI accepts it
    pub fn clamped_learning_rate(&self) -> f64 {
        clamp_learning_rate(self.learning_rate)
    }

    /// At least one iteration
    pub fn clamped_iterations(&self) -> usize {
        self.iterations.max(1)
    }
}

impl AnimationConfig {
    pub fn params(&self) -> crate::Result<AnimationParams> {
        AnimationParams::new(self.duration_ms, self.step_count)
    }
}

/// Clamp into [`LEARNING_RATE_RANGE`]. NaN falls back to the lower bound.
pub fn clamp_learning_rate(learning_rate: f64) -> f64 {
    if learning_rate.is_nan() {
        *LEARNING_RATE_RANGE.start()
    } else {
        learning_rate.clamp(*LEARNING_RATE_RANGE.start(), *LEARNING_RATE_RANGE.end())
    }
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("{0}")]
    IOError(#[from] std::io::Error),
    #[error("{0}")]
    IllegalConfigEntry(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_is_default() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn full_config() {
        let config = Config::from_toml_str(
            r#"
            learning_rate = 0.2
            iterations = 30
            start_b = -7.0
            difficulty = "hard"
            data = "points.toml"
            seed = 42

            [animation]
            duration_ms = 250
            step_count = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.learning_rate, 0.2);
        assert_eq!(config.iterations, 30);
        assert_eq!(config.start_b, Some(-7.0));
        assert_eq!(config.difficulty, Some(Difficulty::Hard));
        assert_eq!(config.data, Some(PathBuf::from("points.toml")));
        assert_eq!(config.seed, Some(42));

        let params = config.animation.params().unwrap();
        assert_eq!(params.step_count(), 10);
        assert_eq!(params.duration_ms(), 250.0);
    }

    #[test]
    fn partial_animation_section() {
        let config = Config::from_toml_str("[animation]\nstep_count = 5\n").unwrap();
        assert_eq!(config.animation.step_count, 5);
        assert_eq!(
            config.animation.duration_ms,
            AnimationParams::DEFAULT_DURATION_MS
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = Config::from_toml_str("learning_rte = 0.1").unwrap_err();
        assert!(matches!(err, ConfigLoadError::IllegalConfigEntry(_)));
    }

    #[test]
    fn invalid_animation() {
        let config = Config::from_toml_str("[animation]\nstep_count = 0\n").unwrap();
        assert!(config.animation.params().is_err());
    }

    #[test]
    fn clamping() {
        assert_eq!(clamp_learning_rate(5.0), 1.0);
        assert_eq!(clamp_learning_rate(0.0), 0.001);
        assert_eq!(clamp_learning_rate(-3.0), 0.001);
        assert_eq!(clamp_learning_rate(0.3), 0.3);
        assert_eq!(clamp_learning_rate(f64::NAN), 0.001);

        let config = Config {
            iterations: 0,
            learning_rate: 2.0,
            ..Config::default()
        };
        assert_eq!(config.clamped_iterations(), 1);
        assert_eq!(config.clamped_learning_rate(), 1.0);
    }

    #[test]
    fn missing_file() {
        let err = Config::load("/no/such/config.toml").unwrap_err();
        assert!(matches!(err, ConfigLoadError::IOError(_)));
    }
}
