//! Random practice datasets

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use common::rand::Rng;
use common::rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, Point};
use crate::Error;

/// Points are spread over `[0, X_MAX]`
const X_MAX: f64 = 10.0;
/// Standard deviation of the noise around the hidden intercept
const NOISE_SIGMA: f64 = 0.8;

#[derive(
    Serialize, Deserialize, ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn point_count(self) -> usize {
        match self {
            Self::Easy => 5,
            Self::Medium => 8,
            Self::Hard => 12,
        }
    }

    /// Probability of every point to be an outlier
    pub fn outlier_probability(self) -> f64 {
        match self {
            Self::Easy => 0.0,
            Self::Medium => 0.15,
            Self::Hard => 0.3,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        })
    }
}

impl FromStr for Difficulty {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(Error::UnknownDifficulty(s.to_owned())),
        }
    }
}

/// Generate a dataset around a hidden intercept in `[-6, 6]`.
///
/// Outliers are pushed 4 to 8 units away from the intercept, in a random direction.
pub fn generate<R: Rng + ?Sized>(difficulty: Difficulty, rng: &mut R) -> Dataset {
    let intercept: f64 = rng.gen_range(-6.0..=6.0);
    let n = difficulty.point_count();

    let points = (0..n)
        .map(|i| {
            let x = X_MAX * i as f64 / (n - 1) as f64;
            let mut y = intercept + NOISE_SIGMA * rng.sample::<f64, _>(StandardNormal);
            if rng.gen_bool(difficulty.outlier_probability()) {
                let offset: f64 = rng.gen_range(4.0..8.0);
                y += if rng.gen() { offset } else { -offset };
            }
            Point::new(round2(x), round2(y))
        })
        .collect();

    Dataset::new_unchecked(points).with_name(format!("practice-{difficulty}"))
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
