//! Points to fit the model to

use std::ops::Deref;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use common::data_file::{RawData, RawPoint};

use crate::{Error, Result};

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A non-empty collection of finite points.
///
/// The metrics divide by the number of points, so an empty dataset can not be constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    points: Vec<Point>,
    name: Option<String>,
}

impl Dataset {
    pub fn new(points: Vec<Point>) -> Result<Self> {
        if points.is_empty() {
            return Err(Error::EmptyDataset);
        }
        if let Some(index) = points
            .iter()
            .position(|p| !p.x.is_finite() || !p.y.is_finite())
        {
            return Err(Error::NonFinitePoint { index });
        }
        Ok(Self { points, name: None })
    }

    /// The caller guarantees that `points` is non-empty and finite
    pub(crate) fn new_unchecked(points: Vec<Point>) -> Self {
        debug_assert!(!points.is_empty());
        debug_assert!(points.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
        Self { points, name: None }
    }

    /// Two points, `optimal_b = 4.5`
    pub fn demo() -> Self {
        Self::new_unchecked(vec![Point::new(2.0, 2.5), Point::new(7.0, 6.5)]).with_name("demo")
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn ys(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.y)
    }

    pub fn xs(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.x)
    }

    pub fn from_raw(raw: RawData) -> Result<Self> {
        let points = raw
            .points
            .into_iter()
            .map(|RawPoint { x, y }| Point { x, y })
            .collect();
        let mut dataset = Self::new(points)?;
        dataset.name = raw.name;
        Ok(dataset)
    }

    pub fn to_raw(&self) -> RawData {
        RawData {
            name: self.name.clone(),
            points: self
                .points
                .iter()
                .map(|&Point { x, y }| RawPoint { x, y })
                .collect(),
            meta: Default::default(),
        }
    }

    pub fn read_from_toml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = RawData::read_from_toml_file(path)?;
        Self::from_raw(raw).with_context(|| format!("invalid dataset in {}", path.display()))
    }
}

impl Deref for Dataset {
    type Target = [Point];

    fn deref(&self) -> &Self::Target {
        &self.points
    }
}
