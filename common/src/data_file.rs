//! Dataset files.
//!
//! A dataset is stored as TOML:
//!
//! ```toml
//! name = "demo"
//!
//! [[point]]
//! x = 2.0
//! y = 2.5
//! ```

use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A point as it is in the file
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct RawPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct RawData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "point")]
    pub points: Vec<RawPoint>,
    #[serde(default, skip_serializing_if = "toml::Table::is_empty")]
    pub meta: toml::Table,
}

#[derive(Debug, Error)]
pub enum DataFileError {
    #[error("could not read {path}: {source}")]
    Io { path: String, source: io::Error },
    #[error("could not parse {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("could not serialize dataset: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl RawData {
    pub fn read_from_toml_file(path: impl AsRef<Path>) -> Result<Self, DataFileError> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let contents = std::fs::read(path).map_err(|source| DataFileError::Io {
            path: display.clone(),
            source,
        })?;
        let contents = String::from_utf8_lossy(&contents);

        let mut retval: Self = toml::from_str(&contents).map_err(|source| DataFileError::Parse {
            path: display,
            source,
        })?;

        if retval.name.is_none() {
            retval.name = path
                .file_name()
                .map(|file_name| file_name.to_string_lossy())
                .and_then(|file_name| Some(file_name.split_once('.')?.0.to_owned()));
        }

        Ok(retval)
    }

    pub fn to_toml_string(&self) -> Result<String, DataFileError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn write_to_toml_file(&self, path: impl AsRef<Path>) -> Result<(), DataFileError> {
        let path = path.as_ref();
        let contents = self.to_toml_string()?;
        std::fs::write(path, contents).map_err(|source| DataFileError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}
