//! Runtime settings, read from an optional `obograph.toml` and the
//! environment (`OBOGRAPH__ONTOLOGY__ID_PREFIX=GO` and so on).
use std::path::Path;

use config::{Config, Environment, File};
use serde::Deserialize;
use tracing::debug;

use crate::error::{OboError, Result};
use crate::ontology::OntologyOptions;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub log: LogSettings,
    pub ontology: OntologySettings,
    pub reasoner: ReasonerSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// An `EnvFilter` directive, overridden by `RUST_LOG` when that is set.
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: String::from("info"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OntologySettings {
    pub id_prefix: String,
    pub close: bool,
}

impl Default for OntologySettings {
    fn default() -> Self {
        Self {
            id_prefix: String::from("GO"),
            close: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReasonerSettings {
    pub max_passes: Option<usize>,
}

impl Settings {
    /// Reads `obograph.toml` from the working directory if there is one.
    pub fn load() -> Result<Self> {
        Self::build(File::with_name("obograph").required(false))
    }

    /// Reads the given file, which must exist.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "reading settings");
        Self::build(File::from(path).required(true))
    }

    fn build<S>(file: S) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings: Settings = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix("OBOGRAPH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.ontology.id_prefix.trim().is_empty() {
            return Err(OboError::Config(String::from("ontology.id_prefix must not be empty")));
        }
        if self.reasoner.max_passes == Some(0) {
            return Err(OboError::Config(String::from("reasoner.max_passes must be > 0")));
        }
        Ok(())
    }

    pub fn ontology_options(&self) -> OntologyOptions {
        OntologyOptions {
            id_prefix: self.ontology.id_prefix.trim().to_owned(),
            close: self.ontology.close,
            max_passes: self.reasoner.max_passes,
        }
    }
}
