use crate::writer::Format;
use eyre::WrapErr;
use serde::Deserialize;
use std::path::PathBuf;

/// Looked up in the current directory when no explicit path is given
pub(crate) const CONFIG_FILE_NAME: &str = "spanner-dm.toml";

/// ConfigFile is the structure of spanner-dm.toml
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ConfigFile {
    /// [env]
    /// project = "my-project"
    /// deployment = "my-deployment"
    #[serde(default)]
    env: EnvSection,

    /// [output]
    /// format = "json"
    #[serde(default)]
    output: OutputSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct EnvSection {
    project: Option<String>,
    deployment: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct OutputSection {
    format: Option<Format>,
}

impl ConfigFile {
    /// Read the config from the given path or from the current directory
    ///
    /// An explicitly passed file must exist, the default one falls back to an empty config.
    pub(crate) async fn from_path(path: Option<PathBuf>) -> eyre::Result<Self> {
        let (path, is_explicit) = match path {
            Some(path) => (path, true),
            None => (PathBuf::from(CONFIG_FILE_NAME), false),
        };

        let toml_string = match tokio::fs::read_to_string(&path).await {
            Ok(toml_string) => toml_string,
            Err(_) if !is_explicit => {
                log::debug!("No {CONFIG_FILE_NAME} found, using defaults");
                return Ok(ConfigFile::default());
            }
            Err(e) => return Err(e).wrap_err(format!("Failed to read {}", path.display())),
        };

        Self::parse(&toml_string).wrap_err(format!("Failed to parse {}", path.display()))
    }

    pub(crate) fn parse(toml_string: &str) -> eyre::Result<Self> {
        Ok(toml::from_str(toml_string)?)
    }

    pub(crate) fn project(&self) -> Option<&str> {
        self.env.project.as_deref()
    }

    pub(crate) fn deployment(&self) -> Option<&str> {
        self.env.deployment.as_deref()
    }

    pub(crate) fn format(&self) -> Option<Format> {
        self.output.format
    }
}
