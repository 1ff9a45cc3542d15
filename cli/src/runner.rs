use crate::config::ConfigFile;
use crate::error::Error;
use crate::writer::{Format, Writer};
use std::error::Error as StdError;
use std::path::PathBuf;

pub(crate) trait Runner {
    /// Project level settings, explicit path or spanner-dm.toml in the current dir
    async fn config(&self, path: Option<PathBuf>) -> Result<ConfigFile, Error> {
        let is_explicit = path.is_some();

        ConfigFile::from_path(path).await.map_err(|e| {
            let hint = if is_explicit {
                "Check the file passed with --config-file."
            } else {
                "Check spanner-dm.toml in the current directory."
            };

            self.error(Some("Invalid config file"), Some(hint), Some(e.into()))
        })
    }

    /// Writer honoring the command flags first and the config file second
    fn writer(&self, config: &ConfigFile, format: Option<Format>, output: Option<PathBuf>) -> Writer {
        Writer::new(format.or(config.format()).unwrap_or_default(), output)
    }

    /// Run the command
    ///
    /// Returns an error shown to the user in case of failure
    async fn run(&mut self) -> Result<(), Error>;

    /// Construct an error shown to the user
    fn error(
        &self,
        title: Option<&str>,
        description: Option<&str>,
        origin: Option<Box<dyn StdError>>,
    ) -> Error {
        if let Some(origin) = origin {
            log::error!("{origin:?}");
        }

        if let Some(title) = title {
            Error::new(title, description)
        } else {
            Error::new("Failed to run the command", None)
        }
    }
}

/// Return a runner for a command
pub(crate) trait Runnable {
    fn runner(&self) -> impl Runner;
}
