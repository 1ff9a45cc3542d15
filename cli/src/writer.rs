use crate::error::Error;
use eyre::WrapErr;
use serde::{Deserialize, Serialize};
use std::io::{Stdout, Write};
use std::path::PathBuf;

/// Serialization format of the generated config
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Format {
    /// What Deployment Manager configs are usually written in
    #[default]
    Yaml,
    Json,
}

/// Write generated documents either to stdout or to a file
pub(crate) struct Writer {
    format: Format,
    output: Option<PathBuf>,
}

impl Writer {
    pub(crate) fn new(format: Format, output: Option<PathBuf>) -> Self {
        Writer { format, output }
    }

    /// Serialize the value in the configured format
    pub(crate) fn render<T: Serialize>(&self, value: &T) -> eyre::Result<String> {
        match self.format {
            Format::Yaml => serde_saphyr::to_string(value).wrap_err("Failed to serialize YAML"),
            Format::Json => serde_json::to_string_pretty(value)
                .map(|json| format!("{json}\n"))
                .wrap_err("Failed to serialize JSON"),
        }
    }

    /// Output a serialized document
    pub(crate) async fn document<T: Serialize>(&self, value: &T) -> Result<(), Error> {
        let output = self.render(value)?;

        let Some(path) = &self.output else {
            return self.write(&output);
        };

        tokio::fs::write(path, output).await.map_err(|e| {
            log::error!("Failed to write {path:?}: {e:?}");

            Error::new(
                "Output error",
                Some(&format!("Could not write to {}", path.display())),
            )
        })?;

        log::info!("Written to {path:?}");
        Ok(())
    }

    /// General method for writing to stdout
    fn write(&self, output: &str) -> Result<(), Error> {
        let mut stdout: Stdout = std::io::stdout();

        stdout.write_all(output.as_bytes()).map_err(|e| {
            log::error!("Error while writing to stdout: {e:?}");
            Error::new("Output error", None)
        })?;

        Ok(())
    }
}
