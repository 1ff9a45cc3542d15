use crate::commands::expand::ExpandCommand;
use crate::deployment::{DeploymentConfig, Environment};
use crate::document;
use crate::error::Error;
use crate::runner::Runner;
use eyre::WrapErr;

pub(crate) struct ExpandRunner {
    pub(crate) command: ExpandCommand,
}

impl Runner for ExpandRunner {
    /// Expand Spanner templates of a Deployment Manager config
    async fn run(&mut self) -> Result<(), Error> {
        let shared = self.command.shared.clone();
        let config = self.config(shared.config_file).await?;

        let project = self
            .command
            .project
            .as_deref()
            .or(config.project())
            .ok_or_else(|| {
                self.error(
                    Some("Project is not set"),
                    Some("Pass --project or set [env] project in spanner-dm.toml."),
                    None,
                )
            })?;

        let environment = Environment {
            project: project.to_string(),
            deployment: self
                .command
                .deployment
                .as_deref()
                .or(config.deployment())
                .map(String::from),
        };

        let deployment: DeploymentConfig = document::read(&self.command.config)
            .await
            .wrap_err(Error::new(
                "Failed to read the deployment config",
                Some(&format!(
                    "Check that {} is a valid Deployment Manager config.",
                    self.command.config.display()
                )),
            ))?;

        let expanded = deployment.expand(&environment)?;

        self.writer(&config, shared.format, shared.output)
            .document(&expanded)
            .await
    }
}
