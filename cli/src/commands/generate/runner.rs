use crate::commands::generate::GenerateCommand;
use crate::config::ConfigFile;
use crate::document;
use crate::error::Error;
use crate::runner::Runner;
use eyre::WrapErr;
use serde_json::Value;
use spanner_template::context::text;
use spanner_template::{generate, Context, Env};

pub(crate) struct GenerateRunner {
    pub(crate) command: GenerateCommand,
}

/// Pick the first value set among the sources
fn first_of<'a>(sources: [Option<&'a str>; 3]) -> Option<&'a str> {
    sources.into_iter().flatten().find(|value| !value.is_empty())
}

impl GenerateRunner {
    /// Environment of the template
    ///
    /// Flags go first, then spanner-dm.toml, then the properties themselves.
    fn env(&self, config: &ConfigFile, properties: &Value) -> Result<Env, Error> {
        // Rendered the way the template renders them into resource paths
        let property = |key: &str| {
            properties
                .get(key)
                .filter(|value| !value.is_null())
                .map(text)
        };

        let name_property = property("name");
        let project_property = property("project");

        let name = first_of([self.command.name.as_deref(), None, name_property.as_deref()])
            .ok_or_else(|| {
                self.error(
                    Some("Resource name is not set"),
                    Some("Pass --name or set [name] in the properties."),
                    None,
                )
            })?;

        let project = first_of([
            self.command.project.as_deref(),
            config.project(),
            project_property.as_deref(),
        ])
        .ok_or_else(|| {
            self.error(
                Some("Project is not set"),
                Some("Pass --project, set [env] project in spanner-dm.toml, or [project] in the properties."),
                None,
            )
        })?;

        Ok(Env {
            name: name.to_string(),
            project: project.to_string(),
            deployment: first_of([self.command.deployment.as_deref(), config.deployment(), None])
                .map(String::from),
            kind: None,
        })
    }
}

impl Runner for GenerateRunner {
    /// Generate resources out of a properties file
    async fn run(&mut self) -> Result<(), Error> {
        let shared = self.command.shared.clone();
        let config = self.config(shared.config_file).await?;

        let properties: Value = document::read(&self.command.properties)
            .await
            .wrap_err(Error::new(
                "Failed to read properties",
                Some(&format!(
                    "Check that {} is a valid YAML or JSON file.",
                    self.command.properties.display()
                )),
            ))?;

        let env = self.env(&config, &properties)?;
        let context = Context::from_value(properties, env)?;
        let bundle = generate(&context)?;

        self.writer(&config, shared.format, shared.output)
            .document(&bundle)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::SharedArgs;
    use serde_json::json;
    use std::path::PathBuf;

    fn runner(name: Option<&str>, project: Option<&str>) -> GenerateRunner {
        GenerateRunner {
            command: GenerateCommand {
                properties: PathBuf::from("properties.yaml"),
                name: name.map(String::from),
                project: project.map(String::from),
                deployment: None,
                shared: SharedArgs::default(),
            },
        }
    }

    #[test]
    fn flags_win() {
        let config = ConfigFile::parse("[env]\nproject = \"from-config\"").unwrap();
        let env = runner(Some("inst1"), Some("from-flag"))
            .env(&config, &json!({"name": "x", "project": "y"}))
            .unwrap();

        assert_eq!(env, Env::new("inst1", "from-flag"));
    }

    #[test]
    fn config_before_properties() {
        let config = ConfigFile::parse("[env]\nproject = \"from-config\"\ndeployment = \"dep\"").unwrap();
        let env = runner(None, None)
            .env(&config, &json!({"name": "inst1", "project": "y"}))
            .unwrap();

        assert_eq!(env.name, "inst1");
        assert_eq!(env.project, "from-config");
        assert_eq!(env.deployment.as_deref(), Some("dep"));
    }

    #[test]
    fn name_is_required_somewhere() {
        let error = runner(None, Some("proj1"))
            .env(&ConfigFile::default(), &json!({}))
            .unwrap_err();

        assert_eq!(error.title(), "Resource name is not set");
    }

    #[test]
    fn project_is_required_somewhere() {
        let error = runner(Some("inst1"), None)
            .env(&ConfigFile::default(), &json!({}))
            .unwrap_err();

        assert_eq!(error.title(), "Project is not set");
    }

    #[test]
    fn numeric_name_in_properties() {
        let env = runner(None, Some("proj1"))
            .env(&ConfigFile::default(), &json!({"name": 42}))
            .unwrap();

        assert_eq!(env.name, "42");
    }
}
