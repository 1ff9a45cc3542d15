use eyre::{eyre, WrapErr};
use serde::{Deserialize, Serialize};
use spanner_template::{generate, Context, Env, Metadata, Output, Resource};
use std::collections::HashSet;
use std::path::Path;

/// File name of the template, as referenced from `imports` and `type`
const TEMPLATE_FILE_NAME: &str = "cloud_spanner.py";
const TEMPLATE_NAME: &str = "cloud_spanner";

/// Deployment Manager config, the file passed to `deployments create --config`
#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct DeploymentConfig {
    #[serde(default)]
    pub(crate) imports: Vec<Import>,

    #[serde(default)]
    pub(crate) resources: Vec<Resource>,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct Import {
    pub(crate) path: String,

    /// Alias the resources refer to in their `type`
    #[serde(default)]
    pub(crate) name: Option<String>,
}

/// Outputs of a single expanded template
#[derive(Clone, Debug, PartialEq, Serialize)]
pub(crate) struct Layout {
    pub(crate) name: String,

    #[serde(rename = "type")]
    pub(crate) kind: String,

    pub(crate) outputs: Vec<Output>,
}

/// Config with every Spanner template replaced by the resources it generates
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub(crate) struct ExpandedConfig {
    pub(crate) resources: Vec<Resource>,
    pub(crate) layout: Vec<Layout>,
}

/// Values shared by all templates of the deployment
#[derive(Clone, Debug, Default)]
pub(crate) struct Environment {
    pub(crate) project: String,
    pub(crate) deployment: Option<String>,
}

fn file_name(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path)
}

impl DeploymentConfig {
    /// Whether a resource type refers to the Spanner template
    ///
    /// Matches the template file by any path, its extension-less name, and
    /// aliases given to it in `imports`.
    fn is_template(&self, kind: &str) -> bool {
        if kind.ends_with(TEMPLATE_FILE_NAME) || kind.ends_with(TEMPLATE_NAME) {
            return true;
        }

        self.imports.iter().any(|import| {
            file_name(&import.path) == TEMPLATE_FILE_NAME
                && import.name.as_deref() == Some(kind)
        })
    }

    /// Expand every Spanner template, the rest of resources are kept as is
    pub(crate) fn expand(&self, environment: &Environment) -> eyre::Result<ExpandedConfig> {
        let mut expanded = ExpandedConfig::default();

        for resource in self.resources.iter() {
            let Some(kind) = resource.kind.as_deref().filter(|kind| self.is_template(kind)) else {
                log::debug!("Passing through resource {}", resource.name);
                expanded.resources.push(resource.clone());
                continue;
            };

            let env = Env {
                name: resource.name.clone(),
                project: environment.project.clone(),
                deployment: environment.deployment.clone(),
                kind: Some(kind.to_string()),
            };

            let mut bundle = Context::from_value(resource.properties.clone(), env)
                .and_then(|context| generate(&context))
                .wrap_err_with(|| format!("Failed to expand {}", resource.name))?;

            // The instance is applied first, so ordering the template after
            // something comes down to ordering the instance
            if !resource.depends_on().is_empty() {
                let instance = bundle
                    .resources
                    .first_mut()
                    .ok_or_else(|| eyre!("Template {} produced no resources", resource.name))?;

                instance
                    .metadata
                    .get_or_insert_with(Metadata::default)
                    .depends_on
                    .extend(resource.depends_on().iter().cloned());
            }

            log::debug!(
                "Expanded {} into {} resources",
                resource.name,
                bundle.resources.len()
            );

            expanded.resources.extend(bundle.resources);

            expanded.layout.push(Layout {
                name: resource.name.clone(),
                kind: kind.to_string(),
                outputs: bundle.outputs,
            });
        }

        let mut names = HashSet::new();

        for resource in expanded.resources.iter() {
            if !names.insert(resource.name.as_str()) {
                eyre::bail!("Duplicate resource name {} in the expanded config", resource.name);
            }
        }

        Ok(expanded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse;
    use serde_json::json;
    use spanner_template::MissingProperty;

    fn environment() -> Environment {
        Environment {
            project: "proj1".into(),
            deployment: Some("dep1".into()),
        }
    }

    fn config(yaml: &str) -> DeploymentConfig {
        parse(yaml, false).unwrap()
    }

    #[test]
    fn expands_template_and_keeps_others() {
        let config = config(
            r#"
imports:
  - path: templates/cloud_spanner/cloud_spanner.py
    name: spanner.py

resources:
  - name: bucket
    type: storage.v1.bucket
    properties:
      location: US
  - name: inst1
    type: spanner.py
    properties:
      instanceConfig: regional-us-central1
      nodeCount: 1
      displayName: d
      databases:
        - name: db1
"#,
        );

        let expanded = config.expand(&environment()).unwrap();
        let names: Vec<&str> = expanded.resources.iter().map(|r| r.name.as_str()).collect();

        assert_eq!(
            names,
            [
                "bucket",
                "inst1",
                "projects/proj1/instances/inst1/databases/db1"
            ]
        );
        assert_eq!(expanded.resources[0].properties, json!({"location": "US"}));

        assert_eq!(expanded.layout.len(), 1);
        assert_eq!(expanded.layout[0].name, "inst1");
        assert_eq!(expanded.layout[0].kind, "spanner.py");
        assert_eq!(expanded.layout[0].outputs[0].value, json!("$(ref.inst1.state)"));
    }

    #[test]
    fn bare_template_type() {
        let config = config(
            r#"
resources:
  - name: inst1
    type: cloud_spanner.py
    properties:
      project: other
      instanceConfig: c
      nodeCount: 1
      displayName: d
"#,
        );

        let expanded = config.expand(&environment()).unwrap();

        assert_eq!(expanded.resources[0].properties["parent"], json!("projects/other"));
    }

    #[test]
    fn missing_property_keeps_its_kind() {
        let config = config(
            r#"
resources:
  - name: inst1
    type: cloud_spanner.py
    properties:
      instanceConfig: c
      displayName: d
"#,
        );

        let error = config.expand(&environment()).unwrap_err();

        assert_eq!(
            error.downcast_ref::<MissingProperty>().map(|e| e.path()),
            Some("nodeCount")
        );
    }

    #[test]
    fn collision_between_templates() {
        let config = config(
            r#"
resources:
  - name: inst1
    type: cloud_spanner.py
    properties: {instanceConfig: c, nodeCount: 1, displayName: d}
  - name: second
    type: cloud_spanner.py
    properties: {name: inst1, instanceConfig: c, nodeCount: 1, displayName: d}
"#,
        );

        assert!(config.expand(&environment()).is_err());
    }

    #[test]
    fn template_referenced_by_path_or_bare_name() {
        let config = config(
            r#"
resources:
  - name: by-path
    type: templates/cloud_spanner/cloud_spanner.py
    properties: {instanceConfig: c, nodeCount: 1, displayName: d}
  - name: bare
    type: cloud_spanner
    properties: {instanceConfig: c, nodeCount: 1, displayName: d}
"#,
        );

        let expanded = config.expand(&environment()).unwrap();
        let layout: Vec<&str> = expanded.layout.iter().map(|l| l.name.as_str()).collect();
        let kinds: Vec<Option<&str>> = expanded.resources.iter().map(|r| r.kind.as_deref()).collect();

        assert_eq!(layout, ["by-path", "bare"]);
        assert_eq!(
            kinds,
            [
                Some("gcp-types/spanner-v1:projects.instances"),
                Some("gcp-types/spanner-v1:projects.instances")
            ]
        );
    }

    #[test]
    fn other_resources_keep_every_field() {
        let config = config(
            r#"
resources:
  - name: x
    type: pubsub.v1.topic
    properties: {topic: x}
  - name: bucket
    type: storage.v1.bucket
    properties:
      location: US
    accessControl:
      gcpIamPolicy:
        bindings:
          - role: roles/storage.objectViewer
            members: ["allUsers"]
    metadata:
      dependsOn: [x]
      runtimePolicy: [UPDATE_ALWAYS]
"#,
        );

        let expanded = config.expand(&environment()).unwrap();
        let bucket = serde_json::to_value(&expanded.resources[1]).unwrap();

        assert_eq!(
            bucket,
            json!({
                "name": "bucket",
                "type": "storage.v1.bucket",
                "properties": {"location": "US"},
                "metadata": {
                    "dependsOn": ["x"],
                    "runtimePolicy": ["UPDATE_ALWAYS"]
                },
                "accessControl": {
                    "gcpIamPolicy": {
                        "bindings": [
                            {"role": "roles/storage.objectViewer", "members": ["allUsers"]}
                        ]
                    }
                }
            })
        );
    }

    #[test]
    fn template_dependencies_move_to_instance() {
        let config = config(
            r#"
resources:
  - name: network
    type: compute.v1.network
  - name: inst1
    type: cloud_spanner.py
    properties:
      instanceConfig: c
      nodeCount: 1
      displayName: d
      databases:
        - name: db1
    metadata:
      dependsOn: [network]
"#,
        );

        let expanded = config.expand(&environment()).unwrap();

        assert_eq!(expanded.resources[1].name, "inst1");
        assert_eq!(expanded.resources[1].depends_on(), ["network"]);
        assert_eq!(expanded.resources[2].depends_on(), ["inst1"]);
    }
}
